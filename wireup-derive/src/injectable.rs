use crate::attributes::{FieldAttributes, InjectableAttributes};
use itertools::Itertools;
use proc_macro2::TokenStream;
use quote::quote;
use syn::spanned::Spanned;
use syn::{
    Attribute, Data, DataStruct, DeriveInput, Error, Fields, GenericArgument, Index, PathArguments,
    Result, Type,
};

const INJECT: &str = "inject";
const INJECTABLE: &str = "injectable";
const INJECT_TYPE: &str = "Inject";

struct Dependency {
    key: String,
    member: TokenStream,
    ty: Type,
    attributes: FieldAttributes,
}

// extracts T from Inject<T>, matching on the last path segment only
fn injected_type(ty: &Type) -> Option<&Type> {
    let Type::Path(path) = ty else {
        return None;
    };

    let segment = path.path.segments.last()?;
    if segment.ident != INJECT_TYPE {
        return None;
    }

    let PathArguments::AngleBracketed(arguments) = &segment.arguments else {
        return None;
    };

    match arguments.args.iter().exactly_one().ok()? {
        GenericArgument::Type(ty) => Some(ty),
        _ => None,
    }
}

fn extract_field_attributes(attributes: &[Attribute]) -> Result<Option<FieldAttributes>> {
    attributes
        .iter()
        .filter_map(|attribute| {
            if attribute.path().is_ident(INJECT) {
                Some(FieldAttributes::try_from(attribute))
            } else {
                None
            }
        })
        .next()
        .transpose()
}

fn extract_injectable_attributes(attributes: &[Attribute]) -> Result<InjectableAttributes> {
    attributes
        .iter()
        .filter(|attribute| attribute.path().is_ident(INJECTABLE))
        .try_fold(InjectableAttributes::default(), |current, attribute| {
            let parsed = InjectableAttributes::try_from(attribute)?;
            Ok(InjectableAttributes {
                init: current.init || parsed.init,
                clean: current.clean || parsed.clean,
            })
        })
}

fn collect_dependencies(fields: &Fields) -> Result<Vec<Dependency>> {
    let mut dependencies = vec![];
    for (index, field) in fields.iter().enumerate() {
        let attributes = extract_field_attributes(&field.attrs)?;
        let Some(ty) = injected_type(&field.ty) else {
            if attributes.is_some() {
                return Err(Error::new(
                    field.span(),
                    "#[inject] can only be used on Inject<T> fields!",
                ));
            }

            continue;
        };

        let attributes = attributes.unwrap_or_default();
        if attributes.implicit && attributes.name.is_some() {
            return Err(Error::new(
                field.span(),
                "Named dependencies cannot be created implicitly!",
            ));
        }

        let (key, member) = match &field.ident {
            Some(ident) => (ident.to_string(), quote!(#ident)),
            None => {
                let index = Index::from(index);
                (index.index.to_string(), quote!(#index))
            }
        };

        dependencies.push(Dependency {
            key,
            member,
            ty: ty.clone(),
            attributes,
        });
    }

    Ok(dependencies)
}

fn generate_request(dependency: &Dependency) -> TokenStream {
    let Dependency {
        key,
        ty,
        attributes,
        ..
    } = dependency;

    if attributes.implicit {
        quote!(::wireup::injectable::DependencyRequest::implicit::<#ty>(#key))
    } else if let Some(name) = &attributes.name {
        quote!(::wireup::injectable::DependencyRequest::new::<#ty>(#key).with_name(#name))
    } else {
        quote!(::wireup::injectable::DependencyRequest::new::<#ty>(#key))
    }
}

fn generate_wiring(dependencies: &[Dependency]) -> TokenStream {
    if dependencies.is_empty() {
        return quote!();
    }

    let requests = dependencies.iter().map(generate_request);
    let keys = dependencies.iter().map(|dependency| &dependency.key);
    let members = dependencies.iter().map(|dependency| &dependency.member);

    quote! {
        fn dependencies(&self) -> ::std::vec::Vec<::wireup::injectable::DependencyRequest> {
            ::std::vec![#(#requests),*]
        }

        fn inject(
            &self,
            field: &str,
            instance: ::wireup::injectable::AnyObjectPtr,
        ) -> ::std::result::Result<(), ::wireup::error::InjectError> {
            match field {
                #(#keys => self.#members.inject(instance),)*
                _ => ::std::result::Result::Err(::wireup::error::InjectError::UnknownField(
                    ::std::string::ToString::to_string(field),
                )),
            }
        }
    }
}

fn generate_lifecycle(attributes: &InjectableAttributes) -> TokenStream {
    let initializer = attributes.init.then(|| {
        quote! {
            fn as_initializer(
                &self,
            ) -> ::std::option::Option<&dyn ::wireup::lifecycle::Initializer> {
                ::std::option::Option::Some(self)
            }
        }
    });

    let cleaner = attributes.clean.then(|| {
        quote! {
            fn as_cleaner(&self) -> ::std::option::Option<&dyn ::wireup::lifecycle::Cleaner> {
                ::std::option::Option::Some(self)
            }
        }
    });

    quote! {
        #initializer
        #cleaner
    }
}

pub fn expand_injectable(input: &DeriveInput) -> Result<TokenStream> {
    if let Data::Struct(DataStruct { fields, .. }) = &input.data {
        let ident = &input.ident;
        let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

        let wiring = generate_wiring(&collect_dependencies(fields)?);
        let lifecycle = generate_lifecycle(&extract_injectable_attributes(&input.attrs)?);

        Ok(quote! {
            #[automatically_derived]
            impl #impl_generics ::wireup::injectable::Injectable for #ident #ty_generics #where_clause {
                #wiring
                #lifecycle
            }
        })
    } else {
        Err(Error::new(input.span(), "Can only derive Injectable on structs!"))
    }
}
