use syn::{Attribute, Error, LitStr};

#[derive(Default)]
pub struct FieldAttributes {
    pub name: Option<LitStr>,
    pub implicit: bool,
}

impl TryFrom<&Attribute> for FieldAttributes {
    type Error = Error;

    fn try_from(value: &Attribute) -> Result<Self, Self::Error> {
        let mut name = None;
        let mut implicit = false;
        value.parse_nested_meta(|meta| {
            if meta.path.is_ident("name") {
                name = Some(meta.value().and_then(|value| value.parse())?);
            } else if meta.path.is_ident("implicit") {
                implicit = true;
            } else {
                return Err(meta.error("unsupported inject attribute"));
            }

            Ok(())
        })?;

        Ok(Self { name, implicit })
    }
}

#[derive(Default)]
pub struct InjectableAttributes {
    pub init: bool,
    pub clean: bool,
}

impl TryFrom<&Attribute> for InjectableAttributes {
    type Error = Error;

    fn try_from(value: &Attribute) -> Result<Self, Self::Error> {
        let mut attributes = Self::default();
        value.parse_nested_meta(|meta| {
            if meta.path.is_ident("init") {
                attributes.init = true;
            } else if meta.path.is_ident("clean") {
                attributes.clean = true;
            } else {
                return Err(meta.error("unsupported injectable attribute"));
            }

            Ok(())
        })?;

        Ok(attributes)
    }
}
