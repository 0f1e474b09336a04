//! One of the basic blocks of dependency injection is an [Injectable] object. Injectables are
//! pre-constructed by the caller, registered in a [Container](crate::container::Container) and
//! wired by a [GraphResolver](crate::resolver::GraphResolver), which fills their [Inject] fields.
//!
//! ## Declaring dependencies
//!
//! Dependencies are declared as [Inject] fields and described to the resolver by
//! [DependencyRequest]s. With the `derive` feature enabled, the trait can be derived:
//!
//! ```
//! use std::sync::Arc;
//! use wireup::container::Container;
//! use wireup::injectable::Inject;
//! use wireup::Injectable;
//!
//! #[derive(Injectable, Default)]
//! struct Database;
//!
//! #[derive(Injectable, Default)]
//! struct Repository {
//!     // unnamed dependency - matched by type
//!     database: Inject<Database>,
//!     // named dependency - matched by registration name
//!     #[inject(name = "replica")]
//!     replica: Inject<Database>,
//! }
//!
//! let repository = Arc::new(Repository::default());
//! let container = Container::new()
//!     .with_object(Arc::new(Database))?
//!     .with_named_object("replica", Arc::new(Database))?
//!     .with_object(repository.clone())?
//!     .initialize_graph()?;
//!
//! assert!(repository.database.is_injected());
//! # Ok::<(), wireup::error::ContainerError>(())
//! ```
//!
//! ### Supported `#[injectable]` struct configuration
//!
//! * `init` - the type implements [Initializer]
//! * `clean` - the type implements [Cleaner]
//!
//! ### Supported `#[inject]` field configuration
//!
//! * `name = "name"` - inject the object registered with exactly this name
//! * `implicit` - when no unnamed object of the type is registered, let the resolver create one
//! with `Default::default()`; such objects are rejected in strict mode

use crate::error::InjectError;
use crate::lifecycle::{Cleaner, Initializer};
use crate::registry::Entry;
use derivative::Derivative;
use std::any::{type_name, Any, TypeId};
use std::fmt::{Debug, Formatter};
use std::sync::{Arc, OnceLock};

pub type ObjectPtr<T> = Arc<T>;

pub type AnyObjectPtr = ObjectPtr<dyn Any + Send + Sync + 'static>;

pub type InjectablePtr = ObjectPtr<dyn Injectable>;

/// Creates an implicit object for an unsatisfied dependency.
pub type ImplicitConstructor = fn() -> Entry;

/// Base trait for objects managed by a [Container](crate::container::Container).
///
/// All methods have defaults describing an object with no dependencies and no lifecycle hooks, so
/// a leaf object can simply `impl Injectable for Leaf {}`.
pub trait Injectable: Any + Send + Sync {
    /// Describes fields which should be wired by the resolver.
    fn dependencies(&self) -> Vec<DependencyRequest> {
        Vec::new()
    }

    /// Stores a resolved instance in the field named `field`.
    fn inject(&self, field: &str, _instance: AnyObjectPtr) -> Result<(), InjectError> {
        Err(InjectError::UnknownField(field.to_string()))
    }

    /// Returns the [Initializer] capability, if this object has one.
    fn as_initializer(&self) -> Option<&dyn Initializer> {
        None
    }

    /// Returns the [Cleaner] capability, if this object has one.
    fn as_cleaner(&self) -> Option<&dyn Cleaner> {
        None
    }
}

/// Typed description of a single dependency field.
#[derive(Derivative, Clone)]
#[derivative(Debug)]
pub struct DependencyRequest {
    /// Field key passed back to [Injectable::inject].
    pub field: &'static str,

    pub type_id: TypeId,

    pub type_name: &'static str,

    /// Registration name to match. `None` matches unnamed registrations by type.
    pub name: Option<String>,

    /// Constructor used when no unnamed registration satisfies the request.
    #[derivative(Debug = "ignore")]
    pub implicit: Option<ImplicitConstructor>,
}

impl DependencyRequest {
    /// Requests an unnamed object of type `T`.
    pub fn new<T: Injectable>(field: &'static str) -> Self {
        Self {
            field,
            type_id: TypeId::of::<T>(),
            type_name: type_name::<T>(),
            name: None,
            implicit: None,
        }
    }

    /// Requests an unnamed object of type `T`, which may be created implicitly if missing.
    pub fn implicit<T: Injectable + Default>(field: &'static str) -> Self {
        Self {
            implicit: Some(construct_default::<T>),
            ..Self::new::<T>(field)
        }
    }

    /// Restricts the request to the registration with the given name. An empty name keeps the
    /// request unnamed.
    pub fn with_name<N: Into<String>>(mut self, name: N) -> Self {
        let name = name.into();
        self.name = (!name.is_empty()).then_some(name);
        self
    }
}

fn construct_default<T: Injectable + Default>() -> Entry {
    Entry::unnamed(ObjectPtr::new(T::default()))
}

/// Write-once slot for a dependency, filled during graph population.
pub struct Inject<T: Injectable> {
    instance: OnceLock<ObjectPtr<T>>,
}

impl<T: Injectable> Inject<T> {
    pub const fn new() -> Self {
        Self {
            instance: OnceLock::new(),
        }
    }

    /// Returns the injected instance, or `None` before population.
    #[inline]
    pub fn get(&self) -> Option<&ObjectPtr<T>> {
        self.instance.get()
    }

    #[inline]
    pub fn is_injected(&self) -> bool {
        self.instance.get().is_some()
    }

    /// Stores a type-erased instance. Fails if the instance is not a `T` or if a value has
    /// already been injected.
    pub fn inject(&self, instance: AnyObjectPtr) -> Result<(), InjectError> {
        let instance = instance
            .downcast::<T>()
            .map_err(|_| InjectError::IncompatibleInstance {
                expected: type_name::<T>(),
            })?;

        self.instance
            .set(instance)
            .map_err(|_| InjectError::AlreadyInjected(type_name::<T>()))
    }
}

impl<T: Injectable> Default for Inject<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Injectable> Debug for Inject<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Inject")
            .field("type", &type_name::<T>())
            .field("injected", &self.is_injected())
            .finish()
    }
}
