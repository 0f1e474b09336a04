use crate::lifecycle::ErrorPtr;
use thiserror::Error;

/// Errors related to writing resolved instances into [Inject](crate::injectable::Inject) fields.
#[derive(Error, Clone, Ord, PartialOrd, Eq, PartialEq, Hash, Debug)]
pub enum InjectError {
    #[error("Object has no injectable field named: {0}")]
    UnknownField(String),
    #[error("Tried to inject an instance incompatible with {expected}")]
    IncompatibleInstance { expected: &'static str },
    #[error("Dependency of type {0} has already been injected")]
    AlreadyInjected(&'static str),
}

/// Errors reported by a [GraphResolver](crate::resolver::GraphResolver) when registering objects
/// or wiring the graph.
#[derive(Error, Clone, Ord, PartialOrd, Eq, PartialEq, Hash, Debug)]
pub enum ResolverError {
    #[error("Attempted to register a duplicated object with name: {0}")]
    DuplicateName(String),
    #[error("Cannot find object named '{name}' requested as {type_name}")]
    UnresolvedName {
        name: String,
        type_name: &'static str,
    },
    #[error("Object named '{name}' is {actual}, but was requested as {requested}")]
    NamedTypeMismatch {
        name: String,
        requested: &'static str,
        actual: &'static str,
    },
    #[error("Cannot find an unnamed object of type {type_name} required by {required_by}")]
    MissingDependency {
        type_name: &'static str,
        required_by: &'static str,
    },
    #[error("Found multiple unnamed objects of type {0} - name the dependency to disambiguate")]
    AmbiguousType(&'static str),
    #[error("Detected dependency cycle for object: {type_name}")]
    DependencyCycle { type_name: &'static str },
    #[error("The object graph has already been populated")]
    AlreadyPopulated,
    #[error("Error injecting field '{field}' of {type_name}: {source}")]
    InjectFailed {
        type_name: &'static str,
        field: &'static str,
        source: InjectError,
    },
}

/// Errors which stop building or initializing a [Container](crate::container::Container).
#[derive(Error, Clone, Debug)]
pub enum ContainerError {
    #[error("Error providing object {}{type_name}: {source}", .name.as_ref().map(|name| format!("{name}.")).unwrap_or_default())]
    Registration {
        type_name: &'static str,
        name: Option<String>,
        source: ResolverError,
    },
    #[error("Error constructing object: {0}")]
    Constructor(ErrorPtr),
    #[error("Error populating graph: {0}")]
    Population(#[source] ResolverError),
    #[error("Error initializing provided object {type_name}: {source}")]
    Initialization {
        type_name: &'static str,
        source: ErrorPtr,
    },
    #[error("{type_name} not explicitly created")]
    ImplicitObject { type_name: &'static str },
    #[error("Object not found: {name}.{type_name}")]
    ObjectNotFound {
        type_name: &'static str,
        name: String,
    },
}
