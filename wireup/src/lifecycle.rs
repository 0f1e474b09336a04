//! Optional lifecycle capabilities of registered objects. An object exposes them through
//! [Injectable::as_initializer](crate::injectable::Injectable::as_initializer) and
//! [Injectable::as_cleaner](crate::injectable::Injectable::as_cleaner), which the derive macro
//! generates from `#[injectable(init, clean)]`.
//!
//! With the `async` feature enabled, hooks return boxed futures and the
//! [Container](crate::container::Container) awaits them.

#[cfg(feature = "async")]
use crate::future::BoxFuture;
use std::error::Error;
use std::sync::Arc;

/// Shared, type-erased error returned by lifecycle hooks.
pub type ErrorPtr = Arc<dyn Error + Send + Sync>;

/// Called once for every registered object after the graph has been populated. Objects in the
/// same batch may be initialized concurrently.
pub trait Initializer: Send + Sync {
    #[cfg(feature = "async")]
    fn init(&self) -> BoxFuture<'_, Result<(), ErrorPtr>>;

    #[cfg(not(feature = "async"))]
    fn init(&self) -> Result<(), ErrorPtr>;
}

/// Called on [Container::stop](crate::container::Container::stop). Errors are logged and do not
/// stop the remaining objects from being cleaned.
pub trait Cleaner: Send + Sync {
    #[cfg(feature = "async")]
    fn clean(&self) -> BoxFuture<'_, Result<(), ErrorPtr>>;

    #[cfg(not(feature = "async"))]
    fn clean(&self) -> Result<(), ErrorPtr>;
}

/// Wraps any error into an [ErrorPtr].
pub fn convert_error<E: Error + Send + Sync + 'static>(error: E) -> ErrorPtr {
    Arc::new(error) as ErrorPtr
}
