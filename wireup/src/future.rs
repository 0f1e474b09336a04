//! Re-exports of future helpers used by async lifecycle hooks.

pub use futures::future::{BoxFuture, FutureExt};
