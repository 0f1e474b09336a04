//! Dependency injection container for pre-constructed objects.
//!
//! Applications often build their services by hand and pass them around through long constructor
//! chains. With `wireup`, objects are created up front, registered in a
//! [Container](container::Container) and declare their dependencies as
//! [Inject](injectable::Inject) fields. The container wires the fields by type and optional name,
//! initializes objects in the order they were registered (optionally in concurrent batches) and
//! tears them down at the end.
//!
//! ### Features
//!
//! * `derive` - automatically derive [Injectable](injectable::Injectable) with
//! `#[derive(Injectable)]`
//! * `async` - lifecycle hooks return futures and initialization/teardown become async

pub mod config;
pub mod container;
pub mod error;
#[cfg(feature = "async")]
pub mod future;
pub mod injectable;
pub mod lifecycle;
pub mod logging;
pub mod registry;
pub mod resolver;
mod scheduler;

pub use container::Container;
pub use injectable::Injectable;
#[cfg(feature = "derive")]
pub use wireup_derive::Injectable;
