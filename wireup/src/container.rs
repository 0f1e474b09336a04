//! The [Container] composes a [Registry] of explicitly registered objects, a [GraphResolver]
//! wiring them together, and the batch scheduler running their lifecycle hooks.
//!
//! A container is single-use: register objects, initialize the graph once, optionally query it in
//! tests, and finally [stop](Container::stop) it.
//!
//! ```
//! use std::sync::Arc;
//! use wireup::container::Container;
//! use wireup::injectable::Inject;
//! use wireup::Injectable;
//!
//! #[derive(Injectable, Default)]
//! struct Config;
//!
//! #[derive(Injectable, Default)]
//! struct Cache;
//!
//! #[derive(Injectable, Default)]
//! struct Server {
//!     config: Inject<Config>,
//!     cache: Inject<Cache>,
//! }
//!
//! let container = Container::new()
//!     // Config and Cache are independent, so they can be initialized concurrently
//!     .with_object(Arc::new(Config))?
//!     .with_object(Arc::new(Cache))?
//!     .init_async()
//!     .with_object(Arc::new(Server::default()))?
//!     .initialize_graph()?;
//!
//! let server = container.get_object::<Server>()?;
//! assert!(server.config.is_injected());
//!
//! container.stop();
//! # Ok::<(), wireup::error::ContainerError>(())
//! ```

use crate::config::ContainerConfig;
use crate::error::ContainerError;
use crate::injectable::{AnyObjectPtr, Injectable, ObjectPtr};
use crate::lifecycle::convert_error;
use crate::logging::{install_tracing_logger, DebugLog, DebugSinkPtr, TracingDebugSink};
use crate::registry::{Entry, Registry};
use crate::resolver::{GraphResolver, TypeGraphResolver};
use crate::scheduler;
use config::ConfigError;
use derivative::Derivative;
use std::any::{type_name, TypeId};
use std::error::Error;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;

/// Dependency injection container for pre-constructed objects.
#[derive(Derivative)]
#[derivative(Debug(bound = ""))]
pub struct Container<R: GraphResolver = TypeGraphResolver> {
    #[derivative(Debug = "ignore")]
    resolver: R,
    registry: Registry,
    #[derivative(Debug = "ignore")]
    log: DebugLog,
    strict: bool,
    stopped: AtomicBool,
}

impl Container {
    /// Creates a silent, strict container using the [TypeGraphResolver].
    pub fn new() -> Self {
        Self::with_resolver(TypeGraphResolver::new())
    }

    /// Creates a container forwarding debug messages to [tracing].
    pub fn new_debug() -> Self {
        Self::new().with_debug_sink(Arc::new(TracingDebugSink) as DebugSinkPtr)
    }

    pub fn from_config(config: &ContainerConfig) -> Self {
        if config.install_tracing_logger && !install_tracing_logger() {
            info!("Global tracing subscriber already installed - skipping default logger.");
        }

        let container = if config.debug {
            Self::new_debug()
        } else {
            Self::new()
        };

        container.with_strict(config.strict)
    }

    /// Creates a container configured from [ContainerConfig::init_from_environment].
    pub fn from_environment() -> Result<Self, ConfigError> {
        ContainerConfig::init_from_environment().map(|config| Self::from_config(&config))
    }
}

impl Default for Container {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: GraphResolver> Container<R> {
    pub fn with_resolver(resolver: R) -> Self {
        Self {
            resolver,
            registry: Registry::default(),
            log: DebugLog::default(),
            strict: true,
            stopped: AtomicBool::new(false),
        }
    }

    /// Sets the sink receiving debug messages.
    pub fn with_debug_sink(mut self, sink: DebugSinkPtr) -> Self {
        self.log = DebugLog::new(Some(sink));
        self
    }

    /// Selects if [Container::initialize] rejects implicitly created objects.
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    #[inline]
    pub fn is_strict(&self) -> bool {
        self.strict
    }

    /// Registers an unnamed object.
    pub fn with_object<T: Injectable>(self, object: ObjectPtr<T>) -> Result<Self, ContainerError> {
        self.with_entry(Entry::unnamed(object))
    }

    /// Registers an object under the given name. An empty name registers an unnamed object.
    pub fn with_named_object<N: Into<String>, T: Injectable>(
        self,
        name: N,
        object: ObjectPtr<T>,
    ) -> Result<Self, ContainerError> {
        self.with_entry(Entry::named(name, object))
    }

    /// Registers the result of a fallible constructor. A constructor error is returned without
    /// registering anything.
    pub fn with_object_or_err<T: Injectable, E: Error + Send + Sync + 'static>(
        self,
        object: Result<ObjectPtr<T>, E>,
    ) -> Result<Self, ContainerError> {
        let object = object.map_err(|error| ContainerError::Constructor(convert_error(error)))?;
        self.with_object(object)
    }

    /// Registers all given entries in order.
    pub fn with_objects<I: IntoIterator<Item = Entry>>(
        self,
        entries: I,
    ) -> Result<Self, ContainerError> {
        entries
            .into_iter()
            .try_fold(self, |container, entry| container.with_entry(entry))
    }

    pub fn with_entry(mut self, entry: Entry) -> Result<Self, ContainerError> {
        match entry.name() {
            Some(name) => self
                .log
                .debug(format_args!("Adding {}: {}", name, entry.type_name())),
            None => self.log.debug(format_args!("Adding {}", entry.type_name())),
        }

        self.resolver
            .provide(&entry)
            .map_err(|source| ContainerError::Registration {
                type_name: entry.type_name(),
                name: entry.name().map(str::to_string),
                source,
            })?;

        self.registry.push(entry);
        Ok(self)
    }

    /// Marks all objects registered since the previous batch as independent, so they are
    /// initialized concurrently.
    pub fn init_async(mut self) -> Self {
        self.registry.close_async_batch();
        self
    }

    /// Marks all objects registered since the previous batch to be initialized one after another.
    pub fn init_sync(mut self) -> Self {
        self.registry.close_sync_batch();
        self
    }

    fn populate(&mut self) -> Result<(), ContainerError> {
        self.registry.close_sync_batch();
        self.log.debug(format_args!(
            "Initializing {} batches",
            self.registry.batches().len()
        ));

        self.resolver.populate().map_err(ContainerError::Population)
    }

    /// Wires and initializes the graph, allowing objects created implicitly by the resolver.
    #[cfg(not(feature = "async"))]
    pub fn initialize_graph_with_implicit_objects(mut self) -> Result<Self, ContainerError> {
        self.populate()?;
        scheduler::initialize_batches(self.registry.batches(), &self.log)?;
        Ok(self)
    }

    /// Wires and initializes the graph, failing if the resolver created any object which was not
    /// explicitly registered.
    #[cfg(not(feature = "async"))]
    pub fn initialize_graph(self) -> Result<Self, ContainerError> {
        let container = self.initialize_graph_with_implicit_objects()?;
        container.check_no_implicit_objects()?;
        Ok(container)
    }

    /// Initializes the graph in strict or relaxed mode, depending on configuration.
    #[cfg(not(feature = "async"))]
    pub fn initialize(self) -> Result<Self, ContainerError> {
        if self.strict {
            self.initialize_graph()
        } else {
            self.initialize_graph_with_implicit_objects()
        }
    }

    /// Wires and initializes the graph, allowing objects created implicitly by the resolver.
    #[cfg(feature = "async")]
    pub async fn initialize_graph_with_implicit_objects(mut self) -> Result<Self, ContainerError> {
        self.populate()?;
        scheduler::initialize_batches(self.registry.batches(), &self.log).await?;
        Ok(self)
    }

    /// Wires and initializes the graph, failing if the resolver created any object which was not
    /// explicitly registered.
    #[cfg(feature = "async")]
    pub async fn initialize_graph(self) -> Result<Self, ContainerError> {
        let container = self.initialize_graph_with_implicit_objects().await?;
        container.check_no_implicit_objects()?;
        Ok(container)
    }

    /// Initializes the graph in strict or relaxed mode, depending on configuration.
    #[cfg(feature = "async")]
    pub async fn initialize(self) -> Result<Self, ContainerError> {
        if self.strict {
            self.initialize_graph().await
        } else {
            self.initialize_graph_with_implicit_objects().await
        }
    }

    /// Returns objects known to the resolver, which were not explicitly registered.
    pub fn implicit_objects(&self) -> Vec<Entry> {
        self.resolver
            .objects()
            .into_iter()
            .filter(|entry| !self.registry.contains_object(entry))
            .collect()
    }

    /// Checks that every object known to the resolver has been explicitly registered.
    pub fn check_no_implicit_objects(&self) -> Result<(), ContainerError> {
        for entry in self.resolver.objects() {
            if !self.registry.contains_object(&entry) {
                return Err(ContainerError::ImplicitObject {
                    type_name: entry.type_name(),
                });
            }

            self.log.debug(format_args!("{} OK", entry.type_name()));
        }

        Ok(())
    }

    /// Returns all registered objects in initialization order.
    pub fn all_objects(&self) -> Vec<AnyObjectPtr> {
        self.registry
            .entries()
            .map(|entry| entry.any().clone())
            .collect()
    }

    /// Returns the unnamed registered object of type `T`. Meant for tests and debugging - regular
    /// code should have its dependencies injected.
    pub fn get_object<T: Injectable>(&self) -> Result<ObjectPtr<T>, ContainerError> {
        self.get_named_object::<T>("")
    }

    /// Returns the registered object of type `T` with exactly the given name. An empty name looks
    /// for unnamed objects. Meant for tests and debugging.
    pub fn get_named_object<T: Injectable>(
        &self,
        name: &str,
    ) -> Result<ObjectPtr<T>, ContainerError> {
        self.registry
            .find(TypeId::of::<T>(), name)
            .and_then(Entry::downcast::<T>)
            .ok_or_else(|| ContainerError::ObjectNotFound {
                type_name: type_name::<T>(),
                name: name.to_string(),
            })
    }

    fn mark_stopped(&self) -> bool {
        !self.stopped.swap(true, Ordering::SeqCst)
    }

    /// Runs cleaners of all registered objects in registration order. Errors are logged and do
    /// not prevent remaining objects from being cleaned. Subsequent calls do nothing.
    #[cfg(not(feature = "async"))]
    pub fn stop(&self) {
        if self.mark_stopped() {
            scheduler::clean_entries(self.registry.entries(), &self.log);
        }
    }

    /// Returns a guard which stops the container when dropped.
    #[cfg(not(feature = "async"))]
    pub fn stop_guard(&self) -> StopGuard<'_, R> {
        StopGuard { container: self }
    }

    /// Runs cleaners of all registered objects in registration order. Errors are logged and do
    /// not prevent remaining objects from being cleaned. Subsequent calls do nothing.
    #[cfg(feature = "async")]
    pub async fn stop(&self) {
        if self.mark_stopped() {
            scheduler::clean_entries(self.registry.entries(), &self.log).await;
        }
    }
}

/// Stops the borrowed [Container] when dropped.
#[cfg(not(feature = "async"))]
#[must_use = "the container is stopped as soon as the guard is dropped"]
pub struct StopGuard<'a, R: GraphResolver> {
    container: &'a Container<R>,
}

#[cfg(not(feature = "async"))]
impl<R: GraphResolver> Drop for StopGuard<'_, R> {
    fn drop(&mut self) {
        self.container.stop();
    }
}
