//! Registered objects and the batches they are initialized in.
//!
//! Entries are first collected in a pending buffer. Closing the buffer either moves it as a whole
//! into a single batch (initialized concurrently) or creates one batch per entry (initialized one
//! after another). Batches are always processed in the order they were closed.

use crate::injectable::{AnyObjectPtr, Injectable, InjectablePtr, ObjectPtr};
use derivative::Derivative;
use std::any::{type_name, TypeId};

/// A registered object with its optional name.
#[derive(Derivative, Clone)]
#[derivative(Debug)]
pub struct Entry {
    #[derivative(Debug = "ignore")]
    object: InjectablePtr,

    #[derivative(Debug = "ignore")]
    any: AnyObjectPtr,

    type_id: TypeId,

    type_name: &'static str,

    name: Option<String>,
}

impl Entry {
    pub fn unnamed<T: Injectable>(object: ObjectPtr<T>) -> Self {
        Self {
            any: object.clone() as AnyObjectPtr,
            object: object as InjectablePtr,
            type_id: TypeId::of::<T>(),
            type_name: type_name::<T>(),
            name: None,
        }
    }

    /// Creates a named entry. An empty name creates an unnamed one.
    pub fn named<N: Into<String>, T: Injectable>(name: N, object: ObjectPtr<T>) -> Self {
        let name = name.into();
        Self {
            name: (!name.is_empty()).then_some(name),
            ..Self::unnamed(object)
        }
    }

    #[inline]
    pub fn object(&self) -> &InjectablePtr {
        &self.object
    }

    #[inline]
    pub fn any(&self) -> &AnyObjectPtr {
        &self.any
    }

    #[inline]
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    #[inline]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    #[inline]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Checks if both entries refer to the same object instance.
    #[inline]
    pub fn is_same_object(&self, other: &Entry) -> bool {
        self.address() == other.address()
    }

    /// Returns a typed pointer to the object, if it is a `T`.
    pub fn downcast<T: Injectable>(&self) -> Option<ObjectPtr<T>> {
        self.any.clone().downcast::<T>().ok()
    }

    fn address(&self) -> *const () {
        ObjectPtr::as_ptr(&self.any) as *const ()
    }
}

impl<T: Injectable> From<ObjectPtr<T>> for Entry {
    fn from(object: ObjectPtr<T>) -> Self {
        Self::unnamed(object)
    }
}

/// Entries initialized together.
pub type Batch = Vec<Entry>;

/// Ordered batches of registered entries and the buffer of not yet batched ones.
#[derive(Default, Clone, Debug)]
pub struct Registry {
    batches: Vec<Batch>,
    pending: Vec<Entry>,
}

impl Registry {
    #[inline]
    pub fn push(&mut self, entry: Entry) {
        self.pending.push(entry);
    }

    /// Moves all pending entries into a single batch. Does nothing if there are no pending
    /// entries.
    pub fn close_async_batch(&mut self) {
        if self.pending.is_empty() {
            return;
        }

        self.batches.push(std::mem::take(&mut self.pending));
    }

    /// Moves every pending entry into its own batch, keeping registration order.
    pub fn close_sync_batch(&mut self) {
        self.batches.extend(self.pending.drain(..).map(|entry| vec![entry]));
    }

    #[inline]
    pub fn batches(&self) -> &[Batch] {
        &self.batches
    }

    #[inline]
    pub fn pending(&self) -> &[Entry] {
        &self.pending
    }

    /// Iterates over batched entries in batch-then-entry order.
    pub fn entries(&self) -> impl Iterator<Item = &Entry> {
        self.batches.iter().flatten()
    }

    /// Checks if the object referenced by `entry` is present in any batch.
    pub fn contains_object(&self, entry: &Entry) -> bool {
        self.entries().any(|candidate| candidate.is_same_object(entry))
    }

    /// Finds a batched entry with the given concrete type and exact name. An empty name matches
    /// only unnamed entries.
    pub fn find(&self, type_id: TypeId, name: &str) -> Option<&Entry> {
        self.entries().find(|entry| {
            entry.type_id == type_id && entry.name.as_deref().unwrap_or_default() == name
        })
    }
}
