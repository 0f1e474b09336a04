//! Graph resolvers wire registered objects together. The [Container](crate::container::Container)
//! only relies on the [GraphResolver] trait, so the wiring strategy can be replaced; by default
//! [TypeGraphResolver] matches [DependencyRequest]s by type and registration name.

use crate::error::ResolverError;
use crate::injectable::DependencyRequest;
use crate::registry::Entry;
use fxhash::{FxHashMap, FxHashSet};
#[cfg(test)]
use mockall::automock;
use std::any::TypeId;
use tracing::{debug, trace};

/// Capability of building an object graph out of provided entries.
#[cfg_attr(test, automock)]
pub trait GraphResolver {
    /// Registers a new entry. Must reject duplicated non-empty names.
    fn provide(&mut self, entry: &Entry) -> Result<(), ResolverError>;

    /// Wires all dependencies of provided objects. May create additional, implicit objects to
    /// satisfy dependencies.
    fn populate(&mut self) -> Result<(), ResolverError>;

    /// Returns all known objects, including implicit ones. Provided objects are never cloned, so
    /// identity can be compared with [Entry::is_same_object].
    fn objects(&self) -> Vec<Entry>;
}

/// Resolver matching unnamed requests by concrete type and named requests by name.
#[derive(Default, Debug)]
pub struct TypeGraphResolver {
    objects: Vec<Entry>,
    named: FxHashMap<String, usize>,
    unnamed: FxHashMap<TypeId, Vec<usize>>,
    populated: bool,
}

impl TypeGraphResolver {
    pub fn new() -> Self {
        Self::default()
    }

    fn insert(&mut self, entry: Entry) -> usize {
        let index = self.objects.len();
        match entry.name() {
            Some(name) => {
                self.named.insert(name.to_string(), index);
            }
            None => self.unnamed.entry(entry.type_id()).or_default().push(index),
        }

        self.objects.push(entry);
        index
    }

    fn resolve(
        &self,
        required_by: &'static str,
        request: &DependencyRequest,
    ) -> Result<usize, ResolverError> {
        if let Some(name) = &request.name {
            let index = *self
                .named
                .get(name)
                .ok_or_else(|| ResolverError::UnresolvedName {
                    name: name.clone(),
                    type_name: request.type_name,
                })?;

            let target = &self.objects[index];
            return if target.type_id() == request.type_id {
                Ok(index)
            } else {
                Err(ResolverError::NamedTypeMismatch {
                    name: name.clone(),
                    requested: request.type_name,
                    actual: target.type_name(),
                })
            };
        }

        match self.unnamed.get(&request.type_id).map(Vec::as_slice) {
            Some([index]) => Ok(*index),
            Some([_, _, ..]) => Err(ResolverError::AmbiguousType(request.type_name)),
            _ => Err(ResolverError::MissingDependency {
                type_name: request.type_name,
                required_by,
            }),
        }
    }

    // Creates the implicit objects allowed by any request, including requests of objects created
    // here, and returns the requests of every object by index.
    fn create_implicit_objects(&mut self) -> Vec<Vec<DependencyRequest>> {
        let mut requests = Vec::with_capacity(self.objects.len());
        let mut index = 0;
        while index < self.objects.len() {
            let entry = self.objects[index].clone();
            let dependencies = entry.object().dependencies();

            for request in &dependencies {
                let Some(constructor) = request.implicit else {
                    continue;
                };

                if request.name.is_some() || self.unnamed.contains_key(&request.type_id) {
                    continue;
                }

                debug!(
                    "Implicitly creating {} required by {}",
                    request.type_name,
                    entry.type_name()
                );
                self.insert(constructor());
            }

            requests.push(dependencies);
            index += 1;
        }

        requests
    }

    fn check_cycles(&self, edges: &[Vec<usize>]) -> Result<(), ResolverError> {
        let mut visited = FxHashSet::default();
        let mut in_progress = FxHashSet::default();

        for node in 0..edges.len() {
            if let Some(cycle_node) = find_cycle(node, edges, &mut visited, &mut in_progress) {
                return Err(ResolverError::DependencyCycle {
                    type_name: self.objects[cycle_node].type_name(),
                });
            }
        }

        Ok(())
    }
}

fn find_cycle(
    node: usize,
    edges: &[Vec<usize>],
    visited: &mut FxHashSet<usize>,
    in_progress: &mut FxHashSet<usize>,
) -> Option<usize> {
    if visited.contains(&node) {
        return None;
    }

    if !in_progress.insert(node) {
        return Some(node);
    }

    for &next in &edges[node] {
        if let Some(cycle_node) = find_cycle(next, edges, visited, in_progress) {
            return Some(cycle_node);
        }
    }

    in_progress.remove(&node);
    visited.insert(node);
    None
}

impl GraphResolver for TypeGraphResolver {
    fn provide(&mut self, entry: &Entry) -> Result<(), ResolverError> {
        if self.populated {
            return Err(ResolverError::AlreadyPopulated);
        }

        if let Some(name) = entry.name() {
            if self.named.contains_key(name) {
                return Err(ResolverError::DuplicateName(name.to_string()));
            }
        }

        self.insert(entry.clone());
        Ok(())
    }

    fn populate(&mut self) -> Result<(), ResolverError> {
        if self.populated {
            return Err(ResolverError::AlreadyPopulated);
        }

        self.populated = true;

        let requests = self.create_implicit_objects();
        let edges = self
            .objects
            .iter()
            .zip(&requests)
            .map(|(entry, requests)| {
                requests
                    .iter()
                    .map(|request| self.resolve(entry.type_name(), request))
                    .collect::<Result<Vec<_>, _>>()
            })
            .collect::<Result<Vec<_>, _>>()?;

        // nothing is injected into a cyclic graph
        self.check_cycles(&edges)?;

        for ((entry, requests), targets) in self.objects.iter().zip(&requests).zip(&edges) {
            for (request, &target) in requests.iter().zip(targets) {
                trace!(
                    "Injecting {} into {}.{}",
                    self.objects[target].type_name(),
                    entry.type_name(),
                    request.field
                );

                entry
                    .object()
                    .inject(request.field, self.objects[target].any().clone())
                    .map_err(|source| ResolverError::InjectFailed {
                        type_name: entry.type_name(),
                        field: request.field,
                        source,
                    })?;
            }
        }

        Ok(())
    }

    fn objects(&self) -> Vec<Entry> {
        self.objects.clone()
    }
}
