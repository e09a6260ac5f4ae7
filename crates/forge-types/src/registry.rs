//! Type registry
//!
//! Maps qualified names to realized type descriptors. This is the "running
//! program" the engine instantiates against: harnesses define the types under
//! test here and the synthesizer realizes its stub implementations into it.

use std::hash::BuildHasherDefault;
use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use rustc_hash::FxHasher;

use crate::descriptor::TypeDescriptor;
use crate::error::TypeError;

type FxDashMap<K, V> = DashMap<K, V, BuildHasherDefault<FxHasher>>;

/// Concurrent registry of type descriptors, keyed by qualified name
#[derive(Debug, Default)]
pub struct TypeRegistry {
    types: FxDashMap<String, Arc<TypeDescriptor>>,
}

impl TypeRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a type under its name
    ///
    /// Insertion is atomic: of two concurrent definitions under one name
    /// exactly one succeeds, the other gets `DuplicateType`.
    pub fn define(&self, descriptor: TypeDescriptor) -> Result<Arc<TypeDescriptor>, TypeError> {
        match self.types.entry(descriptor.name().to_string()) {
            Entry::Occupied(entry) => Err(TypeError::DuplicateType {
                name: entry.key().clone(),
            }),
            Entry::Vacant(entry) => {
                let descriptor = Arc::new(descriptor);
                entry.insert(Arc::clone(&descriptor));
                Ok(descriptor)
            }
        }
    }

    /// Get a type by name
    pub fn get(&self, name: &str) -> Option<Arc<TypeDescriptor>> {
        self.types.get(name).map(|entry| Arc::clone(entry.value()))
    }

    /// Get a type by name, failing with `UndefinedType`
    pub fn lookup(&self, name: &str) -> Result<Arc<TypeDescriptor>, TypeError> {
        self.get(name).ok_or_else(|| TypeError::UndefinedType {
            name: name.to_string(),
        })
    }

    /// Check if a type is registered
    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    /// Unregister a type
    pub fn remove(&self, name: &str) -> Option<Arc<TypeDescriptor>> {
        self.types.remove(name).map(|(_, descriptor)| descriptor)
    }

    /// Unregister every synthetic type, returning how many were removed
    pub fn remove_synthetic(&self) -> usize {
        let before = self.types.len();
        self.types.retain(|_, descriptor| !descriptor.is_synthetic());
        before.saturating_sub(self.types.len())
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.types.iter().map(|entry| entry.key().clone()).collect();
        names.sort();
        names
    }

    /// Get the number of registered types
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}
