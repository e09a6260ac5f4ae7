//! Synthesis Cache
//!
//! Maps synthetic type names to their realized descriptors. Entries are
//! added lazily and never evicted while the engine runs; [`SynthesisCache::clear`]
//! exists for test isolation only.
//!
//! Concurrency: the map entry for a name is created atomically (one
//! `OnceCell` per name), and the cell then admits exactly one initializer.
//! Concurrent first requests for the same name block on that initializer
//! and all observe the same descriptor. Requests for different names never
//! wait on each other.

use std::hash::BuildHasherDefault;
use std::sync::Arc;

use dashmap::DashMap;
use forge_types::TypeDescriptor;
use once_cell::sync::OnceCell;
use rustc_hash::FxHasher;

type Slot = Arc<OnceCell<Arc<TypeDescriptor>>>;

/// Process-lifetime memo of synthetic name to realized type
#[derive(Debug, Default)]
pub struct SynthesisCache {
    entries: DashMap<String, Slot, BuildHasherDefault<FxHasher>>,
}

impl SynthesisCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the realized type for `name`, if any
    pub fn get(&self, name: &str) -> Option<Arc<TypeDescriptor>> {
        self.entries
            .get(name)
            .and_then(|slot| slot.get().cloned())
    }

    /// Return the cached type for `name`, running `realize` if there is none
    ///
    /// `realize` runs at most once per name across all threads unless it
    /// fails, in which case the next caller tries again. The flag in the
    /// result is `true` for the caller whose `realize` produced the value.
    pub fn get_or_try_insert_with<F, E>(&self, name: &str, realize: F) -> Result<(Arc<TypeDescriptor>, bool), E>
    where
        F: FnOnce() -> Result<Arc<TypeDescriptor>, E>,
    {
        // Clone the slot out so the shard lock is not held while realizing
        let slot: Slot = Arc::clone(self.entries.entry(name.to_string()).or_default().value());

        let mut realized_here = false;
        let descriptor = slot.get_or_try_init(|| {
            realized_here = true;
            realize()
        })?;
        Ok((Arc::clone(descriptor), realized_here))
    }

    /// Number of realized entries
    pub fn len(&self) -> usize {
        self.entries.iter().filter(|entry| entry.value().get().is_some()).count()
    }

    /// Check if nothing has been realized
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every entry
    ///
    /// Must not race with synthesis: a realization in flight completes into
    /// a slot that is no longer reachable.
    pub fn clear(&self) {
        self.entries.clear();
    }
}
