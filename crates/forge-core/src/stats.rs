//! Engine counters

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters of what the engine did, shared by all callers
#[derive(Debug, Default)]
pub struct ForgeStats {
    constructed: AtomicU64,
    bypassed: AtomicU64,
    construction_failures: AtomicU64,
    abandoned_constructors: AtomicU64,
    syntheses: AtomicU64,
    cache_hits: AtomicU64,
}

/// Point-in-time copy of [`ForgeStats`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    /// Instances produced by running a constructor
    pub constructed: u64,
    /// Instances produced without running a constructor
    pub bypassed: u64,
    /// Constructor chains that failed, panicked or timed out
    pub construction_failures: u64,
    /// Timed-out constructor threads left running in the background
    pub abandoned_constructors: u64,
    /// Synthetic types realized
    pub syntheses: u64,
    /// Synthesis requests answered from the cache
    pub cache_hits: u64,
}

impl ForgeStats {
    /// Create zeroed counters
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_constructed(&self) {
        self.constructed.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_bypassed(&self) {
        self.bypassed.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_construction_failure(&self) {
        self.construction_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_abandoned_constructor(&self) {
        self.abandoned_constructors.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_synthesis(&self) {
        self.syntheses.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_cache_hit(&self) {
        self.cache_hits.fetch_add(1, Ordering::Relaxed);
    }

    /// Read all counters
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            constructed: self.constructed.load(Ordering::Relaxed),
            bypassed: self.bypassed.load(Ordering::Relaxed),
            construction_failures: self.construction_failures.load(Ordering::Relaxed),
            abandoned_constructors: self.abandoned_constructors.load(Ordering::Relaxed),
            syntheses: self.syntheses.load(Ordering::Relaxed),
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
        }
    }

    /// Zero all counters
    pub fn reset(&self) {
        self.constructed.store(0, Ordering::Relaxed);
        self.bypassed.store(0, Ordering::Relaxed);
        self.construction_failures.store(0, Ordering::Relaxed);
        self.abandoned_constructors.store(0, Ordering::Relaxed);
        self.syntheses.store(0, Ordering::Relaxed);
        self.cache_hits.store(0, Ordering::Relaxed);
    }
}
