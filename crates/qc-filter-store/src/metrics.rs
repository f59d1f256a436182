//! Counters for filter store activity
//!
//! ## Usage
//!
//! ```ignore
//! let store = MemFilterStore::new(100);
//! store.add(filter)?;
//! assert_eq!(store.metrics().snapshot().filters_added, 1);
//! ```

use std::sync::atomic::{AtomicU64, Ordering};

/// Thread-safe counters for store operations.
#[derive(Debug, Default)]
pub struct StoreMetrics {
    /// Filters successfully registered
    pub filters_added: AtomicU64,
    /// Registrations rejected because the store was full
    pub rejected_capacity: AtomicU64,
    /// Registrations rejected because the id was taken
    pub rejected_duplicate: AtomicU64,
    /// Filters removed (including evictions)
    pub filters_removed: AtomicU64,
    /// Filters removed by the reaper
    pub filters_evicted: AtomicU64,
    /// Reaper sweeps performed
    pub reap_sweeps: AtomicU64,
}

impl StoreMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_added(&self) {
        self.filters_added.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_rejected_capacity(&self) {
        self.rejected_capacity.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_rejected_duplicate(&self) {
        self.rejected_duplicate.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_removed(&self) {
        self.filters_removed.fetch_add(1, Ordering::Relaxed);
    }

    /// Record one reaper sweep that evicted `evicted` filters
    pub fn record_sweep(&self, evicted: usize) {
        self.reap_sweeps.fetch_add(1, Ordering::Relaxed);
        self.filters_evicted
            .fetch_add(evicted as u64, Ordering::Relaxed);
    }

    /// Get current metrics snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            filters_added: self.filters_added.load(Ordering::Relaxed),
            rejected_capacity: self.rejected_capacity.load(Ordering::Relaxed),
            rejected_duplicate: self.rejected_duplicate.load(Ordering::Relaxed),
            filters_removed: self.filters_removed.load(Ordering::Relaxed),
            filters_evicted: self.filters_evicted.load(Ordering::Relaxed),
            reap_sweeps: self.reap_sweeps.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of [`StoreMetrics`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub filters_added: u64,
    pub rejected_capacity: u64,
    pub rejected_duplicate: u64,
    pub filters_removed: u64,
    pub filters_evicted: u64,
    pub reap_sweeps: u64,
}

impl MetricsSnapshot {
    /// Total rejected registrations
    pub fn rejected(&self) -> u64 {
        self.rejected_capacity + self.rejected_duplicate
    }
}
