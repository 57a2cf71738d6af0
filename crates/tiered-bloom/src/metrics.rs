//! Metrics hooks for tier manager operations
//!
//! Provides instrumentation points for monitoring insert and lookup
//! latencies, growth events, and slot memory.
//!
//! ## Usage
//!
//! ```
//! use std::sync::Arc;
//! use tiered_bloom::{Metrics, ScalableBloomFilter};
//!
//! let metrics = Arc::new(Metrics::new());
//! let filter = ScalableBloomFilter::new(100, 0.01)
//!     .unwrap()
//!     .with_metrics(metrics.clone());
//!
//! filter.add("item");
//! assert!(filter.might_contain("item"));
//! assert_eq!(metrics.snapshot().inserts, 1);
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Metrics collector for tier manager operations
///
/// Thread-safe counters; every update uses relaxed ordering.
#[derive(Default)]
pub struct Metrics {
    /// Total items inserted
    pub inserts: AtomicU64,
    /// Total lookups performed
    pub lookups: AtomicU64,
    /// Lookups that answered "might contain"
    pub lookups_positive: AtomicU64,
    /// Total remove calls
    pub removals: AtomicU64,
    /// Tiers created, including the first
    pub tiers_spawned: AtomicU64,
    /// Slots allocated across all tiers
    pub slots_allocated: AtomicU64,
    /// Hash functions summed over all tiers
    pub hash_functions_allocated: AtomicU64,
    /// Tiers decremented by remove calls
    pub tiers_decremented: AtomicU64,
    /// Bytes allocated for slot stores
    pub bytes_allocated: AtomicU64,
    /// Cumulative lookup time in nanoseconds
    pub lookup_time_ns: AtomicU64,
    /// Cumulative insert time in nanoseconds
    pub insert_time_ns: AtomicU64,
}

impl Metrics {
    /// Create a new metrics collector
    pub fn new() -> Self {
        Self::default()
    }

    /// Record tier creation
    ///
    /// # Arguments
    /// * `slot_count` - Tier size in slots (m)
    /// * `hash_count` - Number of hash functions (k)
    /// * `bytes` - Slot store allocation
    pub fn record_tier_spawned(&self, slot_count: usize, hash_count: usize, bytes: usize) {
        self.tiers_spawned.fetch_add(1, Ordering::Relaxed);
        self.slots_allocated
            .fetch_add(slot_count as u64, Ordering::Relaxed);
        self.hash_functions_allocated
            .fetch_add(hash_count as u64, Ordering::Relaxed);
        self.bytes_allocated.fetch_add(bytes as u64, Ordering::Relaxed);
    }

    /// Record item insertion
    pub fn record_insert(&self, duration: Duration) {
        self.inserts.fetch_add(1, Ordering::Relaxed);
        self.insert_time_ns
            .fetch_add(duration.as_nanos() as u64, Ordering::Relaxed);
    }

    /// Record lookup operation
    ///
    /// # Arguments
    /// * `duration` - Time taken for lookup
    /// * `found` - Whether the item might be present (possibly false positive)
    pub fn record_lookup(&self, duration: Duration, found: bool) {
        self.lookups.fetch_add(1, Ordering::Relaxed);
        self.lookup_time_ns
            .fetch_add(duration.as_nanos() as u64, Ordering::Relaxed);
        if found {
            self.lookups_positive.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Record a remove call and how many tiers it decremented
    pub fn record_remove(&self, tiers_touched: usize) {
        self.removals.fetch_add(1, Ordering::Relaxed);
        self.tiers_decremented
            .fetch_add(tiers_touched as u64, Ordering::Relaxed);
    }

    /// Get current metrics snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            inserts: self.inserts.load(Ordering::Relaxed),
            lookups: self.lookups.load(Ordering::Relaxed),
            lookups_positive: self.lookups_positive.load(Ordering::Relaxed),
            removals: self.removals.load(Ordering::Relaxed),
            tiers_spawned: self.tiers_spawned.load(Ordering::Relaxed),
            slots_allocated: self.slots_allocated.load(Ordering::Relaxed),
            hash_functions_allocated: self.hash_functions_allocated.load(Ordering::Relaxed),
            tiers_decremented: self.tiers_decremented.load(Ordering::Relaxed),
            bytes_allocated: self.bytes_allocated.load(Ordering::Relaxed),
            avg_lookup_ns: self.avg_lookup_time_ns(),
            avg_insert_ns: self.avg_insert_time_ns(),
        }
    }

    /// Calculate average lookup time in nanoseconds
    pub fn avg_lookup_time_ns(&self) -> u64 {
        let total = self.lookup_time_ns.load(Ordering::Relaxed);
        let count = self.lookups.load(Ordering::Relaxed);
        if count > 0 {
            total / count
        } else {
            0
        }
    }

    /// Calculate average insert time in nanoseconds
    pub fn avg_insert_time_ns(&self) -> u64 {
        let total = self.insert_time_ns.load(Ordering::Relaxed);
        let count = self.inserts.load(Ordering::Relaxed);
        if count > 0 {
            total / count
        } else {
            0
        }
    }

    /// Ratio of positive lookups to total lookups.
    ///
    /// Includes true positives as well as false positives.
    pub fn observed_positive_rate(&self) -> f64 {
        let total = self.lookups.load(Ordering::Relaxed);
        let positive = self.lookups_positive.load(Ordering::Relaxed);
        if total > 0 {
            positive as f64 / total as f64
        } else {
            0.0
        }
    }

    /// Reset all counters
    pub fn reset(&self) {
        self.inserts.store(0, Ordering::Relaxed);
        self.lookups.store(0, Ordering::Relaxed);
        self.lookups_positive.store(0, Ordering::Relaxed);
        self.removals.store(0, Ordering::Relaxed);
        self.tiers_spawned.store(0, Ordering::Relaxed);
        self.slots_allocated.store(0, Ordering::Relaxed);
        self.hash_functions_allocated.store(0, Ordering::Relaxed);
        self.tiers_decremented.store(0, Ordering::Relaxed);
        self.bytes_allocated.store(0, Ordering::Relaxed);
        self.lookup_time_ns.store(0, Ordering::Relaxed);
        self.insert_time_ns.store(0, Ordering::Relaxed);
    }
}

/// Point-in-time metrics snapshot
#[derive(Clone, Debug, Default)]
pub struct MetricsSnapshot {
    pub inserts: u64,
    pub lookups: u64,
    pub lookups_positive: u64,
    pub removals: u64,
    pub tiers_spawned: u64,
    pub slots_allocated: u64,
    pub hash_functions_allocated: u64,
    pub tiers_decremented: u64,
    pub bytes_allocated: u64,
    pub avg_lookup_ns: u64,
    pub avg_insert_ns: u64,
}

/// Trait for custom metrics recording implementations
///
/// Implement this trait to integrate with external metrics systems
/// like Prometheus, StatsD, or OpenTelemetry.
pub trait MetricsRecorder: Send + Sync {
    /// Record tier creation
    fn record_tier_spawned(&self, slot_count: usize, hash_count: usize, bytes: usize);

    /// Record item insertion
    fn record_insert(&self, duration: Duration);

    /// Record lookup operation
    fn record_lookup(&self, duration: Duration, found: bool);

    /// Record a remove call and how many tiers it decremented
    fn record_remove(&self, tiers_touched: usize);
}

/// No-op metrics recorder for when metrics are disabled
#[derive(Default)]
pub struct NoOpMetrics;

impl MetricsRecorder for NoOpMetrics {
    fn record_tier_spawned(&self, _: usize, _: usize, _: usize) {}
    fn record_insert(&self, _: Duration) {}
    fn record_lookup(&self, _: Duration, _: bool) {}
    fn record_remove(&self, _: usize) {}
}

impl MetricsRecorder for Metrics {
    fn record_tier_spawned(&self, slot_count: usize, hash_count: usize, bytes: usize) {
        Metrics::record_tier_spawned(self, slot_count, hash_count, bytes);
    }

    fn record_insert(&self, duration: Duration) {
        Metrics::record_insert(self, duration);
    }

    fn record_lookup(&self, duration: Duration, found: bool) {
        Metrics::record_lookup(self, duration, found);
    }

    fn record_remove(&self, tiers_touched: usize) {
        Metrics::record_remove(self, tiers_touched);
    }
}
