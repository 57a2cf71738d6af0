//! Self-scaling tier manager
//!
//! Owns an append-only sequence of [`FixedFilter`] tiers, oldest first.
//! Inserts go to the newest tier; once its estimated fill reaches the
//! configured threshold a larger, tighter tier is appended. Queries and
//! removals span every tier.
//!
//! INVARIANTS:
//! - At least one tier exists; the newest is always the last element.
//! - Tiers are never removed, and only the newest one takes inserts.
//! - "insert, check fill, maybe grow" runs under one write lock, so two
//!   inserts can never both observe the same full tier and both grow.
//!
//! Growth sizing only sees each tier's `(m, k)`. Capacity is recovered as
//! `round(m * ln2 / k)` and the base false positive rate as `0.5^k`, so the
//! rate reached by later tiers can drift from the nominal target.

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, trace, warn};

use super::config::TierConfig;
use super::fixed_filter::{FixedFilter, GeometrySnapshot};
use super::parameters::FilterGeometry;
use super::slots::{BinarySlots, CountingSlots, DecrementableSlotStore, SlotStore};
use crate::error::FilterError;
use crate::metrics::{MetricsRecorder, NoOpMetrics};

/// Growing insert-only filter built from binary tiers.
pub type ScalableBloomFilter = TierManager<BinarySlots>;

/// Growing filter built from counting tiers, supports removal.
pub type CountingTierManager = TierManager<CountingSlots>;

/// Introspection view of one tier.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TierSnapshot {
    /// Position in the sequence, 0 = oldest
    pub index: usize,
    pub parameters: GeometrySnapshot,
    pub estimated_fill: f64,
    /// Exact fraction of activated slots
    pub current_fill: f64,
}

/// Tiered filter over one slot store variant.
///
/// `TierManager` is `Send + Sync`: share it behind an `Arc`.
pub struct TierManager<S: SlotStore = BinarySlots> {
    config: TierConfig,
    tiers: RwLock<Vec<FixedFilter<S>>>,
    metrics: Arc<dyn MetricsRecorder>,
}

impl<S: SlotStore> TierManager<S> {
    /// Create a manager with default growth settings.
    ///
    /// # Errors
    /// Rejects a zero capacity or a rate outside (0, 1).
    pub fn new(initial_capacity: usize, target_fpr: f64) -> Result<Self, FilterError> {
        Self::with_config(TierConfig {
            initial_capacity,
            target_fpr,
            ..TierConfig::default()
        })
    }

    /// Create a manager from a full configuration.
    ///
    /// Exactly one tier exists afterwards, sized for
    /// `config.initial_capacity` at `config.target_fpr`.
    pub fn with_config(config: TierConfig) -> Result<Self, FilterError> {
        config.validate()?;
        let first = FixedFilter::<S>::new(config.initial_capacity, config.target_fpr)?;

        debug!(
            kind = ?S::KIND,
            slot_count = first.geometry().slot_count(),
            hash_count = first.geometry().hash_count(),
            fill_threshold = config.fill_threshold,
            growth_factor = config.growth_factor,
            tightening_ratio = config.tightening_ratio,
            "Tier manager created"
        );

        let metrics: Arc<dyn MetricsRecorder> = Arc::new(NoOpMetrics);
        Ok(Self {
            config,
            tiers: RwLock::new(vec![first]),
            metrics,
        })
    }

    /// Attach a metrics recorder. Tiers that already exist are reported as
    /// spawned.
    pub fn with_metrics(mut self, metrics: Arc<dyn MetricsRecorder>) -> Self {
        for tier in self.tiers.get_mut().iter() {
            let geometry = tier.geometry();
            metrics.record_tier_spawned(
                geometry.slot_count(),
                geometry.hash_count(),
                tier.memory_bytes(),
            );
        }
        self.metrics = metrics;
        self
    }

    /// Insert an item into the newest tier, growing if that tier is full.
    pub fn add(&self, item: impl AsRef<[u8]>) {
        let start = Instant::now();
        {
            let mut tiers = self.tiers.write();
            let next = match tiers.last_mut() {
                Some(current) => {
                    current.add(item);
                    self.next_tier_geometry(current)
                }
                None => None,
            };
            if let Some(geometry) = next {
                self.append_tier(&mut tiers, geometry);
            }
        }
        self.metrics.record_insert(start.elapsed());
    }

    /// Test whether an item might have been added.
    ///
    /// Tiers are checked newest first; the first positive answer wins.
    /// Readers share the lock, so queries never wait on each other. They do
    /// wait behind an `add` or `remove` holding the write lock, including
    /// one that is allocating a new tier.
    pub fn might_contain(&self, item: impl AsRef<[u8]>) -> bool {
        let start = Instant::now();
        let item = item.as_ref();
        let found = self
            .tiers
            .read()
            .iter()
            .rev()
            .any(|tier| tier.might_contain(item));
        self.metrics.record_lookup(start.elapsed(), found);
        found
    }

    /// Snapshot every tier, oldest first.
    pub fn describe(&self) -> Vec<TierSnapshot> {
        self.tiers
            .read()
            .iter()
            .enumerate()
            .map(|(index, tier)| TierSnapshot {
                index,
                parameters: tier.parameters(),
                estimated_fill: tier.estimated_fill(),
                current_fill: tier.current_fill(),
            })
            .collect()
    }

    /// Number of tiers.
    pub fn tier_count(&self) -> usize {
        self.tiers.read().len()
    }

    /// Inserts across all tiers.
    pub fn total_inserts(&self) -> u64 {
        self.tiers.read().iter().map(FixedFilter::insert_count).sum()
    }

    /// Slot store bytes across all tiers.
    pub fn memory_bytes(&self) -> usize {
        self.tiers.read().iter().map(FixedFilter::memory_bytes).sum()
    }

    /// Compound false positive estimate: `1 - Π(1 - fpr_i)`.
    pub fn estimated_false_positive_rate(&self) -> f64 {
        let miss_all: f64 = self
            .tiers
            .read()
            .iter()
            .map(|tier| 1.0 - tier.estimated_false_positive_rate())
            .product();
        1.0 - miss_all
    }

    pub fn config(&self) -> &TierConfig {
        &self.config
    }

    /// Geometry for a new tier if `current` has crossed the fill threshold.
    fn next_tier_geometry(&self, current: &FixedFilter<S>) -> Option<FilterGeometry> {
        if current.estimated_fill() < self.config.fill_threshold {
            return None;
        }

        let (capacity, fpr) = current
            .geometry()
            .next_tier_targets(self.config.growth_factor, self.config.tightening_ratio);

        match FilterGeometry::new(capacity, fpr) {
            Ok(geometry) => Some(geometry),
            Err(err) => {
                warn!(capacity, fpr, error = %err, "Cannot size next tier; newest tier keeps filling");
                None
            }
        }
    }

    fn append_tier(&self, tiers: &mut Vec<FixedFilter<S>>, geometry: FilterGeometry) {
        let tier = FixedFilter::<S>::with_geometry(geometry);
        info!(
            tier = tiers.len(),
            capacity = geometry.approximate_capacity(),
            slot_count = geometry.slot_count(),
            hash_count = geometry.hash_count(),
            "Tier grown"
        );
        self.metrics.record_tier_spawned(
            geometry.slot_count(),
            geometry.hash_count(),
            tier.memory_bytes(),
        );
        tiers.push(tier);
    }
}

impl<S: DecrementableSlotStore> TierManager<S> {
    /// Remove an item (best effort) from every tier that might hold it.
    ///
    /// All matching tiers are decremented, not just the first: the item may
    /// have been added again after a growth.
    pub fn remove(&self, item: impl AsRef<[u8]>) {
        let item = item.as_ref();
        let mut touched = 0;
        {
            let mut tiers = self.tiers.write();
            for tier in tiers.iter_mut() {
                if tier.might_contain(item) {
                    tier.remove(item);
                    touched += 1;
                }
            }
        }
        if touched > 0 {
            trace!(tiers = touched, "Item removed");
        }
        self.metrics.record_remove(touched);
    }
}

impl<S: SlotStore> fmt::Debug for TierManager<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TierManager")
            .field("kind", &S::KIND)
            .field("config", &self.config)
            .field("tiers", &self.tier_count())
            .finish()
    }
}
