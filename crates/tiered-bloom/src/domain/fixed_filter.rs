//! Fixed-capacity Bloom filter
//!
//! INVARIANTS:
//! - No false negatives: an item added and never removed always answers
//!   `might_contain == true`.
//! - `non_zero_slot_count` equals the number of slots with value > 0. It is
//!   maintained on every transition to or from zero, never by rescanning.
//! - Geometry never changes after construction.
//!
//! A standalone filter is not internally synchronized. Mutation takes
//! `&mut self`, so sharing one across threads needs an external lock.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::hash_functions::{hash_pair, slot_index};
use super::parameters::{calculate_fpr, FilterGeometry};
use super::slots::{
    BinarySlots, CountingSlots, DecrementableSlotStore, SlotKind, SlotStore,
};
use crate::error::FilterError;

/// False positive target used when none is given.
pub const DEFAULT_FALSE_POSITIVE_RATE: f64 = 0.01;

/// Insert-only Bloom filter, 1 bit per slot.
pub type BloomFilter = FixedFilter<BinarySlots>;

/// Bloom filter with byte counters, supports best-effort removal.
pub type CountingBloomFilter = FixedFilter<CountingSlots>;

/// Read-only view of a filter's geometry and counters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeometrySnapshot {
    pub kind: SlotKind,
    /// m
    pub slot_count: usize,
    /// k
    pub hash_count: usize,
    pub insert_count: u64,
    /// Always 0 for binary filters
    pub remove_count: u64,
    pub non_zero_slot_count: usize,
}

/// Bloom filter with a fixed geometry over a slot store variant.
#[derive(Clone, Debug)]
pub struct FixedFilter<S: SlotStore> {
    geometry: FilterGeometry,
    slots: S,
    insert_count: u64,
    remove_count: u64,
    non_zero_slots: usize,
    saturation_reported: bool,
}

impl<S: SlotStore> FixedFilter<S> {
    /// Create a filter sized for `capacity` items at `false_positive_rate`.
    ///
    /// # Errors
    /// `InvalidCapacity` if capacity is 0, `InvalidFalsePositiveRate` if the
    /// rate is not strictly between 0 and 1.
    pub fn new(capacity: usize, false_positive_rate: f64) -> Result<Self, FilterError> {
        let geometry = FilterGeometry::new(capacity, false_positive_rate)?;
        Ok(Self::with_geometry(geometry))
    }

    /// Create a filter sized for `capacity` items at a 1% false positive rate.
    pub fn with_capacity(capacity: usize) -> Result<Self, FilterError> {
        Self::new(capacity, DEFAULT_FALSE_POSITIVE_RATE)
    }

    /// Create a filter with an explicit geometry.
    pub fn with_geometry(geometry: FilterGeometry) -> Self {
        Self {
            geometry,
            slots: S::with_len(geometry.slot_count()),
            insert_count: 0,
            remove_count: 0,
            non_zero_slots: 0,
            saturation_reported: false,
        }
    }

    /// Insert an item.
    ///
    /// After insertion, `might_contain(item)` is guaranteed to return true
    /// until the item is removed.
    pub fn add(&mut self, item: impl AsRef<[u8]>) {
        let (h1, h2) = hash_pair(item.as_ref());
        let m = self.geometry.slot_count();

        for i in 0..self.geometry.hash_count() {
            let index = slot_index(h1, h2, i, m);
            let prior = self.slots.activate(index);
            if prior == 0 {
                self.non_zero_slots += 1;
            } else if S::KIND == SlotKind::Counting && prior >= S::MAX_COUNT - 1 {
                self.report_saturation(index);
            }
        }
        self.insert_count += 1;
    }

    /// Test whether an item might be in the filter.
    ///
    /// Returns:
    /// - `true` if the item might be in the set (could be a false positive)
    /// - `false` if the item is definitely not in the set
    pub fn might_contain(&self, item: impl AsRef<[u8]>) -> bool {
        let (h1, h2) = hash_pair(item.as_ref());
        let m = self.geometry.slot_count();

        (0..self.geometry.hash_count()).all(|i| self.slots.is_activated(slot_index(h1, h2, i, m)))
    }

    /// Theoretical fraction of activated slots: `1 - e^(-k*n'/m)` where
    /// `n' = inserts - removes`. O(1), no scan.
    pub fn estimated_fill(&self) -> f64 {
        self.geometry.expected_fill(self.live_count())
    }

    /// Exact fraction of activated slots.
    pub fn current_fill(&self) -> f64 {
        self.non_zero_slots as f64 / self.geometry.slot_count() as f64
    }

    /// Expected false positive rate at the current live item count.
    pub fn estimated_false_positive_rate(&self) -> f64 {
        calculate_fpr(
            self.geometry.slot_count(),
            self.live_count(),
            self.geometry.hash_count(),
        )
    }

    /// Snapshot of geometry and counters.
    pub fn parameters(&self) -> GeometrySnapshot {
        GeometrySnapshot {
            kind: S::KIND,
            slot_count: self.geometry.slot_count(),
            hash_count: self.geometry.hash_count(),
            insert_count: self.insert_count,
            remove_count: self.remove_count,
            non_zero_slot_count: self.non_zero_slots,
        }
    }

    pub fn geometry(&self) -> FilterGeometry {
        self.geometry
    }

    pub fn insert_count(&self) -> u64 {
        self.insert_count
    }

    pub fn remove_count(&self) -> u64 {
        self.remove_count
    }

    pub fn non_zero_slot_count(&self) -> usize {
        self.non_zero_slots
    }

    /// Inserts minus removes, floored at zero.
    pub fn live_count(&self) -> usize {
        self.insert_count.saturating_sub(self.remove_count) as usize
    }

    /// Bytes used by the slot store.
    pub fn memory_bytes(&self) -> usize {
        self.slots.memory_bytes()
    }

    /// Reset every slot and counter. Geometry is kept.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.insert_count = 0;
        self.remove_count = 0;
        self.non_zero_slots = 0;
        self.saturation_reported = false;
    }

    fn report_saturation(&mut self, index: usize) {
        if self.saturation_reported {
            return;
        }
        self.saturation_reported = true;
        debug!(
            slot = index,
            slot_count = self.geometry.slot_count(),
            inserts = self.insert_count,
            "Counting slot saturated; later removals may leave it set"
        );
    }
}

impl<S: DecrementableSlotStore> FixedFilter<S> {
    /// Remove an item (best effort).
    ///
    /// Each indexed slot gives back one count, flooring at zero. Removing an
    /// item that was never added, or removing it more often than it was
    /// added, can introduce false negatives for items sharing those slots.
    pub fn remove(&mut self, item: impl AsRef<[u8]>) {
        let (h1, h2) = hash_pair(item.as_ref());
        let m = self.geometry.slot_count();

        for i in 0..self.geometry.hash_count() {
            let index = slot_index(h1, h2, i, m);
            if self.slots.get(index) > 0 && self.slots.deactivate_one_count(index) == 0 {
                self.non_zero_slots -= 1;
            }
        }
        self.remove_count += 1;
    }
}
