//! Slot stores backing the filters
//!
//! Two variants share one interface:
//! - [`BinarySlots`]: 1 bit per slot, an activated slot stays set.
//! - [`CountingSlots`]: 1 byte per slot, saturating at 255, supports
//!   decrement so items can be removed.
//!
//! A slot is activated iff its value is greater than zero.

use bitvec::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// Which slot store variant a filter uses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SlotKind {
    Binary,
    Counting,
}

/// Fixed-length array of saturating slot counters.
pub trait SlotStore: Clone + Debug + Send + Sync {
    /// Variant tag.
    const KIND: SlotKind;
    /// Largest value a slot can hold.
    const MAX_COUNT: u8;

    /// Allocate `len` zeroed slots.
    fn with_len(len: usize) -> Self;

    /// Number of slots.
    fn len(&self) -> usize;

    /// Whether the store has no slots.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Current value of a slot.
    fn get(&self, index: usize) -> u8;

    /// Whether a slot's value is non-zero.
    fn is_activated(&self, index: usize) -> bool {
        self.get(index) > 0
    }

    /// Activate a slot and return its prior value.
    ///
    /// Binary stores set the bit; counting stores increment, saturating at
    /// [`SlotStore::MAX_COUNT`].
    fn activate(&mut self, index: usize) -> u8;

    /// Zero every slot.
    fn clear(&mut self);

    /// Bytes used by the backing storage.
    fn memory_bytes(&self) -> usize;
}

/// Slot stores that can give back one count, enabling removal.
pub trait DecrementableSlotStore: SlotStore {
    /// Decrement a slot, flooring at zero, and return its new value.
    fn deactivate_one_count(&mut self, index: usize) -> u8;
}

/// One bit per slot.
#[derive(Clone, Debug)]
pub struct BinarySlots {
    bits: BitVec<u8, Lsb0>,
}

impl SlotStore for BinarySlots {
    const KIND: SlotKind = SlotKind::Binary;
    const MAX_COUNT: u8 = 1;

    fn with_len(len: usize) -> Self {
        Self {
            bits: bitvec![u8, Lsb0; 0; len],
        }
    }

    fn len(&self) -> usize {
        self.bits.len()
    }

    fn get(&self, index: usize) -> u8 {
        self.bits[index] as u8
    }

    fn activate(&mut self, index: usize) -> u8 {
        let prior = self.bits.replace(index, true);
        prior as u8
    }

    fn clear(&mut self) {
        self.bits.fill(false);
    }

    fn memory_bytes(&self) -> usize {
        self.bits.as_raw_slice().len()
    }
}

impl BinarySlots {
    /// Number of set bits, by full scan.
    pub fn count_ones(&self) -> usize {
        self.bits.count_ones()
    }
}

/// One saturating byte counter per slot.
#[derive(Clone, Debug)]
pub struct CountingSlots {
    counters: Vec<u8>,
}

impl SlotStore for CountingSlots {
    const KIND: SlotKind = SlotKind::Counting;
    const MAX_COUNT: u8 = u8::MAX;

    fn with_len(len: usize) -> Self {
        Self {
            counters: vec![0u8; len],
        }
    }

    fn len(&self) -> usize {
        self.counters.len()
    }

    fn get(&self, index: usize) -> u8 {
        self.counters[index]
    }

    fn activate(&mut self, index: usize) -> u8 {
        let slot = &mut self.counters[index];
        let prior = *slot;
        *slot = prior.saturating_add(1);
        prior
    }

    fn clear(&mut self) {
        self.counters.fill(0);
    }

    fn memory_bytes(&self) -> usize {
        self.counters.len()
    }
}

impl DecrementableSlotStore for CountingSlots {
    fn deactivate_one_count(&mut self, index: usize) -> u8 {
        let slot = &mut self.counters[index];
        *slot = slot.saturating_sub(1);
        *slot
    }
}
