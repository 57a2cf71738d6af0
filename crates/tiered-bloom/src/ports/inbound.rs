//! Inbound Ports (Driving Ports)
//!
//! Implemented by both fixed filter variants and both tier managers, so
//! callers and test suites can be written once over any of them.

use crate::domain::{DecrementableSlotStore, FixedFilter, SlotStore, TierManager};

/// Probabilistic set membership.
pub trait MembershipFilter {
    /// Insert an item.
    fn insert(&mut self, item: &[u8]);

    /// `false` means definitely absent; `true` means possibly present.
    fn contains(&self, item: &[u8]) -> bool;

    /// Current false positive estimate.
    fn false_positive_rate(&self) -> f64;

    /// Bytes held by slot storage.
    fn allocated_bytes(&self) -> usize;
}

/// Membership filters that support best-effort removal.
pub trait RemovableMembership: MembershipFilter {
    /// Remove one previously inserted occurrence of an item.
    fn delete(&mut self, item: &[u8]);
}

impl<S: SlotStore> MembershipFilter for FixedFilter<S> {
    fn insert(&mut self, item: &[u8]) {
        self.add(item);
    }

    fn contains(&self, item: &[u8]) -> bool {
        self.might_contain(item)
    }

    fn false_positive_rate(&self) -> f64 {
        self.estimated_false_positive_rate()
    }

    fn allocated_bytes(&self) -> usize {
        self.memory_bytes()
    }
}

impl<S: DecrementableSlotStore> RemovableMembership for FixedFilter<S> {
    fn delete(&mut self, item: &[u8]) {
        self.remove(item);
    }
}

impl<S: SlotStore> MembershipFilter for TierManager<S> {
    fn insert(&mut self, item: &[u8]) {
        self.add(item);
    }

    fn contains(&self, item: &[u8]) -> bool {
        self.might_contain(item)
    }

    fn false_positive_rate(&self) -> f64 {
        self.estimated_false_positive_rate()
    }

    fn allocated_bytes(&self) -> usize {
        self.memory_bytes()
    }
}

impl<S: DecrementableSlotStore> RemovableMembership for TierManager<S> {
    fn delete(&mut self, item: &[u8]) {
        self.remove(item);
    }
}
