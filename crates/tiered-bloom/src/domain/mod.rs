//! Domain Layer - Pure filter logic
//!
//! This layer contains:
//! - Hash functions (SHA-256 seed pair + double hashing)
//! - Geometry derivation and growth inversions
//! - Slot store variants (binary, counting)
//! - Fixed-capacity filter
//! - Tier manager and its configuration
//!
//! RULES:
//! - No I/O operations
//! - No async code
//! - Pure functions where possible

pub mod config;
pub mod fixed_filter;
pub mod hash_functions;
pub mod parameters;
pub mod slots;
pub mod tiers;

pub use config::{TierConfig, TierConfigBuilder};
pub use fixed_filter::{
    BloomFilter, CountingBloomFilter, FixedFilter, GeometrySnapshot, DEFAULT_FALSE_POSITIVE_RATE,
};
pub use hash_functions::{hash_pair, slot_index};
pub use parameters::{calculate_fpr, FilterGeometry};
pub use slots::{BinarySlots, CountingSlots, DecrementableSlotStore, SlotKind, SlotStore};
pub use tiers::{CountingTierManager, ScalableBloomFilter, TierManager, TierSnapshot};
