//! # Tiered Bloom
//!
//! Probabilistic membership filters: a fixed-capacity Bloom filter, a
//! counting variant that supports best-effort removal, and a tier manager
//! that composes either one to hold a target false positive rate as the
//! item count grows without a known bound.
//!
//! ## Architecture
//!
//! - **Domain Layer** (`domain/`): Pure filter logic, no I/O
//!   - `hash_functions`: one SHA-256 digest per item, double hashing for slot indices
//!   - `FilterGeometry`: slot/hash counts from capacity and error targets
//!   - `BinarySlots` / `CountingSlots`: slot store variants
//!   - `FixedFilter` (`BloomFilter`, `CountingBloomFilter`)
//!   - `TierManager` (`ScalableBloomFilter`, `CountingTierManager`)
//!   - `TierConfig` / `TierConfigBuilder`: growth configuration
//!
//! - **Ports Layer** (`ports/`): `MembershipFilter`, `RemovableMembership`
//!
//! - **Metrics** (`metrics`): counters and the `MetricsRecorder` hook
//!
//! ## Invariants
//!
//! - No false negatives: an item added and never removed always matches.
//! - FPR = (1 - e^(-kn/m))^k <= target at the designed capacity.
//! - Tiers are append-only; only the newest tier takes inserts.
//!
//! ## Usage Example
//!
//! ```
//! use tiered_bloom::{CountingBloomFilter, ScalableBloomFilter};
//!
//! let mut filter = CountingBloomFilter::new(1_000, 0.01)?;
//! filter.add("0xABCD");
//! assert!(filter.might_contain("0xABCD"));
//! filter.remove("0xABCD");
//!
//! let tiers = ScalableBloomFilter::new(10, 0.01)?;
//! for i in 0..1_000 {
//!     tiers.add(format!("item_{}", i));
//! }
//! assert!(tiers.tier_count() > 1);
//! assert!(tiers.might_contain("item_0"));
//! # Ok::<(), tiered_bloom::FilterError>(())
//! ```
//!
//! ## Thread Safety
//!
//! `TierManager` is `Send + Sync`; share it with an `Arc`. A standalone
//! `FixedFilter` needs `&mut` to mutate, so concurrent writers must wrap it
//! in their own lock.

pub mod domain;
pub mod error;
pub mod metrics;
pub mod ports;

// Re-exports for convenience
pub use domain::{
    BloomFilter, CountingBloomFilter, CountingTierManager, FilterGeometry, FixedFilter,
    GeometrySnapshot, ScalableBloomFilter, SlotKind, TierConfig, TierConfigBuilder, TierManager,
    TierSnapshot,
};
pub use error::FilterError;
pub use metrics::{Metrics, MetricsRecorder, MetricsSnapshot, NoOpMetrics};
pub use ports::{MembershipFilter, RemovableMembership};
