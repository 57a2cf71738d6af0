//! Filter geometry derivation
//!
//! Formulas:
//! - m = ceil(-n*ln(p) / (ln(2)^2))  -- slot count
//! - k = max(1, round((m/n) * ln(2))) -- hash count
//! - FPR = (1 - e^(-kn/m))^k
//!
//! The inverse helpers recover an approximate capacity and base false
//! positive rate from `(m, k)` alone; the tier manager sizes each new tier
//! from them.

use serde::{Deserialize, Serialize};
use std::f64::consts::LN_2;

use crate::error::{in_open_unit_interval, FilterError};

/// Lower clamp for any derived false positive target.
pub const MIN_FALSE_POSITIVE_RATE: f64 = 1e-12;

/// Upper clamp for the base rate recovered from a tier's hash count.
pub const MAX_BASE_FALSE_POSITIVE_RATE: f64 = 0.25;

/// Slot count and hash count of a filter. Fixed for the filter's lifetime.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FilterGeometry {
    /// Number of slots (m)
    slot_count: usize,
    /// Number of hash functions (k)
    hash_count: usize,
}

impl FilterGeometry {
    /// Derive the optimal geometry for `capacity` items at `false_positive_rate`.
    pub fn new(capacity: usize, false_positive_rate: f64) -> Result<Self, FilterError> {
        if capacity == 0 {
            return Err(FilterError::InvalidCapacity { capacity });
        }
        if !in_open_unit_interval(false_positive_rate) {
            return Err(FilterError::InvalidFalsePositiveRate {
                rate: false_positive_rate,
            });
        }

        let n = capacity as f64;
        let m = (-(n * false_positive_rate.ln()) / (LN_2 * LN_2)).ceil();
        let slot_count = (m as usize).max(1);
        let hash_count = (((slot_count as f64 / n) * LN_2).round() as usize).max(1);

        Ok(Self {
            slot_count,
            hash_count,
        })
    }

    /// Use an explicit geometry. Both values must be at least 1.
    pub fn from_raw(slot_count: usize, hash_count: usize) -> Result<Self, FilterError> {
        if slot_count == 0 || hash_count == 0 {
            return Err(FilterError::InvalidGeometry {
                slots: slot_count,
                hashes: hash_count,
            });
        }
        Ok(Self {
            slot_count,
            hash_count,
        })
    }

    /// Number of slots (m).
    pub fn slot_count(&self) -> usize {
        self.slot_count
    }

    /// Number of hash functions (k).
    pub fn hash_count(&self) -> usize {
        self.hash_count
    }

    /// Approximate the capacity this geometry was derived for:
    /// `round(m * ln2 / k)`, at least 1.
    ///
    /// The exact original capacity is not retained, so this is only the
    /// inverse of the derivation up to rounding.
    pub fn approximate_capacity(&self) -> usize {
        ((self.slot_count as f64 * LN_2 / self.hash_count as f64).round() as usize).max(1)
    }

    /// Approximate the base false positive rate as `0.5^k`, the rate reached
    /// at the optimal hash count, clamped to `[1e-12, 0.25]`.
    pub fn approximate_base_fpr(&self) -> f64 {
        0.5f64
            .powi(self.hash_count.min(i32::MAX as usize) as i32)
            .clamp(MIN_FALSE_POSITIVE_RATE, MAX_BASE_FALSE_POSITIVE_RATE)
    }

    /// Capacity and false positive target for the tier that follows this one.
    pub fn next_tier_targets(&self, growth_factor: f64, tightening_ratio: f64) -> (usize, f64) {
        let capacity = (self.approximate_capacity() as f64 * growth_factor).ceil() as usize;
        let fpr = (self.approximate_base_fpr() * tightening_ratio).max(MIN_FALSE_POSITIVE_RATE);
        (capacity.max(1), fpr)
    }

    /// Expected fraction of activated slots after `n` uniform insertions.
    pub fn expected_fill(&self, n: usize) -> f64 {
        let exponent = -(self.hash_count as f64) * (n as f64) / (self.slot_count as f64);
        1.0 - exponent.exp()
    }

    /// Expected false positive rate after `n` insertions.
    pub fn expected_fpr(&self, n: usize) -> f64 {
        calculate_fpr(self.slot_count, n, self.hash_count)
    }
}

/// Calculate the false positive rate for given parameters
///
/// Formula: FPR = (1 - e^(-kn/m))^k
pub fn calculate_fpr(m: usize, n: usize, k: usize) -> f64 {
    if m == 0 {
        return 1.0;
    }
    let exponent = -(k as f64) * (n as f64) / (m as f64);
    (1.0 - exponent.exp()).powi(k as i32)
}
