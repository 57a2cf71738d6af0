//! Tier manager configuration and validation
//!
//! # Example
//!
//! ```
//! use tiered_bloom::TierConfigBuilder;
//!
//! let config = TierConfigBuilder::new()
//!     .initial_capacity(10_000)
//!     .target_fpr(0.001)
//!     .fill_threshold(0.8)
//!     .build()
//!     .expect("valid config");
//! assert_eq!(config.growth_factor, 2.0);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{in_open_unit_interval, FilterError};

/// Configuration for a [`TierManager`](super::tiers::TierManager).
///
/// Ranges:
/// - `initial_capacity` > 0
/// - `target_fpr`, `fill_threshold`, `tightening_ratio` in (0, 1)
/// - `growth_factor` > 1
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TierConfig {
    /// Capacity of the first tier
    pub initial_capacity: usize,
    /// False positive target of the first tier
    pub target_fpr: f64,
    /// Estimated fill at which the newest tier stops taking inserts
    pub fill_threshold: f64,
    /// Capacity multiplier between consecutive tiers
    pub growth_factor: f64,
    /// False positive multiplier between consecutive tiers
    pub tightening_ratio: f64,
}

impl Default for TierConfig {
    fn default() -> Self {
        Self {
            initial_capacity: 1000,
            target_fpr: 0.01,
            fill_threshold: 0.85,
            growth_factor: 2.0,
            tightening_ratio: 0.5,
        }
    }
}

impl TierConfig {
    /// Create a new configuration with validation
    pub fn new(
        initial_capacity: usize,
        target_fpr: f64,
        fill_threshold: f64,
        growth_factor: f64,
        tightening_ratio: f64,
    ) -> Result<Self, FilterError> {
        let config = Self {
            initial_capacity,
            target_fpr,
            fill_threshold,
            growth_factor,
            tightening_ratio,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate every parameter against its range
    pub fn validate(&self) -> Result<(), FilterError> {
        if self.initial_capacity == 0 {
            return Err(FilterError::InvalidCapacity {
                capacity: self.initial_capacity,
            });
        }

        if !in_open_unit_interval(self.target_fpr) {
            return Err(FilterError::InvalidFalsePositiveRate {
                rate: self.target_fpr,
            });
        }

        if !in_open_unit_interval(self.fill_threshold) {
            return Err(FilterError::InvalidFillThreshold {
                threshold: self.fill_threshold,
            });
        }

        // Rejects NaN and infinity as well
        if !(self.growth_factor > 1.0 && self.growth_factor.is_finite()) {
            return Err(FilterError::InvalidGrowthFactor {
                factor: self.growth_factor,
            });
        }

        if !in_open_unit_interval(self.tightening_ratio) {
            return Err(FilterError::InvalidTighteningRatio {
                ratio: self.tightening_ratio,
            });
        }

        Ok(())
    }

    /// Builder-style method to set the initial capacity
    pub fn with_initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }

    /// Builder-style method to set target FPR
    pub fn with_target_fpr(mut self, fpr: f64) -> Self {
        self.target_fpr = fpr;
        self
    }

    /// Builder-style method to set the fill threshold
    pub fn with_fill_threshold(mut self, threshold: f64) -> Self {
        self.fill_threshold = threshold;
        self
    }
}

/// Builder for TierConfig with validation
///
/// Unset fields fall back to [`TierConfig::default`].
#[derive(Default)]
pub struct TierConfigBuilder {
    initial_capacity: Option<usize>,
    target_fpr: Option<f64>,
    fill_threshold: Option<f64>,
    growth_factor: Option<f64>,
    tightening_ratio: Option<f64>,
}

impl TierConfigBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the first tier's capacity (must be > 0)
    pub fn initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = Some(capacity);
        self
    }

    /// Set the first tier's false positive rate (must be in (0, 1))
    pub fn target_fpr(mut self, fpr: f64) -> Self {
        self.target_fpr = Some(fpr);
        self
    }

    /// Set the growth trigger (must be in (0, 1))
    pub fn fill_threshold(mut self, threshold: f64) -> Self {
        self.fill_threshold = Some(threshold);
        self
    }

    /// Set the capacity multiplier (must be > 1)
    pub fn growth_factor(mut self, factor: f64) -> Self {
        self.growth_factor = Some(factor);
        self
    }

    /// Set the false positive multiplier (must be in (0, 1))
    pub fn tightening_ratio(mut self, ratio: f64) -> Self {
        self.tightening_ratio = Some(ratio);
        self
    }

    /// Build the TierConfig, validating all parameters
    pub fn build(self) -> Result<TierConfig, FilterError> {
        let config = self.build_unchecked();
        config.validate()?;
        Ok(config)
    }

    /// Build without validation
    pub fn build_unchecked(self) -> TierConfig {
        let defaults = TierConfig::default();

        TierConfig {
            initial_capacity: self.initial_capacity.unwrap_or(defaults.initial_capacity),
            target_fpr: self.target_fpr.unwrap_or(defaults.target_fpr),
            fill_threshold: self.fill_threshold.unwrap_or(defaults.fill_threshold),
            growth_factor: self.growth_factor.unwrap_or(defaults.growth_factor),
            tightening_ratio: self.tightening_ratio.unwrap_or(defaults.tightening_ratio),
        }
    }
}
