//! Error types for the membership filter family

use thiserror::Error;

/// Errors raised when constructing filters or tier managers.
///
/// Every variant is an invalid-argument condition: construction is rejected
/// and no partial filter is created. Operations on a constructed filter are
/// total and never fail.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum FilterError {
    #[error("Invalid capacity: {capacity} (must be greater than 0)")]
    InvalidCapacity { capacity: usize },

    #[error("Invalid false positive rate: {rate} (must be strictly between 0 and 1)")]
    InvalidFalsePositiveRate { rate: f64 },

    #[error("Invalid fill threshold: {threshold} (must be strictly between 0 and 1)")]
    InvalidFillThreshold { threshold: f64 },

    #[error("Invalid growth factor: {factor} (must be greater than 1)")]
    InvalidGrowthFactor { factor: f64 },

    #[error("Invalid tightening ratio: {ratio} (must be strictly between 0 and 1)")]
    InvalidTighteningRatio { ratio: f64 },

    #[error("Invalid filter geometry: {slots} slots, {hashes} hash functions")]
    InvalidGeometry { slots: usize, hashes: usize },
}

impl FilterError {
    /// Whether this error belongs to the invalid-argument category.
    ///
    /// All current variants do; the method exists so callers can branch on
    /// the category without matching every variant.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(
            self,
            FilterError::InvalidCapacity { .. }
                | FilterError::InvalidFalsePositiveRate { .. }
                | FilterError::InvalidFillThreshold { .. }
                | FilterError::InvalidGrowthFactor { .. }
                | FilterError::InvalidTighteningRatio { .. }
                | FilterError::InvalidGeometry { .. }
        )
    }
}

/// Whether `value` lies in the open unit interval. NaN does not.
pub(crate) fn in_open_unit_interval(value: f64) -> bool {
    value > 0.0 && value < 1.0
}
