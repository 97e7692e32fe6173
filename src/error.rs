//! Error types for distribution construction and reduction.

use thiserror::Error;

/// Errors raised by distribution operations.
///
/// Every variant is a precondition violation reported to the direct caller;
/// no operation retries or returns a partial result.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DistributionError {
    /// Total weight is zero, the input was empty, or a filter kept nothing.
    #[error("distribution has no probability mass")]
    EmptyDistribution,

    /// A supplied weight is negative or not finite.
    #[error("invalid weight {weight}: weights must be finite and non-negative")]
    InvalidWeight { weight: f64 },

    /// An index or element count exceeds the sequence length.
    #[error("index {index} out of range for sequence of length {len}")]
    IndexOutOfRange { index: usize, len: usize },
}

/// Result type alias
pub type Result<T> = std::result::Result<T, DistributionError>;
