//! # flowstate-qf
//!
//! Quadratic-funding matching estimates for streaming donations.
//!
//! A recipient's allocation units in a QF pool grow with the square of the
//! sum of square roots of individual contributions. When a donor edits one
//! stream, this crate projects the recipient's new units and the resulting
//! change in its matched flow rate, using integer arithmetic only.
//!
//! ## Modules
//!
//! - [`isqrt`] - Floor integer square root for big integers
//! - [`matching`] - Matching impact estimator

pub mod isqrt;
pub mod matching;

/// Error types for QF estimation.
#[derive(Debug, thiserror::Error)]
pub enum QfError {
    /// An input that must be non-negative was negative.
    #[error("{field} must be non-negative")]
    NegativeInput {
        /// Name of the offending field.
        field: &'static str,
    },
}

/// Convenience result type for QF operations.
pub type Result<T> = std::result::Result<T, QfError>;
