//! # flowstate-buffer
//!
//! Deposit ("buffer") requirements for streaming donations.
//!
//! The streaming protocol locks a security deposit for every open stream,
//! sized as `flow_rate × liquidation_period` and floored at a protocol-wide
//! minimum. Donations pass through a splitting contract that forwards a
//! fixed share of the inflow to a side recipient, so the main and side
//! streams are buffered independently.
//!
//! ## Modules
//!
//! - [`deposit`] - Per-stream buffer and the extra deposit a rate change needs

pub mod deposit;

/// Error types for buffer parameter validation.
#[derive(Debug, thiserror::Error)]
pub enum BufferError {
    /// Side-recipient portion is outside `0..=1000`.
    #[error("side recipient portion must be within 0..=1000, got {portion}")]
    InvalidPortion {
        /// The portion that was supplied, in base-10.
        portion: String,
    },

    /// A protocol parameter that must be non-negative was negative.
    #[error("{field} must be non-negative")]
    NegativeParameter {
        /// Name of the offending parameter.
        field: &'static str,
    },
}

/// Convenience result type for buffer operations.
pub type Result<T> = std::result::Result<T, BufferError>;
