//! # flowstate-types
//!
//! Shared value snapshots and token-unit helpers used across the Flow State
//! workspace.
//!
//! Every monetary quantity is an arbitrary-precision signed integer
//! ([`num_bigint::BigInt`]): token amounts carry 18 decimals and flow rates
//! are expressed in base units per second. Big integers serialize as
//! base-10 strings so that JSON and TOML consumers never lose precision.
//!
//! ## Modules
//!
//! - [`snapshot`] - Pool, recipient, flow-rate change and buffer parameters
//! - [`interval`] - Time intervals and per-second rate conversion
//! - [`units`] - Decimal token amount parsing and formatting

pub mod interval;
pub mod snapshot;
pub mod units;

pub use num_bigint::BigInt;

/// Decimals of a standard streaming token (wei-style precision).
pub const TOKEN_DECIMALS: u32 = 18;

/// Base units per whole token (10^18).
pub const WEI_PER_TOKEN: u128 = 1_000_000_000_000_000_000;

/// Largest supported decimals: a 256-bit amount has at most 78 digits.
pub const MAX_DECIMALS: u32 = 77;

/// Error types for type-level parsing and conversion.
#[derive(Debug, thiserror::Error)]
pub enum TypesError {
    /// The amount string was empty.
    #[error("amount is empty")]
    EmptyAmount,

    /// The amount contains a character that is not a digit or a single decimal point.
    #[error("invalid amount {0:?}")]
    InvalidAmount(String),

    /// The amount has more fractional digits than the token supports.
    #[error("too many decimal places: {found} > {max}")]
    TooManyDecimals {
        /// Fractional digits found in the input.
        found: usize,
        /// Maximum fractional digits allowed.
        max: u32,
    },

    /// Requested decimals exceed [`MAX_DECIMALS`].
    #[error("decimals {decimals} exceed the maximum of {max}")]
    DecimalsOutOfRange {
        /// Decimals requested.
        decimals: u32,
        /// Maximum decimals supported.
        max: u32,
    },

    /// Unknown time interval name.
    #[error("unknown time interval {0:?}")]
    UnknownInterval(String),
}

/// Convenience result type for type-level operations.
pub type Result<T> = std::result::Result<T, TypesError>;
