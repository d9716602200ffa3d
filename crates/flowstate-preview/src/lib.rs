//! # flowstate-preview
//!
//! The calling layer around the numeric core: turns a donor's edited amount
//! and the latest chain snapshot into a donation preview.
//!
//! The core functions assume every input is present. This crate owns the
//! boundary policy: when governance parameters or pool state have not been
//! read yet, the preview reports the value as indeterminate instead of
//! showing zero.
//!
//! ## Modules
//!
//! - [`config`] - Preview configuration file
//! - [`input`] - Snapshot input files
//! - [`preview`] - Donation preview assembly

pub mod config;
pub mod input;
pub mod preview;

use flowstate_buffer::BufferError;
use flowstate_qf::QfError;
use flowstate_types::TypesError;

/// Error types for preview operations.
#[derive(Debug, thiserror::Error)]
pub enum PreviewError {
    /// An amount or interval could not be parsed.
    #[error(transparent)]
    Types(#[from] TypesError),

    /// A donation amount parsed to a negative value.
    #[error("{field} must be non-negative, got {amount}")]
    NegativeAmount {
        /// Which amount was negative.
        field: &'static str,
        /// The amount as written in the request.
        amount: String,
    },

    /// Pool or recipient state violates the estimator's preconditions.
    #[error("invalid pool snapshot: {0}")]
    Qf(#[from] QfError),

    /// Governance parameters are out of range.
    #[error("invalid buffer parameters: {0}")]
    Buffer(#[from] BufferError),

    /// A file could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A TOML file could not be parsed.
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Convenience result type for preview operations.
pub type Result<T> = std::result::Result<T, PreviewError>;
