//! Integration test crate for the Flow State numeric core.
//!
//! This crate has no library code; it only contains integration tests
//! that exercise the donation preview flow across the workspace crates.
//!
//! Run all integration tests:
//! ```sh
//! cargo test -p flowstate-integration-tests
//! ```
