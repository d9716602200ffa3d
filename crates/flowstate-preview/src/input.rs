//! Snapshot input files for the preview binary.
//!
//! ```toml
//! [donation]
//! previous_amount = "0"
//! new_amount = "25"
//! interval = "month"      # optional, defaults to the configured interval
//!
//! [snapshot.pool]
//! total_flow_rate = "385802469135802"
//! total_units = "1200"
//!
//! [snapshot.recipient]
//! grantee_units = "40"
//! grantee_flow_rate = "12860082304526"
//!
//! [snapshot.governance]
//! minimum_deposit = "100000000000000000"
//! liquidation_period = "14400"
//! side_recipient_portion = "50"
//! total_inflow_rate = "0"
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use flowstate_types::interval::TimeInterval;

use crate::preview::{ChainSnapshot, DonationRequest};
use crate::Result;

/// Donation amounts as written in an input file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DonationInput {
    /// Amount per interval currently streaming.
    #[serde(default = "default_amount")]
    pub previous_amount: String,
    /// Amount per interval after the edit.
    pub new_amount: String,
    /// Interval of both amounts. Falls back to the configured interval.
    #[serde(default)]
    pub interval: Option<TimeInterval>,
}

fn default_amount() -> String {
    "0".to_string()
}

impl DonationInput {
    /// Resolve into a request, using `default_interval` when none was given.
    pub fn into_request(self, default_interval: TimeInterval) -> DonationRequest {
        DonationRequest {
            previous_amount: self.previous_amount,
            new_amount: self.new_amount,
            interval: self.interval.unwrap_or(default_interval),
        }
    }
}

/// A complete preview input file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreviewInput {
    /// The donor's edit.
    pub donation: DonationInput,
    /// Chain state observed so far.
    #[serde(default)]
    pub snapshot: ChainSnapshot,
}

impl PreviewInput {
    /// Parse an input file from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Read and parse an input file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }
}
