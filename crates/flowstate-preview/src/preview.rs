//! Donation preview assembly.
//!
//! Combines the buffer calculator and the matching estimator for one edited
//! donation. Values the chain reader has not produced yet surface as
//! [`BufferRequirement::Indeterminate`] or [`MatchingImpact::Indeterminate`];
//! the calculators are never invoked with guessed inputs.

use std::fmt;

use num_bigint::BigInt;
use num_traits::Signed;
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DisplayFromStr};

use flowstate_buffer::deposit::{calc_buffer_delta, validate_params};
use flowstate_qf::matching::estimate_checked;
use flowstate_types::interval::TimeInterval;
use flowstate_types::snapshot::{FlowRateChange, PoolState, ProtocolBufferParams, RecipientState};
use flowstate_types::units::{format_units, parse_units};

use crate::{PreviewError, Result};

/// Governance values as read from the chain, any of which may still be loading.
#[serde_as]
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GovernanceSnapshot {
    /// Protocol-wide deposit floor per stream.
    #[serde_as(as = "Option<DisplayFromStr>")]
    pub minimum_deposit: Option<BigInt>,
    /// Liquidation grace period in seconds.
    #[serde_as(as = "Option<DisplayFromStr>")]
    pub liquidation_period: Option<BigInt>,
    /// Side-recipient share out of 1000.
    #[serde_as(as = "Option<DisplayFromStr>")]
    pub side_recipient_portion: Option<BigInt>,
    /// Current aggregate inflow to the splitting contract.
    #[serde_as(as = "DisplayFromStr")]
    #[serde(default)]
    pub total_inflow_rate: BigInt,
}

impl GovernanceSnapshot {
    /// Buffer parameters, available only once every governance value is known.
    pub fn buffer_params(&self) -> Option<ProtocolBufferParams> {
        Some(ProtocolBufferParams {
            minimum_deposit: self.minimum_deposit.clone()?,
            liquidation_period: self.liquidation_period.clone()?,
            side_recipient_portion: self.side_recipient_portion.clone()?,
            total_inflow_rate: self.total_inflow_rate.clone(),
        })
    }
}

/// Everything the chain reader has observed for one recipient.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainSnapshot {
    /// Matching pool state, if loaded.
    #[serde(default)]
    pub pool: Option<PoolState>,
    /// Recipient's position in the pool, if loaded.
    #[serde(default)]
    pub recipient: Option<RecipientState>,
    /// Streaming-protocol governance values.
    #[serde(default)]
    pub governance: GovernanceSnapshot,
}

/// A donor's edited amount, as typed into the donation form.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DonationRequest {
    /// Amount per interval currently streaming, in whole tokens ("0" if none).
    pub previous_amount: String,
    /// Amount per interval after the edit, in whole tokens ("0" to cancel).
    pub new_amount: String,
    /// Interval both amounts refer to.
    #[serde(default)]
    pub interval: TimeInterval,
}

/// Extra deposit a donation needs.
#[serde_as]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "amount", rename_all = "snake_case")]
pub enum BufferRequirement {
    /// Governance values not loaded yet.
    Indeterminate,
    /// Additional deposit in base units (may be zero).
    Required(#[serde_as(as = "DisplayFromStr")] BigInt),
}

/// Change in the recipient's matched flow rate.
#[serde_as]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "flow_rate", rename_all = "snake_case")]
pub enum MatchingImpact {
    /// Pool or recipient state not loaded yet.
    Indeterminate,
    /// Signed change in base units per second.
    Delta(#[serde_as(as = "DisplayFromStr")] BigInt),
}

/// Result of previewing one donation edit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DonationPreview {
    /// Interval the preview is expressed in.
    pub interval: TimeInterval,
    /// The donor's flow rates in base units per second.
    pub change: FlowRateChange,
    /// Change in the recipient's matched flow rate.
    pub matching: MatchingImpact,
    /// Extra deposit the donor must hold.
    pub buffer: BufferRequirement,
}

impl DonationPreview {
    /// Matched flow change per display interval, if known.
    pub fn matching_per_interval(&self) -> Option<BigInt> {
        match &self.matching {
            MatchingImpact::Delta(rate) => Some(self.interval.per_interval(rate)),
            MatchingImpact::Indeterminate => None,
        }
    }

    /// One-line human summary with amounts rendered at `decimals`.
    pub fn summary(&self, decimals: u32) -> String {
        PreviewSummary {
            preview: self,
            decimals,
        }
        .to_string()
    }
}

struct PreviewSummary<'a> {
    preview: &'a DonationPreview,
    decimals: u32,
}

impl fmt::Display for PreviewSummary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let p = self.preview;
        let interval = p.interval;
        let stream = interval.per_interval(&p.change.new_flow_rate);
        write!(f, "{}/{interval} stream", format_units(&stream, self.decimals))?;

        match p.matching_per_interval() {
            Some(delta) => write!(
                f,
                ", matching {}{}/{interval}",
                if delta >= BigInt::from(0) { "+" } else { "" },
                format_units(&delta, self.decimals)
            )?,
            None => write!(f, ", matching unknown")?,
        }

        match &p.buffer {
            BufferRequirement::Required(amount) => {
                write!(f, ", buffer {}", format_units(amount, self.decimals))
            }
            BufferRequirement::Indeterminate => write!(f, ", buffer unknown"),
        }
    }
}

/// Build the preview for a donation edit against the latest snapshot.
///
/// Amounts are parsed with `decimals` fractional digits and converted from
/// the request's interval into per-second rates before reaching the core.
///
/// # Errors
///
/// - [`crate::PreviewError::Types`] if an amount does not parse
/// - [`crate::PreviewError::NegativeAmount`] if an amount is negative
/// - [`crate::PreviewError::Qf`] if the pool snapshot is negative
/// - [`crate::PreviewError::Buffer`] if governance values are out of range
pub fn preview_donation(
    request: &DonationRequest,
    snapshot: &ChainSnapshot,
    decimals: u32,
) -> Result<DonationPreview> {
    let interval = request.interval;
    let previous_amount = parse_units(&request.previous_amount, decimals)?;
    let new_amount = parse_units(&request.new_amount, decimals)?;
    for (field, amount, text) in [
        ("previous_amount", &previous_amount, &request.previous_amount),
        ("new_amount", &new_amount, &request.new_amount),
    ] {
        if amount.is_negative() {
            return Err(PreviewError::NegativeAmount {
                field,
                amount: text.clone(),
            });
        }
    }
    let change = FlowRateChange::new(
        interval.per_second(&previous_amount),
        interval.per_second(&new_amount),
    );

    let matching = match (&snapshot.pool, &snapshot.recipient) {
        (Some(pool), Some(recipient)) => {
            MatchingImpact::Delta(estimate_checked(pool, recipient, &change)?)
        }
        _ => {
            tracing::warn!("pool state not loaded, matching impact indeterminate");
            MatchingImpact::Indeterminate
        }
    };

    let buffer = match snapshot.governance.buffer_params() {
        Some(params) => {
            validate_params(&params)?;
            BufferRequirement::Required(calc_buffer_delta(&change, &params))
        }
        None => {
            tracing::warn!("governance parameters not loaded, buffer indeterminate");
            BufferRequirement::Indeterminate
        }
    };

    let preview = DonationPreview {
        interval,
        change,
        matching,
        buffer,
    };

    tracing::debug!(
        unchanged = preview.change.is_unchanged(),
        summary = %preview.summary(decimals),
        "donation preview"
    );

    Ok(preview)
}
