//! On-chain state snapshots consumed by the matching and buffer calculators.
//!
//! Each value is an immutable copy of what the chain reader observed at one
//! moment. Nothing here is mutated after construction; every calculation is
//! invoked fresh with the latest snapshot.

use num_bigint::BigInt;
use num_traits::Zero;
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DisplayFromStr};

/// Aggregate state of a quadratic-funding distribution pool.
#[serde_as]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ts_rs::TS)]
pub struct PoolState {
    /// Sum of all distribution flow rates into the pool (base units per second).
    #[serde_as(as = "DisplayFromStr")]
    #[ts(type = "string")]
    pub total_flow_rate: BigInt,
    /// Sum of all members' allocation units. Never negative.
    #[serde_as(as = "DisplayFromStr")]
    #[ts(type = "string")]
    pub total_units: BigInt,
}

impl PoolState {
    /// Create a pool snapshot.
    pub fn new(total_flow_rate: impl Into<BigInt>, total_units: impl Into<BigInt>) -> Self {
        Self {
            total_flow_rate: total_flow_rate.into(),
            total_units: total_units.into(),
        }
    }

    /// Whether the pool currently has no allocation weight at all.
    pub fn is_empty(&self) -> bool {
        self.total_units.is_zero()
    }
}

/// A single recipient's position within a pool.
#[serde_as]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ts_rs::TS)]
pub struct RecipientState {
    /// Current allocation units held by the recipient.
    #[serde_as(as = "DisplayFromStr")]
    #[ts(type = "string")]
    pub grantee_units: BigInt,
    /// Current incoming flow rate derived from those units.
    #[serde_as(as = "DisplayFromStr")]
    #[ts(type = "string")]
    pub grantee_flow_rate: BigInt,
}

impl RecipientState {
    /// Create a recipient snapshot.
    pub fn new(grantee_units: impl Into<BigInt>, grantee_flow_rate: impl Into<BigInt>) -> Self {
        Self {
            grantee_units: grantee_units.into(),
            grantee_flow_rate: grantee_flow_rate.into(),
        }
    }
}

/// A donor's flow rate to one recipient, before and after a proposed edit.
#[serde_as]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ts_rs::TS)]
pub struct FlowRateChange {
    /// Flow rate currently streaming.
    #[serde_as(as = "DisplayFromStr")]
    #[ts(type = "string")]
    pub previous_flow_rate: BigInt,
    /// Proposed flow rate. Zero cancels the stream.
    #[serde_as(as = "DisplayFromStr")]
    #[ts(type = "string")]
    pub new_flow_rate: BigInt,
}

impl FlowRateChange {
    /// Create a flow-rate change.
    pub fn new(previous_flow_rate: impl Into<BigInt>, new_flow_rate: impl Into<BigInt>) -> Self {
        Self {
            previous_flow_rate: previous_flow_rate.into(),
            new_flow_rate: new_flow_rate.into(),
        }
    }

    /// Signed difference `new - previous`.
    pub fn delta(&self) -> BigInt {
        &self.new_flow_rate - &self.previous_flow_rate
    }

    /// Whether the proposed rate equals the current one.
    pub fn is_unchanged(&self) -> bool {
        self.previous_flow_rate == self.new_flow_rate
    }

    /// Whether the change closes the stream.
    pub fn is_cancellation(&self) -> bool {
        self.new_flow_rate.is_zero() && !self.previous_flow_rate.is_zero()
    }
}

/// Streaming-protocol parameters that size the required deposit.
#[serde_as]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ts_rs::TS)]
pub struct ProtocolBufferParams {
    /// Protocol-wide deposit floor per stream.
    #[serde_as(as = "DisplayFromStr")]
    #[ts(type = "string")]
    pub minimum_deposit: BigInt,
    /// Liquidation grace period in seconds.
    #[serde_as(as = "DisplayFromStr")]
    #[ts(type = "string")]
    pub liquidation_period: BigInt,
    /// Share routed to the side recipient, out of 1000.
    #[serde_as(as = "DisplayFromStr")]
    #[ts(type = "string")]
    pub side_recipient_portion: BigInt,
    /// Aggregate inflow to the splitting contract before the change.
    #[serde_as(as = "DisplayFromStr")]
    #[ts(type = "string")]
    pub total_inflow_rate: BigInt,
}

impl ProtocolBufferParams {
    /// Create a parameter set.
    pub fn new(
        minimum_deposit: impl Into<BigInt>,
        liquidation_period: impl Into<BigInt>,
        side_recipient_portion: impl Into<BigInt>,
        total_inflow_rate: impl Into<BigInt>,
    ) -> Self {
        Self {
            minimum_deposit: minimum_deposit.into(),
            liquidation_period: liquidation_period.into(),
            side_recipient_portion: side_recipient_portion.into(),
            total_inflow_rate: total_inflow_rate.into(),
        }
    }
}
