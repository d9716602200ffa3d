//! Matching impact estimator.
//!
//! Projects how one donor's flow-rate edit shifts a recipient's matched flow
//! from the pool, before any transaction is sent.
//!
//! ## Formula
//!
//! ```text
//! root      = √(grantee_units · 10^5) − √(previous / 10^6) + √(new / 10^6)
//! units'    = root² / 10^5
//! pool'     = total_units + (units' − grantee_units)
//! flow'     = units' · total_flow_rate / pool'      (0 when pool' = 0)
//! estimate  = flow' − grantee_flow_rate
//! ```
//!
//! The other donors' contributions stay folded inside `grantee_units`; only
//! the editing donor's square-root term is swapped. The result is an
//! estimate and is kept consistent with previews already shown to users,
//! so the scaling constants and truncating divisions must not change.

use num_bigint::BigInt;
use num_traits::{Signed, Zero};

use flowstate_types::snapshot::{FlowRateChange, PoolState, RecipientState};

use crate::isqrt::sqrt_big_int;
use crate::{QfError, Result};

/// Divisor applied to donor flow rates before taking their square root.
pub const FLOW_RATE_SCALE: u64 = 1_000_000;

/// Multiplier applied to units before the square root, removed after squaring.
pub const UNITS_SCALE: u64 = 100_000;

/// Project the recipient's allocation units after the donor's edit.
///
/// This is the square-root / square round trip on its own. With an
/// unchanged rate it returns `grantee_units` up to the rounding of one
/// floor square root.
pub fn projected_grantee_units(grantee_units: &BigInt, change: &FlowRateChange) -> BigInt {
    let flow_rate_scale = BigInt::from(FLOW_RATE_SCALE);
    let units_scale = BigInt::from(UNITS_SCALE);

    let scaled_previous = &change.previous_flow_rate / &flow_rate_scale;
    let scaled_new = &change.new_flow_rate / &flow_rate_scale;

    let root = sqrt_big_int(&(grantee_units * &units_scale)) - sqrt_big_int(&scaled_previous)
        + sqrt_big_int(&scaled_new);

    &root * &root / &units_scale
}

/// Estimate the change in the recipient's matched flow rate.
///
/// Returns a signed delta in base units per second. Negative values mean the
/// recipient would receive less from the pool.
///
/// With an unchanged rate the donor terms cancel, so the result is the same
/// for every rate: zero when the snapshot is self-consistent (units · 10^5 is
/// a perfect square and the recipient's flow rate is its pro-rata share),
/// otherwise the rounding residue of the square-root round trip.
///
/// Inputs are not validated: units and donor flow rates must be
/// non-negative. Use [`estimate_checked`] for untrusted snapshots.
pub fn calc_matching_impact_estimate(
    pool: &PoolState,
    recipient: &RecipientState,
    change: &FlowRateChange,
) -> BigInt {
    let new_grantee_units = projected_grantee_units(&recipient.grantee_units, change);
    let units_delta = &new_grantee_units - &recipient.grantee_units;
    let new_pool_units = &pool.total_units + &units_delta;

    let new_grantee_flow_rate = if new_pool_units.is_zero() {
        BigInt::zero()
    } else {
        &new_grantee_units * &pool.total_flow_rate / &new_pool_units
    };

    tracing::trace!(
        %new_grantee_units,
        %units_delta,
        %new_pool_units,
        %new_grantee_flow_rate,
        "QF: projected matching"
    );

    new_grantee_flow_rate - &recipient.grantee_flow_rate
}

/// Estimate the matching impact after checking input preconditions.
///
/// # Errors
///
/// - [`QfError::NegativeInput`] if total units, grantee units, or either
///   donor flow rate is negative
pub fn estimate_checked(
    pool: &PoolState,
    recipient: &RecipientState,
    change: &FlowRateChange,
) -> Result<BigInt> {
    let checks: [(&'static str, &BigInt); 4] = [
        ("total_units", &pool.total_units),
        ("grantee_units", &recipient.grantee_units),
        ("previous_flow_rate", &change.previous_flow_rate),
        ("new_flow_rate", &change.new_flow_rate),
    ];
    for (field, value) in checks {
        if value.is_negative() {
            return Err(QfError::NegativeInput { field });
        }
    }

    Ok(calc_matching_impact_estimate(pool, recipient, change))
}
