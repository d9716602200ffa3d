//! Buffer sizing for split streams.
//!
//! Inflow to the splitting contract is forwarded as two streams:
//!
//! - **Main**: `(1000 - side_recipient_portion) / 1000` of the inflow
//! - **Side**: `side_recipient_portion / 1000` of the inflow
//!
//! Each stream carries its own deposit, `max(rate × liquidation_period,
//! minimum_deposit)`, or nothing when its rate is not positive. Flooring the
//! combined rate instead would understate the deposit whenever one portion
//! falls below the minimum and the other does not.
//!
//! ## Formula
//!
//! ```text
//! buffer(total) = deposit(total · main / 1000) + deposit(total · side / 1000)
//! delta         = max(buffer(inflow + new − previous) − buffer(inflow), 0)
//! ```

use num_bigint::BigInt;
use num_traits::{Signed, Zero};

use flowstate_types::snapshot::{FlowRateChange, ProtocolBufferParams};

use crate::{BufferError, Result};

/// Denominator of the side-recipient portion (parts per thousand).
pub const PORTION_DENOMINATOR: u32 = 1000;

/// Validate a protocol parameter set.
///
/// # Errors
///
/// - [`BufferError::InvalidPortion`] if the side portion is outside `0..=1000`
/// - [`BufferError::NegativeParameter`] if the minimum deposit, liquidation
///   period or current inflow is negative
pub fn validate_params(params: &ProtocolBufferParams) -> Result<()> {
    let portion = &params.side_recipient_portion;
    if portion.is_negative() || *portion > BigInt::from(PORTION_DENOMINATOR) {
        return Err(BufferError::InvalidPortion {
            portion: portion.to_string(),
        });
    }
    if params.minimum_deposit.is_negative() {
        return Err(BufferError::NegativeParameter {
            field: "minimum_deposit",
        });
    }
    if params.liquidation_period.is_negative() {
        return Err(BufferError::NegativeParameter {
            field: "liquidation_period",
        });
    }
    if params.total_inflow_rate.is_negative() {
        return Err(BufferError::NegativeParameter {
            field: "total_inflow_rate",
        });
    }
    Ok(())
}

/// Deposit required by a single stream at `rate`.
///
/// Zero for a non-positive rate, otherwise `rate × liquidation_period`
/// floored at the minimum deposit.
pub fn buffer_for_rate(rate: &BigInt, params: &ProtocolBufferParams) -> BigInt {
    if !rate.is_positive() {
        return BigInt::zero();
    }
    let buffer = rate * &params.liquidation_period;
    if buffer < params.minimum_deposit {
        params.minimum_deposit.clone()
    } else {
        buffer
    }
}

/// Combined deposit of the main and side streams for a total inflow.
pub fn split_buffer(total_rate: &BigInt, params: &ProtocolBufferParams) -> BigInt {
    let denominator = BigInt::from(PORTION_DENOMINATOR);
    let side_portion = &params.side_recipient_portion;
    let main_portion = &denominator - side_portion;

    let main_rate = total_rate * &main_portion / &denominator;
    let side_rate = total_rate * side_portion / &denominator;

    buffer_for_rate(&main_rate, params) + buffer_for_rate(&side_rate, params)
}

/// Additional deposit needed when a donor changes their flow rate.
///
/// Never negative: lowering a stream releases deposit on-chain, but that
/// refund is not part of what the donor has to fund up front.
///
/// Parameters are not validated here; see [`validate_params`].
pub fn calc_buffer_delta(change: &FlowRateChange, params: &ProtocolBufferParams) -> BigInt {
    let user_delta = change.delta();
    let old_total = &params.total_inflow_rate;
    let new_total = old_total + &user_delta;

    let old_buffer = split_buffer(old_total, params);
    let new_buffer = split_buffer(&new_total, params);
    let delta = &new_buffer - &old_buffer;

    tracing::trace!(
        %user_delta,
        %new_total,
        %old_buffer,
        %new_buffer,
        "buffer: computed deposit delta"
    );

    if delta.is_negative() {
        BigInt::zero()
    } else {
        delta
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn params(min: u64, period: u64, side: u64, inflow: u64) -> ProtocolBufferParams {
        ProtocolBufferParams::new(min, period, side, inflow)
    }

    #[test]
    fn test_first_stream_with_ten_percent_side() {
        let p = params(100, 3600, 100, 0);
        let change = FlowRateChange::new(0u64, 1000u64);
        // main 900 * 3600 = 3_240_000, side 100 * 3600 = 360_000
        assert_eq!(calc_buffer_delta(&change, &p), BigInt::from(3_600_000));
    }

    #[test]
    fn test_each_portion_floored_independently() {
        let p = params(1_000_000, 3600, 100, 0);
        let change = FlowRateChange::new(0u64, 100u64);
        // main 90 * 3600 = 324_000 -> 1_000_000; side 10 * 3600 = 36_000 -> 1_000_000
        assert_eq!(calc_buffer_delta(&change, &p), BigInt::from(2_000_000));
    }

    #[test]
    fn test_increase_on_existing_inflow() {
        let p = params(100, 3600, 100, 1000);
        let change = FlowRateChange::new(0u64, 1000u64);
        // old 3_600_000; new main 1800 * 3600 + side 200 * 3600 = 7_200_000
        assert_eq!(calc_buffer_delta(&change, &p), BigInt::from(3_600_000));
    }

    #[test]
    fn test_decrease_clamped_to_zero() {
        let p = params(100, 3600, 100, 1000);
        let change = FlowRateChange::new(1000u64, 0u64);
        assert_eq!(calc_buffer_delta(&change, &p), BigInt::zero());

        let change = FlowRateChange::new(1000u64, 400u64);
        assert_eq!(calc_buffer_delta(&change, &p), BigInt::zero());
    }

    #[test]
    fn test_no_side_recipient() {
        let p = params(0, 10, 0, 0);
        let change = FlowRateChange::new(0u64, 7u64);
        assert_eq!(calc_buffer_delta(&change, &p), BigInt::from(70));
    }

    #[test]
    fn test_portion_truncation() {
        let p = params(0, 10, 100, 0);
        let change = FlowRateChange::new(0u64, 7u64);
        // main 7 * 900 / 1000 = 6; side 7 * 100 / 1000 = 0 (no stream)
        assert_eq!(calc_buffer_delta(&change, &p), BigInt::from(60));
    }

    #[test]
    fn test_negative_total_needs_nothing() {
        let p = params(100, 3600, 100, 0);
        let change = FlowRateChange::new(500u64, 0u64);
        assert_eq!(split_buffer(&BigInt::from(-500), &p), BigInt::zero());
        assert_eq!(calc_buffer_delta(&change, &p), BigInt::zero());
    }

    #[test]
    fn test_buffer_for_rate() {
        let p = params(100, 3600, 0, 0);
        assert_eq!(buffer_for_rate(&BigInt::zero(), &p), BigInt::zero());
        assert_eq!(buffer_for_rate(&BigInt::from(-1), &p), BigInt::zero());
        assert_eq!(buffer_for_rate(&BigInt::from(1), &p), BigInt::from(3600));

        let p = params(10_000, 3600, 0, 0);
        assert_eq!(buffer_for_rate(&BigInt::from(1), &p), BigInt::from(10_000));
    }

    #[test]
    fn test_token_scale_values() {
        // 4 hour liquidation period, 1 token/month stream, 5% side portion.
        let rate: BigInt = "380517503805".parse().expect("rate");
        let min: BigInt = "100000000000000000".parse().expect("min");
        let p = ProtocolBufferParams::new(min.clone(), 14_400u64, 50u64, 0u64);
        let change = FlowRateChange::new(0u64, rate);
        // Both portions fall below the 0.1 token floor.
        assert_eq!(calc_buffer_delta(&change, &p), min * 2);
    }

    #[test]
    fn test_validate_params() {
        validate_params(&params(100, 3600, 100, 0)).expect("valid");
        validate_params(&params(0, 0, 0, 0)).expect("zeros are valid");
        validate_params(&params(0, 0, 1000, 0)).expect("all side is valid");

        let err = validate_params(&params(0, 0, 1001, 0)).expect_err("portion too large");
        assert!(matches!(err, BufferError::InvalidPortion { .. }));

        let p = ProtocolBufferParams::new(-1i64, 3600u64, 0u64, 0u64);
        let err = validate_params(&p).expect_err("negative minimum");
        assert!(matches!(err, BufferError::NegativeParameter { field: "minimum_deposit" }));

        let p = ProtocolBufferParams::new(0u64, -1i64, 0u64, 0u64);
        let err = validate_params(&p).expect_err("negative period");
        assert!(matches!(err, BufferError::NegativeParameter { field: "liquidation_period" }));

        let p = ProtocolBufferParams::new(100u64, 3600u64, 100u64, -1000i64);
        let err = validate_params(&p).expect_err("negative inflow");
        assert!(matches!(err, BufferError::NegativeParameter { field: "total_inflow_rate" }));
    }

    proptest! {
        #[test]
        fn prop_delta_never_negative(
            min in 0u64..1_000_000,
            period in 0u64..100_000,
            side in 0u64..=1000,
            inflow in 0u64..1_000_000_000,
            previous in 0u64..1_000_000_000,
            new in 0u64..1_000_000_000,
        ) {
            let p = params(min, period, side, inflow);
            let delta = calc_buffer_delta(&FlowRateChange::new(previous, new), &p);
            prop_assert!(!delta.is_negative());
        }

        #[test]
        fn prop_higher_rate_needs_at_least_as_much(
            min in 0u64..1_000_000,
            period in 0u64..100_000,
            side in 0u64..=1000,
            inflow in 0u64..1_000_000_000,
            a in 0u64..1_000_000_000,
            b in 0u64..1_000_000_000,
        ) {
            let p = params(min, period, side, inflow);
            let (low, high) = if a <= b { (a, b) } else { (b, a) };
            let low_delta = calc_buffer_delta(&FlowRateChange::new(0u64, low), &p);
            let high_delta = calc_buffer_delta(&FlowRateChange::new(0u64, high), &p);
            prop_assert!(low_delta <= high_delta);
        }
    }
}
