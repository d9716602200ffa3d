//! Integration test: arithmetic properties of the numeric core.
//!
//! Checks, through the public crate APIs only:
//! 1. Floor square root bounds, including magnitudes beyond 64 bits
//! 2. Matching estimate is monotonic in the new flow rate
//! 3. An unchanged rate has zero impact on a self-consistent snapshot
//! 4. Zero pool units resolve to `-grantee_flow_rate` without dividing
//! 5. Buffer for a first stream with a 10% side recipient
//! 6. Buffer delta never goes negative
//! 7. Units survive the square-root / square round trip within rounding

use num_bigint::BigInt;
use num_traits::{Signed, Zero};
use proptest::prelude::*;

use flowstate_buffer::deposit::calc_buffer_delta;
use flowstate_qf::isqrt::sqrt_big_int;
use flowstate_qf::matching::{
    calc_matching_impact_estimate, projected_grantee_units, UNITS_SCALE,
};
use flowstate_types::snapshot::{FlowRateChange, PoolState, ProtocolBufferParams, RecipientState};

/// Helper: a snapshot whose units round-trip exactly and whose recipient
/// flow rate is its pro-rata share of the pool.
fn consistent_snapshot(m: u64, others: u64, total_flow_rate: u64) -> (PoolState, RecipientState) {
    // 10 * m^2 * 10^5 = (1000 * m)^2
    let units = BigInt::from(10u64) * BigInt::from(m) * BigInt::from(m);
    let total_units = &units + BigInt::from(others);
    let total_flow_rate = BigInt::from(total_flow_rate);
    let grantee_flow_rate = if total_units.is_zero() {
        BigInt::zero()
    } else {
        &units * &total_flow_rate / &total_units
    };
    (
        PoolState::new(total_flow_rate, total_units),
        RecipientState::new(units, grantee_flow_rate),
    )
}

#[test]
fn isqrt_concrete_values() {
    assert_eq!(sqrt_big_int(&BigInt::from(0)), BigInt::from(0));
    assert_eq!(sqrt_big_int(&BigInt::from(1)), BigInt::from(1));
    assert_eq!(sqrt_big_int(&BigInt::from(24)), BigInt::from(4));
    assert_eq!(sqrt_big_int(&BigInt::from(25)), BigInt::from(5));
    assert_eq!(
        sqrt_big_int(&BigInt::from(10).pow(40)),
        BigInt::from(10).pow(20)
    );
}

#[test]
fn zero_pool_guard_returns_negated_flow() {
    let pool = PoolState::new(1_000_000u64, 0u64);
    let recipient = RecipientState::new(0u64, 777u64);
    let change = FlowRateChange::new(10_000_000u64, 20_000_000u64);
    // sqrt(10) = 3, sqrt(20) = 4: root = 1, 1 / 10^5 = 0 units, pool stays empty.
    assert_eq!(
        calc_matching_impact_estimate(&pool, &recipient, &change),
        BigInt::from(-777)
    );
}

#[test]
fn buffer_first_stream_with_side_recipient() {
    let params = ProtocolBufferParams::new(100u64, 3600u64, 100u64, 0u64);
    let change = FlowRateChange::new(0u64, 1000u64);
    assert_eq!(calc_buffer_delta(&change, &params), BigInt::from(3_600_000));
}

proptest! {
    #[test]
    fn isqrt_bounds(hi: u64, lo: u128) {
        let s = (BigInt::from(hi) << 128) + BigInt::from(lo);
        let r = sqrt_big_int(&s);
        prop_assert!(&r * &r <= s);
        let r1 = &r + 1;
        prop_assert!(&r1 * &r1 > s);
    }

    #[test]
    fn matching_monotonic_in_new_rate(
        m in 1u64..10_000,
        others in 0u64..1_000_000_000,
        total_flow_rate in 0u64..1_000_000_000_000_000,
        previous in 0u64..1_000_000_000_000,
        a in 0u64..100_000_000_000_000,
        b in 0u64..100_000_000_000_000,
    ) {
        // The donor's root term (< 1000) stays inside the recipient's root
        // sum (1000 * m), so the projected root never goes negative.
        let (pool, recipient) = consistent_snapshot(m, others, total_flow_rate);
        let (low, high) = if a <= b { (a, b) } else { (b, a) };

        let low_est = calc_matching_impact_estimate(
            &pool, &recipient, &FlowRateChange::new(previous, low));
        let high_est = calc_matching_impact_estimate(
            &pool, &recipient, &FlowRateChange::new(previous, high));
        prop_assert!(low_est <= high_est, "{} -> {}, {} -> {}", low, low_est, high, high_est);
    }

    #[test]
    fn unchanged_rate_has_no_impact(
        m in 0u64..1_000_000,
        others in 0u64..1_000_000_000,
        total_flow_rate in 0u64..u64::MAX,
        rate: u128,
    ) {
        let (pool, recipient) = consistent_snapshot(m, others, total_flow_rate);
        let change = FlowRateChange::new(rate, rate);
        prop_assert_eq!(
            calc_matching_impact_estimate(&pool, &recipient, &change),
            BigInt::zero()
        );
    }

    #[test]
    fn empty_pool_never_divides_by_zero(
        total_flow_rate: u64,
        grantee_flow_rate: u64,
        previous in 0u64..100_000_000_000,
        new in 0u64..100_000_000_000,
    ) {
        // Scaled rates stay below 10^5, so the root term stays below 317 and
        // squares to less than one unit.
        let pool = PoolState::new(total_flow_rate, 0u64);
        let recipient = RecipientState::new(0u64, grantee_flow_rate);
        let change = FlowRateChange::new(previous, new);
        prop_assert_eq!(
            calc_matching_impact_estimate(&pool, &recipient, &change),
            -BigInt::from(grantee_flow_rate)
        );
    }

    #[test]
    fn buffer_delta_non_negative(
        min in 0u64..1_000_000_000_000_000_000,
        period in 0u64..1_000_000,
        side in 0u64..=1000,
        inflow in 0u64..1_000_000_000_000,
        previous in 0u64..1_000_000_000_000,
        new in 0u64..1_000_000_000_000,
    ) {
        let params = ProtocolBufferParams::new(min, period, side, inflow);
        let delta = calc_buffer_delta(&FlowRateChange::new(previous, new), &params);
        prop_assert!(!delta.is_negative());
        if new <= previous {
            prop_assert!(delta.is_zero());
        }
    }

    #[test]
    fn units_round_trip_within_rounding(
        units in 1_000u128..=1_000_000_000_000_000_000_000_000,
        rate: u64,
    ) {
        let units = BigInt::from(units);
        let recovered = projected_grantee_units(&units, &FlowRateChange::new(rate, rate));
        let root = sqrt_big_int(&(&units * BigInt::from(UNITS_SCALE)));
        let tolerance = &root * 2 / BigInt::from(UNITS_SCALE) + 1;
        let shortfall = &units - &recovered;
        prop_assert!(!shortfall.is_negative());
        prop_assert!(shortfall <= tolerance, "lost {} of {}", shortfall, units);
    }
}
