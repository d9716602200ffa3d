//! Golden test vector generator for the Flow State numeric core.
//!
//! Generates `test_vectors.json` with fixed inputs and the exact outputs of
//! the integer square root, the matching impact estimator and the buffer
//! calculator. Other implementations of the same arithmetic (the web client
//! in particular) check themselves against this file.
//!
//! Usage:
//!   flowstate-testvec              # Generate test_vectors.json
//!   flowstate-testvec --verify     # Verify test vectors match expected values

use std::collections::BTreeMap;
use std::path::Path;

use num_bigint::BigInt;
use serde::{Deserialize, Serialize};

use flowstate_buffer::deposit::calc_buffer_delta;
use flowstate_qf::isqrt::sqrt_big_int;
use flowstate_qf::matching::calc_matching_impact_estimate;
use flowstate_types::snapshot::{FlowRateChange, PoolState, ProtocolBufferParams, RecipientState};

const VECTORS_PATH: &str = "tests/fixtures/test_vectors.json";

#[derive(Serialize, Deserialize)]
struct TestVectors {
    version: String,
    generated_by: String,
    vectors: BTreeMap<String, TestVector>,
}

#[derive(Serialize, Deserialize)]
struct TestVector {
    description: String,
    inputs: BTreeMap<String, String>,
    outputs: BTreeMap<String, String>,
}

fn big(s: &str) -> anyhow::Result<BigInt> {
    Ok(s.parse()?)
}

fn generate_isqrt_vectors() -> anyhow::Result<BTreeMap<String, TestVector>> {
    let mut vectors = BTreeMap::new();

    let cases = [
        ("isqrt_zero", "0"),
        ("isqrt_one", "1"),
        ("isqrt_below_square", "24"),
        ("isqrt_perfect_square", "25"),
        ("isqrt_u64_max", "18446744073709551615"),
        ("isqrt_ten_pow_40", "10000000000000000000000000000000000000000"),
        (
            "isqrt_above_u128",
            "340282366920938463463374607431768211456123456789",
        ),
    ];

    for (name, s) in cases {
        let root = sqrt_big_int(&big(s)?);
        vectors.insert(
            name.to_string(),
            TestVector {
                description: format!("sqrt_big_int({s})"),
                inputs: BTreeMap::from([("s".to_string(), s.to_string())]),
                outputs: BTreeMap::from([("root".to_string(), root.to_string())]),
            },
        );
    }

    Ok(vectors)
}

fn generate_matching_vectors() -> anyhow::Result<BTreeMap<String, TestVector>> {
    let mut vectors = BTreeMap::new();

    // (name, description, total_flow_rate, total_units, grantee_units,
    //  grantee_flow_rate, previous_flow_rate, new_flow_rate)
    let cases = [
        (
            "matching_increase_small",
            "Donor raises 10^12 -> 4*10^12 on a 10-unit recipient",
            "13000",
            "100",
            "10",
            "1300",
            "1000000000000",
            "4000000000000",
        ),
        (
            "matching_first_donation_empty_pool",
            "First donation into a pool with no units",
            "1000000",
            "0",
            "0",
            "0",
            "0",
            "4000000000000",
        ),
        (
            "matching_zero_pool_guard",
            "Pool units resolve to zero; recipient flow drops to zero",
            "5000",
            "0",
            "0",
            "321",
            "500000",
            "0",
        ),
        (
            "matching_unchanged_consistent",
            "Unchanged rate on a self-consistent snapshot",
            "1000000000",
            "5000",
            "10",
            "2000000",
            "380517503805",
            "380517503805",
        ),
        (
            "matching_negative_pool_flow",
            "Truncation toward zero on a negative numerator",
            "-100",
            "3",
            "0",
            "0",
            "0",
            "4000000000000",
        ),
        (
            "matching_token_scale_cancel",
            "Cancel a 1 token/month stream in a 1 token/s pool",
            "1000000000000000000",
            "212",
            "53",
            "250000000000000000",
            "380517503805",
            "0",
        ),
    ];

    for (name, description, tfr, tu, gu, gfr, prev, new) in cases {
        let pool = PoolState::new(big(tfr)?, big(tu)?);
        let recipient = RecipientState::new(big(gu)?, big(gfr)?);
        let change = FlowRateChange::new(big(prev)?, big(new)?);
        let estimate = calc_matching_impact_estimate(&pool, &recipient, &change);
        vectors.insert(
            name.to_string(),
            TestVector {
                description: description.to_string(),
                inputs: BTreeMap::from([
                    ("total_flow_rate".to_string(), tfr.to_string()),
                    ("total_units".to_string(), tu.to_string()),
                    ("grantee_units".to_string(), gu.to_string()),
                    ("grantee_flow_rate".to_string(), gfr.to_string()),
                    ("previous_flow_rate".to_string(), prev.to_string()),
                    ("new_flow_rate".to_string(), new.to_string()),
                ]),
                outputs: BTreeMap::from([("estimate".to_string(), estimate.to_string())]),
            },
        );
    }

    Ok(vectors)
}

fn generate_buffer_vectors() -> anyhow::Result<BTreeMap<String, TestVector>> {
    let mut vectors = BTreeMap::new();

    // (name, description, minimum_deposit, liquidation_period,
    //  side_recipient_portion, total_inflow_rate, previous, new)
    let cases = [
        (
            "buffer_first_stream_ten_percent_side",
            "0 -> 1000 with 10% side portion, period 3600, minimum 100",
            "100",
            "3600",
            "100",
            "0",
            "0",
            "1000",
        ),
        (
            "buffer_independent_floors",
            "Both portions below the minimum deposit",
            "1000000",
            "3600",
            "100",
            "0",
            "0",
            "100",
        ),
        (
            "buffer_existing_inflow",
            "Raise on top of existing inflow",
            "100",
            "3600",
            "100",
            "1000",
            "0",
            "1000",
        ),
        (
            "buffer_decrease_clamped",
            "Lowering a stream needs no extra deposit",
            "100",
            "3600",
            "100",
            "1000",
            "1000",
            "400",
        ),
        (
            "buffer_token_scale",
            "1 token/month, 4h period, 5% side, 0.1 token minimum",
            "100000000000000000",
            "14400",
            "50",
            "0",
            "0",
            "380517503805",
        ),
    ];

    for (name, description, min, period, side, inflow, prev, new) in cases {
        let params = ProtocolBufferParams::new(big(min)?, big(period)?, big(side)?, big(inflow)?);
        let change = FlowRateChange::new(big(prev)?, big(new)?);
        let delta = calc_buffer_delta(&change, &params);
        vectors.insert(
            name.to_string(),
            TestVector {
                description: description.to_string(),
                inputs: BTreeMap::from([
                    ("minimum_deposit".to_string(), min.to_string()),
                    ("liquidation_period".to_string(), period.to_string()),
                    ("side_recipient_portion".to_string(), side.to_string()),
                    ("total_inflow_rate".to_string(), inflow.to_string()),
                    ("previous_flow_rate".to_string(), prev.to_string()),
                    ("new_flow_rate".to_string(), new.to_string()),
                ]),
                outputs: BTreeMap::from([("buffer_delta".to_string(), delta.to_string())]),
            },
        );
    }

    Ok(vectors)
}

fn generate_all_vectors() -> anyhow::Result<TestVectors> {
    let mut all_vectors = BTreeMap::new();
    all_vectors.extend(generate_isqrt_vectors()?);
    all_vectors.extend(generate_matching_vectors()?);
    all_vectors.extend(generate_buffer_vectors()?);

    Ok(TestVectors {
        version: "1.0".to_string(),
        generated_by: "flowstate-testvec".to_string(),
        vectors: all_vectors,
    })
}

fn verify_vectors(vectors: &TestVectors) -> anyhow::Result<bool> {
    let regenerated = generate_all_vectors()?;
    let mut all_pass = true;

    for (name, expected) in &vectors.vectors {
        if let Some(actual) = regenerated.vectors.get(name) {
            if actual.outputs != expected.outputs {
                eprintln!("FAIL: {name}");
                eprintln!("  expected: {:?}", expected.outputs);
                eprintln!("  actual:   {:?}", actual.outputs);
                all_pass = false;
            } else {
                eprintln!("PASS: {name}");
            }
        } else {
            eprintln!("MISSING: {name}");
            all_pass = false;
        }
    }

    Ok(all_pass)
}

fn write_vectors(path: &Path, vectors: &TestVectors) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, serde_json::to_string_pretty(vectors)?)?;
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let path = Path::new(VECTORS_PATH);

    let vectors = if args.iter().any(|a| a == "--verify") && path.exists() {
        // Verify mode: load existing vectors and check
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)?
    } else {
        // Generate mode: produce test_vectors.json
        let vectors = generate_all_vectors()?;
        write_vectors(path, &vectors)?;
        eprintln!("Generated {} test vectors to {VECTORS_PATH}", vectors.vectors.len());
        vectors
    };

    if verify_vectors(&vectors)? {
        eprintln!("All test vectors verified successfully.");
        Ok(())
    } else {
        eprintln!("Test vector verification FAILED.");
        std::process::exit(1);
    }
}
