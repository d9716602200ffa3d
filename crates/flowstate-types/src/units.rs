//! Decimal token amounts.
//!
//! Converts human-entered strings such as `"12.5"` into base units and back,
//! without ever passing through floating point.

use num_bigint::{BigInt, Sign};
use num_traits::Zero;

use crate::{Result, TypesError, MAX_DECIMALS};

/// Parse a decimal amount into base units with `decimals` fractional digits.
///
/// Accepts an optional leading `-`, an integer part and an optional
/// fractional part separated by a single `.`. Either side of the point may
/// be empty, but not both.
///
/// # Errors
///
/// - [`TypesError::DecimalsOutOfRange`] if `decimals` exceeds [`MAX_DECIMALS`]
/// - [`TypesError::EmptyAmount`] if the input is blank
/// - [`TypesError::InvalidAmount`] on any non-digit character or a bare `.`
/// - [`TypesError::TooManyDecimals`] if the fraction is longer than `decimals`
pub fn parse_units(text: &str, decimals: u32) -> Result<BigInt> {
    if decimals > MAX_DECIMALS {
        return Err(TypesError::DecimalsOutOfRange {
            decimals,
            max: MAX_DECIMALS,
        });
    }

    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(TypesError::EmptyAmount);
    }

    let (negative, body) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed),
    };

    let (int_part, frac_part) = match body.split_once('.') {
        Some((int_part, frac_part)) => (int_part, frac_part),
        None => (body, ""),
    };

    let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if (int_part.is_empty() && frac_part.is_empty()) || !all_digits(int_part) || !all_digits(frac_part)
    {
        return Err(TypesError::InvalidAmount(text.to_string()));
    }

    if frac_part.len() > decimals as usize {
        return Err(TypesError::TooManyDecimals {
            found: frac_part.len(),
            max: decimals,
        });
    }

    let mut digits = String::with_capacity(int_part.len() + decimals as usize);
    digits.push_str(int_part);
    digits.push_str(frac_part);
    digits.push_str(&"0".repeat(decimals as usize - frac_part.len()));

    let magnitude = if digits.is_empty() {
        BigInt::zero()
    } else {
        digits
            .parse::<BigInt>()
            .map_err(|_| TypesError::InvalidAmount(text.to_string()))?
    };

    Ok(if negative { -magnitude } else { magnitude })
}

/// Render base units as a decimal string with `decimals` fractional digits.
///
/// Trailing fractional zeros are dropped, so `1500000000000000000` with 18
/// decimals renders as `"1.5"` and whole amounts carry no point at all.
pub fn format_units(value: &BigInt, decimals: u32) -> String {
    let width = decimals as usize + 1;
    let digits = value.magnitude().to_str_radix(10);
    let padded = format!("{digits:0>width$}");
    let (int_part, frac_part) = padded.split_at(padded.len() - decimals as usize);
    let frac_part = frac_part.trim_end_matches('0');

    let mut out = String::new();
    if value.sign() == Sign::Minus {
        out.push('-');
    }
    out.push_str(int_part);
    if !frac_part.is_empty() {
        out.push('.');
        out.push_str(frac_part);
    }
    out
}
