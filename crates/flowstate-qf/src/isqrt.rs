//! Floor integer square root.
//!
//! Newton's method restricted to integer division. Starting from `s / 2`,
//! the iterate `x = (x + s / x) / 2` decreases monotonically until it reaches
//! `⌊√s⌋`, at which point the next step no longer decreases.

use num_bigint::BigInt;
use num_traits::One;

/// Calculate the integer square root `⌊√s⌋`.
///
/// `s` must be non-negative. Values of any magnitude are supported; no
/// floating point is involved, so precision does not degrade for very
/// large inputs.
pub fn sqrt_big_int(s: &BigInt) -> BigInt {
    if *s <= BigInt::one() {
        return s.clone();
    }

    let two = BigInt::from(2);
    let mut x0: BigInt = s / &two;
    let mut x1: BigInt = (&x0 + s / &x0) / &two;
    while x1 < x0 {
        x0 = x1;
        x1 = (&x0 + s / &x0) / &two;
    }
    x0
}
