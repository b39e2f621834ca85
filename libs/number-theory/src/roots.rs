//! Integer square roots, n-th roots and perfect power tests.

use crate::{errors::IntegerError, primes::is_small_prime};
use num_bigint::BigInt;
use num_traits::{One, Signed};

/// Returns the floor of the square root of `x`.
pub fn isqrt(x: &BigInt) -> Result<BigInt, IntegerError> {
    if x.is_negative() {
        return Err(IntegerError::Value("isqrt() of negative number"));
    }
    Ok(x.sqrt())
}

/// Returns `(s, t)` where `s = isqrt(x)` and `t = x - s*s`.
pub fn isqrt_rem(x: &BigInt) -> Result<(BigInt, BigInt), IntegerError> {
    if x.is_negative() {
        return Err(IntegerError::Value("isqrt_rem() of negative number"));
    }
    let root = x.sqrt();
    let remainder = x - &root * &root;
    Ok((root, remainder))
}

fn checked_root(x: &BigInt, n: i64, function: &'static str) -> Result<(BigInt, u32), IntegerError> {
    if n <= 0 {
        return Err(IntegerError::Value("n must be > 0"));
    }
    if n > 1 && x.is_negative() {
        return Err(IntegerError::Value(function));
    }
    let n = u32::try_from(n).map_err(|_| IntegerError::Value("n too large"))?;
    Ok((x.nth_root(n), n))
}

/// Returns `(y, exact)` where `y` is the floor of the `n`-th root of `x` and `exact` tells whether `y^n == x`.
pub fn iroot(x: &BigInt, n: i64) -> Result<(BigInt, bool), IntegerError> {
    let (root, n) = checked_root(x, n, "iroot() of negative number")?;
    let exact = &root.pow(n) == x;
    Ok((root, exact))
}

/// Returns `(y, r)` where `y` is the floor of the `n`-th root of `x` and `x = y^n + r`.
pub fn iroot_rem(x: &BigInt, n: i64) -> Result<(BigInt, BigInt), IntegerError> {
    let (root, n) = checked_root(x, n, "iroot_rem() of negative number")?;
    let remainder = x - root.pow(n);
    Ok((root, remainder))
}

/// Tells whether `x` is a perfect square. Negative values never are.
pub fn is_square(x: &BigInt) -> bool {
    if x.is_negative() {
        return false;
    }
    let root = x.sqrt();
    &(&root * &root) == x
}

/// Tells whether `x = y^n` for some integer `y` and some `n > 1`.
///
/// 0, 1 and -1 are perfect powers. A negative value is a perfect power only through an odd exponent.
pub fn is_power(x: &BigInt) -> bool {
    let magnitude = x.abs();
    if magnitude <= BigInt::one() {
        return true;
    }
    let negative = x.is_negative();
    // Any composite exponent implies a prime one, so only primes up to the bit length need checking.
    for exponent in 2..=magnitude.bits() {
        if !is_small_prime(exponent) || (negative && exponent == 2) {
            continue;
        }
        let Ok(exponent) = u32::try_from(exponent) else {
            break;
        };
        if magnitude.nth_root(exponent).pow(exponent) == magnitude {
            return true;
        }
    }
    false
}
