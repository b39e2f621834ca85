//! Parity, divisibility and factor removal.

use crate::errors::IntegerError;
use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::Zero;

/// Tells whether `x` is even.
pub fn is_even(x: &BigInt) -> bool {
    Integer::is_even(x)
}

/// Tells whether `x` is odd.
pub fn is_odd(x: &BigInt) -> bool {
    Integer::is_odd(x)
}

/// Tells whether `d` divides `x`. Only 0 is divisible by 0.
pub fn is_divisible(x: &BigInt, d: &BigInt) -> bool {
    if d.is_zero() {
        return x.is_zero();
    }
    (x % d).is_zero()
}

/// Tells whether `x ≡ y (mod m)`. A zero modulus means plain equality.
pub fn is_congruent(x: &BigInt, y: &BigInt, m: &BigInt) -> bool {
    is_divisible(&(x - y), m)
}

/// Removes every factor `f` from `x`.
///
/// Returns `(y, count)` where `count` is the largest power with `f^count | x` and `y = x / f^count`.
pub fn remove(x: &BigInt, f: &BigInt) -> Result<(BigInt, u64), IntegerError> {
    if f < &BigInt::from(2) {
        return Err(IntegerError::Value("factor must be > 1"));
    }
    if x.is_zero() {
        return Ok((BigInt::zero(), 0));
    }
    let mut value = x.clone();
    let mut count = 0;
    loop {
        let (quotient, remainder) = value.div_rem(f);
        if !remainder.is_zero() {
            return Ok((value, count));
        }
        value = quotient;
        count += 1;
    }
}
