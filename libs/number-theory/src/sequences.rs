//! Factorials, binomial coefficients, Fibonacci and Lucas numbers.

use crate::errors::IntegerError;
use num_bigint::{BigInt, BigUint};
use num_traits::{One, Signed, Zero};

fn checked_index(n: i64, message: &'static str) -> Result<u64, IntegerError> {
    u64::try_from(n).map_err(|_| IntegerError::Value(message))
}

// Product of every integer in `low..=high`, split in halves to keep the operands balanced.
fn range_product(low: u64, high: u64) -> BigInt {
    if low > high {
        return BigInt::one();
    }
    if high - low < 8 {
        return (low..=high).fold(BigInt::one(), |product, factor| product * factor);
    }
    let middle = low + (high - low) / 2;
    range_product(low, middle) * range_product(middle + 1, high)
}

/// Returns `n!`.
pub fn fac(n: i64) -> Result<BigInt, IntegerError> {
    let n = checked_index(n, "fac() of negative number")?;
    Ok(range_product(2, n))
}

/// Returns the binomial coefficient "`x` choose `k`". `x` may be negative, `k` may not.
pub fn bincoef(x: &BigInt, k: i64) -> Result<BigInt, IntegerError> {
    let mut k = checked_index(k, "binomial coefficient with negative k")?;
    if !x.is_negative() {
        let x = x.magnitude();
        let bound = BigUint::from(k);
        if x < &bound {
            return Ok(BigInt::zero());
        }
        let complement = x - &bound;
        if complement < bound {
            // Bounded by k, so it fits.
            k = complement.iter_u64_digits().next().unwrap_or(0);
        }
    }

    let mut result = BigInt::one();
    for i in 0..k {
        // The running product of i + 1 consecutive integers is always divisible by (i + 1)!.
        result = result * (x - i) / (i + 1);
    }
    Ok(result)
}

/// Alias of [`bincoef`].
pub fn comb(x: &BigInt, k: i64) -> Result<BigInt, IntegerError> {
    bincoef(x, k)
}

// Fast doubling: returns (F(n), F(n + 1)).
fn fib_pair(n: u64) -> (BigInt, BigInt) {
    if n == 0 {
        return (BigInt::zero(), BigInt::one());
    }
    let (a, b) = fib_pair(n / 2);
    let c = &a * (&b * 2 - &a);
    let d = &a * &a + &b * &b;
    if n % 2 == 0 {
        (c, d)
    } else {
        let sum = &c + &d;
        (d, sum)
    }
}

/// Returns the `n`-th Fibonacci number.
pub fn fib(n: i64) -> Result<BigInt, IntegerError> {
    let n = checked_index(n, "Fibonacci of negative number")?;
    Ok(fib_pair(n).0)
}

/// Returns `(F(n - 1), F(n))`, with `F(-1) = 1`.
pub fn fib2(n: i64) -> Result<(BigInt, BigInt), IntegerError> {
    let n = checked_index(n, "Fibonacci of negative number")?;
    if n == 0 {
        return Ok((BigInt::one(), BigInt::zero()));
    }
    Ok(fib_pair(n - 1))
}

/// Returns the `n`-th Lucas number.
pub fn lucas(n: i64) -> Result<BigInt, IntegerError> {
    let n = checked_index(n, "Lucas of negative number")?;
    let (current, next) = fib_pair(n);
    // L(n) = F(n - 1) + F(n + 1) = 2 F(n + 1) - F(n)
    Ok(next * 2 - current)
}

/// Returns `(L(n - 1), L(n))`, with `L(-1) = -1`.
pub fn lucas2(n: i64) -> Result<(BigInt, BigInt), IntegerError> {
    let n = checked_index(n, "Lucas of negative number")?;
    if n == 0 {
        return Ok((-BigInt::one(), BigInt::from(2)));
    }
    let (previous, current) = fib_pair(n - 1);
    let lucas_previous = &current * 2 - &previous;
    let lucas_current = previous * 2 + current;
    Ok((lucas_previous, lucas_current))
}
