//! Greatest common divisors, modular inverses and exact division.

use crate::errors::IntegerError;
use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{One, Signed, Zero};
use std::mem;
use tracing::debug;

/// Outcome of a single attempt at inverting a value modulo some modulus.
enum Inverse {
    Found(BigInt),
    NotInvertible,
}

/// Returns the non-negative greatest common divisor of `a` and `b`.
///
/// `gcd(0, 0)` is 0.
pub fn gcd(a: &BigInt, b: &BigInt) -> BigInt {
    a.gcd(b)
}

/// Returns the non-negative lowest common multiple of `a` and `b`, 0 if either is 0.
pub fn lcm(a: &BigInt, b: &BigInt) -> BigInt {
    if a.is_zero() || b.is_zero() {
        return BigInt::zero();
    }
    (a / gcd(a, b) * b).abs()
}

/// Extended Euclidean algorithm.
///
/// Returns `(g, s, t)` such that `g = gcd(a, b) = a * s + b * t`. The returned `g` is never negative.
pub fn gcdext(a: &BigInt, b: &BigInt) -> (BigInt, BigInt, BigInt) {
    let (mut old_r, mut r) = (a.clone(), b.clone());
    let (mut old_s, mut s) = (BigInt::one(), BigInt::zero());
    let (mut old_t, mut t) = (BigInt::zero(), BigInt::one());

    while !r.is_zero() {
        let quotient = &old_r / &r;

        let next_r = &old_r - &quotient * &r;
        old_r = mem::replace(&mut r, next_r);

        let next_s = &old_s - &quotient * &s;
        old_s = mem::replace(&mut s, next_s);

        let next_t = &old_t - &quotient * &t;
        old_t = mem::replace(&mut t, next_t);
    }

    if old_r.is_negative() { (-old_r, -old_s, -old_t) } else { (old_r, old_s, old_t) }
}

fn try_invert(x: &BigInt, m: &BigInt) -> Inverse {
    if m.is_zero() {
        return Inverse::NotInvertible;
    }
    let modulus = m.abs();
    let (g, s, _) = gcdext(&x.mod_floor(&modulus), &modulus);
    if g.is_one() { Inverse::Found(s.mod_floor(&modulus)) } else { Inverse::NotInvertible }
}

/// Returns `y` such that `x * y ≡ 1 (mod m)`, with `0 <= y < |m|`.
pub fn invert(x: &BigInt, m: &BigInt) -> Result<BigInt, IntegerError> {
    if m.is_zero() {
        return Err(IntegerError::DivByZero("invert() division by 0"));
    }
    match try_invert(x, m) {
        Inverse::Found(inverse) => Ok(inverse),
        Inverse::NotInvertible => Err(IntegerError::DivByZero("invert() no inverse exists")),
    }
}

/// Returns `x` such that `b * x ≡ a (mod m)`.
///
/// The direct inverse of `b` is tried first. When `b` shares a factor with `m`, the common factor of the
/// whole triple is divided out and the reduced congruence is solved instead.
pub fn divm(a: &BigInt, b: &BigInt, m: &BigInt) -> Result<BigInt, IntegerError> {
    if let Inverse::Found(inverse) = try_invert(b, m) {
        return Ok((a * inverse).mod_floor(&m.abs()));
    }

    let common = gcd(&gcd(a, b), m);
    if common.is_zero() || common.is_one() {
        return Err(IntegerError::DivByZero("not invertible"));
    }
    debug!("divm reducing congruence by common factor {common}");
    let (a, b, m) = (a / &common, b / &common, m / &common);
    match try_invert(&b, &m) {
        Inverse::Found(inverse) => Ok((a * inverse).mod_floor(&m.abs())),
        Inverse::NotInvertible => Err(IntegerError::DivByZero("not invertible")),
    }
}

/// Returns the quotient `x / y` when `y` divides `x`.
///
/// A division that leaves a remainder is rejected rather than truncated.
pub fn divexact(x: &BigInt, y: &BigInt) -> Result<BigInt, IntegerError> {
    if y.is_zero() {
        return Err(IntegerError::DivByZero("divexact() division by 0"));
    }
    let (quotient, remainder) = x.div_rem(y);
    if !remainder.is_zero() {
        return Err(IntegerError::Value("divexact() requires a divisor that divides exactly"));
    }
    Ok(quotient)
}

#[cfg(test)]
mod test {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(123, 456, 3)]
    #[case(-123, 456, 3)]
    #[case(123, -456, 3)]
    #[case(0, 0, 0)]
    #[case(0, -7, 7)]
    #[case(17, 5, 1)]
    fn gcd_values(#[case] a: i64, #[case] b: i64, #[case] expected: i64) {
        assert_eq!(gcd(&a.into(), &b.into()), expected.into());
    }

    #[rstest]
    #[case(123, 456, 18696)]
    #[case(-4, 6, 12)]
    #[case(0, 5, 0)]
    #[case(5, 0, 0)]
    fn lcm_values(#[case] a: i64, #[case] b: i64, #[case] expected: i64) {
        assert_eq!(lcm(&a.into(), &b.into()), expected.into());
    }

    #[rstest]
    #[case(123, 456)]
    #[case(-240, 46)]
    #[case(240, -46)]
    #[case(0, 9)]
    #[case(9, 0)]
    #[case(0, 0)]
    fn gcdext_bezout(#[case] a: i64, #[case] b: i64) {
        let (a, b) = (BigInt::from(a), BigInt::from(b));
        let (g, s, t) = gcdext(&a, &b);
        assert_eq!(g, gcd(&a, &b));
        assert_eq!(g, &a * s + &b * t);
    }

    #[rstest]
    #[case(3, 7, 5)]
    #[case(-3, 7, 2)]
    #[case(10, 17, 12)]
    #[case(5, 1, 0)]
    #[case(3, -7, 5)]
    fn invert_values(#[case] x: i64, #[case] m: i64, #[case] expected: i64) {
        assert_eq!(invert(&x.into(), &m.into()), Ok(expected.into()));
    }

    #[rstest]
    #[case(4, 8)]
    #[case(3, 0)]
    fn invert_failures(#[case] x: i64, #[case] m: i64) {
        assert!(matches!(invert(&x.into(), &m.into()), Err(IntegerError::DivByZero(_))));
    }

    #[rstest]
    #[case(456, 123, 20, 12)]
    #[case(6, 12, 14, 4)]
    #[case(0, 1, 2, 0)]
    #[case(4, 8, 20, 3)]
    fn divm_values(#[case] a: i64, #[case] b: i64, #[case] m: i64, #[case] expected: i64) {
        assert_eq!(divm(&a.into(), &b.into(), &m.into()), Ok(expected.into()));
    }

    #[rstest]
    #[case(123, 456, 100)]
    #[case(1, 4, 8)]
    #[case(0, 0, 0)]
    fn divm_not_invertible(#[case] a: i64, #[case] b: i64, #[case] m: i64) {
        assert_eq!(divm(&a.into(), &b.into(), &m.into()), Err(IntegerError::DivByZero("not invertible")));
    }

    #[test]
    fn divexact_behaviour() {
        let x = BigInt::from(2).pow(200u32) * 3;
        assert_eq!(divexact(&x, &BigInt::from(3)), Ok(BigInt::from(2).pow(200u32)));
        assert!(matches!(divexact(&x, &BigInt::zero()), Err(IntegerError::DivByZero(_))));
        assert!(matches!(divexact(&BigInt::from(7), &BigInt::from(2)), Err(IntegerError::Value(_))));
    }
}
