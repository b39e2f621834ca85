//! Jacobi, Legendre and Kronecker symbols.

use crate::errors::IntegerError;
use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{One, Signed, ToPrimitive, Zero};
use std::mem;

fn residue(x: &BigInt, modulus: u32) -> u32 {
    x.mod_floor(&BigInt::from(modulus)).to_u32().unwrap_or(0)
}

// `n` must be odd and positive.
fn jacobi_unchecked(a: &BigInt, n: &BigInt) -> i32 {
    let mut n = n.clone();
    let mut a = a.mod_floor(&n);
    let mut result = 1;

    while !a.is_zero() {
        let twos = a.trailing_zeros().unwrap_or(0);
        a >>= twos;
        if twos % 2 == 1 && matches!(residue(&n, 8), 3 | 5) {
            result = -result;
        }
        mem::swap(&mut a, &mut n);
        if residue(&a, 4) == 3 && residue(&n, 4) == 3 {
            result = -result;
        }
        a = a.mod_floor(&n);
    }

    if n.is_one() { result } else { 0 }
}

fn check_odd_positive(y: &BigInt) -> Result<(), IntegerError> {
    if !y.is_positive() || y.is_even() {
        return Err(IntegerError::Value("y must be odd and >0"));
    }
    Ok(())
}

/// Returns the Jacobi symbol `(x | y)`. `y` must be odd and positive.
pub fn jacobi(x: &BigInt, y: &BigInt) -> Result<i32, IntegerError> {
    check_odd_positive(y)?;
    Ok(jacobi_unchecked(x, y))
}

/// Returns the Legendre symbol `(x | y)`.
///
/// Primality of `y` is not verified, only that it is odd and positive; for a composite `y` the value is the
/// Jacobi symbol.
pub fn legendre(x: &BigInt, y: &BigInt) -> Result<i32, IntegerError> {
    check_odd_positive(y)?;
    Ok(jacobi_unchecked(x, y))
}

/// Returns the Kronecker symbol `(x | y)`, defined for every `y`.
pub fn kronecker(x: &BigInt, y: &BigInt) -> i32 {
    if y.is_zero() {
        return if x.abs().is_one() { 1 } else { 0 };
    }
    if x.is_even() && y.is_even() {
        return 0;
    }

    let twos = y.trailing_zeros().unwrap_or(0);
    let odd = y.abs() >> twos;
    let mut result = 1;
    if twos % 2 == 1 && matches!(residue(x, 8), 3 | 5) {
        result = -result;
    }
    if y.is_negative() && x.is_negative() {
        result = -result;
    }
    if odd.is_one() {
        return result;
    }
    result * jacobi_unchecked(x, &odd)
}

#[cfg(test)]
mod test {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(1, 1, 1)]
    #[case(2, 15, 1)]
    #[case(7, 15, -1)]
    #[case(5, 15, 0)]
    #[case(-1, 7, -1)]
    #[case(1001, 9907, -1)]
    #[case(19, 45, 1)]
    #[case(0, 1, 1)]
    #[case(0, 3, 0)]
    fn jacobi_values(#[case] x: i64, #[case] y: i64, #[case] expected: i32) {
        assert_eq!(jacobi(&x.into(), &y.into()), Ok(expected));
    }

    #[rstest]
    #[case(2, 7, 1)]
    #[case(3, 7, -1)]
    #[case(14, 7, 0)]
    #[case(-1, 13, 1)]
    fn legendre_values(#[case] x: i64, #[case] y: i64, #[case] expected: i32) {
        assert_eq!(legendre(&x.into(), &y.into()), Ok(expected));
    }

    #[rstest]
    #[case(0)]
    #[case(-3)]
    #[case(8)]
    fn symbols_reject_bad_modulus(#[case] y: i64) {
        let (x, y) = (BigInt::from(3), BigInt::from(y));
        assert_eq!(jacobi(&x, &y), Err(IntegerError::Value("y must be odd and >0")));
        assert_eq!(legendre(&x, &y), Err(IntegerError::Value("y must be odd and >0")));
    }

    #[rstest]
    #[case(1, 0, 1)]
    #[case(-1, 0, 1)]
    #[case(2, 0, 0)]
    #[case(3, 8, -1)]
    #[case(7, 8, 1)]
    #[case(5, 6, 1)]
    #[case(4, 6, 0)]
    #[case(-1, -1, -1)]
    #[case(3, -7, -1)]
    #[case(-3, -7, -1)]
    #[case(2, 15, 1)]
    fn kronecker_values(#[case] x: i64, #[case] y: i64, #[case] expected: i32) {
        assert_eq!(kronecker(&x.into(), &y.into()), expected);
    }
}
