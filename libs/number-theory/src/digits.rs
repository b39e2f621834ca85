//! Digit counts and decimal rounding.

use crate::errors::IntegerError;
use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::Zero;

/// Returns the number of digits of `|x|` in `base`, which must lie in `[2, 62]`. 0 has one digit.
///
/// The count is exact.
pub fn num_digits(x: &BigInt, base: i64) -> Result<u64, IntegerError> {
    let base = u32::try_from(base)
        .ok()
        .filter(|base| (2..=62).contains(base))
        .ok_or(IntegerError::Value("base must be in the interval [2, 62]"))?;
    if x.is_zero() {
        return Ok(1);
    }
    if base == 2 {
        return Ok(x.bits());
    }
    Ok(x.magnitude().to_radix_le(base).len() as u64)
}

/// Rounds `x` to the nearest multiple of `10^-round_digits`, breaking ties toward the even multiple.
///
/// A non-negative `round_digits` leaves `x` unchanged.
pub fn round_digits(x: &BigInt, round_digits: i64) -> BigInt {
    if round_digits >= 0 {
        return x.clone();
    }
    let magnitude_digits = num_digits(x, 10).unwrap_or(u64::MAX);
    let Ok(exponent) = u32::try_from(round_digits.unsigned_abs()) else {
        return BigInt::zero();
    };
    // Past the digit count, |x| is below a tenth of the rounding step.
    if u64::from(exponent) > magnitude_digits {
        return BigInt::zero();
    }

    let step = BigInt::from(10).pow(exponent);
    let (mut quotient, remainder) = x.div_mod_floor(&step);
    let twice: BigInt = remainder * 2;
    if twice > step || (twice == step && quotient.is_odd()) {
        quotient += 1;
    }
    quotient * step
}

/// Returns `x` rounded down to the nearest integer, which for an integer is `x` itself.
pub fn floor(x: &BigInt) -> BigInt {
    x.clone()
}

/// Returns `x` rounded up to the nearest integer, which for an integer is `x` itself.
pub fn ceil(x: &BigInt) -> BigInt {
    x.clone()
}

/// Returns `x` rounded toward zero, which for an integer is `x` itself.
pub fn trunc(x: &BigInt) -> BigInt {
    x.clone()
}

#[cfg(test)]
mod test {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, 10, 1)]
    #[case(9, 10, 1)]
    #[case(10, 10, 2)]
    #[case(-12345, 10, 5)]
    #[case(255, 16, 2)]
    #[case(256, 16, 3)]
    #[case(12345, 2, 14)]
    #[case(61, 62, 1)]
    #[case(62, 62, 2)]
    fn num_digits_values(#[case] x: i64, #[case] base: i64, #[case] expected: u64) {
        assert_eq!(num_digits(&x.into(), base), Ok(expected));
    }

    #[rstest]
    #[case(1)]
    #[case(63)]
    #[case(-10)]
    fn num_digits_invalid_base(#[case] base: i64) {
        assert!(matches!(num_digits(&BigInt::from(5), base), Err(IntegerError::Value(_))));
    }

    #[rstest]
    #[case(125, -1, 120)]
    #[case(135, -1, 140)]
    #[case(-125, -1, -120)]
    #[case(-135, -1, -140)]
    #[case(126, -1, 130)]
    #[case(124, -1, 120)]
    #[case(60, -2, 100)]
    #[case(50, -2, 0)]
    #[case(150, -2, 200)]
    #[case(12345, -9, 0)]
    #[case(12345, 0, 12345)]
    #[case(12345, 3, 12345)]
    #[case(0, -3, 0)]
    fn round_digits_values(#[case] x: i64, #[case] digits: i64, #[case] expected: i64) {
        assert_eq!(round_digits(&x.into(), digits), BigInt::from(expected));
    }

    #[rstest]
    #[case(-5)]
    #[case(0)]
    #[case(42)]
    fn rounding_is_identity(#[case] x: i64) {
        let x = BigInt::from(x);
        assert_eq!(floor(&x), x);
        assert_eq!(ceil(&x), x);
        assert_eq!(trunc(&x), x);
    }
}
