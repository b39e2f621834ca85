//! Conversions between the exact `num` types and the `rug` floating point engine.

use num_bigint::{BigInt, Sign};
use num_rational::BigRational;
use num_traits::{One, Zero};
use rug::{integer::Order, Float};
use std::cmp::Ordering;

pub(crate) fn to_rug_integer(value: &BigInt) -> rug::Integer {
    let (sign, digits) = value.to_u32_digits();
    let magnitude = rug::Integer::from_digits(&digits, Order::Lsf);
    if sign == Sign::Minus { -magnitude } else { magnitude }
}

pub(crate) fn from_rug_integer(value: &rug::Integer) -> BigInt {
    let digits = value.to_digits::<u32>(Order::Lsf);
    let sign = match value.cmp0() {
        Ordering::Less => Sign::Minus,
        Ordering::Equal => Sign::NoSign,
        Ordering::Greater => Sign::Plus,
    };
    BigInt::from_slice(sign, &digits)
}

pub(crate) fn to_rug_rational(value: &BigRational) -> rug::Rational {
    rug::Rational::from((to_rug_integer(value.numer()), to_rug_integer(value.denom())))
}

/// Precision that holds every bit of `value`.
pub(crate) fn exact_precision(value: &BigInt) -> u32 {
    let bits = u32::try_from(value.bits()).unwrap_or(u32::MAX);
    bits.clamp(rug::float::prec_min(), rug::float::prec_max())
}

/// Converts an integer to a float without rounding.
pub(crate) fn exact_float(value: &BigInt) -> Float {
    Float::with_val(exact_precision(value), to_rug_integer(value))
}

/// The exact value of a finite float, as a fraction.
pub(crate) fn float_to_rational(value: &Float) -> Option<BigRational> {
    if value.is_zero() {
        return Some(BigRational::zero());
    }
    let (mantissa, exponent) = value.to_integer_exp()?;
    let mantissa = from_rug_integer(&mantissa);
    let shift = exponent.unsigned_abs();
    Some(if exponent >= 0 {
        BigRational::from_integer(mantissa << shift)
    } else {
        BigRational::new(mantissa, BigInt::one() << shift)
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("0")]
    #[case("-1")]
    #[case("123456789012345678901234567890")]
    #[case("-340282366920938463463374607431768211457")]
    fn integer_conversions(#[case] digits: &str) {
        let value: BigInt = digits.parse().unwrap();
        let converted = to_rug_integer(&value);
        assert_eq!(converted.to_string(), digits);
        assert_eq!(from_rug_integer(&converted), value);
    }

    #[test]
    fn exact_floats_keep_every_bit() {
        let value = (BigInt::one() << 200u32) + 1;
        let float = exact_float(&value);
        assert_eq!(float.prec(), 201);
        assert_eq!(float_to_rational(&float), Some(BigRational::from_integer(value)));
    }

    #[test]
    fn float_fractions() {
        let value = Float::with_val(53, -0.375);
        assert_eq!(float_to_rational(&value), Some(BigRational::new((-3).into(), 8.into())));
        assert_eq!(float_to_rational(&Float::with_val(53, 0.0)), Some(BigRational::zero()));
        assert_eq!(float_to_rational(&Float::with_val(53, f64::NAN)), None);
        assert_eq!(float_to_rational(&Float::with_val(53, f64::INFINITY)), None);
    }

    #[test]
    fn rational_conversion() {
        let value = BigRational::new((-22).into(), 7.into());
        assert_eq!(to_rug_rational(&value), rug::Rational::from((-22, 7)));
    }
}
