//! Real functions, predicates and decompositions over host operands.

use crate::{
    complex,
    context::{get_active, Condition, NumericContext, RoundingMode, SharedContext, Signals},
    convert::{exact_float, float_to_rational, from_rug_integer, to_rug_rational},
    errors::NumericError,
    number::{Number, Operand},
    real,
};
use num_bigint::BigInt;
use num_integer::Integer;
use num_rational::BigRational;
use num_traits::{One, Signed, ToPrimitive, Zero};
use rug::{
    float::{Round, Special},
    Float,
};
use std::cmp::Ordering;

fn number(x: &dyn Operand, name: &'static str) -> Result<Number, NumericError> {
    x.to_number().ok_or_else(|| NumericError::Type(format!("{name}() requires numeric arguments")))
}

fn complex_argument(name: &'static str) -> NumericError {
    NumericError::Type(format!("{name}() requires a non complex argument"))
}

/// The operand as a float. Integers are exact, fractions are rounded with the context settings.
fn real_value(context: &NumericContext, x: &dyn Operand, name: &'static str) -> Result<Float, NumericError> {
    real::to_float(&number(x, name)?, context.precision(), Round::from(context.rounding()), name)
}

/// The operand as a float when it is an Integer or a Real.
fn real_argument(x: &dyn Operand, name: &'static str) -> Result<Float, NumericError> {
    match number(x, name)? {
        Number::Integer(value) => Ok(exact_float(&value)),
        Number::Real(value) => Ok(value),
        Number::Rational(_) | Number::Complex(_) => {
            Err(NumericError::Type(format!("{name}() requires a Real argument")))
        }
    }
}

fn resolve(context: Option<&SharedContext>) -> SharedContext {
    context.cloned().unwrap_or_else(get_active)
}

/// Square root. Negative Real values are NaN, or have a Complex root when the context allows complex results.
pub fn sqrt(x: &dyn Operand, context: Option<&SharedContext>) -> Result<Number, NumericError> {
    let name = "sqrt";
    let x = number(x, name)?;
    let shared = resolve(context);
    let mut context = shared.lock();
    for exponent in x.exponents() {
        context.check_exponent(exponent, name)?;
    }
    match x {
        Number::Complex(_) => complex::sqrt(&mut context, &x, name),
        _ => real::sqrt(&mut context, &x, name),
    }
}

/// Tells whether the value is NaN, or has a NaN component.
pub fn is_nan(x: &dyn Operand) -> Result<bool, NumericError> {
    Ok(match number(x, "is_nan")? {
        Number::Integer(_) | Number::Rational(_) => false,
        Number::Real(value) => value.is_nan(),
        Number::Complex(value) => value.real().is_nan() || value.imag().is_nan(),
    })
}

/// Tells whether the value is infinite, or has an infinite component.
pub fn is_infinite(x: &dyn Operand) -> Result<bool, NumericError> {
    Ok(match number(x, "is_infinite")? {
        Number::Integer(_) | Number::Rational(_) => false,
        Number::Real(value) => value.is_infinite(),
        Number::Complex(value) => value.real().is_infinite() || value.imag().is_infinite(),
    })
}

/// Tells whether the value, or each of its components, is neither NaN nor infinite.
pub fn is_finite(x: &dyn Operand) -> Result<bool, NumericError> {
    Ok(match number(x, "is_finite")? {
        Number::Integer(_) | Number::Rational(_) => true,
        Number::Real(value) => value.is_finite(),
        Number::Complex(value) => value.real().is_finite() && value.imag().is_finite(),
    })
}

/// Tells whether the value, or each of its components, is zero.
pub fn is_zero(x: &dyn Operand) -> Result<bool, NumericError> {
    Ok(match number(x, "is_zero")? {
        Number::Integer(value) => value.is_zero(),
        Number::Rational(value) => value.is_zero(),
        Number::Real(value) => value.is_zero(),
        Number::Complex(value) => value.is_zero(),
    })
}

/// Tells whether the sign is negative. Negative zeros and NaNs with their sign bit set count.
pub fn is_signed(x: &dyn Operand) -> Result<bool, NumericError> {
    let name = "is_signed";
    match number(x, name)? {
        Number::Integer(value) => Ok(value.is_negative()),
        Number::Rational(value) => Ok(value.is_negative()),
        Number::Real(value) => Ok(value.is_sign_negative()),
        Number::Complex(_) => Err(complex_argument(name)),
    }
}

/// Tells whether the value is finite and nonzero.
pub fn is_regular(x: &dyn Operand) -> Result<bool, NumericError> {
    let name = "is_regular";
    match number(x, name)? {
        Number::Integer(value) => Ok(!value.is_zero()),
        Number::Rational(value) => Ok(!value.is_zero()),
        Number::Real(value) => Ok(value.is_normal()),
        Number::Complex(_) => Err(complex_argument(name)),
    }
}

/// Tells whether the value is an integer.
pub fn is_integer(x: &dyn Operand) -> Result<bool, NumericError> {
    let name = "is_integer";
    match number(x, name)? {
        Number::Integer(_) => Ok(true),
        Number::Rational(value) => Ok(value.is_integer()),
        Number::Real(value) => Ok(value.is_integer()),
        Number::Complex(_) => Err(complex_argument(name)),
    }
}

/// NaN at the context precision.
pub fn nan(context: Option<&SharedContext>) -> Float {
    Float::with_val(resolve(context).lock().precision(), Special::Nan)
}

/// An infinity at the context precision.
pub fn inf(negative: bool, context: Option<&SharedContext>) -> Float {
    let special = if negative { Special::NegInfinity } else { Special::Infinity };
    Float::with_val(resolve(context).lock().precision(), special)
}

/// A zero at the context precision.
pub fn zero(negative: bool, context: Option<&SharedContext>) -> Float {
    let special = if negative { Special::NegZero } else { Special::Zero };
    Float::with_val(resolve(context).lock().precision(), special)
}

/// The exponent `e` of `x = m * 2^e` with `0.5 <= |m| < 1`, 0 for zeros.
///
/// NaN and infinities have no exponent: they raise the `erange` condition and give 0.
pub fn get_exp(x: &dyn Operand, context: Option<&SharedContext>) -> Result<i32, NumericError> {
    let name = "get_exp";
    let shared = resolve(context);
    let mut context = shared.lock();
    let value = real_value(&context, x, name)?;
    if let Some(exponent) = value.get_exp() {
        return Ok(exponent);
    }
    if !value.is_zero() {
        context.commit(Signals::from(Condition::Erange), name)?;
    }
    Ok(0)
}

/// `x` with the same significand and exponent `exponent`.
///
/// Zeros, NaN, infinities and exponents outside the context bounds raise the `erange` condition and give `x`
/// back unchanged.
pub fn set_exp(x: &dyn Operand, exponent: i32, context: Option<&SharedContext>) -> Result<Float, NumericError> {
    let name = "set_exp";
    let shared = resolve(context);
    let mut context = shared.lock();
    let value = real_value(&context, x, name)?;
    let in_bounds = (context.exponent_min()..=context.exponent_max()).contains(&exponent);
    match value.get_exp() {
        Some(current) if in_bounds => Ok(value << (exponent - current)),
        _ => {
            context.commit(Signals::from(Condition::Erange), name)?;
            Ok(value)
        }
    }
}

/// `x` with the sign of `y`, rounded to the context precision.
pub fn copy_sign(x: &dyn Operand, y: &dyn Operand, context: Option<&SharedContext>) -> Result<Float, NumericError> {
    let name = "copy_sign";
    let shared = resolve(context);
    let mut context = shared.lock();
    let (value, sign) = (real_value(&context, x, name)?, real_value(&context, y, name)?);
    let value = if value.is_sign_negative() == sign.is_sign_negative() { value } else { -value };
    real::round_into(&mut context, &value, Signals::NONE, name)
}

/// `|x|` or `-|x|`, rounded to the context precision.
pub fn set_sign(x: &dyn Operand, negative: bool, context: Option<&SharedContext>) -> Result<Float, NumericError> {
    let name = "set_sign";
    let shared = resolve(context);
    let mut context = shared.lock();
    let value = real_value(&context, x, name)?;
    let value = if value.is_sign_negative() == negative { value } else { -value };
    real::round_into(&mut context, &value, Signals::NONE, name)
}

/// The exact value as `(numerator, denominator)` in lowest terms, with a positive denominator.
pub fn as_integer_ratio(x: &dyn Operand) -> Result<(BigInt, BigInt), NumericError> {
    let name = "as_integer_ratio";
    let ratio = match number(x, name)? {
        Number::Integer(value) => return Ok((value, BigInt::one())),
        Number::Rational(value) => value,
        Number::Real(value) if value.is_nan() => {
            return Err(NumericError::Value("can't convert NaN to an integer ratio".to_string()));
        }
        Number::Real(value) => float_to_rational(&value).ok_or(NumericError::Overflow(name))?,
        Number::Complex(_) => return Err(complex_argument(name)),
    };
    Ok(ratio.into_raw())
}

/// The exact value as `(mantissa, exponent)` with `x = mantissa * 2^exponent`.
pub fn as_mantissa_exp(x: &dyn Operand) -> Result<(BigInt, i32), NumericError> {
    let name = "as_mantissa_exp";
    let value = real_argument(x, name)?;
    if value.is_nan() {
        return Err(NumericError::Value("can't convert NaN to a mantissa and exponent".to_string()));
    }
    if value.is_zero() {
        return Ok((BigInt::zero(), 1));
    }
    let (mantissa, exponent) = value.to_integer_exp().ok_or(NumericError::Overflow(name))?;
    Ok((from_rug_integer(&mantissa), exponent))
}

/// Smallest exponent a context accepts as its lower bound.
pub fn get_emin_min() -> i32 {
    rug::float::exp_min()
}

/// Largest exponent a context accepts as its upper bound.
pub fn get_emax_max() -> i32 {
    rug::float::exp_max()
}

/// Largest precision a context or a value can have.
pub fn get_max_precision() -> u32 {
    rug::float::prec_max()
}

/// `x` brought into the context exponent range, as if it were the result of an operation.
///
/// The precision of `x` is kept. Overflow, underflow and subnormalization follow the context and raise its
/// conditions.
pub fn check_range(x: &dyn Operand, context: Option<&SharedContext>) -> Result<Float, NumericError> {
    let name = "check_range";
    let Number::Real(value) = number(x, name)? else {
        return Err(NumericError::Type(format!("{name}() requires a Real argument")));
    };
    let shared = resolve(context);
    let mut context = shared.lock();
    real::finish(&mut context, value, Ordering::Equal, Signals::NONE, name)
}

/// `x` rounded to `digits` decimal digits after the point, or before it when `digits` is negative. Ties go to
/// the even neighbour and the result keeps the precision of `x`.
///
/// Without `digits` the result is the nearest Integer, which NaN and infinities don't have.
pub fn round10(x: &dyn Operand, digits: Option<&dyn Operand>) -> Result<Number, NumericError> {
    let name = "round10";
    let value = real_argument(x, name)?;
    let Some(digits) = digits else {
        if value.is_nan() {
            return Err(NumericError::Value("can't round NaN to an integer".to_string()));
        }
        let exact = float_to_rational(&value).ok_or(NumericError::Overflow(name))?;
        return Ok(Number::Integer(round_half_even(&exact)));
    };
    let digits = match digits.to_number() {
        Some(Number::Integer(digits)) => {
            digits.to_i64().ok_or_else(|| NumericError::Value(format!("{name}() digit count is too large")))?
        }
        _ => return Err(NumericError::Type(format!("{name}() requires an integer digit count"))),
    };
    if !value.is_normal() {
        return Ok(Number::Real(value));
    }
    let exponent = u32::try_from(digits.unsigned_abs())
        .map_err(|_| NumericError::Value(format!("{name}() digit count is too large")))?;
    let exact = float_to_rational(&value).ok_or(NumericError::Overflow(name))?;
    let scale = BigRational::from_integer(BigInt::from(10).pow(exponent));
    let rounded = if digits >= 0 {
        BigRational::from_integer(round_half_even(&(exact * &scale))) / scale
    } else {
        BigRational::from_integer(round_half_even(&(exact / &scale))) * scale
    };
    let (result, _) = Float::with_val_round(value.prec(), to_rug_rational(&rounded), Round::Nearest);
    Ok(Number::Real(result))
}

fn round_half_even(value: &BigRational) -> BigInt {
    let floor = value.floor();
    let twice_fraction = (value - &floor) * BigInt::from(2);
    let floor = floor.to_integer();
    match twice_fraction.cmp(&BigRational::one()) {
        Ordering::Less => floor,
        Ordering::Greater => floor + 1,
        Ordering::Equal if floor.is_even() => floor,
        Ordering::Equal => floor + 1,
    }
}

/// The simplest fraction within `err` of `x`, as an Integer when its denominator is 1.
///
/// Without `err`, or with 0, the tolerance is one unit in the last place of `x`. A negative `err` is a
/// relative error of `2^err`, a positive one a relative error of `err` itself.
pub fn f2q(x: &dyn Operand, err: Option<&dyn Operand>) -> Result<Number, NumericError> {
    let name = "f2q";
    let value = real_argument(x, name)?;
    let exact = finite_rational(&value, name)?;
    let err = match err {
        Some(err) => exact_argument(err, name)?,
        None => BigRational::zero(),
    };
    let tolerance = if err.is_zero() {
        unit_in_last_place(&value, value.prec())
    } else if err.is_negative() {
        // Below this the tolerance no longer changes which convergent is picked for a value of this precision.
        let floor = -2 * i64::from(value.prec()) - 64;
        let exponent = err.floor().to_integer().to_i64().unwrap_or(floor).max(floor);
        exact.abs() * power_of_two(exponent)
    } else {
        exact.abs() * err
    };
    Ok(Number::demoted(simplest_within(&exact, &tolerance)))
}

/// The simplest fraction that agrees with `x` to `precision` bits, the precision of `x` by default.
pub fn simple_fraction(x: &dyn Operand, precision: Option<u32>) -> Result<BigRational, NumericError> {
    let name = "simple_fraction";
    let value = real_argument(x, name)?;
    let precision = match precision {
        Some(precision) if !(rug::float::prec_min()..=rug::float::prec_max()).contains(&precision) => {
            return Err(NumericError::Value(format!("{name}() precision is out of range")));
        }
        Some(precision) => precision,
        None => value.prec(),
    };
    let exact = finite_rational(&value, name)?;
    Ok(simplest_within(&exact, &unit_in_last_place(&value, precision)))
}

fn finite_rational(value: &Float, name: &'static str) -> Result<BigRational, NumericError> {
    if value.is_nan() {
        return Err(NumericError::Value(format!("{name}() can't convert NaN to a fraction")));
    }
    float_to_rational(value).ok_or(NumericError::Overflow(name))
}

fn exact_argument(x: &dyn Operand, name: &'static str) -> Result<BigRational, NumericError> {
    match number(x, name)? {
        Number::Integer(value) => Ok(BigRational::from_integer(value)),
        Number::Rational(value) => Ok(value),
        Number::Real(value) => finite_rational(&value, name),
        Number::Complex(_) => Err(complex_argument(name)),
    }
}

fn power_of_two(exponent: i64) -> BigRational {
    let magnitude = BigInt::one() << exponent.unsigned_abs();
    if exponent >= 0 {
        BigRational::from_integer(magnitude)
    } else {
        BigRational::new(BigInt::one(), magnitude)
    }
}

fn unit_in_last_place(value: &Float, precision: u32) -> BigRational {
    value
        .get_exp()
        .map(|exponent| power_of_two(i64::from(exponent) - i64::from(precision)))
        .unwrap_or_else(BigRational::zero)
}

// Walks the continued fraction convergents of `value` until one is close enough.
fn simplest_within(value: &BigRational, tolerance: &BigRational) -> BigRational {
    let (mut numer, mut previous_numer) = (BigInt::one(), BigInt::zero());
    let (mut denom, mut previous_denom) = (BigInt::zero(), BigInt::one());
    let mut rest = value.clone();
    loop {
        let term = rest.floor().to_integer();
        let next_numer = &term * &numer + &previous_numer;
        let next_denom = &term * &denom + &previous_denom;
        let candidate = BigRational::new(next_numer.clone(), next_denom.clone());
        let fraction = &rest - BigRational::from_integer(term);
        if fraction.is_zero() || (value - &candidate).abs() <= *tolerance {
            return candidate;
        }
        rest = fraction.recip();
        (previous_numer, numer) = (numer, next_numer);
        (previous_denom, denom) = (denom, next_denom);
    }
}

/// Tells whether a value approximated by `b` can be rounded correctly to `precision` bits with `rounding`.
///
/// `b` is the result of rounding the unknown value with `approximation`, and is off by at most
/// `2^(E(b) - err)` where `E(b)` is its exponent.
pub fn can_round(
    b: &dyn Operand,
    err: i64,
    approximation: RoundingMode,
    rounding: RoundingMode,
    precision: u32,
) -> Result<bool, NumericError> {
    let name = "can_round";
    let Number::Real(b) = number(b, name)? else {
        return Err(NumericError::Type(format!("{name}() requires a Real argument")));
    };
    if !(rug::float::prec_min()..=rug::float::prec_max()).contains(&precision) {
        return Err(NumericError::Value(format!("{name}() precision is out of range")));
    }
    let (Some(exponent), Some(center)) = (b.get_exp(), float_to_rational(&b)) else {
        return Ok(false);
    };
    if err <= i64::from(precision) {
        return Ok(false);
    }
    // A tighter bound can't separate `b` from a rounding boundary any better than its own last bit does.
    let err = err.min(i64::from(b.prec().max(precision + 1)) + 2);
    let error = power_of_two(i64::from(exponent) - err);
    let negative = b.is_sign_negative();
    let (below, above) = match approximation {
        RoundingMode::ToNearestTiesEven => (true, true),
        RoundingMode::Down => (false, true),
        RoundingMode::Up => (true, false),
        RoundingMode::TowardZero => (negative, !negative),
        RoundingMode::AwayFromZero => (!negative, negative),
    };
    let low = if below { &center - &error } else { center.clone() };
    let high = if above { &center + &error } else { center };
    let round = Round::from(rounding);
    let (low, _) = Float::with_val_round(precision, to_rug_rational(&low), round);
    let (high, _) = Float::with_val_round(precision, to_rug_rational(&high), round);
    Ok(low == high)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::context::{ContextOptions, RoundingMode};
    use num_rational::BigRational;
    use rstest::rstest;
    use rug::Complex;

    fn isolated(precision: u32) -> SharedContext {
        let options = ContextOptions { precision: Some(precision), ..Default::default() };
        SharedContext::new(NumericContext::new(options).unwrap())
    }

    #[test]
    fn square_roots() {
        let context = isolated(53);
        assert_eq!(sqrt(&16, Some(&context)).unwrap(), Number::Real(Float::with_val(53, 4)));
        assert!(!context.lock().flag_inexact());
        let root = sqrt(&2, Some(&context)).unwrap();
        assert_eq!(root, Number::Real(Float::with_val(53, std::f64::consts::SQRT_2)));
        assert!(context.lock().flag_inexact());
    }

    #[test]
    fn negative_square_root() {
        let context = isolated(53);
        let root = sqrt(&-2.0, Some(&context)).unwrap();
        assert!(is_nan(&root).unwrap());
        assert!(context.lock().flag_invalid());

        context.lock().set_allow_complex(true);
        let root = sqrt(&-4, Some(&context)).unwrap();
        assert_eq!(root, Number::Complex(Complex::with_val(53, (0, 2))));
        let root = sqrt(&Complex::with_val(53, (0, 2)), Some(&context)).unwrap();
        assert_eq!(root, Number::Complex(Complex::with_val(53, (1, 1))));
    }

    #[rstest]
    #[case(&1.5f64, false, false, true, false, false, true, false)]
    #[case(&f64::NAN, true, false, false, false, false, false, false)]
    #[case(&f64::NEG_INFINITY, false, true, false, false, true, false, false)]
    #[case(&-0.0f64, false, false, true, true, true, false, true)]
    #[case(&-3, false, false, true, false, true, true, true)]
    #[allow(clippy::too_many_arguments)]
    fn predicates(
        #[case] x: &dyn Operand,
        #[case] nan: bool,
        #[case] infinite: bool,
        #[case] finite: bool,
        #[case] zero: bool,
        #[case] signed: bool,
        #[case] regular: bool,
        #[case] integer: bool,
    ) {
        assert_eq!(is_nan(x), Ok(nan));
        assert_eq!(is_infinite(x), Ok(infinite));
        assert_eq!(is_finite(x), Ok(finite));
        assert_eq!(is_zero(x), Ok(zero));
        assert_eq!(is_signed(x), Ok(signed));
        assert_eq!(is_regular(x), Ok(regular));
        assert_eq!(is_integer(x), Ok(integer));
    }

    #[test]
    fn complex_predicates() {
        let value = Complex::with_val(53, (f64::NAN, 1));
        assert_eq!(is_nan(&value), Ok(true));
        assert_eq!(is_finite(&value), Ok(false));
        assert!(matches!(is_signed(&value), Err(NumericError::Type(_))));
    }

    #[test]
    fn special_values() {
        let context = isolated(80);
        assert!(nan(Some(&context)).is_nan());
        assert_eq!(inf(true, Some(&context)).prec(), 80);
        assert!(inf(true, Some(&context)).is_sign_negative());
        let zero = zero(true, Some(&context));
        assert!(zero.is_zero() && zero.is_sign_negative());
    }

    #[test]
    fn exponents() {
        let context = isolated(53);
        assert_eq!(get_exp(&8.0, Some(&context)), Ok(4));
        assert_eq!(get_exp(&0.0, Some(&context)), Ok(0));
        assert!(!context.lock().flag_erange());
        assert_eq!(get_exp(&f64::INFINITY, Some(&context)), Ok(0));
        assert!(context.lock().flag_erange());

        context.lock().clear_flags();
        assert_eq!(set_exp(&8.0, 2, Some(&context)), Ok(Float::with_val(53, 2)));
        context.lock().set_exponent_max(100).unwrap();
        assert_eq!(set_exp(&8.0, 200, Some(&context)), Ok(Float::with_val(53, 8)));
        assert!(context.lock().flag_erange());

        context.lock().set_trap_erange(true);
        assert_eq!(set_exp(&8.0, 200, Some(&context)), Err(NumericError::Range("set_exp")));
    }

    #[test]
    fn signs() {
        let context = isolated(53);
        assert_eq!(copy_sign(&2.5, &-0.0, Some(&context)), Ok(Float::with_val(53, -2.5)));
        assert_eq!(set_sign(&-2.5, false, Some(&context)), Ok(Float::with_val(53, 2.5)));

        let context = isolated(2);
        context.lock().set_rounding(RoundingMode::TowardZero);
        assert_eq!(set_sign(&7, true, Some(&context)), Ok(Float::with_val(53, -6)));
        assert!(context.lock().flag_inexact());
    }

    #[rstest]
    #[case(&0.375f64, (3, 8))]
    #[case(&-5, (-5, 1))]
    fn integer_ratios(#[case] x: &dyn Operand, #[case] expected: (i64, i64)) {
        assert_eq!(as_integer_ratio(x), Ok((expected.0.into(), expected.1.into())));
    }

    #[test]
    fn fraction_ratios_are_normalized() {
        let fraction = BigRational::new(6.into(), (-4).into());
        assert_eq!(as_integer_ratio(&fraction), Ok((BigInt::from(-3), BigInt::from(2))));
    }

    #[test]
    fn decompositions_of_special_values() {
        assert!(matches!(as_integer_ratio(&f64::NAN), Err(NumericError::Value(_))));
        assert_eq!(as_integer_ratio(&f64::INFINITY), Err(NumericError::Overflow("as_integer_ratio")));
        assert!(matches!(as_mantissa_exp(&f64::NAN), Err(NumericError::Value(_))));
        assert_eq!(as_mantissa_exp(&f64::NEG_INFINITY), Err(NumericError::Overflow("as_mantissa_exp")));
        assert_eq!(as_mantissa_exp(&0.0), Ok((BigInt::zero(), 1)));
    }

    #[test]
    fn mantissa_and_exponent() {
        let (mantissa, exponent) = as_mantissa_exp(&0.375).unwrap();
        let value = BigRational::from_integer(mantissa) * BigRational::from_integer(BigInt::from(2)).pow(exponent);
        assert_eq!(value, BigRational::new(3.into(), 8.into()));
    }

    #[test]
    fn engine_limits() {
        assert!(get_emin_min() < 0 && get_emax_max() > 0);
        assert_eq!(get_max_precision(), rug::float::prec_max());
        let mut context = NumericContext::default();
        assert!(context.set_exponent_min(get_emin_min()).is_ok());
        assert!(context.set_exponent_max(get_emax_max()).is_ok());
    }

    #[test]
    fn range_checks() {
        let context = isolated(53);
        context.lock().set_exponent_max(10).unwrap();
        let value = check_range(&Float::with_val(53, 4096), Some(&context)).unwrap();
        assert!(value.is_infinite());
        assert!(context.lock().flag_overflow());

        context.lock().clear_flags();
        let value = check_range(&Float::with_val(30, 3.5), Some(&context)).unwrap();
        assert_eq!((value.prec(), value.to_f64()), (30, 3.5));
        assert!(context.lock().flags().is_empty());

        assert!(matches!(check_range(&3, Some(&context)), Err(NumericError::Type(_))));
    }

    #[rstest]
    #[case(2.5, 2)]
    #[case(3.5, 4)]
    #[case(-2.5, -2)]
    #[case(-2.6, -3)]
    #[case(7.0, 7)]
    fn rounds_to_integers(#[case] x: f64, #[case] expected: i64) {
        assert_eq!(round10(&x, None), Ok(Number::Integer(expected.into())));
    }

    #[rstest]
    #[case(1.2345, 2, 1.23)]
    #[case(0.125, 2, 0.12)]
    #[case(1234.5, -2, 1200.0)]
    #[case(1250.0, -2, 1200.0)]
    #[case(-0.375, 1, -0.4)]
    fn rounds_to_decimal_digits(#[case] x: f64, #[case] digits: i64, #[case] expected: f64) {
        assert_eq!(round10(&x, Some(&digits as &dyn Operand)), Ok(Number::Real(Float::with_val(53, expected))));
    }

    #[test]
    fn rounding_special_values() {
        assert!(matches!(round10(&f64::NAN, None), Err(NumericError::Value(_))));
        assert_eq!(round10(&f64::INFINITY, None), Err(NumericError::Overflow("round10")));
        let value = round10(&f64::NEG_INFINITY, Some(&3 as &dyn Operand)).unwrap();
        assert!(is_infinite(&value).unwrap());
        assert!(matches!(round10(&1.5, Some(&0.5 as &dyn Operand)), Err(NumericError::Type(_))));
    }

    fn ratio(numer: i64, denom: i64) -> BigRational {
        BigRational::new(numer.into(), denom.into())
    }

    #[rstest]
    #[case(Box::new(0.1f64), None, ratio(1, 10))]
    #[case(Box::new(0.5f64), None, ratio(1, 2))]
    #[case(Box::new(4.14159f64), Some(Box::new(0.001f64) as Box<dyn Operand>), ratio(29, 7))]
    #[case(Box::new(4.14159f64), Some(Box::new(-10) as Box<dyn Operand>), ratio(29, 7))]
    #[case(Box::new(4.14159f64), Some(Box::new(-40) as Box<dyn Operand>), ratio(414159, 100000))]
    fn best_fractions(
        #[case] x: Box<dyn Operand>,
        #[case] err: Option<Box<dyn Operand>>,
        #[case] expected: BigRational,
    ) {
        assert_eq!(f2q(x.as_ref(), err.as_deref()), Ok(Number::Rational(expected)));
    }

    #[test]
    fn fractions_of_integral_and_special_values() {
        assert_eq!(f2q(&3.0, None), Ok(Number::Integer(3.into())));
        assert_eq!(f2q(&0.0, None), Ok(Number::Integer(0.into())));
        assert!(matches!(f2q(&f64::NAN, None), Err(NumericError::Value(_))));
        assert_eq!(f2q(&f64::INFINITY, None), Err(NumericError::Overflow("f2q")));
        assert!(matches!(f2q(&Complex::with_val(53, (1, 1)), None), Err(NumericError::Type(_))));
    }

    #[test]
    fn simple_fractions() {
        assert_eq!(simple_fraction(&0.1, Some(10)), Ok(ratio(1, 10)));
        assert_eq!(simple_fraction(&0.75, None), Ok(ratio(3, 4)));
        assert!(matches!(simple_fraction(&0.1, Some(0)), Err(NumericError::Value(_))));
    }

    #[rstest]
    #[case(1.5, 40, RoundingMode::ToNearestTiesEven, RoundingMode::ToNearestTiesEven, 10, true)]
    #[case(1.5, 40, RoundingMode::ToNearestTiesEven, RoundingMode::ToNearestTiesEven, 60, false)]
    #[case(1.0 + 1.0 / 1024.0, 50, RoundingMode::ToNearestTiesEven, RoundingMode::ToNearestTiesEven, 10, false)]
    #[case(1.5, 40, RoundingMode::Down, RoundingMode::Down, 10, true)]
    #[case(1.5, 40, RoundingMode::Up, RoundingMode::Down, 10, false)]
    #[case(0.0, 40, RoundingMode::ToNearestTiesEven, RoundingMode::ToNearestTiesEven, 10, false)]
    fn correct_rounding(
        #[case] b: f64,
        #[case] err: i64,
        #[case] approximation: RoundingMode,
        #[case] rounding: RoundingMode,
        #[case] precision: u32,
        #[case] expected: bool,
    ) {
        assert_eq!(can_round(&b, err, approximation, rounding, precision), Ok(expected));
    }
}
