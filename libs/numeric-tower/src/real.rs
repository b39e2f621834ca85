//! Real level arithmetic.
//!
//! Operations are computed once by the floating point engine at the context precision and rounding, then
//! brought into the context exponent range by [`fit`]. That second step replaces out of range results the way
//! IEEE-754 does (infinities, largest finite values, zeros, smallest values, subnormals) and collects the
//! conditions that [`NumericContext::commit`] turns into flags or errors.

use crate::{
    complex,
    context::{Condition, NumericContext, RoundingMode, Signals},
    convert::{exact_float, to_rug_integer, to_rug_rational},
    errors::NumericError,
    number::Number,
};
use num_traits::Signed;
use rug::{
    float::{Round, Special},
    ops::Pow,
    Float, Rational,
};
use std::cmp::Ordering;

/// An operand of a Real operation. Integers are held as exact floats, fractions stay exact so that the
/// engine rounds mixed operations once.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum RealOperand {
    Float(Float),
    Rational(Rational),
}

impl RealOperand {
    pub(crate) fn new(number: &Number) -> Option<Self> {
        match number {
            Number::Integer(value) => Some(Self::Float(exact_float(value))),
            Number::Rational(value) => Some(Self::Rational(to_rug_rational(value))),
            Number::Real(value) => Some(Self::Float(value.clone())),
            Number::Complex(_) => None,
        }
    }

    fn is_zero(&self) -> bool {
        match self {
            Self::Float(value) => value.is_zero(),
            Self::Rational(value) => value.cmp0() == Ordering::Equal,
        }
    }

    fn is_finite_nonzero(&self) -> bool {
        match self {
            Self::Float(value) => value.is_normal(),
            Self::Rational(value) => value.cmp0() != Ordering::Equal,
        }
    }

    /// Rounds the operand to a float of the given precision.
    fn into_float(self, precision: u32, round: Round) -> Float {
        match self {
            Self::Float(value) => value,
            Self::Rational(value) => Float::with_val_round(precision, value, round).0,
        }
    }
}

/// A pair of Real operands. Fractions only ever meet floats.
enum RealPair {
    Floats(Float, Float),
    FloatRational(Float, Rational),
    RationalFloat(Rational, Float),
}

impl RealPair {
    fn new(x: RealOperand, y: RealOperand, operation: &'static str) -> Result<Self, NumericError> {
        match (x, y) {
            (RealOperand::Float(x), RealOperand::Float(y)) => Ok(Self::Floats(x, y)),
            // A zero fraction becomes a float zero so the engine produces the IEEE-754 special values.
            (RealOperand::Float(x), RealOperand::Rational(y)) if y.cmp0() == Ordering::Equal => {
                Ok(Self::Floats(x, Float::new(rug::float::prec_min())))
            }
            (RealOperand::Float(x), RealOperand::Rational(y)) => Ok(Self::FloatRational(x, y)),
            (RealOperand::Rational(x), RealOperand::Float(y)) => Ok(Self::RationalFloat(x, y)),
            (RealOperand::Rational(_), RealOperand::Rational(_)) => {
                Err(NumericError::Type(format!("{operation}() requires a Real operand")))
            }
        }
    }
}

/// The four operations the engine rounds directly.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Arithmetic {
    Add,
    Sub,
    Mul,
    Div,
}

macro_rules! rounded {
    ($pair:expr, $precision:expr, $round:expr, $op:tt) => {
        match $pair {
            RealPair::Floats(x, y) => Float::with_val_round($precision, &x $op &y, $round),
            RealPair::FloatRational(x, y) => Float::with_val_round($precision, &x $op &y, $round),
            RealPair::RationalFloat(x, y) => Float::with_val_round($precision, &x $op &y, $round),
        }
    };
}

/// Computes `x <op> y` at the Real level.
pub(crate) fn arithmetic(
    context: &mut NumericContext,
    arithmetic: Arithmetic,
    x: &Number,
    y: &Number,
    operation: &'static str,
) -> Result<Float, NumericError> {
    let (x, y) = operands(x, y, operation)?;
    let mut signals = Signals::NONE;
    if arithmetic == Arithmetic::Div && y.is_zero() && x.is_finite_nonzero() {
        signals.insert(Condition::DivZero);
    }
    let pair = RealPair::new(x, y, operation)?;
    let (precision, round) = (context.precision(), Round::from(context.rounding()));
    let (value, ternary) = match arithmetic {
        Arithmetic::Add => rounded!(pair, precision, round, +),
        Arithmetic::Sub => rounded!(pair, precision, round, -),
        Arithmetic::Mul => rounded!(pair, precision, round, *),
        Arithmetic::Div => rounded!(pair, precision, round, /),
    };
    finish(context, value, ternary, signals, operation)
}

/// Floored division: the quotient rounded toward negative infinity, then floored.
pub(crate) fn floor_div(
    context: &mut NumericContext,
    x: &Number,
    y: &Number,
    operation: &'static str,
) -> Result<Float, NumericError> {
    let (x, y) = floats(context, x, y, operation)?;
    let mut signals = Signals::NONE;
    if y.is_zero() && x.is_normal() {
        signals.insert(Condition::DivZero);
    }
    let precision = context.precision();
    let (quotient, ternary) = Float::with_val_round(precision, &x / &y, Round::Down);
    let floored = quotient.clone().floor();
    // Rounding toward negative infinity keeps the floor of the exact quotient, unless the quotient is an
    // integer with a unit in the last place above 1.
    let exact_floor = ternary == Ordering::Equal
        || (quotient.is_finite()
            && (floored != quotient
                || quotient.get_exp().is_some_and(|exponent| i64::from(exponent) <= i64::from(precision))));
    let ternary = if exact_floor { Ordering::Equal } else { ternary };
    finish(context, floored, ternary, signals, operation)
}

/// Floored modulo: the remainder takes the sign of the divisor.
pub(crate) fn modulo(
    context: &mut NumericContext,
    x: &Number,
    y: &Number,
    operation: &'static str,
) -> Result<Float, NumericError> {
    let (x, y) = floats(context, x, y, operation)?;
    let (precision, round) = (context.precision(), Round::from(context.rounding()));
    if y.is_zero() {
        let signals = if x.is_nan() { Signals::NONE } else { Signals::from(Condition::DivZero) };
        return finish(context, Float::with_val(precision, Special::Nan), Ordering::Equal, signals, operation);
    }
    if x.is_nan() || y.is_nan() || x.is_infinite() {
        return finish(context, Float::with_val(precision, Special::Nan), Ordering::Equal, Signals::NONE, operation);
    }
    if y.is_infinite() {
        let keep = x.is_zero() || x.is_sign_negative() == y.is_sign_negative();
        let (value, ternary) = Float::with_val_round(precision, if keep { &x } else { &y }, round);
        return finish(context, value, ternary, Signals::NONE, operation);
    }
    let (remainder, ternary) = Float::with_val_round(precision, &x % &y, round);
    let (value, ternary) = if remainder.is_zero() {
        let zero = if y.is_sign_negative() { Special::NegZero } else { Special::Zero };
        (Float::with_val(precision, zero), ternary)
    } else if remainder.is_sign_negative() != y.is_sign_negative() {
        Float::with_val_round(precision, &remainder + &y, round)
    } else {
        (remainder, ternary)
    };
    finish(context, value, ternary, Signals::NONE, operation)
}

/// `x ** y` at the Real level. Integer exponents are used exactly.
///
/// A negative base with a non-integral exponent has no Real result: it is NaN, or a Complex power when the
/// context allows complex results.
pub(crate) fn pow(
    context: &mut NumericContext,
    x: &Number,
    y: &Number,
    operation: &'static str,
) -> Result<Number, NumericError> {
    let (precision, round) = (context.precision(), Round::from(context.rounding()));
    let base = to_float(x, precision, round, operation)?;
    let mut signals = Signals::NONE;
    let (value, ternary) = match y {
        Number::Integer(exponent) => {
            if base.is_zero() && exponent.is_negative() {
                signals.insert(Condition::DivZero);
            }
            Float::with_val_round(precision, (&base).pow(&to_rug_integer(exponent)), round)
        }
        _ => {
            let exponent = to_float(y, precision, round, operation)?;
            let fractional = exponent.is_finite() && !exponent.is_integer();
            if base.is_sign_negative() && base.is_normal() && fractional && context.allow_complex() {
                return complex::pow(context, &Number::Real(base), &Number::Real(exponent), operation);
            }
            if base.is_zero() && exponent.is_sign_negative() && exponent.is_finite() {
                signals.insert(Condition::DivZero);
            }
            Float::with_val_round(precision, (&base).pow(&exponent), round)
        }
    };
    finish(context, value, ternary, signals, operation).map(Number::Real)
}

/// Square root. Negative values are NaN, or have a Complex root when the context allows complex results.
pub(crate) fn sqrt(context: &mut NumericContext, x: &Number, operation: &'static str) -> Result<Number, NumericError> {
    let (precision, round) = (context.precision(), Round::from(context.rounding()));
    let value = to_float(x, precision, round, operation)?;
    if value.is_sign_negative() && !value.is_zero() && !value.is_nan() && context.allow_complex() {
        return complex::sqrt(context, &Number::Real(value), operation);
    }
    let (root, ternary) = Float::with_val_round(precision, value.sqrt_ref(), round);
    finish(context, root, ternary, Signals::NONE, operation).map(Number::Real)
}

/// Rounds `value` into the context precision, as a Real result of `operation`.
pub(crate) fn round_into(
    context: &mut NumericContext,
    value: &Float,
    signals: Signals,
    operation: &'static str,
) -> Result<Float, NumericError> {
    let (value, ternary) = Float::with_val_round(context.precision(), value, Round::from(context.rounding()));
    finish(context, value, ternary, signals, operation)
}

/// Exact comparison of two non Complex values, `None` when either is NaN.
pub(crate) fn compare(x: &Number, y: &Number) -> Option<Ordering> {
    match (RealOperand::new(x)?, RealOperand::new(y)?) {
        (RealOperand::Float(x), RealOperand::Float(y)) => x.partial_cmp(&y),
        (RealOperand::Float(x), RealOperand::Rational(y)) => x.partial_cmp(&y),
        (RealOperand::Rational(x), RealOperand::Float(y)) => y.partial_cmp(&x).map(Ordering::reverse),
        (RealOperand::Rational(x), RealOperand::Rational(y)) => Some(x.cmp(&y)),
    }
}

/// Converts a non Complex value to a float. Fractions are rounded, integers are exact.
pub(crate) fn to_float(
    number: &Number,
    precision: u32,
    round: Round,
    operation: &'static str,
) -> Result<Float, NumericError> {
    RealOperand::new(number)
        .map(|operand| operand.into_float(precision, round))
        .ok_or_else(|| NumericError::Type(format!("{operation}() requires a non complex argument")))
}

fn operands(x: &Number, y: &Number, operation: &'static str) -> Result<(RealOperand, RealOperand), NumericError> {
    match (RealOperand::new(x), RealOperand::new(y)) {
        (Some(x), Some(y)) => Ok((x, y)),
        _ => Err(NumericError::Type(format!("{operation}() requires non complex arguments"))),
    }
}

fn floats(
    context: &NumericContext,
    x: &Number,
    y: &Number,
    operation: &'static str,
) -> Result<(Float, Float), NumericError> {
    let (precision, round) = (context.precision(), Round::from(context.rounding()));
    Ok((to_float(x, precision, round, operation)?, to_float(y, precision, round, operation)?))
}

/// Fits a rounded result into the context and commits its conditions.
pub(crate) fn finish(
    context: &mut NumericContext,
    value: Float,
    ternary: Ordering,
    signals: Signals,
    operation: &'static str,
) -> Result<Float, NumericError> {
    let (value, signals) = fit(context, value, ternary, context.rounding(), signals);
    context.commit(signals, operation)?;
    Ok(value)
}

/// Brings a value rounded with `rounding` into the context exponent range.
///
/// `ternary` tells how the rounded value compares to the exact one. The returned signals are the given ones
/// plus whatever condition the value ran into.
pub(crate) fn fit(
    context: &NumericContext,
    value: Float,
    ternary: Ordering,
    rounding: RoundingMode,
    mut signals: Signals,
) -> (Float, Signals) {
    if value.is_nan() {
        signals.insert(Condition::Invalid);
        return (value, signals);
    }
    let exponent = match value.get_exp() {
        Some(exponent) => exponent,
        None => {
            // Zeros and infinities are only exceptional when the engine rounded to them.
            if ternary != Ordering::Equal {
                signals.insert(if value.is_infinite() { Condition::Overflow } else { Condition::Underflow });
                signals.insert(Condition::Inexact);
            }
            return (value, signals);
        }
    };
    let precision = value.prec();
    let negative = value.is_sign_negative();

    if exponent > context.exponent_max() {
        signals |= Signals::from(Condition::Overflow) | Condition::Inexact;
        return (overflowed(precision, negative, rounding, context.exponent_max()), signals);
    }
    if exponent < context.exponent_min() {
        signals |= Signals::from(Condition::Underflow) | Condition::Inexact;
        let to_zero = match rounding {
            RoundingMode::ToNearestTiesEven => {
                // Exactly half the smallest value rounds to zero unless it was rounded down to get there.
                let rounded_toward_zero = if negative { Ordering::Greater } else { Ordering::Less };
                exponent < context.exponent_min() - 1
                    || (is_power_of_two(&value, exponent) && ternary != rounded_toward_zero)
            }
            RoundingMode::TowardZero => true,
            RoundingMode::AwayFromZero => false,
            RoundingMode::Up => negative,
            RoundingMode::Down => !negative,
        };
        return (underflowed(precision, negative, to_zero, context.exponent_min()), signals);
    }

    let subnormal = context.subnormalize().then(|| subnormalize(&value, ternary, rounding, context.exponent_min()));
    let (value, ternary) = match subnormal.flatten() {
        Some((subnormal, ternary)) => {
            if ternary != Ordering::Equal {
                signals.insert(Condition::Underflow);
            }
            (subnormal, ternary)
        }
        None => (value, ternary),
    };
    if ternary != Ordering::Equal {
        signals.insert(Condition::Inexact);
    }
    (value, signals)
}

/// The value an overflowing result is replaced with: an infinity, or the largest finite value when rounding
/// goes toward zero.
fn overflowed(precision: u32, negative: bool, rounding: RoundingMode, exponent_max: i32) -> Float {
    let to_largest = match rounding {
        RoundingMode::ToNearestTiesEven | RoundingMode::AwayFromZero => false,
        RoundingMode::TowardZero => true,
        RoundingMode::Up => negative,
        RoundingMode::Down => !negative,
    };
    let magnitude = if to_largest {
        let mut largest = Float::with_val(precision, 1);
        largest.next_down();
        largest << exponent_max
    } else {
        Float::with_val(precision, Special::Infinity)
    };
    if negative { -magnitude } else { magnitude }
}

/// The value an underflowing result is replaced with: a zero or the smallest positive value, signed.
fn underflowed(precision: u32, negative: bool, to_zero: bool, exponent_min: i32) -> Float {
    let magnitude = if to_zero {
        Float::with_val(precision, Special::Zero)
    } else {
        Float::with_val(precision, 1) << (exponent_min - 1)
    };
    if negative { -magnitude } else { magnitude }
}

fn is_power_of_two(value: &Float, exponent: i32) -> bool {
    *value.as_abs() == Float::with_val(1, 1) << (exponent - 1)
}

/// Rounds a tiny value again so that it only keeps the bits a subnormal number would have. `None` when the
/// value isn't in the subnormal range.
///
/// Round to nearest can round twice in the same direction through a midpoint; the first ternary tells when
/// that happened and the second rounding is moved back.
fn subnormalize(
    value: &Float,
    ternary: Ordering,
    rounding: RoundingMode,
    exponent_min: i32,
) -> Option<(Float, Ordering)> {
    let precision = value.prec();
    let subnormal_precision = value
        .get_exp()
        .and_then(|exponent| u32::try_from(i64::from(exponent) - i64::from(exponent_min) + 1).ok())
        .filter(|subnormal_precision| *subnormal_precision < precision)?;
    let subnormal_precision = subnormal_precision.max(rug::float::prec_min());
    let (mut narrowed, mut narrowed_ternary) =
        Float::with_val_round(subnormal_precision, value, Round::from(rounding));
    let midpoint = Float::with_val_round(subnormal_precision + 1, value, Round::Zero).1 == Ordering::Equal;
    if rounding == RoundingMode::ToNearestTiesEven
        && midpoint
        && narrowed_ternary != Ordering::Equal
        && narrowed_ternary == ternary
    {
        if narrowed_ternary == Ordering::Greater {
            narrowed.next_down();
        } else {
            narrowed.next_up();
        }
        narrowed_ternary = narrowed_ternary.reverse();
    }
    let ternary = if narrowed_ternary == Ordering::Equal { ternary } else { narrowed_ternary };
    Some((Float::with_val(precision, &narrowed), ternary))
}

#[cfg(test)]
mod test {
    use super::*;
    use num_bigint::BigInt;
    use num_rational::BigRational;
    use rstest::rstest;

    fn context() -> NumericContext {
        NumericContext::default()
    }

    fn real(value: f64) -> Number {
        Number::Real(Float::with_val(53, value))
    }

    #[rstest]
    #[case(Arithmetic::Add, 1.5, 2.25, 3.75)]
    #[case(Arithmetic::Sub, 1.5, 2.25, -0.75)]
    #[case(Arithmetic::Mul, 1.5, 2.25, 3.375)]
    #[case(Arithmetic::Div, 3.0, 0.5, 6.0)]
    fn exact_arithmetic(#[case] arithmetic: Arithmetic, #[case] x: f64, #[case] y: f64, #[case] expected: f64) {
        let mut context = context();
        let value = super::arithmetic(&mut context, arithmetic, &real(x), &real(y), "op").unwrap();
        assert_eq!(value, expected);
        assert!(context.flags().is_empty());
    }

    #[test]
    fn mixed_rational_is_rounded_once() {
        let mut context = context();
        let third = Number::Rational(BigRational::new(1.into(), 3.into()));
        let value = arithmetic(&mut context, Arithmetic::Add, &real(0.0), &third, "add").unwrap();
        assert_eq!(value, Float::with_val(53, 1.0 / 3.0));
        assert!(context.flag_inexact());
    }

    #[test]
    fn division_by_zero_sets_divzero() {
        let mut context = context();
        let value = arithmetic(&mut context, Arithmetic::Div, &real(-1.0), &Number::Integer(0.into()), "div").unwrap();
        assert!(value.is_infinite() && value.is_sign_negative());
        assert!(context.flag_divzero());

        let value = arithmetic(&mut context, Arithmetic::Div, &real(0.0), &real(0.0), "div").unwrap();
        assert!(value.is_nan());
        assert!(context.flag_invalid());
    }

    #[test]
    fn trapped_division_by_zero() {
        let mut context = context();
        context.set_trap_divzero(true);
        let result = arithmetic(&mut context, Arithmetic::Div, &real(1.0), &real(0.0), "div");
        assert_eq!(result, Err(NumericError::DivisionByZero("div")));
        assert!(!context.flag_divzero());
    }

    #[rstest]
    #[case(RoundingMode::ToNearestTiesEven, false, true)]
    #[case(RoundingMode::TowardZero, false, false)]
    #[case(RoundingMode::Up, false, true)]
    #[case(RoundingMode::Down, false, false)]
    #[case(RoundingMode::Up, true, false)]
    #[case(RoundingMode::Down, true, true)]
    fn overflow_replacement(#[case] rounding: RoundingMode, #[case] negative: bool, #[case] infinite: bool) {
        let mut context = context();
        context.set_exponent_max(10).unwrap();
        context.set_rounding(rounding);
        let x = real(if negative { -1000.0 } else { 1000.0 });
        let value = arithmetic(&mut context, Arithmetic::Mul, &x, &real(8.0), "mul").unwrap();
        assert_eq!(value.is_infinite(), infinite);
        assert_eq!(value.is_sign_negative(), negative);
        if !infinite {
            assert_eq!(value.get_exp(), Some(10));
            assert!(value.as_abs().to_f64() < 1024.0);
        }
        assert!(context.flag_overflow());
        assert!(context.flag_inexact());
    }

    #[rstest]
    #[case(RoundingMode::ToNearestTiesEven, 0.25, 0.0)]
    #[case(RoundingMode::ToNearestTiesEven, 0.3, 0.5)]
    #[case(RoundingMode::ToNearestTiesEven, 0.125, 0.0)]
    #[case(RoundingMode::TowardZero, 0.4, 0.0)]
    #[case(RoundingMode::AwayFromZero, 0.01, 0.5)]
    #[case(RoundingMode::Up, 0.01, 0.5)]
    fn underflow_replacement(#[case] rounding: RoundingMode, #[case] x: f64, #[case] expected: f64) {
        let mut context = context();
        // The smallest positive value is then 2^-1.
        context.set_exponent_min(0).unwrap();
        context.set_rounding(rounding);
        let value = arithmetic(&mut context, Arithmetic::Mul, &real(x), &real(1.0), "mul").unwrap();
        assert_eq!(value, expected);
        assert!(context.flag_underflow());
    }

    #[test]
    fn subnormal_results_lose_precision() {
        let mut context = context();
        context.set_exponent_min(-4).unwrap();
        context.set_subnormalize(true);
        // 0.11011b * 2^-2 only keeps 3 bits when the smallest value is 2^-5.
        let x = real(27.0 / 128.0);
        let value = arithmetic(&mut context, Arithmetic::Mul, &x, &real(1.0), "mul").unwrap();
        assert_eq!(value, 7.0 / 32.0);
        assert_eq!(value.prec(), 53);
        assert!(context.flag_inexact());
        assert!(context.flag_underflow());
    }

    #[test]
    fn nan_results_are_invalid() {
        let mut context = context();
        let value = sqrt(&mut context, &real(-4.0), "sqrt").unwrap();
        assert!(value.as_real().is_some_and(Float::is_nan));
        assert!(context.flag_invalid());
    }

    #[test]
    fn negative_sqrt_with_complex_results() {
        let mut context = context();
        context.set_allow_complex(true);
        let value = sqrt(&mut context, &Number::Integer((-4).into()), "sqrt").unwrap();
        let value = value.as_complex().cloned().unwrap();
        assert_eq!(*value.real(), 0);
        assert_eq!(*value.imag(), 2);
        assert!(context.flags().is_empty());
    }

    #[rstest]
    #[case(7.0, 3.0, 1.0)]
    #[case(-7.0, 3.0, 2.0)]
    #[case(7.0, -3.0, -2.0)]
    #[case(-7.0, -3.0, -1.0)]
    #[case(5.5, 2.0, 1.5)]
    fn floored_modulo(#[case] x: f64, #[case] y: f64, #[case] expected: f64) {
        let mut context = context();
        assert_eq!(modulo(&mut context, &real(x), &real(y), "mod").unwrap(), expected);
    }

    #[test]
    fn modulo_edge_cases() {
        let mut context = context();
        let zero = modulo(&mut context, &real(6.0), &real(-3.0), "mod").unwrap();
        assert!(zero.is_zero() && zero.is_sign_negative());

        let value = modulo(&mut context, &real(-1.0), &real(f64::INFINITY), "mod").unwrap();
        assert!(value.is_infinite());
        let value = modulo(&mut context, &real(1.0), &real(f64::INFINITY), "mod").unwrap();
        assert_eq!(value, 1.0);

        assert!(!context.flag_divzero());
        let value = modulo(&mut context, &real(1.0), &real(0.0), "mod").unwrap();
        assert!(value.is_nan());
        assert!(context.flag_divzero());
    }

    #[rstest]
    #[case(7.0, 2.0, 3.0)]
    #[case(-7.0, 2.0, -4.0)]
    #[case(7.5, -2.5, -3.0)]
    fn floored_division(#[case] x: f64, #[case] y: f64, #[case] expected: f64) {
        let mut context = context();
        assert_eq!(floor_div(&mut context, &real(x), &real(y), "floor_div").unwrap(), expected);
        assert!(context.flags().is_empty());

        context.set_trap_inexact(true);
        assert_eq!(floor_div(&mut context, &real(x), &real(y), "floor_div"), Ok(Float::with_val(53, expected)));
    }

    #[test]
    fn floored_division_of_a_rounded_quotient() {
        let mut context = context();
        // The third of 2^80 + 1 is not representable and its floor needs 79 bits.
        let x = Number::Integer((BigInt::from(1) << 80u32) + 1);
        let value = floor_div(&mut context, &x, &real(3.0), "floor_div").unwrap();
        assert!(value.is_integer());
        assert!(context.flag_inexact());

        context.clear_flags();
        let value = floor_div(&mut context, &real(1.0), &real(3.0), "floor_div").unwrap();
        assert!(value.is_zero());
        assert!(context.flags().is_empty());
    }

    #[test]
    fn integer_exponents_are_exact() {
        let mut context = context();
        let value = pow(&mut context, &real(2.0), &Number::Integer((-3).into()), "pow").unwrap();
        assert_eq!(value, Number::Real(Float::with_val(53, 0.125)));
        assert!(context.flags().is_empty());
    }

    #[test]
    fn negative_base_with_fractional_exponent() {
        let mut context = context();
        let value = pow(&mut context, &real(-8.0), &real(0.5), "pow").unwrap();
        assert!(value.as_real().is_some_and(Float::is_nan));
        assert!(context.flag_invalid());

        context.set_allow_complex(true);
        let value = pow(&mut context, &real(-4.0), &real(0.5), "pow").unwrap();
        assert_eq!(value.level(), crate::number::TowerLevel::Complex);
    }

    #[rstest]
    #[case(Number::Integer(3.into()), real(2.5), Some(Ordering::Greater))]
    #[case(Number::Rational(BigRational::new(1.into(), 3.into())), real(1.0 / 3.0), Some(Ordering::Greater))]
    #[case(real(0.5), Number::Rational(BigRational::new(1.into(), 2.into())), Some(Ordering::Equal))]
    #[case(real(f64::NAN), Number::Integer(BigInt::from(1)), None)]
    fn exact_comparison(#[case] x: Number, #[case] y: Number, #[case] expected: Option<Ordering>) {
        assert_eq!(compare(&x, &y), expected);
    }
}
