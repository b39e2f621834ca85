//! Complex level arithmetic. Each component is rounded with its own precision and rounding and then fitted
//! into the exponent range like a Real result.

use crate::{
    context::{Condition, NumericContext, RoundingMode, Signals},
    convert::{exact_float, to_rug_rational},
    errors::NumericError,
    number::Number,
    real::{self, Arithmetic},
};
use rug::{float::Round, ops::Pow, Complex, Float};
use std::cmp::Ordering;

fn precisions(context: &NumericContext) -> (u32, u32) {
    (context.real_prec(), context.imag_prec())
}

fn component_round(rounding: RoundingMode, operation: &'static str) -> Result<Round, NumericError> {
    match rounding {
        RoundingMode::AwayFromZero => {
            Err(NumericError::Value(format!("{operation}() can't round complex components away from zero")))
        }
        rounding => Ok(rounding.into()),
    }
}

fn rounds(context: &NumericContext, operation: &'static str) -> Result<(Round, Round), NumericError> {
    Ok((component_round(context.real_round(), operation)?, component_round(context.imag_round(), operation)?))
}

fn from_parts(real: Float, imag: Float) -> Complex {
    Complex::with_val((real.prec(), imag.prec()), (real, imag))
}

/// Converts any tower value to a complex number. Only fractions need rounding.
pub(crate) fn to_complex(
    context: &NumericContext,
    number: &Number,
    operation: &'static str,
) -> Result<Complex, NumericError> {
    let value = match number {
        Number::Integer(value) => {
            let real = exact_float(value);
            let imag = Float::new(real.prec());
            from_parts(real, imag)
        }
        Number::Rational(value) => {
            Complex::with_val_round(precisions(context), to_rug_rational(value), rounds(context, operation)?).0
        }
        Number::Real(value) => from_parts(value.clone(), Float::new(value.prec())),
        Number::Complex(value) => value.clone(),
    };
    Ok(value)
}

fn is_finite_nonzero(value: &Complex) -> bool {
    !value.is_zero() && value.real().is_finite() && value.imag().is_finite()
}

/// Computes `x <op> y` at the Complex level.
pub(crate) fn arithmetic(
    context: &mut NumericContext,
    arithmetic: Arithmetic,
    x: &Complex,
    y: &Complex,
    operation: &'static str,
) -> Result<Complex, NumericError> {
    let (precisions, rounds) = (precisions(context), rounds(context, operation)?);
    let mut signals = Signals::NONE;
    if arithmetic == Arithmetic::Div && y.is_zero() && is_finite_nonzero(x) {
        signals.insert(Condition::DivZero);
    }
    let (value, ternary) = match arithmetic {
        Arithmetic::Add => Complex::with_val_round(precisions, x + y, rounds),
        Arithmetic::Sub => Complex::with_val_round(precisions, x - y, rounds),
        Arithmetic::Mul => Complex::with_val_round(precisions, x * y, rounds),
        Arithmetic::Div => Complex::with_val_round(precisions, x / y, rounds),
    };
    finish(context, value, ternary, signals, operation)
}

/// `x ** y` at the Complex level.
pub(crate) fn pow(
    context: &mut NumericContext,
    x: &Number,
    y: &Number,
    operation: &'static str,
) -> Result<Number, NumericError> {
    let (x, y) = (to_complex(context, x, operation)?, to_complex(context, y, operation)?);
    let (value, ternary) = Complex::with_val_round(precisions(context), (&x).pow(&y), rounds(context, operation)?);
    finish(context, value, ternary, Signals::NONE, operation).map(Number::Complex)
}

/// Principal square root.
pub(crate) fn sqrt(context: &mut NumericContext, x: &Number, operation: &'static str) -> Result<Number, NumericError> {
    let x = to_complex(context, x, operation)?;
    let (value, ternary) = Complex::with_val_round(precisions(context), x.sqrt_ref(), rounds(context, operation)?);
    finish(context, value, ternary, Signals::NONE, operation).map(Number::Complex)
}

fn finish(
    context: &mut NumericContext,
    value: Complex,
    (real_ternary, imag_ternary): (Ordering, Ordering),
    signals: Signals,
    operation: &'static str,
) -> Result<Complex, NumericError> {
    let (real, imag) = value.into_real_imag();
    let (real, signals) = real::fit(context, real, real_ternary, context.real_round(), signals);
    let (imag, signals) = real::fit(context, imag, imag_ternary, context.imag_round(), signals);
    context.commit(signals, operation)?;
    Ok(from_parts(real, imag))
}
