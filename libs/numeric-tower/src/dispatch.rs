//! Type promotion for binary operations.
//!
//! Both operands are classified into a [`TowerLevel`] and the operation runs at the highest of the two.
//! Integer and Rational operations are exact and never touch a context. Real and Complex operations lock the
//! context they were given, or the active one, for their whole duration.

use crate::{
    complex,
    context::{get_active, Condition, NumericContext, SharedContext, Signals},
    errors::NumericError,
    number::{Number, Operand, TowerLevel},
    real::{self, Arithmetic},
};
use num_bigint::BigInt;
use num_integer::Integer;
use num_rational::BigRational;
use num_traits::{One, Signed, ToPrimitive, Zero};
use rug::Complex;
use std::cmp::Ordering;
use tracing::debug;

pub(crate) struct OperationDisplay {
    pub(crate) name: &'static str,
    pub(crate) symbol: &'static str,
}

/// A binary operation, with one routine per tower level.
pub(crate) trait BinaryOperation {
    fn display_info(&self) -> OperationDisplay;

    /// The level the operation runs at.
    fn level(&self, x: &Number, y: &Number) -> TowerLevel {
        x.level().max(y.level())
    }

    fn integer(&self, x: &BigInt, y: &BigInt) -> Result<Number, NumericError>;

    fn rational(&self, x: &BigRational, y: &BigRational) -> Result<Number, NumericError>;

    fn real(&self, context: &mut NumericContext, x: &Number, y: &Number) -> Result<Number, NumericError>;

    fn complex(&self, context: &mut NumericContext, x: &Complex, y: &Complex) -> Result<Number, NumericError>;
}

fn zero_division(name: &'static str) -> NumericError {
    NumericError::ZeroDivision(format!("{name}() division by zero"))
}

pub(crate) struct Add;

impl BinaryOperation for Add {
    fn display_info(&self) -> OperationDisplay {
        OperationDisplay { name: "add", symbol: "+" }
    }

    fn integer(&self, x: &BigInt, y: &BigInt) -> Result<Number, NumericError> {
        Ok(Number::Integer(x + y))
    }

    fn rational(&self, x: &BigRational, y: &BigRational) -> Result<Number, NumericError> {
        Ok(Number::Rational(x + y))
    }

    fn real(&self, context: &mut NumericContext, x: &Number, y: &Number) -> Result<Number, NumericError> {
        real::arithmetic(context, Arithmetic::Add, x, y, self.display_info().name).map(Number::Real)
    }

    fn complex(&self, context: &mut NumericContext, x: &Complex, y: &Complex) -> Result<Number, NumericError> {
        complex::arithmetic(context, Arithmetic::Add, x, y, self.display_info().name).map(Number::Complex)
    }
}

pub(crate) struct Sub;

impl BinaryOperation for Sub {
    fn display_info(&self) -> OperationDisplay {
        OperationDisplay { name: "sub", symbol: "-" }
    }

    fn integer(&self, x: &BigInt, y: &BigInt) -> Result<Number, NumericError> {
        Ok(Number::Integer(x - y))
    }

    fn rational(&self, x: &BigRational, y: &BigRational) -> Result<Number, NumericError> {
        Ok(Number::Rational(x - y))
    }

    fn real(&self, context: &mut NumericContext, x: &Number, y: &Number) -> Result<Number, NumericError> {
        real::arithmetic(context, Arithmetic::Sub, x, y, self.display_info().name).map(Number::Real)
    }

    fn complex(&self, context: &mut NumericContext, x: &Complex, y: &Complex) -> Result<Number, NumericError> {
        complex::arithmetic(context, Arithmetic::Sub, x, y, self.display_info().name).map(Number::Complex)
    }
}

pub(crate) struct Mul;

impl BinaryOperation for Mul {
    fn display_info(&self) -> OperationDisplay {
        OperationDisplay { name: "mul", symbol: "*" }
    }

    fn integer(&self, x: &BigInt, y: &BigInt) -> Result<Number, NumericError> {
        Ok(Number::Integer(x * y))
    }

    fn rational(&self, x: &BigRational, y: &BigRational) -> Result<Number, NumericError> {
        Ok(Number::Rational(x * y))
    }

    fn real(&self, context: &mut NumericContext, x: &Number, y: &Number) -> Result<Number, NumericError> {
        real::arithmetic(context, Arithmetic::Mul, x, y, self.display_info().name).map(Number::Real)
    }

    fn complex(&self, context: &mut NumericContext, x: &Complex, y: &Complex) -> Result<Number, NumericError> {
        complex::arithmetic(context, Arithmetic::Mul, x, y, self.display_info().name).map(Number::Complex)
    }
}

/// True division. Integers divide into an exact fraction.
pub(crate) struct Div;

impl BinaryOperation for Div {
    fn display_info(&self) -> OperationDisplay {
        OperationDisplay { name: "div", symbol: "/" }
    }

    fn integer(&self, x: &BigInt, y: &BigInt) -> Result<Number, NumericError> {
        if y.is_zero() {
            return Err(zero_division(self.display_info().name));
        }
        Ok(Number::demoted(BigRational::new(x.clone(), y.clone())))
    }

    fn rational(&self, x: &BigRational, y: &BigRational) -> Result<Number, NumericError> {
        if y.is_zero() {
            return Err(zero_division(self.display_info().name));
        }
        Ok(Number::Rational(x / y))
    }

    fn real(&self, context: &mut NumericContext, x: &Number, y: &Number) -> Result<Number, NumericError> {
        real::arithmetic(context, Arithmetic::Div, x, y, self.display_info().name).map(Number::Real)
    }

    fn complex(&self, context: &mut NumericContext, x: &Complex, y: &Complex) -> Result<Number, NumericError> {
        complex::arithmetic(context, Arithmetic::Div, x, y, self.display_info().name).map(Number::Complex)
    }
}

pub(crate) struct FloorDiv;

impl BinaryOperation for FloorDiv {
    fn display_info(&self) -> OperationDisplay {
        OperationDisplay { name: "floor_div", symbol: "//" }
    }

    fn integer(&self, x: &BigInt, y: &BigInt) -> Result<Number, NumericError> {
        if y.is_zero() {
            return Err(zero_division(self.display_info().name));
        }
        Ok(Number::Integer(x.div_floor(y)))
    }

    fn rational(&self, x: &BigRational, y: &BigRational) -> Result<Number, NumericError> {
        if y.is_zero() {
            return Err(zero_division(self.display_info().name));
        }
        Ok(Number::Integer((x / y).floor().to_integer()))
    }

    fn real(&self, context: &mut NumericContext, x: &Number, y: &Number) -> Result<Number, NumericError> {
        real::floor_div(context, x, y, self.display_info().name).map(Number::Real)
    }

    fn complex(&self, _: &mut NumericContext, _: &Complex, _: &Complex) -> Result<Number, NumericError> {
        Err(NumericError::Type("can't take floor of complex number".to_string()))
    }
}

pub(crate) struct Mod;

impl BinaryOperation for Mod {
    fn display_info(&self) -> OperationDisplay {
        OperationDisplay { name: "modulo", symbol: "%" }
    }

    fn integer(&self, x: &BigInt, y: &BigInt) -> Result<Number, NumericError> {
        if y.is_zero() {
            return Err(zero_division(self.display_info().name));
        }
        Ok(Number::Integer(x.mod_floor(y)))
    }

    fn rational(&self, x: &BigRational, y: &BigRational) -> Result<Number, NumericError> {
        if y.is_zero() {
            return Err(zero_division(self.display_info().name));
        }
        Ok(Number::Rational(x - y * (x / y).floor()))
    }

    fn real(&self, context: &mut NumericContext, x: &Number, y: &Number) -> Result<Number, NumericError> {
        real::modulo(context, x, y, self.display_info().name).map(Number::Real)
    }

    fn complex(&self, _: &mut NumericContext, _: &Complex, _: &Complex) -> Result<Number, NumericError> {
        Err(NumericError::Type("can't take modulo of complex number".to_string()))
    }
}

/// Exponentiation. Negative integer exponents stay exact, fractional exponents move to the Real level.
pub(crate) struct Pow;

impl Pow {
    fn exact(&self, base: &BigRational, exponent: &BigInt) -> Result<BigRational, NumericError> {
        let name = self.display_info().name;
        if base.is_zero() && exponent.is_negative() {
            return Err(NumericError::ZeroDivision(format!("{name}() zero can't be raised to a negative power")));
        }
        // Powers of 0, 1 and -1 don't grow, whatever the exponent size.
        if base.is_zero() || base.abs().is_one() {
            let odd = exponent.is_odd();
            let value = if exponent.is_zero() {
                BigRational::one()
            } else if base.is_negative() && !odd {
                -base.clone()
            } else {
                base.clone()
            };
            return Ok(value);
        }
        let exponent =
            exponent.to_i32().ok_or_else(|| NumericError::Value(format!("{name}() exponent is too large")))?;
        Ok(base.pow(exponent))
    }
}

impl BinaryOperation for Pow {
    fn display_info(&self) -> OperationDisplay {
        OperationDisplay { name: "pow", symbol: "**" }
    }

    fn level(&self, x: &Number, y: &Number) -> TowerLevel {
        let level = x.level().max(y.level());
        match y {
            Number::Rational(exponent) if !exponent.is_integer() => level.max(TowerLevel::Real),
            _ => level,
        }
    }

    fn integer(&self, x: &BigInt, y: &BigInt) -> Result<Number, NumericError> {
        let power = self.exact(&BigRational::from_integer(x.clone()), y)?;
        Ok(Number::demoted(power))
    }

    fn rational(&self, x: &BigRational, y: &BigRational) -> Result<Number, NumericError> {
        if !y.is_integer() {
            return Err(NumericError::Value(format!("{}() exponent isn't an integer", self.display_info().name)));
        }
        self.exact(x, &y.to_integer()).map(Number::Rational)
    }

    fn real(&self, context: &mut NumericContext, x: &Number, y: &Number) -> Result<Number, NumericError> {
        real::pow(context, x, y, self.display_info().name)
    }

    fn complex(&self, context: &mut NumericContext, x: &Complex, y: &Complex) -> Result<Number, NumericError> {
        complex::pow(context, &Number::Complex(x.clone()), &Number::Complex(y.clone()), self.display_info().name)
    }
}

fn numbers(x: &dyn Operand, y: &dyn Operand, name: &'static str) -> Result<(Number, Number), NumericError> {
    match (x.to_number(), y.to_number()) {
        (Some(x), Some(y)) => Ok((x, y)),
        _ => Err(NumericError::Type(format!("{name}() requires numeric arguments"))),
    }
}

fn resolve(context: Option<&SharedContext>) -> SharedContext {
    context.cloned().unwrap_or_else(get_active)
}

pub(crate) fn dispatch<O: BinaryOperation>(
    operation: O,
    x: &dyn Operand,
    y: &dyn Operand,
    context: Option<&SharedContext>,
) -> Result<Number, NumericError> {
    let OperationDisplay { name, symbol } = operation.display_info();
    let (x, y) = numbers(x, y, name)?;
    let level = operation.level(&x, &y);
    debug!(operation = name, level = <&'static str>::from(level), "dispatching {x} {symbol} {y}");

    if level <= TowerLevel::Rational {
        if let (Number::Integer(x), Number::Integer(y)) = (&x, &y) {
            return operation.integer(x, y);
        }
        if let (Some(x), Some(y)) = (x.to_rational(), y.to_rational()) {
            return operation.rational(&x, &y);
        }
    }

    let shared = resolve(context);
    let mut context = shared.lock();
    for exponent in x.exponents().into_iter().chain(y.exponents()) {
        context.check_exponent(exponent, name)?;
    }
    if level == TowerLevel::Complex {
        let (x, y) = (complex::to_complex(&context, &x, name)?, complex::to_complex(&context, &y, name)?);
        operation.complex(&mut context, &x, &y)
    } else {
        operation.real(&mut context, &x, &y)
    }
}

/// `x + y`.
pub fn add(x: &dyn Operand, y: &dyn Operand, context: Option<&SharedContext>) -> Result<Number, NumericError> {
    dispatch(Add, x, y, context)
}

/// `x - y`.
pub fn sub(x: &dyn Operand, y: &dyn Operand, context: Option<&SharedContext>) -> Result<Number, NumericError> {
    dispatch(Sub, x, y, context)
}

/// `x * y`.
pub fn mul(x: &dyn Operand, y: &dyn Operand, context: Option<&SharedContext>) -> Result<Number, NumericError> {
    dispatch(Mul, x, y, context)
}

/// True division `x / y`. Two integers divide into an exact fraction, an Integer again when it is integral.
pub fn div(x: &dyn Operand, y: &dyn Operand, context: Option<&SharedContext>) -> Result<Number, NumericError> {
    dispatch(Div, x, y, context)
}

/// Floored division `x // y`.
pub fn floor_div(x: &dyn Operand, y: &dyn Operand, context: Option<&SharedContext>) -> Result<Number, NumericError> {
    dispatch(FloorDiv, x, y, context)
}

/// Floored modulo `x % y`, with the sign of `y`.
pub fn modulo(x: &dyn Operand, y: &dyn Operand, context: Option<&SharedContext>) -> Result<Number, NumericError> {
    dispatch(Mod, x, y, context)
}

/// `x ** y`.
pub fn pow(x: &dyn Operand, y: &dyn Operand, context: Option<&SharedContext>) -> Result<Number, NumericError> {
    dispatch(Pow, x, y, context)
}

/// Compares two non Complex values exactly.
///
/// Returns `None` when either value is NaN, which also raises the `erange` condition of the context.
pub fn compare(
    x: &dyn Operand,
    y: &dyn Operand,
    context: Option<&SharedContext>,
) -> Result<Option<Ordering>, NumericError> {
    let name = "compare";
    let (x, y) = numbers(x, y, name)?;
    if x.level() == TowerLevel::Complex || y.level() == TowerLevel::Complex {
        return Err(NumericError::Type("no ordering relation is defined for complex numbers".to_string()));
    }
    let ordering = real::compare(&x, &y);
    if ordering.is_none() {
        resolve(context).lock().commit(Signals::from(Condition::Erange), name)?;
    }
    Ok(ordering)
}

/// Tells whether two values are equal. Values of every level can be compared, NaN is equal to nothing.
pub fn equals(x: &dyn Operand, y: &dyn Operand) -> Result<bool, NumericError> {
    let (x, y) = numbers(x, y, "equals")?;
    let ((x_real, x_imag), (y_real, y_imag)) = (components(x), components(y));
    let equal = |x: &Number, y: &Number| real::compare(x, y) == Some(Ordering::Equal);
    Ok(equal(&x_real, &y_real) && equal(&x_imag, &y_imag))
}

fn components(number: Number) -> (Number, Number) {
    match number {
        Number::Complex(value) => {
            let (real, imag) = value.into_real_imag();
            (Number::Real(real), Number::Real(imag))
        }
        number => (number, Number::Integer(BigInt::zero())),
    }
}
