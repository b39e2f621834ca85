//! Values of the numeric tower and classification of host operands.

use num_bigint::BigInt;
use num_rational::BigRational;
use rug::{Complex, Float};
use std::fmt;
use strum_macros::IntoStaticStr;

/// Precision given to host floating point values, which are IEEE-754 doubles.
const HOST_FLOAT_PRECISION: u32 = 53;

/// A level of the numeric tower. Binary operations run at the highest level of their operands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum TowerLevel {
    /// Exact integers.
    Integer,

    /// Exact fractions.
    Rational,

    /// Binary floating point numbers with a context-defined precision.
    Real,

    /// Pairs of Real numbers.
    Complex,
}

/// A value of the numeric tower.
#[derive(Clone, Debug, PartialEq)]
pub enum Number {
    /// An integer.
    Integer(BigInt),

    /// A fraction in lowest terms.
    Rational(BigRational),

    /// A real number.
    Real(Float),

    /// A complex number.
    Complex(Complex),
}

impl Number {
    /// The level this value sits at.
    pub fn level(&self) -> TowerLevel {
        match self {
            Number::Integer(_) => TowerLevel::Integer,
            Number::Rational(_) => TowerLevel::Rational,
            Number::Real(_) => TowerLevel::Real,
            Number::Complex(_) => TowerLevel::Complex,
        }
    }

    /// The integer value, if this is an Integer.
    pub fn as_integer(&self) -> Option<&BigInt> {
        match self {
            Number::Integer(value) => Some(value),
            _ => None,
        }
    }

    /// The real value, if this is a Real.
    pub fn as_real(&self) -> Option<&Float> {
        match self {
            Number::Real(value) => Some(value),
            _ => None,
        }
    }

    /// The complex value, if this is a Complex.
    pub fn as_complex(&self) -> Option<&Complex> {
        match self {
            Number::Complex(value) => Some(value),
            _ => None,
        }
    }

    /// The exact value as a fraction, for the Integer and Rational levels.
    pub(crate) fn to_rational(&self) -> Option<BigRational> {
        match self {
            Number::Integer(value) => Some(BigRational::from_integer(value.clone())),
            Number::Rational(value) => Some(value.clone()),
            Number::Real(_) | Number::Complex(_) => None,
        }
    }

    /// Exponents of the floating point parts, for the bound checks.
    pub(crate) fn exponents(&self) -> [Option<i32>; 2] {
        match self {
            Number::Integer(_) | Number::Rational(_) => [None, None],
            Number::Real(value) => [value.get_exp(), None],
            Number::Complex(value) => [value.real().get_exp(), value.imag().get_exp()],
        }
    }

    /// Wraps a fraction, as an Integer when its denominator is 1.
    pub(crate) fn demoted(value: BigRational) -> Self {
        if value.is_integer() { Number::Integer(value.to_integer()) } else { Number::Rational(value) }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Integer(value) => value.fmt(f),
            Number::Rational(value) => value.fmt(f),
            Number::Real(value) => value.fmt(f),
            Number::Complex(value) => value.fmt(f),
        }
    }
}

impl From<BigInt> for Number {
    fn from(value: BigInt) -> Self {
        Number::Integer(value)
    }
}

impl From<BigRational> for Number {
    fn from(value: BigRational) -> Self {
        Number::Rational(value)
    }
}

impl From<Float> for Number {
    fn from(value: Float) -> Self {
        Number::Real(value)
    }
}

impl From<Complex> for Number {
    fn from(value: Complex) -> Self {
        Number::Complex(value)
    }
}

/// A host value that may take part in a numeric operation.
///
/// Classification is open: any type can become an operand by telling which tower value it stands for.
pub trait Operand {
    /// The tower value this operand stands for, `None` if it isn't numeric.
    fn to_number(&self) -> Option<Number>;
}

impl<T: Operand + ?Sized> Operand for &T {
    fn to_number(&self) -> Option<Number> {
        (**self).to_number()
    }
}

impl Operand for Number {
    fn to_number(&self) -> Option<Number> {
        Some(self.clone())
    }
}

impl Operand for BigInt {
    fn to_number(&self) -> Option<Number> {
        Some(Number::Integer(self.clone()))
    }
}

impl Operand for BigRational {
    fn to_number(&self) -> Option<Number> {
        Some(Number::Rational(self.clone()))
    }
}

impl Operand for Float {
    fn to_number(&self) -> Option<Number> {
        Some(Number::Real(self.clone()))
    }
}

impl Operand for Complex {
    fn to_number(&self) -> Option<Number> {
        Some(Number::Complex(self.clone()))
    }
}

impl Operand for bool {
    fn to_number(&self) -> Option<Number> {
        Some(Number::Integer(BigInt::from(u8::from(*self))))
    }
}

macro_rules! integer_operands {
    ($($primitive:ty),+) => {
        $(
            impl Operand for $primitive {
                fn to_number(&self) -> Option<Number> {
                    Some(Number::Integer(BigInt::from(*self)))
                }
            }
        )+
    };
}

integer_operands!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

impl Operand for f64 {
    fn to_number(&self) -> Option<Number> {
        Some(Number::Real(Float::with_val(HOST_FLOAT_PRECISION, *self)))
    }
}

impl Operand for f32 {
    fn to_number(&self) -> Option<Number> {
        Some(Number::Real(Float::with_val(HOST_FLOAT_PRECISION, *self)))
    }
}

impl Operand for str {
    fn to_number(&self) -> Option<Number> {
        None
    }
}

impl Operand for String {
    fn to_number(&self) -> Option<Number> {
        None
    }
}
