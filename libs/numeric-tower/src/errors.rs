//! Crate errors.

use number_theory::errors::IntegerError;
use thiserror::Error;

/// An error raised by a numeric operation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NumericError {
    /// An operand can't be used at the required tower level.
    #[error("{0}")]
    Type(String),

    /// An argument violates a precondition of the operation.
    #[error("{0}")]
    Value(String),

    /// Division or inversion by zero at an exact level.
    #[error("{0}")]
    ZeroDivision(String),

    /// A result was too small for the exponent range and `underflow` is trapped.
    #[error("underflow in {0}")]
    Underflow(&'static str),

    /// A result was too large for the exponent range and `overflow` is trapped.
    #[error("overflow in {0}")]
    Overflow(&'static str),

    /// A result had to be rounded and `inexact` is trapped.
    #[error("inexact result in {0}")]
    Inexact(&'static str),

    /// A result was not a number and `invalid` is trapped.
    #[error("invalid operation in {0}")]
    InvalidOperation(&'static str),

    /// A comparison or exponent query involved a NaN or an infinity and `erange` is trapped.
    #[error("range error in {0}")]
    Range(&'static str),

    /// A finite value was divided by zero and `divzero` is trapped.
    #[error("division by zero in {0}")]
    DivisionByZero(&'static str),

    /// An operand exponent lies outside the context bounds and `trap_expbound` is set.
    #[error("exponent of operand in {0} is outside the context bounds")]
    ExponentOutOfBounds(&'static str),
}

impl From<IntegerError> for NumericError {
    fn from(error: IntegerError) -> Self {
        match error {
            IntegerError::Value(message) => Self::Value(message.to_string()),
            IntegerError::DivByZero(message) => Self::ZeroDivision(message.to_string()),
        }
    }
}

impl From<config::ConfigError> for NumericError {
    fn from(error: config::ConfigError) -> Self {
        Self::Value(format!("invalid context configuration: {error}"))
    }
}
