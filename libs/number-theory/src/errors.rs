//! Crate errors.

use thiserror::Error;

/// An error raised by one of the integer functions.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntegerError {
    /// An argument violates a precondition of the function.
    #[error("{0}")]
    Value(&'static str),

    /// Division by zero or by a value that has no inverse.
    #[error("{0}")]
    DivByZero(&'static str),
}
