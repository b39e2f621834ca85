//! A numeric tower of integers, fractions, arbitrary precision reals and complex numbers.
//!
//! Binary operations promote their operands to the highest level of the two. Real and Complex results are
//! rounded under a [`NumericContext`] that also decides whether exceptional conditions raise an error or only
//! set a flag. The context comes from the caller or from the process-wide active slot.
#![deny(missing_docs)]
#![forbid(unsafe_code)]
#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::indexing_slicing,
    clippy::iterator_step_by_zero,
    clippy::invalid_regex,
    clippy::string_slice,
    clippy::unimplemented,
    clippy::todo
)]

mod complex;
pub mod context;
mod convert;
mod dispatch;
pub mod errors;
pub mod functions;
pub mod number;
mod real;
pub mod toolkit;

pub use context::{
    get_active, local_context, set_active, Condition, ContextOptions, LocalContext, NumericContext, RoundingMode,
    SharedContext, Signals, DEFAULT_PRECISION,
};
pub use dispatch::{add, compare, div, equals, floor_div, modulo, mul, pow, sub};
pub use errors::NumericError;
pub use number::{Number, Operand, TowerLevel};
