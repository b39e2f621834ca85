//! Context construction options.

use super::{NumericContext, RoundingMode};
use crate::errors::NumericError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Overrides applied on top of the default context. Every missing option keeps its default.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ContextOptions {
    /// Default precision, in bits.
    pub precision: Option<u32>,

    /// Precision of real components of complex results.
    pub real_precision: Option<u32>,

    /// Precision of imaginary components of complex results.
    pub imag_precision: Option<u32>,

    /// Default rounding mode.
    pub rounding: Option<RoundingMode>,

    /// Rounding of real components of complex results.
    pub real_rounding: Option<RoundingMode>,

    /// Rounding of imaginary components of complex results.
    pub imag_rounding: Option<RoundingMode>,

    /// Largest exponent of a Real result.
    pub exponent_max: Option<i32>,

    /// Smallest exponent of a Real result.
    pub exponent_min: Option<i32>,

    /// Gradual underflow.
    pub subnormalize: Option<bool>,

    /// Raise on underflow.
    pub trap_underflow: Option<bool>,

    /// Raise on overflow.
    pub trap_overflow: Option<bool>,

    /// Raise on inexact results.
    pub trap_inexact: Option<bool>,

    /// Raise on invalid operations.
    pub trap_invalid: Option<bool>,

    /// Raise on range errors.
    pub trap_erange: Option<bool>,

    /// Raise on division by zero.
    pub trap_divzero: Option<bool>,

    /// Raise on operands with an exponent outside the bounds.
    pub trap_expbound: Option<bool>,

    /// Let Real routines return Complex results.
    pub allow_complex: Option<bool>,
}

impl ContextOptions {
    /// Loads the options from a YAML file.
    ///
    /// Any option can also be overridden through an environment variable prefixed with `NUMERIC__`, for
    /// example `NUMERIC__PRECISION=113` or `NUMERIC__ROUNDING=toward_zero`.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, NumericError> {
        let source = config::File::from(path.as_ref()).format(config::FileFormat::Yaml);
        let config = config::Config::builder()
            .add_source(source)
            .add_source(
                config::Environment::with_prefix("NUMERIC").prefix_separator("__").separator("__").try_parsing(true),
            )
            .build()?;
        Ok(config.try_deserialize()?)
    }

    pub(super) fn apply(self, context: &mut NumericContext) -> Result<(), NumericError> {
        if let Some(precision) = self.precision {
            context.set_precision(precision)?;
        }
        context.set_real_precision(self.real_precision)?;
        context.set_imag_precision(self.imag_precision)?;
        if let Some(rounding) = self.rounding {
            context.set_rounding(rounding);
        }
        context.set_real_rounding(self.real_rounding)?;
        context.set_imag_rounding(self.imag_rounding)?;

        // The defaults are the widest bounds, so the minimum can always be narrowed first.
        if let Some(exponent_min) = self.exponent_min {
            context.set_exponent_min(exponent_min)?;
        }
        if let Some(exponent_max) = self.exponent_max {
            context.set_exponent_max(exponent_max)?;
        }

        let flags = [
            (self.subnormalize, NumericContext::set_subnormalize as fn(&mut NumericContext, bool)),
            (self.trap_underflow, NumericContext::set_trap_underflow),
            (self.trap_overflow, NumericContext::set_trap_overflow),
            (self.trap_inexact, NumericContext::set_trap_inexact),
            (self.trap_invalid, NumericContext::set_trap_invalid),
            (self.trap_erange, NumericContext::set_trap_erange),
            (self.trap_divzero, NumericContext::set_trap_divzero),
            (self.trap_expbound, NumericContext::set_trap_expbound),
            (self.allow_complex, NumericContext::set_allow_complex),
        ];
        for (value, setter) in flags {
            if let Some(value) = value {
                setter(context, value);
            }
        }
        Ok(())
    }
}
