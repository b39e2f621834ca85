//! Precision, rounding and exception policy for the Real and Complex levels.
//!
//! A [`NumericContext`] is plain data. Sharing happens through [`SharedContext`], a lock-guarded handle, and
//! one of those handles sits in a process-wide slot as the active context that operations use when the
//! caller doesn't pass one explicitly.

mod options;

pub use options::ContextOptions;

use crate::errors::NumericError;
use once_cell::sync::Lazy;
use paste::paste;
use rug::float::Round;
use serde::{Deserialize, Serialize};
use std::{
    fmt,
    ops::{BitOr, BitOrAssign},
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};
use strum::IntoEnumIterator;
use strum_macros::{EnumIter, IntoStaticStr};
use tracing::{debug, warn};

/// Precision used when none is configured, the width of an IEEE-754 double significand.
pub const DEFAULT_PRECISION: u32 = 53;

/// Rounding applied to Real and Complex results.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundingMode {
    /// Round to nearest, ties to the even neighbour.
    #[default]
    ToNearestTiesEven,

    /// Round toward zero.
    TowardZero,

    /// Round away from zero. Not available for complex components.
    AwayFromZero,

    /// Round toward negative infinity.
    Down,

    /// Round toward positive infinity.
    Up,
}

impl From<RoundingMode> for Round {
    fn from(mode: RoundingMode) -> Self {
        match mode {
            RoundingMode::ToNearestTiesEven => Round::Nearest,
            RoundingMode::TowardZero => Round::Zero,
            RoundingMode::AwayFromZero => Round::AwayZero,
            RoundingMode::Down => Round::Down,
            RoundingMode::Up => Round::Up,
        }
    }
}

/// An exceptional condition an operation can run into.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum Condition {
    /// The result was too small for the exponent range.
    Underflow,

    /// The result was too large for the exponent range.
    Overflow,

    /// The result had to be rounded.
    Inexact,

    /// The result is not a number.
    Invalid,

    /// A NaN or infinity was used where only ordered or finite values make sense.
    Erange,

    /// A finite value was divided by zero.
    #[strum(serialize = "divzero")]
    DivZero,
}

impl Condition {
    const fn bit(self) -> u8 {
        1 << self as u8
    }

    fn error(self, operation: &'static str) -> NumericError {
        match self {
            Condition::Underflow => NumericError::Underflow(operation),
            Condition::Overflow => NumericError::Overflow(operation),
            Condition::Inexact => NumericError::Inexact(operation),
            Condition::Invalid => NumericError::InvalidOperation(operation),
            Condition::Erange => NumericError::Range(operation),
            Condition::DivZero => NumericError::DivisionByZero(operation),
        }
    }
}

/// A set of conditions.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Signals(u8);

impl Signals {
    /// The empty set.
    pub const NONE: Self = Self(0);

    /// Tells whether `condition` is part of the set.
    pub fn contains(self, condition: Condition) -> bool {
        self.0 & condition.bit() != 0
    }

    /// Adds `condition` to the set.
    pub fn insert(&mut self, condition: Condition) {
        self.0 |= condition.bit();
    }

    /// Adds or removes `condition`.
    pub fn set(&mut self, condition: Condition, present: bool) {
        if present {
            self.insert(condition);
        } else {
            self.0 &= !condition.bit();
        }
    }

    /// Tells whether the set is empty.
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Iterates the conditions in the set, in declaration order.
    pub fn iter(self) -> impl Iterator<Item = Condition> {
        Condition::iter().filter(move |condition| self.contains(*condition))
    }
}

impl From<Condition> for Signals {
    fn from(condition: Condition) -> Self {
        Self(condition.bit())
    }
}

impl BitOr for Signals {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOr<Condition> for Signals {
    type Output = Self;

    fn bitor(self, rhs: Condition) -> Self {
        Self(self.0 | rhs.bit())
    }
}

impl BitOrAssign for Signals {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl fmt::Debug for Signals {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter().map(<&'static str>::from)).finish()
    }
}

/// Precision, rounding and exception policy.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NumericContext {
    precision: u32,
    real_precision: Option<u32>,
    imag_precision: Option<u32>,
    rounding: RoundingMode,
    real_rounding: Option<RoundingMode>,
    imag_rounding: Option<RoundingMode>,
    exponent_max: i32,
    exponent_min: i32,
    subnormalize: bool,
    traps: Signals,
    flags: Signals,
    trap_expbound: bool,
    allow_complex: bool,
}

impl Default for NumericContext {
    fn default() -> Self {
        Self {
            precision: DEFAULT_PRECISION,
            real_precision: None,
            imag_precision: None,
            rounding: RoundingMode::default(),
            real_rounding: None,
            imag_rounding: None,
            exponent_max: rug::float::exp_max(),
            exponent_min: rug::float::exp_min(),
            subnormalize: false,
            traps: Signals::NONE,
            flags: Signals::NONE,
            trap_expbound: false,
            allow_complex: false,
        }
    }
}

macro_rules! condition_accessors {
    ($($condition:ident => $name:ident),+ $(,)?) => {
        paste! {
            $(
                #[doc = concat!("Tells whether the `", stringify!($name), "` condition raises an error.")]
                pub fn [<trap_ $name>](&self) -> bool {
                    self.traps.contains(Condition::$condition)
                }

                #[doc = concat!("Makes the `", stringify!($name), "` condition raise an error, or only set its flag.")]
                pub fn [<set_trap_ $name>](&mut self, enabled: bool) {
                    self.traps.set(Condition::$condition, enabled);
                }

                #[doc = concat!("Tells whether an operation ran into the `", stringify!($name), "` condition.")]
                pub fn [<flag_ $name>](&self) -> bool {
                    self.flags.contains(Condition::$condition)
                }
            )+
        }
    };
}

impl NumericContext {
    /// Builds a context from `options`, every missing option taking its default.
    pub fn new(options: ContextOptions) -> Result<Self, NumericError> {
        let mut context = Self::default();
        options.apply(&mut context)?;
        Ok(context)
    }

    /// Returns an independent snapshot of this context.
    pub fn copy(&self) -> Self {
        self.clone()
    }

    /// Resets every flag. Traps are left untouched.
    pub fn clear_flags(&mut self) {
        self.flags = Signals::NONE;
    }

    /// The default precision, in bits.
    pub fn precision(&self) -> u32 {
        self.precision
    }

    /// Sets the default precision, in bits.
    pub fn set_precision(&mut self, precision: u32) -> Result<(), NumericError> {
        self.precision = checked_precision(precision)?;
        Ok(())
    }

    /// The precision of real components of complex results, `None` when it follows `precision`.
    pub fn real_precision(&self) -> Option<u32> {
        self.real_precision
    }

    /// Sets the precision of real components of complex results. `None` follows `precision`.
    pub fn set_real_precision(&mut self, precision: Option<u32>) -> Result<(), NumericError> {
        self.real_precision = precision.map(checked_precision).transpose()?;
        Ok(())
    }

    /// The precision of imaginary components of complex results, `None` when it follows the real one.
    pub fn imag_precision(&self) -> Option<u32> {
        self.imag_precision
    }

    /// Sets the precision of imaginary components of complex results. `None` follows the real precision.
    pub fn set_imag_precision(&mut self, precision: Option<u32>) -> Result<(), NumericError> {
        self.imag_precision = precision.map(checked_precision).transpose()?;
        Ok(())
    }

    /// The default rounding mode.
    pub fn rounding(&self) -> RoundingMode {
        self.rounding
    }

    /// Sets the default rounding mode.
    pub fn set_rounding(&mut self, rounding: RoundingMode) {
        self.rounding = rounding;
    }

    /// The rounding of real components of complex results, `None` when it follows `rounding`.
    pub fn real_rounding(&self) -> Option<RoundingMode> {
        self.real_rounding
    }

    /// Sets the rounding of real components of complex results. `None` follows `rounding`.
    pub fn set_real_rounding(&mut self, rounding: Option<RoundingMode>) -> Result<(), NumericError> {
        self.real_rounding = checked_component_rounding(rounding)?;
        Ok(())
    }

    /// The rounding of imaginary components of complex results, `None` when it follows the real one.
    pub fn imag_rounding(&self) -> Option<RoundingMode> {
        self.imag_rounding
    }

    /// Sets the rounding of imaginary components of complex results. `None` follows the real rounding.
    pub fn set_imag_rounding(&mut self, rounding: Option<RoundingMode>) -> Result<(), NumericError> {
        self.imag_rounding = checked_component_rounding(rounding)?;
        Ok(())
    }

    /// The largest exponent a Real result may have.
    pub fn exponent_max(&self) -> i32 {
        self.exponent_max
    }

    /// Sets the largest exponent a Real result may have.
    pub fn set_exponent_max(&mut self, exponent: i32) -> Result<(), NumericError> {
        if exponent > rug::float::exp_max() || exponent < self.exponent_min {
            return Err(NumericError::Value(format!(
                "exponent_max must be in the interval [{}, {}]",
                self.exponent_min,
                rug::float::exp_max()
            )));
        }
        self.exponent_max = exponent;
        Ok(())
    }

    /// The smallest exponent a Real result may have.
    pub fn exponent_min(&self) -> i32 {
        self.exponent_min
    }

    /// Sets the smallest exponent a Real result may have.
    pub fn set_exponent_min(&mut self, exponent: i32) -> Result<(), NumericError> {
        if exponent < rug::float::exp_min() || exponent > self.exponent_max {
            return Err(NumericError::Value(format!(
                "exponent_min must be in the interval [{}, {}]",
                rug::float::exp_min(),
                self.exponent_max
            )));
        }
        self.exponent_min = exponent;
        Ok(())
    }

    /// Tells whether results near `exponent_min` lose precision gradually.
    pub fn subnormalize(&self) -> bool {
        self.subnormalize
    }

    /// Enables or disables gradual underflow.
    pub fn set_subnormalize(&mut self, subnormalize: bool) {
        self.subnormalize = subnormalize;
    }

    /// Tells whether operands with an exponent outside the bounds raise an error.
    pub fn trap_expbound(&self) -> bool {
        self.trap_expbound
    }

    /// Makes operands with an exponent outside the bounds raise an error.
    pub fn set_trap_expbound(&mut self, enabled: bool) {
        self.trap_expbound = enabled;
    }

    /// Tells whether Real routines may return Complex results instead of NaN.
    pub fn allow_complex(&self) -> bool {
        self.allow_complex
    }

    /// Lets Real routines return Complex results instead of NaN.
    pub fn set_allow_complex(&mut self, allow: bool) {
        self.allow_complex = allow;
    }

    /// The trapped conditions.
    pub fn traps(&self) -> Signals {
        self.traps
    }

    /// The conditions operations ran into since the flags were last cleared.
    pub fn flags(&self) -> Signals {
        self.flags
    }

    condition_accessors!(
        Underflow => underflow,
        Overflow => overflow,
        Inexact => inexact,
        Invalid => invalid,
        Erange => erange,
        DivZero => divzero,
    );

    pub(crate) fn real_prec(&self) -> u32 {
        self.real_precision.unwrap_or(self.precision)
    }

    pub(crate) fn imag_prec(&self) -> u32 {
        self.imag_precision.unwrap_or_else(|| self.real_prec())
    }

    pub(crate) fn real_round(&self) -> RoundingMode {
        self.real_rounding.unwrap_or(self.rounding)
    }

    pub(crate) fn imag_round(&self) -> RoundingMode {
        self.imag_rounding.unwrap_or_else(|| self.real_round())
    }

    /// Rejects an operand exponent outside the bounds when `trap_expbound` is set.
    pub(crate) fn check_exponent(&self, exponent: Option<i32>, operation: &'static str) -> Result<(), NumericError> {
        match exponent {
            Some(exponent) if self.trap_expbound && !(self.exponent_min..=self.exponent_max).contains(&exponent) => {
                warn!(operation, exponent, "operand exponent outside the context bounds");
                Err(NumericError::ExponentOutOfBounds(operation))
            }
            _ => Ok(()),
        }
    }

    /// Applies the trap policy to the conditions an operation ran into.
    ///
    /// The first trapped condition aborts the operation and nothing is recorded. Otherwise every condition is
    /// recorded in the flags.
    pub(crate) fn commit(&mut self, signals: Signals, operation: &'static str) -> Result<(), NumericError> {
        if let Some(condition) = signals.iter().find(|condition| self.traps.contains(*condition)) {
            warn!(operation, condition = <&'static str>::from(condition), "trapped condition aborted the operation");
            return Err(condition.error(operation));
        }
        if !signals.is_empty() {
            debug!(operation, ?signals, "conditions recorded in the context flags");
        }
        self.flags |= signals;
        Ok(())
    }
}

fn checked_precision(precision: u32) -> Result<u32, NumericError> {
    let (min, max) = (rug::float::prec_min(), rug::float::prec_max());
    if !(min..=max).contains(&precision) {
        return Err(NumericError::Value(format!("precision must be in the interval [{min}, {max}]")));
    }
    Ok(precision)
}

fn checked_component_rounding(rounding: Option<RoundingMode>) -> Result<Option<RoundingMode>, NumericError> {
    if rounding == Some(RoundingMode::AwayFromZero) {
        return Err(NumericError::Value("AwayFromZero rounding is not allowed for complex components".to_string()));
    }
    Ok(rounding)
}

/// A lock-guarded handle to a context that several callers can share.
///
/// Cloning the handle shares the same context; use [`SharedContext::copy`] for an independent one.
#[derive(Clone, Debug, Default)]
pub struct SharedContext(Arc<Mutex<NumericContext>>);

impl SharedContext {
    /// Wraps `context` into a new handle.
    pub fn new(context: NumericContext) -> Self {
        Self(Arc::new(Mutex::new(context)))
    }

    /// Locks the context. A poisoned lock is recovered, contexts have no invariant a panic could break.
    pub fn lock(&self) -> MutexGuard<'_, NumericContext> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns a handle to an independent snapshot of this context.
    pub fn copy(&self) -> Self {
        Self::new(self.lock().copy())
    }

    /// Tells whether both handles point to the same context.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl From<NumericContext> for SharedContext {
    fn from(context: NumericContext) -> Self {
        Self::new(context)
    }
}

static ACTIVE: Lazy<Mutex<SharedContext>> = Lazy::new(Default::default);

/// Returns a handle to the active context.
pub fn get_active() -> SharedContext {
    ACTIVE.lock().unwrap_or_else(PoisonError::into_inner).clone()
}

/// Makes `context` the active context and returns the previously active one.
pub fn set_active(context: SharedContext) -> SharedContext {
    let mut active = ACTIVE.lock().unwrap_or_else(PoisonError::into_inner);
    std::mem::replace(&mut *active, context)
}

/// Keeps a context active until dropped, then restores the one that was active before.
#[must_use = "the previous context is restored as soon as the guard is dropped"]
pub struct LocalContext {
    previous: Option<SharedContext>,
}

/// Activates `context` for the lifetime of the returned guard.
pub fn local_context(context: SharedContext) -> LocalContext {
    LocalContext { previous: Some(set_active(context)) }
}

impl Drop for LocalContext {
    fn drop(&mut self) {
        if let Some(previous) = self.previous.take() {
            set_active(previous);
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use rstest::rstest;
    use tracing_test::traced_test;

    #[test]
    fn defaults() {
        let context = NumericContext::default();
        assert_eq!(context.precision(), 53);
        assert_eq!(context.real_precision(), None);
        assert_eq!(context.rounding(), RoundingMode::ToNearestTiesEven);
        assert_eq!(context.exponent_max(), rug::float::exp_max());
        assert_eq!(context.exponent_min(), rug::float::exp_min());
        assert!(!context.subnormalize());
        assert!(context.traps().is_empty());
        assert!(context.flags().is_empty());
        assert!(!context.trap_expbound());
        assert!(!context.allow_complex());
    }

    #[test]
    fn component_settings_fall_back() {
        let mut context = NumericContext::default();
        context.set_precision(100).unwrap();
        assert_eq!((context.real_prec(), context.imag_prec()), (100, 100));
        context.set_real_precision(Some(60)).unwrap();
        assert_eq!((context.real_prec(), context.imag_prec()), (60, 60));
        context.set_imag_precision(Some(20)).unwrap();
        assert_eq!((context.real_prec(), context.imag_prec()), (60, 20));

        context.set_rounding(RoundingMode::Up);
        assert_eq!((context.real_round(), context.imag_round()), (RoundingMode::Up, RoundingMode::Up));
        context.set_real_rounding(Some(RoundingMode::Down)).unwrap();
        assert_eq!((context.real_round(), context.imag_round()), (RoundingMode::Down, RoundingMode::Down));
    }

    #[rstest]
    #[case(0)]
    #[case(u32::MAX)]
    fn invalid_precision(#[case] precision: u32) {
        let mut context = NumericContext::default();
        assert!(matches!(context.set_precision(precision), Err(NumericError::Value(_))));
        assert!(matches!(context.set_real_precision(Some(precision)), Err(NumericError::Value(_))));
        assert_eq!(context.precision(), 53);
    }

    #[test]
    fn away_from_zero_rejected_for_components() {
        let mut context = NumericContext::default();
        assert!(context.set_real_rounding(Some(RoundingMode::AwayFromZero)).is_err());
        assert!(context.set_imag_rounding(Some(RoundingMode::AwayFromZero)).is_err());
        context.set_rounding(RoundingMode::AwayFromZero);
        assert_eq!(context.rounding(), RoundingMode::AwayFromZero);
    }

    #[test]
    fn exponent_bounds() {
        let mut context = NumericContext::default();
        context.set_exponent_max(1024).unwrap();
        context.set_exponent_min(-1073).unwrap();
        assert!(context.set_exponent_min(2000).is_err());
        assert!(context.set_exponent_max(-2000).is_err());
        assert!(context.set_exponent_max(i32::MAX).is_err());
        assert_eq!((context.exponent_min(), context.exponent_max()), (-1073, 1024));
    }

    #[test]
    fn commit_sets_flags_when_untrapped() {
        let mut context = NumericContext::default();
        context.commit(Signals::from(Condition::Inexact) | Condition::Overflow, "mul").unwrap();
        assert!(context.flag_inexact());
        assert!(context.flag_overflow());
        assert!(!context.flag_underflow());

        context.clear_flags();
        assert!(context.flags().is_empty());
    }

    #[test]
    fn commit_raises_first_trapped_condition() {
        let mut context = NumericContext::default();
        context.set_trap_inexact(true);
        context.set_trap_underflow(true);
        let signals = Signals::from(Condition::Inexact) | Condition::Underflow;
        assert_eq!(context.commit(signals, "div"), Err(NumericError::Underflow("div")));
        assert!(context.flags().is_empty());
        assert!(context.trap_inexact());
        assert!(!context.trap_overflow());
    }

    #[test]
    #[traced_test]
    fn trapped_conditions_are_logged() {
        let mut context = NumericContext::default();
        context.set_trap_overflow(true);
        assert!(context.commit(Signals::from(Condition::Inexact), "mul").is_ok());
        assert!(logs_contain("conditions recorded in the context flags"));
        assert!(context.commit(Signals::from(Condition::Overflow), "mul").is_err());
        assert!(logs_contain("trapped condition aborted the operation"));
    }

    #[test]
    fn expbound_only_fails_when_trapped() {
        let mut context = NumericContext::default();
        context.set_exponent_max(10).unwrap();
        assert!(context.check_exponent(Some(20), "add").is_ok());
        context.set_trap_expbound(true);
        assert_eq!(context.check_exponent(Some(20), "add"), Err(NumericError::ExponentOutOfBounds("add")));
        assert!(context.check_exponent(Some(5), "add").is_ok());
        assert!(context.check_exponent(None, "add").is_ok());
    }

    #[test]
    fn copies_are_independent() {
        let shared = SharedContext::new(NumericContext::default());
        let alias = shared.clone();
        let snapshot = shared.copy();
        alias.lock().set_precision(200).unwrap();
        assert_eq!(shared.lock().precision(), 200);
        assert_eq!(snapshot.lock().precision(), 53);
        assert!(shared.ptr_eq(&alias));
        assert!(!shared.ptr_eq(&snapshot));
    }

    #[test]
    fn signals_debug_lists_conditions() {
        let signals = Signals::from(Condition::DivZero) | Condition::Underflow;
        assert_eq!(format!("{signals:?}"), r#"{"underflow", "divzero"}"#);
    }
}
