//! Bit-level view over integers.
//!
//! Bits are addressed on the two's complement representation, so a negative value behaves as if it had an
//! infinite run of ones above its most significant bit. Indexing and slicing use the binary digit count
//! of the value (`num_digits(x, 2)`) as the length of the view.

use crate::errors::IntegerError;
use num_bigint::BigInt;
use num_traits::{Signed, Zero};

/// Bounds of a bit slice, `x[start:stop:step]`. Missing bounds take their usual defaults.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BitSlice {
    /// First bit index.
    pub start: Option<i64>,

    /// Bit index the slice stops before.
    pub stop: Option<i64>,

    /// Distance between two selected bits, never 0.
    pub step: Option<i64>,
}

impl BitSlice {
    /// Builds a slice with every bound given.
    pub fn new(start: i64, stop: i64, step: i64) -> Self {
        Self { start: Some(start), stop: Some(stop), step: Some(step) }
    }

    // Resolves the bounds against a view of `length` bits into (start, step, slice length).
    fn indices(&self, length: i64) -> Result<(i64, i64, u64), IntegerError> {
        let step = self.step.unwrap_or(1);
        if step == 0 {
            return Err(IntegerError::Value("slice step cannot be zero"));
        }
        // Keeps `-step` representable.
        let step = step.max(-i64::MAX);
        let (lower, upper) = if step < 0 { (-1, length - 1) } else { (0, length) };
        let clamp = |bound: i64| {
            let bound = if bound < 0 { bound.saturating_add(length) } else { bound };
            bound.clamp(lower, upper)
        };
        let start = self.start.map(clamp).unwrap_or(if step < 0 { upper } else { lower });
        let stop = self.stop.map(clamp).unwrap_or(if step < 0 { lower } else { upper });

        let count = if step < 0 && stop < start {
            (start - stop - 1) / -step + 1
        } else if step > 0 && start < stop {
            (stop - start - 1) / step + 1
        } else {
            0
        };
        Ok((start, step, count.unsigned_abs()))
    }
}

fn view_length(x: &BigInt) -> i64 {
    i64::try_from(x.bits().max(1)).unwrap_or(i64::MAX)
}

/// Reads bit `index` of `x`. A negative index counts back from the binary digit count of `x`.
pub fn bit_get(x: &BigInt, index: i64) -> Result<u8, IntegerError> {
    let index = if index < 0 { index + view_length(x) } else { index };
    let index = u64::try_from(index).map_err(|_| IntegerError::Value("bit index out of range"))?;
    Ok(u8::from(x.bit(index)))
}

/// Returns the integer whose bit `k` is bit `start + k * step` of `x`, for every `k` in the slice.
///
/// Empty and reversed ranges produce 0.
pub fn bit_slice(x: &BigInt, slice: &BitSlice) -> Result<BigInt, IntegerError> {
    let (start, step, count) = slice.indices(view_length(x))?;
    let mut result = BigInt::zero();
    let mut source = start;
    for target in 0..count {
        // Indices stay inside [0, length) by construction.
        if let Ok(index) = u64::try_from(source) {
            if x.bit(index) {
                result.set_bit(target, true);
            }
        }
        // The advance past the last selected bit may leave the i64 range; it is never read.
        source = source.saturating_add(step);
    }
    Ok(result)
}

/// Returns the number of bits needed to represent `|x|`, 0 for 0.
pub fn bit_length(x: &BigInt) -> u64 {
    x.bits()
}

/// Returns the number of one bits in `|x|`.
pub fn bit_count(x: &BigInt) -> u64 {
    x.magnitude().count_ones()
}

/// Tells whether bit `index` of `x` is set.
pub fn bit_test(x: &BigInt, index: u64) -> bool {
    x.bit(index)
}

/// Returns a copy of `x` with bit `index` set.
pub fn bit_set(x: &BigInt, index: u64) -> BigInt {
    let mut result = x.clone();
    result.set_bit(index, true);
    result
}

/// Returns a copy of `x` with bit `index` cleared.
pub fn bit_clear(x: &BigInt, index: u64) -> BigInt {
    let mut result = x.clone();
    result.set_bit(index, false);
    result
}

/// Returns a copy of `x` with bit `index` inverted.
pub fn bit_flip(x: &BigInt, index: u64) -> BigInt {
    let mut result = x.clone();
    result.set_bit(index, !x.bit(index));
    result
}

fn scan(x: &BigInt, start: u64, value: bool) -> Option<u64> {
    let length = x.bits();
    if let Some(index) = (start..length).find(|&index| x.bit(index) == value) {
        return Some(index);
    }
    // Above the magnitude every bit equals the sign bit.
    (x.is_negative() == value).then_some(start.max(length))
}

/// Returns the index of the first 0 bit at or after `start`, if any.
pub fn bit_scan0(x: &BigInt, start: u64) -> Option<u64> {
    scan(x, start, false)
}

/// Returns the index of the first 1 bit at or after `start`, if any.
pub fn bit_scan1(x: &BigInt, start: u64) -> Option<u64> {
    scan(x, start, true)
}

/// Returns the number of bit positions where `x` and `y` differ.
///
/// Values of opposite signs differ in infinitely many positions, which is reported as `None`.
pub fn hamdist(x: &BigInt, y: &BigInt) -> Option<u64> {
    if x.is_negative() != y.is_negative() {
        return None;
    }
    Some((x ^ y).magnitude().count_ones())
}
