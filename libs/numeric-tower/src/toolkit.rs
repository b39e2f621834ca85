//! Integer functions over host operands.
//!
//! Every argument is coerced to an integer first; anything else is a type error naming the function. The
//! computations themselves live in [`number_theory`].

use crate::{
    errors::NumericError,
    number::{Number, Operand},
};
use num_bigint::BigInt;
use num_traits::ToPrimitive;
pub use number_theory::BitSlice;

fn integer(x: &dyn Operand, name: &'static str) -> Result<BigInt, NumericError> {
    match x.to_number() {
        Some(Number::Integer(value)) => Ok(value),
        _ => Err(NumericError::Type(format!("{name}() requires integer arguments"))),
    }
}

fn small(x: &dyn Operand, name: &'static str) -> Result<i64, NumericError> {
    integer(x, name)?.to_i64().ok_or_else(|| NumericError::Value(format!("{name}() argument is too large")))
}

fn index(x: &dyn Operand, name: &'static str) -> Result<u64, NumericError> {
    let value = integer(x, name)?;
    if value.sign() == num_bigint::Sign::Minus {
        return Err(NumericError::Value(format!("{name}() index must be >= 0")));
    }
    value.to_u64().ok_or_else(|| NumericError::Value(format!("{name}() index is too large")))
}

/// Greatest common divisor, never negative.
pub fn gcd(a: &dyn Operand, b: &dyn Operand) -> Result<BigInt, NumericError> {
    Ok(number_theory::gcd(&integer(a, "gcd")?, &integer(b, "gcd")?))
}

/// Lowest common multiple, never negative. 0 when either argument is 0.
pub fn lcm(a: &dyn Operand, b: &dyn Operand) -> Result<BigInt, NumericError> {
    Ok(number_theory::lcm(&integer(a, "lcm")?, &integer(b, "lcm")?))
}

/// Returns `(g, s, t)` with `g = gcd(a, b) = a*s + b*t`.
pub fn gcdext(a: &dyn Operand, b: &dyn Operand) -> Result<(BigInt, BigInt, BigInt), NumericError> {
    Ok(number_theory::gcdext(&integer(a, "gcdext")?, &integer(b, "gcdext")?))
}

/// Solves `b*x ≡ a (mod m)`.
pub fn divm(a: &dyn Operand, b: &dyn Operand, m: &dyn Operand) -> Result<BigInt, NumericError> {
    let name = "divm";
    Ok(number_theory::divm(&integer(a, name)?, &integer(b, name)?, &integer(m, name)?)?)
}

/// Inverse of `x` modulo `m`.
pub fn invert(x: &dyn Operand, m: &dyn Operand) -> Result<BigInt, NumericError> {
    Ok(number_theory::invert(&integer(x, "invert")?, &integer(m, "invert")?)?)
}

/// Exact quotient `x / y`.
pub fn divexact(x: &dyn Operand, y: &dyn Operand) -> Result<BigInt, NumericError> {
    Ok(number_theory::divexact(&integer(x, "divexact")?, &integer(y, "divexact")?)?)
}

/// Integer square root.
pub fn isqrt(x: &dyn Operand) -> Result<BigInt, NumericError> {
    Ok(number_theory::isqrt(&integer(x, "isqrt")?)?)
}

/// Integer square root and remainder.
pub fn isqrt_rem(x: &dyn Operand) -> Result<(BigInt, BigInt), NumericError> {
    Ok(number_theory::isqrt_rem(&integer(x, "isqrt_rem")?)?)
}

/// Integer `n`-th root and whether it is exact.
pub fn iroot(x: &dyn Operand, n: &dyn Operand) -> Result<(BigInt, bool), NumericError> {
    Ok(number_theory::iroot(&integer(x, "iroot")?, small(n, "iroot")?)?)
}

/// Integer `n`-th root and remainder.
pub fn iroot_rem(x: &dyn Operand, n: &dyn Operand) -> Result<(BigInt, BigInt), NumericError> {
    Ok(number_theory::iroot_rem(&integer(x, "iroot_rem")?, small(n, "iroot_rem")?)?)
}

/// Removes every factor `f` from `x`, returning what is left and how many were removed.
pub fn remove(x: &dyn Operand, f: &dyn Operand) -> Result<(BigInt, u64), NumericError> {
    Ok(number_theory::remove(&integer(x, "remove")?, &integer(f, "remove")?)?)
}

/// Binomial coefficient.
pub fn bincoef(x: &dyn Operand, k: &dyn Operand) -> Result<BigInt, NumericError> {
    Ok(number_theory::bincoef(&integer(x, "bincoef")?, small(k, "bincoef")?)?)
}

/// Binomial coefficient, the combinations of `k` elements among `x`.
pub fn comb(x: &dyn Operand, k: &dyn Operand) -> Result<BigInt, NumericError> {
    Ok(number_theory::comb(&integer(x, "comb")?, small(k, "comb")?)?)
}

/// Factorial.
pub fn fac(n: &dyn Operand) -> Result<BigInt, NumericError> {
    Ok(number_theory::fac(small(n, "fac")?)?)
}

/// Fibonacci number.
pub fn fib(n: &dyn Operand) -> Result<BigInt, NumericError> {
    Ok(number_theory::fib(small(n, "fib")?)?)
}

/// `(F(n-1), F(n))`.
pub fn fib2(n: &dyn Operand) -> Result<(BigInt, BigInt), NumericError> {
    Ok(number_theory::fib2(small(n, "fib2")?)?)
}

/// Lucas number.
pub fn lucas(n: &dyn Operand) -> Result<BigInt, NumericError> {
    Ok(number_theory::lucas(small(n, "lucas")?)?)
}

/// `(L(n-1), L(n))`.
pub fn lucas2(n: &dyn Operand) -> Result<(BigInt, BigInt), NumericError> {
    Ok(number_theory::lucas2(small(n, "lucas2")?)?)
}

/// Perfect square test.
pub fn is_square(x: &dyn Operand) -> Result<bool, NumericError> {
    Ok(number_theory::is_square(&integer(x, "is_square")?))
}

/// Perfect power test.
pub fn is_power(x: &dyn Operand) -> Result<bool, NumericError> {
    Ok(number_theory::is_power(&integer(x, "is_power")?))
}

/// Probable prime test with `reps` Miller-Rabin rounds, 25 when not given.
pub fn is_prime(x: &dyn Operand, reps: Option<&dyn Operand>) -> Result<bool, NumericError> {
    let reps = reps.map(|reps| small(reps, "is_prime")).transpose()?.unwrap_or(number_theory::DEFAULT_REPS);
    Ok(number_theory::is_prime(&integer(x, "is_prime")?, reps)?)
}

/// Smallest probable prime greater than `x`.
pub fn next_prime(x: &dyn Operand) -> Result<BigInt, NumericError> {
    Ok(number_theory::next_prime(&integer(x, "next_prime")?))
}

/// Jacobi symbol.
pub fn jacobi(x: &dyn Operand, y: &dyn Operand) -> Result<i32, NumericError> {
    Ok(number_theory::jacobi(&integer(x, "jacobi")?, &integer(y, "jacobi")?)?)
}

/// Legendre symbol.
pub fn legendre(x: &dyn Operand, y: &dyn Operand) -> Result<i32, NumericError> {
    Ok(number_theory::legendre(&integer(x, "legendre")?, &integer(y, "legendre")?)?)
}

/// Kronecker symbol.
pub fn kronecker(x: &dyn Operand, y: &dyn Operand) -> Result<i32, NumericError> {
    Ok(number_theory::kronecker(&integer(x, "kronecker")?, &integer(y, "kronecker")?))
}

/// Parity.
pub fn is_even(x: &dyn Operand) -> Result<bool, NumericError> {
    Ok(number_theory::is_even(&integer(x, "is_even")?))
}

/// Parity.
pub fn is_odd(x: &dyn Operand) -> Result<bool, NumericError> {
    Ok(number_theory::is_odd(&integer(x, "is_odd")?))
}

/// Tells whether `d` divides `x`.
pub fn is_divisible(x: &dyn Operand, d: &dyn Operand) -> Result<bool, NumericError> {
    Ok(number_theory::is_divisible(&integer(x, "is_divisible")?, &integer(d, "is_divisible")?))
}

/// Tells whether `x ≡ y (mod m)`.
pub fn is_congruent(x: &dyn Operand, y: &dyn Operand, m: &dyn Operand) -> Result<bool, NumericError> {
    let name = "is_congruent";
    Ok(number_theory::is_congruent(&integer(x, name)?, &integer(y, name)?, &integer(m, name)?))
}

/// Digit count of `|x|` in `base`, 10 when not given.
pub fn num_digits(x: &dyn Operand, base: Option<&dyn Operand>) -> Result<u64, NumericError> {
    let base = base.map(|base| small(base, "num_digits")).transpose()?.unwrap_or(10);
    Ok(number_theory::num_digits(&integer(x, "num_digits")?, base)?)
}

/// Rounds to a multiple of `10^-digits`, ties to even.
pub fn round_digits(x: &dyn Operand, digits: &dyn Operand) -> Result<BigInt, NumericError> {
    Ok(number_theory::round_digits(&integer(x, "round_digits")?, small(digits, "round_digits")?))
}

/// Floor of an integer.
pub fn floor(x: &dyn Operand) -> Result<BigInt, NumericError> {
    Ok(number_theory::floor(&integer(x, "floor")?))
}

/// Ceiling of an integer.
pub fn ceil(x: &dyn Operand) -> Result<BigInt, NumericError> {
    Ok(number_theory::ceil(&integer(x, "ceil")?))
}

/// Truncation of an integer.
pub fn trunc(x: &dyn Operand) -> Result<BigInt, NumericError> {
    Ok(number_theory::trunc(&integer(x, "trunc")?))
}

/// `x[index]`.
pub fn bit_get(x: &dyn Operand, index: &dyn Operand) -> Result<u8, NumericError> {
    Ok(number_theory::bit_get(&integer(x, "bit_get")?, small(index, "bit_get")?)?)
}

/// `x[start:stop:step]`.
pub fn bit_slice(x: &dyn Operand, slice: &BitSlice) -> Result<BigInt, NumericError> {
    Ok(number_theory::bit_slice(&integer(x, "bit_slice")?, slice)?)
}

/// Number of significant bits of `|x|`.
pub fn bit_length(x: &dyn Operand) -> Result<u64, NumericError> {
    Ok(number_theory::bit_length(&integer(x, "bit_length")?))
}

/// Number of one bits of `|x|`.
pub fn bit_count(x: &dyn Operand) -> Result<u64, NumericError> {
    Ok(number_theory::bit_count(&integer(x, "bit_count")?))
}

/// Tests one bit.
pub fn bit_test(x: &dyn Operand, n: &dyn Operand) -> Result<bool, NumericError> {
    Ok(number_theory::bit_test(&integer(x, "bit_test")?, index(n, "bit_test")?))
}

/// Sets one bit.
pub fn bit_set(x: &dyn Operand, n: &dyn Operand) -> Result<BigInt, NumericError> {
    Ok(number_theory::bit_set(&integer(x, "bit_set")?, index(n, "bit_set")?))
}

/// Clears one bit.
pub fn bit_clear(x: &dyn Operand, n: &dyn Operand) -> Result<BigInt, NumericError> {
    Ok(number_theory::bit_clear(&integer(x, "bit_clear")?, index(n, "bit_clear")?))
}

/// Flips one bit.
pub fn bit_flip(x: &dyn Operand, n: &dyn Operand) -> Result<BigInt, NumericError> {
    Ok(number_theory::bit_flip(&integer(x, "bit_flip")?, index(n, "bit_flip")?))
}

/// Index of the first 0 bit at or after `start` (0 when not given).
pub fn bit_scan0(x: &dyn Operand, start: Option<&dyn Operand>) -> Result<Option<u64>, NumericError> {
    let start = start.map(|start| index(start, "bit_scan0")).transpose()?.unwrap_or(0);
    Ok(number_theory::bit_scan0(&integer(x, "bit_scan0")?, start))
}

/// Index of the first 1 bit at or after `start` (0 when not given).
pub fn bit_scan1(x: &dyn Operand, start: Option<&dyn Operand>) -> Result<Option<u64>, NumericError> {
    let start = start.map(|start| index(start, "bit_scan1")).transpose()?.unwrap_or(0);
    Ok(number_theory::bit_scan1(&integer(x, "bit_scan1")?, start))
}

/// Hamming distance, `None` when the signs differ.
pub fn hamdist(x: &dyn Operand, y: &dyn Operand) -> Result<Option<u64>, NumericError> {
    Ok(number_theory::hamdist(&integer(x, "hamdist")?, &integer(y, "hamdist")?))
}
