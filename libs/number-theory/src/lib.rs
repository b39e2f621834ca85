//! Number theoretic functions over arbitrary precision integers.
//!
//! Every function here is pure: it reads its `BigInt` arguments and returns a fresh value or an
//! [`IntegerError`](errors::IntegerError) describing the violated precondition.
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

pub mod bits;
pub mod digits;
pub mod divisibility;
pub mod errors;
pub mod gcd;
pub mod primes;
pub mod roots;
pub mod sequences;
pub mod symbols;

pub use bits::{
    bit_clear, bit_count, bit_flip, bit_get, bit_length, bit_scan0, bit_scan1, bit_set, bit_slice, bit_test, hamdist,
    BitSlice,
};
pub use digits::{ceil, floor, num_digits, round_digits, trunc};
pub use divisibility::{is_congruent, is_divisible, is_even, is_odd, remove};
pub use gcd::{divexact, divm, gcd, gcdext, invert, lcm};
pub use primes::{is_prime, next_prime, DEFAULT_REPS};
pub use roots::{iroot, iroot_rem, is_power, is_square, isqrt, isqrt_rem};
pub use sequences::{bincoef, comb, fac, fib, fib2, lucas, lucas2};
pub use symbols::{jacobi, kronecker, legendre};
