//! Probabilistic primality testing.

use crate::errors::IntegerError;
use num_bigint::{BigInt, BigUint, RandBigInt};
use num_integer::Integer;
use num_traits::{One, Zero};
use rand::{rngs::StdRng, SeedableRng};

/// Number of Miller-Rabin rounds used when the caller does not pick one.
pub const DEFAULT_REPS: i64 = 25;

const SMALL_PRIMES: [u32; 54] = [
    2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53, 59, 61, 67, 71, 73, 79, 83, 89, 97, 101, 103, 107, 109,
    113, 127, 131, 137, 139, 149, 151, 157, 163, 167, 173, 179, 181, 191, 193, 197, 199, 211, 223, 227, 229, 233, 239,
    241, 251,
];

const LARGEST_SMALL_PRIME: u32 = 251;

// Witnesses tried before any random one. Together they are deterministic below 3.3 * 10^24.
const FIXED_WITNESSES: [u32; 12] = [2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37];

const WITNESS_SEED: u64 = 0x5eed_0f_9e_a5;

pub(crate) fn is_small_prime(n: u64) -> bool {
    if n < 2 {
        return false;
    }
    let mut divisor = 2;
    while divisor * divisor <= n {
        if n % divisor == 0 {
            return false;
        }
        divisor += 1;
    }
    true
}

enum TrialDivision {
    Prime,
    Composite,
    Inconclusive,
}

fn trial_division(n: &BigUint) -> TrialDivision {
    for prime in SMALL_PRIMES {
        if n == &BigUint::from(prime) {
            return TrialDivision::Prime;
        }
        if (n % prime).is_zero() {
            return TrialDivision::Composite;
        }
    }
    let largest = BigUint::from(LARGEST_SMALL_PRIME);
    if n < &(&largest * &largest) { TrialDivision::Prime } else { TrialDivision::Inconclusive }
}

fn is_witness(witness: &BigUint, n: &BigUint, n_minus_one: &BigUint, odd_part: &BigUint, twos: u64) -> bool {
    let mut x = witness.modpow(odd_part, n);
    if x.is_one() || &x == n_minus_one {
        return false;
    }
    for _ in 1..twos {
        x = &x * &x % n;
        if &x == n_minus_one {
            return false;
        }
    }
    true
}

fn miller_rabin(n: &BigUint, reps: u64) -> bool {
    let n_minus_one = n - 1u32;
    let twos = n_minus_one.trailing_zeros().unwrap_or(0);
    let odd_part = &n_minus_one >> twos;

    let fixed = FIXED_WITNESSES.iter().map(|&witness| BigUint::from(witness));
    for witness in fixed.take(usize::try_from(reps).unwrap_or(usize::MAX)) {
        if is_witness(&witness, n, &n_minus_one, &odd_part, twos) {
            return false;
        }
    }

    let fixed_count = FIXED_WITNESSES.len() as u64;
    if reps > fixed_count {
        let mut rng = StdRng::seed_from_u64(WITNESS_SEED);
        let low = BigUint::from(2u32);
        for _ in fixed_count..reps {
            let witness = rng.gen_biguint_range(&low, &n_minus_one);
            if is_witness(&witness, n, &n_minus_one, &odd_part, twos) {
                return false;
            }
        }
    }
    true
}

fn probable_prime(n: &BigUint, reps: u64) -> bool {
    match trial_division(n) {
        TrialDivision::Prime => true,
        TrialDivision::Composite => false,
        TrialDivision::Inconclusive => miller_rabin(n, reps),
    }
}

/// Tells whether `|x|` is a probable prime.
///
/// Trial division by the primes below 256 is followed by `reps` Miller-Rabin rounds. A `false` result is
/// certain, a `true` result only means "probably prime".
pub fn is_prime(x: &BigInt, reps: i64) -> Result<bool, IntegerError> {
    if reps <= 0 {
        return Err(IntegerError::Value("repetition count for is_prime() must be positive"));
    }
    let n = x.magnitude();
    if n < &BigUint::from(2u32) {
        return Ok(false);
    }
    Ok(probable_prime(n, reps.unsigned_abs()))
}

/// Returns the smallest probable prime strictly greater than `x`.
pub fn next_prime(x: &BigInt) -> BigInt {
    let two = BigInt::from(2);
    if x < &two {
        return two;
    }
    let mut candidate: BigInt = x + 1;
    if candidate.is_even() {
        candidate += 1;
    }
    while !probable_prime(candidate.magnitude(), DEFAULT_REPS.unsigned_abs()) {
        candidate += 2;
    }
    candidate
}
