/*
    Primality testing
*/

use num_bigint::{BigInt, BigUint};
use num_integer::Integer as _;
use num_traits::{One, ToPrimitive, Zero};
use tracing::trace;

use super::Integer;
use crate::RandState;

/// Outcome of a primality test.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Primality {
    /// Definitely not prime.
    Composite,
    /// Passed every Miller-Rabin round; composite with negligible probability.
    ProbablyPrime,
    /// Definitely prime.
    Prime,
}

/// Values below this bound are decided by trial division.
const TRIAL_LIMIT: u64 = 1_000_000;

/// The first primes: witnesses of the deterministic Miller-Rabin test.
const WITNESSES: [u32; 13] = [2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41];

/// Values below this bound are decided by testing every base of
/// [`WITNESSES`] (3317044064679887385961981).
const DETERMINISTIC_LIMIT: u128 = 3_317_044_064_679_887_385_961_981;

// Primes below 1000 for trial division of large candidates.
fn small_primes() -> impl Iterator<Item = u32> {
    (2u32..1000).filter(|&p| (2..p).take_while(|d| d * d <= p).all(|d| p % d != 0))
}

fn trial_division(n: u64) -> bool {
    if n < 2 {
        return false;
    }
    (2..).take_while(|d| d * d <= n).all(|d| n % d != 0)
}

// One Miller-Rabin round with witness `a` for odd `n > 2`,
// where `n - 1 = d * 2^s` with `d` odd.
fn miller_rabin(n: &BigUint, d: &BigUint, s: u64, a: &BigUint) -> bool {
    let n_minus_1 = n - 1u32;
    let mut x = a.modpow(d, n);
    if x.is_one() || x == n_minus_1 {
        return true;
    }

    for _ in 1..s {
        x = &x * &x % n;
        if x == n_minus_1 {
            return true;
        } else if x.is_one() {
            return false;
        }
    }
    false
}

impl Integer {
    /// Tests whether the absolute value of this integer is prime.
    ///
    /// Small values are decided exactly, as are values below
    /// `3.3 * 10^24` for which a fixed witness set is known to be
    /// conclusive. Larger values run `reps` additional Miller-Rabin rounds
    /// with random witnesses and are at best
    /// [`ProbablyPrime`](Primality::ProbablyPrime).
    pub fn probab_prime(&self, reps: u32) -> Primality {
        let n = self.0.magnitude();
        trace!(bits = n.bits(), reps, "primality test");

        if let Some(small) = n.to_u64().filter(|&v| v < TRIAL_LIMIT) {
            return if trial_division(small) {
                Primality::Prime
            } else {
                Primality::Composite
            };
        }

        if small_primes().any(|p| (n % p).is_zero()) {
            return Primality::Composite;
        }

        let n_minus_1 = n - 1u32;
        let s = n_minus_1.trailing_zeros().unwrap_or_default();
        let d = &n_minus_1 >> s;

        let deterministic = n.to_u128().map_or(false, |v| v < DETERMINISTIC_LIMIT);
        for a in WITNESSES {
            if !miller_rabin(n, &d, s, &BigUint::from(a)) {
                return Primality::Composite;
            }
        }
        if deterministic {
            return Primality::Prime;
        }

        // witnesses in [2, n - 2], derived from the candidate so the
        // answer does not depend on any external state
        let seed = n.iter_u64_digits().fold(0u64, |acc, w| acc.rotate_left(7) ^ w);
        let mut state = RandState::with_seed(seed);
        let range = n - 3u32;
        for _ in 0..reps {
            let a = state.below_big(&range) + 2u32;
            if !miller_rabin(n, &d, s, &a) {
                return Primality::Composite;
            }
        }
        Primality::ProbablyPrime
    }

    /// Collapses [`Integer::probab_prime`] to a boolean.
    pub fn is_probably_prime(&self, reps: u32) -> bool {
        self.probab_prime(reps) != Primality::Composite
    }

    /// The smallest probable prime strictly greater than this integer.
    pub fn next_prime(&self) -> Integer {
        let two = BigInt::from(2);
        if self.0 < two {
            return Integer(two);
        }

        let mut n = &self.0 + 1u32;
        if n.is_even() && n != two {
            n += 1u32;
        }

        let mut candidate = Integer(n);
        let mut tested = 0u64;
        while !candidate.is_probably_prime(25) {
            candidate.0 += 2u32;
            tested += 1;
        }
        trace!(tested, "next prime found");
        candidate
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_primes_are_primes() {
        let primes: Vec<u32> = small_primes().take(10).collect();
        assert_eq!(primes, vec![2, 3, 5, 7, 11, 13, 17, 19, 23, 29]);
        assert_eq!(small_primes().count(), 168);
    }

    #[test]
    fn strong_pseudoprimes() {
        // strong pseudoprime to bases 2, 3, 5, 7
        let n = Integer::from(3_215_031_751u64);
        assert_eq!(n.probab_prime(0), Primality::Composite);
        // strong pseudoprime to the first 12 prime bases
        let n = Integer::from_str_radix("318665857834031151167461", 10).unwrap();
        assert_eq!(n.probab_prime(0), Primality::Composite);
    }
}
