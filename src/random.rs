/*
    Random state
*/

use bitvec::prelude::{BitVec, Lsb0};
use num_bigint::BigUint;
use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// A seedable pseudo-random generator.
///
/// Every sampling operation of [`Integer`](crate::Integer),
/// [`Float`](crate::Float) and [`RFloat`](crate::RFloat) takes
/// `&mut RandState`. The state is deliberately not `Clone`:
/// use [`RandState::duplicate`] to fork an identical stream.
#[derive(Debug)]
pub struct RandState {
    rng: ChaCha8Rng,
}

impl Default for RandState {
    fn default() -> Self {
        Self::new()
    }
}

impl RandState {
    /// Creates a generator with the default (zero) seed.
    pub fn new() -> Self {
        Self::with_seed(0)
    }

    /// Creates a generator from a seed.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Reseeds this generator.
    pub fn seed(&mut self, seed: u64) {
        self.rng = ChaCha8Rng::seed_from_u64(seed);
    }

    /// Returns an independent generator that will produce
    /// the same stream as this one.
    pub fn duplicate(&self) -> Self {
        Self {
            rng: self.rng.clone(),
        }
    }

    /// A uniformly random `u32`.
    pub fn next_u32(&mut self) -> u32 {
        self.rng.next_u32()
    }

    /// A uniformly random `u64` below `bound` (non-zero).
    pub(crate) fn below(&mut self, bound: u64) -> u64 {
        self.rng.gen_range(0..bound)
    }

    /// A uniformly random magnitude in `[0, 2^nbits)`.
    pub(crate) fn bits(&mut self, nbits: u64) -> BigUint {
        let limbs = ((nbits + 31) / 32) as usize;
        let mut digits: Vec<u32> = (0..limbs).map(|_| self.rng.next_u32()).collect();
        let rem = nbits % 32;
        if rem != 0 {
            if let Some(top) = digits.last_mut() {
                *top &= (1u32 << rem) - 1;
            }
        }
        BigUint::new(digits)
    }

    /// A uniformly random magnitude in `[0, n)` (`n` non-zero).
    pub(crate) fn below_big(&mut self, n: &BigUint) -> BigUint {
        let nbits = n.bits();
        loop {
            let r = self.bits(nbits);
            if &r < n {
                return r;
            }
        }
    }

    /// A magnitude with exactly `nbits` significant bits made of long
    /// runs of ones and zeros. Useful to stress carry propagation;
    /// the distribution is not uniform.
    pub(crate) fn runs(&mut self, nbits: u64) -> BigUint {
        if nbits == 0 {
            return BigUint::default();
        }

        let mut bv: BitVec<u32, Lsb0> = BitVec::repeat(false, nbits as usize);
        let mut pos = nbits as usize;
        let mut ones = true;
        let max_run = (nbits as usize / 4).max(1) as u64;
        while pos > 0 {
            let len = (1 + self.below(max_run) as usize).min(pos);
            bv[(pos - len)..pos].fill(ones);
            pos -= len;
            ones = !ones;
        }

        // the top run always starts with a one
        bv.set(nbits as usize - 1, true);
        BigUint::new(bv.into_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_replays() {
        let mut a = RandState::with_seed(42);
        a.next_u32();
        let mut b = a.duplicate();
        assert_eq!(a.next_u32(), b.next_u32());
        assert_eq!(a.bits(100), b.bits(100));
    }

    #[test]
    fn runs_have_exact_width() {
        let mut st = RandState::with_seed(7);
        for nbits in [1, 2, 31, 32, 33, 200] {
            assert_eq!(st.runs(nbits).bits(), nbits);
            assert!(st.bits(nbits).bits() <= nbits);
        }
    }
}
