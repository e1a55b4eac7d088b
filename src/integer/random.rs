/*
    Random integers
*/

use num_bigint::BigInt;
use num_traits::Signed;

use super::Integer;
use crate::{Error, RandState, Result};

impl Integer {
    /// A uniformly random integer in `[0, 2^nbits)`.
    pub fn urandomb(state: &mut RandState, nbits: u64) -> Integer {
        Integer(BigInt::from(state.bits(nbits)))
    }

    /// A uniformly random integer in `[0, n)`. `n` must be positive.
    pub fn urandomm(state: &mut RandState, n: &Integer) -> Result<Integer> {
        if !n.0.is_positive() {
            return Err(Error::domain("urandomm: bound must be positive"));
        }
        Ok(Integer(BigInt::from(state.below_big(n.0.magnitude()))))
    }

    /// A random integer with exactly `nbits` significant bits, made of
    /// long runs of ones and zeros.
    ///
    /// Meant as test data exercising corner cases of carry propagation;
    /// the distribution is neither uniform nor cryptographically meaningful.
    pub fn rrandomb(state: &mut RandState, nbits: u64) -> Integer {
        Integer(BigInt::from(state.runs(nbits)))
    }
}
