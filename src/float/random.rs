/*
    Random floats
*/

use super::Float;
use crate::dyadic::Dyadic;
use crate::RandState;

/// Bits per limb of the stress generator.
const LIMB_BITS: u64 = 32;

/// Largest exponent, in limbs, drawn by [`Float::random2`]; the same
/// range as a correctly-rounded float.
const EXP_LIMBS_MAX: u64 = (crate::fr::EXP_MAX as u64) / LIMB_BITS - 1;

impl Float {
    /// A uniformly random value in `[0, 1)` with `nbits` random bits,
    /// truncated to `prec` bits.
    pub fn urandomb(state: &mut RandState, nbits: u64, prec: u32) -> Float {
        let mant = state.bits(nbits);
        Float::truncate(&Dyadic::new(false, mant, -(nbits as i64)), prec)
    }

    /// A random value with `|nlimbs|` limbs of mantissa made of long runs
    /// of ones and zeros, negative when `nlimbs < 0`, with an exponent
    /// (in limbs) in `[-max_exp, max_exp]`. `max_exp` is capped at
    /// `2^62 / 32 - 1`.
    ///
    /// Meant to stress arithmetic with corner-case bit patterns; the
    /// distribution is not uniform.
    pub fn random2(state: &mut RandState, nlimbs: i64, max_exp: u64, prec: u32) -> Float {
        crate::assert_valid_prec!(prec);
        if nlimbs == 0 {
            return Float::new(prec);
        }

        let nbits = nlimbs.unsigned_abs().saturating_mul(LIMB_BITS);
        let mant = state.runs(nbits.min(prec as u64));
        let max_exp = max_exp.min(EXP_LIMBS_MAX);
        let exp = state.below(2 * max_exp + 1) as i64 - max_exp as i64;

        // value = 0.mant * 2^(LIMB_BITS * exp)
        let exp = exp * LIMB_BITS as i64 - mant.bits() as i64;
        Float::truncate(&Dyadic::new(nlimbs < 0, mant, exp), prec)
    }
}
