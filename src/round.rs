/*
    Rounding
*/

use std::cmp::Ordering;

use bitvec::field::BitField;
use bitvec::prelude::{BitVec, Lsb0};
use num_bigint::BigUint;
use num_integer::Integer as _;
use num_traits::{ToPrimitive, Zero};

/// Rounding modes.
///
/// The first four are the IEEE-754 directed and nearest modes every
/// correctly-rounded operation accepts; the last three complete the set
/// (`ToOdd` is mostly useful to avoid double rounding).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RoundingMode {
    /// Round to nearest, ties to even.
    NearestEven,
    /// Round toward zero (truncation).
    ToZero,
    /// Round toward positive infinity.
    ToPositive,
    /// Round toward negative infinity.
    ToNegative,
    /// Round to nearest, ties away from zero.
    NearestAway,
    /// Round away from zero.
    AwayZero,
    /// Round to the value with an odd least significant bit.
    ToOdd,
}

/// Rounding direction of a magnitude, i.e., once the sign is known.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoundingDirection {
    ToZero,
    AwayZero,
    ToEven,
    ToOdd,
}

impl Default for RoundingMode {
    fn default() -> Self {
        RoundingMode::NearestEven
    }
}

impl RoundingMode {
    /// Translates a `RoundingMode` and sign bit to a `RoundingDirection`
    /// and a boolean indicating if the direction only specifies tie-breaking behavior.
    pub fn direction(&self, sign: bool) -> (bool, RoundingDirection) {
        match (self, sign) {
            (RoundingMode::NearestEven, _) => (true, RoundingDirection::ToEven),
            (RoundingMode::NearestAway, _) => (true, RoundingDirection::AwayZero),
            (RoundingMode::ToPositive, false) => (false, RoundingDirection::AwayZero),
            (RoundingMode::ToPositive, true) => (false, RoundingDirection::ToZero),
            (RoundingMode::ToNegative, false) => (false, RoundingDirection::ToZero),
            (RoundingMode::ToNegative, true) => (false, RoundingDirection::AwayZero),
            (RoundingMode::ToZero, _) => (false, RoundingDirection::ToZero),
            (RoundingMode::AwayZero, _) => (false, RoundingDirection::AwayZero),
            (RoundingMode::ToOdd, _) => (false, RoundingDirection::ToOdd),
        }
    }

    /// Returns the mode rounding in the mirrored direction,
    /// i.e., the mode `m'` with `round(-x, m') = -round(x, m)`.
    pub fn mirror(&self) -> Self {
        match self {
            RoundingMode::ToPositive => RoundingMode::ToNegative,
            RoundingMode::ToNegative => RoundingMode::ToPositive,
            rm => *rm,
        }
    }
}

// Returns true if the rounding information implies the magnitude,
// as viewed as integer, should be incremented by 1. The `sticky_bit`
// summarizes every discarded bit below the `half_bit`.
fn round_requires_increment(
    sign: bool,
    lsb: bool,
    half_bit: bool,
    sticky_bit: bool,
    rm: RoundingMode,
) -> bool {
    match rm.direction(sign) {
        (true, RoundingDirection::ToEven) => {
            // no half bit => truncate
            // half bit and sticky bit => increment
            // tie => increment if lsb since we want it to be 0
            half_bit && (sticky_bit || lsb)
        }
        (true, RoundingDirection::AwayZero) => {
            // no half bit => truncate
            // half bit => increment (tie requires increment)
            half_bit
        }
        (true, RoundingDirection::ToZero) => {
            // (unused)
            // tie => truncate
            half_bit && sticky_bit
        }
        (true, RoundingDirection::ToOdd) => {
            // (unused)
            // tie => increment if even
            half_bit && !lsb
        }
        (false, RoundingDirection::AwayZero) => {
            // increment if not exact
            half_bit || sticky_bit
        }
        (false, RoundingDirection::ToZero) => {
            // always truncate
            false
        }
        (false, RoundingDirection::ToOdd) => {
            // LSB of the mantissa needs to be 1
            !lsb
        }
        (false, RoundingDirection::ToEven) => {
            // (unused)
            // LSB of the mantissa needs to be 0
            lsb
        }
    }
}

/// Assuming overflow has occured, return true if
/// the result should be rounded to +/- infinity
/// (rather than the largest finite magnitude).
pub(crate) fn overflow_to_infinity(sign: bool, rm: RoundingMode) -> bool {
    match rm.direction(sign) {
        // nearest carries all overflows to infinity
        (true, _) => true,
        // away from zero carries all overflows to infinity
        (_, RoundingDirection::AwayZero) => true,
        // carry all overflows to the largest finite magnitude
        (_, RoundingDirection::ToZero) => false,
        // the largest finite magnitude has an odd lsb
        (_, RoundingDirection::ToEven) => true,
        // the largest finite magnitude has an odd lsb
        (_, RoundingDirection::ToOdd) => false,
    }
}

/// A rounded magnitude `mant * 2^exp`.
///
/// `ord` compares the signed rounded value against the signed exact value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Rounded {
    pub mant: BigUint,
    pub exp: i64,
    pub ord: Ordering,
}

impl Rounded {
    pub fn is_exact(&self) -> bool {
        self.ord == Ordering::Equal
    }
}

/// A magnitude before rounding: exactly `mant * 2^exp`, or, when
/// `sticky` is set, strictly between `mant * 2^exp` and `(mant + 1) * 2^exp`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Unrounded {
    pub neg: bool,
    pub mant: BigUint,
    pub exp: i64,
    pub sticky: bool,
}

impl Unrounded {
    pub fn exact(neg: bool, mant: BigUint, exp: i64) -> Self {
        Self {
            neg,
            mant,
            exp,
            sticky: false,
        }
    }

    /// The quotient `num / den * 2^exp` of two magnitudes, kept with at
    /// least `prec + 2` significant bits so it rounds correctly to `prec`.
    pub fn ratio(neg: bool, num: &BigUint, den: &BigUint, exp: i64, prec: u32) -> Self {
        debug_assert!(!den.is_zero());
        if num.is_zero() {
            return Self::exact(neg, BigUint::zero(), 0);
        }

        let shift = (prec as i64 + 2 + den.bits() as i64 - num.bits() as i64).max(0) as u64;
        let (q, r) = (num << shift).div_rem(den);
        Self {
            neg,
            mant: q,
            exp: exp - shift as i64,
            sticky: !r.is_zero(),
        }
    }

    pub fn is_zero(&self) -> bool {
        self.mant.is_zero() && !self.sticky
    }

    /// Exponent of the most significant bit. Undefined for zero.
    pub fn top(&self) -> i64 {
        self.exp + self.mant.bits() as i64 - 1
    }

    pub fn round_prec(&self, prec: u32, rm: RoundingMode) -> Rounded {
        round_prec(self.neg, &self.mant, self.exp, self.sticky, prec, rm)
    }

    pub fn round_at(&self, lsb: i64, rm: RoundingMode) -> Rounded {
        round_at(self.neg, &self.mant, self.exp, self.sticky, lsb, rm)
    }
}

/// Rounds the magnitude `mant * 2^exp` to a multiple of `2^lsb`.
///
/// When `sticky` is set, the exact magnitude is strictly larger than
/// `mant * 2^exp` by less than `2^exp`; then `lsb` must exceed `exp`
/// so the half bit is still known.
pub(crate) fn round_at(
    sign: bool,
    mant: &BigUint,
    exp: i64,
    sticky: bool,
    lsb: i64,
    rm: RoundingMode,
) -> Rounded {
    if lsb <= exp {
        debug_assert!(!sticky, "rounding position hides the half bit");
        return Rounded {
            mant: mant.clone(),
            exp,
            ord: Ordering::Equal,
        };
    }

    // Split the magnitude at the rounding position:
    //  `high` - the retained bits
    //  `half_bit` - MSB of the discarded part
    //  `sticky_bit` - OR of the rest of the discarded part
    let diff = (lsb - exp) as u64;
    let (high, half_bit, sticky_bit) = if diff > mant.bits() {
        (BigUint::zero(), false, sticky || !mant.is_zero())
    } else {
        let bits: BitVec<u32, Lsb0> = BitVec::from_vec(mant.to_u32_digits());
        let (low, _) = bits.split_at(diff as usize);
        let low_len = low.len();
        let half_bit = low[low_len - 1];
        let sticky_bit = sticky || low[..low_len - 1].any();
        (mant >> diff, half_bit, sticky_bit)
    };

    let inexact = half_bit || sticky_bit;
    let increment =
        inexact && round_requires_increment(sign, high.is_odd(), half_bit, sticky_bit, rm);
    let mant = if increment { high + 1u32 } else { high };

    // the magnitude grew iff we incremented
    let ord = match (inexact, increment, sign) {
        (false, _, _) => Ordering::Equal,
        (true, true, false) | (true, false, true) => Ordering::Greater,
        (true, false, false) | (true, true, true) => Ordering::Less,
    };

    Rounded { mant, exp: lsb, ord }
}

/// Rounds the magnitude `mant * 2^exp` to `prec` significant bits.
pub(crate) fn round_prec(
    sign: bool,
    mant: &BigUint,
    exp: i64,
    sticky: bool,
    prec: u32,
    rm: RoundingMode,
) -> Rounded {
    if mant.is_zero() {
        debug_assert!(!sticky);
        return Rounded {
            mant: BigUint::zero(),
            exp: 0,
            ord: Ordering::Equal,
        };
    }

    let lsb = exp + mant.bits() as i64 - prec as i64;
    round_at(sign, mant, exp, sticky, lsb, rm)
}

/// Rounds the quotient `num / den * 2^exp` of two magnitudes to a
/// multiple of `2^lsb`.
pub(crate) fn round_ratio_at(
    sign: bool,
    num: &BigUint,
    den: &BigUint,
    exp: i64,
    lsb: i64,
    rm: RoundingMode,
) -> Rounded {
    debug_assert!(!den.is_zero());
    // `num * 2^exp / den = (num * 2^(exp - lsb + 2) / den) * 2^(lsb - 2)`
    let scale = exp - (lsb - 2);
    let (num, den) = if scale >= 0 {
        (num << scale as u64, den.clone())
    } else {
        (num.clone(), den << (-scale) as u64)
    };
    let (q, r) = num.div_rem(&den);
    round_at(sign, &q, lsb - 2, !r.is_zero(), lsb, rm)
}

/// Width of the binary64 exponent field.
const F64_E: usize = 11;
/// Width of the binary64 trailing significand field.
const F64_M: usize = 52;
/// Exponent (of the MSB) of the largest binary64 value.
const F64_EMAX: i64 = 1023;
/// Exponent (of the MSB) of the smallest normal binary64 value.
const F64_EMIN: i64 = -1022;
/// Exponent (of the LSB) of every subnormal binary64 value.
const F64_EXPMIN: i64 = F64_EMIN - F64_M as i64;

// Splices a packed binary64 into the sign, biased exponent,
// and trailing significand field.
fn split_packed_f64(f: f64) -> (bool, u64, u64) {
    let mut bv: BitVec<u64, Lsb0> = BitVec::repeat(false, 64);
    bv.store(f.to_bits());
    let s = bv[F64_E + F64_M];
    let e: u64 = bv[F64_M..(F64_E + F64_M)].load();
    let m: u64 = bv[..F64_M].load();
    (s, e, m)
}

// Packs the sign, biased exponent, and trailing significand field
// into a binary64.
fn pack_components_f64(s: bool, e: u64, m: u64) -> f64 {
    let mut bv: BitVec<u64, Lsb0> = BitVec::repeat(false, 64);
    bv[..F64_M].store(m);
    bv[F64_M..(F64_E + F64_M)].store(e);
    bv.set(F64_E + F64_M, s);
    f64::from_bits(bv.load())
}

/// Decodes a finite binary64 into `(sign, mant, exp)` with
/// value `(-1)^sign * mant * 2^exp`; returns `None` for infinities and NaN.
pub(crate) fn decode_f64(f: f64) -> Option<(bool, u64, i64)> {
    let (s, e, m) = split_packed_f64(f);
    if e == (1 << F64_E) - 1 {
        None
    } else if e == 0 {
        // zero or subnormal
        Some((s, m, F64_EXPMIN))
    } else {
        // normal, restore the implicit bit
        Some((s, m | (1 << F64_M), e as i64 + F64_EXPMIN - 1))
    }
}

/// Rounds the magnitude `mant * 2^exp` (see [`round_at`] for `sticky`)
/// onto the binary64 grid, including subnormals and overflow.
pub(crate) fn round_f64(
    sign: bool,
    mant: &BigUint,
    exp: i64,
    sticky: bool,
    rm: RoundingMode,
) -> (f64, Ordering) {
    if mant.is_zero() {
        debug_assert!(!sticky);
        return (pack_components_f64(sign, 0, 0), Ordering::Equal);
    }

    let top = exp + mant.bits() as i64 - 1;
    let lsb = (top - F64_M as i64).max(F64_EXPMIN);
    let rounded = round_at(sign, mant, exp, sticky, lsb, rm);
    if rounded.mant.is_zero() {
        // underflow to zero
        return (pack_components_f64(sign, 0, 0), rounded.ord);
    }

    // an exact input comes back at its own exponent, at or above `lsb`
    let mant = rounded.mant << (rounded.exp - lsb) as u64;
    let top = lsb + mant.bits() as i64 - 1;
    if top > F64_EMAX {
        // overflow
        let ord = if sign { Ordering::Less } else { Ordering::Greater };
        return if overflow_to_infinity(sign, rm) {
            (pack_components_f64(sign, (1 << F64_E) - 1, 0), ord)
        } else {
            let max = pack_components_f64(sign, (1 << F64_E) - 2, (1 << F64_M) - 1);
            (max, ord.reverse())
        };
    }

    let m = mant.to_u64().unwrap_or(0);
    if top < F64_EMIN {
        // subnormal: `lsb` is pinned to the subnormal exponent
        (pack_components_f64(sign, 0, m), rounded.ord)
    } else {
        // a carry may have widened the significand by one bit
        let width = top - lsb;
        let m = if width > F64_M as i64 { m >> (width - F64_M as i64) } else { m << (F64_M as i64 - width) };
        let e = (top - F64_EMIN + 1) as u64;
        (pack_components_f64(sign, e, m & ((1 << F64_M) - 1)), rounded.ord)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn r(sign: bool, mant: u64, exp: i64, lsb: i64, rm: RoundingMode) -> (u64, Ordering) {
        let out = round_at(sign, &BigUint::from(mant), exp, false, lsb, rm);
        (out.mant.to_u64().unwrap(), out.ord)
    }

    #[test]
    fn nearest_even_ties() {
        // 0b1010 / 4 = 2.5 -> 2, 0b1110 / 4 = 3.5 -> 4
        assert_eq!(r(false, 0b1010, 0, 2, RoundingMode::NearestEven), (2, Ordering::Less));
        assert_eq!(r(false, 0b1110, 0, 2, RoundingMode::NearestEven), (4, Ordering::Greater));
        assert_eq!(r(false, 0b1011, 0, 2, RoundingMode::NearestEven), (3, Ordering::Greater));
        assert_eq!(r(false, 0b1001, 0, 2, RoundingMode::NearestEven), (2, Ordering::Less));
    }

    #[test]
    fn directed() {
        // 2.25
        assert_eq!(r(false, 9, 0, 2, RoundingMode::ToZero), (2, Ordering::Less));
        assert_eq!(r(false, 9, 0, 2, RoundingMode::ToPositive), (3, Ordering::Greater));
        assert_eq!(r(true, 9, 0, 2, RoundingMode::ToPositive), (2, Ordering::Greater));
        assert_eq!(r(true, 9, 0, 2, RoundingMode::ToNegative), (3, Ordering::Less));
        assert_eq!(r(false, 9, 0, 2, RoundingMode::AwayZero), (3, Ordering::Greater));
        assert_eq!(r(false, 9, 0, 2, RoundingMode::NearestAway), (2, Ordering::Less));
        assert_eq!(r(false, 10, 0, 2, RoundingMode::NearestAway), (3, Ordering::Greater));
    }

    #[test]
    fn to_odd_only_when_inexact() {
        assert_eq!(r(false, 8, 0, 2, RoundingMode::ToOdd), (2, Ordering::Equal));
        assert_eq!(r(false, 9, 0, 2, RoundingMode::ToOdd), (3, Ordering::Greater));
        assert_eq!(r(false, 13, 0, 2, RoundingMode::ToOdd), (3, Ordering::Less));
    }

    #[test]
    fn far_below_lsb() {
        assert_eq!(r(false, 1, 0, 10, RoundingMode::NearestEven), (0, Ordering::Less));
        assert_eq!(r(false, 1, 0, 10, RoundingMode::ToPositive), (1, Ordering::Greater));
        // exactly half of 2^1
        assert_eq!(r(false, 1, 0, 1, RoundingMode::NearestEven), (0, Ordering::Less));
    }

    #[test]
    fn sticky_breaks_ties() {
        let out = round_at(false, &BigUint::from(0b1010u32), 0, true, 2, RoundingMode::NearestEven);
        assert_eq!(out.mant, BigUint::from(3u32));
    }

    #[test]
    fn ratio() {
        // 1/3 to 4 bits: 0.0101|0101.. -> 0.01011 (nearest) = 11/32
        let one = BigUint::from(1u32);
        let out = Unrounded::ratio(false, &one, &BigUint::from(3u32), 0, 4).round_prec(4, RoundingMode::NearestEven);
        let v = out.mant.clone() * 1024u32 >> (-out.exp) as usize;
        assert_eq!(v, BigUint::from(352u32)); // 11/32 * 1024
        assert_eq!(out.ord, Ordering::Greater);
    }

    #[test]
    fn f64_grid() {
        for f in [1.0, -2.5, 0.1, f64::MAX, f64::MIN_POSITIVE, 5e-324, -1.5e-310] {
            let (s, m, e) = decode_f64(f).unwrap();
            let (g, ord) = round_f64(s, &BigUint::from(m), e, false, RoundingMode::NearestEven);
            assert_eq!(g.to_bits(), f.to_bits());
            assert_eq!(ord, Ordering::Equal);
        }
        assert_eq!(decode_f64(f64::INFINITY), None);
        assert_eq!(decode_f64(f64::NAN), None);
    }

    #[test]
    fn f64_exact_values() {
        let cases: [(u64, i64, f64); 5] = [
            (3, 0, 3.0),
            (3, -1, 1.5),
            (21, -1, 10.5),
            (1, 1023, 2f64.powi(1023)),
            (1, -1074, 5e-324),
        ];
        for (mant, exp, expect) in cases {
            let (f, ord) = round_f64(false, &BigUint::from(mant), exp, false, RoundingMode::NearestEven);
            assert_eq!(f, expect);
            assert_eq!(ord, Ordering::Equal);
        }
        let (f, _) = round_f64(true, &BigUint::from(5u32), 10, false, RoundingMode::ToZero);
        assert_eq!(f, -5120.0);
    }

    #[test]
    fn f64_overflow_and_underflow() {
        let big = BigUint::from(1u32);
        let (f, _) = round_f64(false, &big, 1024, false, RoundingMode::NearestEven);
        assert_eq!(f, f64::INFINITY);
        let (f, _) = round_f64(false, &big, 1024, false, RoundingMode::ToZero);
        assert_eq!(f, f64::MAX);
        let (f, _) = round_f64(true, &big, -1076, false, RoundingMode::NearestEven);
        assert_eq!(f.to_bits(), (-0.0f64).to_bits());
        let (f, _) = round_f64(false, &big, -1076, false, RoundingMode::ToPositive);
        assert_eq!(f, 5e-324);
        // 2^53 + 1 ties to even
        let (f, ord) = round_f64(false, &BigUint::from((1u64 << 53) + 1), 0, false, RoundingMode::NearestEven);
        assert_eq!(f, 9007199254740992.0);
        assert_eq!(ord, Ordering::Less);
    }
}
