/*
    Correctly-rounded floats
*/

use std::cmp::Ordering;
use std::fmt;

use num_bigint::BigUint;
use num_traits::{One, Zero};

use crate::dyadic::Dyadic;
use crate::round::{self, Rounded, Unrounded};
use crate::{Context, Error, Integer, Number, Rational, Result, Round, RoundResult, RoundingMode};

mod arith;
mod ball;
mod convert;
mod exceptions;
mod kernels;
mod transcendental;

pub use exceptions::Exceptions;

/// Bound on the binary exponent of a finite `RFloat`: every finite
/// value satisfies `2^(EXP_MIN - 1) <= |x| < 2^EXP_MAX`.
pub const EXP_MAX: i64 = 1 << 62;

/// Lower bound on the binary exponent of a finite `RFloat`.
pub const EXP_MIN: i64 = -EXP_MAX;

/// Precision and rounding mode of a correctly-rounded operation.
///
/// ```
/// use mpnum::{RoundingContext, RoundingMode};
///
/// let ctx = RoundingContext::new(53).rounding_mode(RoundingMode::ToZero);
/// assert_eq!(ctx.prec(), 53);
/// assert_eq!(ctx.rm(), RoundingMode::ToZero);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RoundingContext {
    prec: u32,
    rm: RoundingMode,
}

impl RoundingContext {
    /// A context rounding to nearest, ties to even, at `prec` bits.
    pub fn new(prec: u32) -> Self {
        crate::assert_valid_prec!(prec);
        Self {
            prec,
            rm: RoundingMode::NearestEven,
        }
    }

    /// Sets the rounding mode.
    pub fn rounding_mode(mut self, rm: RoundingMode) -> Self {
        self.rm = rm;
        self
    }

    /// Sets the precision.
    pub fn with_prec(mut self, prec: u32) -> Self {
        crate::assert_valid_prec!(prec);
        self.prec = prec;
        self
    }

    pub fn prec(&self) -> u32 {
        self.prec
    }

    pub fn rm(&self) -> RoundingMode {
        self.rm
    }
}

impl Context for RoundingContext {}

/// Value of an `RFloat`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum FrNum {
    /// A signed zero
    Zero(bool),
    /// A non-zero finite value with at most `prec` significant bits
    Finite(Dyadic),
    /// A signed infinity
    Infinity(bool),
    /// Not a number
    Nan,
}

/// A binary floating-point number whose every operation is correctly
/// rounded.
///
/// Each result is the exact mathematical result rounded once to the
/// precision and rounding mode of a [`RoundingContext`]. Besides finite
/// values an `RFloat` can be a signed zero, a signed infinity or NaN, and
/// it carries the [`Exceptions`] raised by the operation that produced it.
/// Comparisons follow IEEE-754: NaN is unordered and `+0 == -0`; neither
/// the precision nor the flags take part in them.
#[derive(Clone, Debug)]
pub struct RFloat {
    prec: u32,
    num: FrNum,
    flags: Exceptions,
}

// Fails unless the correctly-rounded engine is part of this build.
pub(crate) fn require_engine(op: &'static str) -> Result<()> {
    if crate::engine_available() {
        Ok(())
    } else {
        Err(Error::Unimplemented(op))
    }
}

// A value beyond the exponent range: above it when `large`, otherwise
// below a quarter of the smallest magnitude. Rounding it overflows
// or underflows exactly like any other value out there.
pub(crate) fn out_of_range(neg: bool, large: bool) -> Dyadic {
    let exp = if large { EXP_MAX } else { EXP_MIN - 3 };
    Dyadic::new(neg, BigUint::one(), exp)
}

impl RFloat {
    pub(crate) fn from_parts(prec: u32, num: FrNum, flags: Exceptions) -> Self {
        crate::assert_valid_prec!(prec);
        Self { prec, num, flags }
    }

    pub(crate) fn num(&self) -> &FrNum {
        &self.num
    }

    /// Positive zero at precision `prec`.
    pub fn new(prec: u32) -> Self {
        Self::zero(false, prec)
    }

    /// A zero with sign `sign` (`true` for negative).
    pub fn zero(sign: bool, prec: u32) -> Self {
        Self::from_parts(prec, FrNum::Zero(sign), Exceptions::default())
    }

    /// An infinity with sign `sign` (`true` for negative).
    pub fn infinity(sign: bool, prec: u32) -> Self {
        Self::from_parts(prec, FrNum::Infinity(sign), Exceptions::default())
    }

    /// Not a number.
    pub fn nan(prec: u32) -> Self {
        Self::from_parts(prec, FrNum::Nan, Exceptions::default())
    }

    // NaN raised by an invalid operation.
    pub(crate) fn invalid(prec: u32) -> Self {
        Self::from_parts(prec, FrNum::Nan, Exceptions::default().with_invalid(true))
    }

    // Infinity raised by an exact division by zero or a pole.
    pub(crate) fn pole(sign: bool, prec: u32) -> Self {
        Self::from_parts(
            prec,
            FrNum::Infinity(sign),
            Exceptions::default().with_div_by_zero(true),
        )
    }

    // Exact one.
    pub(crate) fn one(prec: u32) -> Self {
        Self::from_parts(prec, FrNum::Finite(Dyadic::one()), Exceptions::default())
    }

    // Exact `n`, wide enough for any `u64`.
    pub(crate) fn exact_ui(n: u64) -> Self {
        let num = match n {
            0 => FrNum::Zero(false),
            n => FrNum::Finite(Dyadic::new(false, BigUint::from(n), 0)),
        };
        Self::from_parts(64, num, Exceptions::default())
    }

    /// Rounds an unrounded non-zero magnitude onto the format of `ctx`,
    /// overflowing and underflowing at the exponent bounds.
    pub(crate) fn round_unrounded(u: &Unrounded, ctx: &RoundingContext) -> Self {
        debug_assert!(!u.is_zero());
        let r = u.round_prec(ctx.prec, ctx.rm);
        let top = r.exp + r.mant.bits() as i64 - 1;
        if top + 1 < EXP_MIN {
            // only zero and the smallest magnitude lie down there
            let t = u.round_at(EXP_MIN - 1, ctx.rm);
            let num = if t.mant.is_one() {
                FrNum::Finite(Dyadic::new(u.neg, t.mant, t.exp))
            } else {
                FrNum::Zero(u.neg)
            };
            let flags = Exceptions::default().with_underflow(true).with_inexact(true);
            return Self::from_parts(ctx.prec, num, flags);
        }
        Self::finish(u.neg, r, ctx)
    }

    /// Rounds an exact value; a zero gets the sign `zero_sign`.
    pub(crate) fn round_dyadic(d: &Dyadic, zero_sign: bool, ctx: &RoundingContext) -> Self {
        if d.is_zero() {
            Self::zero(zero_sign, ctx.prec)
        } else {
            Self::round_unrounded(&d.unrounded(), ctx)
        }
    }

    // Wraps a rounded magnitude, overflowing past the largest exponent.
    pub(crate) fn finish(neg: bool, r: Rounded, ctx: &RoundingContext) -> Self {
        let inexact = !r.is_exact();
        if r.mant.is_zero() {
            let flags = Exceptions::default().with_inexact(inexact);
            return Self::from_parts(ctx.prec, FrNum::Zero(neg), flags);
        }

        let top = r.exp + r.mant.bits() as i64 - 1;
        if top >= EXP_MAX {
            let num = if round::overflow_to_infinity(neg, ctx.rm) {
                FrNum::Infinity(neg)
            } else {
                // the largest finite magnitude
                let mant = (BigUint::one() << ctx.prec) - 1u32;
                FrNum::Finite(Dyadic::new(neg, mant, EXP_MAX - ctx.prec as i64))
            };
            let flags = Exceptions::default().with_overflow(true).with_inexact(true);
            return Self::from_parts(ctx.prec, num, flags);
        }

        let num = FrNum::Finite(Dyadic::new(neg, r.mant, r.exp));
        Self::from_parts(ctx.prec, num, Exceptions::default().with_inexact(inexact))
    }

    // The rounding of a value above the exponent range when `large`,
    // otherwise below it.
    pub(crate) fn beyond_range(neg: bool, large: bool, ctx: &RoundingContext) -> Self {
        Self::round_unrounded(&out_of_range(neg, large).unrounded(), ctx)
    }

    // Rounds a value whose most significant bit lies at `top` or `top + 1`.
    // The value is only computed when it may fall within the exponent range.
    pub(crate) fn round_ranged<F>(neg: bool, top: i128, ctx: &RoundingContext, exact: F) -> Self
    where
        F: FnOnce() -> Unrounded,
    {
        if top >= EXP_MAX as i128 {
            Self::beyond_range(neg, true, ctx)
        } else if top + 4 <= EXP_MIN as i128 {
            Self::beyond_range(neg, false, ctx)
        } else {
            Self::round_unrounded(&exact(), ctx)
        }
    }

    /// The precision of this float in bits.
    pub fn prec(&self) -> u32 {
        self.prec
    }

    /// The exceptions raised by the operation that produced this value.
    pub fn flags(&self) -> Exceptions {
        self.flags
    }

    /// Returns this value with every exception cleared.
    pub fn without_flags(mut self) -> Self {
        self.flags.clear();
        self
    }

    /// The sign bit. NaN reports `false`.
    pub fn sign(&self) -> bool {
        match &self.num {
            FrNum::Zero(s) | FrNum::Infinity(s) => *s,
            FrNum::Finite(d) => d.is_neg(),
            FrNum::Nan => false,
        }
    }

    pub fn is_nan(&self) -> bool {
        matches!(self.num, FrNum::Nan)
    }

    pub fn is_infinite(&self) -> bool {
        matches!(self.num, FrNum::Infinity(_))
    }

    pub fn is_zero(&self) -> bool {
        matches!(self.num, FrNum::Zero(_))
    }

    pub fn is_finite(&self) -> bool {
        matches!(self.num, FrNum::Zero(_) | FrNum::Finite(_))
    }

    /// Returns true if the value is a finite integer.
    pub fn is_integer(&self) -> bool {
        match &self.num {
            FrNum::Zero(_) => true,
            FrNum::Finite(d) => d.is_integer(),
            _ => false,
        }
    }

    /// Returns -1, 0 or 1 according to the sign; zeros and NaN report 0.
    pub fn signum(&self) -> i32 {
        match &self.num {
            FrNum::Zero(_) | FrNum::Nan => 0,
            FrNum::Finite(d) => d.signum(),
            FrNum::Infinity(true) => -1,
            FrNum::Infinity(false) => 1,
        }
    }

    /// Compares with a machine integer; `None` for NaN.
    pub fn cmp_si(&self, n: i64) -> Option<Ordering> {
        match &self.num {
            FrNum::Nan => None,
            FrNum::Infinity(true) => Some(Ordering::Less),
            FrNum::Infinity(false) => Some(Ordering::Greater),
            FrNum::Zero(_) => Some(0.cmp(&n)),
            FrNum::Finite(d) => Some(d.cmp(&Dyadic::from_i64(n))),
        }
    }

    /// Returns true if both floats have the same precision and encode the
    /// same datum, telling apart signed zeros and matching NaN with NaN.
    pub fn is_identical(&self, other: &RFloat) -> bool {
        self.prec == other.prec && self.num == other.num
    }

    /// Returns true if both values have the same sign and binary exponent
    /// and their mantissas agree in the first `nbits` bits. Zeros match
    /// zeros, infinities match infinities of the same sign and NaN
    /// matches nothing.
    pub fn eq_bits(&self, other: &RFloat, nbits: u32) -> bool {
        match (&self.num, &other.num) {
            (FrNum::Zero(_), FrNum::Zero(_)) => true,
            (FrNum::Infinity(a), FrNum::Infinity(b)) => a == b,
            (FrNum::Finite(a), FrNum::Finite(b)) => {
                a.signum() == b.signum()
                    && a.top() == b.top()
                    && a.round_at(a.top() + 1 - nbits as i64, RoundingMode::ToZero).0
                        == b.round_at(b.top() + 1 - nbits as i64, RoundingMode::ToZero).0
            }
            _ => false,
        }
    }

    /// Relative difference `|self - other| / |self|`, rounded twice under
    /// `ctx`. It is zero when both are zero and one when only `self` is.
    pub fn reldiff(&self, other: &RFloat, ctx: &RoundingContext) -> Result<RFloat> {
        require_engine("reldiff")?;
        if self.is_zero() && other.is_finite() {
            return Ok(if other.is_zero() {
                Self::new(ctx.prec)
            } else {
                Self::one(ctx.prec)
            });
        }
        let diff = self.sub(other, ctx)?.abs(ctx)?;
        let q = diff.div(&self.abs(ctx)?, ctx)?;
        let flags = q.flags.merge(diff.flags);
        Ok(Self { flags, ..q })
    }
}

// Orders two finite values, zeros of either sign being equal.
fn cmp_finite(a: &FrNum, b: &FrNum) -> Ordering {
    match (a, b) {
        (FrNum::Finite(x), FrNum::Finite(y)) => x.cmp(y),
        (FrNum::Finite(x), _) => x.signum().cmp(&0),
        (_, FrNum::Finite(y)) => 0.cmp(&y.signum()),
        _ => Ordering::Equal,
    }
}

impl PartialEq for RFloat {
    fn eq(&self, other: &Self) -> bool {
        self.partial_cmp(other) == Some(Ordering::Equal)
    }
}

impl PartialOrd for RFloat {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (&self.num, &other.num) {
            (FrNum::Nan, _) | (_, FrNum::Nan) => None,
            (FrNum::Infinity(a), FrNum::Infinity(b)) => Some(b.cmp(a)),
            (FrNum::Infinity(a), _) => Some(if *a { Ordering::Less } else { Ordering::Greater }),
            (_, FrNum::Infinity(b)) => Some(if *b { Ordering::Greater } else { Ordering::Less }),
            (a, b) => Some(cmp_finite(a, b)),
        }
    }
}

impl fmt::Display for RFloat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.num {
            FrNum::Nan => write!(f, "@NaN@"),
            FrNum::Infinity(true) => write!(f, "-@Inf@"),
            FrNum::Infinity(false) => write!(f, "@Inf@"),
            FrNum::Zero(true) => write!(f, "-0"),
            FrNum::Zero(false) => write!(f, "0"),
            FrNum::Finite(d) => {
                let (digits, exp) =
                    crate::radix::format_dyadic(d, 10, 0, self.prec, RoundingMode::NearestEven);
                match digits.strip_prefix('-') {
                    Some(digits) => write!(f, "-0.{}e{}", digits, exp),
                    None => write!(f, "0.{}e{}", digits, exp),
                }
            }
        }
    }
}

impl Default for RFloat {
    fn default() -> Self {
        Self::new(crate::PREC_MIN)
    }
}

impl Number for RFloat {
    type Ctx = RoundingContext;

    fn is_zero(&self) -> bool {
        RFloat::is_zero(self)
    }

    fn is_infinity(&self) -> bool {
        self.is_infinite()
    }

    fn is_nan(&self) -> bool {
        RFloat::is_nan(self)
    }

    fn signum(&self) -> i32 {
        RFloat::signum(self)
    }

    fn neg(&self, ctx: &RoundingContext) -> Result<Self> {
        RFloat::neg(self, ctx)
    }

    fn abs(&self, ctx: &RoundingContext) -> Result<Self> {
        RFloat::abs(self, ctx)
    }

    fn add(&self, other: &Self, ctx: &RoundingContext) -> Result<Self> {
        RFloat::add(self, other, ctx)
    }

    fn sub(&self, other: &Self, ctx: &RoundingContext) -> Result<Self> {
        RFloat::sub(self, other, ctx)
    }

    fn mul(&self, other: &Self, ctx: &RoundingContext) -> Result<Self> {
        RFloat::mul(self, other, ctx)
    }
}

// Conversions into `RFloat` are exact unless the inexact flag is raised.
fn classify(r: RFloat) -> RoundResult<RFloat> {
    if r.flags.inexact() {
        RoundResult::Inexact(r)
    } else {
        RoundResult::Exact(r)
    }
}

impl Round<RFloat> for RFloat {
    fn round_exact(&self, ctx: &RoundingContext) -> Result<RoundResult<RFloat>> {
        require_engine("round")?;
        let r = match &self.num {
            FrNum::Finite(d) => RFloat::round_unrounded(&d.unrounded(), ctx),
            num => RFloat::from_parts(ctx.prec, num.clone(), Exceptions::default()),
        };
        Ok(classify(r))
    }
}

impl Round<RFloat> for Integer {
    fn round_exact(&self, ctx: &RoundingContext) -> Result<RoundResult<RFloat>> {
        RFloat::from_integer(self, ctx).map(classify)
    }
}

impl Round<RFloat> for Rational {
    fn round_exact(&self, ctx: &RoundingContext) -> Result<RoundResult<RFloat>> {
        RFloat::from_rational(self, ctx).map(classify)
    }
}

impl Round<RFloat> for crate::Float {
    fn round_exact(&self, ctx: &RoundingContext) -> Result<RoundResult<RFloat>> {
        require_engine("round")?;
        Ok(classify(RFloat::round_dyadic(self.dyadic(), false, ctx)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(prec: u32, rm: RoundingMode) -> RoundingContext {
        RoundingContext::new(prec).rounding_mode(rm)
    }

    #[test]
    fn overflow_per_direction() {
        let u = out_of_range(false, true).unrounded();
        let r = RFloat::round_unrounded(&u, &ctx(8, RoundingMode::NearestEven));
        assert!(r.is_infinite());
        assert!(r.flags().overflow() && r.flags().inexact());

        let r = RFloat::round_unrounded(&u, &ctx(8, RoundingMode::ToZero));
        match r.num() {
            FrNum::Finite(d) => {
                assert_eq!(d.bits(), 8);
                assert_eq!(d.top(), EXP_MAX - 1);
            }
            num => panic!("expected the largest finite value, got {:?}", num),
        }
    }

    #[test]
    fn underflow_per_direction() {
        let u = out_of_range(true, false).unrounded();
        let r = RFloat::round_unrounded(&u, &ctx(8, RoundingMode::NearestEven));
        assert!(r.is_zero() && r.sign());
        assert!(r.flags().underflow());

        let r = RFloat::round_unrounded(&u, &ctx(8, RoundingMode::ToNegative));
        match r.num() {
            FrNum::Finite(d) => assert_eq!(d.top(), EXP_MIN - 1),
            num => panic!("expected the smallest value, got {:?}", num),
        }
    }

    #[test]
    fn ordering() {
        let p = 16;
        let nan = RFloat::nan(p);
        assert_eq!(nan.partial_cmp(&nan), None);
        assert_ne!(nan, nan);
        assert_eq!(RFloat::zero(true, p), RFloat::zero(false, p));
        assert!(!RFloat::zero(true, p).is_identical(&RFloat::zero(false, p)));
        assert!(RFloat::infinity(true, p) < RFloat::zero(false, p));
        assert!(RFloat::one(p) < RFloat::infinity(false, p));
        assert_eq!(RFloat::one(p).cmp_si(1), Some(Ordering::Equal));
        assert_eq!(nan.cmp_si(0), None);
    }
}
