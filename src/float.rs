/*
    Arbitrary-precision floats (truncating)
*/

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use num_bigint::BigInt;

use crate::dyadic::Dyadic;
use crate::fr::FrNum;
use crate::{Error, Integer, Number, Precision, Rational, Result, Round, RoundResult, RoundingMode};

mod arith;
mod random;
mod string;

/// Every `Float` operation truncates toward zero.
const RM: RoundingMode = RoundingMode::ToZero;

/// A binary floating-point number `m * 2^e` with a fixed precision.
///
/// Every operation takes the precision of its result explicitly and
/// truncates the exact result to it: results are deterministic but not
/// correctly rounded beyond that contract. There are no infinities,
/// NaN or signed zeros. Equality, ordering and hashing are value based
/// and ignore the precision.
#[derive(Clone, Debug)]
pub struct Float {
    prec: u32,
    value: Dyadic,
}

impl Float {
    // Truncates an exact value to `prec` bits.
    pub(crate) fn truncate(value: &Dyadic, prec: u32) -> Self {
        crate::assert_valid_prec!(prec);
        Self {
            prec,
            value: value.round_prec(prec, RM).0,
        }
    }

    // Wraps a value known to fit in `prec` bits.
    fn exact(value: Dyadic, prec: u32) -> Self {
        crate::assert_valid_prec!(prec);
        debug_assert!(value.bits() <= prec as u64);
        Self { prec, value }
    }

    pub(crate) fn dyadic(&self) -> &Dyadic {
        &self.value
    }

    /// Zero at precision `prec`.
    pub fn new(prec: u32) -> Self {
        Self::exact(Dyadic::zero(), prec)
    }

    pub fn from_integer(n: &Integer, prec: u32) -> Self {
        Self::truncate(&Dyadic::from_bigint(n.as_bigint()), prec)
    }

    pub fn from_rational(q: &Rational, prec: u32) -> Self {
        crate::assert_valid_prec!(prec);
        let (value, _) = Dyadic::from_ratio(q.numer().as_bigint(), q.denom().as_bigint(), prec, RM);
        Self { prec, value }
    }

    pub fn from_si(n: i64, prec: u32) -> Self {
        Self::truncate(&Dyadic::from_i64(n), prec)
    }

    pub fn from_ui(n: u64, prec: u32) -> Self {
        Self::from_integer(&Integer::from(n), prec)
    }

    /// Converts a double. Infinities and NaN are domain errors.
    pub fn from_f64(f: f64, prec: u32) -> Result<Self> {
        let d = Dyadic::from_f64(f)
            .ok_or_else(|| Error::domain(format!("cannot convert {} to a float", f)))?;
        Ok(Self::truncate(&d, prec))
    }

    /// The precision of this float in bits.
    pub fn prec(&self) -> u32 {
        self.prec
    }

    pub fn is_zero(&self) -> bool {
        self.value.is_zero()
    }

    pub fn signum(&self) -> i32 {
        self.value.signum()
    }

    /// Returns true if the value is an integer.
    pub fn is_integer(&self) -> bool {
        self.value.is_integer()
    }

    /// Compares with a machine integer.
    pub fn cmp_si(&self, n: i64) -> Ordering {
        self.value.cmp(&Dyadic::from_i64(n))
    }

    /// Returns true if both values have the same sign and binary exponent
    /// and their mantissas agree in the first `nbits` bits.
    ///
    /// This is an approximate comparison: values equal to the last
    /// bit may still differ past `nbits`.
    pub fn eq_bits(&self, other: &Float, nbits: u32) -> bool {
        let (a, b) = (&self.value, &other.value);
        match (a.is_zero(), b.is_zero()) {
            (true, true) => true,
            (false, false) => {
                a.signum() == b.signum()
                    && a.top() == b.top()
                    && a.round_at(a.top() + 1 - nbits as i64, RM).0
                        == b.round_at(b.top() + 1 - nbits as i64, RM).0
            }
            _ => false,
        }
    }

    /// Relative difference `|self - other| / |self|` at precision `prec`.
    /// It is zero when both are zero and one when only `self` is.
    pub fn reldiff(&self, other: &Float, prec: u32) -> Float {
        crate::assert_valid_prec!(prec);
        if self.is_zero() {
            let one = if other.is_zero() { Dyadic::zero() } else { Dyadic::one() };
            return Self::exact(one, prec);
        }

        let diff = self.value.sub(&other.value).abs();
        let (value, _) = diff.div_round(&self.value.abs(), prec, RM);
        Self { prec, value }
    }

    /// Truncates to a double.
    pub fn to_f64(&self) -> f64 {
        self.value.to_f64(RM).0
    }

    /// Converts exactly to a rational.
    pub fn to_rational(&self) -> Rational {
        let (num, den) = self.value.to_ratio();
        Rational::canonical(num, BigInt::from(den))
    }

    /// Truncates toward zero to an integer.
    pub fn to_integer(&self) -> Integer {
        Integer::from(self.value.to_bigint(RM))
    }
}

impl PartialEq for Float {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl Eq for Float {}

impl PartialOrd for Float {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Float {
    fn cmp(&self, other: &Self) -> Ordering {
        self.value.cmp(&other.value)
    }
}

impl Hash for Float {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl fmt::Display for Float {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_string_radix(10, 0) {
            Ok((digits, _)) if digits.is_empty() => write!(f, "0"),
            Ok((digits, exp)) => match digits.strip_prefix('-') {
                Some(digits) => write!(f, "-0.{}e{}", digits, exp),
                None => write!(f, "0.{}e{}", digits, exp),
            },
            Err(_) => Err(fmt::Error),
        }
    }
}

impl Number for Float {
    type Ctx = Precision;

    fn is_zero(&self) -> bool {
        self.value.is_zero()
    }

    fn is_infinity(&self) -> bool {
        false
    }

    fn is_nan(&self) -> bool {
        false
    }

    fn signum(&self) -> i32 {
        self.value.signum()
    }

    fn neg(&self, ctx: &Precision) -> Result<Self> {
        Ok(Float::neg(self, ctx.0))
    }

    fn abs(&self, ctx: &Precision) -> Result<Self> {
        Ok(Float::abs(self, ctx.0))
    }

    fn add(&self, other: &Self, ctx: &Precision) -> Result<Self> {
        Ok(Float::add(self, other, ctx.0))
    }

    fn sub(&self, other: &Self, ctx: &Precision) -> Result<Self> {
        Ok(Float::sub(self, other, ctx.0))
    }

    fn mul(&self, other: &Self, ctx: &Precision) -> Result<Self> {
        Ok(Float::mul(self, other, ctx.0))
    }
}

impl Default for Float {
    fn default() -> Self {
        Self::new(crate::PREC_MIN)
    }
}

// Rounding into `Float` truncates at the context precision.
fn round_into(value: &Dyadic, prec: u32) -> RoundResult<Float> {
    crate::assert_valid_prec!(prec);
    let (value, ord) = value.round_prec(prec, RM);
    let f = Float { prec, value };
    match ord {
        Ordering::Equal => RoundResult::Exact(f),
        _ => RoundResult::Inexact(f),
    }
}

impl Round<Float> for Float {
    fn round_exact(&self, ctx: &Precision) -> Result<RoundResult<Float>> {
        Ok(round_into(&self.value, ctx.0))
    }
}

impl Round<Float> for Integer {
    fn round_exact(&self, ctx: &Precision) -> Result<RoundResult<Float>> {
        Ok(round_into(&Dyadic::from_bigint(self.as_bigint()), ctx.0))
    }
}

impl Round<Float> for Rational {
    fn round_exact(&self, ctx: &Precision) -> Result<RoundResult<Float>> {
        let prec = ctx.0;
        crate::assert_valid_prec!(prec);
        let (value, ord) = Dyadic::from_ratio(self.numer().as_bigint(), self.denom().as_bigint(), prec, RM);
        let f = Float { prec, value };
        Ok(match ord {
            Ordering::Equal => RoundResult::Exact(f),
            _ => RoundResult::Inexact(f),
        })
    }
}

impl Round<Float> for crate::RFloat {
    fn round_exact(&self, ctx: &Precision) -> Result<RoundResult<Float>> {
        match self.num() {
            FrNum::Zero(_) => Ok(RoundResult::Exact(Float::new(ctx.0))),
            FrNum::Finite(d) => Ok(round_into(d, ctx.0)),
            _ => Err(Error::domain(format!("cannot round {} to a float", self))),
        }
    }
}
