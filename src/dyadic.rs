/*
    Exact binary fractions
*/

use std::cmp::Ordering;

use num_bigint::{BigInt, BigUint, Sign};
use num_integer::Integer as _;
use num_traits::{One, Zero};

use crate::round::{self, RoundingMode, Unrounded};

/// An exact binary fraction `(-1)^neg * mant * 2^exp`.
///
/// Always canonical: `mant` is odd, or zero with `neg == false` and
/// `exp == 0`. Structural equality and hashing are therefore value based.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub(crate) struct Dyadic {
    neg: bool,
    mant: BigUint,
    exp: i64,
}

impl Dyadic {
    /// Constructs the value `(-1)^neg * mant * 2^exp`.
    pub fn new(neg: bool, mant: BigUint, exp: i64) -> Self {
        match mant.trailing_zeros() {
            None => Self::zero(),
            Some(0) => Self { neg, mant, exp },
            Some(tz) => Self {
                neg,
                mant: mant >> tz,
                exp: exp + tz as i64,
            },
        }
    }

    pub fn zero() -> Self {
        Self::default()
    }

    pub fn one() -> Self {
        Self::new(false, BigUint::one(), 0)
    }

    pub fn from_bigint(i: &BigInt) -> Self {
        Self::new(i.sign() == Sign::Minus, i.magnitude().clone(), 0)
    }

    pub fn from_i64(i: i64) -> Self {
        Self::new(i < 0, BigUint::from(i.unsigned_abs()), 0)
    }

    /// Converts a finite `f64` exactly. The sign of a zero is lost.
    pub fn from_f64(f: f64) -> Option<Self> {
        let (s, m, e) = round::decode_f64(f)?;
        Some(Self::new(s, BigUint::from(m), e))
    }

    pub fn is_zero(&self) -> bool {
        self.mant.is_zero()
    }

    pub fn is_neg(&self) -> bool {
        self.neg
    }

    pub fn mant(&self) -> &BigUint {
        &self.mant
    }

    pub fn exp(&self) -> i64 {
        self.exp
    }

    pub fn signum(&self) -> i32 {
        match (self.is_zero(), self.neg) {
            (true, _) => 0,
            (false, true) => -1,
            (false, false) => 1,
        }
    }

    /// Number of significant bits of the mantissa.
    pub fn bits(&self) -> u64 {
        self.mant.bits()
    }

    /// Exponent of the most significant bit. Undefined for zero.
    pub fn top(&self) -> i64 {
        self.exp + self.mant.bits() as i64 - 1
    }

    /// Returns true if the value is an integer.
    pub fn is_integer(&self) -> bool {
        self.exp >= 0 || self.is_zero()
    }

    pub fn neg(&self) -> Self {
        if self.is_zero() {
            Self::zero()
        } else {
            Self {
                neg: !self.neg,
                mant: self.mant.clone(),
                exp: self.exp,
            }
        }
    }

    pub fn abs(&self) -> Self {
        Self {
            neg: false,
            mant: self.mant.clone(),
            exp: self.exp,
        }
    }

    pub fn with_sign(self, neg: bool) -> Self {
        if self.is_zero() {
            self
        } else {
            Self { neg, ..self }
        }
    }

    /// Multiplies by `2^k`.
    pub fn mul_2exp(&self, k: i64) -> Self {
        if self.is_zero() {
            Self::zero()
        } else {
            Self {
                neg: self.neg,
                mant: self.mant.clone(),
                exp: self.exp + k,
            }
        }
    }

    // Signed mantissa scaled to exponent `e <= self.exp`.
    fn scaled(&self, e: i64) -> BigInt {
        BigInt::from_biguint(
            if self.neg { Sign::Minus } else { Sign::Plus },
            &self.mant << (self.exp - e) as u64,
        )
    }

    /// Exact sum.
    pub fn add(&self, other: &Self) -> Self {
        if self.is_zero() {
            return other.clone();
        } else if other.is_zero() {
            return self.clone();
        }

        let e = self.exp.min(other.exp);
        let sum = self.scaled(e) + other.scaled(e);
        Self::new(sum.sign() == Sign::Minus, sum.magnitude().clone(), e)
    }

    /// Exact difference.
    pub fn sub(&self, other: &Self) -> Self {
        self.add(&other.neg())
    }

    /// Exact product.
    pub fn mul(&self, other: &Self) -> Self {
        Self::new(
            self.neg != other.neg,
            &self.mant * &other.mant,
            self.exp + other.exp,
        )
    }

    /// Compares magnitudes.
    pub fn cmp_abs(&self, other: &Self) -> Ordering {
        match (self.is_zero(), other.is_zero()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            (false, false) => self.top().cmp(&other.top()).then_with(|| {
                let e = self.exp.min(other.exp);
                let a = &self.mant << (self.exp - e) as u64;
                let b = &other.mant << (other.exp - e) as u64;
                a.cmp(&b)
            }),
        }
    }

    /// Splits into an exact fraction `num / den` with `den` a power of two.
    pub fn to_ratio(&self) -> (BigInt, BigUint) {
        let sign = if self.neg { Sign::Minus } else { Sign::Plus };
        if self.exp >= 0 {
            let num = BigInt::from_biguint(sign, &self.mant << self.exp as u64);
            (num, BigUint::one())
        } else {
            let num = BigInt::from_biguint(sign, self.mant.clone());
            (num, BigUint::one() << (-self.exp) as u64)
        }
    }

    /// Rounds to the integer `floor`, `ceil`, or truncation per `rm`.
    pub fn to_bigint(&self, rm: RoundingMode) -> BigInt {
        let r = round::round_at(self.neg, &self.mant, self.exp, false, 0, rm);
        let mag = r.mant << (r.exp.max(0) as u64);
        BigInt::from_biguint(if self.neg { Sign::Minus } else { Sign::Plus }, mag)
    }

    /// This value as an exact unrounded magnitude.
    pub fn unrounded(&self) -> Unrounded {
        Unrounded::exact(self.neg, self.mant.clone(), self.exp)
    }

    /// Rounds an unrounded magnitude to `prec` significant bits.
    pub fn rounded(u: &Unrounded, prec: u32, rm: RoundingMode) -> (Self, Ordering) {
        let r = u.round_prec(prec, rm);
        (Self::new(u.neg, r.mant, r.exp), r.ord)
    }

    /// Rounds to `prec` significant bits.
    pub fn round_prec(&self, prec: u32, rm: RoundingMode) -> (Self, Ordering) {
        let r = round::round_prec(self.neg, &self.mant, self.exp, false, prec, rm);
        (Self::new(self.neg, r.mant, r.exp), r.ord)
    }

    /// Rounds to a multiple of `2^lsb`.
    pub fn round_at(&self, lsb: i64, rm: RoundingMode) -> (Self, Ordering) {
        let r = round::round_at(self.neg, &self.mant, self.exp, false, lsb, rm);
        (Self::new(self.neg, r.mant, r.exp), r.ord)
    }

    /// Rounds to a binary64.
    pub fn to_f64(&self, rm: RoundingMode) -> (f64, Ordering) {
        round::round_f64(self.neg, &self.mant, self.exp, false, rm)
    }

    /// Rounds `num / den` to `prec` significant bits.
    pub fn from_ratio(num: &BigInt, den: &BigInt, prec: u32, rm: RoundingMode) -> (Self, Ordering) {
        Self::rounded(&Self::ratio_unrounded(num, den, prec), prec, rm)
    }

    /// `num / den` kept with enough bits to round to `prec`.
    pub fn ratio_unrounded(num: &BigInt, den: &BigInt, prec: u32) -> Unrounded {
        let neg = (num.sign() == Sign::Minus) != (den.sign() == Sign::Minus);
        Unrounded::ratio(neg, num.magnitude(), den.magnitude(), 0, prec)
    }

    /// Quotient kept with enough bits to round to `prec`.
    /// The divisor must be non-zero.
    pub fn div_unrounded(&self, other: &Self, prec: u32) -> Unrounded {
        let neg = self.neg != other.neg;
        Unrounded::ratio(neg, &self.mant, &other.mant, self.exp - other.exp, prec)
    }

    /// Rounded quotient at `prec` bits. The divisor must be non-zero.
    pub fn div_round(&self, other: &Self, prec: u32, rm: RoundingMode) -> (Self, Ordering) {
        Self::rounded(&self.div_unrounded(other, prec), prec, rm)
    }

    /// Sum kept with enough bits to round to `prec`.
    ///
    /// An addend far below the rounding position of the other only
    /// contributes a sticky bit, so the exact sum is never materialized.
    pub fn add_unrounded(&self, other: &Self, prec: u32) -> Unrounded {
        if self.is_zero() {
            return other.unrounded();
        } else if other.is_zero() {
            return self.unrounded();
        }

        let (big, small) = match self.cmp_abs(other) {
            Ordering::Less => (other, self),
            _ => (self, other),
        };

        let lsb = big.exp.min(big.top() - prec as i64 - 3);
        if small.top() >= lsb - 1 {
            return self.add(other).unrounded();
        }

        // `small` lies strictly below `2^(lsb - 1)`
        let mant = &big.mant << (big.exp - lsb) as u64;
        let mant = if big.neg == small.neg {
            mant
        } else {
            mant - 1u32
        };
        Unrounded {
            neg: big.neg,
            mant,
            exp: lsb,
            sticky: true,
        }
    }

    /// Rounded sum at `prec` bits.
    pub fn add_round(&self, other: &Self, prec: u32, rm: RoundingMode) -> (Self, Ordering) {
        Self::rounded(&self.add_unrounded(other, prec), prec, rm)
    }

    /// Rounded square root at `prec` bits. The value must be non-negative.
    pub fn sqrt_round(&self, prec: u32, rm: RoundingMode) -> (Self, Ordering) {
        debug_assert!(!self.neg || self.is_zero());
        if self.is_zero() {
            return (Self::zero(), Ordering::Equal);
        }

        // make the exponent even and give the root at least `prec + 2` bits
        let want = 2 * (prec as i64 + 2);
        let mut shift = (want - self.bits() as i64).max(0);
        if (self.exp - shift) % 2 != 0 {
            shift += 1;
        }

        let m = &self.mant << shift as u64;
        let s = m.sqrt();
        let sticky = &s * &s != m;
        let exp = (self.exp - shift).div_euclid(2);
        let r = round::round_prec(false, &s, exp, sticky, prec, rm);
        (Self::new(false, r.mant, r.exp), r.ord)
    }

    /// Exact square root, if there is one.
    pub fn sqrt_exact(&self) -> Option<Self> {
        if self.neg {
            return None;
        } else if self.is_zero() {
            return Some(Self::zero());
        } else if self.exp.is_odd() {
            return None;
        }

        let s = self.mant.sqrt();
        if &s * &s == self.mant {
            Some(Self::new(false, s, self.exp / 2))
        } else {
            None
        }
    }
}

impl PartialOrd for Dyadic {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Dyadic {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.signum(), other.signum()) {
            (a, b) if a != b => a.cmp(&b),
            (-1, _) => other.cmp_abs(self),
            _ => self.cmp_abs(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(f: f64) -> Dyadic {
        Dyadic::from_f64(f).unwrap()
    }

    #[test]
    fn canonical() {
        assert_eq!(Dyadic::new(false, BigUint::from(12u32), 0), d(12.0));
        assert_eq!(d(12.0).mant(), &BigUint::from(3u32));
        assert_eq!(d(12.0).exp(), 2);
        assert_eq!(d(-0.0), Dyadic::zero());
    }

    #[test]
    fn ordering() {
        assert!(d(-3.0) < d(-2.5));
        assert!(d(0.0) < d(0.125));
        assert!(d(1.5) > d(1.25));
        assert_eq!(d(2.0).cmp_abs(&d(-2.0)), Ordering::Equal);
    }

    #[test]
    fn add_far_apart() {
        let big = d(1.0);
        let tiny = Dyadic::new(false, BigUint::one(), -10_000);
        let (r, ord) = big.add_round(&tiny, 8, RoundingMode::ToPositive);
        assert_eq!(r, d(1.0 + 1.0 / 128.0));
        assert_eq!(ord, Ordering::Greater);
        let (r, ord) = big.add_round(&tiny.neg(), 8, RoundingMode::ToZero);
        assert_eq!(r, d(1.0 - 1.0 / 256.0));
        assert_eq!(ord, Ordering::Less);
        let (r, ord) = big.add_round(&tiny.neg(), 8, RoundingMode::NearestEven);
        assert_eq!(r, d(1.0));
        assert_eq!(ord, Ordering::Greater);
    }

    #[test]
    fn sqrt() {
        let (r, ord) = d(2.0).sqrt_round(53, RoundingMode::NearestEven);
        assert_eq!(r.to_f64(RoundingMode::NearestEven).0, 2f64.sqrt());
        assert_eq!(ord, Ordering::Greater);
        assert_eq!(d(0.25).sqrt_exact(), Some(d(0.5)));
        assert_eq!(d(0.5).sqrt_exact(), None);
    }

    #[test]
    fn integer_rounding() {
        assert_eq!(d(-2.5).to_bigint(RoundingMode::ToNegative), BigInt::from(-3));
        assert_eq!(d(-2.5).to_bigint(RoundingMode::ToZero), BigInt::from(-2));
        assert_eq!(d(2.5).to_bigint(RoundingMode::NearestEven), BigInt::from(2));
        assert_eq!(d(96.0).to_bigint(RoundingMode::ToZero), BigInt::from(96));
    }
}
