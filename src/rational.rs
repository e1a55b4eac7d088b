/*
    Rationals in lowest terms
*/

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use num_bigint::BigInt;
use num_integer::Integer as _;
use num_traits::{One, Signed, Zero};

use crate::ops::{impl_binop, impl_unop};
use crate::{Error, Exact, Integer, Number, Result};

mod convert;

/// A rational number `num / den`.
///
/// Always canonical: `den > 0` and `gcd(num, den) == 1`, so the derived
/// equality is value equality.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Rational {
    num: Integer,
    den: Integer,
}

impl Default for Rational {
    fn default() -> Self {
        Self::from(Integer::zero())
    }
}

impl Rational {
    // Builds a canonical rational from a numerator and a non-zero denominator.
    pub(crate) fn canonical(num: BigInt, den: BigInt) -> Self {
        debug_assert!(!den.is_zero());
        let g = num.gcd(&den);
        let (mut num, mut den) = if g.is_one() { (num, den) } else { (num / &g, den / &g) };
        if den.is_negative() {
            num = -num;
            den = -den;
        }
        Self {
            num: Integer::from(num),
            den: Integer::from(den),
        }
    }

    /// Constructs `num / den` in lowest terms.
    pub fn new(num: Integer, den: Integer) -> Result<Self> {
        if den.is_zero() {
            return Err(Error::DivisionByZero);
        }
        Ok(Self::canonical(num.into_bigint(), den.into_bigint()))
    }

    /// Constructs `num / den` in lowest terms.
    pub fn from_si(num: i64, den: i64) -> Result<Self> {
        Self::new(Integer::from(num), Integer::from(den))
    }

    /// The canonical numerator.
    pub fn numer(&self) -> &Integer {
        &self.num
    }

    /// The canonical (positive) denominator.
    pub fn denom(&self) -> &Integer {
        &self.den
    }

    pub fn num(&self) -> Integer {
        self.num.clone()
    }

    pub fn den(&self) -> Integer {
        self.den.clone()
    }

    /// Splits into the canonical numerator and denominator.
    pub fn into_parts(self) -> (Integer, Integer) {
        (self.num, self.den)
    }

    pub fn is_zero(&self) -> bool {
        self.num.is_zero()
    }

    /// Returns true if the denominator is one.
    pub fn is_integer(&self) -> bool {
        self.den.as_bigint().is_one()
    }

    pub fn signum(&self) -> i32 {
        self.num.signum()
    }

    pub fn add(&self, other: &Self) -> Self {
        let (a, b) = (self.num.as_bigint(), self.den.as_bigint());
        let (c, d) = (other.num.as_bigint(), other.den.as_bigint());
        Self::canonical(a * d + c * b, b * d)
    }

    pub fn sub(&self, other: &Self) -> Self {
        let (a, b) = (self.num.as_bigint(), self.den.as_bigint());
        let (c, d) = (other.num.as_bigint(), other.den.as_bigint());
        Self::canonical(a * d - c * b, b * d)
    }

    pub fn mul(&self, other: &Self) -> Self {
        let (a, b) = (self.num.as_bigint(), self.den.as_bigint());
        let (c, d) = (other.num.as_bigint(), other.den.as_bigint());
        Self::canonical(a * c, b * d)
    }

    /// Quotient; dividing by zero is an error.
    pub fn div(&self, other: &Self) -> Result<Self> {
        if other.is_zero() {
            return Err(Error::DivisionByZero);
        }
        let (a, b) = (self.num.as_bigint(), self.den.as_bigint());
        let (c, d) = (other.num.as_bigint(), other.den.as_bigint());
        Ok(Self::canonical(a * d, b * c))
    }

    pub fn neg(&self) -> Self {
        Self {
            num: self.num.neg(),
            den: self.den.clone(),
        }
    }

    pub fn abs(&self) -> Self {
        Self {
            num: self.num.abs(),
            den: self.den.clone(),
        }
    }

    /// Reciprocal; inverting zero is an error.
    pub fn inv(&self) -> Result<Self> {
        if self.is_zero() {
            return Err(Error::DivisionByZero);
        }

        // already reduced, only the sign moves
        let (num, den) = if self.num.signum() < 0 {
            (self.den.neg(), self.num.neg())
        } else {
            (self.den.clone(), self.num.clone())
        };
        Ok(Self { num, den })
    }

    /// Compares with the fraction `num / den`.
    pub fn cmp_ratio(&self, num: i64, den: u64) -> Result<Ordering> {
        let other = Self::new(Integer::from(num), Integer::from(den))?;
        Ok(self.cmp(&other))
    }

    /// Combines the residues of the canonical numerator and denominator
    /// modulo [`HASH_MODULUS`](crate::HASH_MODULUS).
    pub fn hash_value(&self) -> u64 {
        self.num.hash_value() ^ self.den.hash_value()
    }

    /// Stores `a + b` in this rational.
    pub fn set_add(&mut self, a: &Self, b: &Self) {
        *self = a.add(b);
    }

    /// Stores `a - b` in this rational.
    pub fn set_sub(&mut self, a: &Self, b: &Self) {
        *self = a.sub(b);
    }

    /// Stores `a * b` in this rational.
    pub fn set_mul(&mut self, a: &Self, b: &Self) {
        *self = a.mul(b);
    }

    /// Stores `a / b` in this rational; unchanged on error.
    pub fn set_div(&mut self, a: &Self, b: &Self) -> Result<()> {
        *self = a.div(b)?;
        Ok(())
    }

    /// Stores `-a` in this rational.
    pub fn set_neg(&mut self, a: &Self) {
        *self = a.neg();
    }

    /// Stores `1 / a` in this rational; unchanged on error.
    pub fn set_inv(&mut self, a: &Self) -> Result<()> {
        *self = a.inv()?;
        Ok(())
    }

    /// Stores `|a|` in this rational.
    pub fn set_abs(&mut self, a: &Self) {
        *self = a.abs();
    }
}

impl From<Integer> for Rational {
    fn from(num: Integer) -> Self {
        Self {
            num,
            den: Integer::from(1),
        }
    }
}

impl From<i64> for Rational {
    fn from(num: i64) -> Self {
        Self::from(Integer::from(num))
    }
}

impl PartialOrd for Rational {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Rational {
    fn cmp(&self, other: &Self) -> Ordering {
        // denominators are positive
        let lhs = self.num.as_bigint() * other.den.as_bigint();
        let rhs = other.num.as_bigint() * self.den.as_bigint();
        lhs.cmp(&rhs)
    }
}

impl Hash for Rational {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.hash_value());
    }
}

impl fmt::Display for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_integer() {
            write!(f, "{}", self.num)
        } else {
            write!(f, "{}/{}", self.num, self.den)
        }
    }
}

impl FromStr for Rational {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_str_radix(s, 10)
    }
}

impl_binop!(Rational, Add, add, AddAssign, add_assign, Rational::add);
impl_binop!(Rational, Sub, sub, SubAssign, sub_assign, Rational::sub);
impl_binop!(Rational, Mul, mul, MulAssign, mul_assign, Rational::mul);
impl_unop!(Rational, Neg, neg, Rational::neg);

impl Number for Rational {
    type Ctx = Exact;

    fn is_zero(&self) -> bool {
        self.num.is_zero()
    }

    fn is_infinity(&self) -> bool {
        false
    }

    fn is_nan(&self) -> bool {
        false
    }

    fn signum(&self) -> i32 {
        self.num.signum()
    }

    fn neg(&self, _: &Exact) -> Result<Self> {
        Ok(Rational::neg(self))
    }

    fn abs(&self, _: &Exact) -> Result<Self> {
        Ok(Rational::abs(self))
    }

    fn add(&self, other: &Self, _: &Exact) -> Result<Self> {
        Ok(Rational::add(self, other))
    }

    fn sub(&self, other: &Self, _: &Exact) -> Result<Self> {
        Ok(Rational::sub(self, other))
    }

    fn mul(&self, other: &Self, _: &Exact) -> Result<Self> {
        Ok(Rational::mul(self, other))
    }
}
