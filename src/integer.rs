/*
    Arbitrary-precision integers
*/

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use num_bigint::{BigInt, Sign};
use num_integer::Integer as _;
use num_traits::{Signed, ToPrimitive, Zero};
use tracing::trace;

use crate::dyadic::Dyadic;
use crate::ops::{impl_binop, impl_unop};
use crate::{radix, round, Error, Exact, Number, Result, RoundingMode, HASH_MODULUS};

mod bits;
mod division;
mod prime;
mod random;
mod roots;
mod theory;

pub use prime::Primality;

/// An arbitrary-precision signed integer.
///
/// Zero has a single representation; values are compared and hashed
/// numerically.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Integer(BigInt);

impl Integer {
    /// The integer zero.
    pub fn zero() -> Self {
        Self::default()
    }

    /// Returns a reference to the underlying `BigInt`.
    pub fn as_bigint(&self) -> &BigInt {
        &self.0
    }

    /// Consumes this `Integer` returning the underlying `BigInt`.
    pub fn into_bigint(self) -> BigInt {
        self.0
    }

    /// Parses an integer written in `base`.
    ///
    /// Bases 2 to 62 are accepted, as well as base 0 which detects the
    /// base from the prefix (`0x`/`0X` hexadecimal, `0b`/`0B` binary,
    /// a leading `0` octal, decimal otherwise). ASCII whitespace is
    /// ignored anywhere in the text; a single leading `-` negates.
    pub fn from_str_radix(text: &str, base: u32) -> Result<Self> {
        trace!(base, len = text.len(), "parsing integer");
        if base != 0 {
            radix::check_base(base)?;
        }

        let bytes = radix::strip_whitespace(text);
        let (neg, digits) = match bytes.split_first() {
            Some((&b'-', rest)) => (true, rest),
            _ => (false, &bytes[..]),
        };

        let (base, digits) = match (base, digits) {
            (0, [b'0', b'x' | b'X', rest @ ..]) => (16, rest),
            (0, [b'0', b'b' | b'B', rest @ ..]) => (2, rest),
            (0, [b'0', rest @ ..]) if !rest.is_empty() => (8, rest),
            (0, _) => (10, digits),
            (b, _) => (b, digits),
        };

        let mag = radix::parse_uint(digits, base)?;
        let sign = if neg { Sign::Minus } else { Sign::Plus };
        Ok(Self(BigInt::from_biguint(sign, mag)))
    }

    /// Converts a double, truncating toward zero.
    /// Infinities and NaN are domain errors.
    pub fn from_f64(f: f64) -> Result<Self> {
        let d = Dyadic::from_f64(f)
            .ok_or_else(|| Error::domain(format!("cannot convert {} to an integer", f)))?;
        Ok(Self(d.to_bigint(RoundingMode::ToZero)))
    }

    /// Formats this integer in `base` (2 to 62). Bases up to 36 use the
    /// digits `0-9a-z`, larger bases `0-9A-Za-z`.
    pub fn to_string_radix(&self, base: u32) -> Result<String> {
        radix::check_base(base)?;
        let digits = radix::format_uint(self.0.magnitude(), base);
        if self.0.is_negative() {
            Ok(format!("-{}", digits))
        } else {
            Ok(digits)
        }
    }

    /// Converts to an `i64`, failing if the value is out of range.
    pub fn to_i64(&self) -> Result<i64> {
        self.0.to_i64().ok_or(Error::Overflow)
    }

    /// Converts to a `u64`, failing if the value is out of range.
    pub fn to_u64(&self) -> Result<u64> {
        self.0.to_u64().ok_or(Error::Overflow)
    }

    /// Converts to a double, rounding to nearest (ties to even).
    /// Values beyond the double range become infinities.
    pub fn to_f64(&self) -> f64 {
        let neg = self.0.is_negative();
        round::round_f64(neg, self.0.magnitude(), 0, false, RoundingMode::NearestEven).0
    }

    /// Returns true if the value is zero.
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Returns -1, 0 or 1 according to the sign.
    pub fn signum(&self) -> i32 {
        match self.0.sign() {
            Sign::Minus => -1,
            Sign::NoSign => 0,
            Sign::Plus => 1,
        }
    }

    /// Returns true if the value is odd.
    pub fn is_odd(&self) -> bool {
        self.0.is_odd()
    }

    /// Returns true if the value is even.
    pub fn is_even(&self) -> bool {
        self.0.is_even()
    }

    /// Number of bits of the magnitude (zero has none).
    pub fn significant_bits(&self) -> u64 {
        self.0.bits()
    }

    pub fn add(&self, other: &Self) -> Self {
        Self(&self.0 + &other.0)
    }

    pub fn add_si(&self, other: i64) -> Self {
        Self(&self.0 + other)
    }

    pub fn add_ui(&self, other: u64) -> Self {
        Self(&self.0 + other)
    }

    pub fn sub(&self, other: &Self) -> Self {
        Self(&self.0 - &other.0)
    }

    pub fn sub_si(&self, other: i64) -> Self {
        Self(&self.0 - other)
    }

    pub fn sub_ui(&self, other: u64) -> Self {
        Self(&self.0 - other)
    }

    pub fn mul(&self, other: &Self) -> Self {
        Self(&self.0 * &other.0)
    }

    pub fn mul_si(&self, other: i64) -> Self {
        Self(&self.0 * other)
    }

    pub fn mul_ui(&self, other: u64) -> Self {
        Self(&self.0 * other)
    }

    pub fn neg(&self) -> Self {
        Self(-&self.0)
    }

    pub fn abs(&self) -> Self {
        Self(self.0.abs())
    }

    /// Compares with a machine integer.
    pub fn cmp_si(&self, other: i64) -> Ordering {
        self.0.cmp(&BigInt::from(other))
    }

    /// Compares absolute values.
    pub fn cmp_abs(&self, other: &Self) -> Ordering {
        self.0.magnitude().cmp(other.0.magnitude())
    }

    /// Residue of this value modulo [`HASH_MODULUS`], in `[0, HASH_MODULUS)`.
    pub fn hash_value(&self) -> u64 {
        self.0
            .mod_floor(&BigInt::from(HASH_MODULUS))
            .to_u64()
            .unwrap_or_default()
    }

    /// Stores `a + b` in this integer.
    pub fn set_add(&mut self, a: &Self, b: &Self) {
        self.0 = &a.0 + &b.0;
    }

    /// Stores `a - b` in this integer.
    pub fn set_sub(&mut self, a: &Self, b: &Self) {
        self.0 = &a.0 - &b.0;
    }

    /// Stores `a * b` in this integer.
    pub fn set_mul(&mut self, a: &Self, b: &Self) {
        self.0 = &a.0 * &b.0;
    }

    /// Stores `-a` in this integer.
    pub fn set_neg(&mut self, a: &Self) {
        self.0 = -&a.0;
    }

    /// Stores `|a|` in this integer.
    pub fn set_abs(&mut self, a: &Self) {
        self.0 = a.0.abs();
    }

    /// Overwrites this integer with a machine integer.
    pub fn assign_i64(&mut self, value: i64) {
        self.0 = BigInt::from(value);
    }

    /// Overwrites this integer with a truncated double.
    /// On error, the integer is left unchanged.
    pub fn assign_f64(&mut self, value: f64) -> Result<()> {
        *self = Self::from_f64(value)?;
        Ok(())
    }

    /// Overwrites this integer with parsed text.
    /// On error, the integer is left unchanged.
    pub fn assign_str_radix(&mut self, text: &str, base: u32) -> Result<()> {
        *self = Self::from_str_radix(text, base)?;
        Ok(())
    }
}

impl From<BigInt> for Integer {
    fn from(i: BigInt) -> Self {
        Self(i)
    }
}

impl From<Integer> for BigInt {
    fn from(i: Integer) -> Self {
        i.0
    }
}

macro_rules! impl_from_prim {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Integer {
                fn from(i: $t) -> Self {
                    Self(BigInt::from(i))
                }
            }
        )*
    };
}

impl_from_prim!(i32, i64, u32, u64);

impl FromStr for Integer {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_str_radix(s, 10)
    }
}

impl fmt::Display for Integer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Hash for Integer {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.hash_value());
    }
}

impl_binop!(Integer, Add, add, AddAssign, add_assign, Integer::add);
impl_binop!(Integer, Sub, sub, SubAssign, sub_assign, Integer::sub);
impl_binop!(Integer, Mul, mul, MulAssign, mul_assign, Integer::mul);
impl_binop!(Integer, BitAnd, bitand, BitAndAssign, bitand_assign, Integer::and);
impl_binop!(Integer, BitOr, bitor, BitOrAssign, bitor_assign, Integer::or);
impl_binop!(Integer, BitXor, bitxor, BitXorAssign, bitxor_assign, Integer::xor);
impl_unop!(Integer, Neg, neg, Integer::neg);
impl_unop!(Integer, Not, not, Integer::com);

impl Number for Integer {
    type Ctx = Exact;

    fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    fn is_infinity(&self) -> bool {
        false
    }

    fn is_nan(&self) -> bool {
        false
    }

    fn signum(&self) -> i32 {
        Integer::signum(self)
    }

    fn neg(&self, _: &Exact) -> Result<Self> {
        Ok(Integer::neg(self))
    }

    fn abs(&self, _: &Exact) -> Result<Self> {
        Ok(Integer::abs(self))
    }

    fn add(&self, other: &Self, _: &Exact) -> Result<Self> {
        Ok(Integer::add(self, other))
    }

    fn sub(&self, other: &Self, _: &Exact) -> Result<Self> {
        Ok(Integer::sub(self, other))
    }

    fn mul(&self, other: &Self, _: &Exact) -> Result<Self> {
        Ok(Integer::mul(self, other))
    }
}
