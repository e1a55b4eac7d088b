/*
    Arithmetic on `Float`
*/

use super::{Float, RM};
use crate::dyadic::Dyadic;
use crate::{Error, Result, RoundingMode};

impl Float {
    // Truncated quotient of two exact values.
    fn quotient(a: &Dyadic, b: &Dyadic, prec: u32) -> Result<Float> {
        crate::assert_valid_prec!(prec);
        if b.is_zero() {
            return Err(Error::DivisionByZero);
        }
        let (value, _) = a.div_round(b, prec, RM);
        Ok(Float { prec, value })
    }

    // Rounds to an integer-valued float at `prec` bits. Past the
    // precision every value is an integer, so one rounding suffices.
    fn round_integral(&self, prec: u32, rm: RoundingMode) -> Float {
        crate::assert_valid_prec!(prec);
        if self.value.is_zero() {
            return Float::new(prec);
        }
        let lsb = (self.value.top() + 1 - prec as i64).max(0);
        let (value, _) = self.value.round_at(lsb, rm);
        Float { prec, value }
    }

    /// Truncated sum at precision `prec`.
    pub fn add(&self, other: &Float, prec: u32) -> Float {
        crate::assert_valid_prec!(prec);
        let (value, _) = self.value.add_round(&other.value, prec, RM);
        Float { prec, value }
    }

    pub fn add_ui(&self, other: u64, prec: u32) -> Float {
        self.add(&Float::from_ui(other, 64), prec)
    }

    /// Truncated difference at precision `prec`.
    pub fn sub(&self, other: &Float, prec: u32) -> Float {
        crate::assert_valid_prec!(prec);
        let (value, _) = self.value.add_round(&other.value.neg(), prec, RM);
        Float { prec, value }
    }

    pub fn sub_ui(&self, other: u64, prec: u32) -> Float {
        self.sub(&Float::from_ui(other, 64), prec)
    }

    /// Computes `a - b` at precision `prec`.
    pub fn ui_sub(a: u64, b: &Float, prec: u32) -> Float {
        Float::from_ui(a, 64).sub(b, prec)
    }

    /// Truncated product at precision `prec`.
    pub fn mul(&self, other: &Float, prec: u32) -> Float {
        Float::truncate(&self.value.mul(&other.value), prec)
    }

    pub fn mul_ui(&self, other: u64, prec: u32) -> Float {
        self.mul(&Float::from_ui(other, 64), prec)
    }

    /// Truncated quotient at precision `prec`.
    /// Dividing by zero is an error.
    pub fn div(&self, other: &Float, prec: u32) -> Result<Float> {
        Self::quotient(&self.value, &other.value, prec)
    }

    pub fn div_ui(&self, other: u64, prec: u32) -> Result<Float> {
        Self::quotient(&self.value, &Float::from_ui(other, 64).value, prec)
    }

    /// Computes `a / b` at precision `prec`.
    pub fn ui_div(a: u64, b: &Float, prec: u32) -> Result<Float> {
        Self::quotient(&Float::from_ui(a, 64).value, &b.value, prec)
    }

    pub fn neg(&self, prec: u32) -> Float {
        Float::truncate(&self.value.neg(), prec)
    }

    pub fn abs(&self, prec: u32) -> Float {
        Float::truncate(&self.value.abs(), prec)
    }

    /// The smallest integer not below this value, at precision `prec`.
    pub fn ceil(&self, prec: u32) -> Float {
        self.round_integral(prec, RoundingMode::ToPositive)
    }

    /// The largest integer not above this value, at precision `prec`.
    pub fn floor(&self, prec: u32) -> Float {
        self.round_integral(prec, RoundingMode::ToNegative)
    }

    /// This value truncated toward zero to an integer, at precision `prec`.
    pub fn trunc(&self, prec: u32) -> Float {
        self.round_integral(prec, RoundingMode::ToZero)
    }
}
