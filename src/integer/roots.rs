/*
    Powers and roots
*/

use num_bigint::BigInt;
use num_traits::{One, Pow, Signed, Zero};

use super::Integer;
use crate::{Error, Result};

impl Integer {
    /// Raises this integer to the power `e`.
    pub fn pow_ui(&self, e: u32) -> Integer {
        Integer(Pow::pow(&self.0, e))
    }

    /// Computes `base^e`.
    pub fn ui_pow_ui(base: u64, e: u32) -> Integer {
        Integer(Pow::pow(BigInt::from(base), e))
    }

    /// Computes `self^e mod m`, in `[0, |m|)`.
    ///
    /// A negative exponent uses the inverse of this integer modulo `m`
    /// and is a domain error when there is none.
    pub fn powm(&self, e: &Integer, m: &Integer) -> Result<Integer> {
        if m.0.is_zero() {
            return Err(Error::DivisionByZero);
        }

        let m_abs = m.0.abs();
        if e.0.is_negative() {
            let inv = self
                .invert(m)?
                .ok_or_else(|| Error::domain("powm: base is not invertible"))?;
            Ok(Integer(inv.0.modpow(&-&e.0, &m_abs)))
        } else {
            Ok(Integer(self.0.modpow(&e.0, &m_abs)))
        }
    }

    /// Computes `self^e mod m`, in `[0, |m|)`.
    pub fn powm_ui(&self, e: u64, m: &Integer) -> Result<Integer> {
        self.powm(&Integer::from(e), m)
    }

    /// Stores `a^e` in this integer.
    pub fn set_pow_ui(&mut self, a: &Integer, e: u32) {
        *self = a.pow_ui(e);
    }

    /// Stores `a^e mod m` in this integer.
    pub fn set_powm(&mut self, a: &Integer, e: &Integer, m: &Integer) -> Result<()> {
        *self = a.powm(e, m)?;
        Ok(())
    }

    /// Truncated square root. Negative values are a domain error.
    pub fn sqrt(&self) -> Result<Integer> {
        self.root(2)
    }

    /// Truncated square root and the remainder `self - root^2`.
    pub fn sqrtrem(&self) -> Result<(Integer, Integer)> {
        self.rootrem(2)
    }

    /// Truncated `n`-th root.
    ///
    /// Odd roots of negative values truncate toward zero. Even roots of
    /// negative values, and the zeroth root, are domain errors.
    pub fn root(&self, n: u32) -> Result<Integer> {
        if n == 0 {
            return Err(Error::domain("zeroth root"));
        } else if n % 2 == 0 && self.0.is_negative() {
            return Err(Error::domain("even root of a negative integer"));
        }
        Ok(Integer(self.0.nth_root(n)))
    }

    /// Truncated `n`-th root and the remainder `self - root^n`.
    pub fn rootrem(&self, n: u32) -> Result<(Integer, Integer)> {
        let root = self.root(n)?;
        let rem = &self.0 - Pow::pow(&root.0, n);
        Ok((root, Integer(rem)))
    }

    /// Returns true if this integer is the square of an integer.
    pub fn is_perfect_square(&self) -> bool {
        if self.0.is_negative() {
            return false;
        }
        let root = self.0.sqrt();
        &root * &root == self.0
    }

    /// Returns true if this integer is `a^b` for some integers `a` and
    /// `b > 1`. Zero and one are perfect powers; a negative value needs an
    /// odd exponent.
    pub fn is_perfect_power(&self) -> bool {
        let n = self.0.magnitude();
        if n.is_zero() || n.is_one() {
            return true;
        }

        // a negative value needs its magnitude to be an odd power
        let neg = self.0.is_negative();
        (2..=n.bits() as u32)
            .filter(|b| !neg || b % 2 == 1)
            .any(|b| &Pow::pow(n.nth_root(b), b) == n)
    }
}
