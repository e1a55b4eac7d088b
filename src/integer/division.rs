/*
    Integer division
*/

use num_bigint::BigInt;
use num_integer::Integer as _;
use num_traits::{Signed, Zero};

use super::Integer;
use crate::dyadic::Dyadic;
use crate::{Error, Result, RoundingDirection, RoundingMode};

// Divides `n` by `d` rounding the quotient per `rm`, which must be one of
// the directed modes. The remainder is `n - q * d`.
fn div_rem_round(n: &BigInt, d: &BigInt, rm: RoundingMode) -> Result<(BigInt, BigInt)> {
    if d.is_zero() {
        return Err(Error::DivisionByZero);
    }

    let (q, r) = n.div_rem(d);
    if r.is_zero() {
        return Ok((q, r));
    }

    // the exact quotient lies strictly between `q` and its successor
    // away from zero
    let neg = n.is_negative() != d.is_negative();
    match rm.direction(neg) {
        (false, RoundingDirection::AwayZero) if neg => Ok((q - 1, r + d)),
        (false, RoundingDirection::AwayZero) => Ok((q + 1, r - d)),
        _ => Ok((q, r)),
    }
}

// Shifts `n` right by `k` bits rounding per `rm`.
fn shift_round(n: &BigInt, k: u64, rm: RoundingMode) -> BigInt {
    if k > n.bits() {
        // 0 < |n / 2^k| < 1/2 unless `n` is zero
        let neg = n.is_negative();
        return match rm.direction(neg) {
            (false, RoundingDirection::AwayZero) if neg => BigInt::from(-1),
            (false, RoundingDirection::AwayZero) if !n.is_zero() => BigInt::from(1),
            _ => BigInt::zero(),
        };
    }
    Dyadic::from_bigint(n).mul_2exp(-(k as i64)).to_bigint(rm)
}

macro_rules! division_family {
    (
        $rm:expr, $name:literal,
        $q:ident, $r:ident, $qr:ident,
        $q_ui:ident, $r_ui:ident, $qr_ui:ident,
        $q_2exp:ident, $r_2exp:ident,
        $set_q:ident, $set_r:ident
    ) => {
        #[doc = concat!("Quotient of the division rounding ", $name, ".")]
        pub fn $q(&self, d: &Integer) -> Result<Integer> {
            div_rem_round(&self.0, &d.0, $rm).map(|(q, _)| Integer(q))
        }

        #[doc = concat!("Remainder of the division rounding ", $name, ".")]
        pub fn $r(&self, d: &Integer) -> Result<Integer> {
            div_rem_round(&self.0, &d.0, $rm).map(|(_, r)| Integer(r))
        }

        #[doc = concat!("Quotient and remainder of the division rounding ", $name, ".")]
        pub fn $qr(&self, d: &Integer) -> Result<(Integer, Integer)> {
            div_rem_round(&self.0, &d.0, $rm).map(|(q, r)| (Integer(q), Integer(r)))
        }

        pub fn $q_ui(&self, d: u64) -> Result<Integer> {
            self.$q(&Integer::from(d))
        }

        pub fn $r_ui(&self, d: u64) -> Result<Integer> {
            self.$r(&Integer::from(d))
        }

        pub fn $qr_ui(&self, d: u64) -> Result<(Integer, Integer)> {
            self.$qr(&Integer::from(d))
        }

        #[doc = concat!("Quotient of the division by `2^k` rounding ", $name, ".")]
        pub fn $q_2exp(&self, k: u64) -> Integer {
            Integer(shift_round(&self.0, k, $rm))
        }

        #[doc = concat!("Remainder of the division by `2^k` rounding ", $name, ".")]
        pub fn $r_2exp(&self, k: u64) -> Integer {
            let q = shift_round(&self.0, k, $rm);
            if q.is_zero() {
                return self.clone();
            }
            Integer(&self.0 - (q << k))
        }

        /// Stores the quotient of `n / d` in this integer.
        pub fn $set_q(&mut self, n: &Integer, d: &Integer) -> Result<()> {
            *self = n.$q(d)?;
            Ok(())
        }

        /// Stores the remainder of `n / d` in this integer.
        pub fn $set_r(&mut self, n: &Integer, d: &Integer) -> Result<()> {
            *self = n.$r(d)?;
            Ok(())
        }
    };
}

/// Division families.
///
/// Each family rounds the exact quotient a different way:
/// `tdiv` toward zero (the remainder has the sign of the dividend),
/// `fdiv` toward negative infinity (the remainder has the sign of the
/// divisor), and `cdiv` toward positive infinity (the remainder has the
/// opposite sign of the divisor). In every family `q * d + r == n`, and
/// a zero divisor is [`Error::DivisionByZero`].
impl Integer {
    division_family!(
        RoundingMode::ToZero, "toward zero",
        tdiv_q, tdiv_r, tdiv_qr,
        tdiv_q_ui, tdiv_r_ui, tdiv_qr_ui,
        tdiv_q_2exp, tdiv_r_2exp,
        set_tdiv_q, set_tdiv_r
    );

    division_family!(
        RoundingMode::ToNegative, "toward negative infinity",
        fdiv_q, fdiv_r, fdiv_qr,
        fdiv_q_ui, fdiv_r_ui, fdiv_qr_ui,
        fdiv_q_2exp, fdiv_r_2exp,
        set_fdiv_q, set_fdiv_r
    );

    division_family!(
        RoundingMode::ToPositive, "toward positive infinity",
        cdiv_q, cdiv_r, cdiv_qr,
        cdiv_q_ui, cdiv_r_ui, cdiv_qr_ui,
        cdiv_q_2exp, cdiv_r_2exp,
        set_cdiv_q, set_cdiv_r
    );

    /// Quotient of a division known to be exact.
    ///
    /// If `d` does not divide this integer the result is meaningless
    /// (it is the truncated quotient). A zero divisor is still an error.
    pub fn divexact(&self, d: &Integer) -> Result<Integer> {
        if d.0.is_zero() {
            return Err(Error::DivisionByZero);
        }
        Ok(Integer(&self.0 / &d.0))
    }

    pub fn divexact_ui(&self, d: u64) -> Result<Integer> {
        self.divexact(&Integer::from(d))
    }

    /// Returns true if `d` divides this integer. Only zero divides zero.
    pub fn is_divisible(&self, d: &Integer) -> bool {
        if d.0.is_zero() {
            self.0.is_zero()
        } else {
            (&self.0 % &d.0).is_zero()
        }
    }

    /// Non-negative residue modulo `m`, in `[0, |m|)`.
    pub fn modulo(&self, m: &Integer) -> Result<Integer> {
        if m.0.is_zero() {
            return Err(Error::DivisionByZero);
        }
        Ok(Integer(self.0.mod_floor(&m.0.abs())))
    }

    pub fn mod_ui(&self, m: u64) -> Result<Integer> {
        self.modulo(&Integer::from(m))
    }

    /// Multiplies by `2^k`.
    pub fn mul_2exp(&self, k: u64) -> Integer {
        Integer(&self.0 << k)
    }

    /// Stores `n mod m` in this integer.
    pub fn set_modulo(&mut self, n: &Integer, m: &Integer) -> Result<()> {
        *self = n.modulo(m)?;
        Ok(())
    }

    /// Stores the exact quotient `n / d` in this integer.
    pub fn set_divexact(&mut self, n: &Integer, d: &Integer) -> Result<()> {
        *self = n.divexact(d)?;
        Ok(())
    }

    /// Stores `a * 2^k` in this integer.
    pub fn set_mul_2exp(&mut self, a: &Integer, k: u64) {
        *self = a.mul_2exp(k);
    }
}
