/*
    Conversions to and from `Rational`
*/

use num_bigint::BigInt;
use num_integer::Integer as _;
use num_traits::{Signed, Zero};
use tracing::trace;

use super::Rational;
use crate::dyadic::Dyadic;
use crate::{radix, round, Error, Integer, Result, RoundingMode};

/// Quotient bits kept before rounding onto the binary64 grid:
/// the 53-bit significand, the half bit and one more.
const F64_QUOTIENT_BITS: i64 = 55;

impl Rational {
    /// Converts a double exactly. Infinities and NaN are domain errors.
    pub fn from_f64(f: f64) -> Result<Self> {
        let d = Dyadic::from_f64(f)
            .ok_or_else(|| Error::domain(format!("cannot convert {} to a rational", f)))?;
        let (num, den) = d.to_ratio();
        Ok(Self::canonical(num, BigInt::from(den)))
    }

    /// Converts to the nearest double (ties to even), including
    /// subnormals; values beyond the double range become infinities.
    pub fn to_f64(&self) -> f64 {
        self.to_f64_round(RoundingMode::NearestEven)
    }

    /// Converts to a double rounding per `rm`.
    pub fn to_f64_round(&self, rm: RoundingMode) -> f64 {
        let num = self.num.as_bigint();
        let den = self.den.as_bigint();
        if num.is_zero() {
            return 0.0;
        }

        let shift = (F64_QUOTIENT_BITS + den.bits() as i64 - num.bits() as i64).max(0);
        let (q, r) = (num.magnitude() << shift as u64).div_rem(den.magnitude());
        round::round_f64(num.is_negative(), &q, -shift, !r.is_zero(), rm).0
    }

    /// Parses `n/d` or `n` with both parts in `base` (see
    /// [`Integer::from_str_radix`]).
    pub fn from_str_radix(text: &str, base: u32) -> Result<Self> {
        trace!(base, len = text.len(), "parsing rational");
        match text.split_once('/') {
            Some((n, d)) => {
                let num = Integer::from_str_radix(n, base)?;
                let den = Integer::from_str_radix(d, base)?;
                Self::new(num, den)
            }
            None => Ok(Self::from(Integer::from_str_radix(text, base)?)),
        }
    }

    /// Formats as `n/d` (or `n` for integers) in `base`.
    pub fn to_string_radix(&self, base: u32) -> Result<String> {
        radix::check_base(base)?;
        let num = self.num.to_string_radix(base)?;
        if self.is_integer() {
            Ok(num)
        } else {
            Ok(format!("{}/{}", num, self.den.to_string_radix(base)?))
        }
    }
}
