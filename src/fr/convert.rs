/*
    Conversions of `RFloat`
*/

use num_bigint::{BigInt, Sign};
use num_traits::Zero;
use tracing::trace;

use super::{require_engine, Exceptions, FrNum, RFloat, RoundingContext, EXP_MAX};
use crate::dyadic::Dyadic;
use crate::{radix, Error, Integer, RandState, Rational, Result, RoundingMode};

/// Bits per limb of the stress generator.
const LIMB_BITS: u64 = 32;

impl RFloat {
    // Rounds `num / den`; a zero keeps the sign `zero_sign`.
    fn from_ratio(num: &BigInt, den: &BigInt, zero_sign: bool, ctx: &RoundingContext) -> RFloat {
        if num.is_zero() {
            return Self::zero(zero_sign, ctx.prec);
        }
        Self::round_unrounded(&Dyadic::ratio_unrounded(num, den, ctx.prec), ctx)
    }

    pub fn from_integer(n: &Integer, ctx: &RoundingContext) -> Result<RFloat> {
        require_engine("from_integer")?;
        Ok(Self::round_dyadic(&Dyadic::from_bigint(n.as_bigint()), false, ctx))
    }

    pub fn from_rational(q: &Rational, ctx: &RoundingContext) -> Result<RFloat> {
        require_engine("from_rational")?;
        Ok(Self::from_ratio(q.numer().as_bigint(), q.denom().as_bigint(), false, ctx))
    }

    pub fn from_si(n: i64, ctx: &RoundingContext) -> Result<RFloat> {
        require_engine("from_si")?;
        Ok(Self::round_dyadic(&Dyadic::from_i64(n), false, ctx))
    }

    /// Converts a double, keeping infinities, NaN and the sign of zero.
    pub fn from_f64(f: f64, ctx: &RoundingContext) -> Result<RFloat> {
        require_engine("from_f64")?;
        if f.is_nan() {
            return Ok(Self::nan(ctx.prec));
        }
        Ok(match Dyadic::from_f64(f) {
            Some(d) => Self::round_dyadic(&d, f.is_sign_negative(), ctx),
            None => Self::infinity(f < 0.0, ctx.prec),
        })
    }

    /// Parses `[-]digits[.digits][@exp]` in `base` (2 to 62) and rounds
    /// the value under `ctx`.
    ///
    /// `@NaN@` and `[-]@Inf@` are accepted in any case, and `-0` parses
    /// as a negative zero.
    pub fn from_str_radix(text: &str, base: u32, ctx: &RoundingContext) -> Result<RFloat> {
        require_engine("from_str_radix")?;
        trace!(base, prec = ctx.prec, len = text.len(), "parsing correctly-rounded float");
        let bytes = radix::strip_whitespace(text);
        let (neg, body) = match bytes.split_first() {
            Some((&b'-', rest)) => (true, rest),
            Some((&b'+', rest)) => (false, rest),
            _ => (false, &bytes[..]),
        };

        if body.eq_ignore_ascii_case(b"@nan@") {
            return Ok(Self::nan(ctx.prec));
        } else if body.eq_ignore_ascii_case(b"@inf@") {
            return Ok(Self::infinity(neg, ctx.prec));
        }

        let (num, den) = radix::parse_float(text, base)?;
        Ok(Self::from_ratio(&num, &den, neg, ctx))
    }

    /// Rounds to a double under `rm`, subnormals included.
    pub fn to_f64(&self, rm: RoundingMode) -> Result<f64> {
        require_engine("to_f64")?;
        Ok(match &self.num {
            FrNum::Nan => f64::NAN,
            FrNum::Infinity(true) => f64::NEG_INFINITY,
            FrNum::Infinity(false) => f64::INFINITY,
            FrNum::Zero(true) => -0.0,
            FrNum::Zero(false) => 0.0,
            FrNum::Finite(d) => d.to_f64(rm).0,
        })
    }

    /// Splits a finite value into `(m, e)` with `value = m * 2^e` and `m`
    /// holding exactly `prec` significant bits. Zero is `(0, 0)`.
    pub fn to_z_exp(&self) -> Result<(Integer, i64)> {
        require_engine("to_z_exp")?;
        match &self.num {
            FrNum::Zero(_) => Ok((Integer::zero(), 0)),
            FrNum::Finite(d) => {
                let shift = self.prec as i64 - d.bits() as i64;
                let sign = if d.is_neg() { Sign::Minus } else { Sign::Plus };
                let m = BigInt::from_biguint(sign, d.mant() << shift as u64);
                Ok((Integer::from(m), d.exp() - shift))
            }
            _ => Err(Error::domain("cannot split a NaN or an infinity")),
        }
    }

    /// Converts a finite value exactly to a rational.
    pub fn to_rational(&self) -> Result<Rational> {
        require_engine("to_rational")?;
        match &self.num {
            FrNum::Zero(_) => Ok(Rational::default()),
            FrNum::Finite(d) => {
                let (num, den) = d.to_ratio();
                Ok(Rational::canonical(num, BigInt::from(den)))
            }
            _ => Err(Error::domain("cannot convert a NaN or an infinity to a rational")),
        }
    }

    /// Formats this value as `(digits, exp)` with
    /// `value = 0.digits * base^exp`, rounding the last digit under `rm`.
    ///
    /// Zeros are `("", 0)` and `("-", 0)`; NaN and the infinities are
    /// `"@NaN@"`, `"@Inf@"` and `"-@Inf@"` with a zero exponent.
    pub fn to_string_radix(&self, base: u32, digits: usize, rm: RoundingMode) -> Result<(String, i64)> {
        require_engine("to_string_radix")?;
        radix::check_base(base)?;
        Ok(match &self.num {
            FrNum::Nan => ("@NaN@".to_string(), 0),
            FrNum::Infinity(true) => ("-@Inf@".to_string(), 0),
            FrNum::Infinity(false) => ("@Inf@".to_string(), 0),
            FrNum::Zero(true) => ("-".to_string(), 0),
            FrNum::Zero(false) => (String::new(), 0),
            FrNum::Finite(d) => radix::format_dyadic(d, base, digits, self.prec, rm),
        })
    }

    /// A uniformly random value in `[0, 1)` with `prec` random bits.
    pub fn urandomb(state: &mut RandState, prec: u32) -> Result<RFloat> {
        require_engine("urandomb")?;
        crate::assert_valid_prec!(prec);
        let d = Dyadic::new(false, state.bits(prec as u64), -(prec as i64));
        let num = if d.is_zero() { FrNum::Zero(false) } else { FrNum::Finite(d) };
        Ok(Self::from_parts(prec, num, Exceptions::default()))
    }

    /// A random value with `|nlimbs|` limbs of mantissa made of long runs
    /// of ones and zeros, negative when `nlimbs < 0`, with an exponent
    /// (in limbs) in `[-max_exp, max_exp]`.
    pub fn random2(state: &mut RandState, nlimbs: i64, max_exp: u64, prec: u32) -> Result<RFloat> {
        require_engine("random2")?;
        crate::assert_valid_prec!(prec);
        if nlimbs == 0 {
            return Ok(Self::new(prec));
        }

        let nbits = nlimbs.unsigned_abs().saturating_mul(LIMB_BITS).min(prec as u64);
        let mant = state.runs(nbits);
        if mant.is_zero() {
            return Ok(Self::zero(nlimbs < 0, prec));
        }
        // keeps `2^(LIMB_BITS * exp)` inside the exponent range
        let max_exp = max_exp.min((EXP_MAX as u64) / LIMB_BITS - 1);
        let exp = state.below(2 * max_exp + 1) as i64 - max_exp as i64;
        let exp = exp * LIMB_BITS as i64 - mant.bits() as i64;
        let d = Dyadic::new(nlimbs < 0, mant, exp);
        Ok(Self::from_parts(prec, FrNum::Finite(d), Exceptions::default()))
    }
}
