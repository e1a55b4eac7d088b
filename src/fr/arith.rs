/*
    Correctly-rounded arithmetic
*/

use super::{require_engine, Exceptions, FrNum, RFloat, RoundingContext};
use crate::dyadic::Dyadic;
use crate::{Result, RoundingMode};

impl RFloat {
    // `self + other`, or `self - other` when `negate`.
    fn sum(&self, other: &RFloat, negate: bool, ctx: &RoundingContext) -> RFloat {
        let prec = ctx.prec;
        let (a, b) = match (&self.num, &other.num) {
            (FrNum::Nan, _) | (_, FrNum::Nan) => return Self::nan(prec),
            (FrNum::Infinity(s), FrNum::Infinity(t)) => {
                return if *s == (*t != negate) {
                    Self::infinity(*s, prec)
                } else {
                    Self::invalid(prec)
                };
            }
            (FrNum::Infinity(s), _) => return Self::infinity(*s, prec),
            (_, FrNum::Infinity(t)) => return Self::infinity(*t != negate, prec),
            (FrNum::Zero(s), FrNum::Zero(t)) => {
                let t = *t != negate;
                let sign = if *s == t { *s } else { ctx.rm == RoundingMode::ToNegative };
                return Self::zero(sign, prec);
            }
            (FrNum::Zero(_), FrNum::Finite(b)) => (Dyadic::zero(), b),
            (FrNum::Finite(a), FrNum::Zero(_)) => return Self::round_dyadic(a, false, ctx),
            (FrNum::Finite(a), FrNum::Finite(b)) => (a.clone(), b),
        };

        let b = if negate { b.neg() } else { b.clone() };
        let u = a.add_unrounded(&b, prec);
        if u.is_zero() {
            // an exact zero sum is positive except when rounding down
            return Self::zero(ctx.rm == RoundingMode::ToNegative, prec);
        }
        Self::round_unrounded(&u, ctx)
    }

    /// Correctly-rounded sum.
    pub fn add(&self, other: &RFloat, ctx: &RoundingContext) -> Result<RFloat> {
        require_engine("add")?;
        Ok(self.sum(other, false, ctx))
    }

    pub fn add_ui(&self, other: u64, ctx: &RoundingContext) -> Result<RFloat> {
        self.add(&RFloat::exact_ui(other), ctx)
    }

    /// Correctly-rounded difference.
    pub fn sub(&self, other: &RFloat, ctx: &RoundingContext) -> Result<RFloat> {
        require_engine("sub")?;
        Ok(self.sum(other, true, ctx))
    }

    pub fn sub_ui(&self, other: u64, ctx: &RoundingContext) -> Result<RFloat> {
        self.sub(&RFloat::exact_ui(other), ctx)
    }

    /// Computes `a - b`.
    pub fn ui_sub(a: u64, b: &RFloat, ctx: &RoundingContext) -> Result<RFloat> {
        RFloat::exact_ui(a).sub(b, ctx)
    }

    /// Correctly-rounded product. `0 * inf` is invalid.
    pub fn mul(&self, other: &RFloat, ctx: &RoundingContext) -> Result<RFloat> {
        require_engine("mul")?;
        let prec = ctx.prec;
        let sign = self.sign() != other.sign();
        Ok(match (&self.num, &other.num) {
            (FrNum::Nan, _) | (_, FrNum::Nan) => Self::nan(prec),
            (FrNum::Infinity(_), FrNum::Zero(_)) | (FrNum::Zero(_), FrNum::Infinity(_)) => {
                Self::invalid(prec)
            }
            (FrNum::Infinity(_), _) | (_, FrNum::Infinity(_)) => Self::infinity(sign, prec),
            (FrNum::Zero(_), _) | (_, FrNum::Zero(_)) => Self::zero(sign, prec),
            (FrNum::Finite(a), FrNum::Finite(b)) => {
                let top = a.top() as i128 + b.top() as i128;
                Self::round_ranged(sign, top, ctx, || a.mul(b).unrounded())
            }
        })
    }

    pub fn mul_ui(&self, other: u64, ctx: &RoundingContext) -> Result<RFloat> {
        self.mul(&RFloat::exact_ui(other), ctx)
    }

    /// Correctly-rounded quotient.
    ///
    /// `0/0` and `inf/inf` are invalid; a finite non-zero value over
    /// zero is an exact infinity that raises `div_by_zero`.
    pub fn div(&self, other: &RFloat, ctx: &RoundingContext) -> Result<RFloat> {
        require_engine("div")?;
        let prec = ctx.prec;
        let sign = self.sign() != other.sign();
        Ok(match (&self.num, &other.num) {
            (FrNum::Nan, _) | (_, FrNum::Nan) => Self::nan(prec),
            (FrNum::Infinity(_), FrNum::Infinity(_)) | (FrNum::Zero(_), FrNum::Zero(_)) => {
                Self::invalid(prec)
            }
            (FrNum::Infinity(_), _) => Self::infinity(sign, prec),
            (_, FrNum::Infinity(_)) => Self::zero(sign, prec),
            (_, FrNum::Zero(_)) => Self::pole(sign, prec),
            (FrNum::Zero(_), _) => Self::zero(sign, prec),
            (FrNum::Finite(a), FrNum::Finite(b)) => {
                let top = a.top() as i128 - b.top() as i128 - 1;
                Self::round_ranged(sign, top, ctx, || a.div_unrounded(b, prec))
            }
        })
    }

    pub fn div_ui(&self, other: u64, ctx: &RoundingContext) -> Result<RFloat> {
        self.div(&RFloat::exact_ui(other), ctx)
    }

    /// Computes `a / b`.
    pub fn ui_div(a: u64, b: &RFloat, ctx: &RoundingContext) -> Result<RFloat> {
        RFloat::exact_ui(a).div(b, ctx)
    }

    // Scales by `2^k` for a signed `k`.
    fn scale(&self, k: i128, ctx: &RoundingContext) -> RFloat {
        match &self.num {
            FrNum::Finite(d) => {
                let top = d.top() as i128 + k;
                match i64::try_from(k) {
                    Ok(k) => Self::round_ranged(d.is_neg(), top, ctx, || d.mul_2exp(k).unrounded()),
                    Err(_) => Self::beyond_range(d.is_neg(), k > 0, ctx),
                }
            }
            num => Self::from_parts(ctx.prec, num.clone(), Exceptions::default()),
        }
    }

    /// Computes `self * 2^k`.
    pub fn mul_2ui(&self, k: u64, ctx: &RoundingContext) -> Result<RFloat> {
        require_engine("mul_2ui")?;
        Ok(self.scale(k as i128, ctx))
    }

    /// Computes `self / 2^k`.
    pub fn div_2ui(&self, k: u64, ctx: &RoundingContext) -> Result<RFloat> {
        require_engine("div_2ui")?;
        Ok(self.scale(-(k as i128), ctx))
    }

    /// Negation, rounded to the precision of `ctx`.
    pub fn neg(&self, ctx: &RoundingContext) -> Result<RFloat> {
        require_engine("neg")?;
        let prec = ctx.prec;
        Ok(match &self.num {
            FrNum::Nan => Self::nan(prec),
            FrNum::Infinity(s) => Self::infinity(!s, prec),
            FrNum::Zero(s) => Self::zero(!s, prec),
            FrNum::Finite(d) => Self::round_unrounded(&d.neg().unrounded(), ctx),
        })
    }

    /// Absolute value, rounded to the precision of `ctx`.
    pub fn abs(&self, ctx: &RoundingContext) -> Result<RFloat> {
        require_engine("abs")?;
        let prec = ctx.prec;
        Ok(match &self.num {
            FrNum::Nan => Self::nan(prec),
            FrNum::Infinity(_) => Self::infinity(false, prec),
            FrNum::Zero(_) => Self::zero(false, prec),
            FrNum::Finite(d) => Self::round_unrounded(&d.abs().unrounded(), ctx),
        })
    }

    /// Correctly-rounded square root. `sqrt(-0)` is `-0` and every
    /// other negative argument is invalid.
    pub fn sqrt(&self, ctx: &RoundingContext) -> Result<RFloat> {
        require_engine("sqrt")?;
        let prec = ctx.prec;
        Ok(match &self.num {
            FrNum::Nan => Self::nan(prec),
            FrNum::Zero(s) => Self::zero(*s, prec),
            FrNum::Infinity(false) => Self::infinity(false, prec),
            FrNum::Infinity(true) => Self::invalid(prec),
            FrNum::Finite(d) if d.is_neg() => Self::invalid(prec),
            FrNum::Finite(d) => {
                let (r, ord) = d.sqrt_round(prec, ctx.rm);
                let flags = Exceptions::default().with_inexact(ord.is_ne());
                Self::from_parts(prec, FrNum::Finite(r), flags)
            }
        })
    }

    // Rounds to an integer under `rm`, then fits the result in `prec` bits.
    fn integral(&self, prec: u32, rm: RoundingMode) -> RFloat {
        let ctx = RoundingContext::new(prec).rounding_mode(rm);
        match &self.num {
            FrNum::Finite(d) => {
                // past the precision every value is an integer
                let lsb = (d.top() + 1 - prec as i64).max(0);
                let r = d.unrounded().round_at(lsb, rm);
                Self::finish(d.is_neg(), r, &ctx)
            }
            num => Self::from_parts(prec, num.clone(), Exceptions::default()),
        }
    }

    /// Rounds to an integer in the direction of `ctx`.
    pub fn rint(&self, ctx: &RoundingContext) -> Result<RFloat> {
        require_engine("rint")?;
        Ok(self.integral(ctx.prec, ctx.rm))
    }

    /// The smallest integer not below this value, at precision `prec`.
    pub fn ceil(&self, prec: u32) -> Result<RFloat> {
        require_engine("ceil")?;
        Ok(self.integral(prec, RoundingMode::ToPositive))
    }

    /// The largest integer not above this value, at precision `prec`.
    pub fn floor(&self, prec: u32) -> Result<RFloat> {
        require_engine("floor")?;
        Ok(self.integral(prec, RoundingMode::ToNegative))
    }

    pub fn trunc(&self, prec: u32) -> Result<RFloat> {
        require_engine("trunc")?;
        Ok(self.integral(prec, RoundingMode::ToZero))
    }
}
