/*
    Correctly-rounded elementary functions
*/

use std::cmp::Ordering;

use num_bigint::BigUint;
use num_traits::{One, ToPrimitive};
use tracing::debug;

use super::ball::Ball;
use super::{kernels, require_engine, Exceptions, FrNum, RFloat, RoundingContext, EXP_MAX, EXP_MIN};
use crate::dyadic::Dyadic;
use crate::round::Unrounded;
use crate::{Error, Result, RoundingMode};

/// Bits added to the target precision on the first evaluation.
const ZIV_GUARD: u32 = 32;

/// Evaluations attempted before giving up on a rounding.
const ZIV_MAX_STEPS: usize = 20;

/// Largest binary exponent of a trigonometric argument.
const REDUCTION_MAX_BITS: i64 = 1 << 16;

/// Arguments at or beyond `2^ARG_RANGE_BITS` overflow `exp`-like functions.
const ARG_RANGE_BITS: i64 = 62;

/// The correctly-rounded value enclosed by `b`, if both endpoints
/// round to the same float and raise the same exceptions.
fn settle(b: &Ball, wp: u32, ctx: &RoundingContext) -> Option<RFloat> {
    let p = wp + 8;
    let (lo, hi) = (b.lo(p), b.hi(p));
    if lo.is_zero() || hi.is_zero() || lo.is_neg() != hi.is_neg() {
        return None;
    }

    let low = RFloat::round_unrounded(&lo.unrounded(), ctx);
    let high = RFloat::round_unrounded(&hi.unrounded(), ctx);
    let flags = low.flags.with_inexact(true);
    if low.num == high.num && flags == high.flags.with_inexact(true) {
        Some(RFloat::from_parts(ctx.prec, low.num, flags))
    } else {
        None
    }
}

/// Evaluates `eval` at increasing working precisions until its
/// enclosure decides the rounding.
fn ziv<F>(op: &'static str, ctx: &RoundingContext, mut eval: F) -> Result<RFloat>
where
    F: FnMut(u32) -> Ball,
{
    let mut wp = ctx.prec.saturating_add(ZIV_GUARD);
    for _ in 0..ZIV_MAX_STEPS {
        if let Some(r) = settle(&eval(wp), wp, ctx) {
            return Ok(r);
        }
        wp = wp.saturating_add(wp / 2);
        debug!(op = op, prec = ctx.prec, wp = wp, "increasing working precision");
    }
    Err(Error::RoundingUndecided(op))
}

/// Rounds a result known to lie strictly between `anchor` and a
/// point at distance `2^bound` from it, on the side of larger
/// magnitude when `away`. Fails when the bound is too loose to
/// decide the rounding.
fn near(anchor: &Dyadic, away: bool, bound: i64, ctx: &RoundingContext) -> Option<RFloat> {
    let lsb = anchor.exp().min(anchor.top() - ctx.prec as i64 - 4);
    if bound > lsb {
        return None;
    }

    let mant = anchor.mant() << (anchor.exp() - lsb) as u64;
    let mant = if away { mant } else { mant - 1u32 };
    let u = Unrounded {
        neg: anchor.is_neg(),
        mant,
        exp: lsb,
        sticky: true,
    };
    Some(RFloat::round_unrounded(&u, ctx))
}

// Bound on `|f(x) - x|` for the odd functions tangent to the identity.
fn cubic(x: &Dyadic) -> i64 {
    x.top().saturating_add(1).saturating_mul(3)
}

fn one() -> Dyadic {
    Dyadic::one()
}

fn signed(b: Ball, neg: bool) -> Ball {
    if neg {
        b.neg()
    } else {
        b
    }
}

// `±pi/2`.
fn half_pi(op: &'static str, neg: bool, ctx: &RoundingContext) -> Result<RFloat> {
    ziv(op, ctx, |wp| signed(kernels::pi(wp).mul_2exp(-1), neg))
}

fn check_reduction(op: &'static str, x: &Dyadic) -> Result<()> {
    if x.top() > REDUCTION_MAX_BITS {
        Err(Error::RoundingUndecided(op))
    } else {
        Ok(())
    }
}

impl RFloat {
    fn is_one(&self) -> bool {
        matches!(&self.num, FrNum::Finite(d) if *d == one())
    }

    fn exact_sign_one(neg: bool, prec: u32) -> Self {
        RFloat::from_parts(prec, FrNum::Finite(one().with_sign(neg)), Exceptions::default())
    }

    /// `pi` rounded under `ctx`.
    pub fn pi(ctx: &RoundingContext) -> Result<RFloat> {
        require_engine("pi")?;
        ziv("pi", ctx, kernels::pi)
    }

    /// `ln(2)` rounded under `ctx`.
    pub fn ln2(ctx: &RoundingContext) -> Result<RFloat> {
        require_engine("ln2")?;
        ziv("ln2", ctx, kernels::ln2)
    }

    pub fn exp(&self, ctx: &RoundingContext) -> Result<RFloat> {
        require_engine("exp")?;
        let x = match &self.num {
            FrNum::Nan => return Ok(Self::nan(ctx.prec)),
            FrNum::Infinity(false) => return Ok(Self::infinity(false, ctx.prec)),
            FrNum::Infinity(true) => return Ok(Self::zero(false, ctx.prec)),
            FrNum::Zero(_) => return Ok(Self::one(ctx.prec)),
            FrNum::Finite(x) => x,
        };

        if let Some(r) = near(&one(), !x.is_neg(), x.top().saturating_add(2), ctx) {
            return Ok(r);
        }
        let xb = Ball::exact(x.clone());
        ziv("exp", ctx, |wp| kernels::exp(&xb, wp))
    }

    /// `2^self`; exact for integers.
    pub fn exp2(&self, ctx: &RoundingContext) -> Result<RFloat> {
        require_engine("exp2")?;
        let x = match &self.num {
            FrNum::Nan => return Ok(Self::nan(ctx.prec)),
            FrNum::Infinity(false) => return Ok(Self::infinity(false, ctx.prec)),
            FrNum::Infinity(true) => return Ok(Self::zero(false, ctx.prec)),
            FrNum::Zero(_) => return Ok(Self::one(ctx.prec)),
            FrNum::Finite(x) => x,
        };

        if x.top() >= ARG_RANGE_BITS {
            return Ok(Self::beyond_range(false, !x.is_neg(), ctx));
        }
        if x.is_integer() {
            let n = x.to_bigint(RoundingMode::ToZero).to_i64().unwrap_or(0);
            let exact = || Unrounded::exact(false, BigUint::one(), n);
            return Ok(Self::round_ranged(false, n as i128, ctx, exact));
        }
        if let Some(r) = near(&one(), !x.is_neg(), x.top().saturating_add(1), ctx) {
            return Ok(r);
        }

        // an absolute error of `2^-wp` in `x ln(2)` is a relative one in the result
        let extra = (x.top().max(0) + 2) as u32;
        let xb = Ball::exact(x.clone());
        ziv("exp2", ctx, |wp| {
            let q = wp + extra;
            kernels::exp(&kernels::ln2(q).mul(&xb, q), wp)
        })
    }

    /// Natural logarithm.
    pub fn ln(&self, ctx: &RoundingContext) -> Result<RFloat> {
        require_engine("ln")?;
        let x = match &self.num {
            FrNum::Nan => return Ok(Self::nan(ctx.prec)),
            FrNum::Infinity(true) => return Ok(Self::invalid(ctx.prec)),
            FrNum::Infinity(false) => return Ok(Self::infinity(false, ctx.prec)),
            FrNum::Zero(_) => return Ok(Self::pole(true, ctx.prec)),
            FrNum::Finite(x) if x.is_neg() => return Ok(Self::invalid(ctx.prec)),
            FrNum::Finite(x) => x,
        };

        if *x == one() {
            return Ok(Self::zero(false, ctx.prec));
        }
        if x.top() == 0 || x.top() == -1 {
            // ln(1 + t) lies between t - t^2 and t
            let t = x.sub(&one());
            let bound = t.top().saturating_add(1).saturating_mul(2);
            if let Some(r) = near(&t, t.is_neg(), bound, ctx) {
                return Ok(r);
            }
        }
        ziv("ln", ctx, |wp| kernels::ln(x, wp))
    }

    pub fn sin(&self, ctx: &RoundingContext) -> Result<RFloat> {
        require_engine("sin")?;
        let x = match &self.num {
            FrNum::Nan => return Ok(Self::nan(ctx.prec)),
            FrNum::Infinity(_) => return Ok(Self::invalid(ctx.prec)),
            FrNum::Zero(s) => return Ok(Self::zero(*s, ctx.prec)),
            FrNum::Finite(x) => x,
        };

        if let Some(r) = near(x, false, cubic(x), ctx) {
            return Ok(r);
        }
        check_reduction("sin", x)?;
        ziv("sin", ctx, |wp| kernels::sin_cos(x, wp).0)
    }

    pub fn cos(&self, ctx: &RoundingContext) -> Result<RFloat> {
        require_engine("cos")?;
        let x = match &self.num {
            FrNum::Nan => return Ok(Self::nan(ctx.prec)),
            FrNum::Infinity(_) => return Ok(Self::invalid(ctx.prec)),
            FrNum::Zero(_) => return Ok(Self::one(ctx.prec)),
            FrNum::Finite(x) => x,
        };

        // 1 - cos(x) < x^2 / 2
        let bound = x.top().saturating_mul(2).saturating_add(1);
        if let Some(r) = near(&one(), false, bound, ctx) {
            return Ok(r);
        }
        check_reduction("cos", x)?;
        ziv("cos", ctx, |wp| kernels::sin_cos(x, wp).1)
    }

    pub fn tan(&self, ctx: &RoundingContext) -> Result<RFloat> {
        require_engine("tan")?;
        let x = match &self.num {
            FrNum::Nan => return Ok(Self::nan(ctx.prec)),
            FrNum::Infinity(_) => return Ok(Self::invalid(ctx.prec)),
            FrNum::Zero(s) => return Ok(Self::zero(*s, ctx.prec)),
            FrNum::Finite(x) => x,
        };

        if let Some(r) = near(x, true, cubic(x), ctx) {
            return Ok(r);
        }
        check_reduction("tan", x)?;
        ziv("tan", ctx, |wp| {
            let (s, c) = kernels::sin_cos(x, wp);
            s.div(&c, wp)
        })
    }

    /// Arcsine; arguments outside `[-1, 1]` are invalid.
    pub fn asin(&self, ctx: &RoundingContext) -> Result<RFloat> {
        require_engine("asin")?;
        let x = match &self.num {
            FrNum::Nan => return Ok(Self::nan(ctx.prec)),
            FrNum::Infinity(_) => return Ok(Self::invalid(ctx.prec)),
            FrNum::Zero(s) => return Ok(Self::zero(*s, ctx.prec)),
            FrNum::Finite(x) => x,
        };

        match x.cmp_abs(&one()) {
            Ordering::Greater => return Ok(Self::invalid(ctx.prec)),
            Ordering::Equal => return half_pi("asin", x.is_neg(), ctx),
            Ordering::Less => {}
        }
        if let Some(r) = near(x, true, cubic(x), ctx) {
            return Ok(r);
        }

        // asin(x) = atan(x / sqrt(1 - x^2))
        let xb = Ball::exact(x.clone());
        let d = Ball::exact(one().sub(&x.mul(x)));
        ziv("asin", ctx, |wp| {
            let p = wp + 16;
            kernels::atan(&xb.div(&d.sqrt(p), p), wp)
        })
    }

    /// Arccosine; arguments outside `[-1, 1]` are invalid.
    pub fn acos(&self, ctx: &RoundingContext) -> Result<RFloat> {
        require_engine("acos")?;
        let x = match &self.num {
            FrNum::Nan => return Ok(Self::nan(ctx.prec)),
            FrNum::Infinity(_) => return Ok(Self::invalid(ctx.prec)),
            FrNum::Zero(_) => return half_pi("acos", false, ctx),
            FrNum::Finite(x) => x,
        };

        if x.cmp_abs(&one()).is_gt() {
            return Ok(Self::invalid(ctx.prec));
        } else if *x == one() {
            return Ok(Self::zero(false, ctx.prec));
        } else if *x == one().neg() {
            return ziv("acos", ctx, kernels::pi);
        }

        // acos(x) = 2 atan(sqrt((1 - x) / (1 + x)))
        let num = Ball::exact(one().sub(x));
        let den = Ball::exact(one().add(x));
        ziv("acos", ctx, |wp| {
            let p = wp + 16;
            kernels::atan(&num.div(&den, p).sqrt(p), wp).mul_2exp(1)
        })
    }

    pub fn atan(&self, ctx: &RoundingContext) -> Result<RFloat> {
        require_engine("atan")?;
        let x = match &self.num {
            FrNum::Nan => return Ok(Self::nan(ctx.prec)),
            FrNum::Infinity(s) => return half_pi("atan", *s, ctx),
            FrNum::Zero(s) => return Ok(Self::zero(*s, ctx.prec)),
            FrNum::Finite(x) => x,
        };

        if let Some(r) = near(x, false, cubic(x), ctx) {
            return Ok(r);
        }
        let xb = Ball::exact(x.clone());
        ziv("atan", ctx, |wp| kernels::atan(&xb, wp))
    }

    pub fn sinh(&self, ctx: &RoundingContext) -> Result<RFloat> {
        require_engine("sinh")?;
        let x = match &self.num {
            FrNum::Nan => return Ok(Self::nan(ctx.prec)),
            FrNum::Infinity(s) => return Ok(Self::infinity(*s, ctx.prec)),
            FrNum::Zero(s) => return Ok(Self::zero(*s, ctx.prec)),
            FrNum::Finite(x) => x,
        };

        if let Some(r) = near(x, true, cubic(x), ctx) {
            return Ok(r);
        } else if x.top() >= ARG_RANGE_BITS {
            return Ok(Self::beyond_range(x.is_neg(), true, ctx));
        }

        let a = Ball::exact(x.abs());
        let unit = Ball::exact(one());
        ziv("sinh", ctx, |wp| {
            let p = wp + 16;
            let s = if x.top() < 0 {
                // (e + e / (1 + e)) / 2 with e = expm1(|x|)
                let e = kernels::expm1(&a, p);
                e.add(&e.div(&unit.add(&e, p), p), p)
            } else {
                let e = kernels::exp(&a, p);
                e.sub(&unit.div(&e, p), p)
            };
            signed(s.mul_2exp(-1), x.is_neg())
        })
    }

    pub fn cosh(&self, ctx: &RoundingContext) -> Result<RFloat> {
        require_engine("cosh")?;
        let x = match &self.num {
            FrNum::Nan => return Ok(Self::nan(ctx.prec)),
            FrNum::Infinity(_) => return Ok(Self::infinity(false, ctx.prec)),
            FrNum::Zero(_) => return Ok(Self::one(ctx.prec)),
            FrNum::Finite(x) => x,
        };

        // cosh(x) - 1 < x^2
        let bound = x.top().saturating_add(1).saturating_mul(2);
        if let Some(r) = near(&one(), true, bound, ctx) {
            return Ok(r);
        } else if x.top() >= ARG_RANGE_BITS {
            return Ok(Self::beyond_range(false, true, ctx));
        }

        let a = Ball::exact(x.abs());
        let unit = Ball::exact(one());
        ziv("cosh", ctx, |wp| {
            let p = wp + 16;
            let e = kernels::exp(&a, p);
            e.add(&unit.div(&e, p), p).mul_2exp(-1)
        })
    }

    pub fn tanh(&self, ctx: &RoundingContext) -> Result<RFloat> {
        require_engine("tanh")?;
        let x = match &self.num {
            FrNum::Nan => return Ok(Self::nan(ctx.prec)),
            FrNum::Infinity(s) => return Ok(Self::exact_sign_one(*s, ctx.prec)),
            FrNum::Zero(s) => return Ok(Self::zero(*s, ctx.prec)),
            FrNum::Finite(x) => x,
        };

        if let Some(r) = near(x, false, cubic(x), ctx) {
            return Ok(r);
        }

        // 1 - tanh(t) < 2^(1 - 2t) for t > 0
        let t = ctx.prec as i64 / 2 + 8;
        if x.abs() >= Dyadic::from_i64(t) {
            let anchor = one().with_sign(x.is_neg());
            if let Some(r) = near(&anchor, false, 1 - 2 * t, ctx) {
                return Ok(r);
            }
        }

        let a = Ball::exact(x.abs());
        let two = Ball::exact(Dyadic::from_i64(2));
        let unit = Ball::exact(one());
        ziv("tanh", ctx, |wp| {
            let p = wp + 16;
            let r = if x.top() < -1 {
                // e / (e + 2) with e = expm1(2|x|)
                let e = kernels::expm1(&a.mul_2exp(1), p);
                e.div(&e.add(&two, p), p)
            } else {
                let e = kernels::exp(&a.mul_2exp(1), p);
                e.sub(&unit, p).div(&e.add(&unit, p), p)
            };
            signed(r, x.is_neg())
        })
    }

    pub fn asinh(&self, ctx: &RoundingContext) -> Result<RFloat> {
        require_engine("asinh")?;
        let x = match &self.num {
            FrNum::Nan => return Ok(Self::nan(ctx.prec)),
            FrNum::Infinity(s) => return Ok(Self::infinity(*s, ctx.prec)),
            FrNum::Zero(s) => return Ok(Self::zero(*s, ctx.prec)),
            FrNum::Finite(x) => x,
        };

        if let Some(r) = near(x, false, cubic(x), ctx) {
            return Ok(r);
        }

        let ax = x.abs();
        let a = Ball::exact(ax.clone());
        let unit = Ball::exact(one());
        ziv("asinh", ctx, |wp| {
            let p = wp + 16;
            let r = if x.top() <= -2 {
                // asinh(a) = atanh(a / sqrt(1 + a^2))
                let s = unit.add(&a.mul(&a, p), p).sqrt(p);
                kernels::atanh_series(&a.div(&s, p), wp)
            } else if x.top() > wp as i64 {
                // asinh(a) - ln(2a) < 1 / (4a^2)
                kernels::ln(&ax.mul_2exp(1), wp).add_error(&pow2(-2 * wp as i64))
            } else {
                let s = a.mul(&a, p).add(&unit, p).sqrt(p);
                kernels::ln_ball(&a.add(&s, p), wp)
            };
            signed(r, x.is_neg())
        })
    }

    /// Inverse hyperbolic cosine; arguments below one are invalid.
    pub fn acosh(&self, ctx: &RoundingContext) -> Result<RFloat> {
        require_engine("acosh")?;
        let x = match &self.num {
            FrNum::Nan => return Ok(Self::nan(ctx.prec)),
            FrNum::Infinity(false) => return Ok(Self::infinity(false, ctx.prec)),
            FrNum::Infinity(true) | FrNum::Zero(_) => return Ok(Self::invalid(ctx.prec)),
            FrNum::Finite(x) => x,
        };

        if *x < one() {
            return Ok(Self::invalid(ctx.prec));
        } else if *x == one() {
            return Ok(Self::zero(false, ctx.prec));
        }

        let xb = Ball::exact(x.clone());
        let near_one = x.top() == 0 && x.mul(x).mul(&Dyadic::from_i64(3)) <= Dyadic::from_i64(4);
        ziv("acosh", ctx, |wp| {
            let p = wp + 16;
            if near_one {
                // acosh(x) = atanh(sqrt(x^2 - 1) / x)
                let s = Ball::exact(x.mul(x).sub(&one())).sqrt(p);
                kernels::atanh_series(&s.div(&xb, p), wp)
            } else if x.top() > wp as i64 {
                // ln(2x) - acosh(x) < 1 / x^2
                kernels::ln(&x.mul_2exp(1), wp).add_error(&pow2(-2 * wp as i64))
            } else {
                let s = Ball::exact(x.mul(x).sub(&one())).sqrt(p);
                kernels::ln_ball(&xb.add(&s, p), wp)
            }
        })
    }

    /// Inverse hyperbolic tangent; `±1` are poles and arguments
    /// beyond them are invalid.
    pub fn atanh(&self, ctx: &RoundingContext) -> Result<RFloat> {
        require_engine("atanh")?;
        let x = match &self.num {
            FrNum::Nan => return Ok(Self::nan(ctx.prec)),
            FrNum::Infinity(_) => return Ok(Self::invalid(ctx.prec)),
            FrNum::Zero(s) => return Ok(Self::zero(*s, ctx.prec)),
            FrNum::Finite(x) => x,
        };

        match x.cmp_abs(&one()) {
            Ordering::Greater => return Ok(Self::invalid(ctx.prec)),
            Ordering::Equal => return Ok(Self::pole(x.is_neg(), ctx.prec)),
            Ordering::Less => {}
        }
        if let Some(r) = near(x, true, cubic(x), ctx) {
            return Ok(r);
        }

        let xb = Ball::exact(x.clone());
        let (up, down) = (one().add(x), one().sub(x));
        ziv("atanh", ctx, |wp| {
            if x.top() <= -2 {
                kernels::atanh_series(&xb, wp)
            } else {
                // (ln(1 + x) - ln(1 - x)) / 2, both terms of opposite signs
                let p = wp + 16;
                kernels::ln(&up, p).sub(&kernels::ln(&down, p), p).mul_2exp(-1)
            }
        })
    }

    /// `self^y`.
    ///
    /// Special values follow IEEE-754 `pow`: `x^±0` and `1^y` are one even
    /// for NaN, a negative base needs an integer exponent, and a zero base
    /// with a negative exponent is a pole. Exact powers are detected and
    /// rounded once.
    pub fn pow(&self, y: &RFloat, ctx: &RoundingContext) -> Result<RFloat> {
        require_engine("pow")?;
        let prec = ctx.prec;
        if y.is_zero() || self.is_one() {
            return Ok(Self::one(prec));
        }

        // an odd integer exponent carries the sign of the base
        let odd = matches!(&y.num, FrNum::Finite(d) if d.is_integer() && d.exp() == 0);
        match (&self.num, &y.num) {
            (FrNum::Nan, _) | (_, FrNum::Nan) => Ok(Self::nan(prec)),
            (x, FrNum::Infinity(yneg)) => {
                let cmp = match x {
                    FrNum::Zero(_) => Ordering::Less,
                    FrNum::Finite(x) => x.cmp_abs(&one()),
                    _ => Ordering::Greater,
                };
                Ok(match (cmp, *yneg) {
                    (Ordering::Equal, _) => Self::one(prec),
                    (Ordering::Greater, false) | (Ordering::Less, true) => {
                        Self::infinity(false, prec)
                    }
                    _ => Self::zero(false, prec),
                })
            }
            (FrNum::Infinity(xneg), FrNum::Finite(y)) => {
                let neg = *xneg && odd;
                Ok(if y.is_neg() {
                    Self::zero(neg, prec)
                } else {
                    Self::infinity(neg, prec)
                })
            }
            (FrNum::Zero(xneg), FrNum::Finite(y)) => {
                let neg = *xneg && odd;
                Ok(if y.is_neg() {
                    Self::pole(neg, prec)
                } else {
                    Self::zero(neg, prec)
                })
            }
            (FrNum::Finite(x), FrNum::Finite(y)) => {
                if x.is_neg() && !y.is_integer() {
                    return Ok(Self::invalid(prec));
                }
                pow_finite(&x.abs(), y, x.is_neg() && odd, ctx)
            }
            (_, FrNum::Zero(_)) => Ok(Self::one(prec)),
        }
    }

    /// `a^y` for a machine integer `a`.
    pub fn ui_pow(a: u64, y: &RFloat, ctx: &RoundingContext) -> Result<RFloat> {
        RFloat::exact_ui(a).pow(y, ctx)
    }
}

fn pow2(k: i64) -> Dyadic {
    Dyadic::new(false, BigUint::one(), k)
}

// `|x|^y` for finite non-zero `|x| != 1` and `y`, negated when `neg`.
fn pow_finite(ax: &Dyadic, y: &Dyadic, neg: bool, ctx: &RoundingContext) -> Result<RFloat> {
    if let Some(r) = pow_exact(ax, y, neg, ctx) {
        return Ok(r);
    }

    // y ln|x| decides the scale of the result
    let yb = Ball::exact(y.clone());
    let scale = kernels::ln(ax, 70).mul(&yb, 70);
    let limit = pow2(ARG_RANGE_BITS);
    if scale.lo(64) >= limit {
        return Ok(RFloat::beyond_range(neg, true, ctx));
    } else if scale.hi(64) <= limit.neg() {
        return Ok(RFloat::beyond_range(neg, false, ctx));
    }

    let extra = (scale.mid().top().max(0) + 2) as u32;
    ziv("pow", ctx, |wp| {
        let q = wp + extra;
        let e = kernels::exp(&kernels::ln(ax, q).mul(&yb, q), wp);
        signed(e, neg)
    })
}

// `|x|^y` when it is cheap to get exactly, rounded once.
fn pow_exact(ax: &Dyadic, y: &Dyadic, neg: bool, ctx: &RoundingContext) -> Option<RFloat> {
    if ax.mant().is_one() {
        // 2^(e y) is a float iff `e y` is an integer
        let ey = y.mul(&Dyadic::from_i64(ax.exp()));
        if !ey.is_integer() {
            return None;
        } else if ey.top() >= 63 {
            return Some(RFloat::beyond_range(neg, !ey.is_neg(), ctx));
        }
        let n = ey.to_bigint(RoundingMode::ToZero).to_i64()?;
        let exact = || Unrounded::exact(neg, BigUint::one(), n);
        return Some(RFloat::round_ranged(neg, n as i128, ctx, exact));
    }

    if !y.is_integer() {
        // x^(m / 2^k) = (x^(1 / 2^k))^m
        let k = -y.exp();
        if k > 64 {
            return None;
        }
        let mut r = ax.clone();
        for _ in 0..k {
            r = r.sqrt_exact()?;
        }
        return pow_exact(&r, &y.mul_2exp(k), neg, ctx);
    }

    let n = y.to_bigint(RoundingMode::ToZero).to_i64()?.unsigned_abs();
    if (ax.bits() as u128) * (n as u128) > 4 * ctx.prec as u128 + 256 {
        return None;
    }

    // |x|^n lies in [2^(n t), 2^(n (t + 1)))
    let t = ax.top() as i128;
    let (lo, hi) = (n as i128 * t, n as i128 * (t + 1));
    let (lo, hi) = if y.is_neg() { (-hi, -lo) } else { (lo, hi) };
    if lo >= EXP_MAX as i128 {
        return Some(RFloat::beyond_range(neg, true, ctx));
    } else if hi + 4 <= EXP_MIN as i128 {
        return Some(RFloat::beyond_range(neg, false, ctx));
    }

    let mut acc = Dyadic::one();
    let mut base = ax.clone();
    let mut e = n;
    while e > 0 {
        if e & 1 == 1 {
            acc = acc.mul(&base);
        }
        e >>= 1;
        if e > 0 {
            base = base.mul(&base);
        }
    }

    let u = if y.is_neg() {
        Dyadic::one().div_unrounded(&acc, ctx.prec)
    } else {
        acc.unrounded()
    };
    let u = Unrounded { neg, ..u };
    Some(RFloat::round_unrounded(&u, ctx))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(prec: u32) -> RoundingContext {
        RoundingContext::new(prec)
    }

    fn f(x: f64) -> RFloat {
        RFloat::from_f64(x, &ctx(53)).unwrap()
    }

    #[test]
    fn tiny_arguments_take_the_shortcut() {
        let x = RFloat::from_f64(1e-30, &ctx(53)).unwrap();
        let s = x.sin(&RoundingContext::new(53).rounding_mode(RoundingMode::ToZero)).unwrap();
        assert!(s < x);
        assert!(s.flags().inexact());
        let s = x.sin(&ctx(53)).unwrap();
        assert!(s.is_identical(&x));
        let t = x.tan(&RoundingContext::new(53).rounding_mode(RoundingMode::ToPositive)).unwrap();
        assert!(t > x);
    }

    #[test]
    fn settles_on_doubles() {
        let c = ctx(53);
        assert_eq!(f(1.0).exp(&c).unwrap().to_f64(RoundingMode::NearestEven).unwrap(), std::f64::consts::E);
        assert_eq!(RFloat::pi(&c).unwrap().to_f64(RoundingMode::NearestEven).unwrap(), std::f64::consts::PI);
        assert_eq!(f(2.0).ln(&c).unwrap().to_f64(RoundingMode::NearestEven).unwrap(), std::f64::consts::LN_2);
    }

    #[test]
    fn exact_powers() {
        let c = ctx(53);
        let r = f(3.0).pow(&f(4.0), &c).unwrap();
        assert_eq!(r.to_f64(RoundingMode::NearestEven).unwrap(), 81.0);
        assert!(!r.flags().inexact());
        let r = f(0.25).pow(&f(-1.5), &c).unwrap();
        assert_eq!(r.to_f64(RoundingMode::NearestEven).unwrap(), 8.0);
        let r = f(9.0).pow(&f(0.5), &c).unwrap();
        assert_eq!(r.to_f64(RoundingMode::NearestEven).unwrap(), 3.0);
        assert!(!r.flags().inexact());
    }
}
