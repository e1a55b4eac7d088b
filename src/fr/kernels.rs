/*
    Series kernels of the elementary functions
*/

use num_bigint::{BigInt, BigUint};
use num_integer::{Integer as _, Roots};
use num_traits::{One, Signed, ToPrimitive, Zero};

use super::ball::Ball;
use super::out_of_range;
use crate::dyadic::Dyadic;
use crate::RoundingMode;

/// Extra bits carried by every kernel above the requested precision.
const GUARD: u32 = 16;

/// Arguments of `exp` at or above this magnitude leave the exponent range.
const EXP_ARG_MAX: i64 = 62;

fn bitlen(n: u64) -> u32 {
    64 - n.leading_zeros()
}

// `2^k` for a signed exponent.
fn pow2(k: i64) -> Dyadic {
    Dyadic::new(false, BigUint::one(), k)
}

// Returns true once `t` no longer affects `s` at `p` bits.
fn negligible(t: &Ball, s: &Ball, p: u32) -> bool {
    let t = t.upper();
    t.is_zero() || s.mid().is_zero() || t.top() < s.mid().top() - p as i64 - 1
}

/// `atan(1/n)`, or `atanh(1/n)` when `hyperbolic`, for an integer `n >= 2`.
pub(crate) fn arctan_recip(n: u64, wp: u32, hyperbolic: bool) -> Ball {
    debug_assert!(n >= 2);
    let f = wp + GUARD + bitlen(wp as u64);
    let n2 = BigInt::from(n) * n;

    // fixed point with `f` fractional bits; each step truncates
    let mut t = (BigInt::one() << f) / n;
    let mut sum = t.clone();
    let mut k = 0u64;
    while !t.is_zero() {
        t /= &n2;
        k += 1;
        let term = &t / (2 * k + 1);
        if hyperbolic || k.is_even() {
            sum += term;
        } else {
            sum -= term;
        }
    }

    let err = Dyadic::new(false, BigUint::from(3 * k + 9), -(f as i64));
    let mid = Dyadic::new(sum.is_negative(), sum.magnitude().clone(), -(f as i64));
    Ball::with_error(mid, &err)
}

/// `pi`, from Machin's formula.
pub(crate) fn pi(wp: u32) -> Ball {
    let p = wp + 4;
    let a = arctan_recip(5, p, false).mul_2exp(4);
    let b = arctan_recip(239, p, false).mul_2exp(2);
    a.sub(&b, p)
}

/// `ln(2) = 2 atanh(1/3)`.
pub(crate) fn ln2(wp: u32) -> Ball {
    arctan_recip(3, wp + 1, true).mul_2exp(1)
}

// Nearest integer to `x / c`, for a positive constant `c`.
fn nearest_multiple(x: &Dyadic, c: &Ball) -> BigInt {
    let p = (x.top().max(0) as u32) + 2 * GUARD;
    let (q, _) = x.div_round(c.mid(), p, RoundingMode::NearestEven);
    q.to_bigint(RoundingMode::NearestEven)
}

/// `exp(x)`.
///
/// Arguments beyond the exponent range come back as exact balls
/// outside of it, so rounding them overflows or underflows.
pub(crate) fn exp(x: &Ball, wp: u32) -> Ball {
    if x.is_exact() && x.mid().is_zero() {
        return Ball::exact(Dyadic::one());
    }

    let limit = pow2(EXP_ARG_MAX);
    if x.lo(64) >= limit {
        return Ball::exact(out_of_range(false, true));
    } else if x.hi(64) <= limit.neg() {
        return Ball::exact(out_of_range(false, false));
    } else if x.mid().cmp_abs(&limit).is_ge() {
        return Ball::undecided();
    }

    // x = k ln(2) + r
    let sq = wp.sqrt() / 2 + 1;
    let p = wp + sq + GUARD + bitlen(wp as u64);
    let k = nearest_multiple(x.mid(), &ln2(64));
    let kbits = k.bits() as u32;
    let r = if k.is_zero() {
        x.clone()
    } else {
        let kln2 = ln2(p + kbits).mul(&Ball::exact(Dyadic::from_bigint(&k)), p + kbits);
        x.sub(&kln2, p)
    };

    let r = r.mul_2exp(-(sq as i64));
    if r.upper() > pow2(-1) {
        return Ball::undecided();
    }

    // Taylor series; with |r| <= 1/2 the tail is below the last term
    let mut sum = Ball::exact(Dyadic::one());
    let mut term = Ball::exact(Dyadic::one());
    for n in 1u64.. {
        term = term.mul(&r, p).div_ui(n, p);
        sum = sum.add(&term, p);
        if negligible(&term, &sum, p) {
            break;
        }
    }
    let mut sum = sum.add_error(&term.upper());

    for _ in 0..sq {
        sum = sum.mul(&sum, p);
    }

    match k.to_i64() {
        Some(k) => sum.mul_2exp(k),
        None => Ball::undecided(),
    }
}

/// `exp(x) - 1` for `|x| < 1`, without cancellation.
pub(crate) fn expm1(x: &Ball, wp: u32) -> Ball {
    debug_assert!(x.upper() < Dyadic::one());
    let p = wp + GUARD;
    let mut term = x.clone();
    let mut sum = x.clone();
    for n in 2u64.. {
        term = term.mul(x, p).div_ui(n, p);
        sum = sum.add(&term, p);
        if negligible(&term, &sum, p) {
            break;
        }
    }
    sum.add_error(&term.upper().mul_2exp(1))
}

/// `atanh(z)` for `|z| <= 1/2`.
pub(crate) fn atanh_series(z: &Ball, wp: u32) -> Ball {
    debug_assert!(z.upper() <= pow2(-1));
    if z.is_exact() && z.mid().is_zero() {
        return z.clone();
    }

    let p = wp + GUARD;
    let z2 = z.mul(z, p);
    let mut power = z.clone();
    let mut sum = z.clone();
    for k in 1u64.. {
        power = power.mul(&z2, p);
        sum = sum.add(&power.div_ui(2 * k + 1, p), p);
        if negligible(&power, &sum, p) {
            break;
        }
    }
    sum.add_error(&power.upper())
}

/// `ln(x)` for an exact `x > 0`, `x != 1`.
pub(crate) fn ln(x: &Dyadic, wp: u32) -> Ball {
    debug_assert!(x.signum() > 0 && *x != Dyadic::one());

    // x = m 2^e with m in [1/sqrt(2), sqrt(2))
    let mut e = x.top();
    let mut m = x.mul_2exp(-e);
    if m.mul(&m) >= pow2(1) {
        e += 1;
        m = m.mul_2exp(-1);
    }

    let p = wp + GUARD + bitlen(e.unsigned_abs());
    let one = Dyadic::one();
    let z = Ball::exact(m.sub(&one)).div(&Ball::exact(m.add(&one)), p);
    let lnm = atanh_series(&z, p).mul_2exp(1);
    if e == 0 {
        return lnm;
    }

    let eln2 = ln2(p).mul(&Ball::exact(Dyadic::from_i64(e)), p);
    eln2.add(&lnm, p)
}

/// `ln(x)` over a ball of positive values.
pub(crate) fn ln_ball(x: &Ball, wp: u32) -> Ball {
    let rel = match x.rel_rad() {
        Some(rel) if !x.mid().is_neg() => rel,
        _ => return Ball::undecided(),
    };

    // |ln(a) - ln(a')| <= |a - a'| / min(a, a')
    if *x.mid() == Dyadic::one() {
        Ball::with_error(Dyadic::zero(), &rel)
    } else {
        ln(x.mid(), wp).add_error(&rel)
    }
}

/// `(sin(x), cos(x))` for an exact `x`.
pub(crate) fn sin_cos(x: &Dyadic, wp: u32) -> (Ball, Ball) {
    let one = Ball::exact(Dyadic::one());
    if x.is_zero() {
        return (Ball::exact(Dyadic::zero()), one);
    }

    // x = k pi/2 + r
    let p0 = wp + GUARD + bitlen(wp as u64);
    let xb = Ball::exact(x.clone());
    let (k, r) = if x.top() < 0 {
        (BigInt::zero(), xb)
    } else {
        let k = nearest_multiple(x, &pi(x.top() as u32 + 64).mul_2exp(-1));
        let p = p0 + k.bits() as u32;
        let kpi = pi(p).mul_2exp(-1).mul(&Ball::exact(Dyadic::from_bigint(&k)), p);
        (k, xb.sub(&kpi, p))
    };
    if r.contains_zero() {
        return (Ball::undecided(), Ball::undecided());
    }

    // alternating series, terms shrink once past the first
    let p = p0;
    let r2 = r.mul(&r, p);
    let mut sin_term = r.clone();
    let mut sin = r.clone();
    for n in 1u64.. {
        sin_term = sin_term.mul(&r2, p).div_ui((2 * n) * (2 * n + 1), p).neg();
        sin = sin.add(&sin_term, p);
        if negligible(&sin_term, &sin, p) {
            break;
        }
    }
    let sin = sin.add_error(&sin_term.upper());

    let mut cos_term = one.clone();
    let mut cos = one;
    for n in 1u64.. {
        cos_term = cos_term.mul(&r2, p).div_ui((2 * n - 1) * (2 * n), p).neg();
        cos = cos.add(&cos_term, p);
        if negligible(&cos_term, &cos, p) {
            break;
        }
    }
    let cos = cos.add_error(&cos_term.upper());

    let quadrant = k.mod_floor(&BigInt::from(4)).to_u32().unwrap_or(0);
    match quadrant {
        0 => (sin, cos),
        1 => (cos, sin.neg()),
        2 => (sin.neg(), cos.neg()),
        _ => (cos.neg(), sin),
    }
}

/// `atan(x)`.
pub(crate) fn atan(x: &Ball, wp: u32) -> Ball {
    if x.is_exact() && x.mid().is_zero() {
        return x.clone();
    }

    let p = wp + GUARD + bitlen(wp as u64);
    let neg = x.mid().is_neg();
    let lower = match x.lower() {
        Some(lower) => lower,
        None => return Ball::undecided(),
    };

    if lower.top() > p as i64 + 2 {
        // atan(x) = sign(x) pi/2 - atan(1/x) with |atan(1/x)| <= 1/|x|
        let half_pi = pi(p).mul_2exp(-1).add_error(&pow2(-lower.top()));
        return if neg { half_pi.neg() } else { half_pi };
    }

    if x.mid().cmp_abs(&Dyadic::one()).is_gt() {
        let half_pi = pi(p).mul_2exp(-1);
        let half_pi = if neg { half_pi.neg() } else { half_pi };
        let inv = Ball::exact(Dyadic::one()).div(x, p);
        return half_pi.sub(&atan(&inv, wp), p);
    }

    // atan(y) = 2 atan(y / (1 + sqrt(1 + y^2)))
    let one = Ball::exact(Dyadic::one());
    let mut y = x.clone();
    let mut halvings = 0;
    while y.upper() >= pow2(-5) {
        let s = one.add(&y.mul(&y, p), p).sqrt(p);
        y = y.div(&one.add(&s, p), p);
        halvings += 1;
    }

    let y2 = y.mul(&y, p);
    let mut power = y.clone();
    let mut sum = y.clone();
    for k in 1u64.. {
        power = power.mul(&y2, p).neg();
        sum = sum.add(&power.div_ui(2 * k + 1, p), p);
        if negligible(&power, &sum, p) {
            break;
        }
    }
    sum.add_error(&power.upper()).mul_2exp(halvings)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(f: f64) -> Dyadic {
        Dyadic::from_f64(f).unwrap()
    }

    fn close(b: &Ball, x: f64) -> bool {
        let mid = b.mid().to_f64(RoundingMode::NearestEven).0;
        let rad = b.rad().to_f64(RoundingMode::NearestEven).0;
        (mid - x).abs() <= 1e-15 * x.abs().max(1e-300) && rad < 1e-20 * x.abs().max(1e-300)
    }

    #[test]
    fn constants() {
        assert!(close(&pi(100), std::f64::consts::PI));
        assert!(close(&ln2(100), std::f64::consts::LN_2));
        let p = pi(2000);
        assert!(p.rad().top() < -1990);
    }

    #[test]
    fn exponential() {
        assert!(close(&exp(&Ball::exact(d(1.0)), 80), std::f64::consts::E));
        assert!(close(&exp(&Ball::exact(d(-20.5)), 80), (-20.5f64).exp()));
        assert!(close(&expm1(&Ball::exact(d(1e-10)), 80), 1e-10f64.exp_m1()));
        let huge = exp(&Ball::exact(pow2(63)), 80);
        assert_eq!(huge.mid(), &out_of_range(false, true));
    }

    #[test]
    fn logarithm() {
        assert!(close(&ln(&d(10.0), 80), 10f64.ln()));
        assert!(close(&ln(&d(0.75), 80), 0.75f64.ln()));
        assert!(close(&ln(&d(1.0 + 1.0 / 1024.0), 80), (1.0f64 / 1024.0).ln_1p()));
    }

    #[test]
    fn trigonometric() {
        let (s, c) = sin_cos(&d(1.0), 80);
        assert!(close(&s, 1f64.sin()) && close(&c, 1f64.cos()));
        let (s, c) = sin_cos(&d(-5.0), 80);
        assert!(close(&s, (-5f64).sin()) && close(&c, (-5f64).cos()));
        assert!(close(&atan(&Ball::exact(d(0.5)), 80), 0.5f64.atan()));
        assert!(close(&atan(&Ball::exact(d(-3.0)), 80), (-3f64).atan()));
    }
}
