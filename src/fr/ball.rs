/*
    Ball arithmetic
*/

use std::cmp::Ordering;

use num_bigint::BigUint;
use num_traits::One;

use crate::dyadic::Dyadic;
use crate::round::Unrounded;
use crate::RoundingMode;

/// Significant bits kept in a radius.
const RAD_PREC: u32 = 30;

/// An enclosure `[mid - rad, mid + rad]` of an exact real number.
///
/// Midpoints are rounded to a working precision and every rounding
/// error is added to the radius, which is itself rounded up.
#[derive(Clone, Debug)]
pub(crate) struct Ball {
    mid: Dyadic,
    rad: Dyadic,
}

// Rounds a non-negative bound up to the radius precision.
fn up(d: &Dyadic) -> Dyadic {
    d.round_prec(RAD_PREC, RoundingMode::AwayZero).0
}

// Sum of non-negative bounds, rounded up.
fn up_sum(a: &Dyadic, b: &Dyadic) -> Dyadic {
    a.add_round(b, RAD_PREC, RoundingMode::AwayZero).0
}

// Rounds a midpoint to `wp` bits, returning it with a bound
// on its rounding error.
fn round_mid(u: &Unrounded, wp: u32) -> (Dyadic, Dyadic) {
    if u.is_zero() {
        return (Dyadic::zero(), Dyadic::zero());
    }
    let (mid, ord) = Dyadic::rounded(u, wp, RoundingMode::NearestEven);
    let err = match ord {
        Ordering::Equal => Dyadic::zero(),
        _ => Dyadic::new(false, BigUint::one(), mid.top() + 1 - wp as i64),
    };
    (mid, err)
}

impl Ball {
    pub fn exact(mid: Dyadic) -> Self {
        Self {
            mid,
            rad: Dyadic::zero(),
        }
    }

    /// A ball around `mid` with radius at least `rad`.
    pub fn with_error(mid: Dyadic, rad: &Dyadic) -> Self {
        Self { mid, rad: up(rad) }
    }

    /// A ball wide enough to never decide a rounding.
    pub fn undecided() -> Self {
        Self {
            mid: Dyadic::zero(),
            rad: Dyadic::one(),
        }
    }

    pub fn mid(&self) -> &Dyadic {
        &self.mid
    }

    pub fn rad(&self) -> &Dyadic {
        &self.rad
    }

    pub fn is_exact(&self) -> bool {
        self.rad.is_zero()
    }

    /// Returns true if the ball may contain zero.
    pub fn contains_zero(&self) -> bool {
        self.mid.cmp_abs(&self.rad) != Ordering::Greater
    }

    /// Lower endpoint, rounded down to `p` bits.
    pub fn lo(&self, p: u32) -> Dyadic {
        self.mid.add_round(&self.rad.neg(), p, RoundingMode::ToNegative).0
    }

    /// Upper endpoint, rounded up to `p` bits.
    pub fn hi(&self, p: u32) -> Dyadic {
        self.mid.add_round(&self.rad, p, RoundingMode::ToPositive).0
    }

    /// An upper bound on the magnitude of every point.
    pub fn upper(&self) -> Dyadic {
        up_sum(&self.mid.abs(), &self.rad)
    }

    /// A positive lower bound on the magnitude of every point,
    /// if the ball excludes zero.
    pub fn lower(&self) -> Option<Dyadic> {
        if self.contains_zero() {
            return None;
        }
        let lo = self.mid.abs().add_round(&self.rad.neg(), RAD_PREC, RoundingMode::ToZero);
        Some(lo.0)
    }

    /// Widens the radius by `err`.
    pub fn add_error(&self, err: &Dyadic) -> Self {
        Self {
            mid: self.mid.clone(),
            rad: up_sum(&self.rad, err),
        }
    }

    pub fn neg(&self) -> Self {
        Self {
            mid: self.mid.neg(),
            rad: self.rad.clone(),
        }
    }

    /// Multiplies by `2^k`; exact.
    pub fn mul_2exp(&self, k: i64) -> Self {
        Self {
            mid: self.mid.mul_2exp(k),
            rad: self.rad.mul_2exp(k),
        }
    }

    pub fn add(&self, other: &Ball, wp: u32) -> Self {
        let (mid, err) = round_mid(&self.mid.add_unrounded(&other.mid, wp), wp);
        let rad = up_sum(&up_sum(&self.rad, &other.rad), &err);
        Self { mid, rad }
    }

    pub fn sub(&self, other: &Ball, wp: u32) -> Self {
        self.add(&other.neg(), wp)
    }

    pub fn mul(&self, other: &Ball, wp: u32) -> Self {
        let (mid, err) = round_mid(&self.mid.mul(&other.mid).unrounded(), wp);

        // |ab - a'b'| <= |a'| rb + |b'| ra + ra rb
        let cross = up_sum(
            &up(&self.mid.abs().mul(&other.rad)),
            &up(&other.mid.abs().mul(&self.rad)),
        );
        let rad = up_sum(&up_sum(&cross, &up(&self.rad.mul(&other.rad))), &err);
        Self { mid, rad }
    }

    /// Divides by another ball; the result is undecided when the
    /// divisor may be zero.
    pub fn div(&self, other: &Ball, wp: u32) -> Self {
        let den = match other.lower() {
            Some(den) => den,
            None => return Self::undecided(),
        };
        let (mid, err) = round_mid(&self.mid.div_unrounded(&other.mid, wp), wp);

        // |a/b - a'/b'| <= (ra + |a'/b'| rb) / (|b'| - rb)
        let q = self.mid.abs().div_round(&other.mid.abs(), RAD_PREC, RoundingMode::AwayZero).0;
        let num = up_sum(&self.rad, &up(&q.mul(&other.rad)));
        let rad = num.div_round(&den, RAD_PREC, RoundingMode::AwayZero).0;
        Self {
            mid,
            rad: up_sum(&rad, &err),
        }
    }

    /// Divides by a positive machine integer.
    pub fn div_ui(&self, n: u64, wp: u32) -> Self {
        debug_assert!(n > 0);
        let d = Dyadic::new(false, BigUint::from(n), 0);
        let (mid, err) = round_mid(&self.mid.div_unrounded(&d, wp), wp);
        let rad = self.rad.div_round(&d, RAD_PREC, RoundingMode::AwayZero).0;
        Self {
            mid,
            rad: up_sum(&rad, &err),
        }
    }

    /// Square root; undecided unless every point is positive.
    pub fn sqrt(&self, wp: u32) -> Self {
        if self.is_exact() && self.mid.is_zero() {
            return self.clone();
        }
        let lo = match self.lower() {
            Some(lo) if !self.mid.is_neg() => lo,
            _ => return Self::undecided(),
        };

        let (mid, ord) = self.mid.sqrt_round(wp, RoundingMode::NearestEven);
        let err = match ord {
            Ordering::Equal => Dyadic::zero(),
            _ => Dyadic::new(false, BigUint::one(), mid.top() + 1 - wp as i64),
        };

        // |sqrt(a) - sqrt(a')| <= ra / sqrt(lo)
        let s = lo.sqrt_round(RAD_PREC, RoundingMode::ToZero).0;
        let rad = self.rad.div_round(&s, RAD_PREC, RoundingMode::AwayZero).0;
        Self {
            mid,
            rad: up_sum(&rad, &err),
        }
    }

    /// Bound on `rad / |x|` over the ball, if it excludes zero.
    pub fn rel_rad(&self) -> Option<Dyadic> {
        let lo = self.lower()?;
        Some(self.rad.div_round(&lo, RAD_PREC, RoundingMode::AwayZero).0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(f: f64) -> Dyadic {
        Dyadic::from_f64(f).unwrap()
    }

    fn encloses(b: &Ball, x: f64) -> bool {
        b.lo(64) <= d(x) && d(x) <= b.hi(64)
    }

    #[test]
    fn rounding_errors_are_enclosed() {
        let third = Ball::exact(d(1.0)).div_ui(3, 20);
        assert!(!third.is_exact());
        let one = third.mul(&Ball::exact(d(3.0)), 20);
        assert!(encloses(&one, 1.0));
        let sum = third.add(&third, 20).add(&third, 20);
        assert!(encloses(&sum, 1.0));
    }

    #[test]
    fn division_by_a_ball_around_zero() {
        let near_zero = Ball::with_error(d(0.0), &d(0.5));
        assert!(Ball::exact(d(1.0)).div(&near_zero, 30).contains_zero());
        let q = Ball::exact(d(1.0)).div(&Ball::with_error(d(4.0), &d(0.5)), 30);
        assert!(encloses(&q, 1.0 / 3.5) && encloses(&q, 1.0 / 4.5));
    }

    #[test]
    fn square_root() {
        let r = Ball::exact(d(2.0)).sqrt(40);
        assert!(encloses(&r, 2f64.sqrt()));
        assert!(Ball::with_error(d(1.0), &d(2.0)).sqrt(40).contains_zero());
    }
}
