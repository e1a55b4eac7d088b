/*
    Number-theoretic functions
*/

use num_bigint::BigInt;
use num_integer::Integer as _;
use num_traits::{One, Signed, ToPrimitive, Zero};

use super::Integer;
use crate::{Error, Result};

// (2/n) for n mod 8.
const KRONECKER_TWO: [i32; 8] = [0, 1, 0, -1, 0, -1, 0, 1];

fn mod8(n: &BigInt) -> usize {
    n.mod_floor(&BigInt::from(8)).to_usize().unwrap_or_default()
}

// Kronecker symbol (a/b) by the binary reciprocity algorithm.
fn kronecker(a: &BigInt, b: &BigInt) -> i32 {
    if b.is_zero() {
        return if a.magnitude().is_one() { 1 } else { 0 };
    } else if a.is_even() && b.is_even() {
        return 0;
    }

    // remove the factors of two from `b`
    let mut a = a.clone();
    let mut b = b.clone();
    let v = b.trailing_zeros().unwrap_or_default();
    b >>= v;
    let mut k = if v % 2 == 0 { 1 } else { KRONECKER_TWO[mod8(&a)] };
    if b.is_negative() {
        b = -b;
        if a.is_negative() {
            k = -k;
        }
    }

    // `b` is now odd and positive
    loop {
        if a.is_zero() {
            return if b.is_one() { k } else { 0 };
        }

        let v = a.trailing_zeros().unwrap_or_default();
        a >>= v;
        if v % 2 == 1 {
            k *= KRONECKER_TWO[mod8(&b)];
        }

        // reciprocity: both are 3 mod 4
        if mod8(&a) & 3 == 3 && mod8(&b) & 3 == 3 {
            k = -k;
        }

        let r = a.abs();
        a = b.mod_floor(&r);
        b = r;
    }
}

// Product of the integers in `[lo, hi]` by binary splitting.
fn product(lo: u64, hi: u64) -> BigInt {
    if lo > hi {
        BigInt::one()
    } else if hi - lo < 8 {
        (lo..=hi).fold(BigInt::one(), |acc, i| acc * i)
    } else {
        let mid = lo + (hi - lo) / 2;
        product(lo, mid) * product(mid + 1, hi)
    }
}

impl Integer {
    /// Greatest common divisor, always non-negative.
    pub fn gcd(&self, other: &Integer) -> Integer {
        Integer(self.0.gcd(&other.0))
    }

    pub fn gcd_ui(&self, other: u64) -> Integer {
        self.gcd(&Integer::from(other))
    }

    /// Extended GCD: returns `(g, s, t)` with `g = gcd(self, other)` and
    /// `g == s * self + t * other`.
    pub fn gcdext(&self, other: &Integer) -> (Integer, Integer, Integer) {
        let (mut r0, mut r1) = (self.0.clone(), other.0.clone());
        let (mut s0, mut s1) = (BigInt::one(), BigInt::zero());
        let (mut t0, mut t1) = (BigInt::zero(), BigInt::one());
        while !r1.is_zero() {
            let q = &r0 / &r1;
            let r2 = &r0 - &q * &r1;
            let s2 = &s0 - &q * &s1;
            let t2 = &t0 - &q * &t1;
            r0 = std::mem::replace(&mut r1, r2);
            s0 = std::mem::replace(&mut s1, s2);
            t0 = std::mem::replace(&mut t1, t2);
        }

        if r0.is_negative() {
            (Integer(-r0), Integer(-s0), Integer(-t0))
        } else {
            (Integer(r0), Integer(s0), Integer(t0))
        }
    }

    /// Inverse of this integer modulo `m`, in `[0, |m|)`.
    ///
    /// Returns `None` exactly when `gcd(self, m) != 1`.
    pub fn invert(&self, m: &Integer) -> Result<Option<Integer>> {
        if m.0.is_zero() {
            return Err(Error::DivisionByZero);
        }

        let (g, s, _) = self.gcdext(m);
        if g.0.is_one() {
            Ok(Some(Integer(s.0.mod_floor(&m.0.abs()))))
        } else {
            Ok(None)
        }
    }

    /// Least common multiple, always non-negative.
    pub fn lcm(&self, other: &Integer) -> Integer {
        Integer(self.0.lcm(&other.0).abs())
    }

    /// Jacobi symbol `(self/b)`. `b` must be odd and positive.
    pub fn jacobi(&self, b: &Integer) -> Result<i32> {
        if !b.0.is_positive() || b.0.is_even() {
            return Err(Error::domain("jacobi: denominator must be odd and positive"));
        }
        Ok(kronecker(&self.0, &b.0))
    }

    /// Legendre symbol `(self/p)`. `p` must be an odd prime; it is checked
    /// with a probabilistic primality test.
    pub fn legendre(&self, p: &Integer) -> Result<i32> {
        if !p.0.is_positive() || p.0.is_even() || !p.is_probably_prime(25) {
            return Err(Error::domain("legendre: denominator must be an odd prime"));
        }
        Ok(kronecker(&self.0, &p.0))
    }

    /// Kronecker symbol `(self/b)`, defined for every `b`.
    pub fn kronecker(&self, b: &Integer) -> i32 {
        kronecker(&self.0, &b.0)
    }

    pub fn kronecker_si(&self, b: i64) -> i32 {
        kronecker(&self.0, &BigInt::from(b))
    }

    /// Kronecker symbol `(a/self)`.
    pub fn si_kronecker(a: i64, b: &Integer) -> i32 {
        kronecker(&BigInt::from(a), &b.0)
    }

    /// Removes every factor `f` from this integer, returning the
    /// cofactor and the number of factors removed.
    pub fn remove(&self, f: &Integer) -> Result<(Integer, u64)> {
        if f.0.is_zero() {
            return Err(Error::DivisionByZero);
        } else if f.0.magnitude().is_one() {
            return Err(Error::domain("remove: factor must not be a unit"));
        }

        let mut n = self.0.clone();
        let mut k = 0;
        if n.is_zero() {
            return Ok((Integer(n), k));
        }

        loop {
            let (q, r) = n.div_rem(&f.0);
            if !r.is_zero() {
                return Ok((Integer(n), k));
            }
            n = q;
            k += 1;
        }
    }

    /// Computes `n!`.
    pub fn factorial(n: u64) -> Integer {
        Integer(product(2, n))
    }

    /// Computes the `n`-th Fibonacci number.
    pub fn fibonacci(n: u64) -> Integer {
        // fast doubling over the bits of `n`:
        //  F(2k) = F(k) * (2F(k+1) - F(k))
        //  F(2k+1) = F(k)^2 + F(k+1)^2
        let (mut a, mut b) = (BigInt::zero(), BigInt::one());
        for i in (0..(64 - n.leading_zeros())).rev() {
            let c = &a * ((&b << 1u32) - &a);
            let d = &a * &a + &b * &b;
            if (n >> i) & 1 == 1 {
                a = d;
                b = c + &a;
            } else {
                a = c;
                b = d;
            }
        }
        Integer(a)
    }

    /// Binomial coefficient `C(n, k)`, extended to negative `n` by
    /// `C(n, k) = (-1)^k C(k - n - 1, k)`.
    pub fn binomial(n: &Integer, k: u64) -> Integer {
        if n.0.is_negative() {
            let m = BigInt::from(k) - &n.0 - 1;
            let c = Self::binomial(&Integer(m), k);
            return if k % 2 == 0 { c } else { c.neg() };
        }

        if n.0 < BigInt::from(k) {
            return Integer::zero();
        }

        // use the smaller of `k` and `n - k`
        let k = (&n.0 - k).to_u64().map_or(k, |nk| nk.min(k));
        let mut c = BigInt::one();
        for i in 1..=k {
            c = c * (&n.0 - k + i) / i;
        }
        Integer(c)
    }

    pub fn binomial_ui(n: u64, k: u64) -> Integer {
        Self::binomial(&Integer::from(n), k)
    }
}
