/*
    Digits in bases 2 to 62
*/

use std::cmp::Ordering;

use num_bigint::{BigInt, BigUint, Sign};
use num_integer::Integer as _;
use num_traits::{One, Pow, ToPrimitive};

use crate::dyadic::Dyadic;
use crate::{round, Error, Result, RoundingMode};

pub(crate) const BASE_MIN: u32 = 2;
pub(crate) const BASE_MAX: u32 = 62;

/// Largest magnitude of an exponent accepted when parsing.
const EXP_LIMIT: i64 = 1 << 20;

const DIGITS_LOWER: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const DIGITS_MIXED: &[u8; 62] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

pub(crate) fn check_base(base: u32) -> Result<()> {
    if (BASE_MIN..=BASE_MAX).contains(&base) {
        Ok(())
    } else {
        Err(Error::domain(format!("invalid base {}", base)))
    }
}

/// Value of an ASCII digit in `base`.
///
/// Up to base 36 letters are case-insensitive; above, upper-case letters
/// are 10 to 35 and lower-case letters 36 to 61.
pub(crate) fn digit_value(c: u8, base: u32) -> Option<u8> {
    let v = match c {
        b'0'..=b'9' => c - b'0',
        b'A'..=b'Z' => c - b'A' + 10,
        b'a'..=b'z' if base <= 36 => c - b'a' + 10,
        b'a'..=b'z' => c - b'a' + 36,
        _ => return None,
    };
    if (v as u32) < base {
        Some(v)
    } else {
        None
    }
}

/// ASCII digit of a value in `base`.
pub(crate) fn digit_char(v: u8, base: u32) -> char {
    if base <= 36 {
        DIGITS_LOWER[v as usize] as char
    } else {
        DIGITS_MIXED[v as usize] as char
    }
}

/// Parses a non-empty digit string (no sign) in `base`.
pub(crate) fn parse_digits(text: &[u8], base: u32) -> Result<Vec<u8>> {
    if text.is_empty() {
        return Err(Error::Parse("missing digits".into()));
    }

    text.iter()
        .map(|&c| {
            digit_value(c, base).ok_or_else(|| {
                Error::Parse(format!("invalid digit {:?} for base {}", c as char, base))
            })
        })
        .collect()
}

/// Parses a non-empty digit string (no sign) in `base` into a magnitude.
pub(crate) fn parse_uint(text: &[u8], base: u32) -> Result<BigUint> {
    let digits = parse_digits(text, base)?;
    BigUint::from_radix_be(&digits, base).ok_or_else(|| Error::Parse("invalid digits".into()))
}

/// Formats a magnitude in `base`.
pub(crate) fn format_uint(n: &BigUint, base: u32) -> String {
    n.to_radix_be(base)
        .into_iter()
        .map(|v| digit_char(v, base))
        .collect()
}

/// Removes ASCII whitespace.
pub(crate) fn strip_whitespace(text: &str) -> Vec<u8> {
    text.bytes().filter(|c| !c.is_ascii_whitespace()).collect()
}

// Bounds `lo * 2^exp <= base^k <= hi * 2^exp`, both ends kept to `wp`
// bits. The two coincide exactly when no bit was dropped.
fn pow_bounds(base: u32, k: u64, wp: u64) -> (BigUint, BigUint, i64) {
    let mut lo = BigUint::one();
    let mut hi = BigUint::one();
    let mut exp = 0i64;
    for i in (0..u64::BITS - k.leading_zeros()).rev() {
        lo = &lo * &lo;
        hi = &hi * &hi;
        exp *= 2;
        if (k >> i) & 1 == 1 {
            lo *= base;
            hi *= base;
        }

        let excess = hi.bits().saturating_sub(wp);
        if excess > 0 {
            let lost = hi.trailing_zeros().map_or(false, |t| t < excess);
            lo >>= excess;
            hi >>= excess;
            if lost {
                hi += 1u32;
            }
            exp += excess as i64;
        }
    }
    (lo, hi, exp)
}

// A magnitude `num / den * 2^exp`.
type Fraction = (BigUint, BigUint, i64);

// Brackets `|v| * base^s` between two fractions, the power of `base`
// carried to `wp` bits. Power-of-two bases are scaled exactly.
fn scaled_bounds(v: &Dyadic, base: u32, s: i64, wp: u64) -> (Fraction, Fraction) {
    let mant = v.mant().clone();
    if base.is_power_of_two() {
        let exact = (mant, BigUint::one(), v.exp() + base.trailing_zeros() as i64 * s);
        return (exact.clone(), exact);
    }

    let (plo, phi, pexp) = pow_bounds(base, s.unsigned_abs(), wp);
    if s >= 0 {
        (
            (&mant * plo, BigUint::one(), v.exp() + pexp),
            (mant * phi, BigUint::one(), v.exp() + pexp),
        )
    } else {
        (
            (mant.clone(), phi, v.exp() - pexp),
            (mant, plo, v.exp() - pexp),
        )
    }
}

// Compares a fraction against one.
fn cmp_one((num, den, exp): &Fraction) -> Ordering {
    if *exp >= 0 {
        (num << *exp as u64).cmp(den)
    } else {
        num.cmp(&(den << (-*exp) as u64))
    }
}

// Compares `|v|` against `base^e`.
fn cmp_pow(v: &Dyadic, base: u32, e: i64) -> Ordering {
    let mut wp = 64;
    loop {
        let (lo, hi) = scaled_bounds(v, base, -e, wp);
        let (olo, ohi) = (cmp_one(&lo), cmp_one(&hi));
        if olo == ohi {
            return olo;
        }
        wp *= 2;
    }
}

// Finds `e` with `base^(e-1) <= |v| < base^e` for a non-zero `v`.
fn digit_exponent(v: &Dyadic, base: u32) -> i64 {
    if base.is_power_of_two() {
        return v.top().div_euclid(base.trailing_zeros() as i64) + 1;
    }

    // |v| lies in [2^top, 2^(top+1)), start from an estimate
    let scale = std::f64::consts::LN_2 / (base as f64).ln();
    let mut e = ((v.top() as f64) * scale).floor() as i64 + 1;
    while cmp_pow(v, base, e) != Ordering::Less {
        e += 1;
    }
    while cmp_pow(v, base, e - 1) == Ordering::Less {
        e -= 1;
    }
    e
}

/// Number of digits needed in `base` to represent `prec` bits,
/// `ceil(prec * log_base(2)) + 1`.
pub(crate) fn default_digits(prec: u32, base: u32) -> usize {
    let scale = std::f64::consts::LN_2 / (base as f64).ln();
    (prec as f64 * scale).ceil() as usize + 1
}

/// Formats `v` as a digit string and exponent `e` with
/// `v = 0.DIGITS * base^e`.
///
/// With `digits == 0` a power-of-two base prints the exact value and
/// any other base [`default_digits`]. The digit string is rounded per
/// `rm`, stripped of trailing zeros and carries a leading `-` for
/// negative values. Zero formats as `("", 0)`.
pub(crate) fn format_dyadic(
    v: &Dyadic,
    base: u32,
    digits: usize,
    prec: u32,
    rm: RoundingMode,
) -> (String, i64) {
    if v.is_zero() {
        return (String::new(), 0);
    }

    let mut e = digit_exponent(v, base);
    let n = match digits {
        0 if base.is_power_of_two() => {
            // `v` is exact once `k * (e - n) <= v.exp()`
            let k = base.trailing_zeros() as i64;
            (e - v.exp().div_euclid(k)).max(1) as usize
        }
        0 => default_digits(prec, base),
        n => n,
    };

    // q = |v| * base^(n - e) rounded to an integer, refined until both
    // ends of the bracket round alike
    let bits_per_digit = (base as f64).log2().ceil() as u64;
    let mut wp = n as u64 * bits_per_digit + 64;
    let mut q = loop {
        let (lo, hi) = scaled_bounds(v, base, n as i64 - e, wp);
        let qlo = round::round_ratio_at(v.is_neg(), &lo.0, &lo.1, lo.2, 0, rm).mant;
        let qhi = round::round_ratio_at(v.is_neg(), &hi.0, &hi.1, hi.2, 0, rm).mant;
        if qlo == qhi {
            break qlo;
        }
        wp *= 2;
    };
    let limit: BigUint = Pow::pow(BigUint::from(base), n as u64);
    if q >= limit {
        // rounding carried into a new digit
        q = Pow::pow(BigUint::from(base), n as u64 - 1);
        e += 1;
    }

    let text = format_uint(&q, base);
    let text = text.trim_end_matches('0');
    let text = if v.is_neg() {
        format!("-{}", text)
    } else {
        text.to_string()
    };
    (text, e)
}

/// Parses `[-]digits[.digits][@exp]` in `base` into an exact fraction.
///
/// The exponent is written in `base` as well and may also be introduced
/// by `e` or `E` when `base <= 10`. ASCII whitespace is ignored.
pub(crate) fn parse_float(text: &str, base: u32) -> Result<(BigInt, BigInt)> {
    check_base(base)?;
    let bytes = strip_whitespace(text);
    let (neg, rest) = match bytes.split_first() {
        Some((&b'-', rest)) => (true, rest),
        Some((&b'+', rest)) => (false, rest),
        _ => (false, &bytes[..]),
    };

    let marker = |c: &u8| *c == b'@' || (base <= 10 && (*c == b'e' || *c == b'E'));
    let (mantissa, exponent) = match rest.iter().position(marker) {
        Some(i) => (&rest[..i], Some(&rest[i + 1..])),
        None => (rest, None),
    };

    let (int_part, frac_part) = match mantissa.iter().position(|&c| c == b'.') {
        Some(i) => (&mantissa[..i], &mantissa[i + 1..]),
        None => (mantissa, &mantissa[..0]),
    };
    if int_part.is_empty() && frac_part.is_empty() {
        return Err(Error::Parse("missing digits".into()));
    }

    let mut digits = if int_part.is_empty() {
        Vec::new()
    } else {
        parse_digits(int_part, base)?
    };
    if !frac_part.is_empty() {
        digits.extend(parse_digits(frac_part, base)?);
    }
    let mant = BigUint::from_radix_be(&digits, base)
        .ok_or_else(|| Error::Parse("invalid digits".into()))?;

    let exp = match exponent {
        Some(text) => {
            let (eneg, edigits) = match text.split_first() {
                Some((&b'-', rest)) => (true, rest),
                Some((&b'+', rest)) => (false, rest),
                _ => (false, text),
            };
            let e = parse_uint(edigits, base)?
                .to_i64()
                .filter(|e| *e <= EXP_LIMIT)
                .ok_or_else(|| Error::Parse("exponent out of range".into()))?;
            if eneg {
                -e
            } else {
                e
            }
        }
        None => 0,
    };

    let exp = exp - frac_part.len() as i64;
    let p: BigUint = Pow::pow(BigUint::from(base), exp.unsigned_abs());
    let (num, den) = if exp >= 0 {
        (mant * p, BigUint::one())
    } else {
        let g = mant.gcd(&p);
        (mant / &g, p / g)
    };
    let sign = if neg { Sign::Minus } else { Sign::Plus };
    Ok((BigInt::from_biguint(sign, num), BigInt::from(den)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn letters() {
        assert_eq!(digit_value(b'f', 16), Some(15));
        assert_eq!(digit_value(b'F', 16), Some(15));
        assert_eq!(digit_value(b'g', 16), None);
        assert_eq!(digit_value(b'a', 62), Some(36));
        assert_eq!(digit_value(b'Z', 62), Some(35));
        assert_eq!(digit_char(61, 62), 'z');
        assert_eq!(digit_char(35, 36), 'z');
    }

    #[test]
    fn magnitudes() {
        let n = parse_uint(b"zz", 36).unwrap();
        assert_eq!(n, BigUint::from(1295u32));
        assert_eq!(format_uint(&n, 36), "zz");
        assert_eq!(format_uint(&BigUint::from(0u32), 10), "0");
        assert!(parse_uint(b"", 10).is_err());
        assert!(parse_uint(b"12a", 10).is_err());
    }

    fn dy(f: f64) -> Dyadic {
        Dyadic::from_f64(f).unwrap()
    }

    #[test]
    fn float_digits() {
        let rm = RoundingMode::NearestEven;
        assert_eq!(format_dyadic(&dy(10.5), 16, 0, 53, rm), ("a8".to_string(), 1));
        assert_eq!(format_dyadic(&dy(-0.375), 2, 0, 53, rm), ("-11".to_string(), -1));
        assert_eq!(format_dyadic(&dy(100.0), 10, 0, 53, rm), ("1".to_string(), 3));
        assert_eq!(format_dyadic(&dy(0.1), 10, 5, 53, rm), ("1".to_string(), 0));
        assert_eq!(format_dyadic(&dy(9.99), 10, 2, 53, rm), ("1".to_string(), 2));
        assert_eq!(format_dyadic(&Dyadic::zero(), 10, 0, 53, rm), (String::new(), 0));
    }

    #[test]
    fn huge_exponents_format_quickly() {
        let rm = RoundingMode::NearestEven;
        let big = Dyadic::from_i64(3).mul_2exp(1 << 40);
        let (digits, e) = format_dyadic(&big, 16, 0, 53, rm);
        assert_eq!((digits.as_str(), e), ("3", (1 << 38) + 1));
        let (digits, e) = format_dyadic(&big.neg(), 2, 0, 53, rm);
        assert_eq!((digits.as_str(), e), ("-11", (1 << 40) + 2));

        // 2^(2^40) = 8.0572... * 10^330985980541
        let two = Dyadic::from_i64(1).mul_2exp(1 << 40);
        let (digits, e) = format_dyadic(&two, 10, 3, 53, rm);
        assert_eq!((digits.as_str(), e), ("806", 330_985_980_542));
        let tiny = Dyadic::from_i64(1).mul_2exp(-(1 << 40));
        assert_eq!(format_dyadic(&tiny, 10, 3, 53, rm).1, -330_985_980_541);
    }

    #[test]
    fn bracketed_powers() {
        let (lo, hi, exp) = pow_bounds(10, 3, 64);
        assert_eq!((lo, hi, exp), (BigUint::from(1000u32), BigUint::from(1000u32), 0));
        let (lo, hi, exp) = pow_bounds(3, 100, 32);
        let exact: BigUint = Pow::pow(BigUint::from(3u32), 100u32);
        assert!(lo < hi && hi.bits() <= 33);
        assert!((&lo << exp as u64) <= exact && exact <= (&hi << exp as u64));
        assert_eq!(cmp_pow(&Dyadic::from_i64(1000), 10, 3), Ordering::Equal);
        assert_eq!(cmp_pow(&Dyadic::from_i64(999), 10, 3), Ordering::Less);
    }

    #[test]
    fn float_parse() {
        let (n, d) = parse_float("a.8", 16).unwrap();
        assert_eq!((n, d), (BigInt::from(21), BigInt::from(2)));
        let (n, d) = parse_float("2.50", 10).unwrap();
        assert_eq!((n, d), (BigInt::from(5), BigInt::from(2)));
        let (n, d) = parse_float("-1.5e2", 10).unwrap();
        assert_eq!((n, d), (BigInt::from(-150), BigInt::from(1)));
        let (n, d) = parse_float(".1@-1", 16).unwrap();
        assert_eq!((n, d), (BigInt::from(1), BigInt::from(256)));
        assert!(parse_float(".", 10).is_err());
        assert!(parse_float("1.2.3", 10).is_err());
    }
}
