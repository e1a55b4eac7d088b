/*
    Binary codec
*/

//! A compact, canonical binary encoding of every value type.
//!
//! All lengths and precisions are big-endian `u32`s; magnitudes are
//! written as base-16 text so the encoding does not depend on the limb
//! size of the host:
//!  - `Integer`: `len` then lowercase hex digits, `-` for negatives,
//!  - `Rational`: numerator then denominator, each as an `Integer`,
//!  - `Float`: `prec` then `len` then `[-]0.<hex>@<exp>`, where `exp` is
//!    the base-16 exponent as eight hex digits of a two's-complement `i32`,
//!  - `RFloat`: as `Float`, with `@NaN@`, `@Inf@`, `-@Inf@` and
//!    `-0.@00000000` for the special values.

use num_bigint::{BigInt, Sign};
use num_traits::Signed;
use tracing::trace;

use crate::dyadic::Dyadic;
use crate::fr::{Exceptions, FrNum};
use crate::{radix, Error, Float, Integer, RFloat, Rational, Result, RoundingMode};

/// Values with a canonical binary encoding.
pub trait Codec: Sized {
    /// Appends the encoding of `self` to `out`.
    ///
    /// Fails with [`Error::Overflow`] if a length or exponent does not
    /// fit the 32-bit framing.
    fn encode(&self, out: &mut Vec<u8>) -> Result<()>;

    /// Decodes one value from the front of `input`, advancing it past
    /// the bytes consumed.
    fn decode(input: &mut &[u8]) -> Result<Self>;

    fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        self.encode(&mut out)?;
        Ok(out)
    }

    /// Decodes a value that must span all of `bytes`.
    fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let mut input = bytes;
        let value = Self::decode(&mut input)?;
        if !input.is_empty() {
            return Err(decode_error(format!("{} trailing bytes", input.len())));
        }
        Ok(value)
    }
}

/* Framing */

fn decode_error(msg: impl Into<String>) -> Error {
    Error::Decode(msg.into())
}

fn take<'a>(input: &mut &'a [u8], n: usize) -> Result<&'a [u8]> {
    if input.len() < n {
        return Err(decode_error(format!(
            "truncated input: need {} bytes, have {}",
            n,
            input.len()
        )));
    }
    let (head, rest) = input.split_at(n);
    *input = rest;
    Ok(head)
}

fn write_u32(out: &mut Vec<u8>, n: u32) {
    out.extend_from_slice(&n.to_be_bytes());
}

fn read_u32(input: &mut &[u8]) -> Result<u32> {
    let b = take(input, 4)?;
    Ok(u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
}

fn write_text(out: &mut Vec<u8>, text: &str) -> Result<()> {
    let len = u32::try_from(text.len()).map_err(|_| Error::Overflow)?;
    write_u32(out, len);
    out.extend_from_slice(text.as_bytes());
    Ok(())
}

fn read_text<'a>(input: &mut &'a [u8]) -> Result<&'a str> {
    let len = read_u32(input)? as usize;
    let bytes = take(input, len)?;
    std::str::from_utf8(bytes).map_err(|e| decode_error(format!("invalid utf-8: {}", e)))
}

fn read_prec(input: &mut &[u8]) -> Result<u32> {
    let prec = read_u32(input)?;
    if !(crate::PREC_MIN..=crate::PREC_MAX).contains(&prec) {
        return Err(decode_error(format!("invalid precision {}", prec)));
    }
    Ok(prec)
}

/* Float text */

const ZERO_TEXT: &str = "0.@00000000";

// Formats a finite value as `[-]0.<hex>@<exp>`.
fn write_dyadic(d: &Dyadic, prec: u32) -> Result<String> {
    if d.is_zero() {
        return Ok(ZERO_TEXT.to_string());
    }
    // 16^(e-1) <= |d| < 16^e
    let e = i32::try_from(d.top().div_euclid(4) + 1).map_err(|_| Error::Overflow)?;
    // power-of-two bases print exactly
    let (digits, _) = radix::format_dyadic(d, 16, 0, prec, RoundingMode::ToZero);
    let (sign, digits) = match digits.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", digits.as_str()),
    };
    Ok(format!("{}0.{}@{:08x}", sign, digits, e as u32))
}

// Parses `[-]0.<hex>@<exp>` into a sign and a value that must fit in `prec` bits.
fn read_dyadic(text: &str, prec: u32) -> Result<(bool, Dyadic)> {
    let (neg, body) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text),
    };
    let body = body
        .strip_prefix("0.")
        .ok_or_else(|| decode_error(format!("malformed float {:?}", text)))?;
    let (digits, exp) = body
        .split_once('@')
        .ok_or_else(|| decode_error(format!("missing exponent in {:?}", text)))?;

    if exp.len() != 8 {
        return Err(decode_error(format!("malformed exponent {:?}", exp)));
    }
    let exp = u32::from_str_radix(exp, 16)
        .map_err(|_| decode_error(format!("malformed exponent {:?}", exp)))? as i32;

    if digits.is_empty() {
        return Ok((neg, Dyadic::zero()));
    }
    let mant = radix::parse_uint(digits.as_bytes(), 16).map_err(|e| decode_error(e.to_string()))?;
    let d = Dyadic::new(neg, mant, 4 * (exp as i64 - digits.len() as i64));
    if d.bits() > prec as u64 {
        return Err(decode_error(format!("{:?} does not fit in {} bits", text, prec)));
    }
    Ok((neg, d))
}

/* Implementations */

impl Codec for Integer {
    fn encode(&self, out: &mut Vec<u8>) -> Result<()> {
        write_text(out, &self.to_string_radix(16)?)
    }

    fn decode(input: &mut &[u8]) -> Result<Self> {
        let text = read_text(input)?;
        let (neg, digits) = match text.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, text),
        };
        let mag = radix::parse_uint(digits.as_bytes(), 16).map_err(|e| decode_error(e.to_string()))?;
        let sign = if neg { Sign::Minus } else { Sign::Plus };
        Ok(Integer::from(BigInt::from_biguint(sign, mag)))
    }
}

impl Codec for Rational {
    fn encode(&self, out: &mut Vec<u8>) -> Result<()> {
        self.numer().encode(out)?;
        self.denom().encode(out)
    }

    fn decode(input: &mut &[u8]) -> Result<Self> {
        let num = Integer::decode(input)?;
        let den = Integer::decode(input)?;
        if !den.as_bigint().is_positive() {
            return Err(decode_error("denominator must be positive"));
        }
        Ok(Rational::canonical(num.into_bigint(), den.into_bigint()))
    }
}

impl Codec for Float {
    fn encode(&self, out: &mut Vec<u8>) -> Result<()> {
        write_u32(out, self.prec());
        write_text(out, &write_dyadic(self.dyadic(), self.prec())?)
    }

    fn decode(input: &mut &[u8]) -> Result<Self> {
        let prec = read_prec(input)?;
        let (_, d) = read_dyadic(read_text(input)?, prec)?;
        trace!(prec, "decoded float");
        Ok(Float::truncate(&d, prec))
    }
}

impl Codec for RFloat {
    fn encode(&self, out: &mut Vec<u8>) -> Result<()> {
        write_u32(out, self.prec());
        let text = match self.num() {
            FrNum::Nan => "@NaN@".to_string(),
            FrNum::Infinity(true) => "-@Inf@".to_string(),
            FrNum::Infinity(false) => "@Inf@".to_string(),
            FrNum::Zero(true) => format!("-{}", ZERO_TEXT),
            FrNum::Zero(false) => ZERO_TEXT.to_string(),
            FrNum::Finite(d) => write_dyadic(d, self.prec())?,
        };
        write_text(out, &text)
    }

    /// Decodes a value; the exception flags of the result are clear.
    fn decode(input: &mut &[u8]) -> Result<Self> {
        let prec = read_prec(input)?;
        let text = read_text(input)?;
        let num = match text {
            "@NaN@" => FrNum::Nan,
            "@Inf@" => FrNum::Infinity(false),
            "-@Inf@" => FrNum::Infinity(true),
            _ => match read_dyadic(text, prec)? {
                (neg, d) if d.is_zero() => FrNum::Zero(neg),
                (_, d) => FrNum::Finite(d),
            },
        };
        trace!(prec, "decoded correctly-rounded float");
        Ok(RFloat::from_parts(prec, num, Exceptions::default()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_layout() {
        let bytes = Integer::from(-255).to_bytes().unwrap();
        assert_eq!(bytes, [0, 0, 0, 3, b'-', b'f', b'f']);
        assert_eq!(Integer::from_bytes(&bytes).unwrap(), Integer::from(-255));
    }

    #[test]
    fn float_layout() {
        // 10.5 = 0.a8 * 16^1
        let x = Float::from_f64(10.5, 8).unwrap();
        let bytes = x.to_bytes().unwrap();
        let mut expected = vec![0, 0, 0, 8, 0, 0, 0, 13];
        expected.extend_from_slice(b"0.a8@00000001");
        assert_eq!(bytes, expected);

        // 2^-8 = 0.1 * 16^-1
        let y = Float::from_f64(1.0 / 256.0, 4).unwrap();
        let bytes = y.to_bytes().unwrap();
        assert_eq!(&bytes[8..], b"0.1@ffffffff");
    }

    #[test]
    fn rejects_malformed_input() {
        let bytes = Integer::from(300).to_bytes().unwrap();
        assert!(matches!(Integer::from_bytes(&bytes[..5]), Err(Error::Decode(_))));

        let mut long = bytes.clone();
        long.push(0);
        assert!(matches!(Integer::from_bytes(&long), Err(Error::Decode(_))));

        assert!(matches!(Integer::from_bytes(&[0, 0, 0, 2, b'1', b'g']), Err(Error::Decode(_))));
        assert!(matches!(Integer::from_bytes(&[0, 0, 0, 1, 0xff]), Err(Error::Decode(_))));

        // three hex digits do not fit in four bits
        let mut wide = vec![0, 0, 0, 4, 0, 0, 0, 14];
        wide.extend_from_slice(b"0.fff@00000003");
        assert!(matches!(Float::from_bytes(&wide), Err(Error::Decode(_))));
    }
}
