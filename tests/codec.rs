/*
    Binary codec
*/

#![cfg(feature = "serialize")]

use mpnum::*;

fn round_trip<T: Codec>(v: &T) -> T {
    T::from_bytes(&v.to_bytes().unwrap()).unwrap()
}

#[test]
fn integers() {
    for text in ["0", "1", "-1", "255", "-123456789012345678901234567890"] {
        let n: Integer = text.parse().unwrap();
        assert_eq!(round_trip(&n), n);
    }
    assert_eq!(Integer::zero().to_bytes().unwrap(), [0, 0, 0, 1, b'0']);
}

#[test]
fn rationals() {
    let q = Rational::from_si(-22, 7).unwrap();
    let bytes = q.to_bytes().unwrap();
    assert_eq!(
        bytes,
        [0, 0, 0, 3, b'-', b'1', b'6', 0, 0, 0, 1, b'7']
    );
    assert_eq!(Rational::from_bytes(&bytes).unwrap(), q);

    // a non-canonical pair decodes to its canonical form
    let mut wide = Vec::new();
    Integer::from(6).encode(&mut wide).unwrap();
    Integer::from(4).encode(&mut wide).unwrap();
    assert_eq!(Rational::from_bytes(&wide).unwrap(), Rational::from_si(3, 2).unwrap());

    let mut zero_den = Vec::new();
    Integer::from(1).encode(&mut zero_den).unwrap();
    Integer::zero().encode(&mut zero_den).unwrap();
    assert!(matches!(Rational::from_bytes(&zero_den), Err(Error::Decode(_))));
}

#[test]
fn floats_keep_precision_and_value() {
    let values = [
        Float::new(24),
        Float::from_si(-1, 8),
        Float::from_str_radix("a.8", 16, 53).unwrap(),
        Float::from_str_radix("0.1", 10, 200).unwrap(),
        Float::from_si(1, 64).div_ui(3, 64).unwrap(),
    ];
    for v in &values {
        let back = round_trip(v);
        assert_eq!(&back, v);
        assert_eq!(back.prec(), v.prec());
    }

    let bytes = Float::new(24).to_bytes().unwrap();
    assert_eq!(&bytes[8..], b"0.@00000000");
}

#[test]
fn correctly_rounded_floats() {
    let ctx = RoundingContext::new(53);
    let values = [
        RFloat::zero(false, 53),
        RFloat::zero(true, 53),
        RFloat::infinity(false, 30),
        RFloat::infinity(true, 30),
        RFloat::nan(12),
        RFloat::pi(&ctx).unwrap(),
        RFloat::from_f64(-1e-300, &ctx).unwrap(),
    ];
    for v in &values {
        let back = round_trip(v);
        assert!(back.is_identical(v), "{} decoded as {}", v, back);
        assert!(!back.flags().any());
    }

    let bytes = RFloat::zero(true, 53).to_bytes().unwrap();
    assert_eq!(&bytes[8..], b"-0.@00000000");
    let bytes = RFloat::infinity(true, 53).to_bytes().unwrap();
    assert_eq!(&bytes[8..], b"-@Inf@");
    let bytes = RFloat::nan(53).to_bytes().unwrap();
    assert_eq!(&bytes[8..], b"@NaN@");
}

#[test]
fn streams_of_values() {
    let mut out = Vec::new();
    Integer::from(42).encode(&mut out).unwrap();
    Float::from_si(7, 16).encode(&mut out).unwrap();
    Rational::from_si(1, 3).unwrap().encode(&mut out).unwrap();

    let mut input = &out[..];
    assert_eq!(Integer::decode(&mut input).unwrap(), Integer::from(42));
    assert_eq!(Float::decode(&mut input).unwrap(), Float::from_si(7, 16));
    assert_eq!(Rational::decode(&mut input).unwrap(), Rational::from_si(1, 3).unwrap());
    assert!(input.is_empty());
}

#[test]
fn malformed_input() {
    let bytes = Float::from_si(5, 16).to_bytes().unwrap();
    for cut in 0..bytes.len() {
        assert!(matches!(Float::from_bytes(&bytes[..cut]), Err(Error::Decode(_))));
    }

    let mut bad_prec = bytes.clone();
    bad_prec[..4].copy_from_slice(&0u32.to_be_bytes());
    assert!(matches!(Float::from_bytes(&bad_prec), Err(Error::Decode(_))));

    let mut bad_exp = vec![0, 0, 0, 8, 0, 0, 0, 9];
    bad_exp.extend_from_slice(b"0.1@00001");
    assert!(matches!(Float::from_bytes(&bad_exp), Err(Error::Decode(_))));

    let mut bad_text = vec![0, 0, 0, 8, 0, 0, 0, 5];
    bad_text.extend_from_slice(b"@Inf@");
    assert!(matches!(Float::from_bytes(&bad_text), Err(Error::Decode(_))));
    assert!(RFloat::from_bytes(&bad_text).unwrap().is_infinite());
}

#[test]
fn exponents_beyond_the_text_format() {
    let ctx = RoundingContext::new(53);
    let one = RFloat::from_si(1, &ctx).unwrap();

    // 2^(4 * (2^31 - 1) - 4) = 0.1 * 16^(2^31 - 1), the largest exponent
    let edge = one.mul_2ui(4 * (i32::MAX as u64) - 4, &ctx).unwrap();
    let bytes = edge.to_bytes().unwrap();
    assert_eq!(&bytes[8..], b"0.1@7fffffff");
    assert!(RFloat::from_bytes(&bytes).unwrap().is_identical(&edge));

    let huge = one.mul_2ui(1 << 40, &ctx).unwrap();
    assert!(matches!(huge.to_bytes(), Err(Error::Overflow)));
    let tiny = one.div_2ui(1 << 40, &ctx).unwrap();
    assert!(matches!(tiny.to_bytes(), Err(Error::Overflow)));
    assert!(huge.to_string().ends_with("e330985980542"));
}
