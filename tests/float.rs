/*
    Truncating floats
*/

use std::cmp::Ordering;

use mpnum::*;

fn f(x: f64, prec: u32) -> Float {
    Float::from_f64(x, prec).unwrap()
}

#[test]
fn precision_is_explicit() {
    let a = Float::from_si(3, 64);
    let b = Float::from_si(7, 64);
    let c = a.mul(&b, 4);
    assert_eq!(c.prec(), 4);
    assert_eq!(c.to_f64(), 20.0);
    assert_eq!(a.mul(&Float::from_si(5, 3), 4).to_f64(), 15.0);

    // every result takes the requested precision, never an operand's
    let d = c.add(&a, 100);
    assert_eq!(d.prec(), 100);
    assert_eq!(d.to_f64(), 23.0);
}

#[test]
fn truncation() {
    let third = Float::from_si(1, 8).div_ui(3, 8).unwrap();
    assert_eq!(third.to_f64(), 85.0 / 256.0);
    let neg = Float::from_si(-1, 8).div_ui(3, 8).unwrap();
    assert_eq!(neg.to_f64(), -85.0 / 256.0);

    assert_eq!(Float::from_f64(0.1, 4).unwrap().to_f64(), 0.09375);
    assert_eq!(Float::ui_sub(10, &f(0.5, 8), 3).to_f64(), 8.0);
    assert_eq!(Float::ui_div(1, &f(3.0, 8), 2).unwrap().to_f64(), 0.25);
    assert_eq!(f(-1.75, 8).abs(8).to_f64(), 1.75);
    assert_eq!(f(1.75, 8).neg(2).to_f64(), -1.5);
}

#[test]
fn division_by_zero_is_an_error() {
    let x = Float::from_si(1, 32);
    assert!(matches!(x.div(&Float::new(32), 32), Err(Error::DivisionByZero)));
    assert!(matches!(x.div_ui(0, 32), Err(Error::DivisionByZero)));
    assert!(matches!(Float::ui_div(1, &Float::new(8), 32), Err(Error::DivisionByZero)));
}

#[test]
fn integer_rounding() {
    assert_eq!(f(2.5, 8).ceil(8).to_f64(), 3.0);
    assert_eq!(f(2.5, 8).floor(8).to_f64(), 2.0);
    assert_eq!(f(-2.5, 8).floor(8).to_f64(), -3.0);
    assert_eq!(f(-2.5, 8).trunc(8).to_f64(), -2.0);
    assert_eq!(f(-2.5, 8).ceil(8).to_f64(), -2.0);
    assert!(f(0.25, 8).trunc(8).is_zero());

    // the result precision bounds the integer
    assert_eq!(f(1000.5, 16).floor(4).to_f64(), 960.0);
    assert_eq!(f(1000.5, 16).ceil(4).to_f64(), 1024.0);
}

#[test]
fn comparison() {
    let a = f(1.5, 8);
    let b = f(1.5, 100);
    assert_eq!(a, b);
    assert!(a < f(2.0, 2));
    assert_eq!(a.cmp_si(1), Ordering::Greater);
    assert_eq!(f(-0.5, 8).signum(), -1);
    assert!(f(4.0, 8).is_integer());

    let x = f(1.0, 64);
    let y = f(1.0 + 2f64.powi(-20), 64);
    assert!(x.eq_bits(&y, 16));
    assert!(!x.eq_bits(&y, 24));
    assert!(!x.eq_bits(&y.neg(64), 16));

    assert_eq!(f(4.0, 8).reldiff(&f(5.0, 8), 8).to_f64(), 0.25);
    assert_eq!(Float::new(8).reldiff(&f(5.0, 8), 8).to_f64(), 1.0);
}

#[test]
fn strings() {
    let x = Float::from_str_radix("a.8", 16, 53).unwrap();
    assert_eq!(x.to_f64(), 10.5);
    assert_eq!(x.to_string_radix(16, 0).unwrap(), ("a8".to_string(), 1));
    assert_eq!(x.to_string_radix(10, 0).unwrap(), ("105".to_string(), 2));
    assert_eq!(x.to_string(), "0.105e2");

    let y = Float::from_str_radix("-1.5e-3", 10, 64).unwrap();
    assert_eq!(y.to_string_radix(10, 5).unwrap(), ("-15".to_string(), -2));
    let z = Float::from_str_radix("1@10", 2, 8).unwrap();
    assert_eq!(z.to_f64(), 4.0);

    assert_eq!(Float::new(8).to_string_radix(10, 0).unwrap(), (String::new(), 0));
    assert!(Float::from_str_radix("1.2.3", 10, 8).is_err());
    assert!(Float::from_str_radix("1", 99, 8).is_err());
}

#[test]
fn conversions() {
    let x = f(-7.75, 16);
    assert_eq!(x.to_integer(), Integer::from(-7));
    assert_eq!(x.to_rational(), Rational::from_si(-31, 4).unwrap());
    assert_eq!(x.to_f64(), -7.75);
    assert_eq!(Float::from_si(3, 2).to_f64(), 3.0);
    assert_eq!(f(-0.125, 1).to_f64(), -0.125);
    assert_eq!(Float::from_rational(&Rational::from_si(1, 3).unwrap(), 8).to_f64(), 85.0 / 256.0);
    assert_eq!(Float::from_integer(&Integer::from(1023), 4).to_f64(), 960.0);
    assert!(Float::from_f64(f64::INFINITY, 8).is_err());

    let r = Round::<Float>::round_exact(&Integer::from(1023), &Precision(4)).unwrap();
    assert!(!r.is_exact());
    assert_eq!(r.value().to_f64(), 960.0);
    let q = Rational::from_si(3, 4).unwrap();
    let r = Round::<Float>::round_exact(&q, &Precision(4)).unwrap();
    assert!(r.is_exact());
}

#[test]
fn random_floats() {
    let mut state = RandState::with_seed(3);
    for _ in 0..50 {
        let x = Float::urandomb(&mut state, 40, 40);
        assert!(x.signum() >= 0 && x.cmp_si(1) == Ordering::Less);
        let y = Float::random2(&mut state, -2, 4, 64);
        assert!(y.signum() < 0);
        assert!(y.prec() == 64);
        let z = Float::random2(&mut state, i64::MIN, u64::MAX, 16);
        assert!(z.signum() < 0 && z.prec() == 16);
    }
}
