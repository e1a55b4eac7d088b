/*
    The sandbox
*/

use mpnum::*;

fn mul<N: Number>(x: N, y: N, ctx: N::Ctx) -> Result<N> {
    x.mul(&y, &ctx)
}

// x^2 - y^2 and (x - y)(x + y) through the generic interface.
fn difference_of_squares<N: Number>(x: &N, y: &N, ctx: &N::Ctx) -> Result<(N, N)> {
    let lhs = x.mul(x, ctx)?.sub(&y.mul(y, ctx)?, ctx)?;
    let rhs = x.sub(y, ctx)?.mul(&x.add(y, ctx)?, ctx)?;
    Ok((lhs, rhs))
}

#[test]
fn sandbox() {
    let c = mul(Integer::from(2), Integer::from(3), Exact).unwrap();
    assert_eq!(c, Integer::from(6));

    let c = mul(Float::from_si(2, 8), Float::from_si(3, 8), Precision(8)).unwrap();
    assert_eq!(c.cmp_si(6), std::cmp::Ordering::Equal);

    let ctx = RoundingContext::new(53);
    let a = RFloat::from_f64(2.0, &ctx).unwrap();
    let b = RFloat::from_f64(3.0, &ctx).unwrap();
    let c = mul(a, b, ctx).unwrap();
    assert_eq!(c.cmp_si(6), Some(std::cmp::Ordering::Equal));
}

#[test]
fn generic_identities() {
    let (l, r) = difference_of_squares(&Integer::from(-17), &Integer::from(5), &Exact).unwrap();
    assert_eq!(l, r);

    let x = Rational::from_si(3, 4).unwrap();
    let y = Rational::from_si(-2, 5).unwrap();
    let (l, r) = difference_of_squares(&x, &y, &Exact).unwrap();
    assert_eq!(l, r);

    // small integers are exact in every float format
    let ctx = RoundingContext::new(24);
    let x = RFloat::from_si(300, &ctx).unwrap();
    let y = RFloat::from_si(-41, &ctx).unwrap();
    let (l, r) = difference_of_squares(&x, &y, &ctx).unwrap();
    assert!(l == r && !l.flags().inexact());

    let (l, r) = difference_of_squares(&Float::from_si(300, 24), &Float::from_si(-41, 24), &Precision(24)).unwrap();
    assert_eq!(l, r);
}

#[test]
fn classification() {
    fn describe<N: Number>(x: &N) -> &'static str {
        if x.is_nan() {
            "nan"
        } else if x.is_infinity() {
            "infinite"
        } else if x.is_zero() {
            "zero"
        } else if x.signum() < 0 {
            "negative"
        } else {
            "positive"
        }
    }

    assert_eq!(describe(&Integer::from(-3)), "negative");
    assert_eq!(describe(&Rational::default()), "zero");
    assert_eq!(describe(&Float::from_si(5, 8)), "positive");
    assert_eq!(describe(&RFloat::nan(8)), "nan");
    assert_eq!(describe(&RFloat::infinity(true, 8)), "infinite");
    assert!(!RFloat::nan(8).is_finite() && Number::is_finite(&Integer::from(1)));
}
