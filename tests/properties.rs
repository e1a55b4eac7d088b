/*
    Property tests
*/

use proptest::prelude::*;

use mpnum::*;

fn moderate() -> impl Strategy<Value = f64> {
    (1.0f64..2.0, -60i32..60, any::<bool>())
        .prop_map(|(m, e, neg)| if neg { -m * 2f64.powi(e) } else { m * 2f64.powi(e) })
}

fn big_integer() -> impl Strategy<Value = Integer> {
    (any::<i64>(), any::<u64>(), 0u64..100).prop_map(|(hi, lo, shift)| {
        Integer::from(hi).mul_2exp(64 + shift).add(&Integer::from(lo))
    })
}

proptest! {
    #[test]
    fn division_families_reconstruct(n in big_integer(), d in any::<i64>().prop_filter("non-zero", |d| *d != 0)) {
        let d = Integer::from(d);
        for (q, r) in [n.tdiv_qr(&d).unwrap(), n.fdiv_qr(&d).unwrap(), n.cdiv_qr(&d).unwrap()] {
            prop_assert_eq!(&(&q * &d) + &r, n.clone());
            prop_assert!(r.cmp_abs(&d) == std::cmp::Ordering::Less);
        }
        let r = n.fdiv_r(&d).unwrap();
        prop_assert!(r.is_zero() || r.signum() == d.signum());
        let r = n.tdiv_r(&d).unwrap();
        prop_assert!(r.is_zero() || r.signum() == n.signum());
        let r = n.cdiv_r(&d).unwrap();
        prop_assert!(r.is_zero() || r.signum() == -d.signum());
    }

    #[test]
    fn extended_gcd(a in big_integer(), b in big_integer()) {
        let (g, s, t) = a.gcdext(&b);
        prop_assert_eq!(&(&s * &a) + &(&t * &b), g.clone());
        prop_assert_eq!(g.clone(), a.gcd(&b));
        if !g.is_zero() {
            prop_assert!(a.is_divisible(&g) && b.is_divisible(&g));
        }
    }

    #[test]
    fn modular_inverse(
        a in prop_oneof![big_integer(), any::<i64>().prop_map(Integer::from)],
        m in prop_oneof![Just(1i64), Just(-1i64), any::<i64>().prop_filter("non-zero", |m| *m != 0)],
    ) {
        let m = Integer::from(m);
        match a.invert(&m).unwrap() {
            Some(i) => {
                prop_assert_eq!(a.gcd(&m), Integer::from(1));
                prop_assert!(i.signum() >= 0 && i.cmp_abs(&m) == std::cmp::Ordering::Less);
                prop_assert_eq!((&a * &i).modulo(&m).unwrap(), Integer::from(1).modulo(&m).unwrap());
            }
            None => prop_assert!(a.gcd(&m) != Integer::from(1)),
        }
    }

    #[test]
    fn integer_text(n in big_integer(), base in 2u32..=62) {
        let text = n.to_string_radix(base).unwrap();
        prop_assert_eq!(Integer::from_str_radix(&text, base).unwrap(), n);
    }

    #[test]
    fn rationals_are_canonical(num in any::<i64>(), den in any::<i64>().prop_filter("non-zero", |d| *d != 0)) {
        let q = Rational::from_si(num, den).unwrap();
        prop_assert!(q.denom().signum() > 0);
        prop_assert_eq!(q.numer().gcd(q.denom()), Integer::from(1));
        let scaled = Rational::new(q.numer().mul_si(-3), q.denom().mul_si(-3)).unwrap();
        prop_assert_eq!(scaled, q);
    }

    #[test]
    fn rational_to_double_is_nearest(num in -(1i64 << 53)..(1i64 << 53), den in 1i64..(1i64 << 53)) {
        let q = Rational::from_si(num, den).unwrap();
        prop_assert_eq!(q.to_f64(), num as f64 / den as f64);
    }

    #[test]
    fn fr_matches_ieee_doubles(a in moderate(), b in moderate()) {
        let ctx = RoundingContext::new(53);
        let x = RFloat::from_f64(a, &ctx).unwrap();
        let y = RFloat::from_f64(b, &ctx).unwrap();
        let val = |r: Result<RFloat>| r.unwrap().to_f64(RoundingMode::NearestEven).unwrap();
        prop_assert_eq!(val(x.add(&y, &ctx)), a + b);
        prop_assert_eq!(val(x.sub(&y, &ctx)), a - b);
        prop_assert_eq!(val(x.mul(&y, &ctx)), a * b);
        prop_assert_eq!(val(x.div(&y, &ctx)), a / b);
        prop_assert_eq!(val(x.abs(&ctx).unwrap().sqrt(&ctx)), a.abs().sqrt());
    }

    #[test]
    fn directed_rounding_brackets(a in moderate(), b in moderate(), prec in 2u32..80) {
        let exact = Rational::from_f64(a).unwrap().div(&Rational::from_f64(b).unwrap()).unwrap();
        let at = |rm| {
            let ctx = RoundingContext::new(prec).rounding_mode(rm);
            let x = RFloat::from_f64(a, &RoundingContext::new(53)).unwrap();
            let y = RFloat::from_f64(b, &RoundingContext::new(53)).unwrap();
            x.div(&y, &ctx).unwrap()
        };
        let down = at(RoundingMode::ToNegative).to_rational().unwrap();
        let up = at(RoundingMode::ToPositive).to_rational().unwrap();
        let near = at(RoundingMode::NearestEven).to_rational().unwrap();
        prop_assert!(down <= exact && exact <= up);
        prop_assert!(near == down || near == up);
        if down != up {
            prop_assert!(near.sub(&exact).abs() <= up.sub(&down).abs());
        }
    }

    #[test]
    fn floats_truncate(a in moderate(), b in moderate(), prec in 1u32..60) {
        let x = Float::from_f64(a, 53).unwrap();
        let y = Float::from_f64(b, 53).unwrap();
        let exact = x.to_rational().mul(&y.to_rational());
        let r = x.mul(&y, prec);
        prop_assert_eq!(r.prec(), prec);
        prop_assert!(r.to_rational().abs() <= exact.abs());
        prop_assert!(r.signum() == exact.signum() || r.is_zero());
    }

    #[test]
    fn hashes_follow_equality(num in any::<i32>(), den in 1i32..1000, k in 1i32..50) {
        let a = Rational::from_si(num as i64, den as i64).unwrap();
        let b = Rational::from_si(num as i64 * k as i64, den as i64 * k as i64).unwrap();
        prop_assert_eq!(a.hash_value(), b.hash_value());
        prop_assert!(Integer::from(num).hash_value() < HASH_MODULUS);
    }
}

#[cfg(feature = "serialize")]
proptest! {
    #[test]
    fn codec_is_exact(n in big_integer(), a in moderate(), prec in 1u32..200) {
        prop_assert_eq!(Integer::from_bytes(&n.to_bytes().unwrap()).unwrap(), n.clone());

        let q = Rational::new(n, Integer::from(7)).unwrap();
        prop_assert_eq!(Rational::from_bytes(&q.to_bytes().unwrap()).unwrap(), q);

        let f = Float::from_f64(a, prec).unwrap();
        let back = Float::from_bytes(&f.to_bytes().unwrap()).unwrap();
        prop_assert!(back == f && back.prec() == prec);

        let r = RFloat::from_f64(a, &RoundingContext::new(prec)).unwrap();
        prop_assert!(RFloat::from_bytes(&r.to_bytes().unwrap()).unwrap().is_identical(&r));
    }
}
