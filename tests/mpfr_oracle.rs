/*
    Cross-checks against MPFR
*/

#![cfg(feature = "mpfr-oracle")]

use rug::float::Round;

use mpnum::*;

const INPUTS: [f64; 10] = [0.5, 0.75, 1.0, 1.1, 2.0, 3.0, 10.0, 0.001, 123.456, 1e10];

const MODES: [(RoundingMode, Round); 4] = [
    (RoundingMode::NearestEven, Round::Nearest),
    (RoundingMode::ToZero, Round::Zero),
    (RoundingMode::ToPositive, Round::Up),
    (RoundingMode::ToNegative, Round::Down),
];

fn check(name: &str, ours: &RFloat, theirs: &rug::Float) {
    let expect = theirs.to_rational().map(|q| q.to_string());
    let got = ours.to_rational().ok().map(|q| q.to_string());
    assert_eq!(got, expect, "{}: got {} expected {}", name, ours, theirs);
}

#[test]
fn arithmetic() {
    for prec in [8, 53, 113] {
        for &a in &INPUTS {
            for &b in &INPUTS {
                for (rm, rnd) in MODES {
                    let ctx = RoundingContext::new(prec).rounding_mode(rm);
                    let x = RFloat::from_f64(a, &RoundingContext::new(53)).unwrap();
                    let y = RFloat::from_f64(-b, &RoundingContext::new(53)).unwrap();
                    let rx = rug::Float::with_val(53, a);
                    let ry = rug::Float::with_val(53, -b);

                    let (r, _) = rug::Float::with_val_round(prec, &rx + &ry, rnd);
                    check("add", &x.add(&y, &ctx).unwrap(), &r);
                    let (r, _) = rug::Float::with_val_round(prec, &rx * &ry, rnd);
                    check("mul", &x.mul(&y, &ctx).unwrap(), &r);
                    let (r, _) = rug::Float::with_val_round(prec, &rx / &ry, rnd);
                    check("div", &x.div(&y, &ctx).unwrap(), &r);
                }
            }
        }
    }
}

#[test]
fn elementary_functions() {
    type Ours = fn(&RFloat, &RoundingContext) -> Result<RFloat>;
    type Theirs = fn(&rug::Float, u32, Round) -> rug::Float;
    let ops: [(&str, Ours, Theirs); 8] = [
        ("sqrt", RFloat::sqrt, |x, p, rnd| rug::Float::with_val_round(p, x.sqrt_ref(), rnd).0),
        ("exp", RFloat::exp, |x, p, rnd| rug::Float::with_val_round(p, x.exp_ref(), rnd).0),
        ("ln", RFloat::ln, |x, p, rnd| rug::Float::with_val_round(p, x.ln_ref(), rnd).0),
        ("sin", RFloat::sin, |x, p, rnd| rug::Float::with_val_round(p, x.sin_ref(), rnd).0),
        ("cos", RFloat::cos, |x, p, rnd| rug::Float::with_val_round(p, x.cos_ref(), rnd).0),
        ("atan", RFloat::atan, |x, p, rnd| rug::Float::with_val_round(p, x.atan_ref(), rnd).0),
        ("sinh", RFloat::sinh, |x, p, rnd| rug::Float::with_val_round(p, x.sinh_ref(), rnd).0),
        ("tanh", RFloat::tanh, |x, p, rnd| rug::Float::with_val_round(p, x.tanh_ref(), rnd).0),
    ];

    for prec in [24, 53, 100] {
        for &a in &INPUTS[..9] {
            let x = RFloat::from_f64(a, &RoundingContext::new(53)).unwrap();
            let rx = rug::Float::with_val(53, a);
            for (rm, rnd) in MODES {
                let ctx = RoundingContext::new(prec).rounding_mode(rm);
                for (name, ours, theirs) in ops {
                    check(name, &ours(&x, &ctx).unwrap(), &theirs(&rx, prec, rnd));
                }
            }
        }
    }
}
