/*
    Builds without the correctly-rounded engine
*/

#![cfg(not(feature = "correct-rounding"))]

use mpnum::*;

#[test]
fn engine_left_out() {
    assert!(!engine_available());

    let ctx = RoundingContext::new(53);
    assert!(matches!(RFloat::from_si(2, &ctx), Err(Error::Unimplemented(_))));
    assert!(matches!(RFloat::pi(&ctx), Err(Error::Unimplemented(_))));

    let x = RFloat::new(53);
    let unary: [fn(&RFloat, &RoundingContext) -> Result<RFloat>; 6] =
        [RFloat::sqrt, RFloat::exp, RFloat::ln, RFloat::sin, RFloat::atan, RFloat::tanh];
    for op in unary {
        assert!(matches!(op(&x, &ctx), Err(Error::Unimplemented(_))));
    }
    assert!(matches!(x.add(&x, &ctx), Err(Error::Unimplemented("add"))));
    assert!(matches!(x.pow(&x, &ctx), Err(Error::Unimplemented("pow"))));
    assert!(matches!(x.floor(53), Err(Error::Unimplemented("floor"))));

    // the exact types do not depend on it
    assert_eq!(Integer::from(6).mul(&Integer::from(7)), Integer::from(42));
    assert_eq!(Float::from_si(3, 8).add(&Float::from_si(4, 8), 8).to_f64(), 7.0);
}
