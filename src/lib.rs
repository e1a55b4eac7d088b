/*
    Top-level
*/

//! Arbitrary-precision integers, rationals and binary floats.
//!
//! Four value types share one exact binary substrate:
//!  - [`Integer`]: signed integers of unbounded size,
//!  - [`Rational`]: fractions kept in lowest terms,
//!  - [`Float`]: binary floats at an explicit precision, truncating,
//!  - [`RFloat`]: binary floats whose every operation is correctly rounded
//!    under an explicit [`RoundingMode`].
//!
//! Values are plain owned data: they are `Send + Sync` and can be shared
//! read-only between threads. In-place variants (`set_*`) take `&mut self`,
//! so concurrent mutation needs the usual external synchronization.
//! A [`RandState`] is mutated by every sampling call.

mod dyadic;
mod error;
mod number;
mod ops;
mod radix;
mod round;

pub mod float;
pub mod fr;
pub mod integer;
pub mod random;
pub mod rational;

#[cfg(feature = "serialize")]
pub mod codec;

pub use error::*;
pub use number::*;
pub use ops::*;
pub use round::*;

pub use float::Float;
pub use fr::{Exceptions, RFloat, RoundingContext};
pub use integer::{Integer, Primality};
pub use random::RandState;
pub use rational::Rational;

#[cfg(feature = "serialize")]
pub use codec::Codec;

/// Modulus used by every hash function of this crate.
///
/// The largest prime below `2^32`; an `Integer` hashes to its residue
/// modulo this value, a `Rational` combines the residues of its canonical
/// numerator and denominator.
pub const HASH_MODULUS: u64 = 4_294_967_291;

/// Smallest supported precision, in bits.
pub const PREC_MIN: u32 = 1;

/// Largest supported precision, in bits.
pub const PREC_MAX: u32 = u32::MAX >> 2;

/// Returns the version of this library.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// Returns true if the correctly-rounded float engine was compiled in.
///
/// When this is false, every [`RFloat`] operation fails with
/// [`Error::Unimplemented`].
pub const fn engine_available() -> bool {
    cfg!(feature = "correct-rounding")
}

macro_rules! assert_valid_prec {
    ($p:expr) => {
        assert!(
            ($crate::PREC_MIN <= $p) && ($p <= $crate::PREC_MAX),
            "invalid precision, must be {} <= p <= {}: {}",
            $crate::PREC_MIN,
            $crate::PREC_MAX,
            $p
        );
    };
}

pub(crate) use assert_valid_prec;
