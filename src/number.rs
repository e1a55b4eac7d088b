/*
    Defines a number
*/

use crate::Result;

/// The number type.
///
/// The capability set shared by every value type of this library:
/// classification, sign, and the basic ring operations performed under
/// a context that describes how (and whether) the result is rounded.
/// Equality, ordering and hashing come from the standard traits and
/// the binary encoding from [`Codec`](crate::Codec).
pub trait Number: Clone + Default {
    /// The rounding context associated with this `Number`.
    type Ctx: Context;

    /// Returns true if this `Number` encodes a zero.
    fn is_zero(&self) -> bool;

    /// Returns true if this `Number` encodes an infinity.
    fn is_infinity(&self) -> bool;

    /// Returns true if this `Number` does not encode a number.
    fn is_nan(&self) -> bool;

    /// Returns true if this `Number` encodes a finite number.
    fn is_finite(&self) -> bool {
        !self.is_infinity() && !self.is_nan()
    }

    /// Returns -1, 0 or 1 according to the sign of this `Number`.
    /// NaN reports 0.
    fn signum(&self) -> i32;

    /// Negates this `Number`, rounding the result according
    /// to the provided context.
    fn neg(&self, ctx: &Self::Ctx) -> Result<Self>;

    /// Takes the absolute value for `Number`, rounding the
    /// result according to the provided context.
    fn abs(&self, ctx: &Self::Ctx) -> Result<Self>;

    /// Adds this `Number` and another, rounding the result
    /// according to the provided context.
    fn add(&self, other: &Self, ctx: &Self::Ctx) -> Result<Self>;

    /// Subtracts another `Number` from this one, rounding the result
    /// according to the provided context.
    fn sub(&self, other: &Self, ctx: &Self::Ctx) -> Result<Self>;

    /// Multiplies this `Number` and another, rounding the result
    /// according to the provided context.
    fn mul(&self, other: &Self, ctx: &Self::Ctx) -> Result<Self>;
}

/// How a result is fitted back into its number type.
///
/// Each operation of this library is an exact real operation followed
/// by a rounding step; the context carries the parameters of that step
/// (nothing for the exact types, a precision, or a precision and a
/// [`RoundingMode`](crate::RoundingMode)).
pub trait Context {}

/// The context of the exact types (`Integer`, `Rational`):
/// results are never rounded.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Exact;

impl Context for Exact {}

/// The context of a truncating `Float`: the precision of the result.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Precision(pub u32);

impl Context for Precision {}
