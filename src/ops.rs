/*
    Operations
*/

use crate::{Number, Result};

/// Outcome of a rounding operation: the rounded value and
/// whether it equals its input exactly.
#[derive(Clone, Debug, PartialEq)]
pub enum RoundResult<N> {
    Exact(N),
    Inexact(N),
}

impl<N> RoundResult<N> {
    /// Returns the rounded value.
    pub fn value(self) -> N {
        match self {
            RoundResult::Exact(v) | RoundResult::Inexact(v) => v,
        }
    }

    /// Returns true if no rounding error occurred.
    pub fn is_exact(&self) -> bool {
        matches!(self, RoundResult::Exact(_))
    }
}

/// Conversion of one number type into another under the
/// rounding context of the target type.
pub trait Round<N: Number> {
    /// Performs a rounding operation returning the result.
    /// The output type may differ from the input type.
    fn round(&self, ctx: &N::Ctx) -> Result<N> {
        self.round_exact(ctx).map(RoundResult::value)
    }

    /// Like [`Round::round`] but also reports whether
    /// the conversion was exact.
    fn round_exact(&self, ctx: &N::Ctx) -> Result<RoundResult<N>>;
}

// Implements a std binary operator and its assigning form for every
// owned/borrowed combination by forwarding to an inherent
// `fn(&T, &T) -> T` method.
macro_rules! impl_binop {
    ($T:ty, $Op:ident, $op:ident, $OpAssign:ident, $op_assign:ident, $method:path) => {
        impl std::ops::$Op<&$T> for &$T {
            type Output = $T;

            fn $op(self, rhs: &$T) -> $T {
                $method(self, rhs)
            }
        }

        impl std::ops::$Op<$T> for &$T {
            type Output = $T;

            fn $op(self, rhs: $T) -> $T {
                $method(self, &rhs)
            }
        }

        impl std::ops::$Op<&$T> for $T {
            type Output = $T;

            fn $op(self, rhs: &$T) -> $T {
                $method(&self, rhs)
            }
        }

        impl std::ops::$Op<$T> for $T {
            type Output = $T;

            fn $op(self, rhs: $T) -> $T {
                $method(&self, &rhs)
            }
        }

        impl std::ops::$OpAssign<&$T> for $T {
            fn $op_assign(&mut self, rhs: &$T) {
                *self = $method(self, rhs);
            }
        }

        impl std::ops::$OpAssign<$T> for $T {
            fn $op_assign(&mut self, rhs: $T) {
                *self = $method(self, &rhs);
            }
        }
    };
}

// Implements a std unary operator for the owned and borrowed
// forms by forwarding to an inherent `fn(&T) -> T` method.
macro_rules! impl_unop {
    ($T:ty, $Op:ident, $op:ident, $method:path) => {
        impl std::ops::$Op for &$T {
            type Output = $T;

            fn $op(self) -> $T {
                $method(self)
            }
        }

        impl std::ops::$Op for $T {
            type Output = $T;

            fn $op(self) -> $T {
                $method(&self)
            }
        }
    };
}

pub(crate) use impl_binop;
pub(crate) use impl_unop;
