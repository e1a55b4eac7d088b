/*
    Errors
*/

use thiserror::Error;

/// Failures signaled by the numeric core.
///
/// Every operation either returns a well-formed canonical value or one of
/// these; no partially constructed value escapes.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum Error {
    /// A division, modulo or inversion whose divisor is zero.
    #[error("division by zero")]
    DivisionByZero,

    /// The operation needs the correctly-rounded engine,
    /// which is not part of this build.
    #[error("unimplemented in this build: {0}")]
    Unimplemented(&'static str),

    /// An argument outside the mathematical domain of the operation.
    #[error("domain error: {0}")]
    Domain(String),

    /// The value does not fit in the requested machine type.
    #[error("value does not fit in the target type")]
    Overflow,

    /// Malformed text representation.
    #[error("parse error: {0}")]
    Parse(String),

    /// Malformed binary encoding.
    #[error("decode error: {0}")]
    Decode(String),

    /// The correctly-rounded engine gave up refining an approximation.
    #[error("rounding could not be decided: {0}")]
    RoundingUndecided(&'static str),
}

/// Result type of the numeric core.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn domain(msg: impl Into<String>) -> Self {
        Error::Domain(msg.into())
    }
}
