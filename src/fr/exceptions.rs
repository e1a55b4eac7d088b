/*
    Exceptions
*/

/// IEEE-754 style exception flags.
///
/// Every [`RFloat`](crate::RFloat) carries the flags raised by the
/// operation that produced it; they never take part in comparisons.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Exceptions {
    invalid: bool,
    div_by_zero: bool,
    overflow: bool,
    underflow: bool,
    inexact: bool,
}

impl Exceptions {
    /// Clears all exceptions.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Returns true if any exception is raised.
    pub fn any(&self) -> bool {
        self.invalid || self.div_by_zero || self.overflow || self.underflow || self.inexact
    }

    /// An operation had no mathematically defined result.
    pub fn invalid(&self) -> bool {
        self.invalid
    }

    /// An exact infinite result was produced from finite operands.
    pub fn div_by_zero(&self) -> bool {
        self.div_by_zero
    }

    /// The rounded result exceeded the largest exponent.
    pub fn overflow(&self) -> bool {
        self.overflow
    }

    /// The rounded result was non-zero and below the smallest exponent.
    pub fn underflow(&self) -> bool {
        self.underflow
    }

    /// The result differs from the exact mathematical result.
    pub fn inexact(&self) -> bool {
        self.inexact
    }

    /// Sets the `invalid` field.
    pub fn with_invalid(mut self, raised: bool) -> Self {
        self.invalid = raised;
        self
    }

    /// Sets the `div_by_zero` field.
    pub fn with_div_by_zero(mut self, raised: bool) -> Self {
        self.div_by_zero = raised;
        self
    }

    /// Sets the `overflow` field.
    pub fn with_overflow(mut self, raised: bool) -> Self {
        self.overflow = raised;
        self
    }

    /// Sets the `underflow` field.
    pub fn with_underflow(mut self, raised: bool) -> Self {
        self.underflow = raised;
        self
    }

    /// Sets the `inexact` field.
    pub fn with_inexact(mut self, raised: bool) -> Self {
        self.inexact = raised;
        self
    }

    /// Raises every exception raised in `other` as well.
    pub fn merge(self, other: Exceptions) -> Self {
        Self {
            invalid: self.invalid || other.invalid,
            div_by_zero: self.div_by_zero || other.div_by_zero,
            overflow: self.overflow || other.overflow,
            underflow: self.underflow || other.underflow,
            inexact: self.inexact || other.inexact,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builders() {
        let mut ex = Exceptions::default().with_overflow(true).with_inexact(true);
        assert!(ex.overflow() && ex.inexact() && !ex.underflow());
        assert!(ex.merge(Exceptions::default().with_invalid(true)).invalid());
        ex.clear();
        assert!(!ex.any());
    }
}
