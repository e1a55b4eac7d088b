/*
    Text conversions of `Float`
*/

use tracing::trace;

use super::{Float, RM};
use crate::dyadic::Dyadic;
use crate::{radix, Result, RoundingMode};

impl Float {
    /// Parses `[-]digits[.digits][@exp]` in `base` (2 to 62) and truncates
    /// the value to `prec` bits.
    ///
    /// The value is `mantissa * base^exp`, with the exponent written in
    /// `base` too; for bases up to 10 it may also be introduced by `e`
    /// or `E`.
    pub fn from_str_radix(text: &str, base: u32, prec: u32) -> Result<Float> {
        trace!(base, prec, len = text.len(), "parsing float");
        crate::assert_valid_prec!(prec);
        let (num, den) = radix::parse_float(text, base)?;
        let (value, _) = Dyadic::from_ratio(&num, &den, prec, RM);
        Ok(Float { prec, value })
    }

    /// Formats this value as `(digits, exp)` with
    /// `value = 0.digits * base^exp`, the digits prefixed by `-` when
    /// negative and stripped of trailing zeros; zero is `("", 0)`.
    ///
    /// `digits == 0` prints every digit for power-of-two bases and
    /// enough digits to identify the value otherwise; the last digit
    /// is rounded to nearest.
    pub fn to_string_radix(&self, base: u32, digits: usize) -> Result<(String, i64)> {
        radix::check_base(base)?;
        Ok(radix::format_dyadic(
            &self.value,
            base,
            digits,
            self.prec,
            RoundingMode::NearestEven,
        ))
    }
}
