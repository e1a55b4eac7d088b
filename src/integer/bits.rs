/*
    Bitwise operations (two's complement)
*/

use bitvec::prelude::{BitVec, Lsb0};
use num_bigint::BigUint;
use num_integer::Integer as _;
use num_traits::Signed;

use super::Integer;

// Bits of a magnitude, least significant first.
fn bits_of(n: &BigUint) -> BitVec<u32, Lsb0> {
    BitVec::from_vec(n.to_u32_digits())
}

// Index of the first one bit at or above `start` of a magnitude.
fn scan1_mag(n: &BigUint, start: u64) -> Option<u64> {
    let bv = bits_of(n);
    let start = usize::try_from(start).ok().filter(|&s| s < bv.len())?;
    bv[start..].first_one().map(|i| (start + i) as u64)
}

// Index of the first zero bit at or above `start` of a magnitude.
fn scan0_mag(n: &BigUint, start: u64) -> u64 {
    let bv = bits_of(n);
    match usize::try_from(start).ok().filter(|&s| s < bv.len()) {
        Some(s) => bv[s..].first_zero().map_or(bv.len() as u64, |i| (s + i) as u64),
        None => start,
    }
}

impl Integer {
    pub fn and(&self, other: &Integer) -> Integer {
        Integer(&self.0 & &other.0)
    }

    pub fn or(&self, other: &Integer) -> Integer {
        Integer(&self.0 | &other.0)
    }

    pub fn xor(&self, other: &Integer) -> Integer {
        Integer(&self.0 ^ &other.0)
    }

    /// One's complement, `-self - 1`.
    pub fn com(&self) -> Integer {
        Integer(!&self.0)
    }

    /// Number of one bits. A negative value has infinitely many,
    /// reported as `None`.
    pub fn popcount(&self) -> Option<u64> {
        if self.0.is_negative() {
            None
        } else {
            Some(bits_of(self.0.magnitude()).count_ones() as u64)
        }
    }

    /// Number of differing bits. `None` when the signs differ
    /// (infinitely many differences).
    pub fn hamdist(&self, other: &Integer) -> Option<u64> {
        if self.0.is_negative() != other.0.is_negative() {
            None
        } else {
            // same signs: the xor is non-negative
            self.xor(other).popcount()
        }
    }

    /// Index of the first zero bit at or above `start`.
    /// `None` when there is none (negative values end in ones).
    pub fn scan0(&self, start: u64) -> Option<u64> {
        if self.0.is_negative() {
            // the zeros of `x` are the ones of `-x - 1 >= 0`
            scan1_mag(self.com().0.magnitude(), start)
        } else {
            Some(scan0_mag(self.0.magnitude(), start))
        }
    }

    /// Index of the first one bit at or above `start`.
    /// `None` when there is none (non-negative values end in zeros).
    pub fn scan1(&self, start: u64) -> Option<u64> {
        if self.0.is_negative() {
            Some(scan0_mag(self.com().0.magnitude(), start))
        } else {
            scan1_mag(self.0.magnitude(), start)
        }
    }

    /// Value of the bit at `index` of the two's complement representation.
    pub fn test_bit(&self, index: u64) -> bool {
        if self.0.is_negative() {
            !(self.com().0.magnitude() >> index).is_odd()
        } else {
            (self.0.magnitude() >> index).is_odd()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scans() {
        let x = Integer::from(0b1011_0000u32);
        assert_eq!(x.scan1(0), Some(4));
        assert_eq!(x.scan1(6), Some(7));
        assert_eq!(x.scan1(8), None);
        assert_eq!(x.scan0(4), Some(6));
        assert_eq!(x.scan0(1000), Some(1000));

        // ...11110100
        let y = Integer::from(-12);
        assert_eq!(y.scan1(0), Some(2));
        assert_eq!(y.scan0(2), Some(3));
        assert_eq!(y.scan0(4), None);
        assert_eq!(y.scan1(100), Some(100));
        assert!(y.test_bit(2));
        assert!(!y.test_bit(3));
        assert!(y.test_bit(64));
    }

    #[test]
    fn counts() {
        assert_eq!(Integer::from(255).popcount(), Some(8));
        assert_eq!(Integer::from(-1).popcount(), None);
        assert_eq!(Integer::from(-1).hamdist(&Integer::from(-4)), Some(2));
        assert_eq!(Integer::from(1).hamdist(&Integer::from(-4)), None);
    }
}
