// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Accumulator for `i64` metrics.

use core::fmt::{self, Debug};
use core::ops::{Add, Mul, Sub};

/// Signed integer accumulator for areas and squared distances over `i64`
/// coordinates.
///
/// A span between two `i64` values needs 65 bits, and an area or a sum of two
/// squared spans needs up to 130, which `i128` cannot hold. The value is
/// `hi * 2^128 + lo`, so ordering compares `hi` first, then `lo`.
///
/// Addition and subtraction are exact. Multiplication is exact when both
/// operands fit in `i128`, which holds for every product the tree forms: spans
/// are multiplied, never areas.
#[derive(Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WideInt {
    hi: i128,
    lo: u128,
}

impl WideInt {
    /// The value as an `i128`, or `None` if it does not fit.
    pub const fn to_i128(self) -> Option<i128> {
        let lo = self.lo.cast_signed();
        match self.hi {
            0 if lo >= 0 => Some(lo),
            -1 if lo < 0 => Some(lo),
            _ => None,
        }
    }
}

impl From<i128> for WideInt {
    fn from(v: i128) -> Self {
        Self {
            hi: if v < 0 { -1 } else { 0 },
            lo: v.cast_unsigned(),
        }
    }
}

impl Add for WideInt {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        let (lo, carry) = self.lo.overflowing_add(rhs.lo);
        Self {
            hi: self.hi + rhs.hi + i128::from(carry),
            lo,
        }
    }
}

impl Sub for WideInt {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        let (lo, borrow) = self.lo.overflowing_sub(rhs.lo);
        Self {
            hi: self.hi - rhs.hi - i128::from(borrow),
            lo,
        }
    }
}

impl Mul for WideInt {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        let (Some(a), Some(b)) = (self.to_i128(), rhs.to_i128()) else {
            panic!("WideInt product of {self:?} and {rhs:?} exceeds its range");
        };
        let (hi, lo) = widening_mul(a.unsigned_abs(), b.unsigned_abs());
        let magnitude = Self {
            hi: hi.cast_signed(),
            lo,
        };
        if (a < 0) != (b < 0) {
            Self::default() - magnitude
        } else {
            magnitude
        }
    }
}

/// Full 256-bit product of two `u128` values as `(high, low)` halves.
fn widening_mul(a: u128, b: u128) -> (u128, u128) {
    const MASK: u128 = (1 << 64) - 1;
    let (a1, a0) = (a >> 64, a & MASK);
    let (b1, b0) = (b >> 64, b & MASK);
    let p00 = a0 * b0;
    let p01 = a0 * b1;
    let p10 = a1 * b0;
    let p11 = a1 * b1;
    let mid = (p00 >> 64) + (p01 & MASK) + (p10 & MASK);
    let lo = (p00 & MASK) | (mid << 64);
    let hi = p11 + (p01 >> 64) + (p10 >> 64) + (mid >> 64);
    (hi, lo)
}

impl Debug for WideInt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_i128() {
            Some(v) => write!(f, "{v}"),
            None => f
                .debug_struct("WideInt")
                .field("hi", &self.hi)
                .field("lo", &self.lo)
                .finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn w(v: i128) -> WideInt {
        WideInt::from(v)
    }

    #[test]
    fn small_values_behave_like_i128() {
        assert_eq!(w(7) + w(-9), w(-2));
        assert_eq!(w(-2) - w(-2), w(0));
        assert_eq!(w(-6) * w(7), w(-42));
        assert_eq!(w(-6) * w(-7), w(42));
        assert!(w(-1) < w(0));
        assert!(w(-100) < w(-99));
        assert_eq!((w(3) - w(10)).to_i128(), Some(-7));
    }

    #[test]
    fn products_beyond_i128_keep_their_order() {
        let big = w(i128::from(u64::MAX));
        let sq = big * big;
        assert_eq!(sq.to_i128(), None, "(2^64 - 1)^2 does not fit in i128");
        assert!(sq > w(i128::MAX));
        let sum = sq + sq;
        assert!(sum > sq);
        assert_eq!(sum - sq, sq);
        assert_eq!(sum.hi, 1);
        let neg = w(0) - sum;
        assert!(neg < w(i128::MIN));
        assert_eq!(neg + sum, w(0));
        assert_eq!(w(-(1 << 100)) * w(1 << 100), w(0) - w(1 << 100) * w(1 << 100));
    }

    #[test]
    fn widening_mul_matches_known_products() {
        assert_eq!(widening_mul(u128::MAX, u128::MAX), (u128::MAX - 1, 1));
        assert_eq!(widening_mul(1 << 64, 1 << 64), (1, 0));
        assert_eq!(widening_mul(12345, 678), (0, 12345 * 678));
    }

    #[test]
    fn debug_prints_plain_values() {
        use alloc::format;
        assert_eq!(format!("{:?}", w(-5)), "-5");
        let big = w(i128::from(u64::MAX)) * w(i128::from(u64::MAX));
        assert!(format!("{big:?}").starts_with("WideInt"));
    }
}
