//! # Fixed-Point Arithmetic
//!
//! Integer helpers shared by pricing and settlement.
//!
//! Multiplication by a factor below one is expressed as a multiply followed by
//! a right shift:
//!
//! ```text
//! x * r  ≈  (x * mul) >> shift        with mul < 2^shift
//! ```
//!
//! `x` and `mul` are both at most 64 bits, so the product always fits in a
//! `u128` and the shifted result never exceeds `x`.

use serde::{Deserialize, Serialize};

/// Scale of the 2^64 fixed-point decay constants
pub const FIXED_POINT_SCALE: u128 = 1 << 64;

/// Multiplier width used when deriving a pair from a ratio or half-life
pub const MUL_SHIFT_BITS: u32 = 32;

/// Narrow a `u128` to `u64`, saturating at `u64::MAX`
#[inline]
pub fn saturate_u64(value: u128) -> u64 {
    u64::try_from(value).unwrap_or(u64::MAX)
}

/// Division rounding toward positive infinity
///
/// # Panics
///
/// Panics when `denominator` is zero.
#[inline]
pub fn ceil_div(numerator: u128, denominator: u128) -> u128 {
    assert!(denominator != 0, "ceil_div by zero");
    numerator / denominator + u128::from(numerator % denominator != 0)
}

/// `value / (fraction / 2^64)`, saturating at `u64::MAX`
///
/// A zero fraction yields `u64::MAX`.
pub fn div_by_fraction(value: u64, fraction: u64) -> u64 {
    if fraction == 0 {
        return u64::MAX;
    }
    saturate_u64((u128::from(value) << 64) / u128::from(fraction))
}

/// Multiplication by `mul / 2^shift`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MulShift {
    pub mul: u64,
    pub shift: u32,
}

impl MulShift {
    pub const fn new(mul: u64, shift: u32) -> Self {
        Self { mul, shift }
    }

    /// Zero factor
    pub const fn zero() -> Self {
        Self { mul: 0, shift: 0 }
    }

    /// Derive a pair approximating `numerator / denominator`.
    ///
    /// Picks the largest shift that keeps `mul` below 2^32 and rounds the
    /// multiplier to nearest. Returns `None` unless `0 <= ratio < 1`.
    pub fn from_ratio(numerator: u64, denominator: u64) -> Option<Self> {
        if denominator == 0 || numerator >= denominator {
            return None;
        }
        if numerator == 0 {
            return Some(Self::zero());
        }

        let num = u128::from(numerator);
        let den = u128::from(denominator);
        let ceiling = den << MUL_SHIFT_BITS;

        // Largest shift with num * 2^shift < den * 2^32. Bounded by 96 since
        // num >= 1 and den < 2^64.
        let mut shift = 0u32;
        while (num << (shift + 1)) < ceiling {
            shift += 1;
        }

        let mul = ((num << (shift + 1)) + den) / (den << 1);
        Some(Self::new(mul as u64, shift))
    }

    /// Derive the per-block rate `r` for which `(1 - r)^blocks = 1/2`.
    ///
    /// Floating point is only used to author constants; the resulting pair is
    /// applied with integer arithmetic.
    pub fn for_half_life(blocks: u64) -> Option<Self> {
        if blocks == 0 {
            return None;
        }

        let rate = -(-std::f64::consts::LN_2 / blocks as f64).exp_m1();
        if !(rate > 0.0 && rate < 1.0) {
            return None;
        }

        let limit = (1u64 << MUL_SHIFT_BITS) as f64;
        let mut shift = 0u32;
        while rate * 2f64.powi(shift as i32 + 1) < limit && shift < 126 {
            shift += 1;
        }

        let mul = (0.5 + rate * 2f64.powi(shift as i32)) as u64;
        Some(Self::new(mul, shift))
    }

    /// `(x * mul) >> shift`
    #[inline]
    pub fn apply(&self, x: u64) -> u64 {
        let product = u128::from(x) * u128::from(self.mul);
        saturate_u64(product.checked_shr(self.shift).unwrap_or(0))
    }

    /// `x - (x * mul >> shift)`, the exponential decay step
    #[inline]
    pub fn decay(&self, x: u64) -> u64 {
        x.saturating_sub(self.apply(x))
    }

    /// True when the pair represents a factor strictly below one
    pub fn is_fraction(&self) -> bool {
        match 1u128.checked_shl(self.shift) {
            Some(unit) => u128::from(self.mul) < unit,
            None => true,
        }
    }

    /// Approximate value, for display only
    pub fn as_f64(&self) -> f64 {
        self.mul as f64 / 2f64.powi(self.shift as i32)
    }
}
