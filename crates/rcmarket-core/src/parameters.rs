//! # Resource Parameters
//!
//! Governance-settable constants shared by all three markets.
//!
//! ## Print Rate
//!
//! Mana regenerates over `rc_regen_ms`, so `block_interval_ms / rc_regen_ms` of
//! the token supply regenerates every block. Scaled by the premium this is the
//! phantom RC printed into each reserve per block:
//!
//! ```text
//! print_rate = total_supply × (block_interval_ms × premium) / (rc_regen_ms × precision)
//! ```
//!
//! ## Steady State
//!
//! With zero consumption the supply settles at `block_budget / (1 - decay)` and
//! the reserve at `print_rate / (1 - decay)`. The print-rate curve pins its
//! invariant to the product of those two values.

use crate::constants::*;
use crate::error::{MarketError, Result};
use crate::fixed_point::{div_by_fraction, MulShift, FIXED_POINT_SCALE};
use serde::{Deserialize, Serialize};

/// Formula for the pricing invariant `k`
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CurveFormula {
    /// `k = equilibrium_reserve × max_resources`, tunable through the print rate
    #[default]
    PrintRate,
    /// `k = resource_supply × rc_reserve`
    ConstantProduct,
}

/// Singleton market configuration
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceParameters {
    /// Target block interval
    pub block_interval_ms: u64,
    /// Time for mana to regenerate fully
    pub rc_regen_ms: u64,
    /// Per-block decay factor at 2^64 scale
    pub decay_constant: u64,
    /// `2^64 - decay_constant`
    pub one_minus_decay_constant: u64,
    pub print_rate_premium: u64,
    pub print_rate_precision: u64,
    /// Pricing curve
    #[serde(default)]
    pub formula: CurveFormula,
}

impl Default for ResourceParameters {
    fn default() -> Self {
        Self {
            block_interval_ms: BLOCK_INTERVAL_MS,
            rc_regen_ms: RC_REGEN_MS,
            decay_constant: DECAY_CONSTANT,
            one_minus_decay_constant: ONE_MINUS_DECAY_CONSTANT,
            print_rate_premium: PRINT_RATE_PREMIUM,
            print_rate_precision: PRINT_RATE_PRECISION,
            formula: CurveFormula::default(),
        }
    }
}

impl ResourceParameters {
    /// Default parameters with the decay retuned to a half-life in blocks
    pub fn with_half_life(blocks: u64) -> Result<Self> {
        let rate = MulShift::for_half_life(blocks).ok_or_else(|| {
            MarketError::InvalidParameters(format!("no decay rate for half-life {blocks}"))
        })?;

        let one_minus = if rate.shift <= 64 {
            rate.mul << (64 - rate.shift)
        } else {
            rate.mul >> (rate.shift - 64)
        };

        Self::default().with_decay(one_minus)
    }

    /// Copy with `1 - decay` replaced, keeping the pair summing to 2^64
    pub fn with_decay(mut self, one_minus_decay_constant: u64) -> Result<Self> {
        if one_minus_decay_constant == 0 {
            return Err(MarketError::InvalidParameters(
                "decay rate must be non-zero".into(),
            ));
        }
        self.one_minus_decay_constant = one_minus_decay_constant;
        self.decay_constant = (FIXED_POINT_SCALE - u128::from(one_minus_decay_constant)) as u64;
        Ok(self)
    }

    pub fn with_formula(mut self, formula: CurveFormula) -> Self {
        self.formula = formula;
        self
    }

    /// Check every invariant the pricing and settlement code relies on
    pub fn validate(&self) -> Result<()> {
        if self.block_interval_ms == 0 || self.rc_regen_ms == 0 {
            return Err(MarketError::InvalidParameters(
                "block interval and regeneration period must be non-zero".into(),
            ));
        }
        if self.print_rate_precision == 0 {
            return Err(MarketError::InvalidParameters(
                "print rate precision must be non-zero".into(),
            ));
        }
        if self.one_minus_decay_constant == 0 {
            return Err(MarketError::InvalidParameters(
                "decay rate must be non-zero".into(),
            ));
        }

        let sum = u128::from(self.decay_constant) + u128::from(self.one_minus_decay_constant);
        if sum.abs_diff(FIXED_POINT_SCALE) > 1 {
            return Err(MarketError::InvalidParameters(format!(
                "decay constants sum to {sum}, expected 2^64"
            )));
        }

        self.print_rate_multiplier().map(|_| ())
    }

    /// Per-block decay as a multiply-shift pair
    pub fn decay(&self) -> MulShift {
        MulShift::new(self.one_minus_decay_constant, 64)
    }

    /// Fraction of total supply printed as phantom RC each block
    pub fn print_rate_multiplier(&self) -> Result<MulShift> {
        let numerator = self.block_interval_ms.checked_mul(self.print_rate_premium);
        let denominator = self.rc_regen_ms.checked_mul(self.print_rate_precision);

        numerator
            .zip(denominator)
            .and_then(|(num, den)| MulShift::from_ratio(num, den))
            .ok_or_else(|| {
                MarketError::InvalidParameters(format!(
                    "print rate {} x {} / ({} x {}) must be a fraction below one",
                    self.block_interval_ms,
                    self.print_rate_premium,
                    self.rc_regen_ms,
                    self.print_rate_precision
                ))
            })
    }

    /// Phantom RC printed per block for a given total token supply
    pub fn print_rate(&self, total_supply: u64) -> Result<u64> {
        Ok(self.print_rate_multiplier()?.apply(total_supply))
    }

    /// Steady-state reserve under zero consumption
    pub fn equilibrium_reserve(&self, total_supply: u64) -> Result<u64> {
        let print_rate = self.print_rate(total_supply)?;
        Ok(div_by_fraction(print_rate, self.one_minus_decay_constant))
    }

    /// Steady-state supply under zero consumption
    pub fn max_resources(&self, block_budget: u64) -> u64 {
        div_by_fraction(block_budget, self.one_minus_decay_constant)
    }

    /// Blocks needed for mana to regenerate fully
    pub fn blocks_per_regen(&self) -> u64 {
        (self.rc_regen_ms / self.block_interval_ms.max(1)).max(1)
    }
}
