//! # RC Market Core
//!
//! Per-block resource bandwidth market. Raw consumption of three congestible
//! resources is priced in resource credits (RC) and capped by a hard per-block
//! ceiling.
//!
//! ## Market Dynamics
//!
//! ```text
//!   consume ──► resource_supply ──decay──► + block_budget
//!                     │
//!                  quote (k / x curve)
//!                     │
//!   consumed × cost ──► rc_reserve ──decay──► + phantom RC ──► clamp
//! ```
//!
//! Every quantity is an integer. Products are formed in `u128` and narrowed
//! back to `u64` through the helpers in [`fixed_point`].
//!
//! ## Default Markets
//!
//! | Resource | Supply | Block Budget | Block Limit |
//! |----------|--------|--------------|-------------|
//! | Disk | 65,814,606,811 | 39,600 | 204,800 |
//! | Network | 435,679,401,211 | 262,144 | 1,048,576 |
//! | Compute | 95,564,138,678,271 | 57,500,000 | 287,500,000 |

pub mod error;
pub mod fixed_point;
pub mod parameters;
pub mod pricing;
pub mod settlement;
pub mod types;

pub use error::{Authority, MarketError, Result};
pub use fixed_point::{ceil_div, div_by_fraction, saturate_u64, MulShift};
pub use parameters::{CurveFormula, ResourceParameters};
pub use pricing::{invariant, quote, quote_with_invariant, Quote};
pub use settlement::{settle, settle_detailed, Settlement};
pub use types::*;

/// Market and parameter defaults
pub mod constants {
    /// Base units per whole token
    pub const SATOSHI_PER_TOKEN: u64 = 100_000_000;

    /// Reference total token supply: 100M tokens
    pub const REFERENCE_TOTAL_SUPPLY: u64 = 100_000_000 * SATOSHI_PER_TOKEN;

    /// Target block interval: 3 seconds
    pub const BLOCK_INTERVAL_MS: u64 = 3_000;

    /// Mana fully regenerates over five days
    pub const RC_REGEN_MS: u64 = 432_000_000;

    /// RC granted per unit of mana
    pub const RC_PER_MANA: u64 = 10_000;

    /// Half-life of supply and reserve decay: 60 days of 3s blocks
    pub const DECAY_HALF_LIFE_BLOCKS: u64 = 20 * 60 * 24 * 60;

    /// `1 - decay` at 2^64 scale for the default half-life.
    /// Equal to the multiply-shift pair `(0xd75a712f, 53)`.
    pub const ONE_MINUS_DECAY_CONSTANT: u64 = 0xd75a_712f << 11;

    /// Decay constant at 2^64 scale
    pub const DECAY_CONSTANT: u64 = 0u64.wrapping_sub(ONE_MINUS_DECAY_CONSTANT);

    /// Phantom RC print-rate premium over the mana regeneration rate
    pub const PRINT_RATE_PREMIUM: u64 = 10;

    /// Denominator of the print-rate premium
    pub const PRINT_RATE_PRECISION: u64 = 1;

    /// Initial RC reserve shared by all markets
    pub const INITIAL_RC_RESERVE: u64 = 34_624_687_927 * SATOSHI_PER_TOKEN;

    /// Disk: 10G per month
    pub const DISK_BUDGET_PER_BLOCK: u64 = 39_600;
    /// Disk: 200k per block
    pub const MAX_DISK_PER_BLOCK: u64 = 200 << 10;
    pub const DISK_INITIAL_RESOURCE_SUPPLY: u64 = 65_814_606_811;

    /// Network: 256k block
    pub const NETWORK_BUDGET_PER_BLOCK: u64 = 1 << 18;
    /// Network: 1M block
    pub const MAX_NETWORK_PER_BLOCK: u64 = 1 << 20;
    pub const NETWORK_INITIAL_RESOURCE_SUPPLY: u64 = 435_679_401_211;

    /// Compute: ~0.1s
    pub const COMPUTE_BUDGET_PER_BLOCK: u64 = 57_500_000;
    /// Compute: ~0.5s
    pub const MAX_COMPUTE_PER_BLOCK: u64 = 287_500_000;
    pub const COMPUTE_INITIAL_RESOURCE_SUPPLY: u64 = 95_564_138_678_271;
}

pub use constants::*;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::{Authority, MarketError, Result};
    pub use crate::parameters::{CurveFormula, ResourceParameters};
    pub use crate::pricing::{quote, Quote};
    pub use crate::settlement::settle;
    pub use crate::types::*;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decay_constants_sum_to_scale() {
        let sum = u128::from(DECAY_CONSTANT) + u128::from(ONE_MINUS_DECAY_CONSTANT);
        assert_eq!(sum, 1u128 << 64);
    }

    #[test]
    fn test_reference_supply() {
        assert_eq!(REFERENCE_TOTAL_SUPPLY, 10_000_000_000_000_000);
    }
}
