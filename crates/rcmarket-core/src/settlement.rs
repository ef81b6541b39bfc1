//! # Settlement
//!
//! Applies one block of consumption and the passive dynamics to a market.
//!
//! ## Order
//!
//! 1. Debit consumption from the supply
//! 2. Decay the supply
//! 3. Add the block budget
//! 4. Decay the reserve
//! 5. Credit `consumed × cost` at the pre-settlement quote
//! 6. Credit phantom RC from the token supply
//! 7. Clamp the reserve to `u64`
//!
//! Decay applies after consumption and before the budget, and the reserve
//! decays before either credit.

use crate::error::{MarketError, Result};
use crate::fixed_point::saturate_u64;
use crate::parameters::ResourceParameters;
use crate::pricing::{quote, Quote};
use crate::types::Market;
use serde::{Deserialize, Serialize};

/// Outcome of settling one market for one block
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settlement {
    /// Updated market
    pub market: Market,
    /// Quote the consumption was priced at
    pub quote: Quote,
    /// Units removed from supply by decay
    pub supply_decay: u64,
    /// RC removed from the reserve by decay
    pub reserve_decay: u64,
    /// RC paid for the consumption
    pub rc_consumed: u128,
    /// RC printed from the token supply
    pub phantom_rc: u64,
}

/// Settle `consumed` units against `market`
pub fn settle(
    params: &ResourceParameters,
    market: &Market,
    consumed: u64,
    total_supply: u64,
) -> Result<Market> {
    settle_detailed(params, market, consumed, total_supply).map(|s| s.market)
}

/// Settle and report each step's contribution
pub fn settle_detailed(
    params: &ResourceParameters,
    market: &Market,
    consumed: u64,
    total_supply: u64,
) -> Result<Settlement> {
    let quote = quote(market, params, total_supply)?;
    if consumed > quote.limit {
        return Err(MarketError::LimitExceeded {
            requested: consumed,
            limit: quote.limit,
        });
    }
    let rc_consumed = quote.rc_for(consumed);
    let decay = params.decay();

    let mut resource_supply = market.resource_supply - consumed;
    let supply_decay = decay.apply(resource_supply);
    resource_supply -= supply_decay;
    resource_supply = resource_supply.saturating_add(market.block_budget);

    let reserve_decay = decay.apply(market.rc_reserve);
    let phantom_rc = params.print_rate_multiplier()?.apply(total_supply);
    let rc_reserve = u128::from(market.rc_reserve - reserve_decay)
        .saturating_add(rc_consumed)
        .saturating_add(u128::from(phantom_rc));

    Ok(Settlement {
        market: Market {
            resource_supply,
            rc_reserve: saturate_u64(rc_reserve),
            ..*market
        },
        quote,
        supply_decay,
        reserve_decay,
        rc_consumed,
        phantom_rc,
    })
}
