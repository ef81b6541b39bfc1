//! # Pricing
//!
//! Marginal RC price of a market along the curve `rc(x) = k / x`.
//!
//! Consuming `limit` units moves the market from `x = resource_supply` to
//! `x = resource_supply - limit`. The RC needed for that move, divided by
//! `limit`, is the per-unit cost. Both divisions round against the consumer.

use crate::error::Result;
use crate::fixed_point::{ceil_div, saturate_u64};
use crate::parameters::{CurveFormula, ResourceParameters};
use crate::types::Market;
use serde::{Deserialize, Serialize};

/// Consumption ceiling and per-unit price for one block
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Quote {
    /// Maximum units consumable this block
    pub limit: u64,
    /// RC charged per unit
    pub cost: u64,
}

impl Quote {
    /// Nothing can be consumed
    pub const fn exhausted() -> Self {
        Self {
            limit: 0,
            cost: u64::MAX,
        }
    }

    /// RC charged for `units`
    pub fn rc_for(&self, units: u64) -> u128 {
        u128::from(units) * u128::from(self.cost)
    }
}

/// Invariant `k` of the market under the configured formula
pub fn invariant(market: &Market, params: &ResourceParameters, total_supply: u64) -> Result<u128> {
    match params.formula {
        CurveFormula::ConstantProduct => {
            Ok(u128::from(market.resource_supply) * u128::from(market.rc_reserve))
        }
        CurveFormula::PrintRate => {
            let reserve = params.equilibrium_reserve(total_supply)?;
            let resources = params.max_resources(market.block_budget);
            Ok(u128::from(reserve) * u128::from(resources))
        }
    }
}

/// Quote the market under the configured formula
pub fn quote(market: &Market, params: &ResourceParameters, total_supply: u64) -> Result<Quote> {
    let k = invariant(market, params, total_supply)?;
    Ok(quote_with_invariant(market, k))
}

/// Quote the market for an explicit invariant
///
/// Markets with `resource_supply < 2` or a zero block limit quote
/// [`Quote::exhausted`].
pub fn quote_with_invariant(market: &Market, k: u128) -> Quote {
    let supply = market.resource_supply;
    let limit = supply.saturating_sub(1).min(market.block_limit);
    if limit == 0 {
        return Quote::exhausted();
    }

    let new_supply = supply - limit;
    let consumed_rc = ceil_div(k, u128::from(new_supply)) - k / u128::from(supply);
    let cost = saturate_u64(ceil_div(consumed_rc, u128::from(limit)));

    Quote { limit, cost }
}
