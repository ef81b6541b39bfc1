//! Closed-form steady state of a single market
//!
//! At equilibrium the reserve loses to decay exactly what it gains from
//! phantom RC plus user spending, and the supply loses to decay and
//! consumption exactly what the block budget adds back:
//!
//! ```text
//! rc      = (phantom × S + u × S × regen × rc_per_mana) / decay
//! supply  = budget / (rc_per_block / rc + decay)
//! ```
//!
//! where `u` is the fraction of mana users spend each block. Values are `f64`
//! and meant for tuning, not for settlement.

use rcmarket_core::{Result, ResourceParameters};
use serde::{Deserialize, Serialize};

const FIXED_POINT_SCALE: f64 = 18_446_744_073_709_551_616.0;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Equilibrium {
    pub utilization: f64,
    pub rc_reserve: f64,
    pub resource_supply: f64,
    /// Marginal RC per unit at the steady state
    pub price: f64,
}

/// Steady state of a market with `block_budget` when users spend
/// `utilization` of their regenerating mana every block
pub fn equilibrium(
    params: &ResourceParameters,
    block_budget: u64,
    total_supply: u64,
    utilization: f64,
    rc_per_mana: u64,
) -> Result<Equilibrium> {
    params.validate()?;

    let decay = params.one_minus_decay_constant as f64 / FIXED_POINT_SCALE;
    let phantom = params.print_rate_multiplier()?.as_f64();
    let regen_per_block = params.block_interval_ms as f64 / params.rc_regen_ms as f64;
    let supply = total_supply as f64;

    let rc_per_block = utilization * supply * regen_per_block * rc_per_mana as f64;
    let rc_reserve = (phantom * supply + rc_per_block) / decay;
    let resource_supply = if rc_reserve > 0.0 {
        block_budget as f64 / (rc_per_block / rc_reserve + decay)
    } else {
        block_budget as f64 / decay
    };
    let price = if resource_supply > 0.0 {
        rc_reserve / resource_supply
    } else {
        f64::INFINITY
    };

    Ok(Equilibrium {
        utilization,
        rc_reserve,
        resource_supply,
        price,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rcmarket_core::{DISK_BUDGET_PER_BLOCK, RC_PER_MANA, REFERENCE_TOTAL_SUPPLY};

    fn relative_error(a: f64, b: f64) -> f64 {
        (a - b).abs() / b.abs()
    }

    #[test]
    fn test_idle_equilibrium_matches_integer_targets() {
        let params = ResourceParameters::default();
        let eq = equilibrium(&params, DISK_BUDGET_PER_BLOCK, REFERENCE_TOTAL_SUPPLY, 0.0, RC_PER_MANA)
            .unwrap();

        let reserve = params.equilibrium_reserve(REFERENCE_TOTAL_SUPPLY).unwrap() as f64;
        let supply = params.max_resources(DISK_BUDGET_PER_BLOCK) as f64;
        assert!(relative_error(eq.rc_reserve, reserve) < 1e-6);
        assert!(relative_error(eq.resource_supply, supply) < 1e-6);
    }

    #[test]
    fn test_utilization_raises_price() {
        let params = ResourceParameters::default();
        let prices: Vec<f64> = [0.0, 0.01, 0.1, 0.5]
            .iter()
            .map(|u| {
                equilibrium(&params, DISK_BUDGET_PER_BLOCK, REFERENCE_TOTAL_SUPPLY, *u, RC_PER_MANA)
                    .unwrap()
                    .price
            })
            .collect();

        for pair in prices.windows(2) {
            assert!(pair[1] > pair[0], "{prices:?}");
        }
    }

    #[test]
    fn test_serializes_for_reports() {
        let params = ResourceParameters::default();
        let eq = equilibrium(&params, 1_000, REFERENCE_TOTAL_SUPPLY, 0.25, RC_PER_MANA).unwrap();
        let json = serde_json::to_string(&eq).unwrap();
        assert!(json.contains("\"utilization\":0.25"));
    }
}
