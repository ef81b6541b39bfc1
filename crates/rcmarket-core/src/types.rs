//! Core types for resource markets

use crate::constants::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Congestible resources priced by the engine
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Disk,
    Network,
    Compute,
}

impl ResourceKind {
    /// All resources in settlement order
    pub const ALL: [ResourceKind; 3] = [Self::Disk, Self::Network, Self::Compute];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Disk => "disk storage",
            Self::Network => "network bandwidth",
            Self::Compute => "compute bandwidth",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One value per resource
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PerResource<T> {
    pub disk_storage: T,
    pub network_bandwidth: T,
    pub compute_bandwidth: T,
}

impl<T> PerResource<T> {
    pub fn new(disk_storage: T, network_bandwidth: T, compute_bandwidth: T) -> Self {
        Self {
            disk_storage,
            network_bandwidth,
            compute_bandwidth,
        }
    }

    /// Build from a function of the resource kind
    pub fn from_fn(mut f: impl FnMut(ResourceKind) -> T) -> Self {
        Self::new(
            f(ResourceKind::Disk),
            f(ResourceKind::Network),
            f(ResourceKind::Compute),
        )
    }

    pub fn get(&self, kind: ResourceKind) -> &T {
        match kind {
            ResourceKind::Disk => &self.disk_storage,
            ResourceKind::Network => &self.network_bandwidth,
            ResourceKind::Compute => &self.compute_bandwidth,
        }
    }

    pub fn get_mut(&mut self, kind: ResourceKind) -> &mut T {
        match kind {
            ResourceKind::Disk => &mut self.disk_storage,
            ResourceKind::Network => &mut self.network_bandwidth,
            ResourceKind::Compute => &mut self.compute_bandwidth,
        }
    }

    pub fn map<U>(&self, mut f: impl FnMut(ResourceKind, &T) -> U) -> PerResource<U> {
        PerResource::from_fn(|kind| f(kind, self.get(kind)))
    }

    /// Fallible map, stopping at the first error in settlement order
    pub fn try_map<U, E>(
        &self,
        mut f: impl FnMut(ResourceKind, &T) -> Result<U, E>,
    ) -> Result<PerResource<U>, E> {
        Ok(PerResource::new(
            f(ResourceKind::Disk, &self.disk_storage)?,
            f(ResourceKind::Network, &self.network_bandwidth)?,
            f(ResourceKind::Compute, &self.compute_bandwidth)?,
        ))
    }

    pub fn iter(&self) -> impl Iterator<Item = (ResourceKind, &T)> {
        ResourceKind::ALL.into_iter().map(move |kind| (kind, self.get(kind)))
    }
}

/// Per-resource market state
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Market {
    /// Units that could still be consumed before exhausting the market (>= 1)
    pub resource_supply: u64,
    /// Accumulated price pressure
    pub rc_reserve: u64,
    /// Resupply added to `resource_supply` each block
    pub block_budget: u64,
    /// Hard per-block consumption ceiling
    pub block_limit: u64,
}

impl Market {
    pub fn new(resource_supply: u64, rc_reserve: u64, block_budget: u64, block_limit: u64) -> Self {
        Self {
            resource_supply,
            rc_reserve,
            block_budget,
            block_limit,
        }
    }

    /// Default market for a resource
    pub fn initial(kind: ResourceKind) -> Self {
        match kind {
            ResourceKind::Disk => Self::new(
                DISK_INITIAL_RESOURCE_SUPPLY,
                INITIAL_RC_RESERVE,
                DISK_BUDGET_PER_BLOCK,
                MAX_DISK_PER_BLOCK,
            ),
            ResourceKind::Network => Self::new(
                NETWORK_INITIAL_RESOURCE_SUPPLY,
                INITIAL_RC_RESERVE,
                NETWORK_BUDGET_PER_BLOCK,
                MAX_NETWORK_PER_BLOCK,
            ),
            ResourceKind::Compute => Self::new(
                COMPUTE_INITIAL_RESOURCE_SUPPLY,
                INITIAL_RC_RESERVE,
                COMPUTE_BUDGET_PER_BLOCK,
                MAX_COMPUTE_PER_BLOCK,
            ),
        }
    }

    /// Whether `consumed` units may be taken this block
    pub fn admits(&self, consumed: u64) -> bool {
        consumed < self.resource_supply && consumed <= self.block_limit
    }

    pub fn budget(&self) -> MarketBudget {
        MarketBudget {
            block_budget: self.block_budget,
            block_limit: self.block_limit,
        }
    }

    pub fn apply_budget(&mut self, budget: MarketBudget) {
        self.block_budget = budget.block_budget;
        self.block_limit = budget.block_limit;
    }
}

/// Governance-settable part of a market
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MarketBudget {
    pub block_budget: u64,
    pub block_limit: u64,
}

/// The three markets, persisted as one object
pub type MarketsState = PerResource<Market>;

/// Per-resource budgets written by governance
pub type MarketBudgets = PerResource<MarketBudget>;

/// Already-measured consumption for one block
pub type ResourceConsumption = PerResource<u64>;

impl PerResource<Market> {
    /// Markets used when nothing has been persisted yet
    pub fn initial() -> Self {
        Self::from_fn(Market::initial)
    }

    pub fn budgets(&self) -> MarketBudgets {
        self.map(|_, market| market.budget())
    }
}

impl Default for PerResource<u64> {
    fn default() -> Self {
        Self::new(0, 0, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_markets() {
        let markets = MarketsState::initial();
        assert_eq!(markets.disk_storage.resource_supply, 65_814_606_811);
        assert_eq!(markets.disk_storage.rc_reserve, 3_462_468_792_700_000_000);
        assert_eq!(markets.network_bandwidth.block_limit, 1 << 20);
        assert_eq!(markets.compute_bandwidth.block_budget, 57_500_000);
    }

    #[test]
    fn test_per_resource_order() {
        let kinds: Vec<_> = MarketsState::initial().iter().map(|(kind, _)| kind).collect();
        assert_eq!(kinds, ResourceKind::ALL.to_vec());
    }

    #[test]
    fn test_try_map_stops_at_first_error() {
        let usage = ResourceConsumption::new(1, 2, 3);
        let mut visited = Vec::new();
        let result: Result<PerResource<u64>, ResourceKind> = usage.try_map(|kind, value| {
            visited.push(kind);
            if *value == 2 {
                Err(kind)
            } else {
                Ok(*value)
            }
        });
        assert_eq!(result, Err(ResourceKind::Network));
        assert_eq!(visited, vec![ResourceKind::Disk, ResourceKind::Network]);
    }

    #[test]
    fn test_market_admits() {
        let market = Market::new(10, 1, 1, 5);
        assert!(market.admits(0));
        assert!(market.admits(5));
        assert!(!market.admits(6));

        let tight = Market::new(3, 1, 1, 100);
        assert!(tight.admits(2));
        assert!(!tight.admits(3));
    }

    #[test]
    fn test_apply_budget() {
        let mut market = Market::initial(ResourceKind::Disk);
        market.apply_budget(MarketBudget {
            block_budget: 7,
            block_limit: 9,
        });
        assert_eq!(market.budget().block_budget, 7);
        assert_eq!(market.resource_supply, DISK_INITIAL_RESOURCE_SUPPLY);
    }
}
