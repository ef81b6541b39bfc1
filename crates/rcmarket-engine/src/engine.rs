//! # Resource Engine
//!
//! Entry points of the resources contract. Each call loads the persisted
//! objects it needs, computes its full result in memory, and writes at most
//! one object back. A rejected call writes nothing.

use crate::entry::EntryPoint;
use crate::ports::{CallerOracle, Privilege, TokenSupplyOracle};
use rcmarket_core::{
    quote, settle_detailed, Authority, MarketBudgets, MarketError, MarketsState, PerResource,
    Quote, ResourceConsumption, ResourceParameters, Result,
};
use rcmarket_storage::{codec, ObjectSpace, ObjectStore};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, info, warn};

/// Key of the persisted markets
pub const MARKETS_KEY: &str = "markets";

/// Key of the persisted parameters
pub const PARAMETERS_KEY: &str = "parameters";

/// Zone of the engine's default object space
pub const DEFAULT_ZONE: &[u8] = b"resources";

/// Current `(limit, cost)` of every market
pub type ResourceLimits = PerResource<Quote>;

/// Resource market engine over injected collaborators
pub struct ResourceEngine<S, C, T> {
    store: S,
    caller: C,
    supply: T,
    space: ObjectSpace,
}

impl<S, C, T> ResourceEngine<S, C, T>
where
    S: ObjectStore,
    C: CallerOracle,
    T: TokenSupplyOracle,
{
    pub fn new(store: S, caller: C, supply: T) -> Self {
        Self {
            store,
            caller,
            supply,
            space: ObjectSpace::system(DEFAULT_ZONE),
        }
    }

    /// Use a different object space, e.g. the deploying contract's id
    pub fn with_space(mut self, space: ObjectSpace) -> Self {
        self.space = space;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn caller(&self) -> &C {
        &self.caller
    }

    pub fn supply_oracle(&self) -> &T {
        &self.supply
    }

    pub fn space(&self) -> &ObjectSpace {
        &self.space
    }

    // ========================================================================
    // QUERIES
    // ========================================================================

    /// Persisted parameters, or the defaults when none were set
    pub fn get_resource_parameters(&self) -> Result<ResourceParameters> {
        Ok(self.load(PARAMETERS_KEY)?.unwrap_or_default())
    }

    /// Persisted markets, or the initial markets before the first block
    pub fn get_resource_markets(&self) -> Result<MarketsState> {
        Ok(self.load(MARKETS_KEY)?.unwrap_or_else(MarketsState::initial))
    }

    /// Current limit and per-unit cost of every market
    pub fn get_resource_limits(&self) -> Result<ResourceLimits> {
        let params = self.get_resource_parameters()?;
        let markets = self.get_resource_markets()?;
        let total_supply = self.supply.total_supply()?;

        markets.try_map(|_, market| quote(market, &params, total_supply))
    }

    // ========================================================================
    // BLOCK CONSUMPTION
    // ========================================================================

    /// Settle one block of consumption against all three markets.
    ///
    /// Every amount is checked before any market is touched; one over-limit
    /// resource rejects the whole block.
    pub fn try_consume_block_resources(
        &self,
        consumption: ResourceConsumption,
    ) -> Result<MarketsState> {
        self.authorize(EntryPoint::ConsumeBlockResources)?;

        let params = self.get_resource_parameters()?;
        let markets = self.get_resource_markets()?;

        for (kind, market) in markets.iter() {
            let requested = *consumption.get(kind);
            if !market.admits(requested) {
                let limit = market.resource_supply.saturating_sub(1).min(market.block_limit);
                warn!(resource = %kind, requested, limit, "block consumption rejected");
                return Err(MarketError::ResourceExhausted {
                    resource: kind,
                    requested,
                    limit,
                });
            }
        }

        let total_supply = self.supply.total_supply()?;
        let settled = markets.try_map(|kind, market| {
            let consumed = *consumption.get(kind);
            let s = settle_detailed(&params, market, consumed, total_supply)?;
            debug!(
                resource = %kind,
                consumed,
                cost = s.quote.cost,
                phantom_rc = s.phantom_rc,
                resource_supply = s.market.resource_supply,
                rc_reserve = s.market.rc_reserve,
                "market settled"
            );
            Ok::<_, MarketError>(s.market)
        })?;

        self.persist(MARKETS_KEY, &settled)?;
        Ok(settled)
    }

    /// Boolean surface of [`Self::try_consume_block_resources`]
    pub fn consume_block_resources(
        &self,
        disk_storage: u64,
        network_bandwidth: u64,
        compute_bandwidth: u64,
    ) -> bool {
        let consumption = ResourceConsumption::new(disk_storage, network_bandwidth, compute_bandwidth);
        match self.try_consume_block_resources(consumption) {
            Ok(_) => true,
            Err(e) => {
                debug!(error = %e, code = e.code(), "consume_block_resources failed");
                false
            }
        }
    }

    // ========================================================================
    // GOVERNANCE
    // ========================================================================

    /// Replace the parameter singleton
    pub fn set_resource_parameters(&self, params: ResourceParameters) -> Result<()> {
        self.authorize(EntryPoint::SetResourceParameters)?;
        params.validate()?;

        self.persist(PARAMETERS_KEY, &params)?;
        info!(
            block_interval_ms = params.block_interval_ms,
            rc_regen_ms = params.rc_regen_ms,
            one_minus_decay_constant = params.one_minus_decay_constant,
            print_rate_premium = params.print_rate_premium,
            print_rate_precision = params.print_rate_precision,
            formula = ?params.formula,
            "resource parameters updated"
        );
        Ok(())
    }

    /// Replace the block budget and limit of every market
    pub fn set_resource_markets_parameters(&self, budgets: MarketBudgets) -> Result<()> {
        self.authorize(EntryPoint::SetResourceMarketsParameters)?;

        let mut markets = self.get_resource_markets()?;
        for (kind, budget) in budgets.iter() {
            markets.get_mut(kind).apply_budget(*budget);
            info!(
                resource = %kind,
                block_budget = budget.block_budget,
                block_limit = budget.block_limit,
                "market budget updated"
            );
        }

        self.persist(MARKETS_KEY, &markets)
    }

    // ========================================================================
    // INTERNALS
    // ========================================================================

    fn authorize(&self, entry: EntryPoint) -> Result<()> {
        let Some(required) = entry.required_authority() else {
            return Ok(());
        };

        let granted = match required {
            Authority::KernelMode => self.caller.caller_privilege() == Privilege::KernelMode,
            Authority::SystemAuthority => self.caller.has_system_authority(),
        };

        if granted {
            Ok(())
        } else {
            warn!(entry = %entry, %required, "unauthorized call");
            Err(MarketError::Unauthorized {
                operation: entry.name(),
                required,
            })
        }
    }

    fn load<V: DeserializeOwned>(&self, key: &str) -> Result<Option<V>> {
        match self.store.get_object(&self.space, key)? {
            Some(bytes) => Ok(Some(codec::decode(&bytes)?)),
            None => Ok(None),
        }
    }

    fn persist<V: Serialize>(&self, key: &str, value: &V) -> Result<()> {
        let bytes = codec::encode(value)?;
        self.store.put_object(&self.space, key, &bytes)?;
        Ok(())
    }
}
