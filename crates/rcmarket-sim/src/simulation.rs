//! Block-by-block market simulation
//!
//! Mana equals token holdings and regenerates linearly over `rc_regen_ms`.
//! Each block users spend `mana_spend_bp` basis points of the per-block
//! regeneration of the whole supply, capped by the mana they have left. The
//! spend is split evenly across the three resources and converted to units at
//! the quoted cost.

use crate::BLOCKS_PER_MONTH;
use rcmarket_core::{
    ceil_div, quote, saturate_u64, settle, MarketsState, PerResource, ResourceParameters, Result,
    REFERENCE_TOTAL_SUPPLY, RC_PER_MANA,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

const BASIS_POINTS: u128 = 10_000;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Blocks to simulate
    pub blocks: u64,
    /// Share of per-block regeneration spent, in basis points
    pub mana_spend_bp: u64,
    pub rc_per_mana: u64,
    pub total_supply: u64,
    /// Record a snapshot every this many blocks (0 records only the last)
    pub snapshot_interval: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            blocks: BLOCKS_PER_MONTH,
            mana_spend_bp: 500,
            rc_per_mana: RC_PER_MANA,
            total_supply: REFERENCE_TOTAL_SUPPLY,
            snapshot_interval: 100_000,
        }
    }
}

/// Aggregate mana of all token holders
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManaLedger {
    pub total_supply: u64,
    pub mana: u64,
    pub blocks_per_regen: u64,
}

impl ManaLedger {
    /// Ledger with every holder at full mana
    pub fn new(total_supply: u64, blocks_per_regen: u64) -> Self {
        Self {
            total_supply,
            mana: total_supply,
            blocks_per_regen: blocks_per_regen.max(1),
        }
    }

    /// Mana spent this block at `spend_bp` of the per-block regeneration
    pub fn spendable(&self, spend_bp: u64) -> u64 {
        let wanted = u128::from(self.total_supply) * u128::from(spend_bp)
            / (BASIS_POINTS * u128::from(self.blocks_per_regen));
        saturate_u64(wanted).min(self.mana)
    }

    pub fn spend(&mut self, amount: u64) {
        self.mana = self.mana.saturating_sub(amount);
    }

    pub fn regenerate(&mut self) {
        let regen = self.total_supply / self.blocks_per_regen;
        self.mana = self.mana.saturating_add(regen).min(self.total_supply);
    }
}

/// State of the simulation after one block
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockSnapshot {
    pub block: u64,
    pub costs: PerResource<u64>,
    pub usage: PerResource<u64>,
    pub mana_spent: PerResource<u64>,
    pub markets: MarketsState,
    pub mana_remaining: u64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SimulationReport {
    pub snapshots: Vec<BlockSnapshot>,
    pub final_markets: MarketsState,
    pub total_mana_spent: u128,
}

pub struct Simulator {
    params: ResourceParameters,
    config: SimulationConfig,
    markets: MarketsState,
    ledger: ManaLedger,
}

impl Simulator {
    pub fn new(
        params: ResourceParameters,
        markets: MarketsState,
        config: SimulationConfig,
    ) -> Result<Self> {
        params.validate()?;
        let ledger = ManaLedger::new(config.total_supply, params.blocks_per_regen());
        Ok(Self {
            params,
            config,
            markets,
            ledger,
        })
    }

    pub fn markets(&self) -> &MarketsState {
        &self.markets
    }

    pub fn ledger(&self) -> &ManaLedger {
        &self.ledger
    }

    /// Simulate one block
    pub fn step(&mut self, block: u64) -> Result<BlockSnapshot> {
        let rc_per_mana = u128::from(self.config.rc_per_mana.max(1));
        let total_supply = self.config.total_supply;
        let share = self.ledger.spendable(self.config.mana_spend_bp) / 3;

        let quotes = self
            .markets
            .try_map(|_, market| quote(market, &self.params, total_supply))?;

        let usage = quotes.map(|_, q| {
            if q.limit == 0 {
                0
            } else if q.cost == 0 {
                q.limit
            } else {
                let affordable = u128::from(share) * rc_per_mana / u128::from(q.cost);
                saturate_u64(affordable).min(q.limit)
            }
        });
        let mana_spent = quotes.map(|kind, q| {
            saturate_u64(ceil_div(q.rc_for(*usage.get(kind)), rc_per_mana))
        });

        let spent: u64 = mana_spent.iter().map(|(_, m)| *m).fold(0, u64::saturating_add);
        self.ledger.spend(spent);

        self.markets = self.markets.try_map(|kind, market| {
            settle(&self.params, market, *usage.get(kind), total_supply)
        })?;
        self.ledger.regenerate();

        debug!(block, spent, mana = self.ledger.mana, "block simulated");

        Ok(BlockSnapshot {
            block,
            costs: quotes.map(|_, q| q.cost),
            usage,
            mana_spent,
            markets: self.markets,
            mana_remaining: self.ledger.mana,
        })
    }

    /// Run the configured number of blocks
    pub fn run(mut self) -> Result<SimulationReport> {
        let mut snapshots = Vec::new();
        let mut total_mana_spent = 0u128;
        let interval = self.config.snapshot_interval;

        for block in 0..self.config.blocks {
            let snapshot = self.step(block)?;
            total_mana_spent += snapshot
                .mana_spent
                .iter()
                .map(|(_, m)| u128::from(*m))
                .sum::<u128>();

            let last = block + 1 == self.config.blocks;
            if (interval > 0 && block % interval == 0) || last {
                info!(
                    block,
                    disk_cost = snapshot.costs.disk_storage,
                    network_cost = snapshot.costs.network_bandwidth,
                    compute_cost = snapshot.costs.compute_bandwidth,
                    "simulation snapshot"
                );
                snapshots.push(snapshot);
            }
        }

        Ok(SimulationReport {
            snapshots,
            final_markets: self.markets,
            total_mana_spent,
        })
    }
}
