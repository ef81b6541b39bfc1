//! RC Market CLI
//!
//! Inspect and operate the resource credit markets kept in a local data
//! directory, and tune parameters with the simulator.

mod config;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use crate::config::{CliConfig, LoggingConfig};
use rcmarket_core::{
    CurveFormula, MarketsState, ResourceConsumption, ResourceKind, ResourceParameters, RC_PER_MANA,
};
use rcmarket_engine::{FixedSupply, ResourceEngine, StaticCaller};
use rcmarket_sim::{equilibrium, SimulationConfig, Simulator, BLOCKS_PER_MONTH};
use rcmarket_storage::{FileStore, ObjectSpace};
use serde::Serialize;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

type Engine = ResourceEngine<FileStore, StaticCaller, FixedSupply>;

#[derive(Parser)]
#[command(name = "rcmarket")]
#[command(version)]
#[command(about = "Resource credit market engine", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, global = true, default_value = "rcmarket.toml")]
    config: PathBuf,

    /// Data directory, overrides the configured one
    #[arg(short, long, global = true)]
    data_dir: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the current limit and cost of every market
    Limits,

    /// Show the stored market state
    Markets,

    /// Show the resource parameters
    Params,

    /// Settle one block of consumption
    Consume {
        #[arg(long, default_value = "0")]
        disk: u64,
        #[arg(long, default_value = "0")]
        network: u64,
        #[arg(long, default_value = "0")]
        compute: u64,
    },

    /// Update the resource parameters
    SetParams {
        /// Decay half-life in blocks
        #[arg(long, conflicts_with = "one_minus_decay")]
        half_life: Option<u64>,

        /// `1 - decay` at 2^64 scale
        #[arg(long)]
        one_minus_decay: Option<u64>,

        #[arg(long)]
        block_interval_ms: Option<u64>,

        #[arg(long)]
        rc_regen_ms: Option<u64>,

        #[arg(long)]
        premium: Option<u64>,

        #[arg(long)]
        precision: Option<u64>,

        #[arg(long, value_enum)]
        formula: Option<FormulaArg>,
    },

    /// Update the block budget and limit of one market
    SetMarkets {
        #[arg(value_enum)]
        resource: ResourceArg,

        #[arg(long)]
        budget: Option<u64>,

        #[arg(long)]
        limit: Option<u64>,
    },

    /// Simulate users spending a share of their mana every block
    Simulate {
        #[arg(long, default_value = "1")]
        months: u64,

        /// Basis points of per-block mana regeneration spent
        #[arg(long, default_value = "500")]
        spend_bp: u64,

        #[arg(long, default_value = "100000")]
        snapshot_every: u64,

        /// Start from the stored markets instead of the initial ones
        #[arg(long)]
        from_store: bool,
    },

    /// Steady-state reserve, supply and price per utilization
    Equilibrium {
        #[arg(long, num_args = 1.., default_values_t = [0.0, 0.01, 0.1, 0.5, 1.0])]
        utilization: Vec<f64>,
    },

    /// Print the effective configuration
    Config,
}

#[derive(Clone, Copy, ValueEnum)]
enum FormulaArg {
    PrintRate,
    ConstantProduct,
}

impl From<FormulaArg> for CurveFormula {
    fn from(arg: FormulaArg) -> Self {
        match arg {
            FormulaArg::PrintRate => Self::PrintRate,
            FormulaArg::ConstantProduct => Self::ConstantProduct,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum ResourceArg {
    Disk,
    Network,
    Compute,
}

impl From<ResourceArg> for ResourceKind {
    fn from(arg: ResourceArg) -> Self {
        match arg {
            ResourceArg::Disk => Self::Disk,
            ResourceArg::Network => Self::Network,
            ResourceArg::Compute => Self::Compute,
        }
    }
}

fn init_logging(logging: &LoggingConfig, verbose: bool) {
    let level = if verbose { "debug" } else { logging.level.as_str() };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let registry = tracing_subscriber::registry().with(env_filter);
    if logging.json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_file(false),
            )
            .init();
    }
}

fn open_engine(config: &CliConfig) -> anyhow::Result<Engine> {
    let data_dir = PathBuf::from(&config.store.data_dir);
    let store = FileStore::open(&data_dir)
        .with_context(|| format!("opening store at {}", data_dir.display()))?;
    let space = ObjectSpace::system(config.store.zone.as_bytes());

    Ok(ResourceEngine::new(store, StaticCaller::operator(), FixedSupply::new(config.token.total_supply))
        .with_space(space))
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_markets(markets: &MarketsState) {
    println!("{:<18} {:>22} {:>22} {:>12} {:>12}", "resource", "supply", "rc reserve", "budget", "limit");
    for (kind, m) in markets.iter() {
        println!(
            "{:<18} {:>22} {:>22} {:>12} {:>12}",
            kind.name(),
            m.resource_supply,
            m.rc_reserve,
            m.block_budget,
            m.block_limit
        );
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = CliConfig::load(&cli.config)
        .with_context(|| format!("loading {}", cli.config.display()))?;
    if let Some(dir) = &cli.data_dir {
        config.store.data_dir = dir.display().to_string();
    }
    init_logging(&config.logging, cli.verbose);

    match cli.command {
        Commands::Limits => {
            let limits = open_engine(&config)?.get_resource_limits()?;
            println!("{:<18} {:>14} {:>22}", "resource", "limit", "cost (rc/unit)");
            for (kind, quote) in limits.iter() {
                println!("{:<18} {:>14} {:>22}", kind.name(), quote.limit, quote.cost);
            }
        }

        Commands::Markets => {
            print_markets(&open_engine(&config)?.get_resource_markets()?);
        }

        Commands::Params => {
            print_json(&open_engine(&config)?.get_resource_parameters()?)?;
        }

        Commands::Consume { disk, network, compute } => {
            let engine = open_engine(&config)?;
            let settled = engine
                .try_consume_block_resources(ResourceConsumption::new(disk, network, compute))
                .context("block rejected")?;
            print_markets(&settled);
        }

        Commands::SetParams {
            half_life,
            one_minus_decay,
            block_interval_ms,
            rc_regen_ms,
            premium,
            precision,
            formula,
        } => {
            let engine = open_engine(&config)?;
            let mut params = engine.get_resource_parameters()?;

            if let Some(blocks) = half_life {
                let tuned = ResourceParameters::with_half_life(blocks)?;
                params.decay_constant = tuned.decay_constant;
                params.one_minus_decay_constant = tuned.one_minus_decay_constant;
            }
            if let Some(one_minus) = one_minus_decay {
                params = params.with_decay(one_minus)?;
            }
            if let Some(ms) = block_interval_ms {
                params.block_interval_ms = ms;
            }
            if let Some(ms) = rc_regen_ms {
                params.rc_regen_ms = ms;
            }
            if let Some(p) = premium {
                params.print_rate_premium = p;
            }
            if let Some(p) = precision {
                params.print_rate_precision = p;
            }
            if let Some(f) = formula {
                params = params.with_formula(f.into());
            }

            engine.set_resource_parameters(params.clone())?;
            print_json(&params)?;
        }

        Commands::SetMarkets { resource, budget, limit } => {
            let engine = open_engine(&config)?;
            let kind = ResourceKind::from(resource);
            let mut budgets = engine.get_resource_markets()?.budgets();

            let entry = budgets.get_mut(kind);
            if let Some(b) = budget {
                entry.block_budget = b;
            }
            if let Some(l) = limit {
                entry.block_limit = l;
            }

            engine.set_resource_markets_parameters(budgets)?;
            print_markets(&engine.get_resource_markets()?);
        }

        Commands::Simulate {
            months,
            spend_bp,
            snapshot_every,
            from_store,
        } => {
            let (params, markets) = if from_store {
                let engine = open_engine(&config)?;
                (engine.get_resource_parameters()?, engine.get_resource_markets()?)
            } else {
                (ResourceParameters::default(), MarketsState::initial())
            };
            let sim_config = SimulationConfig {
                blocks: months.saturating_mul(BLOCKS_PER_MONTH),
                mana_spend_bp: spend_bp,
                rc_per_mana: RC_PER_MANA,
                total_supply: config.token.total_supply,
                snapshot_interval: snapshot_every,
            };

            let report = Simulator::new(params, markets, sim_config)?.run()?;
            println!(
                "{:>10} {:>14} {:>14} {:>14} {:>10} {:>10} {:>12}",
                "block", "disk cost", "net cost", "cpu cost", "disk", "net", "cpu"
            );
            for s in &report.snapshots {
                println!(
                    "{:>10} {:>14} {:>14} {:>14} {:>10} {:>10} {:>12}",
                    s.block,
                    s.costs.disk_storage,
                    s.costs.network_bandwidth,
                    s.costs.compute_bandwidth,
                    s.usage.disk_storage,
                    s.usage.network_bandwidth,
                    s.usage.compute_bandwidth
                );
            }
            println!("total mana spent: {}", report.total_mana_spent);
        }

        Commands::Equilibrium { utilization } => {
            let engine = open_engine(&config)?;
            let params = engine.get_resource_parameters()?;
            let markets = engine.get_resource_markets()?;

            println!("{:<18} {:>8} {:>24} {:>20} {:>16}", "resource", "util", "rc reserve", "supply", "price");
            for (kind, market) in markets.iter() {
                for u in &utilization {
                    let eq = equilibrium(
                        &params,
                        market.block_budget,
                        config.token.total_supply,
                        *u,
                        RC_PER_MANA,
                    )?;
                    println!(
                        "{:<18} {:>8.3} {:>24.0} {:>20.0} {:>16.2}",
                        kind.name(),
                        eq.utilization,
                        eq.rc_reserve,
                        eq.resource_supply,
                        eq.price
                    );
                }
            }
        }

        Commands::Config => {
            println!("{}", toml::to_string_pretty(&config)?);
        }
    }

    Ok(())
}
