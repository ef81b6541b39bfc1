//! # RC Market Simulation
//!
//! Tools for tuning resource parameters before proposing them to governance.
//!
//! - [`simulation`] replays blocks in which users spend a fixed share of their
//!   mana, split evenly across the three resources, and records how prices and
//!   supplies evolve.
//! - [`equilibrium`] solves the steady state of a market in closed form for a
//!   given utilization.
//!
//! ## Usage
//!
//! ```bash
//! rcmarket simulate --months 12 --spend-bp 500 --snapshot-every 100000
//! rcmarket equilibrium --utilization 0 0.01 0.5
//! ```

pub mod equilibrium;
pub mod simulation;

pub use equilibrium::{equilibrium, Equilibrium};
pub use simulation::{BlockSnapshot, ManaLedger, SimulationConfig, SimulationReport, Simulator};

/// Blocks in a 30-day month at the default interval
pub const BLOCKS_PER_MONTH: u64 = 20 * 60 * 24 * 30;
