//! # RC Market Engine
//!
//! The resources contract: once per block the producer reports how much disk,
//! network and compute the block consumed, and the engine settles all three
//! markets in one all-or-nothing update.
//!
//! ## Entry Points
//!
//! | Entry point | Authority | Effect |
//! |-------------|-----------|--------|
//! | `get_resource_limits` | none | read |
//! | `get_resource_markets` | none | read |
//! | `get_resource_parameters` | none | read |
//! | `consume_block_resources` | kernel mode | writes `markets` |
//! | `set_resource_markets_parameters` | system authority | writes `markets` |
//! | `set_resource_parameters` | system authority | writes `parameters` |
//!
//! ## Collaborators
//!
//! Storage, caller privilege and token supply are injected; see [`ports`] and
//! [`rcmarket_storage::ObjectStore`].

pub mod engine;
pub mod entry;
pub mod ports;

pub use engine::{ResourceEngine, ResourceLimits, DEFAULT_ZONE, MARKETS_KEY, PARAMETERS_KEY};
pub use entry::EntryPoint;
pub use ports::{
    CallerOracle, FixedSupply, Privilege, StaticCaller, SwitchableCaller, TokenSupplyOracle,
    UnavailableSupply,
};
