//! Collaborator ports
//!
//! The engine never calls a host API directly. Caller privilege and token
//! supply are injected through these traits so the engine can run against a
//! live chain or against fixed values in tests.

use parking_lot::Mutex;
use rcmarket_core::{MarketError, Result};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Privilege of the current caller
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Privilege {
    KernelMode,
    UserMode,
}

/// Capability port answering who is calling
pub trait CallerOracle: Send + Sync {
    fn caller_privilege(&self) -> Privilege;

    /// Whether the caller carries system (governance) authority
    fn has_system_authority(&self) -> bool;
}

/// Source of the total token supply used for phantom RC
pub trait TokenSupplyOracle: Send + Sync {
    fn total_supply(&self) -> Result<u64>;
}

/// Caller with fixed capabilities
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StaticCaller {
    pub privilege: Privilege,
    pub system_authority: bool,
}

impl StaticCaller {
    /// Block producer in kernel context
    pub const fn kernel() -> Self {
        Self {
            privilege: Privilege::KernelMode,
            system_authority: false,
        }
    }

    /// Governance contract acting in user context
    pub const fn governance() -> Self {
        Self {
            privilege: Privilege::UserMode,
            system_authority: true,
        }
    }

    /// Ordinary transaction
    pub const fn user() -> Self {
        Self {
            privilege: Privilege::UserMode,
            system_authority: false,
        }
    }

    /// Kernel context with system authority, used by operator tooling
    pub const fn operator() -> Self {
        Self {
            privilege: Privilege::KernelMode,
            system_authority: true,
        }
    }
}

impl CallerOracle for StaticCaller {
    fn caller_privilege(&self) -> Privilege {
        self.privilege
    }

    fn has_system_authority(&self) -> bool {
        self.system_authority
    }
}

/// Caller whose capabilities can change between calls
#[derive(Debug)]
pub struct SwitchableCaller {
    current: Mutex<StaticCaller>,
}

impl SwitchableCaller {
    pub fn new(initial: StaticCaller) -> Self {
        Self {
            current: Mutex::new(initial),
        }
    }

    pub fn set(&self, caller: StaticCaller) {
        *self.current.lock() = caller;
    }
}

impl CallerOracle for SwitchableCaller {
    fn caller_privilege(&self) -> Privilege {
        self.current.lock().privilege
    }

    fn has_system_authority(&self) -> bool {
        self.current.lock().system_authority
    }
}

/// Token supply that changes only when told to
#[derive(Debug, Default)]
pub struct FixedSupply {
    supply: AtomicU64,
    reads: AtomicU64,
}

impl FixedSupply {
    pub fn new(supply: u64) -> Self {
        Self {
            supply: AtomicU64::new(supply),
            reads: AtomicU64::new(0),
        }
    }

    pub fn set(&self, supply: u64) {
        self.supply.store(supply, Ordering::SeqCst);
    }

    /// Number of times the supply has been read
    pub fn reads(&self) -> u64 {
        self.reads.load(Ordering::SeqCst)
    }
}

impl TokenSupplyOracle for FixedSupply {
    fn total_supply(&self) -> Result<u64> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        Ok(self.supply.load(Ordering::SeqCst))
    }
}

/// Oracle that always fails, for exercising error paths
#[derive(Clone, Copy, Debug, Default)]
pub struct UnavailableSupply;

impl TokenSupplyOracle for UnavailableSupply {
    fn total_supply(&self) -> Result<u64> {
        Err(MarketError::Oracle("token contract unavailable".into()))
    }
}

impl<T: CallerOracle + ?Sized> CallerOracle for std::sync::Arc<T> {
    fn caller_privilege(&self) -> Privilege {
        (**self).caller_privilege()
    }

    fn has_system_authority(&self) -> bool {
        (**self).has_system_authority()
    }
}

impl<T: TokenSupplyOracle + ?Sized> TokenSupplyOracle for std::sync::Arc<T> {
    fn total_supply(&self) -> Result<u64> {
        (**self).total_supply()
    }
}
