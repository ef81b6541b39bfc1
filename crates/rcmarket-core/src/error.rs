//! Error types for resource market operations

use crate::types::ResourceKind;
use std::fmt;
use thiserror::Error;

/// Result type alias for market operations
pub type Result<T> = std::result::Result<T, MarketError>;

/// Authority an entry point demands from its caller
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Authority {
    /// Called from kernel context by the block producer
    KernelMode,
    /// Governance or system contract authority
    SystemAuthority,
}

impl fmt::Display for Authority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::KernelMode => write!(f, "kernel mode"),
            Self::SystemAuthority => write!(f, "system authority"),
        }
    }
}

/// Errors that can occur in resource market operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MarketError {
    // === Authorization ===
    /// Caller lacks the privilege the entry point requires
    #[error("Unauthorized call to {operation}: requires {required}")]
    Unauthorized {
        operation: &'static str,
        required: Authority,
    },

    // === Consumption ===
    /// Requested consumption exceeds the market's current limit or supply
    #[error("{resource} exhausted: requested {requested}, limit {limit}")]
    ResourceExhausted {
        resource: ResourceKind,
        requested: u64,
        limit: u64,
    },

    /// Settlement called with more than the quoted limit
    #[error("Consumption {requested} exceeds quoted limit {limit}")]
    LimitExceeded { requested: u64, limit: u64 },

    // === Configuration ===
    /// Parameters violate an invariant
    #[error("Invalid resource parameters: {0}")]
    InvalidParameters(String),

    // === Collaborators ===
    /// Token supply oracle failed
    #[error("Token supply oracle error: {0}")]
    Oracle(String),

    /// Storage error
    #[error("Storage error: {0}")]
    Storage(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Persisted state written by an unknown format
    #[error("Unsupported state version {found} (expected {expected})")]
    UnsupportedStateVersion { found: u8, expected: u8 },
}

impl MarketError {
    /// Numeric code reported through the contract result
    pub fn code(&self) -> u32 {
        match self {
            Self::Unauthorized { .. } => 2001,
            Self::ResourceExhausted { .. } | Self::LimitExceeded { .. } => 2002,
            Self::InvalidParameters(_) => 2003,
            Self::Oracle(_) => 2004,
            Self::Storage(_) | Self::Serialization(_) => 2005,
            Self::UnsupportedStateVersion { .. } => 2006,
        }
    }

    /// Check if error is recoverable
    ///
    /// Exhaustion is an expected outcome of a busy block; the producer simply
    /// retries with less consumption.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::ResourceExhausted { .. } | Self::LimitExceeded { .. } | Self::Oracle(_)
        )
    }

    pub fn is_authorization(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let err = MarketError::Unauthorized {
            operation: "consume_block_resources",
            required: Authority::KernelMode,
        };
        assert_eq!(err.code(), 2001);
        assert!(err.is_authorization());

        let err = MarketError::InvalidParameters("zero precision".into());
        assert_eq!(err.code(), 2003);
    }

    #[test]
    fn test_error_display() {
        let err = MarketError::ResourceExhausted {
            resource: ResourceKind::Disk,
            requested: 300_000,
            limit: 204_800,
        };

        let msg = format!("{}", err);
        assert!(msg.contains("disk storage exhausted"));
        assert!(msg.contains("204800"));
    }

    #[test]
    fn test_recoverable_errors() {
        assert!(MarketError::LimitExceeded { requested: 2, limit: 1 }.is_recoverable());
        assert!(!MarketError::Serialization("truncated".into()).is_recoverable());
    }
}
