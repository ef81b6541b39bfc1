//! Storage errors

use rcmarket_core::MarketError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Encoding failed: {0}")]
    Encode(String),

    #[error("Decoding failed: {0}")]
    Decode(String),

    #[error("Unsupported format version {found} (expected {expected})")]
    UnsupportedVersion { found: u8, expected: u8 },

    #[error("Backend error: {0}")]
    Backend(String),
}

impl From<StorageError> for MarketError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Encode(msg) | StorageError::Decode(msg) => MarketError::Serialization(msg),
            StorageError::UnsupportedVersion { found, expected } => {
                MarketError::UnsupportedStateVersion { found, expected }
            }
            other => MarketError::Storage(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversion() {
        let err: MarketError = StorageError::UnsupportedVersion { found: 9, expected: 1 }.into();
        assert_eq!(err, MarketError::UnsupportedStateVersion { found: 9, expected: 1 });

        let err: MarketError = StorageError::Decode("eof".into()).into();
        assert_eq!(err, MarketError::Serialization("eof".into()));

        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: MarketError = StorageError::from(io).into();
        assert!(matches!(err, MarketError::Storage(msg) if msg.contains("denied")));
    }
}
