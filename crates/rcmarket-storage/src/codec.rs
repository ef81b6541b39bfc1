//! Versioned bincode encoding of persisted objects

use crate::error::StorageError;
use serde::{de::DeserializeOwned, Serialize};

/// Current format version, written as the first byte
pub const FORMAT_VERSION: u8 = 1;

pub fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>, StorageError> {
    let body = bincode::serialize(value).map_err(|e| StorageError::Encode(e.to_string()))?;
    let mut bytes = Vec::with_capacity(body.len() + 1);
    bytes.push(FORMAT_VERSION);
    bytes.extend_from_slice(&body);
    Ok(bytes)
}

pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, StorageError> {
    let (&version, body) = bytes
        .split_first()
        .ok_or_else(|| StorageError::Decode("empty object".into()))?;

    if version != FORMAT_VERSION {
        return Err(StorageError::UnsupportedVersion {
            found: version,
            expected: FORMAT_VERSION,
        });
    }

    bincode::deserialize(body).map_err(|e| StorageError::Decode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rcmarket_core::{MarketsState, ResourceParameters};

    #[test]
    fn test_markets_encoding() {
        let markets = MarketsState::initial();
        let bytes = encode(&markets).unwrap();
        assert_eq!(bytes[0], FORMAT_VERSION);
        // Twelve fixed-width u64 fields
        assert_eq!(bytes.len(), 1 + 12 * 8);

        let decoded: MarketsState = decode(&bytes).unwrap();
        assert_eq!(decoded, markets);
    }

    #[test]
    fn test_parameters_encoding() {
        let params = ResourceParameters::default();
        let decoded: ResourceParameters = decode(&encode(&params).unwrap()).unwrap();
        assert_eq!(decoded, params);
    }

    #[test]
    fn test_rejects_unknown_version() {
        let mut bytes = encode(&MarketsState::initial()).unwrap();
        bytes[0] = 7;
        let err = decode::<MarketsState>(&bytes).unwrap_err();
        assert!(matches!(err, StorageError::UnsupportedVersion { found: 7, expected: 1 }));
    }

    #[test]
    fn test_rejects_truncated() {
        assert!(matches!(
            decode::<MarketsState>(&[]),
            Err(StorageError::Decode(_))
        ));
        let bytes = encode(&MarketsState::initial()).unwrap();
        assert!(decode::<MarketsState>(&bytes[..20]).is_err());
    }
}
