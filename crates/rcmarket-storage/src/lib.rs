//! # RC Market Storage
//!
//! Object storage used by the resource engine.
//!
//! ## Storage Layout
//!
//! Objects are addressed by an [`ObjectSpace`] and a string key. The engine
//! writes exactly two keys into its own space:
//!
//! - `markets` - the three resource markets
//! - `parameters` - the resource parameter singleton
//!
//! Values are bincode with a leading format-version byte, see [`codec`].

pub mod codec;
pub mod error;
pub mod file_db;
pub mod memory_db;
#[cfg(feature = "rocksdb")]
pub mod rocks_db;

use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub use error::StorageError;
pub use file_db::FileStore;
pub use memory_db::MemoryStore;
#[cfg(feature = "rocksdb")]
pub use rocks_db::RocksStore;

/// Storage zone owned by one contract
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectSpace {
    /// Owning contract identifier
    pub zone: Vec<u8>,
    /// Space number within the zone
    pub id: u32,
    /// System spaces are writable only by system contracts
    pub system: bool,
}

impl ObjectSpace {
    pub fn new(zone: impl Into<Vec<u8>>, id: u32, system: bool) -> Self {
        Self {
            zone: zone.into(),
            id,
            system,
        }
    }

    /// System space 0 of a zone
    pub fn system(zone: impl Into<Vec<u8>>) -> Self {
        Self::new(zone, 0, true)
    }

    /// Stable flat name, usable as a directory or key prefix
    pub fn flat_name(&self) -> String {
        format!(
            "{}-{}{}",
            hex::encode(&self.zone),
            self.id,
            if self.system { "-sys" } else { "" }
        )
    }
}

/// Key-value object store
pub trait ObjectStore: Send + Sync {
    /// Read an object, `None` when absent
    fn get_object(&self, space: &ObjectSpace, key: &str) -> Result<Option<Vec<u8>>, StorageError>;

    /// Write an object, replacing any previous value
    fn put_object(&self, space: &ObjectSpace, key: &str, value: &[u8]) -> Result<(), StorageError>;
}

impl<T: ObjectStore + ?Sized> ObjectStore for Arc<T> {
    fn get_object(&self, space: &ObjectSpace, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        (**self).get_object(space, key)
    }

    fn put_object(&self, space: &ObjectSpace, key: &str, value: &[u8]) -> Result<(), StorageError> {
        (**self).put_object(space, key, value)
    }
}

impl<T: ObjectStore + ?Sized> ObjectStore for Box<T> {
    fn get_object(&self, space: &ObjectSpace, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        (**self).get_object(space, key)
    }

    fn put_object(&self, space: &ObjectSpace, key: &str, value: &[u8]) -> Result<(), StorageError> {
        (**self).put_object(space, key, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_name() {
        assert_eq!(ObjectSpace::system(b"rc".to_vec()).flat_name(), "7263-0-sys");
        assert_eq!(ObjectSpace::new(vec![0xff], 3, false).flat_name(), "ff-3");
    }

    #[test]
    fn test_shared_store() {
        let store = Arc::new(MemoryStore::new());
        let space = ObjectSpace::system(b"rc".to_vec());
        let shared: Arc<dyn ObjectStore> = store.clone();

        shared.put_object(&space, "markets", b"abc").unwrap();
        assert_eq!(store.get_object(&space, "markets").unwrap(), Some(b"abc".to_vec()));
    }
}
