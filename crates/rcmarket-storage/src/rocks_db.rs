//! RocksDB-backed object store

use crate::{ObjectSpace, ObjectStore, StorageError};
use rocksdb::DB;
use std::path::Path;

pub struct RocksStore {
    db: DB,
}

impl RocksStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let db = DB::open_default(path).map_err(|e| StorageError::Backend(e.to_string()))?;
        Ok(Self { db })
    }

    fn db_key(space: &ObjectSpace, key: &str) -> Vec<u8> {
        let mut out = space.flat_name().into_bytes();
        out.push(b'/');
        out.extend_from_slice(key.as_bytes());
        out
    }
}

impl ObjectStore for RocksStore {
    fn get_object(&self, space: &ObjectSpace, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        self.db
            .get(Self::db_key(space, key))
            .map_err(|e| StorageError::Backend(e.to_string()))
    }

    fn put_object(&self, space: &ObjectSpace, key: &str, value: &[u8]) -> Result<(), StorageError> {
        self.db
            .put(Self::db_key(space, key), value)
            .map_err(|e| StorageError::Backend(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_and_isolation() {
        let dir = tempfile::tempdir().unwrap();
        let store = RocksStore::open(dir.path()).unwrap();
        let space = ObjectSpace::system(b"resources".to_vec());
        let other = ObjectSpace::new(b"resources".to_vec(), 1, false);

        assert_eq!(store.get_object(&space, "markets").unwrap(), None);
        store.put_object(&space, "markets", b"state").unwrap();
        assert_eq!(store.get_object(&space, "markets").unwrap(), Some(b"state".to_vec()));
        assert_eq!(store.get_object(&other, "markets").unwrap(), None);
    }
}
