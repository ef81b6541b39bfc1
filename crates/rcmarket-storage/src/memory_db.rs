//! In-memory object store

use crate::{ObjectSpace, ObjectStore, StorageError};
use parking_lot::RwLock;
use std::collections::HashMap;

/// Object store held in process memory
pub struct MemoryStore {
    data: RwLock<HashMap<(ObjectSpace, String), Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            data: RwLock::new(HashMap::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.data.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.read().is_empty()
    }

    pub fn contains(&self, space: &ObjectSpace, key: &str) -> bool {
        self.data.read().contains_key(&(space.clone(), key.to_string()))
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ObjectStore for MemoryStore {
    fn get_object(&self, space: &ObjectSpace, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        Ok(self.data.read().get(&(space.clone(), key.to_string())).cloned())
    }

    fn put_object(&self, space: &ObjectSpace, key: &str, value: &[u8]) -> Result<(), StorageError> {
        self.data
            .write()
            .insert((space.clone(), key.to_string()), value.to_vec());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spaces_are_isolated() {
        let store = MemoryStore::new();
        let a = ObjectSpace::system(b"a".to_vec());
        let b = ObjectSpace::system(b"b".to_vec());

        store.put_object(&a, "markets", &[1]).unwrap();
        assert!(store.contains(&a, "markets"));
        assert!(!store.contains(&b, "markets"));
        assert_eq!(store.get_object(&b, "markets").unwrap(), None);

        store.put_object(&a, "markets", &[2]).unwrap();
        assert_eq!(store.get_object(&a, "markets").unwrap(), Some(vec![2]));
        assert_eq!(store.len(), 1);
    }
}
