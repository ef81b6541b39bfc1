//! Directory-backed object store
//!
//! One file per object at `<root>/<space>/<key>.obj`. Writes go to a sibling
//! temporary file that is renamed over the target, so a reader never sees a
//! partially written object.

use crate::{ObjectSpace, ObjectStore, StorageError};
use parking_lot::Mutex;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

pub struct FileStore {
    root: PathBuf,
    write_lock: Mutex<()>,
}

impl FileStore {
    /// Open a store rooted at `root`, creating the directory if needed
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        tracing::debug!(root = %root.display(), "opened file object store");
        Ok(Self {
            root,
            write_lock: Mutex::new(()),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn object_path(&self, space: &ObjectSpace, key: &str) -> Result<PathBuf, StorageError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(StorageError::Backend(format!("invalid object key {key:?}")));
        }
        Ok(self.root.join(space.flat_name()).join(format!("{key}.obj")))
    }
}

impl ObjectStore for FileStore {
    fn get_object(&self, space: &ObjectSpace, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        let path = self.object_path(space, key)?;
        match fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn put_object(&self, space: &ObjectSpace, key: &str, value: &[u8]) -> Result<(), StorageError> {
        let path = self.object_path(space, key)?;
        let _guard = self.write_lock.lock();

        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }

        let tmp = path.with_extension("obj.tmp");
        {
            let mut file = fs::File::create(&tmp)?;
            file.write_all(value)?;
            file.sync_all()?;
        }
        fs::rename(&tmp, &path)?;

        tracing::trace!(path = %path.display(), bytes = value.len(), "object written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_object() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();
        let space = ObjectSpace::system(b"rc".to_vec());
        assert_eq!(store.get_object(&space, "markets").unwrap(), None);
    }

    #[test]
    fn test_rejects_path_keys() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();
        let space = ObjectSpace::system(b"rc".to_vec());
        assert!(store.put_object(&space, "../escape", b"x").is_err());
        assert!(store.get_object(&space, "").is_err());
    }
}
