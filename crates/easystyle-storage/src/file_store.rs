//! Disk-backed [`KeyValueStore`].
//!
//! The whole map lives in one JSON document (`storage.json`) inside the
//! configured directory. Every mutation rewrites the document through a
//! temporary file and a rename, so a crash never leaves a half-written map.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::backend::KeyValueStore;
use crate::error::StorageError;

const FILE_NAME: &str = "storage.json";

#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl FileStore {
    /// Opens (or creates) the store under `dir`.
    ///
    /// An unreadable or corrupt document is logged and replaced by an empty
    /// map on the next write.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Io`] if `dir` cannot be created.
    pub fn open(dir: &Path) -> Result<Self, StorageError> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(FILE_NAME);
        let entries = match std::fs::read_to_string(&path) {
            Ok(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                tracing::warn!(path = %path.display(), error = %e, "corrupt storage file, starting empty");
                BTreeMap::new()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(StorageError::Io(e)),
        };
        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, BTreeMap<String, String>>, StorageError> {
        self.entries.lock().map_err(|_| StorageError::Poisoned)
    }

    fn persist(&self, entries: &BTreeMap<String, String>) -> Result<(), StorageError> {
        let body = serde_json::to_string(entries).map_err(|e| StorageError::Json {
            context: self.path.display().to_string(),
            source: e,
        })?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, body)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    /// Applies `mutate` to a copy of the map and commits it only if the
    /// write to disk succeeds.
    fn mutate<F>(&self, mutate: F) -> Result<(), StorageError>
    where
        F: FnOnce(&mut BTreeMap<String, String>),
    {
        let mut entries = self.lock()?;
        let mut next = entries.clone();
        mutate(&mut next);
        self.persist(&next)?;
        *entries = next;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.mutate(|entries| {
            entries.insert(key.to_owned(), value.to_owned());
        })
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.mutate(|entries| {
            entries.remove(key);
        })
    }

    fn clear(&self) -> Result<(), StorageError> {
        self.mutate(BTreeMap::clear)
    }

    fn keys(&self) -> Result<Vec<String>, StorageError> {
        Ok(self.lock()?.keys().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir() -> PathBuf {
        std::env::temp_dir().join(format!("easystyle-file-store-{}", uuid::Uuid::now_v7()))
    }

    #[test]
    fn values_survive_reopen() {
        let dir = temp_dir();
        {
            let store = FileStore::open(&dir).unwrap();
            store.set_item("easystyle_history", "[]").unwrap();
            store.set_item("authToken", "\"abc\"").unwrap();
            store.remove_item("authToken").unwrap();
        }
        let reopened = FileStore::open(&dir).unwrap();
        assert_eq!(
            reopened.get_item("easystyle_history").unwrap().as_deref(),
            Some("[]")
        );
        assert!(reopened.get_item("authToken").unwrap().is_none());
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn corrupt_file_opens_empty() {
        let dir = temp_dir();
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join(FILE_NAME), "{not json").unwrap();

        let store = FileStore::open(&dir).unwrap();
        assert!(store.keys().unwrap().is_empty());
        store.set_item("k", "1").unwrap();
        assert_eq!(store.get_item("k").unwrap().as_deref(), Some("1"));
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn clear_empties_the_document() {
        let dir = temp_dir();
        let store = FileStore::open(&dir).unwrap();
        store.set_item("a", "1").unwrap();
        store.set_item("b", "2").unwrap();
        store.clear().unwrap();
        assert!(FileStore::open(&dir).unwrap().keys().unwrap().is_empty());
        std::fs::remove_dir_all(&dir).ok();
    }
}
