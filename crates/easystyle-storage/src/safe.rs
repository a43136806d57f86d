use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::backend::{KeyValueStore, MemoryStore};

const AVAILABILITY_KEY: &str = "__storage_test__";

/// Error-containing facade over a [`KeyValueStore`].
///
/// Backend failures are logged and turned into the default value or
/// `false`. Nothing here returns an error or panics. Use
/// [`SafeStorage::is_available`] to check the backend explicitly.
#[derive(Clone)]
pub struct SafeStorage {
    backend: Arc<dyn KeyValueStore>,
}

impl std::fmt::Debug for SafeStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SafeStorage").finish_non_exhaustive()
    }
}

impl SafeStorage {
    #[must_use]
    pub fn new(backend: Arc<dyn KeyValueStore>) -> Self {
        Self { backend }
    }

    /// Storage over a fresh [`MemoryStore`].
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    /// Writes and deletes a sentinel key. `false` means the backend is
    /// currently refusing writes.
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.backend
            .set_item(AVAILABILITY_KEY, AVAILABILITY_KEY)
            .and_then(|()| self.backend.remove_item(AVAILABILITY_KEY))
            .is_ok()
    }

    /// Returns the decoded value under `key`, or `default` when the key is
    /// absent, storage is unavailable, or the stored JSON does not decode.
    pub fn get<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        self.get_opt(key).unwrap_or(default)
    }

    /// Like [`Self::get`] but reports absence as `None`.
    pub fn get_opt<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = match self.backend.get_item(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                tracing::error!(key, error = %e, "error reading from storage");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::error!(key, error = %e, "stored value failed to decode");
                None
            }
        }
    }

    /// Encodes and stores `value`. Returns `false` on any failure.
    pub fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> bool {
        let encoded = match serde_json::to_string(value) {
            Ok(encoded) => encoded,
            Err(e) => {
                tracing::error!(key, error = %e, "value failed to encode");
                return false;
            }
        };
        match self.backend.set_item(key, &encoded) {
            Ok(()) => true,
            Err(e) => {
                tracing::error!(key, error = %e, "error writing to storage");
                false
            }
        }
    }

    pub fn remove(&self, key: &str) -> bool {
        match self.backend.remove_item(key) {
            Ok(()) => true,
            Err(e) => {
                tracing::error!(key, error = %e, "error removing from storage");
                false
            }
        }
    }

    pub fn clear(&self) -> bool {
        match self.backend.clear() {
            Ok(()) => true,
            Err(e) => {
                tracing::error!(error = %e, "error clearing storage");
                false
            }
        }
    }

    /// All stored keys; empty when storage is unavailable.
    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        self.backend.keys().unwrap_or_else(|e| {
            tracing::error!(error = %e, "error listing storage keys");
            Vec::new()
        })
    }

    /// Sum of key and value lengths across every entry, in bytes.
    #[must_use]
    pub fn size(&self) -> usize {
        self.keys()
            .into_iter()
            .map(|key| {
                let value_len = self
                    .backend
                    .get_item(&key)
                    .ok()
                    .flatten()
                    .map_or(0, |v| v.len());
                key.len() + value_len
            })
            .sum()
    }
}
