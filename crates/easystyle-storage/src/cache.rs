use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::safe::SafeStorage;
use crate::{now_millis, CACHE_PREFIX};

/// Lifetime of a cache entry written without an explicit TTL.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// A cached payload as persisted under `cache_<key>`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    pub data: serde_json::Value,
    /// Write time, milliseconds since the Unix epoch.
    pub timestamp: i64,
    /// Time to live in milliseconds.
    pub ttl: i64,
}

impl CacheEntry {
    /// An entry is expired once its age reaches its TTL, so a zero TTL is
    /// expired from the moment it is written.
    #[must_use]
    pub fn is_expired_at(&self, now_ms: i64) -> bool {
        now_ms.saturating_sub(self.timestamp) >= self.ttl
    }
}

/// TTL cache for backend responses, layered on [`SafeStorage`].
#[derive(Debug, Clone)]
pub struct CacheManager {
    storage: SafeStorage,
}

impl CacheManager {
    #[must_use]
    pub fn new(storage: SafeStorage) -> Self {
        Self { storage }
    }

    fn storage_key(key: &str) -> String {
        format!("{CACHE_PREFIX}{key}")
    }

    /// Returns the cached value, or `None` if it is missing, expired, or
    /// does not decode as `T`. Expired entries are deleted as a side effect.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let entry: CacheEntry = self.storage.get_opt(&Self::storage_key(key))?;
        if entry.is_expired_at(now_millis()) {
            tracing::debug!(key, "cache entry expired, purging");
            self.remove(key);
            return None;
        }
        serde_json::from_value(entry.data)
            .map_err(|e| tracing::warn!(key, error = %e, "cached value has unexpected shape"))
            .ok()
    }

    /// Stores `data` stamped with the current time. `ttl` defaults to
    /// [`DEFAULT_CACHE_TTL`].
    pub fn set<T: Serialize + ?Sized>(&self, key: &str, data: &T, ttl: Option<Duration>) -> bool {
        let data = match serde_json::to_value(data) {
            Ok(data) => data,
            Err(e) => {
                tracing::error!(key, error = %e, "cache value failed to encode");
                return false;
            }
        };
        let ttl = ttl.unwrap_or(DEFAULT_CACHE_TTL);
        let entry = CacheEntry {
            data,
            timestamp: now_millis(),
            ttl: i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX),
        };
        self.storage.set(&Self::storage_key(key), &entry)
    }

    pub fn remove(&self, key: &str) -> bool {
        self.storage.remove(&Self::storage_key(key))
    }

    /// Deletes every cache entry, leaving other keys alone.
    pub fn clear(&self) -> bool {
        if !self.storage.is_available() {
            return false;
        }
        self.storage
            .keys()
            .iter()
            .filter(|k| k.starts_with(CACHE_PREFIX))
            .fold(true, |ok, k| self.storage.remove(k) && ok)
    }
}
