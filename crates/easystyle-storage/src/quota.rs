use serde::Serialize;

use crate::cache::CacheManager;
use crate::history::HistoryManager;
use crate::safe::SafeStorage;

/// Rough per-origin budget used for the usage estimate.
pub const ESTIMATED_QUOTA_BYTES: usize = 5 * 1024 * 1024;

/// History length kept by [`StorageManager::cleanup`].
pub const CLEANUP_HISTORY_LEN: usize = 25;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QuotaInfo {
    pub used: usize,
    pub available: usize,
}

/// Whole-store housekeeping.
#[derive(Debug, Clone)]
pub struct StorageManager {
    storage: SafeStorage,
    cache: CacheManager,
    history: HistoryManager,
}

impl StorageManager {
    #[must_use]
    pub fn new(storage: SafeStorage) -> Self {
        Self {
            cache: CacheManager::new(storage.clone()),
            history: HistoryManager::new(storage.clone()),
            storage,
        }
    }

    /// Estimated usage; `None` when storage is unavailable.
    #[must_use]
    pub fn quota_info(&self) -> Option<QuotaInfo> {
        if !self.storage.is_available() {
            return None;
        }
        let used = self.storage.size();
        Some(QuotaInfo {
            used,
            available: ESTIMATED_QUOTA_BYTES.saturating_sub(used),
        })
    }

    /// Drops every cache entry and trims history to
    /// [`CLEANUP_HISTORY_LEN`] entries.
    pub fn cleanup(&self) -> bool {
        let cache_cleared = self.cache.clear();
        let history_trimmed = self.history.trim_to(CLEANUP_HISTORY_LEN);
        tracing::info!(cache_cleared, history_trimmed, "storage cleanup finished");
        cache_cleared && history_trimmed
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::backend::MemoryStore;
    use crate::history::NewHistoryEntry;

    #[test]
    fn quota_info_counts_keys_and_values() {
        let storage = SafeStorage::in_memory();
        storage.set("ab", &"xyz");
        let info = StorageManager::new(storage).quota_info().expect("available");
        // "ab" + "\"xyz\""
        assert_eq!(info.used, 7);
        assert_eq!(info.available, ESTIMATED_QUOTA_BYTES - 7);
    }

    #[test]
    fn quota_info_none_when_unavailable() {
        let store = Arc::new(MemoryStore::new());
        store.set_available(false);
        let manager = StorageManager::new(SafeStorage::new(store));
        assert_eq!(manager.quota_info(), None);
    }

    #[test]
    fn cleanup_clears_cache_and_trims_history() {
        let storage = SafeStorage::in_memory();
        let cache = CacheManager::new(storage.clone());
        let history = HistoryManager::new(storage.clone());
        cache.set("products", &vec![1, 2, 3], None);
        for i in 0..40 {
            history.add(NewHistoryEntry {
                prompt: format!("look {i}"),
                ..NewHistoryEntry::default()
            });
        }

        assert!(StorageManager::new(storage).cleanup());
        assert_eq!(cache.get::<Vec<i32>>("products"), None);
        let kept = history.get_all();
        assert_eq!(kept.len(), CLEANUP_HISTORY_LEN);
        assert_eq!(kept[0].prompt, "look 39");
    }
}
