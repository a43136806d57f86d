//! Best-effort local persistence for EasyStyle.
//!
//! A [`KeyValueStore`] backend holds JSON-encoded strings. [`SafeStorage`]
//! wraps it so that no storage failure ever reaches callers: reads fall back
//! to defaults and writes report `false`. The managers built on top keep the
//! style history, wishlist, preferences and a TTL response cache.

pub mod backend;
pub mod cache;
pub mod error;
pub mod file_store;
pub mod history;
pub mod preferences;
pub mod quota;
pub mod safe;
pub mod wishlist;

pub use backend::{KeyValueStore, MemoryStore};
pub use cache::{CacheEntry, CacheManager, DEFAULT_CACHE_TTL};
pub use error::{StorageError, WishlistError};
pub use file_store::FileStore;
pub use history::{HistoryEntry, HistoryManager, HistoryProduct, NewHistoryEntry};
pub use preferences::{Language, PreferencesManager, PreferencesPatch, Theme, UserPreferences};
pub use quota::{QuotaInfo, StorageManager};
pub use safe::SafeStorage;
pub use wishlist::{NewWishlistItem, WishlistItem, WishlistManager, WishlistToggle};

/// Key holding the backend auth token.
pub const AUTH_TOKEN_KEY: &str = "authToken";
/// Key holding the signed-in user's profile.
pub const CURRENT_USER_KEY: &str = "currentUser";
pub const HISTORY_KEY: &str = "easystyle_history";
pub const PREFERENCES_KEY: &str = "easystyle_preferences";
pub const WISHLIST_KEY: &str = "easystyle_wishlist";
/// Prefix shared by every cache entry key.
pub const CACHE_PREFIX: &str = "cache_";

/// Milliseconds since the Unix epoch.
pub(crate) fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Timestamp-ordered unique id for list entries.
pub(crate) fn new_entry_id() -> String {
    uuid::Uuid::now_v7().to_string()
}
