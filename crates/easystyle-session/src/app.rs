use std::sync::Arc;

use easystyle_api::{ApiClient, User};
use easystyle_core::AppConfig;
use easystyle_storage::{
    CacheManager, FileStore, HistoryManager, PreferencesManager, SafeStorage, StorageManager,
    WishlistManager,
};

use crate::cart::CartStore;
use crate::error::SessionError;
use crate::session::SessionStore;

/// Everything a front end needs, built once and passed by reference.
#[derive(Debug)]
pub struct AppState {
    pub config: AppConfig,
    pub storage: SafeStorage,
    pub api: Arc<ApiClient>,
    pub session: SessionStore,
    pub cart: CartStore,
    pub history: HistoryManager,
    pub wishlist: WishlistManager,
    pub preferences: PreferencesManager,
    pub cache: CacheManager,
    pub storage_manager: StorageManager,
}

impl AppState {
    /// # Errors
    ///
    /// Returns [`SessionError::Api`] if the HTTP client cannot be built.
    pub fn new(config: AppConfig, storage: SafeStorage) -> Result<Self, SessionError> {
        let api = Arc::new(ApiClient::new(&config, storage.clone())?);
        Ok(Self {
            session: SessionStore::new(Arc::clone(&api), storage.clone()),
            cart: CartStore::new(Arc::clone(&api)),
            history: HistoryManager::new(storage.clone()),
            wishlist: WishlistManager::new(storage.clone()),
            preferences: PreferencesManager::new(storage.clone()),
            cache: CacheManager::new(storage.clone()),
            storage_manager: StorageManager::new(storage.clone()),
            config,
            storage,
            api,
        })
    }

    /// Builds the state on a [`FileStore`] under `config.storage_dir`.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Storage`] if the directory cannot be created.
    pub fn from_config(config: AppConfig) -> Result<Self, SessionError> {
        let store = FileStore::open(&config.storage_dir)?;
        Self::new(config, SafeStorage::new(Arc::new(store)))
    }

    /// Restores a persisted session and brings the cart in line with it:
    /// loaded when signed in, empty otherwise.
    pub async fn initialize(&self) -> Option<User> {
        let user = self.session.initialize().await;
        if let Err(e) = self.cart.sync_with_session().await {
            tracing::warn!(error = %e, "initial cart sync failed");
        }
        user
    }

    /// # Errors
    ///
    /// As [`SessionStore::login`]. A failed cart fetch afterwards is logged
    /// and does not fail the login.
    pub async fn login(&self, username: &str, password: &str) -> Result<User, SessionError> {
        let user = self.session.login(username, password).await?;
        if let Err(e) = self.cart.fetch_cart().await {
            tracing::warn!(error = %e, "cart fetch after login failed");
        }
        Ok(user)
    }

    /// Clears the session and the cart together.
    pub async fn logout(&self) {
        self.session.logout().await;
        self.cart.reset();
    }
}
