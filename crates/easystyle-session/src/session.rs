use std::sync::{Arc, PoisonError, RwLock};

use easystyle_api::{ApiClient, AuthResponse, ProfileUpdate, RegisterRequest, User};
use easystyle_storage::{SafeStorage, CURRENT_USER_KEY};

use crate::error::SessionError;

/// The signed-in user and their token, kept in step.
///
/// A user is present only while the client holds a token. Both are set
/// together after login or registration and cleared together on logout or
/// when the stored token is rejected.
pub struct SessionStore {
    api: Arc<ApiClient>,
    storage: SafeStorage,
    user: RwLock<Option<User>>,
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("user", &self.current_user().map(|u| u.username))
            .finish_non_exhaustive()
    }
}

impl SessionStore {
    #[must_use]
    pub fn new(api: Arc<ApiClient>, storage: SafeStorage) -> Self {
        Self {
            api,
            storage,
            user: RwLock::new(None),
        }
    }

    /// Restores the session from a persisted token.
    ///
    /// Uses the persisted user when there is one, otherwise fetches the
    /// profile. A failed fetch clears the token and user.
    pub async fn initialize(&self) -> Option<User> {
        if !self.api.is_authenticated() {
            return None;
        }
        if let Some(user) = self.storage.get_opt::<User>(CURRENT_USER_KEY) {
            *self.user.write().unwrap_or_else(PoisonError::into_inner) = Some(user.clone());
            return Some(user);
        }

        match self.api.profile().await {
            Ok(user) => {
                let mut slot = self.user.write().unwrap_or_else(PoisonError::into_inner);
                self.storage.set(CURRENT_USER_KEY, &user);
                *slot = Some(user.clone());
                Some(user)
            }
            Err(e) => {
                tracing::warn!(error = %e, "stored token rejected, clearing session");
                self.clear();
                None
            }
        }
    }

    /// # Errors
    ///
    /// Returns [`SessionError::Api`]; the previous session is left as it was.
    pub async fn login(&self, username: &str, password: &str) -> Result<User, SessionError> {
        let response = self.api.login(username, password).await?;
        Ok(self.establish(response))
    }

    /// # Errors
    ///
    /// Returns [`SessionError::Api`], including field-level validation errors.
    pub async fn register(&self, request: &RegisterRequest) -> Result<User, SessionError> {
        let response = self.api.register(request).await?;
        Ok(self.establish(response))
    }

    /// Ends the session. Local state is cleared whether or not the backend
    /// call succeeds.
    pub async fn logout(&self) {
        if let Err(e) = self.api.logout().await {
            tracing::warn!(error = %e, "logout request failed, clearing session anyway");
        }
        self.clear();
    }

    /// Replaces the user with the server's updated copy.
    ///
    /// # Errors
    ///
    /// [`SessionError::NotAuthenticated`] without a session, otherwise
    /// [`SessionError::Api`].
    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<User, SessionError> {
        if !self.is_authenticated() {
            return Err(SessionError::NotAuthenticated);
        }
        let epoch = self.api.auth_epoch();
        let user = self.api.update_profile(update).await?;
        let mut slot = self.user.write().unwrap_or_else(PoisonError::into_inner);
        if self.api.auth_epoch() != epoch {
            return Err(SessionError::SessionChanged);
        }
        self.storage.set(CURRENT_USER_KEY, &user);
        *slot = Some(user.clone());
        Ok(user)
    }

    #[must_use]
    pub fn current_user(&self) -> Option<User> {
        self.user
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.user
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
            && self.api.is_authenticated()
    }

    fn establish(&self, response: AuthResponse) -> User {
        let mut slot = self.user.write().unwrap_or_else(PoisonError::into_inner);
        self.api.set_auth_token(&response.token);
        self.storage.set(CURRENT_USER_KEY, &response.user);
        *slot = Some(response.user.clone());
        tracing::info!(user = %response.user.username, "session established");
        response.user
    }

    fn clear(&self) {
        let mut slot = self.user.write().unwrap_or_else(PoisonError::into_inner);
        self.api.clear_auth_token();
        self.storage.remove(CURRENT_USER_KEY);
        *slot = None;
    }
}
