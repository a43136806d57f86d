//! Auth endpoints.
//!
//! These only talk to the backend. Storing or clearing the returned token
//! is left to the session layer, which owns the token/user pair.

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::types::{
    AuthResponse, Dashboard, LoginRequest, MessageResponse, ProfileUpdate, RegisterRequest, User,
};

impl ApiClient {
    /// `POST /auth/register/`.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Validation`] when the backend rejects a field.
    /// - [`ApiError::Status`] / [`ApiError::Http`] on other failures.
    pub async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse, ApiError> {
        self.post("/auth/register/", request).await
    }

    /// `POST /auth/login/`.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Validation`] for bad credentials.
    /// - [`ApiError::Status`] / [`ApiError::Http`] on other failures.
    pub async fn login(&self, username: &str, password: &str) -> Result<AuthResponse, ApiError> {
        self.post("/auth/login/", &LoginRequest { username, password })
            .await
    }

    /// # Errors
    ///
    /// Any [`ApiError`].
    pub async fn logout(&self) -> Result<MessageResponse, ApiError> {
        self.post("/auth/logout/", &serde_json::json!({})).await
    }

    /// # Errors
    ///
    /// Any [`ApiError`]; 401 means the token is no longer valid.
    pub async fn profile(&self) -> Result<User, ApiError> {
        self.get("/auth/profile/").await
    }

    /// # Errors
    ///
    /// Any [`ApiError`].
    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<User, ApiError> {
        self.put("/auth/profile/", update).await
    }

    /// # Errors
    ///
    /// Any [`ApiError`].
    pub async fn dashboard(&self) -> Result<Dashboard, ApiError> {
        self.get("/auth/dashboard/").await
    }
}
