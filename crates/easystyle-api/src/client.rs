//! Core HTTP plumbing shared by every endpoint group.
//!
//! The client attaches `Authorization: Token <token>` when a token is set,
//! encodes bodies as JSON and maps non-2xx responses onto [`ApiError`].

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{PoisonError, RwLock};
use std::time::Duration;

use easystyle_core::AppConfig;
use easystyle_storage::{SafeStorage, AUTH_TOKEN_KEY};
use reqwest::{Client, Method, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::ApiError;

/// Client for the EasyStyle backend.
///
/// Use [`ApiClient::new`] with the loaded config, or
/// [`ApiClient::with_base_url`] to point at a mock server in tests.
pub struct ApiClient {
    client: Client,
    base_url: String,
    storage: SafeStorage,
    token: RwLock<Option<String>>,
    auth_epoch: AtomicU64,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("authenticated", &self.is_authenticated())
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// # Errors
    ///
    /// See [`ApiClient::with_base_url`].
    pub fn new(config: &AppConfig, storage: SafeStorage) -> Result<Self, ApiError> {
        Self::with_base_url(&config.api_base_url, config.request_timeout_secs, storage)
    }

    /// Creates a client against `base_url`, restoring any token persisted
    /// under `authToken`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Http`] if the underlying `reqwest::Client` cannot
    /// be constructed, or [`ApiError::InvalidUrl`] if `base_url` does not parse.
    pub fn with_base_url(
        base_url: &str,
        timeout_secs: u64,
        storage: SafeStorage,
    ) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("easystyle/0.1")
            .build()?;

        // Endpoints start with '/', so keep the base free of trailing slashes.
        let base_url = base_url.trim_end_matches('/').to_owned();
        Url::parse(&base_url).map_err(|e| ApiError::InvalidUrl(format!("'{base_url}': {e}")))?;

        let token = storage.get_opt::<String>(AUTH_TOKEN_KEY);
        Ok(Self {
            client,
            base_url,
            storage,
            token: RwLock::new(token),
            auth_epoch: AtomicU64::new(0),
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    #[must_use]
    pub fn auth_token(&self) -> Option<String> {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Counter bumped on every token change. Work started under one epoch
    /// can compare against the current value to detect a login or logout
    /// that happened while it was in flight.
    #[must_use]
    pub fn auth_epoch(&self) -> u64 {
        self.auth_epoch.load(Ordering::SeqCst)
    }

    /// Sets the in-memory token and its persisted copy under one write lock.
    pub fn set_auth_token(&self, token: &str) {
        let mut guard = self.token.write().unwrap_or_else(PoisonError::into_inner);
        if !self.storage.set(AUTH_TOKEN_KEY, token) {
            tracing::warn!("auth token could not be persisted");
        }
        *guard = Some(token.to_owned());
        self.auth_epoch.fetch_add(1, Ordering::SeqCst);
    }

    pub fn clear_auth_token(&self) {
        let mut guard = self.token.write().unwrap_or_else(PoisonError::into_inner);
        self.storage.remove(AUTH_TOKEN_KEY);
        *guard = None;
        self.auth_epoch.fetch_add(1, Ordering::SeqCst);
    }

    /// # Errors
    ///
    /// See [`ApiError`].
    pub async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, ApiError> {
        self.send(Method::GET, endpoint, |req| req).await
    }

    /// GET with query parameters, percent-encoded by `reqwest`.
    pub(crate) async fn get_with_query<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        pairs: &[(&'static str, String)],
    ) -> Result<T, ApiError> {
        self.send(Method::GET, endpoint, |req| req.query(pairs)).await
    }

    /// # Errors
    ///
    /// See [`ApiError`].
    pub async fn post<B, T>(&self, endpoint: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send(Method::POST, endpoint, |req| req.json(body)).await
    }

    /// # Errors
    ///
    /// See [`ApiError`].
    pub async fn put<B, T>(&self, endpoint: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send(Method::PUT, endpoint, |req| req.json(body)).await
    }

    /// # Errors
    ///
    /// See [`ApiError`].
    pub async fn delete<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, ApiError> {
        self.send(Method::DELETE, endpoint, |req| req).await
    }

    /// Posts a multipart form. The content type (with boundary) is set by
    /// `reqwest`.
    pub(crate) async fn post_multipart<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        form: reqwest::multipart::Form,
    ) -> Result<T, ApiError> {
        self.send(Method::POST, endpoint, |req| req.multipart(form))
            .await
    }

    pub(crate) fn url(&self, endpoint: &str) -> String {
        format!("{}{endpoint}", self.base_url)
    }

    async fn send<T, F>(&self, method: Method, endpoint: &str, body: F) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        F: FnOnce(RequestBuilder) -> RequestBuilder,
    {
        let mut request = self.client.request(method.clone(), self.url(endpoint));
        if let Some(token) = self.auth_token() {
            request = request.header(reqwest::header::AUTHORIZATION, format!("Token {token}"));
        }
        let response = body(request).send().await?;
        let status = response.status();
        tracing::debug!(method = %method, endpoint, status = status.as_u16(), "api response");

        let text = response.text().await?;
        if !status.is_success() {
            let err = error_from_response(status.as_u16(), &text);
            tracing::warn!(method = %method, endpoint, status = status.as_u16(), error = %err, "api request failed");
            return Err(err);
        }

        let text = if text.trim().is_empty() { "null" } else { text.as_str() };
        serde_json::from_str(text).map_err(|e| ApiError::Deserialize {
            context: format!("{method} {endpoint}"),
            source: e,
        })
    }
}

/// Maps a failed response onto [`ApiError`].
///
/// 400 bodies are read as field → messages. Everything else becomes
/// [`ApiError::Status`] carrying the body's `message` (or `error`/`detail`)
/// or `HTTP Error: <status>`.
pub(crate) fn error_from_response(status: u16, body: &str) -> ApiError {
    let parsed: Option<serde_json::Value> = serde_json::from_str(body).ok();
    if status == 400 {
        return ApiError::Validation {
            fields: validation_fields(parsed.as_ref()),
        };
    }
    let message = parsed
        .as_ref()
        .and_then(|v| {
            ["message", "error", "detail"]
                .iter()
                .find_map(|k| v.get(k).and_then(serde_json::Value::as_str))
        })
        .map_or_else(|| format!("HTTP Error: {status}"), str::to_owned);
    ApiError::Status { status, message }
}

fn validation_fields(body: Option<&serde_json::Value>) -> BTreeMap<String, Vec<String>> {
    let Some(serde_json::Value::Object(map)) = body else {
        return BTreeMap::new();
    };
    map.iter()
        .map(|(field, value)| {
            let messages = match value {
                serde_json::Value::Array(items) => items.iter().map(message_text).collect(),
                other => vec![message_text(other)],
            };
            (field.clone(), messages)
        })
        .collect()
}

fn message_text(value: &serde_json::Value) -> String {
    value
        .as_str()
        .map_or_else(|| value.to_string(), str::to_owned)
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
