use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use easystyle_api::{AddToCartRequest, ApiClient, ApiError, Cart};

use crate::error::SessionError;

/// Local copy of the server-owned cart.
///
/// Every mutation replaces the copy with the aggregate the server returns;
/// totals are never computed here. A response is applied only if the auth
/// epoch it was requested under is still current, so a reply that lands
/// after logout cannot repopulate the cart.
pub struct CartStore {
    api: Arc<ApiClient>,
    cart: RwLock<Option<Cart>>,
    last_error: RwLock<Option<String>>,
    fetching: AtomicBool,
}

/// What a failed request does to the local copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OnError {
    KeepCart,
    DropCart,
}

/// Clears the in-flight flag when the fetch finishes or is dropped.
struct FetchGuard<'a>(&'a AtomicBool);

impl Drop for FetchGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl std::fmt::Debug for CartStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartStore")
            .field("items", &self.item_count())
            .field("fetching", &self.fetching.load(Ordering::Acquire))
            .finish_non_exhaustive()
    }
}

impl CartStore {
    #[must_use]
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self {
            api,
            cart: RwLock::new(None),
            last_error: RwLock::new(None),
            fetching: AtomicBool::new(false),
        }
    }

    /// Loads the cart from the server.
    ///
    /// Returns `Ok(false)` without a request when signed out or when another
    /// fetch is already in flight. A failed fetch drops the local cart.
    ///
    /// # Errors
    ///
    /// [`SessionError::Api`] on a failed request, [`SessionError::SessionChanged`]
    /// when the session changed before the reply arrived.
    pub async fn fetch_cart(&self) -> Result<bool, SessionError> {
        if !self.api.is_authenticated() {
            self.reset();
            return Ok(false);
        }
        if self
            .fetching
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            tracing::debug!("cart fetch already in flight, skipping");
            return Ok(false);
        }
        let _guard = FetchGuard(&self.fetching);

        let epoch = self.api.auth_epoch();
        let result = self.api.cart().await;
        self.apply(epoch, result, OnError::DropCart)?;
        Ok(true)
    }

    /// # Errors
    ///
    /// [`SessionError::NotAuthenticated`] when signed out; otherwise as
    /// [`CartStore::fetch_cart`].
    pub async fn add_to_cart(&self, request: &AddToCartRequest) -> Result<Cart, SessionError> {
        let epoch = self.require_auth()?;
        let result = self.api.add_cart_item(request).await;
        self.apply(epoch, result, OnError::KeepCart)
    }

    /// # Errors
    ///
    /// See [`CartStore::add_to_cart`].
    pub async fn update_item(&self, item_id: i64, quantity: u32) -> Result<Cart, SessionError> {
        let epoch = self.require_auth()?;
        let result = self.api.update_cart_item(item_id, quantity).await;
        self.apply(epoch, result, OnError::KeepCart)
    }

    /// # Errors
    ///
    /// See [`CartStore::add_to_cart`].
    pub async fn remove_item(&self, item_id: i64) -> Result<Cart, SessionError> {
        let epoch = self.require_auth()?;
        let result = self.api.remove_cart_item(item_id).await;
        self.apply(epoch, result, OnError::KeepCart)
    }

    /// # Errors
    ///
    /// See [`CartStore::add_to_cart`].
    pub async fn clear(&self) -> Result<Cart, SessionError> {
        let epoch = self.require_auth()?;
        let result = self.api.clear_cart().await;
        self.apply(epoch, result, OnError::KeepCart)
    }

    /// Fetches the cart when signed in, drops it when signed out.
    ///
    /// # Errors
    ///
    /// As [`CartStore::fetch_cart`].
    pub async fn sync_with_session(&self) -> Result<(), SessionError> {
        if self.api.is_authenticated() {
            self.fetch_cart().await?;
        } else {
            self.reset();
        }
        Ok(())
    }

    /// Current cart; always `None` while signed out.
    #[must_use]
    pub fn cart(&self) -> Option<Cart> {
        if !self.api.is_authenticated() {
            return None;
        }
        self.cart
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    #[must_use]
    pub fn is_in_cart(&self, product_uuid: &str, size: &str) -> bool {
        self.cart()
            .is_some_and(|cart| cart.contains(product_uuid, size))
    }

    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.cart().map_or(0, |cart| cart.total_items)
    }

    #[must_use]
    pub fn total(&self) -> i64 {
        self.cart().map_or(0, |cart| cart.total_price)
    }

    /// Message of the most recent failed request, cleared by the next success.
    #[must_use]
    pub fn last_error(&self) -> Option<String> {
        self.last_error
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn reset(&self) {
        *self.cart.write().unwrap_or_else(PoisonError::into_inner) = None;
        *self.last_error.write().unwrap_or_else(PoisonError::into_inner) = None;
    }

    fn require_auth(&self) -> Result<u64, SessionError> {
        if self.api.is_authenticated() {
            Ok(self.api.auth_epoch())
        } else {
            Err(SessionError::NotAuthenticated)
        }
    }

    fn apply(
        &self,
        epoch: u64,
        result: Result<Cart, ApiError>,
        on_error: OnError,
    ) -> Result<Cart, SessionError> {
        let mut slot = self.cart.write().unwrap_or_else(PoisonError::into_inner);
        if self.api.auth_epoch() != epoch || !self.api.is_authenticated() {
            tracing::debug!(epoch, "discarding cart response from a previous session");
            return Err(SessionError::SessionChanged);
        }

        let mut last_error = self.last_error.write().unwrap_or_else(PoisonError::into_inner);
        match result {
            Ok(cart) => {
                tracing::debug!(items = cart.total_items, total = cart.total_price, "cart updated");
                *last_error = None;
                *slot = Some(cart.clone());
                Ok(cart)
            }
            Err(e) => {
                tracing::warn!(error = %e, "cart request failed");
                *last_error = Some(e.to_string());
                if on_error == OnError::DropCart {
                    *slot = None;
                }
                Err(e.into())
            }
        }
    }
}
