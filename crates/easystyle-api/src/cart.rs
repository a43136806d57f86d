//! Cart endpoints. Every call returns the full cart as the server now sees it.

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::types::{AddToCartRequest, Cart, CartItemRef, UpdateCartItemRequest};

impl ApiClient {
    /// # Errors
    ///
    /// Any [`ApiError`].
    pub async fn cart(&self) -> Result<Cart, ApiError> {
        self.get("/products/cart/").await
    }

    /// # Errors
    ///
    /// [`ApiError::Validation`] for an unknown product or an out-of-range
    /// quantity; any other [`ApiError`] otherwise.
    pub async fn add_cart_item(&self, request: &AddToCartRequest) -> Result<Cart, ApiError> {
        self.post("/products/cart/add_item/", request).await
    }

    /// # Errors
    ///
    /// Any [`ApiError`].
    pub async fn update_cart_item(&self, item_id: i64, quantity: u32) -> Result<Cart, ApiError> {
        self.post(
            "/products/cart/update_item/",
            &UpdateCartItemRequest { item_id, quantity },
        )
        .await
    }

    /// # Errors
    ///
    /// Any [`ApiError`].
    pub async fn remove_cart_item(&self, item_id: i64) -> Result<Cart, ApiError> {
        self.post("/products/cart/remove_item/", &CartItemRef { item_id })
            .await
    }

    /// # Errors
    ///
    /// Any [`ApiError`].
    pub async fn clear_cart(&self) -> Result<Cart, ApiError> {
        self.post("/products/cart/clear_cart/", &serde_json::json!({}))
            .await
    }
}
