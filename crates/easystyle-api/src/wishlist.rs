//! Server-side wishlist, separate from the locally stored one.

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::types::{Results, WishlistEntry, WishlistToggleResponse};

impl ApiClient {
    /// # Errors
    ///
    /// Any [`ApiError`].
    pub async fn wishlist(&self) -> Result<Vec<WishlistEntry>, ApiError> {
        let envelope: Results<WishlistEntry> = self.get("/products/wishlist/").await?;
        Ok(envelope.results)
    }

    /// # Errors
    ///
    /// Any [`ApiError`].
    pub async fn toggle_wishlist(
        &self,
        product_uuid: &str,
    ) -> Result<WishlistToggleResponse, ApiError> {
        self.post(
            "/products/wishlist/toggle/",
            &serde_json::json!({ "product_uuid": product_uuid }),
        )
        .await
    }
}
