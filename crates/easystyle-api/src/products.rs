//! Catalog endpoints.

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::types::{
    ApiProduct, Category, PagedProducts, ProductQuery, Results, SearchRequest, SearchResults,
    Statistics,
};

impl ApiClient {
    /// # Errors
    ///
    /// Any [`ApiError`].
    pub async fn categories(&self) -> Result<Vec<Category>, ApiError> {
        let envelope: Results<Category> = self.get("/products/categories/").await?;
        Ok(envelope.results)
    }

    /// `GET /products/` with the query's non-empty filters.
    ///
    /// # Errors
    ///
    /// Any [`ApiError`].
    pub async fn products(&self, query: &ProductQuery) -> Result<PagedProducts, ApiError> {
        self.get_with_query("/products/", &query.query_pairs())
            .await
    }

    /// # Errors
    ///
    /// Any [`ApiError`]; [`ApiError::Status`] with 404 for an unknown id.
    pub async fn product(&self, uuid: &str) -> Result<ApiProduct, ApiError> {
        self.get(&format!("/products/{uuid}/")).await
    }

    /// # Errors
    ///
    /// Any [`ApiError`].
    pub async fn search_products(&self, request: &SearchRequest) -> Result<SearchResults, ApiError> {
        self.post("/products/search/", request).await
    }

    /// # Errors
    ///
    /// Any [`ApiError`].
    pub async fn statistics(&self) -> Result<Statistics, ApiError> {
        self.get("/products/statistics/").await
    }
}
