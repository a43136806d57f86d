use async_trait::async_trait;
use easystyle_api::{ApiClient, ApiError, ProductQuery, SearchRequest};
use easystyle_core::Product;

/// Products shown before any styling request.
pub const DEFAULT_INITIAL_PRODUCTS: usize = 8;

/// Product lookups used by the styling flow.
#[async_trait]
pub trait ProductCatalog: Send + Sync {
    /// Relevance-ranked matches for a free-text description.
    async fn search(&self, query: &str) -> Result<Vec<Product>, ApiError>;

    /// Most recently added products.
    async fn newest(&self) -> Result<Vec<Product>, ApiError>;
}

#[async_trait]
impl ProductCatalog for ApiClient {
    async fn search(&self, query: &str) -> Result<Vec<Product>, ApiError> {
        let results = self
            .search_products(&SearchRequest::relevance(query))
            .await?;
        Ok(results.results.into_iter().map(Product::from).collect())
    }

    async fn newest(&self) -> Result<Vec<Product>, ApiError> {
        let page = self.products(&ProductQuery::newest()).await?;
        Ok(page.results.into_iter().map(Product::from).collect())
    }
}

/// Newest catalog products for the landing view, at most `limit`.
///
/// # Errors
///
/// Returns the catalog's [`ApiError`].
pub async fn initial_products(
    catalog: &dyn ProductCatalog,
    limit: usize,
) -> Result<Vec<Product>, ApiError> {
    let products = catalog.newest().await?;
    Ok(products.into_iter().take(limit).collect())
}
