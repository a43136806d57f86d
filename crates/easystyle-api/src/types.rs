//! Wire types for the EasyStyle backend.
//!
//! Field names follow the backend's snake_case JSON. Decimal fields arrive
//! as either JSON numbers or strings such as `"59000.00"`; the price helpers
//! below accept both and round to whole units.

use serde::{Deserialize, Deserializer, Serialize};

use easystyle_core::{Product, ProductCategory};

#[allow(clippy::cast_possible_truncation)]
fn price_from_value(value: &serde_json::Value) -> Option<i64> {
    let amount = match value {
        serde_json::Value::Number(n) => n.as_f64()?,
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    Some(amount.round() as i64)
}

/// A JSON `null` reads as 0; anything else must be a number or decimal string.
fn de_price<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    match Option::<serde_json::Value>::deserialize(deserializer)? {
        None => Ok(0),
        Some(value) => price_from_value(&value)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid price value: {value}"))),
    }
}

fn de_opt_price<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(price_from_value))
}

/// DRF list envelope: `{ "results": [...] }`.
#[derive(Debug, Deserialize)]
pub(crate) struct Results<T> {
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
}

// ---------------------------------------------------------------------------
// auth
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub full_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<UserProfile>,
    #[serde(default)]
    pub created_at: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(default)]
    pub favorite_colors: Vec<String>,
    #[serde(default)]
    pub style_categories: Vec<String>,
    #[serde(default)]
    pub budget_range: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    #[serde(default)]
    pub message: String,
    pub user: User,
    pub token: String,
}

#[derive(Clone, Serialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
    pub password_confirm: String,
}

impl std::fmt::Debug for RegisterRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisterRequest")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("password", &"[redacted]")
            .finish_non_exhaustive()
    }
}

#[derive(Serialize)]
pub(crate) struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

/// Partial profile update; only set fields are sent.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<UserProfile>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Dashboard {
    pub user: User,
    pub stats: DashboardStats,
    #[serde(default)]
    pub recent_styles: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DashboardStats {
    #[serde(default)]
    pub total_styles: i64,
    #[serde(default)]
    pub last_style_date: Option<String>,
    #[serde(default)]
    pub profile_completion: f64,
}

// ---------------------------------------------------------------------------
// products
// ---------------------------------------------------------------------------

/// Product as returned by list, search and wishlist endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiProduct {
    pub uuid: String,
    pub name: String,
    #[serde(default)]
    pub brand_name: String,
    #[serde(default)]
    pub category_name: String,
    #[serde(default)]
    pub store_name: String,
    #[serde(deserialize_with = "de_price")]
    pub current_price: i64,
    #[serde(default, deserialize_with = "de_opt_price")]
    pub original_price: Option<i64>,
    #[serde(default, deserialize_with = "de_opt_price")]
    pub sale_price: Option<i64>,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default)]
    pub is_on_sale: bool,
    #[serde(default)]
    pub discount_percentage: f64,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub main_image: String,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub review_count: i64,
    #[serde(default)]
    pub is_available: bool,
    #[serde(default)]
    pub is_wishlisted: bool,
    #[serde(default)]
    pub product_url: String,
    #[serde(default)]
    pub recommended_size: Option<String>,
}

fn default_currency() -> String {
    "KRW".to_string()
}

impl From<ApiProduct> for Product {
    fn from(p: ApiProduct) -> Self {
        let recommended_size = p
            .recommended_size
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| "M".to_string());
        Product {
            id: p.uuid,
            brand: p.brand_name,
            name: p.name,
            price: p.current_price,
            image_url: p.main_image,
            recommended_size,
            product_url: p.product_url,
            store_name: p.store_name,
            category: ProductCategory::from_backend_name(&p.category_name),
            cropped_image: None,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PagedProducts {
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub previous: Option<String>,
    #[serde(default)]
    pub results: Vec<ApiProduct>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortBy {
    Newest,
    Oldest,
    PriceLow,
    PriceHigh,
    Rating,
    Popularity,
    Relevance,
}

impl SortBy {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SortBy::Newest => "newest",
            SortBy::Oldest => "oldest",
            SortBy::PriceLow => "price_low",
            SortBy::PriceHigh => "price_high",
            SortBy::Rating => "rating",
            SortBy::Popularity => "popularity",
            SortBy::Relevance => "relevance",
        }
    }
}

/// Filters for `GET /products/`. Unset and empty fields are left out of the
/// query string.
#[derive(Debug, Clone, Default)]
pub struct ProductQuery {
    pub category: Option<i64>,
    pub brand: Option<i64>,
    pub store: Option<i64>,
    pub min_price: Option<i64>,
    pub max_price: Option<i64>,
    pub color: Option<String>,
    pub is_on_sale: Option<bool>,
    pub sort_by: Option<SortBy>,
    pub search: Option<String>,
}

impl ProductQuery {
    #[must_use]
    pub fn newest() -> Self {
        Self {
            sort_by: Some(SortBy::Newest),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        let mut push = |key: &'static str, value: Option<String>| {
            if let Some(value) = value.filter(|v| !v.is_empty()) {
                pairs.push((key, value));
            }
        };
        push("category", self.category.map(|v| v.to_string()));
        push("brand", self.brand.map(|v| v.to_string()));
        push("store", self.store.map(|v| v.to_string()));
        push("min_price", self.min_price.map(|v| v.to_string()));
        push("max_price", self.max_price.map(|v| v.to_string()));
        push("color", self.color.clone());
        push("is_on_sale", self.is_on_sale.map(|v| v.to_string()));
        push("sort_by", self.sort_by.map(|v| v.as_str().to_string()));
        push("search", self.search.clone());
        pairs
    }
}

/// Body for `POST /products/search/`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SearchRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_price: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_price: Option<i64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub style_tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<SortBy>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
}

impl SearchRequest {
    /// First page of relevance-ranked results for a free-text query.
    #[must_use]
    pub fn relevance(query: &str) -> Self {
        Self {
            query: Some(query.to_owned()),
            sort_by: Some(SortBy::Relevance),
            page: Some(1),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchResults {
    #[serde(default)]
    pub results: Vec<ApiProduct>,
    #[serde(default)]
    pub total_count: u64,
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub page_size: u32,
    #[serde(default)]
    pub has_next: bool,
    #[serde(default)]
    pub has_previous: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub name_en: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub product_count: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CategoryCount {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub product_count: u64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Statistics {
    #[serde(default)]
    pub total_products: u64,
    #[serde(default)]
    pub total_brands: u64,
    #[serde(default)]
    pub total_stores: u64,
    #[serde(default)]
    pub categories: Vec<CategoryCount>,
}

// ---------------------------------------------------------------------------
// wishlist / recommendations
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct WishlistEntry {
    pub id: i64,
    pub product: ApiProduct,
    #[serde(default)]
    pub added_at: String,
    #[serde(default)]
    pub notes: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WishlistToggleResponse {
    #[serde(default)]
    pub message: String,
    pub wishlisted: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Recommendation {
    pub id: i64,
    #[serde(default)]
    pub products: Vec<ApiProduct>,
    pub style_prompt: String,
    #[serde(default)]
    pub generated_image: String,
    #[serde(default)]
    pub ai_description: String,
    #[serde(default)]
    pub confidence_score: Option<f64>,
    #[serde(default)]
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewRecommendation {
    pub style_prompt: String,
    pub generated_image: String,
    pub ai_description: String,
    pub confidence_score: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processing_time: Option<f64>,
}

// ---------------------------------------------------------------------------
// cart
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct CartProduct {
    pub uuid: String,
    pub name: String,
    #[serde(default)]
    pub brand_name: String,
    #[serde(default)]
    pub category_name: String,
    #[serde(deserialize_with = "de_price")]
    pub current_price: i64,
    #[serde(default)]
    pub main_image: String,
    #[serde(default)]
    pub is_on_sale: bool,
    #[serde(default)]
    pub discount_percentage: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CartItem {
    pub id: i64,
    pub product: CartProduct,
    #[serde(default)]
    pub size: String,
    pub quantity: u32,
    #[serde(default)]
    pub style_set_id: Option<String>,
    #[serde(default, deserialize_with = "de_price")]
    pub subtotal: i64,
    #[serde(default)]
    pub added_at: String,
}

/// Server-owned cart aggregate. Totals are whatever the server reported.
#[derive(Debug, Clone, Deserialize)]
pub struct Cart {
    pub id: i64,
    #[serde(default)]
    pub user: String,
    #[serde(default)]
    pub items: Vec<CartItem>,
    #[serde(default)]
    pub total_items: u32,
    #[serde(default, deserialize_with = "de_price")]
    pub total_price: i64,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

impl Cart {
    /// Whether any line matches both product and size exactly.
    #[must_use]
    pub fn contains(&self, product_uuid: &str, size: &str) -> bool {
        self.items
            .iter()
            .any(|item| item.product.uuid == product_uuid && item.size == size)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AddToCartRequest {
    pub product_uuid: String,
    pub size: String,
    pub quantity: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style_set_id: Option<String>,
}

#[derive(Serialize)]
pub(crate) struct UpdateCartItemRequest {
    pub item_id: i64,
    pub quantity: u32,
}

#[derive(Serialize)]
pub(crate) struct CartItemRef {
    pub item_id: i64,
}

// ---------------------------------------------------------------------------
// uploads
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct UploadResponse {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub file_path: String,
    pub file_url: String,
    #[serde(default)]
    pub original_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product_json(price: serde_json::Value) -> serde_json::Value {
        serde_json::json!({
            "uuid": "7d1c0c2e-0000-4000-8000-000000000001",
            "name": "Oxford Shirt",
            "brand_name": "Muji",
            "category_name": "Tops",
            "store_name": "Muji Online",
            "current_price": price,
            "original_price": "45000.00",
            "currency": "KRW",
            "main_image": "https://img.example/shirt.jpg",
            "product_url": "https://shop.example/p/1",
            "recommended_size": ""
        })
    }

    #[test]
    fn price_accepts_number_and_decimal_string() {
        let from_number: ApiProduct =
            serde_json::from_value(product_json(serde_json::json!(39000))).expect("number");
        let from_string: ApiProduct =
            serde_json::from_value(product_json(serde_json::json!("39000.00"))).expect("string");
        assert_eq!(from_number.current_price, 39_000);
        assert_eq!(from_string.current_price, 39_000);
        assert_eq!(from_string.original_price, Some(45_000));
        assert_eq!(from_string.sale_price, None);
    }

    #[test]
    fn invalid_price_is_an_error() {
        let result = serde_json::from_value::<ApiProduct>(product_json(serde_json::json!("free")));
        assert!(result.is_err());
    }

    #[test]
    fn converts_to_domain_product_with_default_size() {
        let api: ApiProduct =
            serde_json::from_value(product_json(serde_json::json!(39000))).expect("parse");
        let product = Product::from(api);
        assert_eq!(product.id, "7d1c0c2e-0000-4000-8000-000000000001");
        assert_eq!(product.brand, "Muji");
        assert_eq!(product.category, ProductCategory::Top);
        assert_eq!(product.recommended_size, "M");
        assert_eq!(product.cropped_image, None);
    }

    #[test]
    fn query_pairs_skip_unset_and_empty_fields() {
        let query = ProductQuery {
            category: Some(3),
            color: Some(String::new()),
            is_on_sale: Some(true),
            sort_by: Some(SortBy::PriceLow),
            ..ProductQuery::default()
        };
        assert_eq!(
            query.query_pairs(),
            vec![
                ("category", "3".to_string()),
                ("is_on_sale", "true".to_string()),
                ("sort_by", "price_low".to_string()),
            ]
        );
        assert!(ProductQuery::default().query_pairs().is_empty());
    }

    #[test]
    fn search_request_omits_unset_fields() {
        let body = serde_json::to_value(SearchRequest::relevance("black turtleneck")).expect("json");
        assert_eq!(
            body,
            serde_json::json!({"query": "black turtleneck", "sort_by": "relevance", "page": 1})
        );
    }

    #[test]
    fn cart_contains_matches_product_and_size() {
        let cart: Cart = serde_json::from_value(serde_json::json!({
            "id": 1,
            "items": [{
                "id": 10,
                "product": {"uuid": "p-1", "name": "Denim", "current_price": "89000.00"},
                "size": "L",
                "quantity": 1,
                "subtotal": "89000.00"
            }],
            "total_items": 1,
            "total_price": 89000
        }))
        .expect("cart");
        assert!(cart.contains("p-1", "L"));
        assert!(!cart.contains("p-1", "M"));
        assert!(!cart.contains("p-2", "L"));
    }

    #[test]
    fn null_cart_prices_read_as_zero() {
        let cart: Cart = serde_json::from_value(serde_json::json!({
            "id": 1,
            "items": [{
                "id": 10,
                "product": {"uuid": "p-1", "name": "Denim", "current_price": "89000.00"},
                "size": "L",
                "quantity": 1,
                "subtotal": null
            }],
            "total_items": 1,
            "total_price": null
        }))
        .expect("cart with null prices");
        assert_eq!(cart.total_price, 0);
        assert_eq!(cart.items[0].subtotal, 0);
    }

    #[test]
    fn register_request_debug_hides_password() {
        let req = RegisterRequest {
            username: "mina".to_string(),
            email: "mina@example.com".to_string(),
            first_name: "Mina".to_string(),
            last_name: "Kim".to_string(),
            password: "hunter22".to_string(),
            password_confirm: "hunter22".to_string(),
        };
        let debug = format!("{req:?}");
        assert!(!debug.contains("hunter22"));
    }
}
