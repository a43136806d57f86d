//! HTTP client for the EasyStyle backend REST API.
//!
//! [`ApiClient`] owns the auth token and turns every non-2xx response into
//! an [`ApiError`]. Endpoint groups live in their own modules as additional
//! `impl ApiClient` blocks.

pub mod auth;
pub mod cart;
pub mod client;
pub mod error;
pub mod products;
pub mod recommendations;
pub mod types;
pub mod uploads;
pub mod wishlist;

pub use client::ApiClient;
pub use error::ApiError;
pub use types::{
    AddToCartRequest, ApiProduct, AuthResponse, Cart, CartItem, CartProduct, Category,
    CategoryCount, Dashboard, DashboardStats, MessageResponse, NewRecommendation, PagedProducts,
    ProductQuery, ProfileUpdate, Recommendation, RegisterRequest, SearchRequest, SearchResults,
    SortBy, Statistics, UploadResponse, User, UserProfile, WishlistEntry,
    WishlistToggleResponse,
};
