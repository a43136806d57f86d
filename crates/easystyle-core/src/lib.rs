//! Shared domain types and configuration for EasyStyle.
//!
//! Everything here is free of I/O apart from reading environment variables
//! in [`load_app_config`].

pub mod app_config;
pub mod config;
pub mod format;
pub mod products;
pub mod selection;
pub mod styling;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use format::format_price;
pub use products::{group_by_category, Product, ProductCategory};
pub use selection::{PurchaseSummary, SelectionSet};
pub use styling::StyledResult;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("no products selected")]
    EmptySelection,
}
