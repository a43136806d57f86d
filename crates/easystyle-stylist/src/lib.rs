//! Style generation: prompt validation, outfit image generation, product
//! matching and per-product crops.
//!
//! [`StyleOrchestrator`] drives one styling request through its stages
//! against a [`GenerativeModel`] and a [`ProductCatalog`]. [`GeminiClient`]
//! is the production model; [`easystyle_api::ApiClient`] is the production
//! catalog.

pub mod catalog;
pub mod error;
pub mod gemini;
pub mod model;
pub mod orchestrator;
pub mod prompts;
pub mod validation;

pub use catalog::{initial_products, ProductCatalog, DEFAULT_INITIAL_PRODUCTS};
pub use error::{GenerationError, StyleError};
pub use gemini::GeminiClient;
pub use model::{GenerativeModel, InlineImage};
pub use orchestrator::{StyleOrchestrator, StyleOutcome, StyledSession, StylingStage};
pub use validation::PromptValidation;
