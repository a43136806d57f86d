//! One styling request, end to end.
//!
//! Stages run strictly in order: validate, generate, search, enrich. Each
//! stage has its own failure policy:
//!
//! - prompt validation fails open (a broken model call counts as valid),
//! - style generation fails closed (either sub-step failing ends the request),
//! - product search degrades to the newest listing, then to nothing,
//! - crop enrichment tolerates individual failures.
//!
//! Every model and catalog call is bounded by a timeout. Each run takes a
//! ticket; a run that is no longer the newest stops at the next stage
//! boundary with [`StyleError::Superseded`]. In-flight calls are not aborted.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use easystyle_api::ApiError;
use easystyle_core::{Product, SelectionSet, StyledResult};
use futures::future::join_all;
use tokio::sync::watch;

use crate::catalog::{self, ProductCatalog};
use crate::error::{GenerationError, StyleError};
use crate::model::{GenerativeModel, InlineImage};
use crate::prompts;
use crate::validation::{is_too_short, parse_validation_reply, PromptValidation};

pub const DEFAULT_MAX_PRODUCTS: usize = 5;
pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(60);

/// Progress of the current styling request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StylingStage {
    Idle,
    ValidatingPrompt,
    AwaitingClarification,
    GeneratingStyle,
    SearchingProducts,
    EnrichingImages,
    Done,
    Failed,
}

impl StylingStage {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            StylingStage::Idle => "idle",
            StylingStage::ValidatingPrompt => "validating prompt",
            StylingStage::AwaitingClarification => "awaiting clarification",
            StylingStage::GeneratingStyle => "generating style",
            StylingStage::SearchingProducts => "searching products",
            StylingStage::EnrichingImages => "cropping product images",
            StylingStage::Done => "done",
            StylingStage::Failed => "failed",
        }
    }
}

/// Completed styling request.
#[derive(Debug, Clone)]
pub struct StyledSession {
    pub result: StyledResult,
    /// Prompt the result was generated from, including any clarification.
    pub prompt: String,
    pub products: Vec<Product>,
    /// Starts with every product selected.
    pub selection: SelectionSet,
}

#[derive(Debug, Clone)]
pub enum StyleOutcome {
    NeedsClarification {
        question: String,
        examples: Vec<String>,
    },
    Styled(Box<StyledSession>),
}

pub struct StyleOrchestrator {
    model: Arc<dyn GenerativeModel>,
    catalog: Arc<dyn ProductCatalog>,
    max_products: usize,
    call_timeout: Duration,
    stage: watch::Sender<StylingStage>,
    latest_ticket: AtomicU64,
}

impl std::fmt::Debug for StyleOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StyleOrchestrator")
            .field("max_products", &self.max_products)
            .field("call_timeout", &self.call_timeout)
            .field("stage", &*self.stage.borrow())
            .finish_non_exhaustive()
    }
}

impl StyleOrchestrator {
    #[must_use]
    pub fn new(model: Arc<dyn GenerativeModel>, catalog: Arc<dyn ProductCatalog>) -> Self {
        let (stage, _) = watch::channel(StylingStage::Idle);
        Self {
            model,
            catalog,
            max_products: DEFAULT_MAX_PRODUCTS,
            call_timeout: DEFAULT_CALL_TIMEOUT,
            stage,
            latest_ticket: AtomicU64::new(0),
        }
    }

    #[must_use]
    pub fn with_max_products(mut self, max_products: usize) -> Self {
        self.max_products = max_products;
        self
    }

    #[must_use]
    pub fn with_call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = timeout;
        self
    }

    /// Receiver that observes every stage change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<StylingStage> {
        self.stage.subscribe()
    }

    #[must_use]
    pub fn stage(&self) -> StylingStage {
        *self.stage.borrow()
    }

    /// Runs a request from prompt validation onwards.
    ///
    /// # Errors
    ///
    /// [`StyleError::DescriptionFailed`] or [`StyleError::ImageFailed`] when
    /// generation fails, [`StyleError::Superseded`] when a newer request
    /// started meanwhile.
    pub async fn run(&self, image: &InlineImage, prompt: &str) -> Result<StyleOutcome, StyleError> {
        let ticket = self.next_ticket();
        self.advance(ticket, StylingStage::ValidatingPrompt)?;
        match self.validate_prompt(prompt).await {
            PromptValidation::Valid => self.style(ticket, image, prompt.to_owned()).await,
            PromptValidation::NeedsClarification { question, examples } => {
                self.advance(ticket, StylingStage::AwaitingClarification)?;
                Ok(StyleOutcome::NeedsClarification { question, examples })
            }
        }
    }

    /// Continues after a clarification: the answer is appended to the prompt
    /// and generation starts without validating again.
    ///
    /// # Errors
    ///
    /// Same as [`StyleOrchestrator::run`].
    pub async fn run_with_answer(
        &self,
        image: &InlineImage,
        prompt: &str,
        answer: &str,
    ) -> Result<StyleOutcome, StyleError> {
        let ticket = self.next_ticket();
        self.style(ticket, image, prompts::with_answer(prompt, answer))
            .await
    }

    async fn style(
        &self,
        ticket: u64,
        image: &InlineImage,
        prompt: String,
    ) -> Result<StyleOutcome, StyleError> {
        self.advance(ticket, StylingStage::GeneratingStyle)?;
        let result = match self.generate_style(image, &prompt).await {
            Ok(result) => result,
            Err(e) => {
                if self.is_current(ticket) {
                    self.stage.send_replace(StylingStage::Failed);
                }
                return Err(e);
            }
        };

        self.advance(ticket, StylingStage::SearchingProducts)?;
        let products = self.products_for_style(&result.description).await;

        self.advance(ticket, StylingStage::EnrichingImages)?;
        let products = self.enrich_products(&result, products).await;

        self.advance(ticket, StylingStage::Done)?;
        let selection = SelectionSet::all_of(&products);
        Ok(StyleOutcome::Styled(Box::new(StyledSession {
            result,
            prompt,
            products,
            selection,
        })))
    }

    /// Asks the model whether `prompt` is specific enough.
    ///
    /// Short prompts are answered locally. Model failures and timeouts count
    /// as valid.
    pub async fn validate_prompt(&self, prompt: &str) -> PromptValidation {
        if is_too_short(prompt) {
            return PromptValidation::default_clarification();
        }
        let instruction = prompts::validation_prompt(prompt);
        match self
            .bounded(self.model.generate_text(&instruction, None))
            .await
        {
            Ok(reply) => parse_validation_reply(&reply),
            Err(e) => {
                tracing::warn!(error = %e, "prompt validation failed, treating prompt as valid");
                PromptValidation::Valid
            }
        }
    }

    /// Two model calls: an outfit description from photo and prompt, then a
    /// new image from photo and description.
    ///
    /// # Errors
    ///
    /// [`StyleError::DescriptionFailed`] or [`StyleError::ImageFailed`].
    pub async fn generate_style(
        &self,
        image: &InlineImage,
        prompt: &str,
    ) -> Result<StyledResult, StyleError> {
        let proposal = prompts::style_proposal_prompt(prompt);
        let description = self
            .bounded(self.model.generate_text(&proposal, Some(image)))
            .await
            .map_err(StyleError::DescriptionFailed)?;
        if description.trim().is_empty() {
            return Err(StyleError::DescriptionFailed(GenerationError::EmptyResponse(
                "text",
            )));
        }

        let instruction = prompts::image_generation_prompt(&description, prompt);
        let styled = self
            .bounded(self.model.generate_image(image, &instruction))
            .await
            .map_err(StyleError::ImageFailed)?;
        tracing::info!(description_len = description.len(), "style generated");

        Ok(StyledResult {
            image_data: styled.data,
            image_mime_type: styled.mime_type,
            description,
        })
    }

    /// Catalog matches for the description, capped at the configured limit.
    ///
    /// A failed search falls back to the newest products; if that fails too
    /// the list is empty.
    pub async fn products_for_style(&self, description: &str) -> Vec<Product> {
        let found = match self.bounded_catalog(self.catalog.search(description)).await {
            Ok(products) => products,
            Err(e) => {
                tracing::warn!(error = %e, "product search failed, falling back to newest");
                match self.bounded_catalog(self.catalog.newest()).await {
                    Ok(products) => products,
                    Err(e) => {
                        tracing::error!(error = %e, "newest products fallback failed");
                        Vec::new()
                    }
                }
            }
        };
        found.into_iter().take(self.max_products).collect()
    }

    /// Attaches a cropped close-up to each product, all crops in parallel.
    /// A failed crop leaves that product's `cropped_image` empty.
    pub async fn enrich_products(&self, result: &StyledResult, products: Vec<Product>) -> Vec<Product> {
        let styled = InlineImage::from(result);
        let crops = products.iter().map(|product| {
            let instruction = prompts::crop_prompt(&product.name, product.category.label());
            let styled = &styled;
            async move {
                match self
                    .bounded(self.model.generate_image(styled, &instruction))
                    .await
                {
                    Ok(crop) => Some(crop.data),
                    Err(e) => {
                        tracing::warn!(product = %product.name, error = %e, "product crop failed");
                        None
                    }
                }
            }
        });
        let crops = join_all(crops).await;

        products
            .into_iter()
            .zip(crops)
            .map(|(mut product, crop)| {
                product.cropped_image = crop;
                product
            })
            .collect()
    }

    /// Newest catalog products for the landing view.
    ///
    /// # Errors
    ///
    /// Returns the catalog's [`ApiError`].
    pub async fn initial_products(&self, limit: usize) -> Result<Vec<Product>, ApiError> {
        catalog::initial_products(self.catalog.as_ref(), limit).await
    }

    fn next_ticket(&self) -> u64 {
        self.latest_ticket.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn is_current(&self, ticket: u64) -> bool {
        self.latest_ticket.load(Ordering::SeqCst) == ticket
    }

    /// Publishes `stage` if `ticket` is still the newest request.
    fn advance(&self, ticket: u64, stage: StylingStage) -> Result<(), StyleError> {
        if !self.is_current(ticket) {
            tracing::debug!(ticket, stage = stage.label(), "dropping superseded styling request");
            return Err(StyleError::Superseded);
        }
        self.stage.send_replace(stage);
        Ok(())
    }

    async fn bounded<T>(
        &self,
        call: impl Future<Output = Result<T, GenerationError>>,
    ) -> Result<T, GenerationError> {
        tokio::time::timeout(self.call_timeout, call)
            .await
            .map_err(|_| GenerationError::Timeout(self.call_timeout.as_secs()))?
    }

    async fn bounded_catalog<T>(
        &self,
        call: impl Future<Output = Result<T, ApiError>>,
    ) -> Result<T, String> {
        match tokio::time::timeout(self.call_timeout, call).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => Err(e.to_string()),
            Err(_) => Err(format!("timed out after {}s", self.call_timeout.as_secs())),
        }
    }
}
