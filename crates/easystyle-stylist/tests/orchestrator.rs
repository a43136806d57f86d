//! End-to-end styling scenarios against in-process fakes.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use easystyle_api::ApiError;
use easystyle_core::{Product, ProductCategory};
use easystyle_stylist::{
    GenerationError, GenerativeModel, InlineImage, ProductCatalog, PromptValidation, StyleError,
    StyleOrchestrator, StyleOutcome, StylingStage, DEFAULT_INITIAL_PRODUCTS,
};

/// Scripted model. Records every text prompt it sees.
#[derive(Default)]
struct FakeModel {
    validation_reply: Option<String>,
    fail_validation: bool,
    fail_description: bool,
    fail_crop_for: Option<String>,
    description_delay: Option<Duration>,
    text_prompts: Mutex<Vec<String>>,
}

#[async_trait]
impl GenerativeModel for FakeModel {
    async fn generate_text(
        &self,
        prompt: &str,
        image: Option<&InlineImage>,
    ) -> Result<String, GenerationError> {
        self.text_prompts
            .lock()
            .expect("lock")
            .push(prompt.to_string());
        if image.is_none() {
            if self.fail_validation {
                return Err(GenerationError::Status {
                    status: 503,
                    message: "overloaded".to_string(),
                });
            }
            return Ok(self
                .validation_reply
                .clone()
                .unwrap_or_else(|| "YES".to_string()));
        }
        if let Some(delay) = self.description_delay {
            if prompt.contains("slow") {
                tokio::time::sleep(delay).await;
            }
        }
        if self.fail_description {
            return Err(GenerationError::EmptyResponse("text"));
        }
        Ok("A navy blazer over a white oxford shirt with grey chinos.".to_string())
    }

    async fn generate_image(
        &self,
        _image: &InlineImage,
        prompt: &str,
    ) -> Result<InlineImage, GenerationError> {
        if let Some(name) = &self.fail_crop_for {
            if prompt.contains(name.as_str()) {
                return Err(GenerationError::EmptyResponse("image"));
            }
        }
        Ok(InlineImage::new("image/png", "c3R5bGVk"))
    }
}

#[derive(Default)]
struct FakeCatalog {
    search_results: usize,
    newest_results: usize,
    fail_search: bool,
    fail_newest: bool,
}

fn catalog_product(i: usize) -> Product {
    Product {
        id: format!("p-{i}"),
        brand: "Brand".to_string(),
        name: format!("Item {i}"),
        price: 10_000 * i64::try_from(i + 1).expect("small"),
        image_url: format!("https://img.example/{i}.jpg"),
        recommended_size: "M".to_string(),
        product_url: format!("https://shop.example/p/{i}"),
        store_name: "Store".to_string(),
        category: ProductCategory::Top,
        cropped_image: None,
    }
}

#[async_trait]
impl ProductCatalog for FakeCatalog {
    async fn search(&self, _query: &str) -> Result<Vec<Product>, ApiError> {
        if self.fail_search {
            return Err(ApiError::Status {
                status: 500,
                message: "search down".to_string(),
            });
        }
        Ok((0..self.search_results).map(catalog_product).collect())
    }

    async fn newest(&self) -> Result<Vec<Product>, ApiError> {
        if self.fail_newest {
            return Err(ApiError::Status {
                status: 500,
                message: "listing down".to_string(),
            });
        }
        Ok((100..100 + self.newest_results).map(catalog_product).collect())
    }
}

fn photo() -> InlineImage {
    InlineImage::new("image/jpeg", "/9j/4AAQSkZJRg==")
}

fn orchestrator(model: Arc<FakeModel>, catalog: FakeCatalog) -> StyleOrchestrator {
    StyleOrchestrator::new(model, Arc::new(catalog))
}

#[tokio::test]
async fn specific_prompt_runs_to_done_with_all_products_selected() {
    let model = Arc::new(FakeModel::default());
    let orch = orchestrator(
        Arc::clone(&model),
        FakeCatalog {
            search_results: 7,
            ..FakeCatalog::default()
        },
    );
    let stages = orch.subscribe();

    let outcome = orch
        .run(&photo(), "I need smart casual for a dinner")
        .await
        .expect("styling should succeed");
    let StyleOutcome::Styled(session) = outcome else {
        panic!("expected a styled result");
    };

    assert_eq!(session.result.image_data, "c3R5bGVk");
    assert!(session.result.description.contains("navy blazer"));
    assert_eq!(session.products.len(), 5);
    assert_eq!(session.selection.items(), session.products.as_slice());
    assert!(session.products.iter().all(|p| p.cropped_image.is_some()));
    assert_eq!(*stages.borrow(), StylingStage::Done);
}

#[tokio::test]
async fn vague_prompt_asks_then_styles_with_concatenated_answer() {
    let model = Arc::new(FakeModel {
        validation_reply: Some(
            "```json\n{\"question\": \"What is the occasion?\", \"examples\": [\"Weekend date\", \"Friend's wedding\", \"Cosy day at home\"]}\n```"
                .to_string(),
        ),
        ..FakeModel::default()
    });
    let orch = orchestrator(
        Arc::clone(&model),
        FakeCatalog {
            search_results: 2,
            ..FakeCatalog::default()
        },
    );

    let outcome = orch.run(&photo(), "clothes").await.expect("validation");
    let StyleOutcome::NeedsClarification { question, examples } = outcome else {
        panic!("expected a clarifying question");
    };
    assert_eq!(question, "What is the occasion?");
    assert_eq!(examples.len(), 3);
    assert_eq!(orch.stage(), StylingStage::AwaitingClarification);

    let outcome = orch
        .run_with_answer(&photo(), "clothes", &examples[0])
        .await
        .expect("styling");
    assert!(matches!(outcome, StyleOutcome::Styled(_)));

    let prompts = model.text_prompts.lock().expect("lock");
    let proposal = prompts.last().expect("proposal prompt");
    assert!(proposal.contains("clothes\n\nAdditional information: Weekend date"));
}

#[tokio::test]
async fn short_prompt_never_reaches_the_model() {
    let model = Arc::new(FakeModel::default());
    let orch = orchestrator(Arc::clone(&model), FakeCatalog::default());

    let validation = orch.validate_prompt(" a b ").await;
    let PromptValidation::NeedsClarification { question, examples } = validation else {
        panic!("short prompt must need clarification");
    };
    assert!(!question.is_empty());
    assert_eq!(examples.len(), 3);
    assert!(model.text_prompts.lock().expect("lock").is_empty());
}

#[tokio::test]
async fn validation_failure_fails_open() {
    let model = Arc::new(FakeModel {
        fail_validation: true,
        ..FakeModel::default()
    });
    let orch = orchestrator(model, FakeCatalog::default());
    assert_eq!(
        orch.validate_prompt("something for a rooftop party").await,
        PromptValidation::Valid
    );
}

#[tokio::test]
async fn failed_search_falls_back_to_newest_capped() {
    let orch = orchestrator(
        Arc::new(FakeModel::default()),
        FakeCatalog {
            fail_search: true,
            newest_results: 8,
            ..FakeCatalog::default()
        },
    );
    let products = orch.products_for_style("navy blazer").await;
    assert_eq!(products.len(), 5);
    assert_eq!(products[0].id, "p-100");
}

#[tokio::test]
async fn failed_search_and_fallback_give_empty_list() {
    let orch = orchestrator(
        Arc::new(FakeModel::default()),
        FakeCatalog {
            fail_search: true,
            fail_newest: true,
            ..FakeCatalog::default()
        },
    );
    assert!(orch.products_for_style("navy blazer").await.is_empty());
}

#[tokio::test]
async fn one_failed_crop_only_affects_that_product() {
    let model = Arc::new(FakeModel {
        fail_crop_for: Some("Item 1".to_string()),
        ..FakeModel::default()
    });
    let orch = orchestrator(
        model,
        FakeCatalog {
            search_results: 3,
            ..FakeCatalog::default()
        },
    );
    let StyleOutcome::Styled(session) = orch
        .run(&photo(), "office look for a pitch meeting")
        .await
        .expect("styling")
    else {
        panic!("expected styled");
    };
    let crops: Vec<bool> = session
        .products
        .iter()
        .map(|p| p.cropped_image.is_some())
        .collect();
    assert_eq!(crops, vec![true, false, true]);
}

#[tokio::test]
async fn description_failure_aborts_request() {
    let model = Arc::new(FakeModel {
        fail_description: true,
        ..FakeModel::default()
    });
    let orch = orchestrator(model, FakeCatalog::default());
    let err = orch
        .run(&photo(), "I need smart casual for a dinner")
        .await
        .expect_err("should fail");
    assert!(matches!(err, StyleError::DescriptionFailed(_)));
    assert_eq!(orch.stage(), StylingStage::Failed);
}

#[tokio::test]
async fn slow_model_call_times_out() {
    let model = Arc::new(FakeModel {
        description_delay: Some(Duration::from_secs(5)),
        ..FakeModel::default()
    });
    let orch = orchestrator(model, FakeCatalog::default())
        .with_call_timeout(Duration::from_millis(50));
    let err = orch
        .generate_style(&photo(), "slow tailoring request")
        .await
        .expect_err("should time out");
    assert!(matches!(
        err,
        StyleError::DescriptionFailed(GenerationError::Timeout(_))
    ));
}

#[tokio::test]
async fn newer_request_supersedes_older_one() {
    let model = Arc::new(FakeModel {
        description_delay: Some(Duration::from_millis(200)),
        ..FakeModel::default()
    });
    let orch = orchestrator(
        model,
        FakeCatalog {
            search_results: 1,
            ..FakeCatalog::default()
        },
    );

    let first_photo = photo();
    let second_photo = photo();
    let (older, newer) = tokio::join!(
        orch.run(&first_photo, "slow first request for a gala"),
        orch.run(&second_photo, "second request for a picnic"),
    );

    assert!(matches!(older, Err(StyleError::Superseded)));
    assert!(matches!(newer, Ok(StyleOutcome::Styled(_))));
    assert_eq!(orch.stage(), StylingStage::Done);
}

#[tokio::test]
async fn initial_products_takes_limit_from_newest() {
    let orch = orchestrator(
        Arc::new(FakeModel::default()),
        FakeCatalog {
            newest_results: 12,
            ..FakeCatalog::default()
        },
    );
    let products = orch
        .initial_products(DEFAULT_INITIAL_PRODUCTS)
        .await
        .expect("initial products");
    assert_eq!(products.len(), DEFAULT_INITIAL_PRODUCTS);
}
