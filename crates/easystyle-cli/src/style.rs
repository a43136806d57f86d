//! `style` command: preprocess a photo, run the styling pipeline and print
//! the matched products.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use clap::Args;
use easystyle_core::{format_price, group_by_category, AppConfig};
use easystyle_imaging::{
    optimize_image_async, validate_image_file, ImageFile, OptimizeOptions, OptimizedImage,
    OutputFormat,
};
use easystyle_session::AppState;
use easystyle_storage::{HistoryProduct, NewHistoryEntry};
use easystyle_stylist::{
    initial_products, GeminiClient, InlineImage, ProductCatalog, StyleOrchestrator, StyleOutcome,
    StyledSession,
};

#[derive(Debug, Args)]
pub struct StyleArgs {
    /// Photo to restyle (JPEG, PNG or WebP)
    #[arg(long)]
    pub image: PathBuf,
    /// What to wear, e.g. "smart casual for a dinner"
    #[arg(long)]
    pub prompt: String,
    /// Answer to the clarifying question from a previous run
    #[arg(long)]
    pub answer: Option<String>,
    /// Write the generated image here
    #[arg(long)]
    pub out: Option<PathBuf>,
    /// Save the result to local history
    #[arg(long)]
    pub save: bool,
}

fn optimize_options(config: &AppConfig) -> OptimizeOptions {
    OptimizeOptions {
        max_width: config.image_max_dimension,
        max_height: config.image_max_dimension,
        quality: config.image_quality,
        format: OutputFormat::Jpeg,
    }
}

/// Runs one styling request end to end.
///
/// # Errors
///
/// Returns an error if the image is rejected, no AI key is configured, or
/// style generation fails. Product search and crop failures only degrade
/// the output.
pub(crate) async fn run_style(state: &AppState, args: StyleArgs) -> anyhow::Result<()> {
    let file = ImageFile::from_path(&args.image)?;
    validate_image_file(&file)?;
    let optimized = optimize_image_async(file, optimize_options(&state.config)).await?;
    tracing::info!(
        width = optimized.width,
        height = optimized.height,
        bytes = optimized.bytes.len(),
        "image preprocessed"
    );

    let model = Arc::new(GeminiClient::from_config(&state.config)?);
    let catalog: Arc<dyn ProductCatalog> = Arc::clone(&state.api) as Arc<dyn ProductCatalog>;
    let orchestrator = StyleOrchestrator::new(model, catalog)
        .with_max_products(state.config.max_products)
        .with_call_timeout(Duration::from_secs(state.config.ai_timeout_secs));

    let mut stages = orchestrator.subscribe();
    let progress = tokio::spawn(async move {
        while stages.changed().await.is_ok() {
            let stage = *stages.borrow_and_update();
            tracing::info!(stage = stage.label(), "styling");
        }
    });

    let image = InlineImage::from(&optimized);
    let outcome = match args.answer.as_deref() {
        Some(answer) => orchestrator.run_with_answer(&image, &args.prompt, answer).await,
        None => orchestrator.run(&image, &args.prompt).await,
    };
    drop(orchestrator);
    if let Err(e) = progress.await {
        tracing::warn!(error = %e, "stage progress task failed");
    }

    match outcome? {
        StyleOutcome::NeedsClarification { question, examples } => {
            println!("{question}");
            for example in &examples {
                println!("  - {example}");
            }
            println!("re-run with --answer \"...\" to continue");
        }
        StyleOutcome::Styled(session) => {
            print_session(&session);
            if let Some(path) = &args.out {
                write_image(path, &session).await?;
                println!("image written to {}", path.display());
            }
            if args.save {
                save_history(state, &optimized, &session);
            }
        }
    }
    Ok(())
}

/// Lists the newest catalog products.
///
/// # Errors
///
/// Returns an error when the catalog request fails.
pub(crate) async fn run_products(state: &AppState, limit: usize) -> anyhow::Result<()> {
    let products = initial_products(state.api.as_ref(), limit)
        .await
        .context("failed to load products")?;
    if products.is_empty() {
        println!("no products found");
        return Ok(());
    }
    for product in &products {
        println!(
            "{:<9}{} {} ({}) {}",
            product.category.to_string(),
            product.brand,
            product.name,
            product.store_name,
            format_price(product.price, "KRW"),
        );
    }
    Ok(())
}

fn print_session(session: &StyledSession) {
    println!("{}", session.result.description);
    println!();
    if session.products.is_empty() {
        println!("no matching products found");
        return;
    }
    for (category, products) in group_by_category(&session.products) {
        println!("[{category}]");
        for product in products {
            let cropped = if product.cropped_image.is_some() { " *" } else { "" };
            println!(
                "  {} {} ({}) {} size {}{cropped}",
                product.brand,
                product.name,
                product.store_name,
                format_price(product.price, "KRW"),
                product.recommended_size,
            );
            println!("    {}", product.product_url);
        }
    }
    println!();
    println!(
        "{} selected, total {}",
        session.selection.len(),
        format_price(session.selection.total_price(), "KRW")
    );
}

async fn write_image(path: &Path, session: &StyledSession) -> anyhow::Result<()> {
    let bytes = STANDARD
        .decode(&session.result.image_data)
        .context("generated image is not valid base64")?;
    tokio::fs::write(path, bytes)
        .await
        .with_context(|| format!("failed to write {}", path.display()))
}

fn save_history(state: &AppState, original: &OptimizedImage, session: &StyledSession) {
    let products = session
        .products
        .iter()
        .map(|p| HistoryProduct {
            name: p.name.clone(),
            brand: p.brand.clone(),
            price: p.price,
            category: p.category.label().to_owned(),
            image_url: p.image_url.clone(),
        })
        .collect();
    let entry = NewHistoryEntry {
        original_image: original.data_url(),
        styled_image: format!(
            "data:{};base64,{}",
            session.result.image_mime_type, session.result.image_data
        ),
        description: session.result.description.clone(),
        prompt: session.prompt.clone(),
        products,
    };
    match state.history.add(entry) {
        Some(id) => println!("saved to history as {id}"),
        None => tracing::warn!("history entry could not be saved"),
    }
}
