//! Commands over the local store: history, wishlist, cache and usage.

use anyhow::Context;
use chrono::{DateTime, Utc};
use clap::Subcommand;
use easystyle_core::format_price;
use easystyle_session::AppState;

#[derive(Debug, Subcommand)]
pub enum HistoryCommands {
    /// List saved styling results, newest first
    List,
    /// Show one saved result
    Show { id: String },
    /// Delete one saved result
    Remove { id: String },
    /// Delete all saved results
    Clear,
}

#[derive(Debug, Subcommand)]
pub enum WishlistCommands {
    List,
    Remove { id: String },
    Clear,
}

#[derive(Debug, Subcommand)]
pub enum CacheCommands {
    /// Drop every cached response
    Clear,
}

#[derive(Debug, Subcommand)]
pub enum StorageCommands {
    /// Show estimated usage
    Info,
    /// Clear the cache and trim history
    Cleanup,
}

/// Format epoch milliseconds for display, returning `"-"` when out of range.
fn fmt_millis(ms: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(ms)
        .map_or_else(|| "-".to_string(), |d| d.format("%Y-%m-%d %H:%M").to_string())
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        format!("{}...", text.chars().take(max.saturating_sub(3)).collect::<String>())
    } else {
        text.to_owned()
    }
}

pub(crate) fn run_history(state: &AppState, command: &HistoryCommands) -> anyhow::Result<()> {
    match command {
        HistoryCommands::List => {
            let entries = state.history.get_all();
            if entries.is_empty() {
                println!("no saved results; run `style --save` first");
                return Ok(());
            }
            println!("{:<38}{:<18}PROMPT", "ID", "SAVED");
            for entry in &entries {
                println!(
                    "{:<38}{:<18}{}",
                    entry.id,
                    fmt_millis(entry.timestamp),
                    truncate(&entry.prompt, 50)
                );
            }
        }
        HistoryCommands::Show { id } => {
            let entry = state
                .history
                .get_by_id(id)
                .with_context(|| format!("history entry '{id}' not found"))?;
            println!("Saved: {}", fmt_millis(entry.timestamp));
            println!("Prompt: {}", entry.prompt);
            println!();
            println!("{}", entry.description);
            if !entry.products.is_empty() {
                println!();
                for product in &entry.products {
                    println!(
                        "  [{}] {} {} {}",
                        product.category,
                        product.brand,
                        product.name,
                        format_price(product.price, "KRW")
                    );
                }
            }
        }
        HistoryCommands::Remove { id } => {
            anyhow::ensure!(state.history.remove(id), "failed to remove history entry '{id}'");
            println!("removed {id}");
        }
        HistoryCommands::Clear => {
            anyhow::ensure!(state.history.clear(), "failed to clear history");
            println!("history cleared");
        }
    }
    Ok(())
}

pub(crate) fn run_wishlist(state: &AppState, command: &WishlistCommands) -> anyhow::Result<()> {
    match command {
        WishlistCommands::List => {
            let items = state.wishlist.get_all();
            if items.is_empty() {
                println!("wishlist is empty");
                return Ok(());
            }
            for item in &items {
                println!(
                    "{}  {} {} {}  (added {})",
                    item.id,
                    item.brand,
                    item.name,
                    format_price(item.price, "KRW"),
                    fmt_millis(item.added_at)
                );
                println!("    {}", item.product_url);
            }
        }
        WishlistCommands::Remove { id } => {
            anyhow::ensure!(state.wishlist.remove(id), "failed to remove wishlist item '{id}'");
            println!("removed {id}");
        }
        WishlistCommands::Clear => {
            anyhow::ensure!(state.wishlist.clear(), "failed to clear wishlist");
            println!("wishlist cleared");
        }
    }
    Ok(())
}

pub(crate) fn run_cache(state: &AppState, command: &CacheCommands) -> anyhow::Result<()> {
    match command {
        CacheCommands::Clear => {
            anyhow::ensure!(state.cache.clear(), "failed to clear cache");
            println!("cache cleared");
        }
    }
    Ok(())
}

pub(crate) fn run_storage(state: &AppState, command: &StorageCommands) -> anyhow::Result<()> {
    match command {
        StorageCommands::Info => {
            let info = state
                .storage_manager
                .quota_info()
                .context("local storage is unavailable")?;
            println!("used:      {:>9} bytes", info.used);
            println!("available: {:>9} bytes", info.available);
        }
        StorageCommands::Cleanup => {
            anyhow::ensure!(state.storage_manager.cleanup(), "storage cleanup incomplete");
            println!("cache cleared, history trimmed");
        }
    }
    Ok(())
}
