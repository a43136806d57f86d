use clap::{Parser, Subcommand};
use easystyle_session::AppState;
use easystyle_stylist::DEFAULT_INITIAL_PRODUCTS;
use tracing_subscriber::EnvFilter;

mod account;
mod local;
mod style;

use account::CartCommands;
use local::{CacheCommands, HistoryCommands, StorageCommands, WishlistCommands};
use style::StyleArgs;

#[derive(Debug, Parser)]
#[command(name = "easystyle")]
#[command(about = "EasyStyle outfit styling and shopping client")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Restyle a photo from a text prompt and match catalog products
    Style(StyleArgs),
    /// List the newest catalog products
    Products {
        #[arg(long, default_value_t = DEFAULT_INITIAL_PRODUCTS)]
        limit: usize,
    },
    /// Sign in to the EasyStyle backend
    Login {
        #[arg(long)]
        username: String,
        #[arg(long, env = "EASYSTYLE_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Sign out and forget the stored token
    Logout,
    /// Show the signed-in user
    Whoami,
    /// Manage the server-side shopping cart
    Cart {
        #[command(subcommand)]
        command: CartCommands,
    },
    /// Saved styling results
    History {
        #[command(subcommand)]
        command: HistoryCommands,
    },
    /// Locally saved products
    Wishlist {
        #[command(subcommand)]
        command: WishlistCommands,
    },
    /// Cached API responses
    Cache {
        #[command(subcommand)]
        command: CacheCommands,
    },
    /// Local storage usage
    Storage {
        #[command(subcommand)]
        command: StorageCommands,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = easystyle_core::load_app_config()?;

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let state = AppState::from_config(config)?;

    match cli.command {
        Commands::Style(args) => style::run_style(&state, args).await,
        Commands::Products { limit } => style::run_products(&state, limit).await,
        Commands::Login { username, password } => {
            account::run_login(&state, &username, &password).await
        }
        Commands::Logout => account::run_logout(&state).await,
        Commands::Whoami => account::run_whoami(&state).await,
        Commands::Cart { command } => account::run_cart(&state, command).await,
        Commands::History { command } => local::run_history(&state, &command),
        Commands::Wishlist { command } => local::run_wishlist(&state, &command),
        Commands::Cache { command } => local::run_cache(&state, &command),
        Commands::Storage { command } => local::run_storage(&state, &command),
    }
}
