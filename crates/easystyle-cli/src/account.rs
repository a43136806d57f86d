//! Session and cart commands. These talk to the backend through
//! [`AppState`], so the stored token and user stay in step.

use anyhow::Context;
use clap::Subcommand;
use easystyle_api::{AddToCartRequest, Cart};
use easystyle_core::format_price;
use easystyle_session::AppState;

#[derive(Debug, Subcommand)]
pub enum CartCommands {
    /// Show cart contents
    Show,
    /// Add a product to the cart
    Add {
        /// Backend product UUID
        #[arg(long)]
        product: String,
        #[arg(long, default_value = "M")]
        size: String,
        #[arg(long, default_value = "1")]
        quantity: u32,
        /// Styling result the product was picked from
        #[arg(long)]
        style_set: Option<String>,
    },
    /// Change the quantity of a cart line
    Update {
        #[arg(long)]
        item: i64,
        #[arg(long)]
        quantity: u32,
    },
    /// Remove a cart line
    Remove {
        #[arg(long)]
        item: i64,
    },
    /// Empty the cart
    Clear,
}

pub(crate) async fn run_login(state: &AppState, username: &str, password: &str) -> anyhow::Result<()> {
    let user = state.login(username, password).await?;
    println!("signed in as {}", user.username);
    if let Some(cart) = state.cart.cart() {
        println!("{} item(s) in cart", cart.total_items);
    }
    Ok(())
}

pub(crate) async fn run_logout(state: &AppState) -> anyhow::Result<()> {
    if !state.api.is_authenticated() {
        println!("not signed in");
        return Ok(());
    }
    state.logout().await;
    println!("signed out");
    Ok(())
}

pub(crate) async fn run_whoami(state: &AppState) -> anyhow::Result<()> {
    match state.session.initialize().await {
        Some(user) => {
            let name = if user.full_name.is_empty() {
                user.username.as_str()
            } else {
                user.full_name.as_str()
            };
            println!("{name} <{}>", user.email);
        }
        None => println!("not signed in"),
    }
    Ok(())
}

/// Dispatches a `cart` subcommand.
///
/// # Errors
///
/// Returns an error when signed out or when the backend rejects the request.
pub(crate) async fn run_cart(state: &AppState, command: CartCommands) -> anyhow::Result<()> {
    state
        .session
        .initialize()
        .await
        .context("not signed in; run `easystyle login` first")?;

    let cart = match command {
        CartCommands::Show => {
            state.cart.fetch_cart().await?;
            state.cart.cart().context("cart is unavailable")?
        }
        CartCommands::Add {
            product,
            size,
            quantity,
            style_set,
        } => {
            state
                .cart
                .add_to_cart(&AddToCartRequest {
                    product_uuid: product,
                    size,
                    quantity,
                    style_set_id: style_set,
                })
                .await?
        }
        CartCommands::Update { item, quantity } => state.cart.update_item(item, quantity).await?,
        CartCommands::Remove { item } => state.cart.remove_item(item).await?,
        CartCommands::Clear => state.cart.clear().await?,
    };

    print_cart(&cart);
    Ok(())
}

fn print_cart(cart: &Cart) {
    if cart.items.is_empty() {
        println!("cart is empty");
        return;
    }
    println!("{:<6}{:<40}{:<6}{:<5}SUBTOTAL", "ITEM", "PRODUCT", "SIZE", "QTY");
    for item in &cart.items {
        let name = format!("{} {}", item.product.brand_name, item.product.name);
        let name = if name.chars().count() > 38 {
            format!("{}...", name.chars().take(35).collect::<String>())
        } else {
            name
        };
        println!(
            "{:<6}{:<40}{:<6}{:<5}{}",
            item.id,
            name,
            item.size,
            item.quantity,
            format_price(item.subtotal, "KRW")
        );
    }
    println!(
        "{} item(s), total {}",
        cart.total_items,
        format_price(cart.total_price, "KRW")
    );
}
