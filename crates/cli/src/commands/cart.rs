//! Cart commands.
//!
//! # Usage
//!
//! ```bash
//! tavola cart add --id 1 --name Margherita --price 8.50 --field category=pizza
//! tavola cart update --id 1 --quantity 3
//! tavola cart remove --id 1
//! tavola cart show
//! tavola cart clear
//! ```

use std::io::Write;

use clap::Subcommand;
use rust_decimal::Decimal;
use serde_json::Value;

use tavola_core::{Price, ProductId};
use tavola_storefront::error::Result;
use tavola_storefront::{AppState, CartStore, Storage};

#[derive(Subcommand)]
pub enum CartAction {
    /// Add one unit of a product
    Add {
        /// Product ID
        #[arg(long)]
        id: i64,

        /// Product name
        #[arg(long)]
        name: String,

        /// Unit price (e.g. 8.50)
        #[arg(long)]
        price: Decimal,

        /// Extra catalog field as key=value (repeatable)
        #[arg(long = "field", value_parser = super::parse_field)]
        fields: Vec<(String, Value)>,
    },
    /// Remove a product's line
    Remove {
        /// Product ID
        #[arg(long)]
        id: i64,
    },
    /// Set a product's quantity (0 removes the line)
    Update {
        /// Product ID
        #[arg(long)]
        id: i64,

        /// New quantity
        #[arg(short, long)]
        quantity: u32,
    },
    /// Print the cart
    Show,
    /// Empty the cart
    Clear,
}

/// Execute a cart action.
pub fn run<S: Storage>(
    state: &mut AppState<S>,
    action: CartAction,
    out: &mut impl Write,
) -> Result<()> {
    let currency = state.config().currency;
    let cart = state.cart_mut()?;

    match action {
        CartAction::Add {
            id,
            name,
            price,
            fields,
        } => {
            let product = super::build_product(id, name, Some(price), fields)?;
            cart.add(product);
            let quantity = cart.line(ProductId::new(id)).map_or(0, |line| line.quantity);
            tracing::info!(product_id = id, quantity, "Added to cart");
        }
        CartAction::Remove { id } => {
            cart.remove(ProductId::new(id));
            tracing::info!(product_id = id, "Removed from cart");
        }
        CartAction::Update { id, quantity } => {
            cart.update_quantity(ProductId::new(id), quantity);
            tracing::info!(product_id = id, quantity, "Updated cart quantity");
        }
        CartAction::Show => {}
        CartAction::Clear => {
            cart.clear();
            tracing::info!("Cart cleared");
        }
    }

    render(cart, currency, out)
}

/// Write the cart as a table followed by item count and total.
fn render<S: Storage>(
    cart: &CartStore<S>,
    currency: tavola_core::CurrencyCode,
    out: &mut impl Write,
) -> Result<()> {
    if cart.is_empty() {
        writeln!(out, "Cart is empty")?;
        return Ok(());
    }

    for line in cart.lines() {
        writeln!(
            out,
            "{:>4}  {:<28} {:>3} x {:>10} = {:>10}",
            line.product.id,
            line.product.name,
            line.quantity,
            Price::new(line.product.price, currency),
            Price::new(line.subtotal(), currency),
        )?;
    }
    writeln!(
        out,
        "Items: {}  Total: {}",
        cart.count(),
        Price::new(cart.total(), currency)
    )?;
    Ok(())
}
