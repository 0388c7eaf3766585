//! Favorites commands.
//!
//! # Usage
//!
//! ```bash
//! # Favorite a bare product ID
//! tavola favorites toggle --id 3
//!
//! # Favorite a full product on a tenant (by slug or ID)
//! tavola favorites toggle --id 7 --name "Tiramisù" --price 6 --tenant pizzeria-rossi
//!
//! tavola favorites list --tenant m1
//! tavola favorites check --id 7
//! tavola favorites clear --tenant m1
//! ```

use std::io::Write;

use clap::Subcommand;
use rust_decimal::Decimal;
use serde_json::Value;

use tavola_core::{ProductId, TenantId};
use tavola_storefront::error::Result;
use tavola_storefront::{AppError, AppState, Favorite, FavoriteProduct, Storage, TenantDirectory};

#[derive(Subcommand)]
pub enum FavoritesAction {
    /// Favorite a product, or un-favorite it if it already is one
    Toggle {
        /// Product ID
        #[arg(long)]
        id: i64,

        /// Product name; stores the full product instead of the bare ID
        #[arg(long)]
        name: Option<String>,

        /// Unit price
        #[arg(long, requires = "name")]
        price: Option<Decimal>,

        /// Tenant slug or ID the product was liked on
        #[arg(long, requires = "name")]
        tenant: Option<String>,

        /// Extra catalog field as key=value (repeatable)
        #[arg(long = "field", requires = "name", value_parser = super::parse_field)]
        fields: Vec<(String, Value)>,
    },
    /// Print whether a product is a favorite
    Check {
        /// Product ID
        #[arg(long)]
        id: i64,
    },
    /// List favorite products (bare IDs are not listed)
    List {
        /// Only this tenant's favorites (slug or ID)
        #[arg(long)]
        tenant: Option<String>,
    },
    /// Remove favorites
    Clear {
        /// Only this tenant's favorites (slug or ID)
        #[arg(long)]
        tenant: Option<String>,
    },
}

/// Execute a favorites action.
pub fn run<S: Storage>(
    state: &mut AppState<S>,
    action: FavoritesAction,
    out: &mut impl Write,
) -> Result<()> {
    match action {
        FavoritesAction::Toggle {
            id,
            name,
            price,
            tenant,
            fields,
        } => {
            let favorite = match name {
                Some(name) => {
                    let tenant_id = tenant
                        .map(|t| lookup_tenant_id(state.resolver().directory(), &t))
                        .transpose()?;
                    let product = super::build_product(id, name, price, fields)?;
                    Favorite::product(product, tenant_id)
                }
                None => Favorite::ById(ProductId::new(id)),
            };
            let now_favorite = state.favorites_mut()?.toggle(favorite);
            tracing::info!(product_id = id, favorite = now_favorite, "Toggled favorite");
            let verb = if now_favorite { "Added" } else { "Removed" };
            writeln!(out, "{verb} favorite {id}")?;
        }
        FavoritesAction::Check { id } => {
            let is_favorite = state.favorites()?.is_favorite(ProductId::new(id));
            writeln!(out, "{}", if is_favorite { "yes" } else { "no" })?;
        }
        FavoritesAction::List { tenant } => {
            let favorites = state.favorites()?;
            let listed = match tenant {
                Some(t) => {
                    let tenant_id = lookup_tenant_id(state.resolver().directory(), &t)?;
                    favorites.list_by_tenant(&tenant_id)
                }
                None => favorites.list_favorite_objects(),
            };
            render(&listed, out)?;
        }
        FavoritesAction::Clear { tenant } => match tenant {
            Some(t) => {
                let tenant_id = lookup_tenant_id(state.resolver().directory(), &t)?;
                state.favorites_mut()?.clear_by_tenant(&tenant_id);
                tracing::info!(%tenant_id, "Cleared tenant favorites");
            }
            None => {
                state.favorites_mut()?.clear();
                tracing::info!("Cleared favorites");
            }
        },
    }
    Ok(())
}

/// Map a `--tenant` value (slug or ID) to a tenant ID.
fn lookup_tenant_id(directory: &TenantDirectory, value: &str) -> Result<TenantId> {
    directory
        .by_slug(value)
        .or_else(|| directory.by_id(&TenantId::from(value)))
        .map(|tenant| tenant.id.clone())
        .ok_or_else(|| AppError::NotFound(format!("tenant {value}")))
}

fn render(listed: &[FavoriteProduct<'_>], out: &mut impl Write) -> Result<()> {
    if listed.is_empty() {
        writeln!(out, "No favorites")?;
        return Ok(());
    }
    for fav in listed {
        let tenant = fav.tenant_id.map_or("-", TenantId::as_str);
        writeln!(
            out,
            "{:>4}  {:<28} {}",
            fav.product.id, fav.product.name, tenant
        )?;
    }
    Ok(())
}
