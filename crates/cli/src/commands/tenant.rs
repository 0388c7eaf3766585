//! Tenant commands.
//!
//! # Usage
//!
//! ```bash
//! tavola tenant resolve "https://tavola.app/?merchant=bar-centrale&table=5"
//! tavola tenant resolve /pizzeria-rossi
//! tavola tenant slugify "Trattoria da Mario"
//! tavola tenant check-slug bar-centrale
//! tavola tenant list
//! ```

use std::io::Write;

use clap::Subcommand;

use tavola_core::Slug;
use tavola_storefront::error::Result;
use tavola_storefront::tenant::parse_url;
use tavola_storefront::{AppState, Storage};

#[derive(Subcommand)]
pub enum TenantAction {
    /// Resolve the tenant and table number of a URL
    Resolve {
        /// Absolute URL, or a path/query relative to the base URL
        url: String,
    },
    /// Derive a slug from a display name (fails if none can be derived)
    Slugify {
        /// Display name
        name: String,
    },
    /// Check a candidate slug's format and availability
    CheckSlug {
        /// Candidate slug
        slug: String,
    },
    /// List known tenants
    List,
}

/// Execute a tenant action.
pub fn run<S: Storage>(
    state: &AppState<S>,
    action: TenantAction,
    out: &mut impl Write,
) -> Result<()> {
    let resolver = state.resolver();

    match action {
        TenantAction::Resolve { url } => {
            let url = parse_url(&url, &state.config().base_url)?;
            match resolver.resolve_from_url(&url) {
                Some(resolution) => writeln!(
                    out,
                    "Tenant: {} ({}, id {}) via {}",
                    resolution.tenant.name,
                    resolution.tenant.slug,
                    resolution.tenant.id,
                    resolution.source
                )?,
                None => writeln!(out, "Tenant: none")?,
            }
            match resolver.resolve_table_number(&url) {
                Some(table) => writeln!(out, "Table: {table}")?,
                None => writeln!(out, "Table: none")?,
            }
        }
        TenantAction::Slugify { name } => {
            let slug = Slug::from_name(&name)?;
            writeln!(out, "{slug}")?;
        }
        TenantAction::CheckSlug { slug } => {
            let available = resolver.is_slug_available(&slug);
            match Slug::parse(&slug) {
                Ok(_) => writeln!(out, "Format: valid")?,
                Err(e) => writeln!(out, "Format: invalid ({e})")?,
            }
            writeln!(
                out,
                "Available: {}",
                if available { "yes" } else { "no" }
            )?;
        }
        TenantAction::List => {
            for tenant in resolver.directory().iter() {
                writeln!(
                    out,
                    "{:<4} {:<24} {:<24} {}",
                    tenant.id, tenant.slug, tenant.name, tenant.status
                )?;
            }
        }
    }
    Ok(())
}
