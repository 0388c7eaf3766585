//! Tavola CLI - Drive carts, favorites, and tenant resolution from a shell.
//!
//! # Usage
//!
//! ```bash
//! # Add a pizza to the cart and show it
//! tavola cart add --id 1 --name Margherita --price 8.50
//! tavola cart show
//!
//! # Favorite a dessert on Pizzeria Rossi
//! tavola favorites toggle --id 7 --name "Tiramisù" --tenant pizzeria-rossi
//!
//! # Resolve the tenant and table of a QR-code URL
//! tavola tenant resolve "https://tavola.app/?merchant=bar-centrale&table=5"
//! ```
//!
//! State is persisted as JSON under `TAVOLA_DATA_DIR` (default `.tavola`).

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::io::Write;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use tavola_storefront::error::Result;
use tavola_storefront::{AppState, FileStorage, StorefrontConfig, TenantDirectory};

mod commands;

use commands::{cart::CartAction, favorites::FavoritesAction, tenant::TenantAction};

#[derive(Parser)]
#[command(name = "tavola")]
#[command(author, version, about = "Tavola cart, favorites, and tenant tools")]
struct Cli {
    /// Override the data directory (`TAVOLA_DATA_DIR`)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Manage favorite products
    Favorites {
        #[command(subcommand)]
        action: FavoritesAction,
    },
    /// Resolve tenants and work with slugs
    Tenant {
        #[command(subcommand)]
        action: TenantAction,
    },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.json_logs);

    let mut stdout = std::io::stdout().lock();
    if let Err(e) = run(cli, &mut stdout) {
        tracing::error!("Command failed: {e}");
        std::process::exit(e.exit_code());
    }
}

/// Initialize tracing with `EnvFilter`, writing to stderr.
///
/// Defaults to warnings from the library and info from the CLI if
/// `RUST_LOG` is not set.
fn init_tracing(json: bool) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "tavola_storefront=warn,tavola_cli=info".into());

    let registry = tracing_subscriber::registry().with(env_filter);
    if json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn run(cli: Cli, out: &mut impl Write) -> Result<()> {
    let mut config = StorefrontConfig::from_env()?;
    if let Some(dir) = cli.data_dir {
        config.data_dir = dir;
    }

    let directory = match &config.tenants_file {
        Some(path) => TenantDirectory::from_file(path)?,
        None => TenantDirectory::builtin()?,
    };
    let storage = FileStorage::new(&config.data_dir);
    tracing::debug!(data_dir = %config.data_dir.display(), "Using file storage");

    let builder = AppState::builder(config, directory);
    match cli.command {
        Commands::Cart { action } => {
            let mut state = builder.with_cart(storage).build();
            commands::cart::run(&mut state, action, out)
        }
        Commands::Favorites { action } => {
            let mut state = builder.with_favorites(storage).build();
            commands::favorites::run(&mut state, action, out)
        }
        Commands::Tenant { action } => {
            let state = builder.build();
            commands::tenant::run(&state, action, out)
        }
    }
}
