//! Cartwheel CLI - catalog validation and saved cart management.
//!
//! # Usage
//!
//! ```bash
//! # Validate a catalog document and list its handles
//! cartwheel catalog check crates/storefront/data/catalog.json
//!
//! # Show the saved cart
//! cartwheel cart show
//!
//! # Empty the saved cart
//! cartwheel cart clear --state-dir .cartwheel
//! ```
//!
//! # Commands
//!
//! - `catalog check` - Load a catalog from a file or URL and report its products
//! - `cart show` - Print the lines and totals of the saved cart
//! - `cart clear` - Empty the saved cart

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "cartwheel")]
#[command(author, version, about = "Cartwheel CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect catalog documents
    Catalog {
        #[command(subcommand)]
        action: CatalogAction,
    },
    /// Manage the saved cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
}

#[derive(Subcommand)]
enum CatalogAction {
    /// Load a catalog and list its product handles
    Check {
        /// File path or `http(s)` URL (defaults to `CARTWHEEL_CATALOG`)
        source: Option<String>,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Show the saved cart
    Show {
        /// Directory holding the saved cart (defaults to `CARTWHEEL_STATE_DIR`)
        #[arg(short, long)]
        state_dir: Option<PathBuf>,
    },
    /// Empty the saved cart
    Clear {
        /// Directory holding the saved cart (defaults to `CARTWHEEL_STATE_DIR`)
        #[arg(short, long)]
        state_dir: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() {
    // Load .env file if present (ignore errors if not found)
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Catalog { action } => match action {
            CatalogAction::Check { source } => {
                commands::catalog::check(source.as_deref()).await?;
            }
        },
        Commands::Cart { action } => match action {
            CartAction::Show { state_dir } => commands::cart::show(state_dir)?,
            CartAction::Clear { state_dir } => commands::cart::clear(state_dir)?,
        },
    }
    Ok(())
}
