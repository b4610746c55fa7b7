//! Abyssinia CLI - storefront and merchant tool for Abyssinia Direct.
//!
//! Commands:
//! - `abyssinia catalog` - Browse the product collection
//! - `abyssinia shop` - Interactive cart and checkout
//! - `abyssinia place` - Place an order non-interactively
//! - `abyssinia orders` - Merchant order history (PIN protected)
//! - `abyssinia config` - Manage configuration

mod commands;
mod config;
mod context;
mod logging;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{CatalogArgs, ConfigArgs, OrdersArgs, PlaceArgs, ShopArgs};

/// Abyssinia CLI - Shop handmade Ethiopian goods and manage orders
#[derive(Parser)]
#[command(name = "abyssinia")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use JSON output format
    #[arg(long, global = true)]
    json: bool,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse the product catalog
    Catalog(CatalogArgs),

    /// Start an interactive shopping session
    Shop(ShopArgs),

    /// Place an order without prompts
    Place(PlaceArgs),

    /// View or clear the order history
    Orders(OrdersArgs),

    /// Manage configuration
    Config(ConfigArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let output = output::Output::new(cli.verbose, cli.json);

    let config_path = cli.config.as_deref();
    let ctx = context::Context::load(config_path, output)?;

    logging::init(&ctx.config.logging, cli.verbose)?;

    let result = match cli.command {
        Commands::Catalog(args) => commands::catalog::run(args, &ctx).await,
        Commands::Shop(args) => commands::shop::run(args, &ctx).await,
        Commands::Place(args) => commands::place::run(args, &ctx).await,
        Commands::Orders(args) => commands::orders::run(args, &ctx).await,
        Commands::Config(args) => commands::config::run(args, &ctx).await,
    };

    if let Err(e) = result {
        ctx.output.error(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}
