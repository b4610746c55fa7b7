//! CLI command implementations.

pub mod catalog;
pub mod config;
pub mod orders;
pub mod place;
pub mod shop;

use abyssinia_commerce::checkout::PaymentMethod;
use clap::{Args, Subcommand, ValueEnum};

/// Arguments for the catalog command.
#[derive(Args)]
pub struct CatalogArgs {
    #[command(subcommand)]
    pub command: CatalogCommand,
}

#[derive(Subcommand)]
pub enum CatalogCommand {
    /// List products.
    List {
        /// Only show one category (clothes, art, misc, accessories).
        #[arg(short, long)]
        category: Option<String>,

        /// Match against product names and descriptions.
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Show a product's details.
    Show {
        /// Product ID.
        id: String,
    },
}

/// Arguments for the shop command.
#[derive(Args)]
pub struct ShopArgs {
    /// Keep orders in memory only, whatever the config says.
    #[arg(long)]
    pub memory: bool,
}

/// Arguments for the place command.
#[derive(Args)]
pub struct PlaceArgs {
    /// Product to order, as `id` or `id:quantity`. Repeatable.
    #[arg(short, long = "item", required = true)]
    pub items: Vec<String>,

    #[arg(long)]
    pub first_name: String,

    #[arg(long)]
    pub last_name: String,

    #[arg(long)]
    pub email: String,

    #[arg(long)]
    pub phone: String,

    /// Street address.
    #[arg(long)]
    pub address: String,

    #[arg(long)]
    pub city: String,

    #[arg(long)]
    pub postal_code: String,

    #[arg(long)]
    pub country: String,

    /// Payment method.
    #[arg(short, long, value_enum, default_value_t = PaymentArg::Card)]
    pub payment: PaymentArg,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum PaymentArg {
    Card,
    BankTransfer,
}

impl From<PaymentArg> for PaymentMethod {
    fn from(arg: PaymentArg) -> Self {
        match arg {
            PaymentArg::Card => PaymentMethod::Card,
            PaymentArg::BankTransfer => PaymentMethod::BankTransfer,
        }
    }
}

/// Arguments for the orders command.
#[derive(Args)]
pub struct OrdersArgs {
    #[command(subcommand)]
    pub command: Option<OrdersCommand>,

    /// Merchant PIN (prompted for when omitted).
    #[arg(long, global = true)]
    pub pin: Option<String>,
}

#[derive(Subcommand)]
pub enum OrdersCommand {
    /// List stored orders, newest first.
    List {
        /// Show only the last N orders.
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Show one order.
    Show {
        /// Order reference, e.g. ETH-1042.
        id: String,
    },
    /// Erase the whole order history.
    Clear {
        /// Skip confirmation.
        #[arg(short, long)]
        yes: bool,
    },
}

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show the effective configuration.
    Show,
    /// Write a default abyssinia.toml in the current directory.
    Init {
        /// Force overwrite existing config.
        #[arg(short, long)]
        force: bool,
    },
}
