//! Command-line grammar.
//!
//! ```bash
//! homecraft products list
//! homecraft cart add <product-id> --qty 2
//! homecraft login --email asha@example.com --password ******
//! homecraft checkout --address "12 MG Road, Pune"
//! homecraft book <service-id> --date 2026-11-02 --address "12 MG Road"
//! homecraft products create --name "Steel Gate" --price 12000 --stock 3
//! ```

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "homecraft")]
#[command(author, version, about = "Homecraft storefront client")]
pub struct Cli {
    /// Path to homecraft.toml (defaults to the platform config dir)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Backend base URL, overriding config and HOMECRAFT_API_URL
    #[arg(long, global = true, value_name = "URL")]
    pub api_url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Browse and manage products
    Products {
        #[command(subcommand)]
        action: ProductAction,
    },
    /// Browse and manage services
    Services {
        #[command(subcommand)]
        action: ServiceAction,
    },
    /// Inspect and edit the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Sign in
    Login {
        #[arg(short, long)]
        email: String,
        #[arg(short, long, env = "HOMECRAFT_PASSWORD", hide_env_values = true)]
        password: String,
        /// Page that sent you to sign in
        #[arg(long)]
        from: Option<String>,
    },
    /// Create an account and sign in
    Register {
        #[arg(short, long)]
        name: String,
        #[arg(short, long)]
        email: String,
        #[arg(short, long, env = "HOMECRAFT_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Sign out and forget the stored token
    Logout,
    /// Show the signed-in user
    Whoami,
    /// Place a cash-on-delivery order for the cart
    Checkout {
        #[arg(short, long)]
        address: String,
    },
    /// Book a service visit
    Book {
        service_id: String,
        /// Visit date (YYYY-MM-DD)
        #[arg(short, long)]
        date: NaiveDate,
        #[arg(short, long)]
        address: String,
        #[arg(short, long)]
        notes: Option<String>,
    },
}

#[derive(Debug, Subcommand)]
pub enum ProductAction {
    /// List the catalog
    List,
    /// Show one product
    Show { id: String },
    /// Create a product (admin)
    Create(ProductFields),
    /// Update a product (admin); unset flags keep their current value
    Update {
        id: String,
        #[command(flatten)]
        fields: ProductFields,
    },
    /// Delete a product (admin)
    Delete { id: String },
}

#[derive(Debug, Default, Args)]
pub struct ProductFields {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    /// Whole rupees
    #[arg(long)]
    pub price: Option<i64>,
    #[arg(long)]
    pub image: Option<String>,
    #[arg(long)]
    pub category: Option<String>,
    #[arg(long)]
    pub stock: Option<i64>,
}

#[derive(Debug, Subcommand)]
pub enum ServiceAction {
    /// List bookable services
    List,
    /// Show one service
    Show { id: String },
    /// Create a service (admin)
    Create(ServiceFields),
    /// Update a service (admin); unset flags keep their current value
    Update {
        id: String,
        #[command(flatten)]
        fields: ServiceFields,
    },
    /// Delete a service (admin)
    Delete { id: String },
}

#[derive(Debug, Default, Args)]
pub struct ServiceFields {
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    /// Whole rupees
    #[arg(long)]
    pub price: Option<i64>,
    /// Pricing unit, e.g. "per sq ft"
    #[arg(long)]
    pub unit: Option<String>,
    #[arg(long)]
    pub image: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum CartAction {
    /// Show lines and totals
    Show,
    /// Put a product in the cart, replacing any existing line
    Add {
        product_id: String,
        #[arg(short, long, default_value_t = 1)]
        qty: u32,
    },
    /// Change the quantity of a line
    Qty { product_id: String, qty: u32 },
    /// Drop a line
    Remove { product_id: String },
    /// Empty the cart
    Clear,
}
