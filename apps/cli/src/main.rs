//! Homecraft CLI - browse, shop and administer the storefront from a shell.
//!
//! # Usage
//!
//! ```bash
//! # Browse
//! homecraft products list
//! homecraft services show <id>
//!
//! # Shop
//! homecraft cart add <product-id> --qty 2
//! homecraft login --email asha@example.com
//! homecraft checkout --address "12 MG Road, Pune"
//!
//! # Administer (admin accounts only)
//! homecraft products create --name "Steel Gate" --price 12000 --stock 3
//! ```
//!
//! # Environment Variables
//!
//! - `HOMECRAFT_API_URL` - Backend base URL
//! - `HOMECRAFT_STORAGE_DIR` - Where the cart and session are kept
//! - `HOMECRAFT_PASSWORD` - Password for `login`/`register`
//! - `RUST_LOG` - Log filter (logs go to stderr)

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::process::ExitCode;

use clap::Parser;
use homecraft_cli::{init_tracing, run, Cli};

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            tracing::error!("Failed to start runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(run(cli)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e.message);
            tracing::debug!(code = e.code.as_str(), "Command failed");
            ExitCode::FAILURE
        }
    }
}
