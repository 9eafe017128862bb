//! # homecraft-cli: Terminal Front End for the Storefront
//!
//! A view layer over [`homecraft_client::Storefront`]. Each invocation
//! rehydrates the stores from the file store, runs one command and shuts
//! down; the cart and session persist between invocations.
//!
//! ## Invocation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  1. Initialize Logging (stderr, RUST_LOG)                              │
//! │                                                                         │
//! │  2. Load Config                                                        │
//! │     defaults ◄── homecraft.toml ◄── HOMECRAFT_* ◄── --api-url         │
//! │                                                                         │
//! │  3. Storefront::from_config                                            │
//! │     └── rehydrate cart + session from the data dir                     │
//! │                                                                         │
//! │  4. commands::dispatch ──► print result                                │
//! │                                                                         │
//! │  5. Storefront::shutdown                                               │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod cli;
pub mod commands;
pub mod error;

#[cfg(test)]
pub(crate) mod testing;

use homecraft_client::{ClientConfig, Storefront};
use tracing::debug;
use tracing_subscriber::EnvFilter;

pub use cli::Cli;
pub use error::{CommandError, CommandResult, ErrorCode};

/// Runs one parsed command against the configured backend.
pub async fn run(cli: Cli) -> CommandResult<()> {
    let config = load_config(&cli)?;
    debug!(api = %config.api.base_url, "Configuration loaded");

    let app = Storefront::from_config(config)?;
    let result = commands::dispatch(&app, cli.command).await;
    app.shutdown();
    result
}

/// Config file and environment first, then the `--api-url` flag on top.
fn load_config(cli: &Cli) -> CommandResult<ClientConfig> {
    let mut config = ClientConfig::load(cli.config.clone())?;
    if let Some(url) = &cli.api_url {
        config.api.base_url = url.clone();
        config.validate()?;
    }
    Ok(config)
}

/// Initializes the tracing subscriber.
///
/// Output goes to stderr so command output on stdout stays clean.
///
/// ## Log Levels
/// - `RUST_LOG=homecraft_client=debug` - Store transitions and requests
/// - Default: WARN level (failed requests, discarded storage records)
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_api_url_flag_overrides_config() {
        let cli = Cli::try_parse_from([
            "homecraft",
            "--config",
            "/nonexistent/homecraft.toml",
            "--api-url",
            "https://shop.example.com/api",
            "whoami",
        ])
        .unwrap();

        let config = load_config(&cli).unwrap();
        assert_eq!(config.api.base_url, "https://shop.example.com/api");
    }

    #[test]
    fn test_bad_api_url_is_config_error() {
        let cli = Cli::try_parse_from(["homecraft", "--api-url", "ftp://nope", "whoami"]).unwrap();

        let err = load_config(&cli).unwrap_err();
        assert_eq!(err.code, ErrorCode::ConfigError);
    }
}
