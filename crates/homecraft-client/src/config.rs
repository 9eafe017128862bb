//! # Client Configuration
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     HOMECRAFT_API_URL=https://api.example.com/api                      │
//! │     HOMECRAFT_STORAGE_DIR=/var/lib/homecraft                           │
//! │     HOMECRAFT_TIMEOUT_SECS=30                                          │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/homecraft/homecraft.toml (Linux)                         │
//! │     ~/Library/Application Support/com.homecraft.homecraft/ (macOS)     │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     http://localhost:5000/api, 15s timeout, platform data dir          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # homecraft.toml
//! [api]
//! base_url = "http://localhost:5000/api"
//! timeout_secs = 15
//!
//! [storage]
//! dir = "/home/asha/.local/share/homecraft"
//!
//! [display]
//! currency_symbol = "₹"
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

use homecraft_core::money::{Money, DEFAULT_CURRENCY_SYMBOL};

use crate::error::{ClientError, ClientResult};

// =============================================================================
// Sections
// =============================================================================

/// Backend connection settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiSettings {
    /// Base URL every API path is resolved against.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Whole-request timeout (seconds).
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://localhost:5000/api".to_string()
}

fn default_timeout() -> u64 {
    15
}

impl Default for ApiSettings {
    fn default() -> Self {
        ApiSettings {
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
        }
    }
}

/// Where durable state lives.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StorageSettings {
    /// Directory for the file store. `None` means the platform data dir.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
}

/// Presentation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplaySettings {
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,
}

fn default_currency_symbol() -> String {
    DEFAULT_CURRENCY_SYMBOL.to_string()
}

impl Default for DisplaySettings {
    fn default() -> Self {
        DisplaySettings {
            currency_symbol: default_currency_symbol(),
        }
    }
}

// =============================================================================
// Main Client Configuration
// =============================================================================

/// Complete client configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default)]
    pub api: ApiSettings,

    #[serde(default)]
    pub storage: StorageSettings,

    #[serde(default)]
    pub display: DisplaySettings,
}

impl ClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (homecraft.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> ClientResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading client config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load client config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> ClientResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| ClientError::Config("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents)?;

        info!(?path, "Client config saved");
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ClientResult<()> {
        let url = Url::parse(&self.api.base_url)?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ClientError::Config(format!(
                "API URL must start with http:// or https://, got: {}",
                self.api.base_url
            )));
        }

        if self.api.timeout_secs == 0 {
            return Err(ClientError::Config(
                "timeout_secs must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    /// Applies overrides from a variable lookup (the process environment in
    /// production).
    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(url) = var("HOMECRAFT_API_URL") {
            debug!(url = %url, "Overriding API URL from environment");
            self.api.base_url = url;
        }

        if let Some(dir) = var("HOMECRAFT_STORAGE_DIR") {
            debug!(dir = %dir, "Overriding storage dir from environment");
            self.storage.dir = Some(PathBuf::from(dir));
        }

        if let Some(timeout) = var("HOMECRAFT_TIMEOUT_SECS") {
            match timeout.parse::<u64>() {
                Ok(secs) => self.api.timeout_secs = secs,
                Err(_) => warn!(value = %timeout, "Ignoring non-numeric HOMECRAFT_TIMEOUT_SECS"),
            }
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "homecraft", "homecraft")
            .map(|dirs| dirs.config_dir().join("homecraft.toml"))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    /// Base URL with a trailing slash, ready for `Url::join`.
    pub fn base_url(&self) -> ClientResult<Url> {
        let mut raw = self.api.base_url.trim_end_matches('/').to_string();
        raw.push('/');
        Ok(Url::parse(&raw)?)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.api.timeout_secs)
    }

    pub fn storage_dir(&self) -> Option<&PathBuf> {
        self.storage.dir.as_ref()
    }

    /// Formats an amount with the configured symbol.
    pub fn format_money(&self, amount: Money) -> String {
        amount.format_with(&self.display.currency_symbol)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.api.base_url, "http://localhost:5000/api");
        assert_eq!(config.api.timeout_secs, 15);
        assert!(config.storage_dir().is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = ClientConfig::default();

        config.api.base_url = "ftp://files.example.com".to_string();
        assert!(config.validate().is_err());

        config.api.base_url = "not a url".to_string();
        assert!(config.validate().is_err());

        config.api.base_url = "https://shop.example.com/api".to_string();
        config.api.timeout_secs = 0;
        assert!(config.validate().is_err());

        config.api.timeout_secs = 5;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [
            ("HOMECRAFT_API_URL", "https://shop.example.com/api"),
            ("HOMECRAFT_STORAGE_DIR", "/tmp/homecraft"),
            ("HOMECRAFT_TIMEOUT_SECS", "not-a-number"),
        ]
        .into_iter()
        .collect();

        let mut config = ClientConfig::default();
        config.apply_overrides(|k| vars.get(k).map(|v| v.to_string()));

        assert_eq!(config.api.base_url, "https://shop.example.com/api");
        assert_eq!(config.storage_dir(), Some(&PathBuf::from("/tmp/homecraft")));
        // Bad numbers are ignored, not fatal.
        assert_eq!(config.api.timeout_secs, 15);
    }

    #[test]
    fn test_base_url_gets_trailing_slash() {
        let mut config = ClientConfig::default();
        let joined = config.base_url().unwrap().join("products/p1").unwrap();
        assert_eq!(joined.as_str(), "http://localhost:5000/api/products/p1");

        config.api.base_url = "http://localhost:5000/api/".to_string();
        assert_eq!(
            config.base_url().unwrap().as_str(),
            "http://localhost:5000/api/"
        );
    }

    #[test]
    fn test_toml_round_trip_and_partial_file() {
        let config = ClientConfig::default();
        let text = toml::to_string_pretty(&config).unwrap();
        let parsed: ClientConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed, config);

        let partial: ClientConfig = toml::from_str("[api]\ntimeout_secs = 30\n").unwrap();
        assert_eq!(partial.api.timeout_secs, 30);
        assert_eq!(partial.api.base_url, "http://localhost:5000/api");
        assert_eq!(partial.display.currency_symbol, "₹");
    }

    #[test]
    fn test_save_and_load() {
        let path = std::env::temp_dir()
            .join(format!("homecraft_config_{}", std::process::id()))
            .join("homecraft.toml");

        let mut config = ClientConfig::default();
        config.api.timeout_secs = 42;
        config.save(Some(path.clone())).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let loaded: ClientConfig = toml::from_str(&text).unwrap();
        assert_eq!(loaded.api.timeout_secs, 42);

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_format_money() {
        let mut config = ClientConfig::default();
        assert_eq!(config.format_money(Money::new(123456)), "₹1,23,456");
        config.display.currency_symbol = "Rs ".to_string();
        assert_eq!(config.format_money(Money::new(500)), "Rs 500");
    }
}
