//! Configuration Module
//!
//! Handles application configuration loading, validation, and management.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::wallet::hdpath::DEFAULT_DERIVATION_PATH;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Wallet defaults applied by the onboarding wizard
    #[serde(default)]
    pub wallet: WalletDefaultsConfig,

    /// Wallet backend connection
    #[serde(default)]
    pub backend: BackendConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Defaults for new HD wallets
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletDefaultsConfig {
    /// Derivation path template used until the user overrides it
    #[serde(default = "default_derivation_path")]
    pub derivation_path: String,

    /// How many addresses a new wallet tracks (and the preview shows)
    #[serde(default = "default_address_count")]
    pub address_count: u32,
}

fn default_derivation_path() -> String {
    DEFAULT_DERIVATION_PATH.to_string()
}

fn default_address_count() -> u32 {
    5
}

impl Default for WalletDefaultsConfig {
    fn default() -> Self {
        Self {
            derivation_path: default_derivation_path(),
            address_count: default_address_count(),
        }
    }
}

/// Wallet backend connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Base URL of the wallet backend (default: "http://127.0.0.1:9011")
    #[serde(default = "default_backend_url")]
    pub url: String,

    /// Request timeout in seconds (default: 30)
    #[serde(default = "default_backend_timeout")]
    pub timeout_secs: u64,
}

fn default_backend_url() -> String {
    "http://127.0.0.1:9011".to_string()
}

fn default_backend_timeout() -> u64 {
    30
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: default_backend_url(),
            timeout_secs: default_backend_timeout(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level directive when RUST_LOG is unset (default: "info")
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// Application home directory (`~/.vaultry`, overridable via `VAULTRY_HOME`)
pub fn vaultry_home() -> PathBuf {
    if let Ok(home) = std::env::var("VAULTRY_HOME") {
        return PathBuf::from(home);
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".vaultry")
}

/// Default path for the config file
pub fn default_config_path() -> PathBuf {
    vaultry_home().join("config.toml")
}

/// Default path for the wallet list file
pub fn default_wallets_path() -> PathBuf {
    vaultry_home().join("wallets.json")
}

impl Config {
    /// Load configuration from a toml file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from the given path if it exists, otherwise fall back to defaults
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Write configuration to a toml file, creating parent directories
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config dir: {}", parent.display()))?;
        }
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;
        Ok(())
    }

    /// Sanity checks beyond serde's type validation
    pub fn validate(&self) -> Result<()> {
        if self.wallet.address_count == 0 || self.wallet.address_count > 100 {
            anyhow::bail!(
                "wallet.address_count must be between 1 and 100, got {}",
                self.wallet.address_count
            );
        }
        if self.backend.url.is_empty() {
            anyhow::bail!("backend.url must not be empty");
        }
        Ok(())
    }
}
