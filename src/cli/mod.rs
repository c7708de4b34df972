//! CLI entry point.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;

use crate::backend::HttpBackend;
use crate::config::{self, Config};
use crate::store::{EventBus, NetworkStore, WalletStore};
use crate::tui::App;

#[derive(Debug, Parser)]
#[command(name = "vaultry", version, about)]
pub struct Cli {
    /// Enable debug logging to a file under the app home
    #[arg(long)]
    pub debug: bool,

    /// Path to the config file (default: ~/.vaultry/config.toml)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Override the wallet backend URL
    #[arg(long, env = "VAULTRY_BACKEND_URL", value_name = "URL")]
    pub backend_url: Option<String>,
}

/// Load configuration, wire up the stores and backend, and run the TUI.
pub async fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config.unwrap_or_else(config::default_config_path);
    let mut config = Config::load_or_default(&config_path)?;
    if let Some(url) = cli.backend_url {
        config.backend.url = url;
    }
    tracing::info!(backend = %config.backend.url, "starting vaultry {}", crate::VERSION);

    let backend = HttpBackend::new(config.backend.url.clone(), config.backend.timeout_secs)
        .context("failed to set up the wallet backend client")?;

    let bus = EventBus::default();
    let wallets = WalletStore::load(config::default_wallets_path(), bus.clone())
        .context("failed to load the wallet list")?;
    let networks = NetworkStore::new(bus.clone());

    let mut app = App::new(config, Arc::new(backend), wallets, networks, &bus);

    let mut terminal = ratatui::init();
    let result = app.run(&mut terminal).await;
    ratatui::restore();
    result
}
