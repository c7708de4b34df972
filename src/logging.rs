//! Logging setup.
//!
//! Stderr logging is always enabled (filtered via `RUST_LOG`); with
//! `--debug`, a daily-rotated file appender is added under the app home so a
//! TUI session can be diagnosed after the fact without polluting the screen.

use std::path::PathBuf;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt as _, util::SubscriberInitExt as _, EnvFilter};

use crate::config::vaultry_home;
use crate::error::{Result, VaultryError};

/// Logging configuration assembled in `main` before anything else runs.
#[derive(Debug, Clone, Default)]
pub struct LogConfig {
    debug_mode: bool,
    log_dir: Option<PathBuf>,
}

impl LogConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_debug_mode(mut self, debug: bool) -> Self {
        self.debug_mode = debug;
        self
    }

    pub fn with_log_dir(mut self, dir: PathBuf) -> Self {
        self.log_dir = Some(dir);
        self
    }

    fn resolved_log_dir(&self) -> PathBuf {
        self.log_dir
            .clone()
            .unwrap_or_else(|| vaultry_home().join("logs"))
    }
}

/// Initialize the tracing subscriber.
///
/// Returns the file appender's worker guard when file logging is active; the
/// caller must keep it alive for the process lifetime or buffered log lines
/// are lost on exit.
pub fn init_logging(config: LogConfig) -> Result<Option<WorkerGuard>> {
    let default_directive = if config.debug_mode { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("vaultry={default_directive}")));

    let registry = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_ansi(true));

    if !config.debug_mode {
        registry
            .try_init()
            .map_err(|e| VaultryError::Config(format!("tracing init failed: {e}")))?;
        return Ok(None);
    }

    let log_dir = config.resolved_log_dir();
    std::fs::create_dir_all(&log_dir)?;

    let appender = tracing_appender::rolling::daily(&log_dir, "vaultry.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);

    registry
        .with(fmt::layer().with_writer(writer).with_ansi(false))
        .try_init()
        .map_err(|e| VaultryError::Config(format!("tracing init failed: {e}")))?;

    tracing::debug!("file logging enabled in {}", log_dir.display());
    Ok(Some(guard))
}

/// Remove log files older than `keep_days` from the default log directory.
/// Returns the number of files removed.
pub fn cleanup_old_logs(keep_days: u64) -> Result<usize> {
    let log_dir = vaultry_home().join("logs");
    if !log_dir.exists() {
        return Ok(0);
    }

    let cutoff = std::time::SystemTime::now()
        .checked_sub(std::time::Duration::from_secs(keep_days * 24 * 60 * 60));
    let Some(cutoff) = cutoff else {
        return Ok(0);
    };

    let mut removed = 0;
    for entry in std::fs::read_dir(&log_dir)? {
        let entry = entry?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Ok(meta) = entry.metadata() else { continue };
        let Ok(modified) = meta.modified() else {
            continue;
        };
        if modified < cutoff && std::fs::remove_file(&path).is_ok() {
            removed += 1;
        }
    }

    Ok(removed)
}
