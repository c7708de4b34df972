//! Vaultry - Terminal HD Wallet Manager
//!
//! A terminal front end for managing hierarchical-deterministic wallets over
//! an external wallet backend. The backend owns key derivation, encryption,
//! and persistence; Vaultry orchestrates input collection, address preview,
//! and wallet lifecycle.
//!
//! ## Features
//!
//! - **Guided onboarding:** Three-step wizard (mnemonic, password, review)
//!   with per-field validation and a live derivation preview
//! - **One-shot submission:** A wallet-creation request fires exactly once,
//!   and only once all required fields are collected
//! - **Edit flow:** Rename a wallet or change its derivation path and
//!   address count without re-entering secrets
//! - **Modern TUI:** Built with Ratatui for a responsive terminal interface
//!
//! ## Quick Start
//!
//! ```bash
//! # Launch the TUI against the default backend
//! vaultry
//!
//! # With verbose file logging
//! vaultry --debug
//! ```

pub mod backend;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod store;
pub mod tui;
pub mod wallet;
pub mod wizard;

// Re-export commonly used types
pub use error::{Field, FieldError, Result, VaultryError};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");
