//! Error types for Vaultry.
//!
//! Three error classes matter to the onboarding flow and are kept distinct:
//! field validation failures (recovered locally, block step advancement),
//! preview failures (non-fatal, retried on the next input change), and
//! submission failures (surfaced to the caller; the only class that re-arms
//! the wizard's one-shot submission guard).

use thiserror::Error;

/// A form field that can fail validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Name,
    Mnemonic,
    Password,
    Confirmation,
    DerivationPath,
    Count,
    Selection,
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Name => "name",
            Self::Mnemonic => "mnemonic",
            Self::Password => "password",
            Self::Confirmation => "password confirmation",
            Self::DerivationPath => "derivation path",
            Self::Count => "address count",
            Self::Selection => "address selection",
        };
        write!(f, "{label}")
    }
}

/// A single-field validation failure. Never fatal; rendered next to the field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct FieldError {
    pub field: Field,
    pub message: String,
}

impl FieldError {
    pub fn new(field: Field, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Top-level error type.
#[derive(Debug, Error)]
pub enum VaultryError {
    #[error(transparent)]
    Validation(#[from] FieldError),

    /// Derivation preview failed. The previous preview set stays on screen.
    #[error("preview failed: {0}")]
    Preview(String),

    /// Wallet create/update was rejected by the backend.
    #[error("submission failed: {0}")]
    Submission(String),

    /// Transport or protocol error talking to the wallet backend.
    #[error("backend error: {0}")]
    Backend(String),

    #[error("config error: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, VaultryError>;
