//! Wallet records and backend request payloads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Field, FieldError};
use crate::wallet::address::Address;
use crate::wallet::hdpath::DerivationPath;
use crate::wallet::mnemonic;
use crate::wallet::secret::Secret;

/// Upper bound on addresses tracked per wallet.
pub const MAX_ADDRESS_COUNT: u32 = 100;

/// An HD wallet as confirmed by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HdWallet {
    pub id: Uuid,
    pub name: String,
    pub derivation_path: String,
    pub count: u32,
    /// Index key of the active address within the derived set.
    pub current: String,
    /// The active address itself.
    pub address: Address,
    pub created_at: DateTime<Utc>,
}

/// Payload for creating a new HD wallet.
///
/// Secrets ride along only for the backend to derive and encrypt key
/// material; they are never persisted by this crate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletCreateRequest {
    pub count: u32,
    pub name: String,
    pub mnemonic: Secret,
    pub derivation_path: String,
    pub current: String,
    pub password: Secret,
}

impl WalletCreateRequest {
    /// Field constraints from the validation contract: count 1..=100,
    /// non-empty name, structurally valid mnemonic, well-formed path,
    /// and a chosen address key.
    pub fn validate(&self) -> Result<(), FieldError> {
        validate_count(self.count)?;
        validate_name(&self.name)?;
        if !mnemonic::is_structurally_valid(self.mnemonic.expose()) {
            return Err(FieldError::new(
                Field::Mnemonic,
                "not a valid mnemonic phrase",
            ));
        }
        DerivationPath::parse(&self.derivation_path)?;
        if self.current.is_empty() {
            return Err(FieldError::new(Field::Selection, "no address selected"));
        }
        Ok(())
    }
}

/// Payload for editing an existing wallet. No secrets involved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletUpdateRequest {
    pub name: String,
    pub derivation_path: String,
    pub count: u32,
}

impl WalletUpdateRequest {
    pub fn validate(&self) -> Result<(), FieldError> {
        validate_name(&self.name)?;
        DerivationPath::parse(&self.derivation_path)?;
        validate_count(self.count)?;
        Ok(())
    }
}

fn validate_name(name: &str) -> Result<(), FieldError> {
    if name.trim().is_empty() {
        return Err(FieldError::new(Field::Name, "cannot be empty"));
    }
    Ok(())
}

fn validate_count(count: u32) -> Result<(), FieldError> {
    if count == 0 || count > MAX_ADDRESS_COUNT {
        return Err(FieldError::new(
            Field::Count,
            format!("must be between 1 and {MAX_ADDRESS_COUNT}"),
        ));
    }
    Ok(())
}
