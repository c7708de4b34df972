//! Wallet backend collaborator interfaces.
//!
//! The backend owns key derivation, encryption, and persistence. This crate
//! only needs three request/response operations plus a pure mnemonic-validity
//! capability; the transport behind them is opaque.

pub mod http;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::wallet::{Address, HdWallet, WalletCreateRequest, WalletUpdateRequest};

pub use http::HttpBackend;

/// One candidate address from a derivation preview: the index key within the
/// derived set, and the account address at that index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreviewAddress {
    pub index: String,
    pub address: Address,
}

/// Pure mnemonic validity capability (word count, checksum).
pub trait MnemonicValidator: Send + Sync {
    fn is_valid(&self, phrase: &str) -> bool;
}

/// Request/response operations consumed from the wallet backend.
///
/// `derive_preview` is idempotent: identical arguments yield the same ordered
/// address set, and a fresh call is issued per input change rather than
/// restarting an old one.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WalletBackend: Send + Sync {
    /// Derive the candidate address set for a (mnemonic, derivation path)
    /// pair, ordered by index.
    async fn derive_preview(
        &self,
        mnemonic: &str,
        derivation_path: &str,
    ) -> Result<Vec<PreviewAddress>>;

    /// Create a wallet. At most one call per onboarding flow, barring a
    /// failed attempt.
    async fn create_wallet(&self, request: &WalletCreateRequest) -> Result<HdWallet>;

    /// Update an existing wallet's name, derivation path, or address count.
    async fn update_wallet(&self, wallet: &str, request: &WalletUpdateRequest)
        -> Result<HdWallet>;

    /// Remove a wallet.
    async fn remove_wallet(&self, wallet: &str) -> Result<()>;
}
