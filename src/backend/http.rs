//! HTTP implementation of the wallet backend.
//!
//! JSON request/response against a wallet daemon. Transport failures map to
//! `VaultryError::Backend`; rejected previews and submissions keep their own
//! error classes so the wizard can react per the error taxonomy.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use super::{PreviewAddress, WalletBackend};
use crate::error::{Result, VaultryError};
use crate::wallet::{HdWallet, WalletCreateRequest, WalletUpdateRequest};

const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Error body shape returned by the wallet daemon.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

#[derive(Clone)]
pub struct HttpBackend {
    base_url: String,
    client: Client,
}

impl HttpBackend {
    pub fn new(base_url: impl Into<String>, timeout_secs: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(DEFAULT_CONNECT_TIMEOUT)
            .build()
            .map_err(|e| VaultryError::Backend(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Extract a failure reason from a non-success response.
    async fn failure_reason(response: reqwest::Response) -> String {
        let status = response.status();
        match response.text().await {
            Ok(body) => match serde_json::from_str::<ErrorBody>(&body) {
                Ok(parsed) => parsed.error,
                Err(_) if !body.is_empty() => body,
                Err(_) => format!("HTTP {status}"),
            },
            Err(_) => format!("HTTP {status}"),
        }
    }
}

#[async_trait]
impl WalletBackend for HttpBackend {
    async fn derive_preview(
        &self,
        mnemonic: &str,
        derivation_path: &str,
    ) -> Result<Vec<PreviewAddress>> {
        let response = self
            .client
            .post(self.url("/wallets/preview"))
            .json(&serde_json::json!({
                "mnemonic": mnemonic,
                "derivationPath": derivation_path,
            }))
            .send()
            .await
            .map_err(|e| VaultryError::Backend(e.to_string()))?;

        if !response.status().is_success() {
            return Err(VaultryError::Preview(Self::failure_reason(response).await));
        }

        response
            .json()
            .await
            .map_err(|e| VaultryError::Preview(format!("malformed preview response: {e}")))
    }

    async fn create_wallet(&self, request: &WalletCreateRequest) -> Result<HdWallet> {
        let response = self
            .client
            .post(self.url("/wallets"))
            .json(request)
            .send()
            .await
            .map_err(|e| VaultryError::Backend(e.to_string()))?;

        if !response.status().is_success() {
            return Err(VaultryError::Submission(
                Self::failure_reason(response).await,
            ));
        }

        response
            .json()
            .await
            .map_err(|e| VaultryError::Backend(format!("malformed wallet response: {e}")))
    }

    async fn update_wallet(
        &self,
        wallet: &str,
        request: &WalletUpdateRequest,
    ) -> Result<HdWallet> {
        let response = self
            .client
            .put(self.url(&format!("/wallets/{wallet}")))
            .json(request)
            .send()
            .await
            .map_err(|e| VaultryError::Backend(e.to_string()))?;

        if !response.status().is_success() {
            return Err(VaultryError::Submission(
                Self::failure_reason(response).await,
            ));
        }

        response
            .json()
            .await
            .map_err(|e| VaultryError::Backend(format!("malformed wallet response: {e}")))
    }

    async fn remove_wallet(&self, wallet: &str) -> Result<()> {
        let response = self
            .client
            .delete(self.url(&format!("/wallets/{wallet}")))
            .send()
            .await
            .map_err(|e| VaultryError::Backend(e.to_string()))?;

        if !response.status().is_success() {
            return Err(VaultryError::Submission(
                Self::failure_reason(response).await,
            ));
        }
        Ok(())
    }
}
