//! Wallet edit form.
//!
//! Updating an existing wallet's name, derivation path, or address count is
//! a plain request/response form: no secrets, no preview, and no one-shot
//! guard, since a failed update can simply be submitted again.

use std::collections::HashMap;

use crate::error::Field;
use crate::wallet::{HdWallet, WalletUpdateRequest};

#[derive(Debug, Clone, PartialEq)]
pub enum EditEvent {
    NameChanged(String),
    DerivationPathChanged(String),
    CountChanged(String),
    Submit,
    Cancel,
    UpdateSucceeded(HdWallet),
    UpdateFailed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum EditEffect {
    /// Submit the update for the wallet identified by its original name.
    SubmitUpdate {
        wallet: String,
        request: WalletUpdateRequest,
    },
    /// The user cancelled; the caller must drop this form.
    Removed,
    /// The backend confirmed the update.
    Updated(HdWallet),
}

/// Edit form state, seeded from the wallet being edited.
pub struct EditWalletForm {
    /// Name the wallet had when editing started; keys the update request.
    original_name: String,
    name: String,
    derivation_path: String,
    /// Count is edited as text so partial input doesn't vanish.
    count_input: String,
    errors: HashMap<Field, String>,
    status: Option<String>,
    pending: bool,
}

impl EditWalletForm {
    pub fn new(wallet: &HdWallet) -> Self {
        Self {
            original_name: wallet.name.clone(),
            name: wallet.name.clone(),
            derivation_path: wallet.derivation_path.clone(),
            count_input: wallet.count.to_string(),
            errors: HashMap::new(),
            status: None,
            pending: false,
        }
    }

    pub fn handle(&mut self, event: EditEvent) -> Vec<EditEffect> {
        match event {
            EditEvent::NameChanged(value) => {
                self.name = value;
                self.errors.remove(&Field::Name);
                Vec::new()
            }
            EditEvent::DerivationPathChanged(value) => {
                self.derivation_path = value;
                self.errors.remove(&Field::DerivationPath);
                Vec::new()
            }
            EditEvent::CountChanged(value) => {
                self.count_input = value;
                self.errors.remove(&Field::Count);
                Vec::new()
            }
            EditEvent::Submit => self.submit(),
            EditEvent::Cancel => vec![EditEffect::Removed],
            EditEvent::UpdateSucceeded(wallet) => {
                self.pending = false;
                vec![EditEffect::Updated(wallet)]
            }
            EditEvent::UpdateFailed(reason) => {
                tracing::warn!("wallet update failed: {reason}");
                self.pending = false;
                self.status = Some(format!("Update failed: {reason}"));
                Vec::new()
            }
        }
    }

    fn submit(&mut self) -> Vec<EditEffect> {
        if self.pending {
            return Vec::new();
        }
        self.status = None;

        let count: u32 = match self.count_input.trim().parse() {
            Ok(count) => count,
            Err(_) => {
                self.errors
                    .insert(Field::Count, "must be a number".to_string());
                return Vec::new();
            }
        };
        let request = WalletUpdateRequest {
            name: self.name.trim().to_string(),
            derivation_path: self.derivation_path.trim().to_string(),
            count,
        };
        if let Err(err) = request.validate() {
            self.errors.insert(err.field, err.message);
            return Vec::new();
        }

        self.pending = true;
        vec![EditEffect::SubmitUpdate {
            wallet: self.original_name.clone(),
            request,
        }]
    }

    // --- Accessors for rendering ---

    pub fn original_name(&self) -> &str {
        &self.original_name
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn derivation_path(&self) -> &str {
        &self.derivation_path
    }

    pub fn count_input(&self) -> &str {
        &self.count_input
    }

    pub fn pending(&self) -> bool {
        self.pending
    }

    pub fn error(&self, field: Field) -> Option<&str> {
        self.errors.get(&field).map(String::as_str)
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }
}
