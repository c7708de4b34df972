//! Wallet Onboarding Wizard
//!
//! A 3-step wizard for adding an HD wallet: collect a display name and
//! mnemonic, choose an encryption password, then review derived addresses
//! and pick one. The wizard is a pure state machine: the caller feeds it
//! [`WizardEvent`]s and executes the [`WizardEffect`]s it returns (issue a
//! derivation preview, submit the creation request), feeding results back in
//! as events. No I/O happens in here, which makes the one-shot submission
//! guarantee an ordinary unit-testable property.
//!
//! Two invariants carry the flow:
//! - the creation request is submitted exactly once, and only after name,
//!   mnemonic, derivation path, and a picked address are all present; a
//!   failed submission re-arms the guard so the same collected state can be
//!   retried without re-entering secrets
//! - a picked address is invalidated whenever the mnemonic or derivation
//!   path changes, and preview responses for superseded inputs are dropped

pub mod edit;

use std::collections::HashMap;
use std::sync::Arc;

use zeroize::Zeroize;

use crate::backend::{MnemonicValidator, PreviewAddress};
use crate::error::Field;
use crate::wallet::{PasswordPolicy, Secret, WalletCreateRequest};
use crate::wallet::hdpath::{DerivationPath, DEFAULT_DERIVATION_PATH};
use crate::wallet::requests::HdWallet;

/// Current step in the onboarding wizard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardStep {
    Mnemonic,
    Password,
    Review,
}

impl WizardStep {
    /// Step number (1-based)
    pub fn number(&self) -> usize {
        match self {
            Self::Mnemonic => 1,
            Self::Password => 2,
            Self::Review => 3,
        }
    }

    /// Total number of steps
    pub fn total() -> usize {
        3
    }

    /// Step title
    pub fn title(&self) -> &'static str {
        match self {
            Self::Mnemonic => "Name & Mnemonic",
            Self::Password => "Encryption Password",
            Self::Review => "Pick an Address",
        }
    }

    /// Step subtitle
    pub fn subtitle(&self) -> &'static str {
        match self {
            Self::Mnemonic => "Name the wallet and paste your seed phrase",
            Self::Password => "Protects the derived keys at rest",
            Self::Review => "Adjust the derivation path and choose an account",
        }
    }
}

/// Input the caller feeds into the wizard: user edits, step navigation, and
/// the results of previously requested effects.
#[derive(Debug, Clone, PartialEq)]
pub enum WizardEvent {
    NameChanged(String),
    MnemonicChanged(String),
    PasswordChanged(String),
    ConfirmationChanged(String),
    DerivationPathChanged(String),
    /// User picked one address key from the current preview set.
    AddressPicked(String),
    /// Validate the current step's fields and advance.
    Continue,
    /// Tear the wizard down, discarding all state.
    Cancel,
    /// A derivation preview resolved. Tagged with the inputs it was issued
    /// for; stale responses are discarded silently.
    PreviewResolved {
        mnemonic: String,
        derivation_path: String,
        addresses: Vec<PreviewAddress>,
    },
    /// A derivation preview failed. Non-fatal; the previous set stays.
    PreviewFailed {
        mnemonic: String,
        derivation_path: String,
        reason: String,
    },
    CreateSucceeded(HdWallet),
    CreateFailed(String),
}

/// Side effects for the caller to execute. The wizard never performs these
/// itself.
#[derive(Debug, Clone, PartialEq)]
pub enum WizardEffect {
    /// Issue a derivation preview for the given inputs and feed the result
    /// back as `PreviewResolved` / `PreviewFailed`.
    RequestPreview {
        mnemonic: String,
        derivation_path: String,
    },
    /// Submit the wallet-creation request. Feed the outcome back as
    /// `CreateSucceeded` / `CreateFailed`.
    SubmitCreate(WalletCreateRequest),
    /// The user cancelled; the caller must drop this wizard instance.
    Removed,
    /// The wallet was created; the flow is finished.
    Created(HdWallet),
}

/// Defaults applied when the wizard starts.
#[derive(Debug, Clone)]
pub struct WizardDefaults {
    pub derivation_path: String,
    pub address_count: u32,
}

impl Default for WizardDefaults {
    fn default() -> Self {
        Self {
            derivation_path: DEFAULT_DERIVATION_PATH.to_string(),
            address_count: 5,
        }
    }
}

/// Main onboarding wizard state. Owned by exactly one caller; never shared.
pub struct WalletWizard {
    step: WizardStep,

    // Step 1: Name & Mnemonic
    name: String,
    mnemonic: String,

    // Step 2: Password
    password: String,
    confirmation: String,

    // Step 3: Review
    derivation_path: String,
    addresses: Vec<PreviewAddress>,
    /// Inputs the displayed preview set was derived from.
    preview_for: Option<(String, String)>,
    selected: Option<String>,

    // Submission guard
    submitted: bool,
    count: u32,

    errors: HashMap<Field, String>,
    status: Option<String>,

    policy: PasswordPolicy,
    validator: Arc<dyn MnemonicValidator>,
}

impl WalletWizard {
    pub fn new(defaults: WizardDefaults, validator: Arc<dyn MnemonicValidator>) -> Self {
        Self {
            step: WizardStep::Mnemonic,
            name: String::new(),
            mnemonic: String::new(),
            password: String::new(),
            confirmation: String::new(),
            derivation_path: defaults.derivation_path,
            addresses: Vec::new(),
            preview_for: None,
            selected: None,
            submitted: false,
            count: defaults.address_count,
            errors: HashMap::new(),
            status: None,
            policy: PasswordPolicy::default(),
            validator,
        }
    }

    /// Feed one event in; returns the effects the caller must execute.
    pub fn handle(&mut self, event: WizardEvent) -> Vec<WizardEffect> {
        match event {
            WizardEvent::NameChanged(value) => {
                self.name = value;
                self.errors.remove(&Field::Name);
                Vec::new()
            }
            WizardEvent::MnemonicChanged(value) => {
                if value == self.mnemonic {
                    return Vec::new();
                }
                self.mnemonic = value;
                self.errors.remove(&Field::Mnemonic);
                self.invalidate_preview()
            }
            WizardEvent::PasswordChanged(value) => {
                self.password = value;
                self.errors.remove(&Field::Password);
                Vec::new()
            }
            WizardEvent::ConfirmationChanged(value) => {
                self.confirmation = value;
                self.errors.remove(&Field::Confirmation);
                Vec::new()
            }
            WizardEvent::DerivationPathChanged(value) => {
                if value == self.derivation_path {
                    return Vec::new();
                }
                self.derivation_path = value;
                self.errors.remove(&Field::DerivationPath);
                self.invalidate_preview()
            }
            WizardEvent::AddressPicked(key) => self.pick_address(key),
            WizardEvent::Continue => self.advance(),
            WizardEvent::Cancel => {
                self.wipe_secrets();
                vec![WizardEffect::Removed]
            }
            WizardEvent::PreviewResolved {
                mnemonic,
                derivation_path,
                addresses,
            } => {
                self.accept_preview(&mnemonic, &derivation_path, addresses);
                Vec::new()
            }
            WizardEvent::PreviewFailed {
                mnemonic,
                derivation_path,
                reason,
            } => {
                if self.is_current_pair(&mnemonic, &derivation_path) {
                    tracing::warn!("derivation preview failed: {reason}");
                    self.status = Some(format!("Preview failed: {reason}"));
                } else {
                    tracing::debug!("discarding stale preview failure");
                }
                Vec::new()
            }
            WizardEvent::CreateSucceeded(wallet) => {
                tracing::info!(wallet = %wallet.name, "wallet created");
                self.wipe_secrets();
                vec![WizardEffect::Created(wallet)]
            }
            WizardEvent::CreateFailed(reason) => {
                // Re-arm the one-shot guard so the completed state can be
                // resubmitted after a transient backend error.
                tracing::warn!("wallet creation failed: {reason}");
                self.submitted = false;
                self.status = Some(format!("Creation failed: {reason} — press Enter to retry"));
                Vec::new()
            }
        }
    }

    /// Invalidate anything derived from (mnemonic, derivation path): the
    /// picked address is always cleared; on the review step a fresh preview
    /// is requested if the path still parses.
    fn invalidate_preview(&mut self) -> Vec<WizardEffect> {
        self.selected = None;
        if self.step != WizardStep::Review {
            return Vec::new();
        }
        self.request_preview()
    }

    fn request_preview(&mut self) -> Vec<WizardEffect> {
        if let Err(err) = DerivationPath::parse(&self.derivation_path) {
            self.errors.insert(err.field, err.message);
            return Vec::new();
        }
        vec![WizardEffect::RequestPreview {
            mnemonic: self.mnemonic.trim().to_string(),
            derivation_path: self.derivation_path.trim().to_string(),
        }]
    }

    fn is_current_pair(&self, mnemonic: &str, derivation_path: &str) -> bool {
        mnemonic == self.mnemonic.trim() && derivation_path == self.derivation_path.trim()
    }

    fn accept_preview(
        &mut self,
        mnemonic: &str,
        derivation_path: &str,
        addresses: Vec<PreviewAddress>,
    ) {
        if !self.is_current_pair(mnemonic, derivation_path) {
            tracing::debug!("discarding preview response for superseded inputs");
            return;
        }
        // Keep the selection only if the same key exists in the fresh set
        // (identical inputs are idempotent, so this is the common case on a
        // re-request).
        let selection_survives = self
            .selected
            .as_ref()
            .is_some_and(|selected| addresses.iter().any(|a| &a.index == selected));
        if !selection_survives {
            self.selected = None;
        }
        self.addresses = addresses;
        self.preview_for = Some((mnemonic.to_string(), derivation_path.to_string()));
        self.status = None;
    }

    fn pick_address(&mut self, key: String) -> Vec<WizardEffect> {
        if self.step != WizardStep::Review {
            return Vec::new();
        }
        let current = self
            .preview_for
            .as_ref()
            .is_some_and(|(m, p)| self.is_current_pair(m, p));
        if !current || !self.addresses.iter().any(|a| a.index == key) {
            return Vec::new();
        }
        self.selected = Some(key);
        self.errors.remove(&Field::Selection);
        self.maybe_submit()
    }

    /// Validate the current step's fields and advance.
    fn advance(&mut self) -> Vec<WizardEffect> {
        self.status = None;
        match self.step {
            WizardStep::Mnemonic => {
                if self.name.trim().is_empty() {
                    self.errors
                        .insert(Field::Name, "cannot be empty".to_string());
                }
                if !self.validator.is_valid(self.mnemonic.trim()) {
                    self.errors
                        .insert(Field::Mnemonic, "not a valid mnemonic phrase".to_string());
                }
                if self.errors.is_empty() {
                    tracing::debug!("wizard advanced to password step");
                    self.step = WizardStep::Password;
                }
                Vec::new()
            }
            WizardStep::Password => {
                if let Err(err) = self.policy.check(&self.password, &self.confirmation) {
                    self.errors.insert(err.field, err.message);
                    return Vec::new();
                }
                tracing::debug!("wizard advanced to review step");
                self.step = WizardStep::Review;
                self.selected = None;
                self.request_preview()
            }
            WizardStep::Review => {
                // Terminal step: confirming does not transition anywhere,
                // it signals that data collection is complete.
                if self.selected.is_none() {
                    self.errors
                        .insert(Field::Selection, "pick an address first".to_string());
                    return Vec::new();
                }
                self.maybe_submit()
            }
        }
    }

    /// Issue the creation request iff every required field is present and no
    /// request has been issued yet. The sole place `submitted` flips.
    fn maybe_submit(&mut self) -> Vec<WizardEffect> {
        if self.submitted {
            return Vec::new();
        }
        let Some(selected) = self.selected.clone() else {
            return Vec::new();
        };
        if self.name.trim().is_empty()
            || self.mnemonic.trim().is_empty()
            || self.derivation_path.trim().is_empty()
        {
            return Vec::new();
        }

        let request = WalletCreateRequest {
            count: self.count,
            name: self.name.trim().to_string(),
            mnemonic: Secret::new(self.mnemonic.trim()),
            derivation_path: self.derivation_path.trim().to_string(),
            current: selected,
            password: Secret::new(self.password.as_str()),
        };
        if let Err(err) = request.validate() {
            self.errors.insert(err.field, err.message);
            return Vec::new();
        }

        self.submitted = true;
        tracing::info!(wallet = %request.name, "submitting wallet creation");
        vec![WizardEffect::SubmitCreate(request)]
    }

    fn wipe_secrets(&mut self) {
        self.mnemonic.zeroize();
        self.password.zeroize();
        self.confirmation.zeroize();
    }

    // --- Accessors for rendering ---

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mnemonic(&self) -> &str {
        &self.mnemonic
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    pub fn confirmation(&self) -> &str {
        &self.confirmation
    }

    pub fn derivation_path(&self) -> &str {
        &self.derivation_path
    }

    pub fn addresses(&self) -> &[PreviewAddress] {
        &self.addresses
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn submitted(&self) -> bool {
        self.submitted
    }

    pub fn error(&self, field: Field) -> Option<&str> {
        self.errors.get(&field).map(String::as_str)
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wallet::{Address, StructuralValidator};
    use chrono::Utc;
    use proptest::prelude::*;
    use uuid::Uuid;

    const PHRASE: &str =
        "legal winner thank year wave sausage worth useful legal winner thank yellow";
    const OTHER_PATH: &str = "m/44'/60'/0'/0/5";

    fn wizard() -> WalletWizard {
        WalletWizard::new(WizardDefaults::default(), Arc::new(StructuralValidator))
    }

    fn addr(byte: u8) -> Address {
        Address::new([byte; 20])
    }

    fn preview(keys: &[(&str, u8)]) -> Vec<PreviewAddress> {
        keys.iter()
            .map(|(key, byte)| PreviewAddress {
                index: key.to_string(),
                address: addr(*byte),
            })
            .collect()
    }

    fn sample_wallet() -> HdWallet {
        HdWallet {
            id: Uuid::new_v4(),
            name: "Main".to_string(),
            derivation_path: DEFAULT_DERIVATION_PATH.to_string(),
            count: 5,
            current: "1".to_string(),
            address: addr(0xbb),
            created_at: Utc::now(),
        }
    }

    /// Drive the wizard through steps 1 and 2 with valid input.
    fn reach_review(wizard: &mut WalletWizard) -> Vec<WizardEffect> {
        wizard.handle(WizardEvent::NameChanged("Main".to_string()));
        wizard.handle(WizardEvent::MnemonicChanged(PHRASE.to_string()));
        let effects = wizard.handle(WizardEvent::Continue);
        assert!(effects.is_empty());
        wizard.handle(WizardEvent::PasswordChanged("s3cret-enough".to_string()));
        wizard.handle(WizardEvent::ConfirmationChanged("s3cret-enough".to_string()));
        wizard.handle(WizardEvent::Continue)
    }

    fn submit_effects(effects: &[WizardEffect]) -> Vec<&WalletCreateRequest> {
        effects
            .iter()
            .filter_map(|e| match e {
                WizardEffect::SubmitCreate(request) => Some(request),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_initial_state() {
        let wizard = wizard();
        assert_eq!(wizard.step(), WizardStep::Mnemonic);
        assert_eq!(wizard.derivation_path(), DEFAULT_DERIVATION_PATH);
        assert!(!wizard.submitted());
        assert!(wizard.selected().is_none());
    }

    #[test]
    fn test_step_numbering() {
        assert_eq!(WizardStep::Mnemonic.number(), 1);
        assert_eq!(WizardStep::Review.number(), 3);
        assert_eq!(WizardStep::total(), 3);
    }

    #[test]
    fn test_mnemonic_step_blocks_on_empty_name() {
        let mut wizard = wizard();
        wizard.handle(WizardEvent::MnemonicChanged(PHRASE.to_string()));
        wizard.handle(WizardEvent::Continue);
        assert_eq!(wizard.step(), WizardStep::Mnemonic);
        assert!(wizard.error(Field::Name).is_some());
        assert!(wizard.error(Field::Mnemonic).is_none());
    }

    #[test]
    fn test_mnemonic_step_blocks_on_bad_phrase() {
        let mut wizard = wizard();
        wizard.handle(WizardEvent::NameChanged("Main".to_string()));
        wizard.handle(WizardEvent::MnemonicChanged("three word phrase".to_string()));
        wizard.handle(WizardEvent::Continue);
        assert_eq!(wizard.step(), WizardStep::Mnemonic);
        assert!(wizard.error(Field::Mnemonic).is_some());
    }

    #[test]
    fn test_password_step_blocks_on_mismatch() {
        let mut wizard = wizard();
        wizard.handle(WizardEvent::NameChanged("Main".to_string()));
        wizard.handle(WizardEvent::MnemonicChanged(PHRASE.to_string()));
        wizard.handle(WizardEvent::Continue);
        assert_eq!(wizard.step(), WizardStep::Password);

        wizard.handle(WizardEvent::PasswordChanged("s3cret-enough".to_string()));
        wizard.handle(WizardEvent::ConfirmationChanged("different".to_string()));
        wizard.handle(WizardEvent::Continue);
        assert_eq!(wizard.step(), WizardStep::Password);
        assert!(wizard.error(Field::Confirmation).is_some());
    }

    #[test]
    fn test_reaching_review_requests_preview_without_submitting() {
        let mut wizard = wizard();
        let effects = reach_review(&mut wizard);
        assert_eq!(wizard.step(), WizardStep::Review);
        assert!(!wizard.submitted());
        assert_eq!(
            effects,
            vec![WizardEffect::RequestPreview {
                mnemonic: PHRASE.to_string(),
                derivation_path: DEFAULT_DERIVATION_PATH.to_string(),
            }]
        );
        assert!(submit_effects(&effects).is_empty());
    }

    #[test]
    fn test_full_flow_submits_once_with_picked_key() {
        let mut wizard = wizard();
        reach_review(&mut wizard);
        wizard.handle(WizardEvent::PreviewResolved {
            mnemonic: PHRASE.to_string(),
            derivation_path: DEFAULT_DERIVATION_PATH.to_string(),
            addresses: preview(&[("0", 0xaa), ("1", 0xbb)]),
        });
        assert_eq!(wizard.addresses().len(), 2);

        let effects = wizard.handle(WizardEvent::AddressPicked("1".to_string()));
        let submits = submit_effects(&effects);
        assert_eq!(submits.len(), 1);
        let request = submits[0];
        assert_eq!(request.current, "1");
        assert_eq!(request.derivation_path, DEFAULT_DERIVATION_PATH);
        assert_eq!(request.name, "Main");
        assert_eq!(request.count, 5);
        assert!(wizard.submitted());

        // Confirming again must not produce a second request.
        let again = wizard.handle(WizardEvent::Continue);
        assert!(submit_effects(&again).is_empty());
    }

    #[test]
    fn test_path_change_clears_selection_and_reissues_preview() {
        let mut wizard = wizard();
        reach_review(&mut wizard);
        wizard.handle(WizardEvent::PreviewResolved {
            mnemonic: PHRASE.to_string(),
            derivation_path: DEFAULT_DERIVATION_PATH.to_string(),
            addresses: preview(&[("0", 0xaa), ("1", 0xbb)]),
        });
        // Pick, submit fires; then fail it so the guard re-arms and the
        // selection-staleness rule can be observed in isolation.
        wizard.handle(WizardEvent::AddressPicked("1".to_string()));
        wizard.handle(WizardEvent::CreateFailed("boom".to_string()));
        assert_eq!(wizard.selected(), Some("1"));

        let effects = wizard.handle(WizardEvent::DerivationPathChanged(OTHER_PATH.to_string()));
        assert!(wizard.selected().is_none());
        assert_eq!(
            effects,
            vec![WizardEffect::RequestPreview {
                mnemonic: PHRASE.to_string(),
                derivation_path: OTHER_PATH.to_string(),
            }]
        );
        // No submission until a new pick happens.
        assert!(submit_effects(&wizard.handle(WizardEvent::Continue)).is_empty());
    }

    #[test]
    fn test_stale_preview_response_discarded() {
        let mut wizard = wizard();
        reach_review(&mut wizard);
        wizard.handle(WizardEvent::DerivationPathChanged(OTHER_PATH.to_string()));

        // Response for the original pair arrives late: dropped.
        wizard.handle(WizardEvent::PreviewResolved {
            mnemonic: PHRASE.to_string(),
            derivation_path: DEFAULT_DERIVATION_PATH.to_string(),
            addresses: preview(&[("0", 0x11)]),
        });
        assert!(wizard.addresses().is_empty());

        // Response for the current pair lands.
        wizard.handle(WizardEvent::PreviewResolved {
            mnemonic: PHRASE.to_string(),
            derivation_path: OTHER_PATH.to_string(),
            addresses: preview(&[("5", 0x55)]),
        });
        assert_eq!(wizard.addresses().len(), 1);
        assert_eq!(wizard.addresses()[0].index, "5");
    }

    #[test]
    fn test_stale_pick_ignored() {
        let mut wizard = wizard();
        reach_review(&mut wizard);
        wizard.handle(WizardEvent::PreviewResolved {
            mnemonic: PHRASE.to_string(),
            derivation_path: DEFAULT_DERIVATION_PATH.to_string(),
            addresses: preview(&[("0", 0xaa)]),
        });
        // Path changes; the displayed set is now superseded, so picking from
        // it must not stick (the previous index may map to a different
        // address under the new path).
        wizard.handle(WizardEvent::DerivationPathChanged(OTHER_PATH.to_string()));
        let effects = wizard.handle(WizardEvent::AddressPicked("0".to_string()));
        assert!(wizard.selected().is_none());
        assert!(submit_effects(&effects).is_empty());
    }

    #[test]
    fn test_preview_failure_keeps_previous_set() {
        let mut wizard = wizard();
        reach_review(&mut wizard);
        wizard.handle(WizardEvent::PreviewResolved {
            mnemonic: PHRASE.to_string(),
            derivation_path: DEFAULT_DERIVATION_PATH.to_string(),
            addresses: preview(&[("0", 0xaa)]),
        });

        wizard.handle(WizardEvent::PreviewFailed {
            mnemonic: PHRASE.to_string(),
            derivation_path: DEFAULT_DERIVATION_PATH.to_string(),
            reason: "backend unreachable".to_string(),
        });
        assert_eq!(wizard.addresses().len(), 1);
        assert!(wizard.status().is_some_and(|s| s.contains("unreachable")));
    }

    #[test]
    fn test_failed_create_allows_retry_without_recollection() {
        let mut wizard = wizard();
        reach_review(&mut wizard);
        wizard.handle(WizardEvent::PreviewResolved {
            mnemonic: PHRASE.to_string(),
            derivation_path: DEFAULT_DERIVATION_PATH.to_string(),
            addresses: preview(&[("0", 0xaa), ("1", 0xbb)]),
        });
        let first = wizard.handle(WizardEvent::AddressPicked("1".to_string()));
        let first_request = submit_effects(&first)[0].clone();

        wizard.handle(WizardEvent::CreateFailed("keystore locked".to_string()));
        assert!(!wizard.submitted());
        assert!(wizard.status().is_some());

        // Retry resubmits the identical request; no fields re-entered.
        let retry = wizard.handle(WizardEvent::Continue);
        let retried = submit_effects(&retry);
        assert_eq!(retried.len(), 1);
        assert_eq!(*retried[0], first_request);
        assert!(wizard.submitted());
    }

    #[test]
    fn test_create_success_emits_created_effect() {
        let mut wizard = wizard();
        reach_review(&mut wizard);
        wizard.handle(WizardEvent::PreviewResolved {
            mnemonic: PHRASE.to_string(),
            derivation_path: DEFAULT_DERIVATION_PATH.to_string(),
            addresses: preview(&[("1", 0xbb)]),
        });
        wizard.handle(WizardEvent::AddressPicked("1".to_string()));

        let wallet = sample_wallet();
        let effects = wizard.handle(WizardEvent::CreateSucceeded(wallet.clone()));
        assert_eq!(effects, vec![WizardEffect::Created(wallet)]);
        // Secrets are gone after completion.
        assert!(wizard.mnemonic().is_empty());
        assert!(wizard.password().is_empty());
    }

    #[test]
    fn test_cancel_emits_removed_and_wipes_secrets() {
        let mut wizard = wizard();
        wizard.handle(WizardEvent::MnemonicChanged(PHRASE.to_string()));
        wizard.handle(WizardEvent::PasswordChanged("s3cret-enough".to_string()));

        let effects = wizard.handle(WizardEvent::Cancel);
        assert_eq!(effects, vec![WizardEffect::Removed]);
        assert!(wizard.mnemonic().is_empty());
        assert!(wizard.password().is_empty());
    }

    #[test]
    fn test_review_confirm_without_selection_errors() {
        let mut wizard = wizard();
        reach_review(&mut wizard);
        let effects = wizard.handle(WizardEvent::Continue);
        assert!(submit_effects(&effects).is_empty());
        assert!(wizard.error(Field::Selection).is_some());
    }

    #[test]
    fn test_invalid_path_edit_blocks_preview() {
        let mut wizard = wizard();
        reach_review(&mut wizard);
        let effects = wizard.handle(WizardEvent::DerivationPathChanged("m/oops".to_string()));
        assert!(effects.is_empty());
        assert!(wizard.error(Field::DerivationPath).is_some());
        assert!(wizard.selected().is_none());
    }

    #[test]
    fn test_identical_path_edit_is_noop() {
        let mut wizard = wizard();
        reach_review(&mut wizard);
        wizard.handle(WizardEvent::PreviewResolved {
            mnemonic: PHRASE.to_string(),
            derivation_path: DEFAULT_DERIVATION_PATH.to_string(),
            addresses: preview(&[("0", 0xaa)]),
        });
        wizard.handle(WizardEvent::AddressPicked("0".to_string()));
        wizard.handle(WizardEvent::CreateFailed("transient".to_string()));
        assert_eq!(wizard.selected(), Some("0"));

        // Re-setting the same value must not clear the selection.
        let effects = wizard.handle(WizardEvent::DerivationPathChanged(
            DEFAULT_DERIVATION_PATH.to_string(),
        ));
        assert!(effects.is_empty());
        assert_eq!(wizard.selected(), Some("0"));
    }

    #[test]
    fn test_duplicate_preview_delivery_is_stable() {
        // The preview operation is idempotent; delivering the same response
        // twice must not disturb the set or a selection made from it.
        let mut wizard = wizard();
        reach_review(&mut wizard);
        let delivery = WizardEvent::PreviewResolved {
            mnemonic: PHRASE.to_string(),
            derivation_path: DEFAULT_DERIVATION_PATH.to_string(),
            addresses: preview(&[("0", 0xaa), ("1", 0xbb)]),
        };
        wizard.handle(delivery.clone());
        wizard.handle(WizardEvent::AddressPicked("1".to_string()));
        wizard.handle(delivery);

        assert_eq!(wizard.addresses().len(), 2);
        assert_eq!(wizard.selected(), Some("1"));
    }

    // ── property: the submission guard ──

    fn event_strategy() -> impl Strategy<Value = WizardEvent> {
        let preview_current = WizardEvent::PreviewResolved {
            mnemonic: PHRASE.to_string(),
            derivation_path: DEFAULT_DERIVATION_PATH.to_string(),
            addresses: preview(&[("0", 0xaa), ("1", 0xbb)]),
        };
        let preview_other = WizardEvent::PreviewResolved {
            mnemonic: PHRASE.to_string(),
            derivation_path: OTHER_PATH.to_string(),
            addresses: preview(&[("5", 0x55)]),
        };
        prop_oneof![
            Just(WizardEvent::Continue),
            Just(WizardEvent::NameChanged("Main".to_string())),
            "[a-z ]{0,16}".prop_map(WizardEvent::NameChanged),
            Just(WizardEvent::MnemonicChanged(PHRASE.to_string())),
            "[a-z ]{0,24}".prop_map(WizardEvent::MnemonicChanged),
            Just(WizardEvent::PasswordChanged("s3cret-enough".to_string())),
            Just(WizardEvent::ConfirmationChanged("s3cret-enough".to_string())),
            "[a-z0-9]{0,10}".prop_map(WizardEvent::PasswordChanged),
            Just(WizardEvent::DerivationPathChanged(OTHER_PATH.to_string())),
            Just(WizardEvent::DerivationPathChanged(
                DEFAULT_DERIVATION_PATH.to_string()
            )),
            Just(preview_current),
            Just(preview_other),
            "[0-9]{1}".prop_map(WizardEvent::AddressPicked),
        ]
    }

    proptest! {
        /// Absent a CreateFailed event, no event sequence can make the
        /// wizard emit more than one creation request.
        #[test]
        fn prop_at_most_one_submission(events in proptest::collection::vec(event_strategy(), 0..48)) {
            let mut wizard = wizard();
            let mut submissions = 0usize;
            for event in events {
                for effect in wizard.handle(event) {
                    if matches!(effect, WizardEffect::SubmitCreate(_)) {
                        submissions += 1;
                    }
                }
            }
            prop_assert!(submissions <= 1, "got {submissions} submissions");
        }

        /// Any change to the derivation path leaves the selection empty
        /// until a fresh pick happens.
        #[test]
        fn prop_path_change_clears_selection(suffix in 0u32..1000) {
            let mut wizard = wizard();
            reach_review(&mut wizard);
            wizard.handle(WizardEvent::PreviewResolved {
                mnemonic: PHRASE.to_string(),
                derivation_path: DEFAULT_DERIVATION_PATH.to_string(),
                addresses: preview(&[("0", 0xaa)]),
            });
            wizard.handle(WizardEvent::AddressPicked("0".to_string()));
            wizard.handle(WizardEvent::DerivationPathChanged(
                format!("m/44'/60'/0'/0/{suffix}"),
            ));
            prop_assert!(wizard.selected().is_none());
        }
    }
}
