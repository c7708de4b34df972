//! Application state and event loop.
//!
//! One logical thread of control: the loop owns every piece of state,
//! including the wizard. Backend calls requested by wizard effects run in
//! spawned tasks and report back through the event channel, so a response
//! that arrives after its wizard was torn down simply finds nobody to
//! deliver to and is dropped.

use std::sync::Arc;

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use tokio::sync::broadcast;

use crate::backend::WalletBackend;
use crate::config::Config;
use crate::store::{EventBus, NetworkStore, StoreEvent, WalletStore};
use crate::tui::events::{keys, EventHandler, TuiEvent};
use crate::tui::render;
use crate::wallet::StructuralValidator;
use crate::wizard::edit::{EditEffect, EditEvent, EditWalletForm};
use crate::wizard::{WalletWizard, WizardDefaults, WizardEffect, WizardEvent, WizardStep};

/// Application mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    /// Wallet list
    Wallets,
    /// Onboarding wizard for a new HD wallet
    Onboarding,
    /// Edit form for an existing wallet
    Edit,
}

/// Main application state
pub struct App {
    pub mode: AppMode,
    should_quit: bool,

    config: Config,
    backend: Arc<dyn WalletBackend>,

    pub wallets: WalletStore,
    pub networks: NetworkStore,
    store_events: broadcast::Receiver<StoreEvent>,

    // Onboarding wizard state
    pub wizard: Option<WalletWizard>,
    // Edit form state
    pub edit: Option<EditWalletForm>,

    // Navigation
    pub selected_row: usize,
    pub focus: usize,
    pub review_cursor: usize,
    pub status: Option<String>,

    events: EventHandler,
}

impl App {
    pub fn new(
        config: Config,
        backend: Arc<dyn WalletBackend>,
        wallets: WalletStore,
        networks: NetworkStore,
        bus: &EventBus,
    ) -> Self {
        Self {
            mode: AppMode::Wallets,
            should_quit: false,
            config,
            backend,
            wallets,
            networks,
            store_events: bus.subscribe(),
            wizard: None,
            edit: None,
            selected_row: 0,
            focus: 0,
            review_cursor: 0,
            status: None,
            events: EventHandler::new(),
        }
    }

    /// Run the main event loop until quit.
    pub async fn run(&mut self, terminal: &mut ratatui::DefaultTerminal) -> Result<()> {
        EventHandler::start_terminal_listener(self.events.sender());

        while !self.should_quit {
            terminal.draw(|frame| render::draw(frame, self))?;

            let Some(event) = self.events.next().await else {
                break;
            };
            self.handle_event(event);
            // Drain whatever else queued up before redrawing.
            while let Some(event) = self.events.try_next() {
                self.handle_event(event);
            }
            self.drain_store_events();
        }
        Ok(())
    }

    fn handle_event(&mut self, event: TuiEvent) {
        match event {
            TuiEvent::Key(key) => self.handle_key(key),
            TuiEvent::Paste(text) => self.handle_paste(text),
            TuiEvent::Resize(..) | TuiEvent::Tick => {}

            TuiEvent::PreviewReady {
                mnemonic,
                derivation_path,
                addresses,
            } => {
                self.feed_wizard(WizardEvent::PreviewResolved {
                    mnemonic,
                    derivation_path,
                    addresses,
                });
            }
            TuiEvent::PreviewFailed {
                mnemonic,
                derivation_path,
                reason,
            } => {
                self.feed_wizard(WizardEvent::PreviewFailed {
                    mnemonic,
                    derivation_path,
                    reason,
                });
            }
            TuiEvent::WalletCreated(wallet) => {
                self.feed_wizard(WizardEvent::CreateSucceeded(wallet));
            }
            TuiEvent::CreateFailed(reason) => {
                self.feed_wizard(WizardEvent::CreateFailed(reason));
            }

            TuiEvent::WalletUpdated {
                original_name,
                wallet,
            } => {
                let Some(form) = self.edit.as_mut() else {
                    tracing::debug!("update response after edit form teardown, dropping");
                    return;
                };
                let effects = form.handle(EditEvent::UpdateSucceeded(wallet));
                for effect in effects {
                    if let EditEffect::Updated(wallet) = effect {
                        if let Err(e) = self.wallets.apply_update(&original_name, wallet) {
                            self.status = Some(format!("Failed to record update: {e}"));
                        }
                        self.edit = None;
                        self.mode = AppMode::Wallets;
                    }
                }
            }
            TuiEvent::UpdateFailed(reason) => {
                if let Some(form) = self.edit.as_mut() {
                    form.handle(EditEvent::UpdateFailed(reason));
                }
            }

            TuiEvent::WalletRemoved(name) => {
                if let Err(e) = self.wallets.remove(&name) {
                    self.status = Some(format!("Failed to record removal: {e}"));
                }
                self.clamp_selection();
            }
            TuiEvent::RemoveFailed(reason) => {
                self.status = Some(format!("Remove failed: {reason}"));
            }

            TuiEvent::Quit => self.should_quit = true,
        }
    }

    /// Route a result event to the wizard, if it still exists. Responses
    /// arriving after teardown are dropped without touching any state.
    fn feed_wizard(&mut self, event: WizardEvent) {
        let effects = match self.wizard.as_mut() {
            Some(wizard) => wizard.handle(event),
            None => {
                tracing::debug!("response after wizard teardown, dropping");
                return;
            }
        };
        self.apply_wizard_effects(effects);
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if keys::is_quit(&key) {
            self.should_quit = true;
            return;
        }

        match self.mode {
            AppMode::Wallets => self.handle_wallets_key(key),
            AppMode::Onboarding => self.handle_onboarding_key(key),
            AppMode::Edit => self.handle_edit_key(key),
        }
    }

    fn handle_paste(&mut self, text: String) {
        // Pastes append to whichever field is focused.
        match self.mode {
            AppMode::Onboarding => {
                let Some(wizard) = self.wizard.as_ref() else {
                    return;
                };
                let Some(current) = wizard_field_value(wizard, self.focus) else {
                    return;
                };
                let event = wizard_field_event(wizard.step(), self.focus, current + &text);
                let effects = match (self.wizard.as_mut(), event) {
                    (Some(wizard), Some(event)) => wizard.handle(event),
                    _ => Vec::new(),
                };
                self.apply_wizard_effects(effects);
            }
            AppMode::Edit => {
                if let Some(form) = self.edit.as_mut()
                    && let Some(event) = edit_field_event(form, self.focus, |v| v + &text)
                {
                    form.handle(event);
                }
            }
            AppMode::Wallets => {}
        }
    }

    // --- Wallet list keys ---

    fn handle_wallets_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected_row = self.selected_row.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if !self.wallets.is_empty() {
                    self.selected_row = (self.selected_row + 1).min(self.wallets.len() - 1);
                }
            }
            KeyCode::Char('n') => self.start_onboarding(),
            KeyCode::Char('e') => self.start_edit(),
            KeyCode::Char('d') => self.remove_selected(),
            KeyCode::Enter => {
                if let Some(wallet) = self.wallets.all().get(self.selected_row) {
                    let name = wallet.name.clone();
                    if let Err(e) = self.wallets.set_current(&name) {
                        self.status = Some(format!("{e}"));
                    }
                }
            }
            KeyCode::Tab => self.cycle_network(),
            _ => {}
        }
    }

    fn start_onboarding(&mut self) {
        let defaults = WizardDefaults {
            derivation_path: self.config.wallet.derivation_path.clone(),
            address_count: self.config.wallet.address_count,
        };
        self.wizard = Some(WalletWizard::new(defaults, Arc::new(StructuralValidator)));
        self.mode = AppMode::Onboarding;
        self.focus = 0;
        self.review_cursor = 0;
        self.status = None;
    }

    fn start_edit(&mut self) {
        let Some(wallet) = self.wallets.all().get(self.selected_row) else {
            return;
        };
        self.edit = Some(EditWalletForm::new(wallet));
        self.mode = AppMode::Edit;
        self.focus = 0;
        self.status = None;
    }

    fn remove_selected(&mut self) {
        let Some(wallet) = self.wallets.all().get(self.selected_row) else {
            return;
        };
        let name = wallet.name.clone();
        let backend = Arc::clone(&self.backend);
        let tx = self.events.sender();
        tokio::spawn(async move {
            let event = match backend.remove_wallet(&name).await {
                Ok(()) => TuiEvent::WalletRemoved(name),
                Err(e) => TuiEvent::RemoveFailed(e.to_string()),
            };
            let _ = tx.send(event);
        });
    }

    fn cycle_network(&mut self) {
        let names: Vec<String> = self.networks.all().iter().map(|n| n.name.clone()).collect();
        if names.is_empty() {
            return;
        }
        let current = self.networks.get_current().name.clone();
        let position = names.iter().position(|n| *n == current).unwrap_or(0);
        let next = names[(position + 1) % names.len()].clone();
        if let Err(e) = self.networks.set_current_by_name(&next) {
            self.status = Some(format!("{e}"));
        }
    }

    fn clamp_selection(&mut self) {
        if self.selected_row >= self.wallets.len() {
            self.selected_row = self.wallets.len().saturating_sub(1);
        }
    }

    // --- Onboarding wizard keys ---

    fn handle_onboarding_key(&mut self, key: KeyEvent) {
        let effects = {
            let Some(wizard) = self.wizard.as_mut() else {
                return;
            };
            let step = wizard.step();

            if keys::is_cancel(&key) {
                wizard.handle(WizardEvent::Cancel)
            } else if keys::is_next_field(&key) {
                self.focus = (self.focus + 1) % FIELDS_PER_STEP;
                Vec::new()
            } else if keys::is_prev_field(&key) {
                self.focus = (self.focus + FIELDS_PER_STEP - 1) % FIELDS_PER_STEP;
                Vec::new()
            } else if keys::is_up(&key) && step == WizardStep::Review && self.focus == 1 {
                self.review_cursor = self.review_cursor.saturating_sub(1);
                Vec::new()
            } else if keys::is_down(&key) && step == WizardStep::Review && self.focus == 1 {
                let count = wizard.addresses().len();
                if count > 0 {
                    self.review_cursor = (self.review_cursor + 1).min(count - 1);
                }
                Vec::new()
            } else if keys::is_enter(&key) {
                if self.focus + 1 < FIELDS_PER_STEP {
                    self.focus += 1;
                    Vec::new()
                } else if step == WizardStep::Review {
                    // Enter on the address list picks the highlighted row;
                    // picking the already-selected row confirms/retries.
                    match wizard.addresses().get(self.review_cursor) {
                        Some(entry) if wizard.selected() != Some(entry.index.as_str()) => {
                            let key = entry.index.clone();
                            wizard.handle(WizardEvent::AddressPicked(key))
                        }
                        _ => wizard.handle(WizardEvent::Continue),
                    }
                } else {
                    let before = wizard.step();
                    let effects = wizard.handle(WizardEvent::Continue);
                    if wizard.step() != before {
                        self.focus = 0;
                        self.review_cursor = 0;
                    }
                    effects
                }
            } else {
                match key.code {
                    KeyCode::Char(c) => {
                        match wizard_field_value(wizard, self.focus) {
                            Some(mut value) => {
                                value.push(c);
                                match wizard_field_event(step, self.focus, value) {
                                    Some(event) => wizard.handle(event),
                                    None => Vec::new(),
                                }
                            }
                            None => Vec::new(),
                        }
                    }
                    KeyCode::Backspace => {
                        match wizard_field_value(wizard, self.focus) {
                            Some(mut value) => {
                                value.pop();
                                match wizard_field_event(step, self.focus, value) {
                                    Some(event) => wizard.handle(event),
                                    None => Vec::new(),
                                }
                            }
                            None => Vec::new(),
                        }
                    }
                    _ => Vec::new(),
                }
            }
        };
        self.apply_wizard_effects(effects);
    }

    /// Execute the side effects the wizard asked for.
    fn apply_wizard_effects(&mut self, effects: Vec<WizardEffect>) {
        for effect in effects {
            match effect {
                WizardEffect::RequestPreview {
                    mnemonic,
                    derivation_path,
                } => {
                    let backend = Arc::clone(&self.backend);
                    let tx = self.events.sender();
                    tokio::spawn(async move {
                        let event = match backend
                            .derive_preview(&mnemonic, &derivation_path)
                            .await
                        {
                            Ok(addresses) => TuiEvent::PreviewReady {
                                mnemonic,
                                derivation_path,
                                addresses,
                            },
                            Err(e) => TuiEvent::PreviewFailed {
                                mnemonic,
                                derivation_path,
                                reason: e.to_string(),
                            },
                        };
                        let _ = tx.send(event);
                    });
                }
                WizardEffect::SubmitCreate(request) => {
                    let backend = Arc::clone(&self.backend);
                    let tx = self.events.sender();
                    tokio::spawn(async move {
                        let event = match backend.create_wallet(&request).await {
                            Ok(wallet) => TuiEvent::WalletCreated(wallet),
                            Err(e) => TuiEvent::CreateFailed(e.to_string()),
                        };
                        let _ = tx.send(event);
                    });
                }
                WizardEffect::Removed => {
                    self.wizard = None;
                    self.mode = AppMode::Wallets;
                }
                WizardEffect::Created(wallet) => {
                    self.wizard = None;
                    self.mode = AppMode::Wallets;
                    if let Err(e) = self.wallets.add(wallet) {
                        self.status = Some(format!("Failed to record wallet: {e}"));
                    }
                    self.clamp_selection();
                }
            }
        }
    }

    // --- Edit form keys ---

    fn handle_edit_key(&mut self, key: KeyEvent) {
        let effects = {
            let Some(form) = self.edit.as_mut() else {
                return;
            };

            if keys::is_cancel(&key) {
                form.handle(EditEvent::Cancel)
            } else if keys::is_next_field(&key) {
                self.focus = (self.focus + 1) % EDIT_FIELDS;
                Vec::new()
            } else if keys::is_prev_field(&key) {
                self.focus = (self.focus + EDIT_FIELDS - 1) % EDIT_FIELDS;
                Vec::new()
            } else if keys::is_enter(&key) {
                if self.focus + 1 < EDIT_FIELDS {
                    self.focus += 1;
                    Vec::new()
                } else {
                    form.handle(EditEvent::Submit)
                }
            } else {
                let event = match key.code {
                    KeyCode::Char(c) => edit_field_event(form, self.focus, |mut v| {
                        v.push(c);
                        v
                    }),
                    KeyCode::Backspace => edit_field_event(form, self.focus, |mut v| {
                        v.pop();
                        v
                    }),
                    _ => None,
                };
                match event {
                    Some(event) => form.handle(event),
                    None => Vec::new(),
                }
            }
        };
        self.apply_edit_effects(effects);
    }

    fn apply_edit_effects(&mut self, effects: Vec<EditEffect>) {
        for effect in effects {
            match effect {
                EditEffect::SubmitUpdate { wallet, request } => {
                    let backend = Arc::clone(&self.backend);
                    let tx = self.events.sender();
                    tokio::spawn(async move {
                        let event = match backend.update_wallet(&wallet, &request).await {
                            Ok(updated) => TuiEvent::WalletUpdated {
                                original_name: wallet,
                                wallet: updated,
                            },
                            Err(e) => TuiEvent::UpdateFailed(e.to_string()),
                        };
                        let _ = tx.send(event);
                    });
                }
                EditEffect::Removed => {
                    self.edit = None;
                    self.mode = AppMode::Wallets;
                }
                EditEffect::Updated(_) => {
                    // Handled where the original name is known (WalletUpdated).
                }
            }
        }
    }

    /// Explicit cross-store wiring: store changes surface on the status line.
    fn drain_store_events(&mut self) {
        while let Ok(event) = self.store_events.try_recv() {
            match event {
                StoreEvent::WalletAdded(wallet) => {
                    self.status = Some(format!(
                        "Created wallet {} ({})",
                        wallet.name,
                        wallet.address.truncated()
                    ));
                }
                StoreEvent::WalletUpdated(wallet) => {
                    self.status = Some(format!("Updated wallet {}", wallet.name));
                }
                StoreEvent::WalletRemoved(name) => {
                    self.status = Some(format!("Removed wallet {name}"));
                }
                StoreEvent::CurrentWalletChanged(Some(name)) => {
                    self.status = Some(format!("Switched to wallet {name}"));
                }
                StoreEvent::CurrentWalletChanged(None) => {
                    self.status = Some("No wallet selected".to_string());
                }
                StoreEvent::CurrentNetworkChanged(network) => {
                    self.status = Some(format!("Switched to {}", network.name));
                }
                StoreEvent::NetworksChanged => {}
            }
        }
    }

    /// Event sender for tests and background tasks.
    pub fn sender(&self) -> tokio::sync::mpsc::UnboundedSender<TuiEvent> {
        self.events.sender()
    }
}

/// Every wizard step shows two focusable fields.
const FIELDS_PER_STEP: usize = 2;
/// Edit form: name, derivation path, count.
const EDIT_FIELDS: usize = 3;

fn wizard_field_value(wizard: &WalletWizard, focus: usize) -> Option<String> {
    let value = match (wizard.step(), focus) {
        (WizardStep::Mnemonic, 0) => wizard.name(),
        (WizardStep::Mnemonic, 1) => wizard.mnemonic(),
        (WizardStep::Password, 0) => wizard.password(),
        (WizardStep::Password, 1) => wizard.confirmation(),
        (WizardStep::Review, 0) => wizard.derivation_path(),
        _ => return None,
    };
    Some(value.to_string())
}

fn wizard_field_event(step: WizardStep, focus: usize, value: String) -> Option<WizardEvent> {
    match (step, focus) {
        (WizardStep::Mnemonic, 0) => Some(WizardEvent::NameChanged(value)),
        (WizardStep::Mnemonic, 1) => Some(WizardEvent::MnemonicChanged(value)),
        (WizardStep::Password, 0) => Some(WizardEvent::PasswordChanged(value)),
        (WizardStep::Password, 1) => Some(WizardEvent::ConfirmationChanged(value)),
        (WizardStep::Review, 0) => Some(WizardEvent::DerivationPathChanged(value)),
        _ => None,
    }
}

fn edit_field_event(
    form: &EditWalletForm,
    focus: usize,
    change: impl FnOnce(String) -> String,
) -> Option<EditEvent> {
    match focus {
        0 => Some(EditEvent::NameChanged(change(form.name().to_string()))),
        1 => Some(EditEvent::DerivationPathChanged(change(
            form.derivation_path().to_string(),
        ))),
        2 => Some(EditEvent::CountChanged(change(form.count_input().to_string()))),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{MockWalletBackend, PreviewAddress};
    use crate::error::VaultryError;
    use crate::wallet::{Address, HdWallet};
    use chrono::Utc;
    use crossterm::event::KeyModifiers;
    use uuid::Uuid;

    const PHRASE: &str =
        "legal winner thank year wave sausage worth useful legal winner thank yellow";

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::empty())
    }

    fn sample_preview() -> Vec<PreviewAddress> {
        vec![
            PreviewAddress {
                index: "0".to_string(),
                address: Address::new([0xaa; 20]),
            },
            PreviewAddress {
                index: "1".to_string(),
                address: Address::new([0xbb; 20]),
            },
        ]
    }

    fn sample_wallet() -> HdWallet {
        HdWallet {
            id: Uuid::new_v4(),
            name: "Main".to_string(),
            derivation_path: "m/44'/60'/0'/0".to_string(),
            count: 5,
            current: "1".to_string(),
            address: Address::new([0xbb; 20]),
            created_at: Utc::now(),
        }
    }

    fn app_with(backend: MockWalletBackend) -> App {
        let bus = EventBus::default();
        App::new(
            Config::default(),
            Arc::new(backend),
            WalletStore::in_memory(bus.clone()),
            NetworkStore::new(bus.clone()),
            &bus,
        )
    }

    /// Let spawned backend tasks finish, then pump every queued event
    /// through the app.
    async fn pump(app: &mut App) {
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        while let Some(event) = app.events.try_next() {
            app.handle_event(event);
        }
        app.drain_store_events();
    }

    #[tokio::test]
    async fn test_n_opens_wizard() {
        let mut app = app_with(MockWalletBackend::new());
        assert_eq!(app.mode, AppMode::Wallets);
        app.handle_key(key(KeyCode::Char('n')));
        assert_eq!(app.mode, AppMode::Onboarding);
        assert!(app.wizard.is_some());
    }

    #[tokio::test]
    async fn test_escape_cancels_wizard() {
        let mut app = app_with(MockWalletBackend::new());
        app.handle_key(key(KeyCode::Char('n')));
        app.handle_key(key(KeyCode::Esc));
        assert_eq!(app.mode, AppMode::Wallets);
        assert!(app.wizard.is_none());
    }

    #[tokio::test]
    async fn test_typing_reaches_wizard_name_field() {
        let mut app = app_with(MockWalletBackend::new());
        app.handle_key(key(KeyCode::Char('n')));
        app.handle_key(key(KeyCode::Char('M')));
        app.handle_key(key(KeyCode::Char('a')));
        assert_eq!(app.wizard.as_ref().map(|w| w.name()), Some("Ma"));

        app.handle_key(key(KeyCode::Backspace));
        assert_eq!(app.wizard.as_ref().map(|w| w.name()), Some("M"));
    }

    #[tokio::test]
    async fn test_full_onboarding_flow_creates_wallet() {
        let mut backend = MockWalletBackend::new();
        backend
            .expect_derive_preview()
            .returning(|_, _| Ok(sample_preview()));
        backend
            .expect_create_wallet()
            .times(1)
            .returning(|_| Ok(sample_wallet()));
        let mut app = app_with(backend);

        // Step 1: name + mnemonic (pasted).
        app.handle_key(key(KeyCode::Char('n')));
        app.handle_key(key(KeyCode::Char('M')));
        app.handle_key(key(KeyCode::Tab));
        app.handle_paste(PHRASE.to_string());
        app.handle_key(key(KeyCode::Enter)); // -> Password

        // Step 2: password + confirmation.
        for c in "s3cret-enough".chars() {
            app.handle_key(key(KeyCode::Char(c)));
        }
        app.handle_key(key(KeyCode::Tab));
        for c in "s3cret-enough".chars() {
            app.handle_key(key(KeyCode::Char(c)));
        }
        app.handle_key(key(KeyCode::Enter)); // -> Review, preview spawned

        // Let the preview task run, then deliver its event.
        pump(&mut app).await;
        assert_eq!(
            app.wizard.as_ref().map(|w| w.addresses().len()),
            Some(2),
            "preview should have landed"
        );

        // Pick the second address; submission fires exactly once.
        app.handle_key(key(KeyCode::Tab)); // focus address list
        app.handle_key(key(KeyCode::Down));
        app.handle_key(key(KeyCode::Enter)); // pick "1"
        pump(&mut app).await;

        assert_eq!(app.mode, AppMode::Wallets);
        assert!(app.wizard.is_none());
        assert_eq!(app.wallets.len(), 1);
        assert_eq!(
            app.wallets.current().map(|w| w.name.as_str()),
            Some("Main")
        );
    }

    #[tokio::test]
    async fn test_create_failure_keeps_wizard_for_retry() {
        let mut backend = MockWalletBackend::new();
        backend
            .expect_derive_preview()
            .returning(|_, _| Ok(sample_preview()));
        backend
            .expect_create_wallet()
            .times(2)
            .returning(|_| Err(VaultryError::Submission("keystore locked".to_string())));
        let mut app = app_with(backend);

        app.handle_key(key(KeyCode::Char('n')));
        app.handle_key(key(KeyCode::Char('M')));
        app.handle_key(key(KeyCode::Tab));
        app.handle_paste(PHRASE.to_string());
        app.handle_key(key(KeyCode::Enter));
        for c in "s3cret-enough".chars() {
            app.handle_key(key(KeyCode::Char(c)));
        }
        app.handle_key(key(KeyCode::Tab));
        for c in "s3cret-enough".chars() {
            app.handle_key(key(KeyCode::Char(c)));
        }
        app.handle_key(key(KeyCode::Enter));
        pump(&mut app).await;

        app.handle_key(key(KeyCode::Tab));
        app.handle_key(key(KeyCode::Enter)); // pick -> submit #1 fails
        pump(&mut app).await;

        // Wizard survives the failure with its state intact.
        let wizard = app.wizard.as_ref().expect("wizard still alive");
        assert!(!wizard.submitted());
        assert!(wizard.status().is_some());

        // Enter again retries (submit #2, satisfying the mock's times(2)).
        app.handle_key(key(KeyCode::Enter));
        pump(&mut app).await;
    }

    #[tokio::test]
    async fn test_late_preview_after_teardown_is_dropped() {
        let mut app = app_with(MockWalletBackend::new());
        // No wizard exists; a stray preview response must be a no-op.
        app.handle_event(TuiEvent::PreviewReady {
            mnemonic: PHRASE.to_string(),
            derivation_path: "m/44'/60'/0'/0".to_string(),
            addresses: sample_preview(),
        });
        assert!(app.wizard.is_none());
        assert_eq!(app.mode, AppMode::Wallets);
    }

    #[tokio::test]
    async fn test_network_cycling_updates_status() {
        let mut app = app_with(MockWalletBackend::new());
        app.handle_key(key(KeyCode::Tab));
        app.drain_store_events();
        // Default order is Anvil/Mainnet/Sepolia with Mainnet current.
        assert_eq!(app.networks.get_current().name, "Sepolia");
        assert!(app.status.as_deref().is_some_and(|s| s.contains("Sepolia")));
    }

    #[tokio::test]
    async fn test_edit_flow_applies_update() {
        let mut backend = MockWalletBackend::new();
        let mut updated = sample_wallet();
        updated.name = "Renamed".to_string();
        let response = updated.clone();
        backend
            .expect_update_wallet()
            .times(1)
            .returning(move |_, _| Ok(response.clone()));
        let mut app = app_with(backend);
        app.wallets.add(sample_wallet()).expect("seed wallet");

        app.handle_key(key(KeyCode::Char('e')));
        assert_eq!(app.mode, AppMode::Edit);

        // Clear the name ("Main") and type a new one.
        for _ in 0..4 {
            app.handle_key(key(KeyCode::Backspace));
        }
        for c in "Renamed".chars() {
            app.handle_key(key(KeyCode::Char(c)));
        }
        // Submit from the last field.
        app.handle_key(key(KeyCode::Tab));
        app.handle_key(key(KeyCode::Tab));
        app.handle_key(key(KeyCode::Enter));
        pump(&mut app).await;

        assert_eq!(app.mode, AppMode::Wallets);
        assert!(app.wallets.get("Renamed").is_some());
        assert!(app.wallets.get("Main").is_none());
    }
}
