//! TUI Event System
//!
//! Handles user input and the results of spawned backend calls. Everything
//! funnels through one mpsc channel so the app loop stays the single thread
//! of control: backend tasks never touch state directly, they only send
//! events back.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tokio::sync::mpsc;

use crate::backend::PreviewAddress;
use crate::wallet::HdWallet;

/// Events that can occur in the TUI
#[derive(Debug, Clone)]
pub enum TuiEvent {
    /// User pressed a key
    Key(KeyEvent),

    /// User pasted text (mnemonics usually arrive this way)
    Paste(String),

    /// Terminal was resized
    Resize(u16, u16),

    /// Tick event for animations/updates
    Tick,

    /// A derivation preview resolved, tagged with the inputs it was
    /// issued for
    PreviewReady {
        mnemonic: String,
        derivation_path: String,
        addresses: Vec<PreviewAddress>,
    },

    /// A derivation preview failed
    PreviewFailed {
        mnemonic: String,
        derivation_path: String,
        reason: String,
    },

    /// The backend confirmed wallet creation
    WalletCreated(HdWallet),

    /// Wallet creation was rejected
    CreateFailed(String),

    /// The backend confirmed a wallet update
    WalletUpdated {
        original_name: String,
        wallet: HdWallet,
    },

    /// Wallet update was rejected
    UpdateFailed(String),

    /// The backend removed a wallet
    WalletRemoved(String),

    /// Wallet removal was rejected
    RemoveFailed(String),

    /// Request to quit
    Quit,
}

/// Event handler for the TUI
pub struct EventHandler {
    /// Event sender
    tx: mpsc::UnboundedSender<TuiEvent>,

    /// Event receiver
    rx: mpsc::UnboundedReceiver<TuiEvent>,
}

impl EventHandler {
    /// Create a new event handler
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self { tx, rx }
    }

    /// Get a sender for sending events
    pub fn sender(&self) -> mpsc::UnboundedSender<TuiEvent> {
        self.tx.clone()
    }

    /// Receive the next event (blocks until available)
    pub async fn next(&mut self) -> Option<TuiEvent> {
        self.rx.recv().await
    }

    /// Try to receive the next event without blocking
    pub fn try_next(&mut self) -> Option<TuiEvent> {
        self.rx.try_recv().ok()
    }

    /// Start listening for terminal events.
    ///
    /// Uses crossterm's async EventStream instead of blocking poll/read so
    /// backend calls in flight never starve the input loop.
    pub fn start_terminal_listener(tx: mpsc::UnboundedSender<TuiEvent>) {
        use crossterm::event::EventStream;
        use futures::StreamExt;

        tokio::spawn(async move {
            let mut reader = EventStream::new();
            let tick_interval = std::time::Duration::from_millis(100);

            loop {
                // Race: next terminal event vs tick timer
                let event = tokio::select! {
                    maybe_event = reader.next() => {
                        match maybe_event {
                            Some(Ok(event)) => Some(event),
                            Some(Err(_)) => None,
                            None => break, // Stream closed
                        }
                    }
                    _ = tokio::time::sleep(tick_interval) => None,
                };

                if let Some(event) = event {
                    let should_break = match event {
                        crossterm::event::Event::Key(key) => {
                            // Only process key press events to avoid duplicates
                            if key.kind == crossterm::event::KeyEventKind::Press {
                                tx.send(TuiEvent::Key(key)).is_err()
                            } else {
                                false
                            }
                        }
                        crossterm::event::Event::Paste(text) => {
                            tx.send(TuiEvent::Paste(text)).is_err()
                        }
                        crossterm::event::Event::Resize(w, h) => {
                            tx.send(TuiEvent::Resize(w, h)).is_err()
                        }
                        _ => false,
                    };
                    if should_break {
                        break;
                    }
                }

                // Send tick event for animations
                if tx.send(TuiEvent::Tick).is_err() {
                    break;
                }
            }
        });
    }
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new()
    }
}

/// Helper function to check if a key event matches
pub fn key_matches(event: &KeyEvent, code: KeyCode, modifiers: KeyModifiers) -> bool {
    event.code == code && event.modifiers == modifiers
}

/// Common key bindings
pub mod keys {
    use super::*;

    /// Ctrl+C - Quit
    pub fn is_quit(event: &KeyEvent) -> bool {
        key_matches(event, KeyCode::Char('c'), KeyModifiers::CONTROL)
    }

    /// Escape - Cancel/Back
    pub fn is_cancel(event: &KeyEvent) -> bool {
        event.code == KeyCode::Esc
    }

    /// Enter - Select/Confirm
    pub fn is_enter(event: &KeyEvent) -> bool {
        event.code == KeyCode::Enter && event.modifiers.is_empty()
    }

    /// Up arrow
    pub fn is_up(event: &KeyEvent) -> bool {
        event.code == KeyCode::Up && event.modifiers.is_empty()
    }

    /// Down arrow
    pub fn is_down(event: &KeyEvent) -> bool {
        event.code == KeyCode::Down && event.modifiers.is_empty()
    }

    /// Tab - next field
    pub fn is_next_field(event: &KeyEvent) -> bool {
        event.code == KeyCode::Tab
    }

    /// Shift+Tab - previous field
    pub fn is_prev_field(event: &KeyEvent) -> bool {
        event.code == KeyCode::BackTab
    }
}
