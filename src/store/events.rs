//! Typed store-change event bus.

use tokio::sync::broadcast;

use crate::store::networks::Network;
use crate::wallet::HdWallet;

/// Topics published by the state stores.
#[derive(Debug, Clone)]
pub enum StoreEvent {
    WalletAdded(HdWallet),
    WalletUpdated(HdWallet),
    WalletRemoved(String),
    CurrentWalletChanged(Option<String>),
    NetworksChanged,
    CurrentNetworkChanged(Network),
}

/// Broadcast bus the stores publish on. Cloning is cheap; all clones share
/// the same channel.
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<StoreEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Publish a change. Having no subscribers is fine.
    pub fn publish(&self, event: StoreEvent) {
        tracing::trace!(?event, "store event");
        let _ = self.tx.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.tx.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(64)
    }
}
