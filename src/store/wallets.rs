//! Wallet list store.
//!
//! Holds the wallets confirmed by the backend plus the current selection,
//! persisted as a JSON file under the app home. No secrets ever land here:
//! an [`HdWallet`] record carries only names, paths, and addresses.

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{Result, VaultryError};
use crate::store::events::{EventBus, StoreEvent};
use crate::wallet::HdWallet;

/// On-disk shape of the wallet list.
#[derive(Debug, Default, Serialize, Deserialize)]
struct WalletFile {
    wallets: Vec<HdWallet>,
    current: Option<String>,
}

pub struct WalletStore {
    wallets: Vec<HdWallet>,
    /// Name of the active wallet, if any.
    current: Option<String>,
    file: Option<PathBuf>,
    bus: EventBus,
}

impl WalletStore {
    /// In-memory store; nothing is persisted.
    pub fn in_memory(bus: EventBus) -> Self {
        Self {
            wallets: Vec::new(),
            current: None,
            file: None,
            bus,
        }
    }

    /// Load from `path`, starting empty if the file doesn't exist yet.
    pub fn load(path: PathBuf, bus: EventBus) -> Result<Self> {
        let contents: WalletFile = if path.exists() {
            let file = File::open(&path)?;
            serde_json::from_reader(BufReader::new(file))?
        } else {
            WalletFile::default()
        };

        Ok(Self {
            wallets: contents.wallets,
            current: contents.current,
            file: Some(path),
            bus,
        })
    }

    fn save(&self) -> Result<()> {
        let Some(path) = &self.file else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = WalletFile {
            wallets: self.wallets.clone(),
            current: self.current.clone(),
        };
        let json = serde_json::to_string_pretty(&contents)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Add a freshly created wallet. The first wallet becomes current.
    pub fn add(&mut self, wallet: HdWallet) -> Result<()> {
        if self.get(&wallet.name).is_some() {
            return Err(VaultryError::Config(format!(
                "wallet already exists: {}",
                wallet.name
            )));
        }
        if self.current.is_none() {
            self.current = Some(wallet.name.clone());
            self.bus
                .publish(StoreEvent::CurrentWalletChanged(self.current.clone()));
        }
        self.wallets.push(wallet.clone());
        self.save()?;
        self.bus.publish(StoreEvent::WalletAdded(wallet));
        Ok(())
    }

    /// Replace the record that was named `original_name` with the updated
    /// one confirmed by the backend (possibly renamed).
    pub fn apply_update(&mut self, original_name: &str, updated: HdWallet) -> Result<()> {
        let Some(slot) = self.wallets.iter_mut().find(|w| w.name == original_name) else {
            return Err(VaultryError::Config(format!(
                "no such wallet: {original_name}"
            )));
        };
        *slot = updated.clone();
        if self.current.as_deref() == Some(original_name) && original_name != updated.name {
            self.current = Some(updated.name.clone());
            self.bus
                .publish(StoreEvent::CurrentWalletChanged(self.current.clone()));
        }
        self.save()?;
        self.bus.publish(StoreEvent::WalletUpdated(updated));
        Ok(())
    }

    pub fn remove(&mut self, name: &str) -> Result<()> {
        let before = self.wallets.len();
        self.wallets.retain(|w| w.name != name);
        if self.wallets.len() == before {
            return Err(VaultryError::Config(format!("no such wallet: {name}")));
        }
        if self.current.as_deref() == Some(name) {
            self.current = self.wallets.first().map(|w| w.name.clone());
            self.bus
                .publish(StoreEvent::CurrentWalletChanged(self.current.clone()));
        }
        self.save()?;
        self.bus.publish(StoreEvent::WalletRemoved(name.to_string()));
        Ok(())
    }

    pub fn set_current(&mut self, name: &str) -> Result<()> {
        if self.get(name).is_none() {
            return Err(VaultryError::Config(format!("no such wallet: {name}")));
        }
        if self.current.as_deref() == Some(name) {
            return Ok(());
        }
        self.current = Some(name.to_string());
        self.save()?;
        self.bus
            .publish(StoreEvent::CurrentWalletChanged(self.current.clone()));
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&HdWallet> {
        self.wallets.iter().find(|w| w.name == name)
    }

    pub fn all(&self) -> &[HdWallet] {
        &self.wallets
    }

    pub fn current(&self) -> Option<&HdWallet> {
        self.current.as_deref().and_then(|name| self.get(name))
    }

    pub fn is_empty(&self) -> bool {
        self.wallets.is_empty()
    }

    pub fn len(&self) -> usize {
        self.wallets.len()
    }
}
