//! Network list store.

use serde::{Deserialize, Serialize};

use crate::error::{Result, VaultryError};
use crate::store::events::{EventBus, StoreEvent};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Network {
    pub name: String,
    pub chain_id: u32,
    pub explorer_url: Option<String>,
    pub http_url: String,
    pub currency: String,
    pub decimals: u32,
}

impl Network {
    pub fn mainnet() -> Self {
        Self {
            name: String::from("Mainnet"),
            chain_id: 1,
            explorer_url: Some(String::from("https://etherscan.io/search?q=")),
            http_url: String::from("https://eth.llamarpc.com"),
            currency: String::from("ETH"),
            decimals: 18,
        }
    }

    pub fn sepolia() -> Self {
        Self {
            name: String::from("Sepolia"),
            chain_id: 11155111,
            explorer_url: Some(String::from("https://sepolia.etherscan.io/search?q=")),
            http_url: String::from("https://ethereum-sepolia-rpc.publicnode.com"),
            currency: String::from("ETH"),
            decimals: 18,
        }
    }

    pub fn anvil() -> Self {
        Self {
            name: String::from("Anvil"),
            chain_id: 31337,
            explorer_url: None,
            http_url: String::from("http://localhost:8545"),
            currency: String::from("ETH"),
            decimals: 18,
        }
    }

    pub fn all_default() -> Vec<Self> {
        vec![Self::anvil(), Self::mainnet(), Self::sepolia()]
    }

    pub fn chain_id_hex(&self) -> String {
        format!("0x{:x}", self.chain_id)
    }
}

impl std::fmt::Display for Network {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.chain_id, self.name)
    }
}

/// Owned network list plus the active selection.
pub struct NetworkStore {
    networks: Vec<Network>,
    current: String,
    bus: EventBus,
}

impl NetworkStore {
    pub fn new(bus: EventBus) -> Self {
        let networks = Network::all_default();
        Self {
            current: String::from("Mainnet"),
            networks,
            bus,
        }
    }

    pub fn all(&self) -> &[Network] {
        &self.networks
    }

    pub fn get(&self, name: &str) -> Option<&Network> {
        self.networks.iter().find(|n| n.name == name)
    }

    pub fn get_current(&self) -> &Network {
        // `current` is kept pointing at an existing entry by every mutator.
        self.get(&self.current)
            .or_else(|| self.networks.first())
            .expect("network store must not be empty")
    }

    pub fn set_current_by_name(&mut self, name: &str) -> Result<()> {
        if self.get(name).is_none() {
            return Err(VaultryError::Config(format!("no such network: {name}")));
        }
        if self.current == name {
            return Ok(());
        }
        self.current = name.to_string();
        self.bus
            .publish(StoreEvent::CurrentNetworkChanged(self.get_current().clone()));
        Ok(())
    }

    pub fn add_network(&mut self, network: Network) -> Result<()> {
        if self.get(&network.name).is_some() {
            return Err(VaultryError::Config(format!(
                "network already exists: {}",
                network.name
            )));
        }
        self.networks.push(network);
        self.bus.publish(StoreEvent::NetworksChanged);
        Ok(())
    }

    pub fn remove_network(&mut self, name: &str) -> Result<()> {
        if self.current == name {
            return Err(VaultryError::Config(
                "cannot remove the current network".to_string(),
            ));
        }
        let before = self.networks.len();
        self.networks.retain(|n| n.name != name);
        if self.networks.len() == before {
            return Err(VaultryError::Config(format!("no such network: {name}")));
        }
        self.bus.publish(StoreEvent::NetworksChanged);
        Ok(())
    }
}
