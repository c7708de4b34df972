//! Owned state containers.
//!
//! Application state (wallet list, network list) lives in explicit stores
//! owned by the app, not in global singletons. Every mutation goes through a
//! store method, and stores announce changes on a typed event bus; anything
//! that needs to react subscribes explicitly, which keeps cross-store wiring
//! auditable.

pub mod events;
pub mod networks;
pub mod wallets;

pub use events::{EventBus, StoreEvent};
pub use networks::{Network, NetworkStore};
pub use wallets::WalletStore;
