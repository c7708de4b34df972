//! Wallet domain types and validation contracts.
//!
//! Field constraints here are authoritative regardless of how a backend
//! serializes them: address count 1..=100, non-empty names, BIP-39 word
//! counts, and the `m/44'/...` path grammar.

pub mod address;
pub mod hdpath;
pub mod mnemonic;
pub mod password;
pub mod requests;
pub mod secret;

pub use address::Address;
pub use hdpath::{DerivationPath, DEFAULT_DERIVATION_PATH};
pub use mnemonic::StructuralValidator;
pub use password::PasswordPolicy;
pub use requests::{HdWallet, WalletCreateRequest, WalletUpdateRequest, MAX_ADDRESS_COUNT};
pub use secret::Secret;
