//! BIP-32 derivation path parsing and validation.
//!
//! Paths look like `m/44'/60'/0'/0`: a literal `m` followed by slash-separated
//! child indices, each optionally hardened with a trailing apostrophe.

use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{Field, FieldError};

/// Default path template for new HD wallets (Ethereum account 0, external
/// chain). The wizard appends the address index per derived account.
pub const DEFAULT_DERIVATION_PATH: &str = "m/44'/60'/0'/0";

/// Hardened child indices live at or above 2^31.
const HARDENED_OFFSET: u32 = 0x8000_0000;

static PATH_GRAMMAR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^m(/\d+'?)+$").expect("path grammar regex is valid"));

/// One level in a derivation path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChildIndex {
    pub index: u32,
    pub hardened: bool,
}

impl fmt::Display for ChildIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.hardened {
            write!(f, "{}'", self.index)
        } else {
            write!(f, "{}", self.index)
        }
    }
}

/// A validated BIP-32 derivation path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DerivationPath {
    components: Vec<ChildIndex>,
}

impl DerivationPath {
    /// Parse and validate a path string.
    ///
    /// The grammar check runs first so error messages distinguish shape
    /// problems from out-of-range indices.
    pub fn parse(path: &str) -> Result<Self, FieldError> {
        let path = path.trim();
        if !PATH_GRAMMAR.is_match(path) {
            return Err(FieldError::new(
                Field::DerivationPath,
                format!("expected a path like {DEFAULT_DERIVATION_PATH}"),
            ));
        }

        let mut components = Vec::new();
        for raw in path[2..].split('/') {
            let (digits, hardened) = match raw.strip_suffix('\'') {
                Some(digits) => (digits, true),
                None => (raw, false),
            };
            let index: u32 = digits.parse().map_err(|_| {
                FieldError::new(Field::DerivationPath, format!("index too large: {digits}"))
            })?;
            if index >= HARDENED_OFFSET {
                return Err(FieldError::new(
                    Field::DerivationPath,
                    format!("index must be below 2^31: {index}"),
                ));
            }
            components.push(ChildIndex { index, hardened });
        }

        Ok(Self { components })
    }

    pub fn components(&self) -> &[ChildIndex] {
        &self.components
    }

    pub fn depth(&self) -> usize {
        self.components.len()
    }

    pub fn has_hardened(&self) -> bool {
        self.components.iter().any(|c| c.hardened)
    }
}

impl fmt::Display for DerivationPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "m")?;
        for component in &self.components {
            write!(f, "/{component}")?;
        }
        Ok(())
    }
}

impl FromStr for DerivationPath {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Default for DerivationPath {
    fn default() -> Self {
        Self::parse(DEFAULT_DERIVATION_PATH).expect("default path is valid")
    }
}
