//! Password strength policy for wallet encryption passwords.

use crate::error::{Field, FieldError};

/// Minimum-strength policy applied at the wizard's password step.
#[derive(Debug, Clone, Copy)]
pub struct PasswordPolicy {
    pub min_len: usize,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self { min_len: 8 }
    }
}

impl PasswordPolicy {
    /// Check a password against the policy and its confirmation value.
    pub fn check(&self, password: &str, confirmation: &str) -> Result<(), FieldError> {
        if password.is_empty() {
            return Err(FieldError::new(Field::Password, "cannot be empty"));
        }
        if password.chars().count() < self.min_len {
            return Err(FieldError::new(
                Field::Password,
                format!("must be at least {} characters", self.min_len),
            ));
        }
        if password != confirmation {
            return Err(FieldError::new(Field::Confirmation, "does not match"));
        }
        Ok(())
    }
}
