//! Account validation.
//!
//! Only the identifier is checked: it becomes the hash field name, so an
//! account without one cannot be stored. Every other field is written as-is.

use super::model::MailAccount;

/// Validation error for a mail account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Account identifier is empty or whitespace only.
    EmptyId,
}

impl ValidationError {
    /// Get human-readable error message.
    #[must_use]
    pub const fn message(&self) -> &'static str {
        match self {
            Self::EmptyId => "Account id is required",
        }
    }

    /// Get the field name this error relates to.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::EmptyId => "id",
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ValidationError {}

/// Result of validating an account.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// Validate a mail account before it is written.
///
/// Returns `Ok(())` if valid, or `Err(Vec<ValidationError>)` with all errors.
///
/// # Errors
///
/// Returns a vector of `ValidationError` if the account cannot be stored.
pub fn validate_account(account: &MailAccount) -> ValidationResult {
    let mut errors = Vec::new();

    if account.id.is_blank() {
        errors.push(ValidationError::EmptyId);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
