//! Error types for the core library.

use thiserror::Error;

use crate::account::ValidationError;
use crate::store::StoreError;

/// Errors that can occur in core operations.
#[derive(Debug, Error)]
pub enum Error {
    /// The backing store could not be reached or did not answer.
    #[error("Store unavailable: {0}")]
    StoreUnavailable(#[from] StoreError),

    /// A stored value could not be decoded, or an account could not be encoded.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The account was rejected before being written.
    #[error("Invalid account: {}", join_messages(.0))]
    Validation(Vec<ValidationError>),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

fn join_messages(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ValidationError::message)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_message_joins_errors() {
        let err = Error::Validation(vec![ValidationError::EmptyId, ValidationError::EmptyId]);
        assert_eq!(
            err.to_string(),
            "Invalid account: Account id is required, Account id is required"
        );
    }

    #[test]
    fn store_error_converts() {
        let err: Error = StoreError::Connection("refused".to_string()).into();
        assert_eq!(err.to_string(), "Store unavailable: connection failed: refused");
    }
}
