//! Mail account module.
//!
//! Provides the account model, validation, and the repository contract with
//! its hash-backed implementation.

mod model;
mod repository;
mod validation;

pub use model::{ImapConfig, MailAccount, MailAccountId, Security, SmtpConfig};
pub use repository::{HashAccountRepository, MailAccountLocator, MailAccountRepository};
pub use validation::{ValidationError, ValidationResult, validate_account};
