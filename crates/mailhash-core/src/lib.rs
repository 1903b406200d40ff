//! # mailhash-core
//!
//! Mail account storage backed by a Redis hash.
//!
//! This crate provides:
//! - The [`MailAccount`] model and its JSON encoding
//! - Write-time account validation
//! - The [`MailAccountRepository`] contract
//! - [`HashAccountRepository`], which keeps every account as one field of a
//!   single hash
//! - Hash store adapters for Redis and for in-process use
//!
//! ## Example
//!
//! ```no_run
//! use mailhash_core::{
//!     HashAccountRepository, MailAccount, MailAccountRepository, RedisHashStore, StoreConfig,
//! };
//!
//! # async fn run() -> mailhash_core::Result<()> {
//! let config = StoreConfig::default();
//! let store = RedisHashStore::connect(&config).await?;
//! let repo = HashAccountRepository::new(store, config.accounts_key.clone());
//!
//! repo.add(&MailAccount::new("1")).await?;
//! let accounts = repo.list().await?;
//! assert!(!accounts.is_empty());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod account;
pub mod config;
mod error;
pub mod store;

pub use account::{
    HashAccountRepository, ImapConfig, MailAccount, MailAccountId, MailAccountLocator,
    MailAccountRepository, Security, SmtpConfig, ValidationError, ValidationResult,
    validate_account,
};
pub use config::{DEFAULT_ACCOUNTS_KEY, StoreConfig, StoreConfigBuilder};
pub use error::{Error, Result};
pub use store::{HashStore, MemoryHashStore, RedisHashStore, StoreError, StoreResult};
