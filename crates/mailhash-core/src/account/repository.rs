//! Mail account storage repository.

use async_trait::async_trait;
use tracing::{debug, warn};

use super::model::{MailAccount, MailAccountId};
use super::validation::validate_account;
use crate::store::HashStore;
use crate::{Error, Result};

/// Storage contract for mail accounts.
///
/// All operations address one account collection. Absent entries are not
/// errors: `get` returns `None` and deletes of unknown ids are no-ops.
#[async_trait]
pub trait MailAccountRepository: Send + Sync {
    /// Get all accounts, in no particular order.
    ///
    /// # Errors
    ///
    /// Returns an error if the store is unreachable or a stored value cannot
    /// be decoded.
    async fn list(&self) -> Result<Vec<MailAccount>>;

    /// Get account by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the store is unreachable or the stored value
    /// cannot be decoded.
    async fn get(&self, id: &MailAccountId) -> Result<Option<MailAccount>>;

    /// Insert or overwrite one account.
    ///
    /// # Errors
    ///
    /// Returns an error if the account is invalid or the store is unreachable.
    async fn add(&self, account: &MailAccount) -> Result<()>;

    /// Insert or overwrite many accounts in one request.
    ///
    /// # Errors
    ///
    /// Returns an error if any account is invalid (nothing is written) or
    /// the store is unreachable.
    async fn add_all(&self, accounts: &[MailAccount]) -> Result<()>;

    /// Delete one account.
    ///
    /// # Errors
    ///
    /// Returns an error if the store is unreachable.
    async fn delete(&self, id: &MailAccountId) -> Result<()>;

    /// Delete many accounts in one request.
    ///
    /// # Errors
    ///
    /// Returns an error if the store is unreachable.
    async fn delete_all(&self, ids: &[MailAccountId]) -> Result<()>;
}

/// Read-only view over the stored accounts.
#[async_trait]
pub trait MailAccountLocator: Send + Sync {
    /// All known mail accounts.
    ///
    /// # Errors
    ///
    /// Returns an error if the accounts cannot be loaded.
    async fn mail_accounts(&self) -> Result<Vec<MailAccount>>;
}

#[async_trait]
impl<T: MailAccountRepository + ?Sized> MailAccountLocator for T {
    async fn mail_accounts(&self) -> Result<Vec<MailAccount>> {
        self.list().await
    }
}

/// Repository keeping every account as one JSON-encoded field of a hash.
///
/// The hash key is fixed at construction; the field is the account id.
pub struct HashAccountRepository<S> {
    store: S,
    key: String,
}

impl<S: HashStore> HashAccountRepository<S> {
    /// Create a repository storing accounts under `key` in `store`.
    pub fn new(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    /// The hash key this repository writes to.
    #[must_use]
    pub fn accounts_key(&self) -> &str {
        &self.key
    }

    /// The underlying store.
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    fn decode(&self, bytes: &[u8]) -> Result<MailAccount> {
        serde_json::from_slice(bytes).map_err(|e| {
            warn!("Undecodable account value in {}: {e}", self.key);
            Error::Serialization(e)
        })
    }
}

#[async_trait]
impl<S: HashStore> MailAccountRepository for HashAccountRepository<S> {
    async fn list(&self) -> Result<Vec<MailAccount>> {
        let values = self.store.values(&self.key).await?;
        let accounts = values
            .iter()
            .map(|bytes| self.decode(bytes))
            .collect::<Result<Vec<_>>>()?;
        debug!("Loaded {} mail accounts from {}", accounts.len(), self.key);
        Ok(accounts)
    }

    async fn get(&self, id: &MailAccountId) -> Result<Option<MailAccount>> {
        let value = self.store.get(&self.key, id.as_str()).await?;
        if value.is_none() {
            debug!("Mail account {id} not found in {}", self.key);
        }
        value.as_deref().map(|bytes| self.decode(bytes)).transpose()
    }

    async fn add(&self, account: &MailAccount) -> Result<()> {
        validate_account(account).map_err(Error::Validation)?;
        let value = serde_json::to_vec(account)?;
        self.store.put(&self.key, account.id.as_str(), value).await?;
        debug!("Stored mail account {} in {}", account.id, self.key);
        Ok(())
    }

    async fn add_all(&self, accounts: &[MailAccount]) -> Result<()> {
        if accounts.is_empty() {
            return Ok(());
        }

        // Reject the whole batch before anything reaches the store
        for account in accounts {
            validate_account(account).map_err(Error::Validation)?;
        }

        let entries = accounts
            .iter()
            .map(|account| -> Result<(String, Vec<u8>)> {
                Ok((account.id.to_string(), serde_json::to_vec(account)?))
            })
            .collect::<Result<Vec<_>>>()?;

        self.store.put_all(&self.key, entries).await?;
        debug!("Stored {} mail accounts in {}", accounts.len(), self.key);
        Ok(())
    }

    async fn delete(&self, id: &MailAccountId) -> Result<()> {
        let field = id.to_string();
        let removed = self
            .store
            .delete(&self.key, std::slice::from_ref(&field))
            .await?;
        debug!("Deleted mail account {id} from {} ({removed} removed)", self.key);
        Ok(())
    }

    async fn delete_all(&self, ids: &[MailAccountId]) -> Result<()> {
        if ids.is_empty() {
            return Ok(());
        }
        let fields: Vec<String> = ids.iter().map(ToString::to_string).collect();
        let removed = self.store.delete(&self.key, &fields).await?;
        debug!(
            "Deleted {removed} of {} requested mail accounts from {}",
            fields.len(),
            self.key
        );
        Ok(())
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::redundant_clone,
    clippy::manual_string_new,
    clippy::needless_collect,
    clippy::unreadable_literal,
    clippy::used_underscore_items,
    clippy::similar_names
)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::account::ValidationError;
    use crate::store::{MemoryHashStore, StoreError};

    const KEY: &str = "email::accounts::key";

    fn repo() -> HashAccountRepository<Arc<MemoryHashStore>> {
        HashAccountRepository::new(Arc::new(MemoryHashStore::new()), KEY)
    }

    #[tokio::test]
    async fn test_add_and_get_account() {
        let repo = repo();
        let account = MailAccount::with_email("work", "me@gmail.com");

        repo.add(&account).await.unwrap();

        let retrieved = repo.get(&account.id).await.unwrap();
        assert_eq!(retrieved, Some(account));
    }

    #[tokio::test]
    async fn test_get_missing_is_none() {
        let repo = repo();
        assert!(repo.get(&"nope".into()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_single_account_example() {
        let repo = repo();
        repo.add(&MailAccount::new("1")).await.unwrap();

        let accounts = repo.list().await.unwrap();
        assert_eq!(accounts, vec![MailAccount::new("1")]);

        repo.delete(&"1".into()).await.unwrap();
        assert!(repo.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_add_overwrites_same_id() {
        let repo = repo();
        repo.add(&MailAccount::new("a").with_name("Old")).await.unwrap();
        repo.add(&MailAccount::new("a").with_name("New")).await.unwrap();

        let accounts = repo.list().await.unwrap();
        assert_eq!(accounts.len(), 1);
        assert_eq!(accounts[0].name, "New");
    }

    #[tokio::test]
    async fn test_delete_missing_is_noop() {
        let repo = repo();
        repo.delete(&"ghost".into()).await.unwrap();
        repo.delete_all(&[MailAccountId::from("a"), MailAccountId::from("b")]).await.unwrap();
    }

    #[tokio::test]
    async fn test_empty_id_rejected() {
        let repo = repo();
        let err = repo.add(&MailAccount::new("")).await.unwrap_err();
        assert!(matches!(err, Error::Validation(ref e) if e == &[ValidationError::EmptyId]));
        assert!(repo.store().is_empty(KEY));
    }

    #[tokio::test]
    async fn test_sparse_or_malformed_fields_are_stored_as_is() {
        let repo = repo();

        let mut bad_email = MailAccount::new("1");
        bad_email.email = "not-an-address".to_string();
        let mut no_port = MailAccount::new("2");
        no_port.imap.host = "imap.example.com".to_string();
        no_port.smtp.host = "smtp.example.com".to_string();

        repo.add(&bad_email).await.unwrap();
        repo.add_all(std::slice::from_ref(&no_port)).await.unwrap();

        assert_eq!(repo.get(&bad_email.id).await.unwrap(), Some(bad_email));
        assert_eq!(repo.get(&no_port.id).await.unwrap(), Some(no_port));
    }

    #[tokio::test]
    async fn test_invalid_batch_writes_nothing() {
        let repo = repo();
        let batch = [MailAccount::new("ok"), MailAccount::new(" ")];

        assert!(matches!(
            repo.add_all(&batch).await,
            Err(Error::Validation(_))
        ));
        assert!(repo.store().is_empty(KEY));
    }

    #[tokio::test]
    async fn test_batch_duplicate_last_wins() {
        let repo = repo();
        let batch = [
            MailAccount::new("x").with_name("first"),
            MailAccount::new("x").with_name("second"),
        ];
        repo.add_all(&batch).await.unwrap();

        let stored = repo.get(&"x".into()).await.unwrap().unwrap();
        assert_eq!(stored.name, "second");
    }

    #[tokio::test]
    async fn test_undecodable_value_is_serialization_error() {
        let repo = repo();
        repo.store().raw_put(KEY, "bad", "{not json");

        assert!(matches!(
            repo.get(&"bad".into()).await,
            Err(Error::Serialization(_))
        ));
        assert!(matches!(repo.list().await, Err(Error::Serialization(_))));
    }

    #[tokio::test]
    async fn test_store_failure_propagates() {
        let repo = repo();
        repo.store().set_unavailable(true);

        let err = repo.add(&MailAccount::new("1")).await.unwrap_err();
        assert!(matches!(
            err,
            Error::StoreUnavailable(StoreError::Connection(_))
        ));
        assert!(repo.get(&"1".into()).await.is_err());
        assert!(repo.list().await.is_err());
        assert!(repo.delete(&"1".into()).await.is_err());
    }

    #[tokio::test]
    async fn test_locator_lists_accounts() {
        let repo = repo();
        repo.add_all(&[MailAccount::new("1"), MailAccount::new("2")])
            .await
            .unwrap();

        let locator: &dyn MailAccountLocator = &repo;
        assert_eq!(locator.mail_accounts().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_custom_key_is_isolated() {
        let store = Arc::new(MemoryHashStore::new());
        let a = HashAccountRepository::new(Arc::clone(&store), "tenant-a");
        let b = HashAccountRepository::new(Arc::clone(&store), "tenant-b");

        a.add(&MailAccount::new("1")).await.unwrap();

        assert_eq!(a.accounts_key(), "tenant-a");
        assert!(b.list().await.unwrap().is_empty());
        assert_eq!(store.len("tenant-a"), 1);
    }
}
