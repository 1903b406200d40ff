//! Hash store abstraction.
//!
//! A hash store maps a top-level key to a single-level dictionary of
//! `field -> bytes`, the shape of a Redis hash. The account repository only
//! talks to this trait, so the backing store can be swapped for tests.

mod memory;
mod redis_store;

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

pub use memory::MemoryHashStore;
pub use redis_store::RedisHashStore;

/// Errors reported by a hash store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Connection could not be established or was lost.
    #[error("connection failed: {0}")]
    Connection(String),

    /// The store did not answer in time.
    #[error("operation timed out after {0:?}")]
    Timeout(Duration),

    /// The store answered with an error.
    #[error("store error: {0}")]
    Backend(String),
}

/// Result type for hash store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Remote hash collection operations.
///
/// Each method is a single round trip. Single-field reads and writes are
/// atomic at the store; nothing else is.
#[async_trait]
pub trait HashStore: Send + Sync {
    /// All values stored under `key` (`HVALS`). Empty if the key is missing.
    async fn values(&self, key: &str) -> StoreResult<Vec<Vec<u8>>>;

    /// Value of one field (`HGET`).
    async fn get(&self, key: &str, field: &str) -> StoreResult<Option<Vec<u8>>>;

    /// Set one field, overwriting any previous value (`HSET`).
    async fn put(&self, key: &str, field: &str, value: Vec<u8>) -> StoreResult<()>;

    /// Set many fields in one request (`HSET key f1 v1 f2 v2 ...`).
    ///
    /// When a field appears more than once the last value wins.
    async fn put_all(&self, key: &str, entries: Vec<(String, Vec<u8>)>) -> StoreResult<()>;

    /// Remove fields (`HDEL`), returning how many existed.
    async fn delete(&self, key: &str, fields: &[String]) -> StoreResult<usize>;
}

#[async_trait]
impl<T: HashStore + ?Sized> HashStore for std::sync::Arc<T> {
    async fn values(&self, key: &str) -> StoreResult<Vec<Vec<u8>>> {
        (**self).values(key).await
    }

    async fn get(&self, key: &str, field: &str) -> StoreResult<Option<Vec<u8>>> {
        (**self).get(key, field).await
    }

    async fn put(&self, key: &str, field: &str, value: Vec<u8>) -> StoreResult<()> {
        (**self).put(key, field, value).await
    }

    async fn put_all(&self, key: &str, entries: Vec<(String, Vec<u8>)>) -> StoreResult<()> {
        (**self).put_all(key, entries).await
    }

    async fn delete(&self, key: &str, fields: &[String]) -> StoreResult<usize> {
        (**self).delete(key, fields).await
    }
}
