//! Redis-backed hash store.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, RedisError, RedisResult};
use tokio::time::timeout;
use tracing::{debug, info};

use super::{HashStore, StoreError, StoreResult};
use crate::config::StoreConfig;
use crate::{Error, Result};

/// Hash store talking to a Redis server.
///
/// Wraps a [`ConnectionManager`], which reconnects on its own after a
/// dropped connection. Every command is bounded by the configured response
/// timeout and is not retried.
#[derive(Clone)]
pub struct RedisHashStore {
    conn: ConnectionManager,
    response_timeout: Duration,
}

impl RedisHashStore {
    /// Connect to the server named in `config`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the URL cannot be parsed and
    /// [`Error::StoreUnavailable`] if the server cannot be reached within the
    /// connect timeout.
    pub async fn connect(config: &StoreConfig) -> Result<Self> {
        config.validate()?;

        let client = redis::Client::open(config.url.as_str())
            .map_err(|e| Error::Config(format!("invalid store URL: {e}")))?;

        let conn = match timeout(config.connect_timeout, ConnectionManager::new(client)).await {
            Ok(Ok(conn)) => conn,
            Ok(Err(e)) => return Err(classify(&e, config.connect_timeout).into()),
            Err(_) => return Err(StoreError::Timeout(config.connect_timeout).into()),
        };

        info!("Connected to account store at {}", config.url);
        Ok(Self::from_manager(conn, config.response_timeout))
    }

    /// Wrap an existing connection manager.
    #[must_use]
    pub const fn from_manager(conn: ConnectionManager, response_timeout: Duration) -> Self {
        Self {
            conn,
            response_timeout,
        }
    }

    async fn timed<T, F>(&self, command: F) -> StoreResult<T>
    where
        F: Future<Output = RedisResult<T>> + Send,
    {
        match timeout(self.response_timeout, command).await {
            Ok(result) => result.map_err(|e| classify(&e, self.response_timeout)),
            Err(_) => Err(StoreError::Timeout(self.response_timeout)),
        }
    }
}

impl std::fmt::Debug for RedisHashStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisHashStore")
            .field("response_timeout", &self.response_timeout)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl HashStore for RedisHashStore {
    async fn values(&self, key: &str) -> StoreResult<Vec<Vec<u8>>> {
        let mut conn = self.conn.clone();
        self.timed(conn.hvals(key)).await
    }

    async fn get(&self, key: &str, field: &str) -> StoreResult<Option<Vec<u8>>> {
        let mut conn = self.conn.clone();
        self.timed(conn.hget(key, field)).await
    }

    async fn put(&self, key: &str, field: &str, value: Vec<u8>) -> StoreResult<()> {
        let mut conn = self.conn.clone();
        self.timed(conn.hset(key, field, value)).await
    }

    async fn put_all(&self, key: &str, entries: Vec<(String, Vec<u8>)>) -> StoreResult<()> {
        // HSET with no field/value pairs is a syntax error
        if entries.is_empty() {
            return Ok(());
        }
        debug!("HSET {key} with {} fields", entries.len());
        let mut conn = self.conn.clone();
        self.timed(conn.hset_multiple(key, entries.as_slice())).await
    }

    async fn delete(&self, key: &str, fields: &[String]) -> StoreResult<usize> {
        if fields.is_empty() {
            return Ok(0);
        }
        let mut conn = self.conn.clone();
        self.timed(conn.hdel(key, fields)).await
    }
}

/// Map a client error onto the store error taxonomy.
fn classify(err: &RedisError, limit: Duration) -> StoreError {
    if err.is_timeout() {
        StoreError::Timeout(limit)
    } else if err.is_connection_refusal() || err.is_connection_dropped() || err.is_io_error() {
        StoreError::Connection(err.to_string())
    } else {
        StoreError::Backend(err.to_string())
    }
}
