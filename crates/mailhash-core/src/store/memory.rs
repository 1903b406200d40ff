//! In-process hash store.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use parking_lot::RwLock;

use super::{HashStore, StoreError, StoreResult};

type Hash = HashMap<String, Vec<u8>>;

/// Hash store kept in memory, with the same semantics as the Redis hash
/// commands.
///
/// Intended for tests and local demos. [`set_unavailable`](Self::set_unavailable)
/// turns every call into a connection failure.
#[derive(Debug, Default)]
pub struct MemoryHashStore {
    data: RwLock<HashMap<String, Hash>>,
    unavailable: AtomicBool,
}

impl MemoryHashStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call fail (or succeed again).
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Write bytes to a field without going through the repository.
    pub fn raw_put(&self, key: &str, field: &str, value: impl Into<Vec<u8>>) {
        self.data
            .write()
            .entry(key.to_string())
            .or_default()
            .insert(field.to_string(), value.into());
    }

    /// Number of fields stored under `key`.
    #[must_use]
    pub fn len(&self, key: &str) -> usize {
        self.data.read().get(key).map_or(0, HashMap::len)
    }

    /// Whether nothing is stored under `key`.
    #[must_use]
    pub fn is_empty(&self, key: &str) -> bool {
        self.len(key) == 0
    }

    fn check_available(&self) -> StoreResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            Err(StoreError::Connection("store marked unavailable".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl HashStore for MemoryHashStore {
    async fn values(&self, key: &str) -> StoreResult<Vec<Vec<u8>>> {
        self.check_available()?;
        let data = self.data.read();
        Ok(data
            .get(key)
            .map(|hash| hash.values().cloned().collect())
            .unwrap_or_default())
    }

    async fn get(&self, key: &str, field: &str) -> StoreResult<Option<Vec<u8>>> {
        self.check_available()?;
        let data = self.data.read();
        Ok(data.get(key).and_then(|hash| hash.get(field)).cloned())
    }

    async fn put(&self, key: &str, field: &str, value: Vec<u8>) -> StoreResult<()> {
        self.check_available()?;
        self.data
            .write()
            .entry(key.to_string())
            .or_default()
            .insert(field.to_string(), value);
        Ok(())
    }

    async fn put_all(&self, key: &str, entries: Vec<(String, Vec<u8>)>) -> StoreResult<()> {
        self.check_available()?;
        let mut data = self.data.write();
        let hash = data.entry(key.to_string()).or_default();
        hash.extend(entries);
        Ok(())
    }

    async fn delete(&self, key: &str, fields: &[String]) -> StoreResult<usize> {
        self.check_available()?;
        let mut data = self.data.write();
        let Some(hash) = data.get_mut(key) else {
            return Ok(0);
        };
        let removed = fields.iter().filter(|f| hash.remove(*f).is_some()).count();
        // Redis drops a hash once its last field is gone
        if hash.is_empty() {
            data.remove(key);
        }
        Ok(removed)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const KEY: &str = "test::hash";

    #[tokio::test]
    async fn put_and_get() {
        let store = MemoryHashStore::new();
        store.put(KEY, "a", b"1".to_vec()).await.unwrap();

        assert_eq!(store.get(KEY, "a").await.unwrap(), Some(b"1".to_vec()));
        assert_eq!(store.get(KEY, "b").await.unwrap(), None);
        assert_eq!(store.get("other", "a").await.unwrap(), None);
    }

    #[tokio::test]
    async fn put_all_last_duplicate_wins() {
        let store = MemoryHashStore::new();
        store
            .put_all(
                KEY,
                vec![
                    ("a".to_string(), b"first".to_vec()),
                    ("b".to_string(), b"b".to_vec()),
                    ("a".to_string(), b"second".to_vec()),
                ],
            )
            .await
            .unwrap();

        assert_eq!(store.len(KEY), 2);
        assert_eq!(store.get(KEY, "a").await.unwrap(), Some(b"second".to_vec()));
    }

    #[tokio::test]
    async fn delete_counts_existing_fields() {
        let store = MemoryHashStore::new();
        store.raw_put(KEY, "a", "1");
        store.raw_put(KEY, "b", "2");

        let removed = store
            .delete(KEY, &["a".to_string(), "missing".to_string()])
            .await
            .unwrap();
        assert_eq!(removed, 1);
        assert_eq!(store.len(KEY), 1);

        assert_eq!(store.delete("absent", &["a".to_string()]).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn last_delete_drops_key() {
        let store = MemoryHashStore::new();
        store.raw_put(KEY, "a", "1");
        store.delete(KEY, &["a".to_string()]).await.unwrap();

        assert!(store.is_empty(KEY));
        assert!(store.values(KEY).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn unavailable_fails_every_call() {
        let store = MemoryHashStore::new();
        store.set_unavailable(true);

        assert!(matches!(
            store.values(KEY).await,
            Err(StoreError::Connection(_))
        ));
        assert!(store.put(KEY, "a", Vec::new()).await.is_err());

        store.set_unavailable(false);
        assert!(store.values(KEY).await.unwrap().is_empty());
    }
}
