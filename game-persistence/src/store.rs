use anyhow::Result;
use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Durable byte storage keyed by string.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;
    async fn set(&self, key: &str, value: Vec<u8>) -> Result<()>;
}

/// Volatile store, used by tests and when no database is configured.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: Vec<u8>) -> Result<()> {
        self.entries.write().await.insert(key.to_string(), value);
        Ok(())
    }
}

/// Read a JSON value, falling back to `T::default()` when the key is
/// missing, unreadable or corrupt.
pub async fn load_json_or_default<T>(store: &dyn KeyValueStore, key: &str) -> T
where
    T: DeserializeOwned + Default,
{
    match store.get(key).await {
        Ok(Some(bytes)) => match serde_json::from_slice(&bytes) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!("Discarding corrupt value for {}: {}", key, e);
                T::default()
            }
        },
        Ok(None) => T::default(),
        Err(e) => {
            tracing::warn!("Failed to load {}: {}", key, e);
            T::default()
        }
    }
}

/// Write a JSON value, retrying once before giving up.
pub async fn save_json<T: Serialize>(store: &dyn KeyValueStore, key: &str, value: &T) -> Result<()> {
    let bytes = serde_json::to_vec(value)?;

    if let Err(e) = store.set(key, bytes.clone()).await {
        tracing::warn!("Saving {} failed, retrying: {}", key, e);
        store.set(key, bytes).await?;
    }
    Ok(())
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    /// Store whose writes fail until `recover()` is called.
    #[derive(Default)]
    pub struct FailingStore {
        inner: MemoryStore,
        healthy: AtomicBool,
        pub failed_writes: AtomicUsize,
    }

    impl FailingStore {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn recover(&self) {
            self.healthy.store(true, Ordering::SeqCst);
        }

        pub async fn stored(&self, key: &str) -> Option<Vec<u8>> {
            self.inner.get(key).await.unwrap()
        }
    }

    #[async_trait]
    impl KeyValueStore for FailingStore {
        async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
            self.inner.get(key).await
        }

        async fn set(&self, key: &str, value: Vec<u8>) -> Result<()> {
            if !self.healthy.load(Ordering::SeqCst) {
                self.failed_writes.fetch_add(1, Ordering::SeqCst);
                anyhow::bail!("disk unavailable");
            }
            self.inner.set(key, value).await
        }
    }
}
