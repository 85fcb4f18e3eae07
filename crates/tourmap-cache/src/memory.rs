//! In-memory cache backend.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tourmap_core::{CacheBackend, Result, TourError};
use tracing::{debug, instrument};

/// Simple in-memory backend for testing and development.
///
/// Data is stored in a `RwLock`-protected `HashMap` and is lost when the
/// backend is dropped. An optional quota caps the total size of stored values
/// in bytes; writes beyond it fail with [`TourError::CacheFull`].
#[derive(Debug, Default)]
pub struct InMemoryCache {
    entries: RwLock<HashMap<String, String>>,
    quota_bytes: Option<usize>,
}

impl InMemoryCache {
    /// Create a new empty in-memory backend without a size limit.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new empty in-memory backend holding at most `quota_bytes` of values.
    #[must_use]
    pub fn with_quota(quota_bytes: usize) -> Self {
        Self {
            entries: RwLock::default(),
            quota_bytes: Some(quota_bytes),
        }
    }
}

#[async_trait]
impl CacheBackend for InMemoryCache {
    fn name(&self) -> &str {
        "memory"
    }

    async fn read(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    #[instrument(skip(self, value), fields(bytes = value.len()))]
    async fn write(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.entries.write().await;

        if let Some(quota) = self.quota_bytes {
            let others: usize = entries
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(_, v)| v.len())
                .sum();
            let needed = others + value.len();
            if needed > quota {
                return Err(TourError::CacheFull { needed, quota });
            }
        }

        entries.insert(key.to_string(), value.to_string());
        debug!("Stored cache value");
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<bool> {
        Ok(self.entries.write().await.remove(key).is_some())
    }

    async fn keys(&self, prefix: &str) -> Result<Vec<String>> {
        let entries = self.entries.read().await;
        Ok(entries
            .keys()
            .filter(|k| k.starts_with(prefix))
            .cloned()
            .collect())
    }
}
