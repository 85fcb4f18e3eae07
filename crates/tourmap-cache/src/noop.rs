//! No-op cache backend.

use async_trait::async_trait;
use tourmap_core::{CacheBackend, Result};
use tracing::trace;

/// A no-op backend that doesn't store anything.
///
/// Reads always return `Ok(None)` and writes always succeed.
/// Useful for disabling caching or testing code paths without cache hits.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopCache;

impl NoopCache {
    /// Create a new no-op backend.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CacheBackend for NoopCache {
    fn name(&self) -> &str {
        "noop"
    }

    async fn read(&self, _key: &str) -> Result<Option<String>> {
        trace!("NoopCache: read called, returning None");
        Ok(None)
    }

    async fn write(&self, _key: &str, _value: &str) -> Result<()> {
        trace!("NoopCache: write called, doing nothing");
        Ok(())
    }

    async fn remove(&self, _key: &str) -> Result<bool> {
        Ok(false)
    }

    async fn keys(&self, _prefix: &str) -> Result<Vec<String>> {
        Ok(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CacheStore, CacheWrite};
    use std::sync::Arc;
    use tourmap_core::{BusinessRecord, Category};

    #[tokio::test]
    async fn test_noop_cache_never_hits() {
        let store = CacheStore::new(Arc::new(NoopCache::new()));
        let records = vec![BusinessRecord::new(1, Category::Restaurant)];

        assert_eq!(store.put("map_cache_x", &records).await, CacheWrite::Stored);
        assert!(store.get("map_cache_x").await.is_none());

        let stats = store.stats().await.unwrap();
        assert_eq!(stats.entries, 0);
        assert_eq!(stats.misses, 1);
        assert_eq!(store.clear_all().await.unwrap(), 0);
    }

    #[test]
    fn test_noop_cache_is_copy() {
        let cache1 = NoopCache::new();
        let cache2 = cache1; // Copy
        let _cache3 = cache2; // Still works because Copy
    }
}
