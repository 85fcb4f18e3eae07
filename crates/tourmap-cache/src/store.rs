//! Expiry and eviction policy over a [`CacheBackend`].
//!
//! Entries live for [`CACHE_TTL`] from the moment they were written. Expired
//! entries are removed lazily when read. When a backend rejects a write for
//! capacity, the oldest half of the entries is evicted (only once there are
//! more than [`EVICTION_THRESHOLD`] of them) and the write is retried once.
//!
//! Cache failures never surface as errors from [`CacheStore::get`] or
//! [`CacheStore::put`]: a broken cache only means more upstream fetches.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::Mutex;
use tourmap_core::{BusinessRecord, CACHE_NAMESPACE, CacheBackend, CacheEnvelope, Result};
use tracing::{debug, info, instrument, warn};

/// How long a cached result stays valid.
pub const CACHE_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Entry count above which capacity eviction removes anything.
pub const EVICTION_THRESHOLD: usize = 20;

/// Outcome of [`CacheStore::put`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CacheWrite {
    /// The entry was written.
    Stored,
    /// The backend was full; older entries were evicted and the retry succeeded.
    StoredAfterEviction,
    /// The entry could not be written; a later lookup will miss.
    Dropped,
}

impl CacheWrite {
    /// Returns true if the write did not go through cleanly.
    #[must_use]
    pub const fn is_degraded(&self) -> bool {
        !matches!(self, Self::Stored)
    }
}

/// Snapshot of cache contents and lookup counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Number of entries under the cache namespace.
    pub entries: usize,
    /// Sum of stored value sizes in bytes.
    pub total_bytes: usize,
    /// Lookups answered from the cache since this store was created.
    pub hits: u64,
    /// Lookups that found nothing usable since this store was created.
    pub misses: u64,
}

impl CacheStats {
    /// Hit rate as a rounded percentage; 0 when there were no lookups.
    #[must_use]
    pub fn hit_rate(&self) -> u8 {
        let lookups = self.hits + self.misses;
        if lookups == 0 {
            return 0;
        }
        ((self.hits as f64 / lookups as f64) * 100.0).round() as u8
    }
}

#[derive(Serialize)]
struct EnvelopeRef<'a> {
    data: &'a [BusinessRecord],
    timestamp: i64,
}

#[derive(Deserialize)]
struct StoredAt {
    timestamp: i64,
}

/// Listing cache with TTL expiry, capacity eviction and hit/miss counters.
///
/// Mutating operations are serialized so an eviction pass cannot interleave
/// with a write to the same backend.
#[derive(Debug)]
pub struct CacheStore {
    backend: Arc<dyn CacheBackend>,
    hits: AtomicU64,
    misses: AtomicU64,
    lock: Mutex<()>,
}

impl CacheStore {
    /// Create a store over `backend`.
    #[must_use]
    pub fn new(backend: Arc<dyn CacheBackend>) -> Self {
        Self {
            backend,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            lock: Mutex::new(()),
        }
    }

    /// Returns the name of the underlying backend.
    #[must_use]
    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }

    /// Looks up `key`, counting a hit or a miss.
    ///
    /// Returns the cached records iff an entry exists and is no older than
    /// [`CACHE_TTL`]. Expired or unreadable entries are deleted.
    pub async fn get(&self, key: &str) -> Option<Vec<BusinessRecord>> {
        self.get_at(key, Utc::now()).await
    }

    /// Looks up `key` as of `now`.
    #[instrument(skip(self, now))]
    pub async fn get_at(&self, key: &str, now: DateTime<Utc>) -> Option<Vec<BusinessRecord>> {
        let _guard = self.lock.lock().await;

        let raw = match self.backend.read(key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!("Cache miss");
                self.misses.fetch_add(1, Ordering::Relaxed);
                return None;
            }
            Err(e) => {
                warn!(error = %e, "Cache read failed, treating as miss");
                self.misses.fetch_add(1, Ordering::Relaxed);
                return None;
            }
        };

        let envelope: CacheEnvelope = match serde_json::from_str(&raw) {
            Ok(envelope) => envelope,
            Err(e) => {
                warn!(error = %e, "Discarding malformed cache entry");
                self.discard(key).await;
                self.misses.fetch_add(1, Ordering::Relaxed);
                return None;
            }
        };

        let age_ms = now.timestamp_millis() - envelope.timestamp;
        if age_ms > ttl_millis() {
            debug!(age_ms, "Cache entry expired");
            self.discard(key).await;
            self.misses.fetch_add(1, Ordering::Relaxed);
            return None;
        }

        debug!(records = envelope.data.len(), "Cache hit");
        self.hits.fetch_add(1, Ordering::Relaxed);
        Some(envelope.data)
    }

    /// Stores `records` under `key` with the current time.
    pub async fn put(&self, key: &str, records: &[BusinessRecord]) -> CacheWrite {
        self.put_at(key, records, Utc::now()).await
    }

    /// Stores `records` under `key`, stamped with `now`.
    ///
    /// On a capacity rejection, runs [`Self::evict_oldest`] and retries once.
    #[instrument(skip(self, records, now), fields(count = records.len()))]
    pub async fn put_at(
        &self,
        key: &str,
        records: &[BusinessRecord],
        now: DateTime<Utc>,
    ) -> CacheWrite {
        let envelope = EnvelopeRef {
            data: records,
            timestamp: now.timestamp_millis(),
        };
        let value = match serde_json::to_string(&envelope) {
            Ok(value) => value,
            Err(e) => {
                warn!(error = %e, "Failed to serialize cache entry");
                return CacheWrite::Dropped;
            }
        };

        let _guard = self.lock.lock().await;

        match self.backend.write(key, &value).await {
            Ok(()) => {
                debug!(bytes = value.len(), "Cached listing result");
                CacheWrite::Stored
            }
            Err(e) if e.is_cache_full() => {
                warn!(error = %e, "Cache full, evicting oldest entries");
                if let Err(e) = self.evict_oldest_locked().await {
                    warn!(error = %e, "Cache eviction failed");
                }
                match self.backend.write(key, &value).await {
                    Ok(()) => CacheWrite::StoredAfterEviction,
                    Err(e) => {
                        warn!(error = %e, "Cache write dropped after eviction");
                        CacheWrite::Dropped
                    }
                }
            }
            Err(e) => {
                warn!(error = %e, "Cache write dropped");
                CacheWrite::Dropped
            }
        }
    }

    /// Deletes the oldest half of the entries if there are more than
    /// [`EVICTION_THRESHOLD`]; otherwise does nothing.
    ///
    /// Age is write time, not access time. Returns the number of entries removed.
    ///
    /// # Errors
    /// Returns an error if the backend cannot list, read or delete entries.
    #[instrument(skip(self))]
    pub async fn evict_oldest(&self) -> Result<usize> {
        let _guard = self.lock.lock().await;
        self.evict_oldest_locked().await
    }

    async fn evict_oldest_locked(&self) -> Result<usize> {
        let keys = self.backend.keys(CACHE_NAMESPACE).await?;
        if keys.len() <= EVICTION_THRESHOLD {
            return Ok(0);
        }

        let mut entries = Vec::with_capacity(keys.len());
        for key in keys {
            if let Some(raw) = self.backend.read(&key).await? {
                // Unreadable entries sort first, so they go before anything valid.
                let stored_at = serde_json::from_str::<StoredAt>(&raw)
                    .map(|s| s.timestamp)
                    .unwrap_or(0);
                entries.push((stored_at, key));
            }
        }

        if entries.len() <= EVICTION_THRESHOLD {
            return Ok(0);
        }

        entries.sort();
        let to_remove = entries.len() / 2;
        let mut removed = 0;
        for (_, key) in entries.into_iter().take(to_remove) {
            if self.backend.remove(&key).await? {
                removed += 1;
            }
        }

        info!(removed, "Evicted oldest cache entries");
        Ok(removed)
    }

    /// Deletes every entry under the cache namespace.
    ///
    /// Returns the number of entries deleted. Data outside the namespace is
    /// left alone.
    ///
    /// # Errors
    /// Returns an error if the backend cannot list or delete entries.
    #[instrument(skip(self))]
    pub async fn clear_all(&self) -> Result<usize> {
        let _guard = self.lock.lock().await;

        let mut removed = 0;
        for key in self.backend.keys(CACHE_NAMESPACE).await? {
            if self.backend.remove(&key).await? {
                removed += 1;
            }
        }

        info!(removed, "Cleared cache");
        Ok(removed)
    }

    /// Returns entry count, stored size and lookup counters.
    ///
    /// # Errors
    /// Returns an error if the backend cannot list or read entries.
    pub async fn stats(&self) -> Result<CacheStats> {
        let keys = self.backend.keys(CACHE_NAMESPACE).await?;
        let mut total_bytes = 0;
        for key in &keys {
            if let Some(raw) = self.backend.read(key).await? {
                total_bytes += raw.len();
            }
        }

        Ok(CacheStats {
            entries: keys.len(),
            total_bytes,
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        })
    }

    async fn discard(&self, key: &str) {
        if let Err(e) = self.backend.remove(key).await {
            warn!(error = %e, "Failed to remove cache entry");
        }
    }
}

fn ttl_millis() -> i64 {
    i64::try_from(CACHE_TTL.as_millis()).unwrap_or(i64::MAX)
}
