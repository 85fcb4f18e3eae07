//! Storage seam for cached listing results.
//!
//! This module defines the [`CacheBackend`] trait, a namespaced string
//! key-value store, and [`CacheEnvelope`], the value layout written into it.
//! Expiry and eviction policy live above this seam, in `tourmap-cache`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

use crate::{error::Result, types::BusinessRecord};

/// Prefix shared by every cache key, separating cache entries from any other
/// data persisted in the same store.
pub const CACHE_NAMESPACE: &str = "map_cache_";

/// Persisted value layout: the cached records and their write time.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CacheEnvelope {
    /// Cached records, in fetch order.
    pub data: Vec<BusinessRecord>,
    /// Write time in milliseconds since the Unix epoch.
    pub timestamp: i64,
}

/// Trait for durable string key-value storage backing the listing cache.
///
/// Implementations can store data in various backends (SQLite, in-memory, etc.).
/// Backends know nothing about expiry; they only store, list and delete.
#[async_trait]
pub trait CacheBackend: Send + Sync + Debug {
    /// Returns a short name for this backend (e.g., "sqlite").
    fn name(&self) -> &str;

    /// Reads the raw value stored under `key`.
    ///
    /// Returns `Ok(Some(value))` if present, `Ok(None)` if not.
    async fn read(&self, key: &str) -> Result<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    ///
    /// Backends with a capacity limit return
    /// [`TourError::CacheFull`](crate::TourError::CacheFull) when the write
    /// would exceed it.
    async fn write(&self, key: &str, value: &str) -> Result<()>;

    /// Deletes the value under `key`.
    ///
    /// Returns whether an entry existed.
    async fn remove(&self, key: &str) -> Result<bool>;

    /// Lists every key starting with `prefix`.
    async fn keys(&self, prefix: &str) -> Result<Vec<String>>;
}
