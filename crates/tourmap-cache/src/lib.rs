#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/tourmap/tourmap/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Caching for tourism listing results.
//!
//! [`CacheStore`] holds the expiry and eviction policy and runs over any
//! [`CacheBackend`] from `tourmap-core`:
//!
//! - [`SqliteCache`] - Persistent SQLite-based backend (default, requires `sqlite` feature)
//! - [`InMemoryCache`] - Simple in-memory backend for testing
//! - [`NoopCache`] - No-op backend that doesn't store anything

/// In-memory backend implementation.
pub mod memory;
/// No-op backend implementation.
pub mod noop;
/// Expiry and eviction policy over a backend.
pub mod store;

/// SQLite-based backend implementation.
#[cfg(feature = "sqlite")]
pub mod sqlite;

// Re-export the trait for convenience
pub use tourmap_core::CacheBackend;

// Re-export implementations
pub use memory::InMemoryCache;
pub use noop::NoopCache;
pub use store::{CACHE_TTL, CacheStats, CacheStore, CacheWrite, EVICTION_THRESHOLD};

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteCache;
