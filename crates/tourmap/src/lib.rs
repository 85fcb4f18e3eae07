#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/tourmap/tourmap/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Cached, paginated retrieval of tourism business listings.
//!
//! This crate re-exports the core types, cache backends and the listing API
//! client, and provides a [`FetchOrchestrator`] that runs a [`SearchRequest`]
//! across categories with a 24 hour cache in front of the API.
//!
//! # Features
//!
//! - `cache-sqlite` - SQLite-based caching (default)
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use tourmap::{
//!     CacheStore, FetchOrchestrator, ListingApiClient, SearchRequest, SqliteCache,
//!     business_types,
//! };
//!
//! #[tokio::main]
//! async fn main() -> tourmap::Result<()> {
//!     let cache = CacheStore::new(Arc::new(SqliteCache::new("tourmap-cache.sqlite3")?));
//!     let orchestrator =
//!         FetchOrchestrator::with_cache(Arc::new(ListingApiClient::new()), Arc::new(cache));
//!
//!     let request = SearchRequest::new("https://api.example.go.th/business/search", "eyJ...")
//!         .with_provinces(["Chiang Mai"])
//!         .with_accommodation_types([business_types::HOTEL, business_types::HOMESTAY]);
//!
//!     let results = orchestrator.run(&request).await?;
//!     println!("{:?}", results.summary);
//!
//!     Ok(())
//! }
//! ```

// Core types and traits
pub use tourmap_core::*;

// Cache implementations
#[cfg(feature = "cache-sqlite")]
pub use tourmap_cache::SqliteCache;
pub use tourmap_cache::{
    CACHE_TTL, CacheStats, CacheStore, CacheWrite, EVICTION_THRESHOLD, InMemoryCache, NoopCache,
};

// Provider
pub use tourmap_api::{ListingApiClient, PAGE_SIZE, Throttle};

mod orchestrator;
mod progress;
mod request;
mod summary;

pub use orchestrator::{FetchOrchestrator, SearchResults};
pub use progress::{ProgressTracker, TracingProgress};
pub use request::{SearchRequest, normalize_provinces};
pub use summary::{RunSummary, map_center};
