#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/tourmap/tourmap/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Core traits and types for the tourism listing pipeline.
//!
//! This crate provides the foundational abstractions shared by the other crates:
//!
//! - [`BusinessRecord`](types::BusinessRecord) - Canonical normalized listing
//! - [`FetchQuery`](types::FetchQuery) - One category's upstream query
//! - [`CacheKey`](cache_key::CacheKey) - Order-insensitive cache identifier
//! - [`Credential`](credential::Credential) - Bearer token with expiry inspection
//! - [`CacheBackend`](cache::CacheBackend) - Namespaced key-value storage seam
//! - [`ListingProvider`](provider::ListingProvider) - Paginated listing source
//! - [`ProgressReporter`](progress::ProgressReporter) - Page-advancement sink

/// Storage backend trait and the persisted cache envelope.
pub mod cache;
/// Cache key derivation from normalized queries.
pub mod cache_key;
/// Business category and known business type codes.
pub mod category;
/// Bearer credential inspection.
pub mod credential;
/// Error types for pipeline operations.
pub mod error;
/// Progress reporting sinks and state.
pub mod progress;
/// Provider trait for fetching listings.
pub mod provider;
/// Core data types (BusinessRecord, FetchQuery, etc.).
pub mod types;

// Re-export commonly used items at crate root
pub use cache::{CACHE_NAMESPACE, CacheBackend, CacheEnvelope};
pub use cache_key::{CacheKey, derive_cache_key};
pub use category::{Category, business_types};
pub use credential::{Credential, CredentialInfo};
pub use error::{Result, TourError};
pub use progress::{NoopProgress, ProgressReporter, ProgressState};
pub use provider::{FetchOutcome, ListingProvider};
pub use types::{
    Address, BusinessRecord, Contact, ContactUrls, FetchQuery, Location, RecordId, Room,
};
