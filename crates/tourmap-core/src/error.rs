//! Error types for pipeline operations.
//!
//! This module defines [`TourError`] which covers every failure that can occur
//! while validating credentials, fetching listing pages, or touching the cache.

use thiserror::Error;

/// Errors that can occur during pipeline operations.
#[derive(Error, Debug)]
pub enum TourError {
    /// The bearer token is malformed, lacks an expiry, or has expired.
    #[error("Invalid credential: {0}")]
    Credential(String),

    /// Network-level failure (connection refused, reset, timeout, etc.).
    #[error("Network error: {0}")]
    Transport(String),

    /// The upstream API answered with a non-success status.
    #[error("HTTP {status} from {url}")]
    Status {
        /// The HTTP status code returned.
        status: u16,
        /// The endpoint that was requested.
        url: String,
    },

    /// A success response body could not be decoded.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Error interacting with the cache backend.
    #[error("Cache error: {0}")]
    Cache(String),

    /// The cache backend rejected a write because it is out of capacity.
    #[error("Cache full: write of {needed} bytes exceeds quota of {quota} bytes")]
    CacheFull {
        /// Total bytes the backend would hold after the write.
        needed: usize,
        /// Configured capacity in bytes.
        quota: usize,
    },

    /// An invalid parameter was provided.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

impl TourError {
    /// Returns true if this error is a capacity rejection from a cache backend.
    #[must_use]
    pub const fn is_cache_full(&self) -> bool {
        matches!(self, Self::CacheFull { .. })
    }
}

/// Result type alias using [`TourError`].
pub type Result<T> = std::result::Result<T, TourError>;
