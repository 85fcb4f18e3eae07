//! Provider trait for fetching listings.
//!
//! This module defines [`ListingProvider`], implemented by anything that can
//! produce the full record set for one [`FetchQuery`], and [`FetchOutcome`],
//! what a provider reports back.

use async_trait::async_trait;
use std::fmt::Debug;

use crate::{
    credential::Credential,
    error::Result,
    progress::ProgressReporter,
    types::{BusinessRecord, FetchQuery},
};

/// Result of one category's paginated fetch.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FetchOutcome {
    /// Normalized records, in page order.
    pub records: Vec<BusinessRecord>,
    /// Number of page requests issued.
    pub pages_requested: u32,
    /// Total pages announced by the first response, if any.
    pub total_pages: Option<u32>,
    /// Total items announced by the first response, if any.
    pub total_items: Option<u64>,
    /// False when pagination ended early on a response without the expected envelope.
    pub complete: bool,
}

/// Source of paginated listings.
///
/// Implementations issue requests strictly one after another and publish page
/// events to the given [`ProgressReporter`].
#[async_trait]
pub trait ListingProvider: Send + Sync + Debug {
    /// Returns the name of this provider.
    fn name(&self) -> &str;

    /// Fetches every page for `query` and returns the accumulated records.
    ///
    /// A transport failure or non-success status aborts the whole fetch.
    async fn fetch_listings(
        &self,
        query: &FetchQuery,
        credential: &Credential,
        progress: &dyn ProgressReporter,
    ) -> Result<FetchOutcome>;
}
