//! Cache-aware, multi-category fetch orchestration.

use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use tourmap_cache::CacheStore;
use tourmap_core::{
    BusinessRecord, ListingProvider, NoopProgress, ProgressReporter, Result, derive_cache_key,
};

use crate::{request::SearchRequest, summary::RunSummary};

/// Records and counters produced by one [`FetchOrchestrator::run`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SearchResults {
    /// All categories' records, accommodation first, each in page order.
    pub records: Vec<BusinessRecord>,
    /// Counts for the run.
    pub summary: RunSummary,
}

/// Runs a [`SearchRequest`] against a provider, consulting the cache first.
///
/// Categories are processed one after another. A fresh cache entry is used
/// verbatim; otherwise the provider walks every page and the result is
/// written back under the same key. A failed fetch aborts the whole run.
///
/// # Example
///
/// ```rust,ignore
/// use std::sync::Arc;
/// use tourmap::{FetchOrchestrator, ListingApiClient, SearchRequest, business_types};
///
/// let orchestrator = FetchOrchestrator::new(Arc::new(ListingApiClient::new()));
/// let request = SearchRequest::new("https://api.example.go.th/business/search", token)
///     .with_provinces(["Krabi"])
///     .with_restaurant_types([business_types::RESTAURANT]);
/// let results = orchestrator.run(&request).await?;
/// ```
pub struct FetchOrchestrator {
    provider: Arc<dyn ListingProvider>,
    cache: Option<Arc<CacheStore>>,
    progress: Arc<dyn ProgressReporter>,
}

impl std::fmt::Debug for FetchOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FetchOrchestrator")
            .field("provider", &self.provider.name())
            .field(
                "cache",
                &self.cache.as_ref().map(|cache| cache.backend_name()),
            )
            .finish_non_exhaustive()
    }
}

impl FetchOrchestrator {
    /// Create an orchestrator without a cache.
    #[must_use]
    pub fn new(provider: Arc<dyn ListingProvider>) -> Self {
        Self {
            provider,
            cache: None,
            progress: Arc::new(NoopProgress),
        }
    }

    /// Create an orchestrator with a cache.
    #[must_use]
    pub fn with_cache(provider: Arc<dyn ListingProvider>, cache: Arc<CacheStore>) -> Self {
        Self::new(provider).set_cache(cache)
    }

    /// Set the cache for this orchestrator.
    #[must_use]
    pub fn set_cache(mut self, cache: Arc<CacheStore>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Set the sink receiving page progress events.
    #[must_use]
    pub fn with_progress(mut self, progress: Arc<dyn ProgressReporter>) -> Self {
        self.progress = progress;
        self
    }

    /// Returns the configured cache, if any.
    #[must_use]
    pub const fn cache(&self) -> Option<&Arc<CacheStore>> {
        self.cache.as_ref()
    }

    /// Run every category of `request` and merge the results.
    ///
    /// A request with no business types selected returns an empty result
    /// without touching the cache or the network.
    ///
    /// # Errors
    /// Returns an error if the credential is invalid or expired, or if any
    /// category's fetch fails.
    #[instrument(skip_all, fields(provider = self.provider.name()))]
    pub async fn run(&self, request: &SearchRequest) -> Result<SearchResults> {
        self.progress.on_reset();

        let queries = request.queries();
        if queries.is_empty() {
            debug!("No business types selected, nothing to fetch");
            return Ok(SearchResults::default());
        }

        request.credential.validate()?;

        let mut records = Vec::new();
        let mut pages_requested = 0;
        let mut hits = 0;
        let mut misses = 0;

        for query in &queries {
            let key = derive_cache_key(query);

            if let Some(cache) = &self.cache {
                if let Some(cached) = cache.get(key.as_str()).await {
                    debug!(
                        category = %query.category,
                        key = %key,
                        records = cached.len(),
                        "Cache hit"
                    );
                    hits += 1;
                    records.extend(cached);
                    continue;
                }
                debug!(category = %query.category, key = %key, "Cache miss");
                misses += 1;
            }

            let outcome = self
                .provider
                .fetch_listings(query, &request.credential, self.progress.as_ref())
                .await?;
            pages_requested += outcome.pages_requested;

            if let Some(cache) = &self.cache {
                let write = cache.put(key.as_str(), &outcome.records).await;
                if write.is_degraded() {
                    warn!(
                        category = %query.category,
                        key = %key,
                        outcome = ?write,
                        "Cache under capacity pressure"
                    );
                }
            }

            records.extend(outcome.records);
        }

        let summary = RunSummary::from_records(&records, pages_requested, hits, misses);
        info!(
            total = summary.total,
            accommodations = summary.accommodations,
            restaurants = summary.restaurants,
            with_coordinates = summary.with_coordinates,
            pages = summary.pages_requested,
            cache_hits = summary.cache_hits,
            cache_misses = summary.cache_misses,
            "Search complete"
        );

        Ok(SearchResults { records, summary })
    }
}
