#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/tourmap/tourmap/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Listing API provider.
//!
//! This crate implements the tourmap-core [`ListingProvider`] trait for the
//! tourism business listing API.
//!
//! # Usage
//!
//! ```rust,ignore
//! use tourmap_api::ListingApiClient;
//! use tourmap_core::{Category, Credential, FetchQuery, ListingProvider, NoopProgress, business_types};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = ListingApiClient::new();
//!     let query = FetchQuery::new(
//!         "https://api.example.go.th/business/search",
//!         Category::Restaurant,
//!         vec![business_types::RESTAURANT.to_string()],
//!         vec!["Chiang Mai".to_string()],
//!     );
//!     let credential = Credential::new(std::env::var("API_TOKEN")?);
//!
//!     let outcome = client.fetch_listings(&query, &credential, &NoopProgress).await?;
//!     println!("{} restaurants", outcome.records.len());
//!     Ok(())
//! }
//! ```

mod normalize;
mod response;
mod throttle;

pub use throttle::Throttle;

use async_trait::async_trait;
use reqwest::Client;
use response::{PageData, PageRequest};
use std::fmt;
use tourmap_core::{
    Credential, FetchOutcome, FetchQuery, ListingProvider, ProgressReporter, ProgressState,
    Result, TourError,
};
use tracing::{debug, instrument, warn};

/// Items requested per page.
pub const PAGE_SIZE: u32 = 20;

/// Client for the upstream listing API.
///
/// Pages are requested strictly one after another, with a [`Throttle`]
/// pause between consecutive requests.
#[derive(Clone)]
pub struct ListingApiClient {
    client: Client,
    throttle: Throttle,
}

impl fmt::Debug for ListingApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListingApiClient")
            .field("throttle", &self.throttle)
            .finish_non_exhaustive()
    }
}

impl Default for ListingApiClient {
    fn default() -> Self {
        Self::new()
    }
}

impl ListingApiClient {
    /// Create a new client with the default 1.0-1.5 s page throttle.
    #[must_use]
    pub fn new() -> Self {
        Self::with_client(Client::new())
    }

    /// Create a new client with a custom HTTP client.
    #[must_use]
    pub fn with_client(client: Client) -> Self {
        Self {
            client,
            throttle: Throttle::default(),
        }
    }

    /// Replace the pause applied between page requests.
    #[must_use]
    pub const fn with_throttle(mut self, throttle: Throttle) -> Self {
        self.throttle = throttle;
        self
    }

    /// Request one page.
    ///
    /// Returns `Ok(None)` when the response lacks the success/data envelope
    /// or its `data` object cannot be read.
    async fn request_page(
        &self,
        query: &FetchQuery,
        credential: &Credential,
        page: u32,
    ) -> Result<Option<PageData>> {
        let body = PageRequest {
            limit: PAGE_SIZE,
            page,
            business_type: &query.business_types,
            province: (!query.provinces.is_empty()).then_some(query.provinces.as_slice()),
        };
        debug!(page, category = %query.category, "Listing request");

        let response = self
            .client
            .post(&query.endpoint)
            .bearer_auth(credential.expose())
            .json(&body)
            .send()
            .await
            .map_err(|e| TourError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TourError::Status {
                status: status.as_u16(),
                url: query.endpoint.clone(),
            });
        }

        let text = response
            .text()
            .await
            .map_err(|e| TourError::Transport(e.to_string()))?;

        let json: serde_json::Value =
            serde_json::from_str(&text).map_err(|e| TourError::Parse(format!("{e}: {text}")))?;

        Ok(PageData::from_envelope(json))
    }
}

#[async_trait]
impl ListingProvider for ListingApiClient {
    fn name(&self) -> &str {
        "listing-api"
    }

    #[instrument(skip(self, credential, progress), fields(category = %query.category))]
    async fn fetch_listings(
        &self,
        query: &FetchQuery,
        credential: &Credential,
        progress: &dyn ProgressReporter,
    ) -> Result<FetchOutcome> {
        let category = query.category;
        let mut state = ProgressState::new(category);
        let mut outcome = FetchOutcome::default();
        let mut page = 1;

        loop {
            let data = self.request_page(query, credential, page).await?;
            outcome.pages_requested += 1;

            let Some(data) = data else {
                warn!(page, "Response without data envelope, ending pagination");
                return Ok(outcome);
            };

            if page == 1 {
                outcome.total_pages = data.total_pages;
                outcome.total_items = data.total_items;
                state.start(category, data.total_pages.unwrap_or(0));
                progress.on_start(state.pages_expected, category);
            }

            let listings = data.data;
            let received = listings.len();
            outcome.records.extend(
                listings
                    .into_iter()
                    .filter_map(|raw| normalize::normalize_listing(raw, category)),
            );

            state.advance(page);
            progress.on_advance(page, state.pages_expected, category);
            debug!(page, received, total = outcome.records.len(), "Page processed");

            let last_page = match data.has_next_page {
                Some(true) => outcome.total_pages.is_some_and(|total| page >= total),
                Some(false) | None => true,
            };
            if last_page {
                break;
            }

            self.throttle.pause().await;
            page += 1;
        }

        if let Some(total) = outcome.total_pages {
            state.advance(total);
            progress.on_advance(total, total, category);
        }
        outcome.complete = true;

        debug!(
            pages = outcome.pages_requested,
            records = outcome.records.len(),
            "Fetch complete"
        );
        Ok(outcome)
    }
}
