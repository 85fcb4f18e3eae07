//! `tourmap fetch`

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use chrono::Utc;
use clap::Args;
use tourmap::{FetchOrchestrator, ListingApiClient, SearchRequest, TracingProgress};
use tracing::info;

use crate::config::{ApiArgs, CacheArgs, parse_business_type};
use crate::export::Export;

#[derive(Debug, Args)]
pub(crate) struct FetchArgs {
    #[command(flatten)]
    pub(crate) api: ApiArgs,

    #[command(flatten)]
    pub(crate) cache: CacheArgs,

    /// Province to search (repeatable); all provinces when omitted
    #[arg(long = "province", value_name = "NAME")]
    pub(crate) provinces: Vec<String>,

    /// Accommodation business type, as a code or name (repeatable)
    #[arg(long = "accommodation-type", value_name = "TYPE", value_parser = parse_business_type)]
    pub(crate) accommodation_types: Vec<String>,

    /// Restaurant business type, as a code or name (repeatable)
    #[arg(long = "restaurant-type", value_name = "TYPE", value_parser = parse_business_type)]
    pub(crate) restaurant_types: Vec<String>,

    /// Write the JSON export here instead of stdout
    #[arg(long, short)]
    pub(crate) output: Option<PathBuf>,

    /// Latitude of the location the search is centered on
    #[arg(long, requires = "target_lon", allow_hyphen_values = true)]
    pub(crate) target_lat: Option<f64>,

    /// Longitude of the location the search is centered on
    #[arg(long, requires = "target_lat", allow_hyphen_values = true)]
    pub(crate) target_lon: Option<f64>,
}

impl FetchArgs {
    pub(crate) fn target(&self) -> Option<(f64, f64)> {
        self.target_lat.zip(self.target_lon)
    }

    pub(crate) fn search_request(&self) -> SearchRequest {
        SearchRequest::new(self.api.api_url.as_str(), self.api.credential())
            .with_provinces(&self.provinces)
            .with_accommodation_types(self.accommodation_types.iter().cloned())
            .with_restaurant_types(self.restaurant_types.iter().cloned())
    }
}

pub(crate) async fn run(args: FetchArgs) -> anyhow::Result<()> {
    let client = ListingApiClient::new().with_throttle(args.api.throttle()?);
    let mut orchestrator =
        FetchOrchestrator::new(Arc::new(client)).with_progress(Arc::new(TracingProgress));
    if let Some(store) = args.cache.open_store()? {
        orchestrator = orchestrator.set_cache(Arc::new(store));
    }

    let request = args.search_request();
    info!(
        provinces = ?request.provinces,
        accommodation_types = ?request.accommodation_types,
        restaurant_types = ?request.restaurant_types,
        "Starting search"
    );

    let results = orchestrator
        .run(&request)
        .await
        .context("listing search failed")?;

    let export = Export::new(&results, args.target(), Utc::now());
    match &args.output {
        Some(path) => {
            export.write_to(path)?;
            info!(path = %path.display(), records = results.records.len(), "Export written");
        }
        None => export.write(std::io::stdout().lock())?,
    }

    Ok(())
}
