//! Command line and environment configuration.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, bail};
use clap::Args;
use tourmap::{CacheStore, Credential, SqliteCache, Throttle, business_types};

/// Upstream API access.
#[derive(Clone, Args)]
pub(crate) struct ApiArgs {
    /// Listing endpoint URL
    #[arg(long, env = "API_URL")]
    pub(crate) api_url: String,

    /// Bearer token for the listing API
    #[arg(long, env = "API_TOKEN", hide_env_values = true)]
    pub(crate) api_token: String,

    /// Minimum pause between page requests, in milliseconds
    #[arg(long, default_value_t = 1000)]
    pub(crate) min_delay_ms: u64,

    /// Maximum pause between page requests, in milliseconds
    #[arg(long, default_value_t = 1500)]
    pub(crate) max_delay_ms: u64,
}

impl fmt::Debug for ApiArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiArgs")
            .field("api_url", &self.api_url)
            .field("api_token", &"[REDACTED]")
            .field("min_delay_ms", &self.min_delay_ms)
            .field("max_delay_ms", &self.max_delay_ms)
            .finish()
    }
}

impl ApiArgs {
    pub(crate) fn credential(&self) -> Credential {
        Credential::new(self.api_token.as_str())
    }

    pub(crate) fn throttle(&self) -> anyhow::Result<Throttle> {
        if self.min_delay_ms > self.max_delay_ms {
            bail!(
                "--min-delay-ms ({}) must not exceed --max-delay-ms ({})",
                self.min_delay_ms,
                self.max_delay_ms
            );
        }
        Ok(Throttle::new(
            Duration::from_millis(self.min_delay_ms),
            Duration::from_millis(self.max_delay_ms),
        ))
    }
}

/// Location of the on-disk cache.
#[derive(Debug, Clone, Args)]
pub(crate) struct CacheLocation {
    /// SQLite file holding cached listings
    #[arg(long, env = "TOURMAP_CACHE_PATH", default_value = "tourmap-cache.sqlite3")]
    pub(crate) cache_path: PathBuf,
}

impl CacheLocation {
    pub(crate) fn open(&self, quota_bytes: Option<usize>) -> anyhow::Result<CacheStore> {
        let mut backend = SqliteCache::new(&self.cache_path)
            .with_context(|| format!("opening cache at {}", self.cache_path.display()))?;
        if let Some(quota) = quota_bytes {
            backend = backend.with_quota(quota);
        }
        Ok(CacheStore::new(std::sync::Arc::new(backend)))
    }
}

/// Cache settings for a search.
#[derive(Debug, Clone, Args)]
pub(crate) struct CacheArgs {
    #[command(flatten)]
    pub(crate) location: CacheLocation,

    /// Upper bound on the bytes of cached listings
    #[arg(long, env = "TOURMAP_CACHE_QUOTA_BYTES")]
    pub(crate) cache_quota_bytes: Option<usize>,

    /// Always fetch from the API and leave the cache untouched
    #[arg(long)]
    pub(crate) no_cache: bool,
}

impl CacheArgs {
    pub(crate) fn open_store(&self) -> anyhow::Result<Option<CacheStore>> {
        if self.no_cache {
            return Ok(None);
        }
        self.location.open(self.cache_quota_bytes).map(Some)
    }
}

/// Accepts a numeric business type code or one of the known names.
pub(crate) fn parse_business_type(value: &str) -> Result<String, String> {
    let value = value.trim();
    if !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit()) {
        return Ok(value.to_string());
    }
    let code = match value.to_ascii_lowercase().replace('_', "-").as_str() {
        "hotel" => business_types::HOTEL,
        "homestay" => business_types::HOMESTAY,
        "resort" => business_types::RESORT,
        "daily-rental" => business_types::DAILY_RENTAL,
        "hostel" => business_types::HOSTEL,
        "mansion" | "dormitory" => business_types::MANSION,
        "restaurant" => business_types::RESTAURANT,
        _ => {
            return Err(format!(
                "unknown business type `{value}`; use a numeric code or one of: \
                 hotel, homestay, resort, daily-rental, hostel, mansion, restaurant"
            ));
        }
    };
    Ok(code.to_string())
}
