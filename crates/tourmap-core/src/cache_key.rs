//! Cache key derivation.
//!
//! A key is `map_cache_` followed by a hash of the query's canonical JSON form.
//! Business types and provinces are sorted and deduplicated before hashing, so
//! the order in which a caller lists them never changes the key. Distinct
//! queries colliding on the truncated hash is an accepted risk.

use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fmt;

use crate::{cache::CACHE_NAMESPACE, category::Category, types::FetchQuery};

/// Hash bytes kept in the key.
const KEY_HASH_BYTES: usize = 12;

/// Namespaced identifier of one cached query result.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey(String);

impl CacheKey {
    /// Returns the key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CacheKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CanonicalQuery<'a> {
    api_url: &'a str,
    provinces: Vec<&'a str>,
    business_types: Vec<&'a str>,
    business_category: Category,
}

fn sorted_set(values: &[String]) -> Vec<&str> {
    let mut set: Vec<&str> = values.iter().map(String::as_str).collect();
    set.sort_unstable();
    set.dedup();
    set
}

/// Derives the cache key for `query`.
#[must_use]
pub fn derive_cache_key(query: &FetchQuery) -> CacheKey {
    let canonical = CanonicalQuery {
        api_url: &query.endpoint,
        provinces: sorted_set(&query.provinces),
        business_types: sorted_set(&query.business_types),
        business_category: query.category,
    };
    // Serializing a struct of strings and a unit enum cannot fail.
    let text = serde_json::to_string(&canonical).unwrap_or_default();

    let digest = Sha256::digest(text.as_bytes());
    let mut key = String::with_capacity(CACHE_NAMESPACE.len() + KEY_HASH_BYTES * 2);
    key.push_str(CACHE_NAMESPACE);
    for byte in &digest[..KEY_HASH_BYTES] {
        key.push_str(&format!("{byte:02x}"));
    }
    CacheKey(key)
}
