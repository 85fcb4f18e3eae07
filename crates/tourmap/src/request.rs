//! Multi-category search requests.

use std::collections::HashSet;
use tourmap_core::{Category, Credential, FetchQuery};

/// One user-level search across both listing categories.
///
/// A category with no business types selected is skipped entirely.
#[derive(Clone, Debug)]
pub struct SearchRequest {
    /// Listing endpoint URL.
    pub endpoint: String,
    /// Bearer token sent with every page request.
    pub credential: Credential,
    /// Province filter shared by both categories; empty means all provinces.
    pub provinces: Vec<String>,
    /// Accommodation business type codes.
    pub accommodation_types: Vec<String>,
    /// Restaurant business type codes.
    pub restaurant_types: Vec<String>,
}

impl SearchRequest {
    /// Creates a request with no provinces and no business types.
    #[must_use]
    pub fn new(endpoint: impl Into<String>, credential: impl Into<Credential>) -> Self {
        Self {
            endpoint: endpoint.into(),
            credential: credential.into(),
            provinces: Vec::new(),
            accommodation_types: Vec::new(),
            restaurant_types: Vec::new(),
        }
    }

    /// Sets the province filter, cleaned up with [`normalize_provinces`].
    #[must_use]
    pub fn with_provinces<I, S>(mut self, provinces: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.provinces = normalize_provinces(provinces);
        self
    }

    /// Sets the accommodation business types.
    #[must_use]
    pub fn with_accommodation_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.accommodation_types = types.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the restaurant business types.
    #[must_use]
    pub fn with_restaurant_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.restaurant_types = types.into_iter().map(Into::into).collect();
        self
    }

    /// Business types selected for `category`.
    #[must_use]
    pub fn types_for(&self, category: Category) -> &[String] {
        match category {
            Category::Accommodation => &self.accommodation_types,
            Category::Restaurant => &self.restaurant_types,
        }
    }

    /// One query per category with a non-empty type selection, accommodation first.
    #[must_use]
    pub fn queries(&self) -> Vec<FetchQuery> {
        Category::ALL
            .into_iter()
            .filter(|category| !self.types_for(*category).is_empty())
            .map(|category| {
                FetchQuery::new(
                    self.endpoint.clone(),
                    category,
                    self.types_for(category).to_vec(),
                    self.provinces.clone(),
                )
            })
            .collect()
    }
}

/// Trims, drops blanks, removes case-insensitive duplicates and sorts.
///
/// The first spelling of a duplicated province is kept.
pub fn normalize_provinces<I, S>(provinces: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    let mut out: Vec<String> = provinces
        .into_iter()
        .map(|p| p.as_ref().trim().to_string())
        .filter(|p| !p.is_empty())
        .filter(|p| seen.insert(p.to_lowercase()))
        .collect();
    out.sort();
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_provinces() {
        let provinces = normalize_provinces(["  Phuket ", "", "krabi", "PHUKET", "Krabi", "   "]);
        assert_eq!(provinces, vec!["Phuket", "krabi"]);
    }

    #[test]
    fn test_queries_skip_empty_categories() {
        let request = SearchRequest::new("https://api.example/search", "token")
            .with_restaurant_types(["50001"]);
        let queries = request.queries();
        assert_eq!(queries.len(), 1);
        assert_eq!(queries[0].category, Category::Restaurant);
        assert_eq!(queries[0].business_types, vec!["50001"]);
    }

    #[test]
    fn test_queries_accommodation_first() {
        let request = SearchRequest::new("https://api.example/search", "token")
            .with_provinces(["Chiang Mai"])
            .with_restaurant_types(["50001"])
            .with_accommodation_types(["500040001", "500040002"]);
        let categories: Vec<Category> = request.queries().iter().map(|q| q.category).collect();
        assert_eq!(categories, vec![Category::Accommodation, Category::Restaurant]);
        assert!(
            request
                .queries()
                .iter()
                .all(|q| q.provinces == vec!["Chiang Mai".to_string()])
        );
    }

    #[test]
    fn test_empty_request_has_no_queries() {
        let request = SearchRequest::new("https://api.example/search", "token");
        assert!(request.queries().is_empty());
    }
}
