//! Run summaries and map helpers.

use serde::Serialize;
use tourmap_core::{BusinessRecord, Category};

/// Counts describing one orchestrated run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    /// Records returned across all categories.
    pub total: usize,
    /// Accommodation records.
    pub accommodations: usize,
    /// Restaurant records.
    pub restaurants: usize,
    /// Records that can be placed on a map.
    pub with_coordinates: usize,
    /// Records without a usable location.
    pub without_coordinates: usize,
    /// Page requests issued to the upstream API.
    pub pages_requested: u32,
    /// Categories served from the cache.
    pub cache_hits: u64,
    /// Categories that had to be fetched.
    pub cache_misses: u64,
}

impl RunSummary {
    /// Builds a summary from the merged records and the run's counters.
    #[must_use]
    pub fn from_records(
        records: &[BusinessRecord],
        pages_requested: u32,
        cache_hits: u64,
        cache_misses: u64,
    ) -> Self {
        let count = |category| records.iter().filter(|r| r.category == category).count();
        let with_coordinates = records.iter().filter(|r| r.coordinates().is_some()).count();
        Self {
            total: records.len(),
            accommodations: count(Category::Accommodation),
            restaurants: count(Category::Restaurant),
            with_coordinates,
            without_coordinates: records.len() - with_coordinates,
            pages_requested,
            cache_hits,
            cache_misses,
        }
    }

    /// Cache hit rate as a rounded percentage; 0 when nothing was looked up.
    #[must_use]
    pub fn hit_rate(&self) -> u8 {
        let lookups = self.cache_hits + self.cache_misses;
        if lookups == 0 {
            return 0;
        }
        ((self.cache_hits as f64 / lookups as f64) * 100.0).round() as u8
    }
}

/// Mean position of `target` and every placeable record.
///
/// Returns `None` when there is nothing to place.
#[must_use]
pub fn map_center(target: Option<(f64, f64)>, records: &[BusinessRecord]) -> Option<(f64, f64)> {
    let points: Vec<(f64, f64)> = target
        .into_iter()
        .chain(records.iter().filter_map(BusinessRecord::coordinates))
        .collect();
    if points.is_empty() {
        return None;
    }
    let n = points.len() as f64;
    let (lat, lon) = points
        .iter()
        .fold((0.0, 0.0), |(lat, lon), (a, b)| (lat + a, lon + b));
    Some((lat / n, lon / n))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<BusinessRecord> {
        vec![
            BusinessRecord::new(1, Category::Accommodation).with_location(18.0, 98.0),
            BusinessRecord::new(2, Category::Accommodation),
            BusinessRecord::new(3, Category::Restaurant).with_location(20.0, 100.0),
        ]
    }

    #[test]
    fn test_summary_counts() {
        let summary = RunSummary::from_records(&sample(), 4, 1, 2);
        assert_eq!(summary.total, 3);
        assert_eq!(summary.accommodations, 2);
        assert_eq!(summary.restaurants, 1);
        assert_eq!(summary.with_coordinates, 2);
        assert_eq!(summary.without_coordinates, 1);
        assert_eq!(summary.pages_requested, 4);
        assert_eq!(summary.hit_rate(), 33);
    }

    #[test]
    fn test_hit_rate_without_lookups() {
        assert_eq!(RunSummary::default().hit_rate(), 0);
    }

    #[test]
    fn test_map_center() {
        assert_eq!(map_center(None, &sample()), Some((19.0, 99.0)));
        assert_eq!(
            map_center(Some((16.0, 96.0)), &sample()),
            Some((18.0, 98.0))
        );
        assert_eq!(map_center(None, &[]), None);
    }
}
