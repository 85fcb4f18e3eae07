//! Progress reporting for paginated fetches.
//!
//! Providers publish page-advancement events to a [`ProgressReporter`]. Sinks
//! must return promptly and never fail; any slow work belongs on the sink's side
//! of the seam.

use serde::Serialize;
use std::fmt::Debug;

use crate::category::Category;

/// Sink for page-advancement events.
pub trait ProgressReporter: Send + Sync + Debug {
    /// A category's first page arrived and announced `total_pages`.
    fn on_start(&self, total_pages: u32, category: Category);

    /// `page` of `total_pages` for `category` has been processed.
    fn on_advance(&self, page: u32, total_pages: u32, category: Category);

    /// A new search is starting; previous progress is void.
    fn on_reset(&self);
}

/// A sink that discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopProgress;

impl ProgressReporter for NoopProgress {
    fn on_start(&self, _total_pages: u32, _category: Category) {}

    fn on_advance(&self, _page: u32, _total_pages: u32, _category: Category) {}

    fn on_reset(&self) {}
}

/// Pagination progress of one category's fetch.
///
/// Counters only move forward until [`Self::reset`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ProgressState {
    /// Category being fetched, if any fetch has started.
    pub category: Option<Category>,
    /// Pages processed so far.
    pub pages_completed: u32,
    /// Pages announced by the first response.
    pub pages_expected: u32,
}

impl ProgressState {
    /// Creates a state for a fresh fetch of `category`.
    #[must_use]
    pub const fn new(category: Category) -> Self {
        Self {
            category: Some(category),
            pages_completed: 0,
            pages_expected: 0,
        }
    }

    /// Records the page total announced for `category`.
    pub fn start(&mut self, category: Category, total_pages: u32) {
        *self = Self::new(category);
        self.pages_expected = total_pages;
    }

    /// Records that `page` has been processed.
    pub fn advance(&mut self, page: u32) {
        self.pages_completed = self.pages_completed.max(page);
        self.pages_expected = self.pages_expected.max(self.pages_completed);
    }

    /// Clears all progress.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Completion percentage, rounded; 0 before any total is known.
    #[must_use]
    pub fn percent(&self) -> u8 {
        if self.pages_expected == 0 {
            return 0;
        }
        let pct = (f64::from(self.pages_completed) / f64::from(self.pages_expected)) * 100.0;
        pct.round().clamp(0.0, 100.0) as u8
    }
}
