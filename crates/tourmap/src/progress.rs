//! Built-in progress sinks.

use std::sync::Mutex;
use tourmap_core::{Category, ProgressReporter, ProgressState};
use tracing::info;

/// Emits every progress event as a structured `info!` log line.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingProgress;

impl ProgressReporter for TracingProgress {
    fn on_start(&self, total_pages: u32, category: Category) {
        info!(%category, total_pages, "Fetch started");
    }

    fn on_advance(&self, page: u32, total_pages: u32, category: Category) {
        info!(%category, page, total_pages, "Page fetched");
    }

    fn on_reset(&self) {
        info!("Progress reset");
    }
}

/// Keeps the latest [`ProgressState`] for polling.
#[derive(Debug, Default)]
pub struct ProgressTracker {
    state: Mutex<ProgressState>,
}

impl ProgressTracker {
    /// Create a tracker with no progress recorded.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the current state.
    #[must_use]
    pub fn snapshot(&self) -> ProgressState {
        self.state.lock().map(|s| *s).unwrap_or_default()
    }

    fn update(&self, f: impl FnOnce(&mut ProgressState)) {
        // A poisoned lock only loses display state.
        if let Ok(mut state) = self.state.lock() {
            f(&mut state);
        }
    }
}

impl ProgressReporter for ProgressTracker {
    fn on_start(&self, total_pages: u32, category: Category) {
        self.update(|s| s.start(category, total_pages));
    }

    fn on_advance(&self, page: u32, total_pages: u32, category: Category) {
        self.update(|s| {
            if s.category != Some(category) {
                s.start(category, total_pages);
            }
            s.advance(page);
        });
    }

    fn on_reset(&self) {
        self.update(ProgressState::reset);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tracker_follows_events() {
        let tracker = ProgressTracker::new();
        tracker.on_start(4, Category::Accommodation);
        tracker.on_advance(1, 4, Category::Accommodation);
        tracker.on_advance(2, 4, Category::Accommodation);

        let state = tracker.snapshot();
        assert_eq!(state.category, Some(Category::Accommodation));
        assert_eq!(state.pages_completed, 2);
        assert_eq!(state.percent(), 50);

        tracker.on_start(1, Category::Restaurant);
        assert_eq!(tracker.snapshot().pages_completed, 0);

        tracker.on_reset();
        assert_eq!(tracker.snapshot(), ProgressState::default());
    }

    #[test]
    fn test_tracing_progress_never_fails() {
        let progress = TracingProgress;
        progress.on_reset();
        progress.on_start(2, Category::Restaurant);
        progress.on_advance(1, 2, Category::Restaurant);
    }
}
