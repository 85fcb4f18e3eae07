//! Jittered pause between page requests.

use rand::Rng;
use std::time::Duration;
use tokio::time::sleep;

/// Randomized delay window applied between consecutive page requests.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Throttle {
    min: Duration,
    max: Duration,
}

impl Default for Throttle {
    fn default() -> Self {
        Self::new(Duration::from_millis(1000), Duration::from_millis(1500))
    }
}

impl Throttle {
    /// Delays are drawn from `[min, max)`. A window with `max <= min`
    /// always waits exactly `min`.
    #[must_use]
    pub const fn new(min: Duration, max: Duration) -> Self {
        Self { min, max }
    }

    /// No pause at all.
    #[must_use]
    pub const fn none() -> Self {
        Self::new(Duration::ZERO, Duration::ZERO)
    }

    /// Lower bound of the window.
    #[must_use]
    pub const fn min(&self) -> Duration {
        self.min
    }

    /// Upper bound of the window.
    #[must_use]
    pub const fn max(&self) -> Duration {
        self.max
    }

    /// Draws the next delay.
    #[must_use]
    pub fn next_delay(&self) -> Duration {
        if self.max <= self.min {
            return self.min;
        }
        rand::rng().random_range(self.min..self.max)
    }

    /// Sleeps for [`Self::next_delay`].
    pub async fn pause(&self) {
        let delay = self.next_delay();
        if !delay.is_zero() {
            sleep(delay).await;
        }
    }
}
