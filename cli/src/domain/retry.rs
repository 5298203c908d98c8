//! Bounded retry policy shared by Wi-Fi association and the adb bridge.

use std::time::Duration;

/// Attempt-count-bounded retry policy with a fixed pause between attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    backoff: Duration,
}

impl RetryPolicy {
    /// Create a policy. `max_attempts` is clamped to at least one.
    #[must_use]
    pub fn new(max_attempts: u32, backoff: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            backoff,
        }
    }

    #[must_use]
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    #[must_use]
    pub fn backoff(&self) -> Duration {
        self.backoff
    }

    /// Attempt numbers, starting at 1.
    pub fn attempts(&self) -> impl Iterator<Item = u32> + use<> {
        1..=self.max_attempts
    }

    /// Whether another attempt follows `attempt`.
    #[must_use]
    pub fn has_next(&self, attempt: u32) -> bool {
        attempt < self.max_attempts
    }
}
