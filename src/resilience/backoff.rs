//! Fixed-delay retry policy.

use std::time::Duration;

/// Same delay before every retry; no growth and no attempt cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedBackoff {
    delay: Duration,
    attempts: u64,
}

impl FixedBackoff {
    pub fn new(delay: Duration) -> Self {
        Self { delay, attempts: 0 }
    }

    pub fn from_millis(ms: u64) -> Self {
        Self::new(Duration::from_millis(ms))
    }

    /// Delay before the next attempt.
    pub fn next_delay(&mut self) -> Duration {
        self.attempts = self.attempts.saturating_add(1);
        self.delay
    }

    /// Retries handed out so far.
    pub fn attempts(&self) -> u64 {
        self.attempts
    }
}
