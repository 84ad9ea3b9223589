//! Bounded retry policy

use std::time::Duration;

use super::error_kind::ErrorKind;

/// Attempts made before giving up
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Unit of the linear backoff
pub const DEFAULT_BASE_DELAY: Duration = Duration::from_secs(2);

/// Linear backoff with a kind-specific multiplier.
///
/// The wait before attempt `n + 1` (0-based `n`) is
/// `base_delay * factor * (n + 1)`, where the factor comes from
/// [`ErrorKind::backoff_factor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    base_delay: Duration,
}

impl RetryPolicy {
    /// A request is always tried once, so `max_attempts` is at least 1.
    pub const fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts: if max_attempts == 0 { 1 } else { max_attempts },
            base_delay,
        }
    }

    pub const fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub const fn base_delay(&self) -> Duration {
        self.base_delay
    }

    /// Delay to wait after failed attempt `attempt` (0-based).
    ///
    /// `None` means no further attempt may be made: the kind is not
    /// retryable or `attempt` was the last one.
    pub fn delay_for(&self, attempt: u32, kind: ErrorKind) -> Option<Duration> {
        if attempt.saturating_add(1) >= self.max_attempts {
            return None;
        }
        let factor = kind.backoff_factor()?;
        Some(self.base_delay * factor * (attempt + 1))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ATTEMPTS, DEFAULT_BASE_DELAY)
    }
}
