//! Retry configuration for idempotent reads.

use std::time::Duration;

/// Automatic retry behavior for `GET` requests.
///
/// Writes are never retried. Retries are off unless configured.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use tailor_client::retry::RetryConfig;
///
/// let config = RetryConfig::standard()
///     .max_retries(5)
///     .initial_delay(Duration::from_millis(500));
/// assert!(config.enabled());
/// assert!(!RetryConfig::default().enabled());
/// ```
#[derive(Debug, Clone)]
pub struct RetryConfig {
    pub max_retries: u32,
    /// Delay before the first retry; doubles each attempt.
    pub initial_delay: Duration,
    pub max_delay: Duration,
    pub retry_on_429: bool,
    pub retry_on_5xx: bool,
    pub retry_on_network: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self::no_retry()
    }
}

impl RetryConfig {
    /// Three retries with exponential backoff from one second.
    pub fn standard() -> Self {
        Self {
            max_retries: 3,
            initial_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(30),
            retry_on_429: true,
            retry_on_5xx: true,
            retry_on_network: true,
        }
    }

    pub fn no_retry() -> Self {
        Self {
            max_retries: 0,
            retry_on_429: false,
            retry_on_5xx: false,
            retry_on_network: false,
            ..Self::standard()
        }
    }

    pub fn enabled(&self) -> bool {
        self.max_retries > 0
    }

    pub fn max_retries(mut self, n: u32) -> Self {
        self.max_retries = n;
        self
    }

    pub fn initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    pub fn max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    /// The delay after `delay`, capped at `max_delay`.
    pub(crate) fn next_delay(&self, delay: Duration) -> Duration {
        (delay * 2).min(self.max_delay)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backoff_is_capped() {
        let config = RetryConfig::standard().max_delay(Duration::from_secs(3));
        let d1 = config.next_delay(config.initial_delay);
        let d2 = config.next_delay(d1);
        assert_eq!(d1, Duration::from_secs(2));
        assert_eq!(d2, Duration::from_secs(3));
    }

    #[test]
    fn test_no_retry_disables_everything() {
        let config = RetryConfig::no_retry();
        assert!(!config.enabled());
        assert!(!config.retry_on_5xx);
    }
}
