//! Retry policy for catalog requests
//!
//! Retries are linear: the n-th retry waits `retry_wait * n`.

use std::time::Duration;

/// Retry behavior for retryable HTTP statuses
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Number of retries after the first attempt
    pub retries: u32,
    /// Base wait, multiplied by the attempt number
    pub retry_wait: Duration,
    /// HTTP statuses that trigger a retry
    pub retry_codes: Vec<u16>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            retries: 3,
            retry_wait: Duration::from_secs(30),
            retry_codes: vec![429, 504],
        }
    }
}

impl RetryConfig {
    /// Single attempt, no waiting
    pub fn disabled() -> Self {
        Self {
            retries: 0,
            retry_wait: Duration::ZERO,
            retry_codes: Vec::new(),
        }
    }

    pub fn is_retryable(&self, status: u16) -> bool {
        self.retry_codes.contains(&status)
    }

    /// Wait before retry number `attempt` (1-based)
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        self.retry_wait.saturating_mul(attempt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_retry_config() {
        let config = RetryConfig::default();

        assert_eq!(config.retries, 3);
        assert_eq!(config.retry_wait, Duration::from_secs(30));
        assert!(config.is_retryable(429));
        assert!(config.is_retryable(504));
        assert!(!config.is_retryable(500));
    }

    #[test]
    fn test_linear_backoff() {
        let config = RetryConfig {
            retries: 3,
            retry_wait: Duration::from_secs(2),
            retry_codes: vec![429],
        };

        assert_eq!(config.delay_for_attempt(1), Duration::from_secs(2));
        assert_eq!(config.delay_for_attempt(2), Duration::from_secs(4));
        assert_eq!(config.delay_for_attempt(3), Duration::from_secs(6));
    }

    #[test]
    fn test_disabled_config() {
        let config = RetryConfig::disabled();

        assert_eq!(config.retries, 0);
        assert!(!config.is_retryable(429));
    }
}
