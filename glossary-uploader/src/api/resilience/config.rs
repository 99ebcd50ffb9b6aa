//! Resilience configuration with builder pattern
//!
//! Bundles the retry policy and request timeout applied to every
//! catalog call.

use super::retry::RetryConfig;
use std::time::Duration;

/// Resilience configuration for catalog API operations
#[derive(Debug, Clone)]
pub struct ResilienceConfig {
    pub retry: RetryConfig,
    /// Per-request timeout; `None` leaves reqwest's default (no timeout)
    pub request_timeout: Option<Duration>,
}

impl Default for ResilienceConfig {
    fn default() -> Self {
        Self {
            retry: RetryConfig::default(),
            request_timeout: Some(Duration::from_secs(60)),
        }
    }
}

impl ResilienceConfig {
    /// Create a new builder for ResilienceConfig
    pub fn builder() -> ResilienceConfigBuilder {
        ResilienceConfigBuilder::new()
    }

    /// Disable retries (for testing)
    pub fn disabled() -> Self {
        Self {
            retry: RetryConfig::disabled(),
            request_timeout: None,
        }
    }
}

/// Builder for ResilienceConfig
#[derive(Debug)]
pub struct ResilienceConfigBuilder {
    config: ResilienceConfig,
}

impl ResilienceConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: ResilienceConfig::default(),
        }
    }

    /// Configure retry behavior
    pub fn retry_config(mut self, retry: RetryConfig) -> Self {
        self.config.retry = retry;
        self
    }

    /// Set number of retries after the first attempt
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.config.retry.retries = retries;
        self
    }

    /// Set the base wait between retries
    pub fn retry_wait(mut self, wait: Duration) -> Self {
        self.config.retry.retry_wait = wait;
        self
    }

    /// Set the HTTP statuses that are retried
    pub fn retry_codes(mut self, codes: Vec<u16>) -> Self {
        self.config.retry.retry_codes = codes;
        self
    }

    /// Set the per-request timeout
    pub fn request_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.config.request_timeout = timeout;
        self
    }

    /// Build the final configuration
    pub fn build(self) -> ResilienceConfig {
        self.config
    }
}

impl Default for ResilienceConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ResilienceConfig::default();

        assert_eq!(config.retry.retries, 3);
        assert_eq!(config.retry.retry_codes, vec![429, 504]);
        assert_eq!(config.request_timeout, Some(Duration::from_secs(60)));
    }

    #[test]
    fn test_disabled_config() {
        let config = ResilienceConfig::disabled();

        assert_eq!(config.retry.retries, 0);
        assert!(config.request_timeout.is_none());
    }

    #[test]
    fn test_builder_pattern() {
        let config = ResilienceConfig::builder()
            .max_retries(5)
            .retry_wait(Duration::from_millis(250))
            .retry_codes(vec![429, 502, 503])
            .request_timeout(None)
            .build();

        assert_eq!(config.retry.retries, 5);
        assert_eq!(config.retry.retry_wait, Duration::from_millis(250));
        assert!(config.retry.is_retryable(503));
        assert!(config.request_timeout.is_none());
    }
}
