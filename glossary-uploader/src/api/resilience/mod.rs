//! Retry and timeout policies for catalog API interactions

pub mod config;
pub mod retry;

pub use config::{ResilienceConfig, ResilienceConfigBuilder};
pub use retry::RetryConfig;
