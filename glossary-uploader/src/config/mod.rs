//! Configuration loading
//!
//! Values are resolved in order: command line flags, environment variables
//! (a `.env` file is loaded at startup), the TOML settings file, built-in
//! defaults. The settings file lives at
//! `<config dir>/glossary-uploader/config.toml` unless `--config` points
//! elsewhere:
//!
//! ```toml
//! [server]
//! host_port = "http://localhost:8585/api"
//! jwt_token = "eyJraWQiOi..."
//!
//! [server.extra_headers]
//! Proxy-Authorization = "%(Authorization)s"
//!
//! [retry]
//! retries = 3
//! retry_wait_secs = 30
//! retry_codes = [429, 504]
//! ```

pub mod server;

pub use server::ServerConnection;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use serde::Deserialize;

use crate::api::{ResilienceConfig, RetryConfig};

pub const ENV_SERVER: &str = "GLOSSARY_SERVER";
pub const ENV_JWT_TOKEN: &str = "GLOSSARY_JWT_TOKEN";
pub const ENV_API_VERSION: &str = "API_VERSION";

const APP_DIR: &str = "glossary-uploader";
const CONFIG_FILE: &str = "config.toml";

/// Contents of the settings file
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub server: ServerSettings,
    pub retry: RetrySettings,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerSettings {
    /// API root including `/api`
    pub host_port: Option<String>,
    pub api_version: Option<String>,
    pub jwt_token: Option<String>,
    pub enable_version_validation: Option<bool>,
    pub limit_records: Option<u32>,
    pub request_timeout_secs: Option<u64>,
    pub extra_headers: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RetrySettings {
    pub retries: Option<u32>,
    pub retry_wait_secs: Option<u64>,
    pub retry_codes: Option<Vec<u16>>,
}

/// Connection values given on the command line
#[derive(Debug, Clone, Default)]
pub struct ConnectionOverrides {
    /// Server root, e.g. `http://localhost:8585`
    pub server: Option<String>,
    pub token: Option<String>,
    pub api_version: Option<String>,
    pub skip_version_check: bool,
}

impl Settings {
    /// Default settings file location
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
    }

    /// Load settings from `path`, or from the default location if it exists
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => {
                if !path.exists() {
                    bail!("Config file does not exist: {}", path.display());
                }
                path.to_path_buf()
            }
            None => match Self::default_path() {
                Some(path) if path.exists() => path,
                _ => {
                    log::debug!("No settings file found, using defaults");
                    return Ok(Self::default());
                }
            },
        };

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let settings = Self::parse(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        log::debug!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Resolve the server connection from flags, environment and file
    pub fn server_connection<F>(
        &self,
        overrides: &ConnectionOverrides,
        env: F,
    ) -> Result<ServerConnection>
    where
        F: Fn(&str) -> Option<String>,
    {
        let file = &self.server;

        let mut connection = match overrides.server.clone().or_else(|| env(ENV_SERVER)) {
            Some(server) => ServerConnection::from_server(&server)?,
            None => match &file.host_port {
                Some(host_port) => ServerConnection::new(host_port.as_str())?,
                None => bail!(
                    "No server configured. Pass --server, set {} or add server.host_port to the config file",
                    ENV_SERVER
                ),
            },
        };

        if let Some(version) = overrides
            .api_version
            .clone()
            .or_else(|| env(ENV_API_VERSION))
            .or_else(|| file.api_version.clone())
        {
            connection = connection.with_api_version(version);
        }

        if let Some(token) = overrides
            .token
            .clone()
            .or_else(|| env(ENV_JWT_TOKEN))
            .or_else(|| file.jwt_token.clone())
        {
            connection = connection.with_token(token);
        }

        let validate = !overrides.skip_version_check && file.enable_version_validation.unwrap_or(true);
        connection = connection.with_version_validation(validate);

        if let Some(limit) = file.limit_records {
            connection = connection.with_limit_records(limit);
        }

        Ok(connection.with_extra_headers(file.extra_headers.clone()))
    }

    /// Retry and timeout settings for the HTTP transport
    pub fn resilience(&self) -> ResilienceConfig {
        let defaults = RetryConfig::default();
        let retry = RetryConfig {
            retries: self.retry.retries.unwrap_or(defaults.retries),
            retry_wait: self
                .retry
                .retry_wait_secs
                .map(Duration::from_secs)
                .unwrap_or(defaults.retry_wait),
            retry_codes: self.retry.retry_codes.clone().unwrap_or(defaults.retry_codes),
        };

        let mut builder = ResilienceConfig::builder().retry_config(retry);
        if let Some(secs) = self.server.request_timeout_secs {
            builder = builder.request_timeout(Some(Duration::from_secs(secs)));
        }
        builder.build()
    }
}
