//! Catalog server connection settings

use std::collections::BTreeMap;

use crate::api::ApiError;
use crate::api::rest::validate_base_url;

pub const DEFAULT_API_VERSION: &str = "v1";
pub const DEFAULT_LIMIT_RECORDS: u32 = 1000;

/// How to reach the catalog server. Built once at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConnection {
    /// API root including the `/api` segment, e.g. `http://localhost:8585/api`
    pub host_port: String,
    pub api_version: String,
    pub jwt_token: Option<String>,
    /// Check `/system/version` before doing any work
    pub enable_version_validation: bool,
    /// Page size for listings
    pub limit_records: u32,
    pub extra_headers: Option<BTreeMap<String, String>>,
}

impl ServerConnection {
    /// Connection to an API root such as `http://localhost:8585/api`
    pub fn new(host_port: impl Into<String>) -> Result<Self, ApiError> {
        let host_port = validate_base_url(&host_port.into())?;
        Ok(Self {
            host_port,
            api_version: DEFAULT_API_VERSION.to_string(),
            jwt_token: None,
            enable_version_validation: true,
            limit_records: DEFAULT_LIMIT_RECORDS,
            extra_headers: None,
        })
    }

    /// Connection to a server root such as `http://localhost:8585`; the
    /// `/api` segment is appended when missing
    pub fn from_server(server: &str) -> Result<Self, ApiError> {
        let server = server.trim_end_matches('/');
        if server.ends_with("/api") {
            Self::new(server)
        } else {
            Self::new(format!("{}/api", server))
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.jwt_token = Some(token.into());
        self
    }

    pub fn with_api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = version.into();
        self
    }

    pub fn with_version_validation(mut self, enabled: bool) -> Self {
        self.enable_version_validation = enabled;
        self
    }

    pub fn with_limit_records(mut self, limit: u32) -> Self {
        self.limit_records = limit;
        self
    }

    pub fn with_extra_headers(mut self, headers: BTreeMap<String, String>) -> Self {
        self.extra_headers = if headers.is_empty() {
            None
        } else {
            Some(headers)
        };
        self
    }
}
