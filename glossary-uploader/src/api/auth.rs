//! Bearer token providers

use chrono::{DateTime, Utc};

/// Prefix some deployments put in front of stored tokens
const SECRET_PREFIX: &str = "secret:";

/// When a token stops being valid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenExpiry {
    Never,
    At(DateTime<Utc>),
}

/// A bearer token and its expiry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessToken {
    pub token: String,
    pub expiry: TokenExpiry,
}

/// Supplies access tokens to the transport on demand
pub trait AuthProvider: Send + Sync {
    fn access_token(&self) -> anyhow::Result<AccessToken>;
}

/// Provider for a static JWT configured up front
#[derive(Debug, Clone)]
pub struct StaticTokenProvider {
    token: String,
}

impl StaticTokenProvider {
    pub fn create(token: &str) -> Self {
        let token = token.strip_prefix(SECRET_PREFIX).unwrap_or(token);
        Self {
            token: token.to_string(),
        }
    }
}

impl AuthProvider for StaticTokenProvider {
    fn access_token(&self) -> anyhow::Result<AccessToken> {
        Ok(AccessToken {
            token: self.token.clone(),
            expiry: TokenExpiry::Never,
        })
    }
}
