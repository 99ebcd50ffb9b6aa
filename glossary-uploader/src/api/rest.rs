//! HTTP transport for the catalog REST API
//!
//! Wraps a `reqwest::Client` with bearer token injection, extra header
//! interpolation and linear retries on configured statuses. Every call
//! returns an [`Outcome`] so callers decide whether an exhausted retry or a
//! swallowed transport failure is fatal for them.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, TimeDelta, Utc};
use log::{debug, error, warn};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Method};
use serde_json::Value;

use super::auth::{AuthProvider, TokenExpiry};
use super::error::ApiError;
use super::resilience::ResilienceConfig;

/// Tokens are refreshed this long before they expire
const TOKEN_EXPIRY_MARGIN_SECS: i64 = 120;

const JSON_CONTENT_TYPE: &str = "application/json";
const JSON_PATCH_CONTENT_TYPE: &str = "application/json-patch+json";

const ALLOWED_SCHEMES: [&str; 4] = ["http://", "https://", "ws://", "wss://"];

/// Transport configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API root, e.g. `http://localhost:8585/api`
    pub base_url: String,
    pub api_version: String,
    /// Header carrying the access token
    pub auth_header: String,
    /// Scheme prefixed to the token, e.g. `Bearer`
    pub auth_token_mode: Option<String>,
    /// Extra headers; values may reference computed headers as `%(Name)s`
    pub extra_headers: BTreeMap<String, String>,
    pub resilience: ResilienceConfig,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_version: "v1".to_string(),
            auth_header: "Authorization".to_string(),
            auth_token_mode: Some("Bearer".to_string()),
            extra_headers: BTreeMap::new(),
            resilience: ResilienceConfig::default(),
        }
    }
}

/// Result of a transport call that did not hard-fail
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Success with a JSON body
    Body(Value),
    /// Success without a (parseable) body
    Empty,
    /// Retryable status persisted through every retry
    RetryExhausted { status: u16 },
    /// Request failed before a response arrived; already logged
    TransportFailed(String),
}

impl Outcome {
    /// JSON body, if any
    pub fn into_body(self) -> Option<Value> {
        match self {
            Outcome::Body(value) => Some(value),
            _ => None,
        }
    }
}

/// Why a single attempt did not produce a final result
enum AttemptError {
    Retryable(u16),
    Connect(reqwest::Error),
}

struct CachedToken {
    value: String,
    refresh_after: Option<DateTime<Utc>>,
}

impl CachedToken {
    fn is_stale(&self) -> bool {
        self.refresh_after.is_some_and(|at| Utc::now() >= at)
    }
}

pub struct RestClient {
    http: Client,
    config: ClientConfig,
    base_url: String,
    auth: Option<Arc<dyn AuthProvider>>,
    token: Mutex<Option<CachedToken>>,
    log_target: &'static str,
}

impl RestClient {
    pub fn new(
        config: ClientConfig,
        auth: Option<Arc<dyn AuthProvider>>,
    ) -> Result<Self, ApiError> {
        let base_url = validate_base_url(&config.base_url)?;

        let mut builder = Client::builder();
        if let Some(timeout) = config.resilience.request_timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| ApiError::Configuration(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            config,
            base_url,
            auth,
            token: Mutex::new(None),
            log_target: module_path!(),
        })
    }

    /// Route this client's log records to `target`
    pub fn with_log_target(mut self, target: &'static str) -> Self {
        self.log_target = target;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn get(&self, path: &str, query: &[(String, String)]) -> Result<Outcome, ApiError> {
        self.request(Method::GET, path, query, None, JSON_CONTENT_TYPE)
            .await
    }

    pub async fn post(&self, path: &str, body: Option<String>) -> Result<Outcome, ApiError> {
        self.request(Method::POST, path, &[], body, JSON_CONTENT_TYPE)
            .await
    }

    pub async fn put(&self, path: &str, body: Option<String>) -> Result<Outcome, ApiError> {
        self.request(Method::PUT, path, &[], body, JSON_CONTENT_TYPE)
            .await
    }

    pub async fn patch(&self, path: &str, body: Option<String>) -> Result<Outcome, ApiError> {
        self.request(Method::PATCH, path, &[], body, JSON_PATCH_CONTENT_TYPE)
            .await
    }

    pub async fn delete(&self, path: &str) -> Result<Outcome, ApiError> {
        self.request(Method::DELETE, path, &[], None, JSON_CONTENT_TYPE)
            .await
    }

    /// Release the underlying connection pool
    pub fn close(self) {
        debug!(target: self.log_target, "Closing HTTP session for {}", self.base_url);
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}{}", self.base_url, self.config.api_version, path)
    }

    async fn request(
        &self,
        method: Method,
        path: &str,
        query: &[(String, String)],
        body: Option<String>,
        content_type: &str,
    ) -> Result<Outcome, ApiError> {
        let url = self.url(path);
        let headers = self.headers(content_type)?;
        let retry = &self.config.resilience.retry;
        let total_retries = retry.retries;
        let mut remaining = total_retries;
        let mut reconnected = false;

        loop {
            match self
                .one_request(&method, &url, &headers, query, body.as_deref())
                .await
            {
                Ok(outcome) => return outcome,
                Err(AttemptError::Retryable(status)) if remaining > 0 => {
                    let attempt = total_retries - remaining + 1;
                    let wait = retry.delay_for_attempt(attempt);
                    warn!(
                        target: self.log_target,
                        "Got {} - sleep {:?} and retrying {} {} more time(s)...",
                        status, wait, url, remaining
                    );
                    tokio::time::sleep(wait).await;
                    remaining -= 1;
                }
                Err(AttemptError::Retryable(status)) => {
                    error!(target: self.log_target, "No more retries left for {}", url);
                    return Ok(Outcome::RetryExhausted { status });
                }
                Err(AttemptError::Connect(err)) if !reconnected => {
                    warn!(
                        target: self.log_target,
                        "Connection error calling [{}] with method [{}], retrying once: {}",
                        url, method, err
                    );
                    reconnected = true;
                }
                Err(AttemptError::Connect(err)) => return Err(ApiError::Connection(err)),
            }
        }
    }

    /// Perform one request. Retryable statuses and connection failures are
    /// reported to the caller's loop; everything else is final.
    async fn one_request(
        &self,
        method: &Method,
        url: &str,
        headers: &HeaderMap,
        query: &[(String, String)],
        body: Option<&str>,
    ) -> Result<Result<Outcome, ApiError>, AttemptError> {
        let mut builder = self
            .http
            .request(method.clone(), url)
            .headers(headers.clone());
        if !query.is_empty() {
            builder = builder.query(query);
        }
        if let Some(body) = body {
            builder = builder.body(body.to_string());
        }

        let response = match builder.send().await {
            Ok(response) => response,
            Err(err) if err.is_connect() => return Err(AttemptError::Connect(err)),
            Err(err) => {
                warn!(
                    target: self.log_target,
                    "Unexpected error calling [{}] with method [{}]: {}",
                    url, method, err
                );
                return Ok(Ok(Outcome::TransportFailed(err.to_string())));
            }
        };

        let status = response.status().as_u16();
        let text = match response.text().await {
            Ok(text) => text,
            Err(err) => {
                warn!(
                    target: self.log_target,
                    "Failed to read response body from [{}]: {}",
                    url, err
                );
                return Ok(Ok(Outcome::TransportFailed(err.to_string())));
            }
        };

        if (200..300).contains(&status) {
            return Ok(Ok(self.parse_body(url, &text)));
        }

        if self.config.resilience.retry.is_retryable(status) {
            return Err(AttemptError::Retryable(status));
        }

        debug!(
            target: self.log_target,
            "{} {} failed with status {}: {}",
            method, url, status, text
        );
        Ok(Err(error_from_response(status, text)))
    }

    fn parse_body(&self, url: &str, text: &str) -> Outcome {
        if text.trim().is_empty() {
            return Outcome::Empty;
        }
        match serde_json::from_str(text) {
            Ok(value) => Outcome::Body(value),
            Err(err) => {
                warn!(
                    target: self.log_target,
                    "Unexpected error while reading response from [{}] as JSON - {}",
                    url, err
                );
                Outcome::Empty
            }
        }
    }

    fn headers(&self, content_type: &str) -> Result<HeaderMap, ApiError> {
        let mut computed = BTreeMap::new();
        computed.insert("Content-type".to_string(), content_type.to_string());

        if let Some(token) = self.current_token()? {
            let value = match &self.config.auth_token_mode {
                Some(mode) => format!("{} {}", mode, token),
                None => token,
            };
            computed.insert(self.config.auth_header.clone(), value);
        }

        let extra = interpolate_headers(&self.config.extra_headers, &computed)?;
        computed.extend(extra);

        let mut headers = HeaderMap::new();
        for (name, value) in computed {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| ApiError::Configuration(format!("Invalid header name '{}': {}", name, e)))?;
            let value = HeaderValue::from_str(&value).map_err(|e| {
                ApiError::Configuration(format!(
                    "Invalid value for header '{}': {}",
                    name.as_str(),
                    e
                ))
            })?;
            headers.insert(name, value);
        }
        Ok(headers)
    }

    /// Cached token, refreshed from the provider when missing or stale
    fn current_token(&self) -> Result<Option<String>, ApiError> {
        let Some(auth) = &self.auth else {
            return Ok(None);
        };

        let mut cached = self.token.lock().unwrap_or_else(PoisonError::into_inner);
        if cached.as_ref().is_none_or(CachedToken::is_stale) {
            let access = auth.access_token().map_err(|e| {
                ApiError::Configuration(format!("Failed to obtain access token: {:#}", e))
            })?;
            let refresh_after = match access.expiry {
                TokenExpiry::Never => None,
                TokenExpiry::At(expiry) => {
                    Some(expiry - TimeDelta::seconds(TOKEN_EXPIRY_MARGIN_SECS))
                }
            };
            debug!(target: self.log_target, "Fetched access token (refresh after {:?})", refresh_after);
            *cached = Some(CachedToken {
                value: access.token,
                refresh_after,
            });
        }

        Ok(cached.as_ref().map(|token| token.value.clone()))
    }
}

/// Check the URL scheme and strip trailing slashes
pub(crate) fn validate_base_url(base_url: &str) -> Result<String, ApiError> {
    if !ALLOWED_SCHEMES
        .iter()
        .any(|scheme| base_url.starts_with(scheme))
    {
        return Err(ApiError::Configuration(format!(
            "Passed string value \"{}\" is not an \"http*://\" or \"ws*://\" URL",
            base_url
        )));
    }
    Ok(base_url.trim_end_matches('/').to_string())
}

/// Build the typed error for a non-retryable failure status
fn error_from_response(status: u16, text: String) -> ApiError {
    if let Ok(Value::Object(body)) = serde_json::from_str::<Value>(&text) {
        if let Some(code) = body.get("code") {
            let code = match code {
                Value::String(code) => code.clone(),
                other => other.to_string(),
            };
            let message = body
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string();
            return ApiError::Remote {
                status,
                code,
                message,
            };
        }
    }
    ApiError::Http { status, body: text }
}

/// Resolve `%(Name)s` references in extra header values against `computed`
pub fn interpolate_headers(
    extra: &BTreeMap<String, String>,
    computed: &BTreeMap<String, String>,
) -> Result<BTreeMap<String, String>, ApiError> {
    extra
        .iter()
        .map(|(name, template)| Ok((name.clone(), interpolate(template, computed)?)))
        .collect()
}

/// `%%` is a literal percent sign
fn interpolate(template: &str, headers: &BTreeMap<String, String>) -> Result<String, ApiError> {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find('%') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        if let Some(tail) = after.strip_prefix('%') {
            out.push('%');
            rest = tail;
            continue;
        }
        let Some(reference) = after.strip_prefix('(') else {
            out.push('%');
            rest = after;
            continue;
        };
        let Some(end) = reference.find(")s") else {
            out.push_str(&rest[start..]);
            return Ok(out);
        };
        let name = &reference[..end];
        let value = headers.get(name).ok_or_else(|| {
            ApiError::Configuration(format!(
                "Extra header references unknown header '{}'",
                name
            ))
        })?;
        out.push_str(value);
        rest = &reference[end + 2..];
    }

    out.push_str(rest);
    Ok(out)
}
