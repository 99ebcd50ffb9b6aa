//! Error types for catalog API interactions

/// Errors surfaced by the transport and the typed catalog client
#[derive(Debug)]
pub enum ApiError {
    /// Invalid client configuration (bad URL scheme, bad header, ...)
    Configuration(String),
    /// Entity type has no entry in the route table
    RouteNotFound { type_name: String },
    /// A write was attempted with a payload that is not a create request
    InvalidOperation { method: &'static str, type_name: String },
    /// Server answered with success but no body where one was expected
    EmptyResponse { method: &'static str, path: String },
    /// Server returned a structured error body
    Remote {
        status: u16,
        code: String,
        message: String,
    },
    /// Server returned an error status without a structured body
    Http { status: u16, body: String },
    /// Connection could not be established, even after one blind retry
    Connection(reqwest::Error),
    /// Retryable status persisted after every configured retry
    RetriesExhausted {
        method: &'static str,
        path: String,
        status: u16,
    },
    /// Request failed for a reason other than connectivity (timeout, body read)
    Transport(String),
    /// Response body did not match the expected entity shape
    Decode {
        type_name: &'static str,
        source: serde_json::Error,
    },
    /// Version endpoint did not report a server version
    ServerUnavailable { host: String },
}

impl ApiError {
    /// HTTP status code of the failed response, when there was one
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ApiError::Remote { status, .. }
            | ApiError::Http { status, .. }
            | ApiError::RetriesExhausted { status, .. } => Some(*status),
            ApiError::Connection(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Whether the server reported that the entity does not exist
    pub fn is_not_found(&self) -> bool {
        match self {
            ApiError::Remote { status, code, .. } => *status == 404 || code == "404",
            ApiError::Http { status, .. } => *status == 404,
            _ => false,
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::Configuration(msg) => write!(f, "Invalid configuration: {}", msg),
            ApiError::RouteNotFound { type_name } => {
                write!(f, "Missing {} type when generating suffixes", type_name)
            }
            ApiError::InvalidOperation { method, type_name } => write!(
                f,
                "{} operations need a create request, not {}",
                method, type_name
            ),
            ApiError::EmptyResponse { method, path } => {
                write!(f, "Got an empty response when trying to {} {}", method, path)
            }
            ApiError::Remote {
                status,
                code,
                message,
            } => write!(f, "API error {} (code {}): {}", status, code, message),
            ApiError::Http { status, body } => {
                if body.is_empty() {
                    write!(f, "HTTP error {}", status)
                } else {
                    write!(f, "HTTP error {}: {}", status, body)
                }
            }
            ApiError::Connection(err) => write!(f, "Connection failed: {}", err),
            ApiError::RetriesExhausted {
                method,
                path,
                status,
            } => write!(
                f,
                "No more retries left for {} {} (last status {})",
                method, path, status
            ),
            ApiError::Transport(msg) => write!(f, "Request failed: {}", msg),
            ApiError::Decode { type_name, source } => {
                write!(f, "Failed to decode {} from response: {}", type_name, source)
            }
            ApiError::ServerUnavailable { host } => {
                write!(f, "Server is not available: {}", host)
            }
        }
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ApiError::Connection(err) => Some(err),
            ApiError::Decode { source, .. } => Some(source),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_detection() {
        let remote = ApiError::Remote {
            status: 404,
            code: "404".to_string(),
            message: "glossary instance for x not found".to_string(),
        };
        assert!(remote.is_not_found());
        assert_eq!(remote.status_code(), Some(404));

        let http = ApiError::Http {
            status: 500,
            body: String::new(),
        };
        assert!(!http.is_not_found());
        assert_eq!(http.to_string(), "HTTP error 500");

        let route = ApiError::RouteNotFound {
            type_name: "Table".to_string(),
        };
        assert!(!route.is_not_found());
        assert_eq!(route.status_code(), None);
    }
}
