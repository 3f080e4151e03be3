//! Error handling for lookup operations.
//!
//! One error type covers every way a lookup can fail, from unusable input
//! to upstream rejections. Batch operations never surface these for a single
//! failing item; they only reach callers for input validated up front.

use std::time::Duration;
use thiserror::Error;

/// Classification of an upstream HTTP rejection into a small, fixed set of
/// user-facing codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpstreamRejection {
    /// Missing or invalid API key (HTTP 401)
    AuthFailed,
    /// Key is valid but not subscribed to the API plan (HTTP 403)
    NotSubscribed,
    /// Upstream quota exceeded (HTTP 429)
    RateLimited,
    /// Upstream refused the request parameters (HTTP 400/422)
    BadRequest,
    /// Upstream failed internally (HTTP 5xx)
    ServerError,
    /// Anything else
    Other,
}

impl UpstreamRejection {
    /// Map an upstream HTTP status code to its rejection class.
    pub fn from_status(status_code: u16) -> Self {
        match status_code {
            401 => Self::AuthFailed,
            403 => Self::NotSubscribed,
            429 => Self::RateLimited,
            400 | 422 => Self::BadRequest,
            500..=599 => Self::ServerError,
            _ => Self::Other,
        }
    }

    /// Stable code string shown to users and returned by the proxy.
    pub fn code(&self) -> &'static str {
        match self {
            Self::AuthFailed => "AUTH_FAILED",
            Self::NotSubscribed => "NOT_SUBSCRIBED",
            Self::RateLimited => "RATE_LIMITED",
            Self::BadRequest => "BAD_REQUEST",
            Self::ServerError => "UPSTREAM_ERROR",
            Self::Other => "UPSTREAM_ERROR",
        }
    }
}

impl std::fmt::Display for UpstreamRejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            Self::AuthFailed => "authentication failed",
            Self::NotSubscribed => "not subscribed",
            Self::RateLimited => "rate limited",
            Self::BadRequest => "bad request",
            Self::ServerError => "server error",
            Self::Other => "unexpected response",
        };
        f.write_str(text)
    }
}

/// Main error type for lookup operations.
#[derive(Debug, Clone, Error)]
pub enum DomainScoutError {
    /// Query or domain unusable before any lookup starts
    #[error("Invalid query '{query}': {reason}")]
    InvalidQuery { query: String, reason: String },

    /// Transport failure: nothing usable came back from the upstream
    #[error("Network error: {message}{}", source_suffix(.detail))]
    Network {
        message: String,
        detail: Option<String>,
    },

    /// The upstream answered with an error status
    #[error("Upstream {kind} (HTTP {status_code}): {message}")]
    Upstream {
        kind: UpstreamRejection,
        status_code: u16,
        message: String,
        retry_after: Option<Duration>,
    },

    /// The upstream answered successfully but without a status entry
    #[error("No status returned for '{domain}'")]
    MissingStatus { domain: String },

    /// Operation exceeded its time bound
    #[error("Timeout after {duration:?} during: {operation}")]
    Timeout {
        operation: String,
        duration: Duration,
    },

    /// Unparseable response body
    #[error("Parse error: {message}")]
    Parse { message: String },

    /// Invalid settings
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Reading or writing a file failed
    #[error("File error at '{path}': {message}")]
    File { path: String, message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

fn source_suffix(detail: &Option<String>) -> String {
    detail
        .as_ref()
        .map(|d| format!(" (source: {})", d))
        .unwrap_or_default()
}

impl DomainScoutError {
    /// Create a new invalid query error.
    pub fn invalid_query<Q: Into<String>, R: Into<String>>(query: Q, reason: R) -> Self {
        Self::InvalidQuery {
            query: query.into(),
            reason: reason.into(),
        }
    }

    /// Create a new network error.
    pub fn network<M: Into<String>>(message: M) -> Self {
        Self::Network {
            message: message.into(),
            detail: None,
        }
    }

    /// Create a new network error with source information.
    pub fn network_with_source<M: Into<String>, S: Into<String>>(message: M, source: S) -> Self {
        Self::Network {
            message: message.into(),
            detail: Some(source.into()),
        }
    }

    /// Create an upstream rejection from an HTTP status code.
    pub fn upstream<M: Into<String>>(status_code: u16, message: M) -> Self {
        Self::Upstream {
            kind: UpstreamRejection::from_status(status_code),
            status_code,
            message: message.into(),
            retry_after: None,
        }
    }

    /// Create a new timeout error.
    pub fn timeout<O: Into<String>>(operation: O, duration: Duration) -> Self {
        Self::Timeout {
            operation: operation.into(),
            duration,
        }
    }

    /// Create a new configuration error.
    pub fn config<M: Into<String>>(message: M) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new file error.
    pub fn file_error<P: Into<String>, M: Into<String>>(path: P, message: M) -> Self {
        Self::File {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a new internal error.
    pub fn internal<M: Into<String>>(message: M) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Stable, user-facing code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidQuery { .. } => "INVALID_QUERY",
            Self::Network { .. } => "NETWORK_ERROR",
            Self::Upstream { kind, .. } => kind.code(),
            Self::MissingStatus { .. } => "NO_STATUS",
            Self::Timeout { .. } => "TIMEOUT",
            Self::Parse { .. } => "PARSE_ERROR",
            Self::Config { .. } => "CONFIG_ERROR",
            Self::File { .. } => "FILE_ERROR",
            Self::Internal { .. } => "INTERNAL_ERROR",
        }
    }

    /// Check if this error suggests the operation should be retried.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Network { .. }
                | Self::Timeout { .. }
                | Self::Upstream {
                    kind: UpstreamRejection::RateLimited | UpstreamRejection::ServerError,
                    ..
                }
        )
    }
}

impl From<reqwest::Error> for DomainScoutError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::timeout("HTTP request", Duration::from_secs(10))
        } else if err.is_connect() {
            Self::network_with_source("Connection failed", err.to_string())
        } else if err.is_decode() {
            Self::Parse {
                message: format!("Response body could not be decoded: {}", err),
            }
        } else {
            Self::network_with_source("HTTP request failed", err.to_string())
        }
    }
}

impl From<serde_json::Error> for DomainScoutError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse {
            message: format!("JSON parsing failed: {}", err),
        }
    }
}

impl From<toml::de::Error> for DomainScoutError {
    fn from(err: toml::de::Error) -> Self {
        Self::config(format!("Failed to parse TOML configuration: {}", err))
    }
}

impl From<std::io::Error> for DomainScoutError {
    fn from(err: std::io::Error) -> Self {
        Self::Internal {
            message: format!("I/O error: {}", err),
        }
    }
}
