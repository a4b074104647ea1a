//! Error types for the SmartAPI integration.
//!
//! Distinguishes transport failures (retryable) from broker rejections
//! (terminal) so the monitor loop can decide between retry-after-delay
//! and shutdown.

use thiserror::Error;

/// Errors that can occur when talking to SmartAPI.
#[derive(Debug, Error)]
pub enum SmartApiError {
    /// Login or token refresh failed.
    #[error("authentication error: {0}")]
    Authentication(String),

    /// HTTP request returned a non-success status.
    #[error("API error: {status_code} - {message}")]
    Api {
        /// HTTP status code.
        status_code: u16,
        /// Error message from the response body.
        message: String,
    },

    /// Request succeeded at the HTTP layer but the broker envelope
    /// carried `status: false`.
    #[error("broker error {errorcode}: {message}")]
    Broker {
        /// SmartAPI error code (e.g. "AB1004").
        errorcode: String,
        /// Human-readable message from the broker.
        message: String,
    },

    /// Rate limit exceeded.
    #[error("rate limit exceeded, retry after {retry_after_secs}s")]
    RateLimit {
        /// Seconds to wait before retry.
        retry_after_secs: u64,
    },

    /// Network error.
    #[error("network error: {0}")]
    Network(String),

    /// Request timeout.
    #[error("request timeout: {0}")]
    Timeout(String),

    /// Invalid order parameters.
    #[error("invalid order: {0}")]
    InvalidOrder(String),

    /// Order rejected by the broker.
    #[error("order rejected: {0}")]
    OrderRejected(String),

    /// Scrip lookup returned no match.
    #[error("scrip not found: {query}")]
    ScripNotFound {
        /// The tradingsymbol that was searched for.
        query: String,
    },

    /// Configuration error (missing env vars, bad values).
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl SmartApiError {
    /// Creates an API error from status code and message.
    pub fn api(status_code: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status_code,
            message: message.into(),
        }
    }

    /// Creates a broker envelope error.
    pub fn broker(errorcode: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Broker {
            errorcode: errorcode.into(),
            message: message.into(),
        }
    }

    /// Creates a rate limit error.
    pub fn rate_limit(retry_after_secs: u64) -> Self {
        Self::RateLimit { retry_after_secs }
    }

    /// Creates a scrip not found error.
    pub fn scrip_not_found(query: impl Into<String>) -> Self {
        Self::ScripNotFound {
            query: query.into(),
        }
    }

    /// Returns true if the request should be retried after a delay.
    ///
    /// Data-fetch failures (network, timeout, rate limit, 5xx) are
    /// transient; everything else terminates the caller's loop.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Network(_) | Self::Timeout(_) | Self::RateLimit { .. } => true,
            Self::Api { status_code, .. } => *status_code >= 500,
            _ => false,
        }
    }

    /// Suggested retry delay in seconds, if the error is transient.
    #[must_use]
    pub fn retry_delay_secs(&self) -> Option<u64> {
        match self {
            Self::RateLimit { retry_after_secs } => Some(*retry_after_secs),
            Self::Network(_) | Self::Timeout(_) => Some(5),
            Self::Api { status_code, .. } if *status_code >= 500 => Some(5),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for SmartApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err.to_string())
        } else if err.is_connect() {
            Self::Network(format!("connection failed: {err}"))
        } else {
            Self::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for SmartApiError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Result type alias for SmartAPI operations.
pub type Result<T> = std::result::Result<T, SmartApiError>;
