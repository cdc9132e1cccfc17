//! Error types for the Azure speech client.

use thiserror::Error;

/// Result type alias for Azure speech operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for Azure speech operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Non-success HTTP status returned by the service.
    #[error("azure speech: {message} (http={http_status})")]
    Api { http_status: u16, message: String },

    /// HTTP request error.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid configuration.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Invalid request.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Other error.
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Creates a new API error.
    pub fn api(http_status: u16, message: impl Into<String>) -> Self {
        Error::Api {
            http_status,
            message: message.into(),
        }
    }

    /// Returns the HTTP status of an API error.
    pub fn http_status(&self) -> Option<u16> {
        match self {
            Error::Api { http_status, .. } => Some(*http_status),
            Error::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Returns true if this is a rate limit error.
    pub fn is_rate_limit(&self) -> bool {
        self.http_status() == Some(429)
    }

    /// Returns true if the subscription key was rejected.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self.http_status(), Some(401) | Some(403))
    }

    /// Returns true if this is a server-side error.
    pub fn is_server_error(&self) -> bool {
        self.http_status().is_some_and(|s| s >= 500)
    }

    /// Returns true if the request timed out or could not connect.
    pub fn is_transport(&self) -> bool {
        match self {
            Error::Http(e) => e.is_timeout() || e.is_connect(),
            _ => false,
        }
    }

    /// Returns true if the request can be retried.
    pub fn is_retryable(&self) -> bool {
        self.is_rate_limit() || self.is_server_error() || self.is_transport()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification() {
        assert!(Error::api(429, "Too many requests").is_rate_limit());
        assert!(Error::api(429, "").is_retryable());
        assert!(Error::api(503, "").is_server_error());
        assert!(Error::api(500, "").is_retryable());
        assert!(Error::api(401, "").is_unauthorized());
        assert!(Error::api(403, "").is_unauthorized());
        assert!(!Error::api(400, "bad ssml").is_retryable());
        assert!(!Error::Config("missing key".to_string()).is_retryable());
    }

    #[test]
    fn test_display() {
        let err = Error::api(400, "SSML parsing error");
        assert_eq!(err.to_string(), "azure speech: SSML parsing error (http=400)");
        assert_eq!(err.http_status(), Some(400));
    }
}
