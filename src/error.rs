//! Error types for graphaudit

use std::time::Duration;
use thiserror::Error;

/// Result type alias for graphaudit operations
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type for the application
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Batch(#[from] BatchError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Interactive prompt error: {0}")]
    Dialoguer(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV export error: {0}")]
    Csv(String),

    #[error("Operation failed: {0}")]
    Other(String),
}

impl From<dialoguer::Error> for Error {
    fn from(err: dialoguer::Error) -> Self {
        Error::Dialoguer(err.to_string())
    }
}

impl From<csv::Error> for Error {
    fn from(err: csv::Error) -> Self {
        Error::Csv(err.to_string())
    }
}

/// Directory API errors
#[derive(Debug, Error, Clone)]
pub enum ApiError {
    #[error("Authentication failed. Provide a Graph access token with --token or `graphaudit init`.")]
    Unauthorized,

    #[error("Access denied. The token lacks the directory permissions for this query.")]
    Forbidden,

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Rate limit exceeded. Retry after {0:?}")]
    RateLimit(Duration),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Server error: {0}")]
    ServerError(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid API response: {0}")]
    InvalidResponse(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Network("Request timed out".to_string())
        } else if err.is_connect() {
            ApiError::Network("Failed to connect to Graph API".to_string())
        } else {
            ApiError::Network(err.to_string())
        }
    }
}

impl ApiError {
    /// Whether retrying the same request with fewer filter values might succeed.
    ///
    /// Graph reports an oversized `in` clause or URL as a 400; everything else
    /// (auth, throttling, outages) is unrelated to batch size.
    pub fn is_filter_limit(&self) -> bool {
        matches!(self, ApiError::BadRequest(_))
    }
}

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file not found. Run `graphaudit init` to set up.")]
    NotFound,

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Failed to save configuration: {0}")]
    SaveError(String),

    #[error("Access token not configured. Pass --token, set GRAPHAUDIT_TOKEN, or run `graphaudit init`.")]
    MissingToken,
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(err: serde_yaml::Error) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}

/// Batch partitioning errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BatchError {
    #[error("Batch size must be between {min} and {max}, got {actual}")]
    InvalidBatchSize { min: usize, max: usize, actual: usize },
}
