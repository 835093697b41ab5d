use std::time::Duration;

use thiserror::Error;

/// Errors that can occur while querying a recipe provider
#[derive(Error, Debug)]
pub enum SearchError {
    /// The request did not complete before the client deadline
    #[error("Request timed out after {}ms", .0.as_millis())]
    NetworkTimeout(Duration),

    /// The provider answered with a non-success status
    #[error("HTTP {0}")]
    HttpStatus(u16),

    /// The response body was not the JSON the provider is expected to return
    #[error("Malformed response: {0}")]
    MalformedResponse(#[from] serde_json::Error),

    /// Connection or transport failure
    #[error("Request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(#[from] config::ConfigError),

    /// Builder or factory configuration error
    #[error("Builder error: {0}")]
    BuilderError(String),
}

impl SearchError {
    /// HTTP status carried by the error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            SearchError::HttpStatus(status) => Some(*status),
            _ => None,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, SearchError::NetworkTimeout(_))
    }
}
