//! Error types used throughout the application

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for calcache
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum CalCacheError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Configuration error: {0}")]
    Config(String),

    /// The calendar provider could not be reached or rejected the request.
    #[error("Network error: {0}")]
    Network(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    /// The provider answered, but without the payload we need.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// The cache store failed. Never downgraded to a cache miss.
    #[error("Cache store error: {0}")]
    CacheStore(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CalCacheError {
    /// Error raised when a free/busy payload carries no `calendars` field.
    pub fn no_response(provider: &str) -> Self {
        Self::MalformedResponse(format!("no response from {provider}"))
    }
}

/// Result type alias for calcache operations
pub type Result<T> = std::result::Result<T, CalCacheError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_as_tagged_object() {
        let err = CalCacheError::Network("timeout".into());
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json, serde_json::json!({ "type": "Network", "message": "timeout" }));
    }

    #[test]
    fn no_response_names_provider() {
        let err = CalCacheError::no_response("google calendar");
        assert_eq!(err.to_string(), "Malformed response: no response from google calendar");
    }
}
