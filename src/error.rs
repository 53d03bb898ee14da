//! StudyJournal error types

use thiserror::Error;

/// StudyJournal error type
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Storage error (unreadable or corrupt document)
    #[error("Storage error: {0}")]
    Storage(String),

    /// Invalid input to a manager or endpoint
    #[error("Validation error: {0}")]
    Validation(String),

    /// Upstream model error
    #[error("Upstream error: {0}")]
    Upstream(#[from] crate::proxy::UpstreamError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// HTTP error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Result type alias for StudyJournal operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::Validation("hours must be non-negative".to_string());
        assert_eq!(err.to_string(), "Validation error: hours must be non-negative");
    }

    #[test]
    fn test_upstream_conversion() {
        let err: Error = crate::proxy::UpstreamError::RateLimited { attempts: 3 }.into();
        assert!(matches!(err, Error::Upstream(_)));
        assert!(err.to_string().contains("Rate limited"));
    }
}
