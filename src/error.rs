//! Error types for Shopchat
//!
//! This module defines all error types used throughout the application,
//! using `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Main error type for Shopchat operations
///
/// This enum encompasses all possible errors that can occur while talking
/// to the recommendation backend, managing the chat session, encoding
/// attachments, and driving evaluation jobs.
#[derive(Error, Debug)]
pub enum ShopchatError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Backend returned a non-success HTTP status
    #[error("Backend returned {status}: {message}")]
    Backend {
        /// HTTP status code reported by the backend
        status: u16,
        /// Response body text (may be empty)
        message: String,
    },

    /// Attachment encoding errors (unsupported data, size limit)
    #[error("Attachment error: {0}")]
    Attachment(String),

    /// Evaluation job errors (bad mode, malformed job handle)
    #[error("Evaluation error: {0}")]
    Eval(String),

    /// An evaluation job is already being polled by this client
    #[error("An evaluation job is already running; wait for it to finish")]
    JobAlreadyRunning,

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// HTTP request errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// URL parsing errors
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// Result type alias for Shopchat operations
///
/// This is a convenience alias that uses `anyhow::Error` as the error type,
/// allowing for rich error context and easy error propagation.
pub type Result<T> = anyhow::Result<T>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let error = ShopchatError::Config("invalid base URL".to_string());
        assert_eq!(error.to_string(), "Configuration error: invalid base URL");
    }

    #[test]
    fn test_backend_error_display() {
        let error = ShopchatError::Backend {
            status: 500,
            message: "Index not ready".to_string(),
        };
        assert_eq!(error.to_string(), "Backend returned 500: Index not ready");
    }

    #[test]
    fn test_attachment_error_display() {
        let error = ShopchatError::Attachment("image too large".to_string());
        assert_eq!(error.to_string(), "Attachment error: image too large");
    }

    #[test]
    fn test_job_already_running_display() {
        let error = ShopchatError::JobAlreadyRunning;
        assert!(error.to_string().contains("already running"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let error: ShopchatError = io_error.into();
        assert!(matches!(error, ShopchatError::Io(_)));
    }

    #[test]
    fn test_json_error_conversion() {
        let json_error = serde_json::from_str::<serde_json::Value>("{oops}").unwrap_err();
        let error: ShopchatError = json_error.into();
        assert!(matches!(error, ShopchatError::Serialization(_)));
    }

    #[test]
    fn test_yaml_error_conversion() {
        let yaml_error = serde_yaml::from_str::<serde_yaml::Value>("invalid: : yaml").unwrap_err();
        let error: ShopchatError = yaml_error.into();
        assert!(matches!(error, ShopchatError::Yaml(_)));
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ShopchatError>();
    }
}
