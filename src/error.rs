//! Error types for Fitsage
//!
//! This module defines all error types used throughout the application,
//! using `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Main error type for Fitsage operations
///
/// This enum encompasses all possible errors that can occur during
/// chat sessions, transport streaming, configuration loading, and
/// structured plan/summary parsing.
#[derive(Error, Debug)]
pub enum FitsageError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Transport errors (network or remote-service failure)
    #[error("Transport error: {0}")]
    Transport(String),

    /// Session state machine errors (busy gate, invalid operations)
    #[error("Session error: {0}")]
    Session(String),

    /// Attachment validation failure, reported inline to the user
    #[error("Invalid attachment '{file}': {reason}")]
    Validation {
        /// Name of the offending file
        file: String,
        /// Why the file was rejected
        reason: String,
    },

    /// User profile validation errors
    #[error("Profile error: {0}")]
    Profile(String),

    /// Structured model output could not be parsed against its schema
    #[error("Structured output error: {0}")]
    Structured(String),

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
}

/// Result type alias for Fitsage operations
///
/// This is a convenience alias that uses `anyhow::Error` as the error type,
/// allowing for rich error context and easy error propagation.
pub type Result<T> = anyhow::Result<T>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let error = FitsageError::Config("invalid format".to_string());
        assert_eq!(error.to_string(), "Configuration error: invalid format");
    }

    #[test]
    fn test_transport_error_display() {
        let error = FitsageError::Transport("connection refused".to_string());
        assert_eq!(error.to_string(), "Transport error: connection refused");
    }

    #[test]
    fn test_session_error_display() {
        let error = FitsageError::Session("a turn is already in flight".to_string());
        assert_eq!(
            error.to_string(),
            "Session error: a turn is already in flight"
        );
    }

    #[test]
    fn test_validation_error_names_file() {
        let error = FitsageError::Validation {
            file: "photo.png".to_string(),
            reason: "file is 2097152 bytes, max size is 1 MiB".to_string(),
        };
        let s = error.to_string();
        assert!(s.contains("photo.png"));
        assert!(s.contains("max size is 1 MiB"));
    }

    #[test]
    fn test_structured_error_display() {
        let error = FitsageError::Structured("missing field `diet_plan`".to_string());
        assert!(error.to_string().contains("missing field `diet_plan`"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let error: FitsageError = io_error.into();
        assert!(matches!(error, FitsageError::Io(_)));
    }

    #[test]
    fn test_json_error_conversion() {
        let json_error = serde_json::from_str::<serde_json::Value>("{oops}").unwrap_err();
        let error: FitsageError = json_error.into();
        assert!(matches!(error, FitsageError::Serialization(_)));
    }

    #[test]
    fn test_yaml_error_conversion() {
        let yaml_error = serde_yaml::from_str::<serde_yaml::Value>("a: : b").unwrap_err();
        let error: FitsageError = yaml_error.into();
        assert!(matches!(error, FitsageError::Yaml(_)));
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<FitsageError>();
    }
}
