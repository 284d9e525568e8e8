//! Error types for askrelay.
//!
//! A single error enum covers configuration, I/O, upstream model, prompt,
//! and tool failures. Everything that reaches the HTTP stream is rendered
//! through its `Display` implementation.

use thiserror::Error;

/// Unified error type for askrelay.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Upstream model provider errors
    #[error("LLM error: {0}")]
    Llm(String),

    /// Upstream connection lost while a response was streaming
    #[error("Stream error: {0}")]
    Stream(String),

    /// Prompt rendering errors
    #[error("Prompt error: {0}")]
    Prompt(String),

    /// Tool invocation errors
    #[error("Tool error: {0}")]
    Tool(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic errors
    #[error("{0}")]
    Other(String),
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(err: serde_yaml::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_category() {
        let err = AppError::Llm("quota exceeded".to_string());
        assert_eq!(err.to_string(), "LLM error: quota exceeded");

        let err = AppError::Stream("connection reset".to_string());
        assert_eq!(err.to_string(), "Stream error: connection reset");

        let err = AppError::Other("plain".to_string());
        assert_eq!(err.to_string(), "plain");
    }

    #[test]
    fn test_from_serde_json() {
        let parse: Result<serde_json::Value, _> = serde_json::from_str("{not json");
        let err: AppError = parse.unwrap_err().into();
        assert!(matches!(err, AppError::Serialization(_)));
    }
}
