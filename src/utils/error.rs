//! Error Handling
//!
//! Unified error types for the application.
//! Uses thiserror for ergonomic error definitions.

use thiserror::Error;
use usecase_mapper_core::CoreError;
use usecase_mapper_llm::LlmError;

use crate::services::analysis::AnalysisError;
use crate::services::report::IngestError;

/// Application-wide error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Core type errors (settings, scope)
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Provider construction errors
    #[error(transparent)]
    Llm(#[from] LlmError),

    /// Report loading errors
    #[error(transparent)]
    Ingest(#[from] IngestError),

    /// Analysis run errors
    #[error(transparent)]
    Analysis(#[from] AnalysisError),
}

/// Result type alias for application errors
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// Create a config error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

impl From<toml::de::Error> for AppError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(err.to_string())
    }
}
