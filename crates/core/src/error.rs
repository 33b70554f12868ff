//! Core Error Types
//!
//! Errors raised while constructing core values (engine settings, scope).
//! The application crate wraps these alongside analysis, ingestion, and
//! configuration failures.

use thiserror::Error;

/// Core error type for the Use Case Mapper workspace.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    /// A value is out of range or missing
    #[error("Validation error: {0}")]
    Validation(String),

    /// A textual value has no known meaning
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Result type alias for core errors
pub type CoreResult<T> = Result<T, CoreError>;

impl CoreError {
    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a parse error
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }
}
