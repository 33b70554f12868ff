//! LLM Types
//!
//! Provider configuration and the error taxonomy for remote generation.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Supported remote providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProviderType {
    /// Google Gemini (`generateContent` with `responseSchema`)
    #[default]
    Gemini,
    /// OpenAI or any OpenAI-compatible chat completions endpoint
    OpenAI,
}

impl std::fmt::Display for ProviderType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderType::Gemini => write!(f, "gemini"),
            ProviderType::OpenAI => write!(f, "openai"),
        }
    }
}

impl std::str::FromStr for ProviderType {
    type Err = LlmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gemini" | "google" => Ok(ProviderType::Gemini),
            "openai" => Ok(ProviderType::OpenAI),
            other => Err(LlmError::InvalidRequest {
                message: format!("unknown provider '{}', expected gemini or openai", other),
            }),
        }
    }
}

/// Configuration for a remote provider. The credential is supplied per call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// The provider type
    #[serde(default)]
    pub provider: ProviderType,
    /// Base URL override (optional)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Overall request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Sampling temperature override (optional)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

fn default_timeout_secs() -> u64 {
    120
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            provider: ProviderType::default(),
            base_url: None,
            timeout_secs: default_timeout_secs(),
            temperature: None,
        }
    }
}

/// Errors from remote generation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LlmError {
    /// Authentication failed (invalid API key)
    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },
    /// Rate limit exceeded
    #[error("Rate limited: {message}")]
    RateLimited {
        message: String,
        retry_after: Option<u32>,
    },
    /// Model not found or not available
    #[error("Model not found: {model}")]
    ModelNotFound { model: String },
    /// Invalid request (bad parameters)
    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },
    /// Server error from the provider
    #[error("Server error{}: {message}", .status.map(|s| format!(" ({})", s)).unwrap_or_default())]
    ServerError {
        message: String,
        status: Option<u16>,
    },
    /// Network/connection error
    #[error("Network error: {message}")]
    NetworkError { message: String },
    /// Response parsing error
    #[error("Parse error: {message}")]
    ParseError { message: String },
    /// Other error
    #[error("Error: {message}")]
    Other { message: String },
}

impl LlmError {
    /// Whether the provider rejected the credential.
    ///
    /// Some providers report bad keys as 400/404 with a descriptive message
    /// instead of 401, so the message text is inspected as well.
    pub fn is_auth_failure(&self) -> bool {
        if matches!(self, LlmError::AuthenticationFailed { .. }) {
            return true;
        }
        let text = self.to_string().to_lowercase();
        text.contains("entity was not found")
            || text.contains("entity not found")
            || text.contains("api key")
            || text.contains("api_key")
    }
}

/// Result type for LLM operations
pub type LlmResult<T> = Result<T, LlmError>;
