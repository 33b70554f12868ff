//! Structured Generator Trait
//!
//! Defines the narrow capability the analysis engine needs from a remote model:
//! given a model id, a prompt, and an output schema, return the JSON text the
//! model produced. Callers parse and validate that text themselves.

use std::time::Duration;

use async_trait::async_trait;
use usecase_mapper_core::Credential;

use super::gemini::GeminiProvider;
use super::http_client::build_http_client;
use super::openai::OpenAIProvider;
use super::schema::ResponseSchema;
use super::types::{LlmError, LlmResult, ProviderConfig, ProviderType};

/// Trait that all remote providers implement.
#[async_trait]
pub trait StructuredGenerator: Send + Sync {
    /// Returns the provider name for identification.
    fn name(&self) -> &'static str;

    /// Generate output constrained to `schema`.
    ///
    /// # Arguments
    /// * `credential` - API key for this call
    /// * `model` - Remote model identifier
    /// * `prompt` - Full user prompt
    /// * `schema` - Required output shape
    ///
    /// # Returns
    /// The raw text of the model's answer (expected to be JSON).
    async fn generate(
        &self,
        credential: &Credential,
        model: &str,
        prompt: &str,
        schema: &ResponseSchema,
    ) -> LlmResult<String>;
}

/// Build the provider described by `config`.
pub fn create_generator(config: &ProviderConfig) -> LlmResult<Box<dyn StructuredGenerator>> {
    if let Some(base_url) = &config.base_url {
        url::Url::parse(base_url).map_err(|e| LlmError::InvalidRequest {
            message: format!("invalid base_url '{}': {}", base_url, e),
        })?;
    }
    let client = build_http_client(Duration::from_secs(config.timeout_secs))?;
    let generator: Box<dyn StructuredGenerator> = match config.provider {
        ProviderType::Gemini => Box::new(GeminiProvider::new(config.clone(), client)),
        ProviderType::OpenAI => Box::new(OpenAIProvider::new(config.clone(), client)),
    };
    Ok(generator)
}

/// Extract a human-readable message from a provider error body.
///
/// Both Gemini and OpenAI wrap failures as `{"error": {"message": ...}}`.
pub fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
        .unwrap_or_else(|| body.trim().to_string())
}

/// Helper function to parse HTTP error status codes
pub fn parse_http_error(status: u16, body: &str, provider: &str) -> LlmError {
    let message = error_message(body);
    match status {
        401 => LlmError::AuthenticationFailed {
            message: format!("{}: {}", provider, message),
        },
        403 => LlmError::AuthenticationFailed {
            message: format!("{}: Access denied: {}", provider, message),
        },
        404 => LlmError::ModelNotFound { model: message },
        429 => LlmError::RateLimited {
            message,
            retry_after: None,
        },
        400 => LlmError::InvalidRequest { message },
        500..=599 => LlmError::ServerError {
            message,
            status: Some(status),
        },
        _ => LlmError::Other {
            message: format!("HTTP {}: {}", status, message),
        },
    }
}
