//! OpenAI Provider
//!
//! Implementation of the StructuredGenerator trait for OpenAI's chat
//! completions API and compatible endpoints, using Structured Outputs
//! (`response_format: json_schema`, strict mode).

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;
use usecase_mapper_core::Credential;

use super::provider::{parse_http_error, StructuredGenerator};
use super::schema::ResponseSchema;
use super::types::{LlmError, LlmResult, ProviderConfig};

/// Default OpenAI API endpoint
const OPENAI_API_URL: &str = "https://api.openai.com/v1/chat/completions";

/// OpenAI provider
pub struct OpenAIProvider {
    config: ProviderConfig,
    client: reqwest::Client,
}

impl OpenAIProvider {
    /// Create a new OpenAI provider with the given configuration
    pub fn new(config: ProviderConfig, client: reqwest::Client) -> Self {
        Self { config, client }
    }

    /// Get the API base URL
    fn base_url(&self) -> &str {
        self.config.base_url.as_deref().unwrap_or(OPENAI_API_URL)
    }

    /// Check if model is a reasoning model (o1/o3/o4), which rejects temperature
    fn model_supports_reasoning(model: &str) -> bool {
        let model = model.to_lowercase();
        model.starts_with("o1") || model.starts_with("o3") || model.starts_with("o4")
    }

    /// Build the request body for the API
    fn build_request_body(
        &self,
        model: &str,
        prompt: &str,
        schema: &ResponseSchema,
    ) -> serde_json::Value {
        let mut body = serde_json::json!({
            "model": model,
            "messages": [{
                "role": "user",
                "content": prompt
            }],
            "response_format": {
                "type": "json_schema",
                "json_schema": {
                    "name": schema.title.as_deref().unwrap_or("structured_output"),
                    "strict": true,
                    "schema": schema.to_json_schema(),
                }
            }
        });

        if !Self::model_supports_reasoning(model) {
            if let Some(temperature) = self.config.temperature {
                body["temperature"] = serde_json::json!(temperature);
            }
        }

        body
    }

    /// Pull the answer text out of the first choice.
    fn parse_response(response: OpenAIResponse) -> LlmResult<String> {
        let Some(message) = response.choices.into_iter().next().and_then(|c| c.message) else {
            return Ok(String::new());
        };
        if let Some(refusal) = message.refusal {
            return Err(LlmError::InvalidRequest {
                message: format!("model refused: {}", refusal),
            });
        }
        Ok(message.content.unwrap_or_default())
    }
}

#[async_trait]
impl StructuredGenerator for OpenAIProvider {
    fn name(&self) -> &'static str {
        "openai"
    }

    async fn generate(
        &self,
        credential: &Credential,
        model: &str,
        prompt: &str,
        schema: &ResponseSchema,
    ) -> LlmResult<String> {
        let body = self.build_request_body(model, prompt, schema);
        debug!(model, prompt_chars = prompt.len(), "openai chat completion");

        let response = self
            .client
            .post(self.base_url())
            .header("Authorization", format!("Bearer {}", credential.expose()))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::NetworkError {
                message: e.to_string(),
            })?;

        let status = response.status().as_u16();
        let body_text = response.text().await.map_err(|e| LlmError::NetworkError {
            message: e.to_string(),
        })?;

        if status != 200 {
            return Err(parse_http_error(status, &body_text, "openai"));
        }

        let openai_response: OpenAIResponse =
            serde_json::from_str(&body_text).map_err(|e| LlmError::ParseError {
                message: format!("Failed to parse response: {}", e),
            })?;

        Self::parse_response(openai_response)
    }
}

/// OpenAI API response format
#[derive(Debug, Deserialize)]
struct OpenAIResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<ResponseMessage>,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
    refusal: Option<String>,
}
