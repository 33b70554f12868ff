//! Gemini Provider
//!
//! Implementation of the StructuredGenerator trait for Google's Generative
//! Language API, using `responseMimeType: application/json` with a
//! `responseSchema`.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;
use usecase_mapper_core::Credential;

use super::provider::{parse_http_error, StructuredGenerator};
use super::schema::ResponseSchema;
use super::types::{LlmError, LlmResult, ProviderConfig};

/// Default Gemini API base
const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Gemini provider
pub struct GeminiProvider {
    config: ProviderConfig,
    client: reqwest::Client,
}

impl GeminiProvider {
    /// Create a new Gemini provider with the given configuration
    pub fn new(config: ProviderConfig, client: reqwest::Client) -> Self {
        Self { config, client }
    }

    /// Get the API base URL
    fn base_url(&self) -> &str {
        self.config
            .base_url
            .as_deref()
            .unwrap_or(GEMINI_API_BASE)
            .trim_end_matches('/')
    }

    /// `generateContent` endpoint for a model
    fn endpoint(&self, model: &str) -> String {
        let model = model.strip_prefix("models/").unwrap_or(model);
        format!("{}/models/{}:generateContent", self.base_url(), model)
    }

    /// Build the request body for the API
    fn build_request_body(&self, prompt: &str, schema: &ResponseSchema) -> serde_json::Value {
        let mut generation_config = serde_json::json!({
            "responseMimeType": "application/json",
            "responseSchema": schema.to_gemini(),
        });
        if let Some(temperature) = self.config.temperature {
            generation_config["temperature"] = serde_json::json!(temperature);
        }

        serde_json::json!({
            "contents": [{
                "role": "user",
                "parts": [{ "text": prompt }]
            }],
            "generationConfig": generation_config,
        })
    }

    /// Concatenate the text parts of the first candidate.
    fn extract_text(&self, response: GeminiResponse) -> LlmResult<String> {
        if let Some(candidate) = response.candidates.into_iter().next() {
            let text: String = candidate
                .content
                .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
                .unwrap_or_default();
            return Ok(text);
        }

        if let Some(reason) = response.prompt_feedback.and_then(|f| f.block_reason) {
            return Err(LlmError::InvalidRequest {
                message: format!("prompt blocked: {}", reason),
            });
        }

        Ok(String::new())
    }
}

#[async_trait]
impl StructuredGenerator for GeminiProvider {
    fn name(&self) -> &'static str {
        "gemini"
    }

    async fn generate(
        &self,
        credential: &Credential,
        model: &str,
        prompt: &str,
        schema: &ResponseSchema,
    ) -> LlmResult<String> {
        let body = self.build_request_body(prompt, schema);
        debug!(model, prompt_chars = prompt.len(), "gemini generateContent");

        let response = self
            .client
            .post(self.endpoint(model))
            .header("x-goog-api-key", credential.expose())
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
            return Err(parse_http_error(status, &body_text, "gemini"));
        }

        let gemini_response: GeminiResponse =
            serde_json::from_str(&body_text).map_err(|e| LlmError::ParseError {
                message: format!("Failed to parse response: {}", e),
            })?;

        self.extract_text(gemini_response)
    }
}

/// Gemini API response format
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}
