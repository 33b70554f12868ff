//! Use Case Mapper LLM
//!
//! Provides a narrow, schema-constrained generation interface over remote
//! LLM providers:
//! - Google Gemini
//! - OpenAI (and OpenAI-compatible endpoints)
//!
//! Also includes the provider-neutral response schema type and the HTTP
//! client factory.

pub mod gemini;
pub mod http_client;
pub mod openai;
pub mod provider;
pub mod schema;
pub mod types;

// Re-export main types
pub use gemini::GeminiProvider;
pub use http_client::build_http_client;
pub use openai::OpenAIProvider;
pub use provider::{create_generator, StructuredGenerator};
pub use schema::{ResponseSchema, SchemaType};
pub use types::*;
