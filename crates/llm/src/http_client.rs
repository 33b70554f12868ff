//! HTTP Client Factory
//!
//! Provides a factory function for building reqwest clients shared by the
//! providers.

use std::time::Duration;

use super::types::{LlmError, LlmResult};

const USER_AGENT: &str = concat!("usecase-mapper/", env!("CARGO_PKG_VERSION"));

/// Build a `reqwest::Client` with an overall request timeout.
///
/// Proxy settings follow the standard `HTTP(S)_PROXY` environment variables.
pub fn build_http_client(timeout: Duration) -> LlmResult<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()
        .map_err(|e| LlmError::Other {
            message: format!("failed to build HTTP client: {}", e),
        })
}
