//! Analysis Errors
//!
//! Failure taxonomy for one orchestration run. Per-batch parse failures are
//! recovered inside the map stage and only surface here when every batch was
//! lost.

use thiserror::Error;
use usecase_mapper_llm::LlmError;

/// Errors returned by `analyze_conversations`.
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// No API credential was supplied
    #[error("API Key is missing.")]
    MissingCredential,

    /// One batch's response did not match the partial-result schema
    #[error("Batch {batch} returned an unparsable response: {message}")]
    BatchParse { batch: usize, message: String },

    /// Zero batches existed or every batch was dropped
    #[error("No analysis data was generated.")]
    EmptyMapResult,

    /// The consolidation call returned empty or non-conforming output
    #[error("{message}")]
    ReduceFailure { message: String },

    /// The remote provider rejected the credential
    #[error("Remote authentication failed: {0}")]
    RemoteAuthFailure(LlmError),

    /// Any remote failure other than a rejected credential
    #[error("Remote model error: {0}")]
    Remote(LlmError),

    /// JSON serialization errors while building prompts
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl AnalysisError {
    /// Consolidation produced no text at all.
    pub fn empty_consolidation() -> Self {
        Self::ReduceFailure {
            message: "Final analysis consolidation returned an empty response.".to_string(),
        }
    }

    /// Consolidation produced text that is not a valid analysis report.
    pub fn invalid_consolidation(detail: impl std::fmt::Display) -> Self {
        Self::ReduceFailure {
            message: format!(
                "Final analysis consolidation returned an invalid response: {}",
                detail
            ),
        }
    }

    /// Whether the caller should prompt for a new credential.
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, AnalysisError::RemoteAuthFailure(_))
    }
}

impl From<LlmError> for AnalysisError {
    fn from(err: LlmError) -> Self {
        if err.is_auth_failure() {
            AnalysisError::RemoteAuthFailure(err)
        } else {
            AnalysisError::Remote(err)
        }
    }
}
