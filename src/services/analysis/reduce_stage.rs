//! Reduce Stage
//!
//! One consolidation call over every partial result. Unlike the map stage
//! there is nothing to fall back on: an empty or non-conforming answer fails
//! the run.

use tracing::{debug, error, info};
use usecase_mapper_core::{AnalysisResult, Credential, EngineSettings, PartialResult};
use usecase_mapper_llm::StructuredGenerator;

use super::error::AnalysisError;
use super::prompts::{analysis_result_schema, consolidation_prompt, extract_json};

/// Single consolidation call.
pub struct ReduceStage<'a> {
    generator: &'a dyn StructuredGenerator,
    credential: &'a Credential,
    settings: &'a EngineSettings,
}

impl<'a> ReduceStage<'a> {
    pub fn new(
        generator: &'a dyn StructuredGenerator,
        credential: &'a Credential,
        settings: &'a EngineSettings,
    ) -> Self {
        Self {
            generator,
            credential,
            settings,
        }
    }

    /// Merge `partials` into one report.
    pub async fn run(&self, partials: &[PartialResult]) -> Result<AnalysisResult, AnalysisError> {
        let prompt = consolidation_prompt(partials)?;
        let schema = analysis_result_schema();
        info!(partials = partials.len(), "consolidating partial results");

        let text = self
            .generator
            .generate(self.credential, self.settings.model(), &prompt, &schema)
            .await?;

        let result = parse_analysis(&text).inspect_err(|e| {
            error!(error = %e, "consolidation failed");
        })?;
        debug!(
            use_cases = result.identified_use_cases.len(),
            patterns = result.common_patterns.len(),
            "consolidation parsed"
        );
        Ok(result)
    }
}

/// Parse the consolidation answer. Every field must be present.
pub fn parse_analysis(text: &str) -> Result<AnalysisResult, AnalysisError> {
    let json = extract_json(text);
    if json.is_empty() {
        return Err(AnalysisError::empty_consolidation());
    }
    serde_json::from_str(json).map_err(AnalysisError::invalid_consolidation)
}
