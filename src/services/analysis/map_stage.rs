//! Map Stage
//!
//! Issues one structured-output call per batch, strictly in sequence.
//! Progress is reported before each batch and doubles as the halt signal.
//! A batch whose answer cannot be parsed is dropped and the run continues.
//! A failed remote call aborts the run.

use tracing::{debug, info, warn};
use usecase_mapper_core::{Credential, EngineSettings, PartialResult};
use usecase_mapper_llm::StructuredGenerator;

use super::error::AnalysisError;
use super::observer::{AnalysisObserver, ProgressControl};
use super::planner::BatchPlan;
use super::prompts::{batch_prompt, extract_json, partial_result_schema};
use super::rate_limiter::RateLimiter;
use super::summarizer::summarize_batch;

/// What the map loop produced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MapOutcome {
    /// Parsed partial results in batch order
    pub partials: Vec<PartialResult>,
    /// Number of remote calls issued
    pub batches_issued: usize,
    /// Issued batches whose answer could not be parsed
    pub batches_dropped: usize,
    /// Whether the loop stopped early on a halt request
    pub halted: bool,
}

/// Sequential per-batch analysis.
pub struct MapStage<'a> {
    generator: &'a dyn StructuredGenerator,
    credential: &'a Credential,
    settings: &'a EngineSettings,
}

impl<'a> MapStage<'a> {
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

    /// Run every batch of `plan`, or stop early once a halt is requested and
    /// at least one partial result exists.
    ///
    /// Unparsable answers drop the batch. Any remote failure aborts the loop,
    /// classified as `RemoteAuthFailure` or `Remote`.
    pub async fn run(
        &self,
        plan: &BatchPlan<'_>,
        observer: &dyn AnalysisObserver,
    ) -> Result<MapOutcome, AnalysisError> {
        let total = plan.num_batches();
        let schema = partial_result_schema();
        let mut limiter = RateLimiter::from_settings(self.settings);
        let mut outcome = MapOutcome::default();

        for (index, batch) in plan.batches().enumerate() {
            let batch_number = index + 1;

            if observer.on_progress(batch_number, total) == ProgressControl::Halt {
                if !outcome.partials.is_empty() {
                    info!(
                        batch = batch_number,
                        total,
                        collected = outcome.partials.len(),
                        "halt requested, skipping remaining batches"
                    );
                    outcome.halted = true;
                    break;
                }
                debug!(
                    batch = batch_number,
                    "halt requested before any result was collected, issuing batch anyway"
                );
            }

            let prompt = batch_prompt(&summarize_batch(batch))?;

            limiter.acquire().await;
            outcome.batches_issued += 1;
            debug!(batch = batch_number, total, records = batch.len(), "issuing batch");

            let response = self
                .generator
                .generate(self.credential, self.settings.model(), &prompt, &schema)
                .await;

            match response {
                Ok(text) => match parse_partial(batch_number, &text) {
                    Ok(partial) => {
                        debug!(
                            batch = batch_number,
                            use_cases = partial.use_cases.len(),
                            "batch analyzed"
                        );
                        outcome.partials.push(partial);
                    }
                    Err(e) => {
                        warn!(error = %e, "dropping batch");
                        outcome.batches_dropped += 1;
                    }
                },
                Err(e) => {
                    warn!(batch = batch_number, error = %e, "remote call failed, aborting run");
                    return Err(e.into());
                }
            }
        }

        Ok(outcome)
    }
}

/// Parse one batch answer into a `PartialResult`.
pub fn parse_partial(batch: usize, text: &str) -> Result<PartialResult, AnalysisError> {
    let json = extract_json(text);
    if json.is_empty() {
        return Err(AnalysisError::BatchParse {
            batch,
            message: "empty response".to_string(),
        });
    }
    serde_json::from_str(json).map_err(|e| AnalysisError::BatchParse {
        batch,
        message: e.to_string(),
    })
}
