//! Analysis Orchestrator
//!
//! Composes the pipeline for one run:
//! credential check, scope and batch planning, map loop, consolidation, and
//! client-side deduplication. The orchestrator keeps no state between runs, so
//! concurrent runs over different inputs are independent.

use std::time::Instant;

use tracing::info;
use usecase_mapper_core::{AnalysisResult, ConversationRecord, Credential, EngineSettings, ScopeSelection};
use usecase_mapper_llm::StructuredGenerator;

use super::dedup::deduplicate;
use super::error::AnalysisError;
use super::map_stage::MapStage;
use super::observer::{AnalysisObserver, AnalysisStatus};
use super::planner::BatchPlan;
use super::reduce_stage::ReduceStage;

/// Inputs for one run. Conversations are borrowed read-only.
#[derive(Debug, Clone, Copy)]
pub struct AnalysisRequest<'a> {
    pub conversations: &'a [ConversationRecord],
    pub scope: ScopeSelection,
    pub settings: &'a EngineSettings,
    /// Resolved credential (override already merged with any ambient default)
    pub credential: Option<&'a Credential>,
}

impl<'a> AnalysisRequest<'a> {
    pub fn new(conversations: &'a [ConversationRecord], settings: &'a EngineSettings) -> Self {
        Self {
            conversations,
            scope: ScopeSelection::All,
            settings,
            credential: None,
        }
    }

    pub fn with_scope(mut self, scope: ScopeSelection) -> Self {
        self.scope = scope;
        self
    }

    pub fn with_credential(mut self, credential: Option<&'a Credential>) -> Self {
        self.credential = credential;
        self
    }
}

/// Analyze `request.conversations` and return one consolidated report.
///
/// `observer.on_progress` is called before each batch; returning `Halt` skips
/// the remaining batches once at least one partial result exists.
/// `observer.on_status` is called with `Batching` before the map loop and with
/// `Consolidating` before the reduce call, and never afterwards.
pub async fn analyze_conversations(
    generator: &dyn StructuredGenerator,
    request: AnalysisRequest<'_>,
    observer: &dyn AnalysisObserver,
) -> Result<AnalysisResult, AnalysisError> {
    let credential = request.credential.ok_or(AnalysisError::MissingCredential)?;
    let settings = request.settings;
    let started = Instant::now();

    let plan = BatchPlan::new(request.conversations, request.scope, settings);
    info!(
        provider = generator.name(),
        model = settings.model(),
        scope = %request.scope,
        records = plan.prefix().len(),
        batches = plan.num_batches(),
        batch_size = plan.batch_size(),
        rpm = settings.rpm(),
        "starting analysis"
    );

    observer.on_status(AnalysisStatus::Batching);
    let outcome = MapStage::new(generator, credential, settings)
        .run(&plan, observer)
        .await?;

    info!(
        collected = outcome.partials.len(),
        issued = outcome.batches_issued,
        dropped = outcome.batches_dropped,
        halted = outcome.halted,
        "map stage finished"
    );

    if outcome.partials.is_empty() {
        return Err(AnalysisError::EmptyMapResult);
    }

    observer.on_status(AnalysisStatus::Consolidating);
    let result = ReduceStage::new(generator, credential, settings)
        .run(&outcome.partials)
        .await?;
    let result = deduplicate(result);

    info!(
        use_cases = result.identified_use_cases.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "analysis complete"
    );
    Ok(result)
}
