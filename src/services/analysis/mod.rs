//! Conversation Analysis Service
//!
//! Batched map-reduce analysis of conversation records against a remote
//! structured-output model:
//! - Scope resolution and contiguous batch planning
//! - Per-batch payload projection and prompting (map)
//! - Request pacing from a requests-per-minute budget
//! - Single consolidation call (reduce) and client-side deduplication

pub mod dedup;
pub mod error;
pub mod map_stage;
pub mod observer;
pub mod orchestrator;
pub mod planner;
pub mod prompts;
pub mod rate_limiter;
pub mod reduce_stage;
pub mod summarizer;

#[cfg(test)]
pub(crate) mod testing;

pub use dedup::{deduplicate, deduplicate_use_cases};
pub use error::AnalysisError;
pub use map_stage::{MapOutcome, MapStage};
pub use observer::{AnalysisObserver, AnalysisStatus, NoopObserver, ProgressControl};
pub use orchestrator::{analyze_conversations, AnalysisRequest};
pub use planner::BatchPlan;
pub use rate_limiter::RateLimiter;
pub use reduce_stage::ReduceStage;
pub use summarizer::{summarize, summarize_batch, BatchPayload};
