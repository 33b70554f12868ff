//! Use Case Mapper Core
//!
//! Foundational types for the Use Case Mapper workspace. This crate has zero
//! dependencies on application-level code (CLI, HTTP providers, etc.).
//!
//! ## Module Organization
//!
//! - `error` - Core error types (`CoreError`, `CoreResult`)
//! - `conversation` - Normalized conversation records and metadata
//! - `analysis` - Partial and consolidated analysis report types
//! - `settings` - Validated engine settings and builder
//! - `scope` - Prefix scope selection
//! - `credential` - Redacted API credential

pub mod analysis;
pub mod conversation;
pub mod credential;
pub mod error;
pub mod scope;
pub mod settings;

// ── Error Types ────────────────────────────────────────────────────────
pub use error::{CoreError, CoreResult};

// ── Conversation Model ─────────────────────────────────────────────────
pub use conversation::{
    ConversationId, ConversationMessage, ConversationMetadata, ConversationRecord,
    ConversationReport, MessageRole, MetadataValue, MetricEntry, TimeRange, Topic,
};

// ── Report Types ───────────────────────────────────────────────────────
pub use analysis::{AnalysisResult, Frequency, PartialResult, Pattern, SentimentDistribution, UseCase};

// ── Settings ───────────────────────────────────────────────────────────
pub use credential::Credential;
pub use scope::ScopeSelection;
pub use settings::{EngineSettings, EngineSettingsBuilder, DEFAULT_BATCH_SIZE, DEFAULT_MODEL, DEFAULT_RPM};
