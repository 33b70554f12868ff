//! Use Case Mapper - Rust Library
//!
//! Batched map-reduce analysis of customer conversation exports against a
//! remote structured-output model.
//! It includes:
//! - Report ingestion and local overview statistics
//! - The analysis pipeline (planning, pacing, map, reduce, deduplication)
//! - TOML configuration and credential resolution
//! - CLI command handlers

pub mod commands;
pub mod models;
pub mod services;
pub mod utils;

pub use models::settings::{AppConfig, SettingsUpdate};
pub use services::analysis::{
    analyze_conversations, AnalysisError, AnalysisObserver, AnalysisRequest, AnalysisStatus,
    NoopObserver, ProgressControl,
};
pub use services::report::{load_report, normalize_report, IngestError, ReportOverview};
pub use utils::error::{AppError, AppResult};
