//! Services
//!
//! Business logic for the application.
//! Services handle the core functionality and are called by commands.

pub mod analysis;
pub mod report;

pub use analysis::{analyze_conversations, AnalysisError, AnalysisObserver, AnalysisRequest};
pub use report::{load_report, normalize_report, IngestError, ReportOverview};
