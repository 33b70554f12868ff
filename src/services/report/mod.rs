//! Conversation Report Service
//!
//! Loading and normalizing conversation exports, plus local overview
//! statistics.

pub mod normalize;
pub mod overview;

pub use normalize::{load_report, normalize_report, normalize_report_at, IngestError};
pub use overview::ReportOverview;
