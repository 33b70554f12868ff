//! Integration Tests Module
//!
//! End-to-end tests for Use Case Mapper: report ingestion feeding the
//! analysis pipeline against an in-process generator, configuration loading,
//! and the overview statistics.

// Shared mock generator and fixtures
mod support;

// Export -> normalize -> analyze -> deduplicated report
mod analysis_pipeline_test;

// Export normalization and overview statistics
mod report_ingestion_test;

// Config file loading, overrides, and credential precedence
mod config_test;
