//! Analysis Pipeline Integration Tests
//!
//! Drives a normalized export through `analyze_conversations` with an
//! in-process generator: batching under a scope, payload projection into the
//! map prompts, pacing, cooperative halt, failure handling, and final
//! deduplication.

use std::sync::Mutex;
use std::time::Duration;

use usecase_mapper::services::analysis::{
    analyze_conversations, AnalysisError, AnalysisObserver, AnalysisRequest, AnalysisStatus,
    NoopObserver, ProgressControl,
};
use usecase_mapper::services::report::normalize_report;
use usecase_mapper_core::{EngineSettings, ScopeSelection};
use usecase_mapper_llm::LlmError;

use crate::support::{consolidated, credential, export, partial, MapReply, RoutedGenerator};

#[derive(Default)]
struct Log {
    progress: Mutex<Vec<(usize, usize)>>,
    statuses: Mutex<Vec<AnalysisStatus>>,
    halt_from: Option<usize>,
}

impl AnalysisObserver for Log {
    fn on_progress(&self, current: usize, total: usize) -> ProgressControl {
        self.progress.lock().unwrap().push((current, total));
        match self.halt_from {
            Some(n) if current >= n => ProgressControl::Halt,
            _ => ProgressControl::Continue,
        }
    }

    fn on_status(&self, status: AnalysisStatus) {
        self.statuses.lock().unwrap().push(status);
    }
}

// ============================================================================
// Happy path
// ============================================================================

#[tokio::test]
async fn test_export_to_deduplicated_report() {
    let report = normalize_report(export(10)).unwrap();
    let settings = EngineSettings::new("test-model", 4, 600.0).unwrap();
    let key = credential();

    // The model repeats one use case with different casing; it must merge.
    let mut body: serde_json::Value =
        serde_json::from_str(&consolidated(&[("Track order", 6), ("Refund", 2)])).unwrap();
    let extra = serde_json::json!({
        "vertical": "retail", "audience": "customer", "task": "Track  Order",
        "channel": "chat", "description": "dup", "count": 3
    });
    body["identifiedUseCases"].as_array_mut().unwrap().push(extra);

    let generator = RoutedGenerator::new(
        vec![partial("Track order", 4), partial("Track order", 4), partial("Refund", 2)],
        Ok(body.to_string()),
    );
    let log = Log::default();

    let result = analyze_conversations(
        &generator,
        AnalysisRequest::new(&report.conversations, &settings).with_credential(Some(&key)),
        &log,
    )
    .await
    .unwrap();

    assert_eq!(generator.map_calls(), 3);
    assert_eq!(generator.reduce_calls(), 1);
    assert_eq!(*log.progress.lock().unwrap(), vec![(1, 3), (2, 3), (3, 3)]);
    assert_eq!(
        *log.statuses.lock().unwrap(),
        vec![AnalysisStatus::Batching, AnalysisStatus::Consolidating]
    );

    assert_eq!(result.identified_use_cases.len(), 2);
    assert_eq!(result.identified_use_cases[0].task, "Track order");
    assert_eq!(result.identified_use_cases[0].count, 9);
    assert_eq!(result.identified_use_cases[1].count, 2);
    assert_eq!(result.total_use_case_count(), 11);
}

#[tokio::test]
async fn test_map_prompts_carry_projected_records() {
    let report = normalize_report(export(3)).unwrap();
    let settings = EngineSettings::new("test-model", 2, 600.0).unwrap();
    let key = credential();
    let generator = RoutedGenerator::new(
        vec![partial("Track order", 2), partial("Track order", 1)],
        Ok(consolidated(&[("Track order", 3)])),
    );

    analyze_conversations(
        &generator,
        AnalysisRequest::new(&report.conversations, &settings).with_credential(Some(&key)),
        &NoopObserver,
    )
    .await
    .unwrap();

    let prompts = generator.map_prompts.lock().unwrap().clone();
    assert_eq!(prompts.len(), 2);
    assert!(prompts[0].starts_with("Analyze these 2 conversation records."));
    assert!(prompts[1].starts_with("Analyze these 1 conversation records."));
    assert!(prompts[0].contains(r#""id":"c-0""#));
    assert!(prompts[0].contains(r#""id":"c-1""#));
    assert!(!prompts[0].contains(r#""id":"c-2""#));
    assert!(prompts[0].contains(r#""domain":"Retail""#));
    assert!(prompts[0].contains(r#""intent":"track_order""#));
    assert!(prompts[0].contains(r#""channel":"web""#));
    assert!(prompts[0].contains("Where is my order number 0?"));
    // Agent turns never reach the payload
    assert!(!prompts[0].contains("Let me check"));

    let reduce = generator.reduce_prompts.lock().unwrap().clone();
    assert_eq!(reduce.len(), 1);
    assert!(reduce[0].contains("in 2 batches"));
}

// ============================================================================
// Scope and pacing
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_scope_limits_batches_and_calls_are_paced() {
    let report = normalize_report(export(20)).unwrap();
    // 30 rpm -> one call every two seconds
    let settings = EngineSettings::new("test-model", 5, 30.0).unwrap();
    let key = credential();
    let generator = RoutedGenerator::new(
        vec![partial("Track order", 5), partial("Track order", 5), partial("Track order", 1)],
        Ok(consolidated(&[("Track order", 11)])),
    );

    analyze_conversations(
        &generator,
        AnalysisRequest::new(&report.conversations, &settings)
            .with_scope(ScopeSelection::Percent(55.0))
            .with_credential(Some(&key)),
        &NoopObserver,
    )
    .await
    .unwrap();

    // 55% of 20 is 11 records -> batches of 5, 5, 1
    assert_eq!(generator.map_calls(), 3);
    let starts = generator.starts.lock().unwrap().clone();
    assert_eq!(starts.len(), 4);
    let offsets: Vec<Duration> = starts.iter().map(|s| s.duration_since(starts[0])).collect();
    assert_eq!(offsets[1], Duration::from_secs(2));
    assert_eq!(offsets[2], Duration::from_secs(4));
    // Consolidation is not paced
    assert_eq!(offsets[3], Duration::from_secs(4));
}

#[tokio::test]
async fn test_zero_scope_is_empty_map_result() {
    let report = normalize_report(export(5)).unwrap();
    let settings = EngineSettings::new("test-model", 5, 600.0).unwrap();
    let key = credential();
    let generator = RoutedGenerator::new(vec![], Ok(consolidated(&[])));

    let err = analyze_conversations(
        &generator,
        AnalysisRequest::new(&report.conversations, &settings)
            .with_scope(ScopeSelection::Count(0))
            .with_credential(Some(&key)),
        &NoopObserver,
    )
    .await
    .unwrap_err();

    assert!(matches!(err, AnalysisError::EmptyMapResult));
    assert_eq!(err.to_string(), "No analysis data was generated.");
    assert_eq!(generator.map_calls(), 0);
    assert_eq!(generator.reduce_calls(), 0);
}

// ============================================================================
// Halt and failures
// ============================================================================

#[tokio::test]
async fn test_halt_consolidates_collected_batches() {
    let report = normalize_report(export(10)).unwrap();
    let settings = EngineSettings::new("test-model", 2, 600.0).unwrap();
    let key = credential();
    let generator = RoutedGenerator::new(
        vec![partial("Track order", 2), partial("Track order", 2)],
        Ok(consolidated(&[("Track order", 4)])),
    );
    let log = Log {
        halt_from: Some(3),
        ..Default::default()
    };

    let result = analyze_conversations(
        &generator,
        AnalysisRequest::new(&report.conversations, &settings).with_credential(Some(&key)),
        &log,
    )
    .await
    .unwrap();

    assert_eq!(generator.map_calls(), 2);
    assert_eq!(generator.reduce_calls(), 1);
    assert_eq!(*log.progress.lock().unwrap(), vec![(1, 5), (2, 5), (3, 5)]);
    assert_eq!(result.total_use_case_count(), 4);
}

#[tokio::test]
async fn test_unusable_batches_are_dropped() {
    let report = normalize_report(export(6)).unwrap();
    let settings = EngineSettings::new("test-model", 2, 600.0).unwrap();
    let key = credential();
    let generator = RoutedGenerator::new(
        vec![
            MapReply::Garbage,
            MapReply::Ok(r#"{"useCases": [{"task": 7}]}"#.to_string()),
            partial("Refund", 2),
        ],
        Ok(consolidated(&[("Refund", 2)])),
    );

    let result = analyze_conversations(
        &generator,
        AnalysisRequest::new(&report.conversations, &settings).with_credential(Some(&key)),
        &NoopObserver,
    )
    .await
    .unwrap();

    assert_eq!(generator.map_calls(), 3);
    let reduce = generator.reduce_prompts.lock().unwrap().clone();
    assert!(reduce[0].contains("in 1 batches"));
    assert_eq!(result.identified_use_cases[0].task, "Refund");
}

#[tokio::test]
async fn test_provider_outage_aborts_run() {
    let report = normalize_report(export(6)).unwrap();
    let settings = EngineSettings::new("test-model", 2, 600.0).unwrap();
    let key = credential();
    let generator = RoutedGenerator::new(
        vec![
            partial("Refund", 2),
            MapReply::Fail(LlmError::ServerError {
                message: "overloaded".to_string(),
                status: Some(503),
            }),
            partial("Refund", 2),
        ],
        Ok(consolidated(&[("Refund", 4)])),
    );

    let err = analyze_conversations(
        &generator,
        AnalysisRequest::new(&report.conversations, &settings).with_credential(Some(&key)),
        &NoopObserver,
    )
    .await
    .unwrap_err();

    assert!(matches!(err, AnalysisError::Remote(LlmError::ServerError { .. })));
    assert!(!err.is_auth_failure());
    assert_eq!(generator.map_calls(), 2);
    assert_eq!(generator.reduce_calls(), 0);
}

#[tokio::test]
async fn test_rejected_key_aborts_run() {
    let report = normalize_report(export(6)).unwrap();
    let settings = EngineSettings::new("test-model", 2, 600.0).unwrap();
    let key = credential();
    let generator = RoutedGenerator::new(
        vec![
            partial("Refund", 2),
            MapReply::Fail(LlmError::AuthenticationFailed {
                message: "API key not valid".to_string(),
            }),
            partial("Refund", 2),
        ],
        Ok(consolidated(&[("Refund", 4)])),
    );

    let err = analyze_conversations(
        &generator,
        AnalysisRequest::new(&report.conversations, &settings).with_credential(Some(&key)),
        &NoopObserver,
    )
    .await
    .unwrap_err();

    assert!(err.is_auth_failure());
    assert_eq!(generator.map_calls(), 2);
    assert_eq!(generator.reduce_calls(), 0);
}

#[tokio::test]
async fn test_invalid_consolidation_is_reduce_failure() {
    let report = normalize_report(export(2)).unwrap();
    let settings = EngineSettings::new("test-model", 2, 600.0).unwrap();
    let key = credential();
    let generator = RoutedGenerator::new(
        vec![partial("Refund", 2)],
        Ok(r#"{"summary": "missing the rest"}"#.to_string()),
    );

    let err = analyze_conversations(
        &generator,
        AnalysisRequest::new(&report.conversations, &settings).with_credential(Some(&key)),
        &NoopObserver,
    )
    .await
    .unwrap_err();

    assert!(matches!(err, AnalysisError::ReduceFailure { .. }));
}

#[tokio::test]
async fn test_missing_credential() {
    let report = normalize_report(export(2)).unwrap();
    let settings = EngineSettings::new("test-model", 2, 600.0).unwrap();
    let generator = RoutedGenerator::new(vec![partial("Refund", 2)], Ok(consolidated(&[])));

    let err = analyze_conversations(
        &generator,
        AnalysisRequest::new(&report.conversations, &settings),
        &NoopObserver,
    )
    .await
    .unwrap_err();

    assert_eq!(err.to_string(), "API Key is missing.");
    assert_eq!(generator.map_calls(), 0);
}
