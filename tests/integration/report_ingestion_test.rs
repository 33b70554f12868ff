//! Report Ingestion Integration Tests
//!
//! Loads exports from disk in both accepted shapes and checks the normalized
//! records and overview statistics.

use serde_json::json;
use usecase_mapper::services::report::{load_report, normalize_report, IngestError, ReportOverview};
use usecase_mapper_core::{ConversationId, MessageRole, ScopeSelection};

use crate::support::export;

#[test]
fn test_load_wrapped_export_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("export.json");
    std::fs::write(&path, export(4).to_string()).unwrap();

    let report = load_report(&path).unwrap();
    assert_eq!(report.report_id.as_deref(), Some("rep-1"));
    assert_eq!(report.conversations.len(), 4);

    let first = &report.conversations[0];
    assert_eq!(first.id, ConversationId::from("c-0"));
    assert_eq!(first.timestamp.timestamp(), 1_700_000_000);
    assert_eq!(first.messages.len(), 2);
    assert_eq!(first.messages[0].role, MessageRole::User);
    assert_eq!(first.messages[1].role, MessageRole::Agent);
    assert_eq!(first.metadata.primary_intent.as_deref(), Some("track_order"));
    assert_eq!(first.metadata.satisfaction_score, Some(4.0));

    let range = report.time_range.unwrap();
    assert_eq!((range.end - range.start).num_minutes(), 3);
}

#[test]
fn test_bare_array_with_generated_ids() {
    let report = normalize_report(json!([
        {"timestamp": "2024-03-01T10:00:00Z", "messages": [{"role": "user", "content": "hello"}]},
        {"timestamp": 1709287200, "messages": []}
    ]))
    .unwrap();

    assert_eq!(report.conversations[0].id, ConversationId::from("conv-0"));
    assert_eq!(report.conversations[1].id, ConversationId::from("conv-1"));
    assert_eq!(report.conversations[0].messages[0].text, "hello");
}

#[test]
fn test_rejects_unknown_shape() {
    let err = normalize_report(json!({"items": []})).unwrap_err();
    assert!(matches!(err, IngestError::InvalidFormat));
    assert_eq!(
        err.to_string(),
        "Invalid format. Expected an array of conversations or a 'conversations' key."
    );
}

#[test]
fn test_rejects_malformed_json_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.json");
    std::fs::write(&path, "[{\"id\": ").unwrap();
    assert!(matches!(load_report(&path).unwrap_err(), IngestError::Json(_)));
}

#[test]
fn test_overview_of_loaded_export() {
    let report = normalize_report(export(9)).unwrap();
    let overview = ReportOverview::from_report(&report, ScopeSelection::Percent(50.0));

    assert_eq!(overview.total_conversations, 9);
    assert_eq!(overview.scoped_conversations, 5);
    assert_eq!(overview.average_satisfaction, Some(4.0));
    assert_eq!(overview.average_turns, 2);

    let value = serde_json::to_value(&overview).unwrap();
    assert_eq!(value["totalConversations"], 9);
    assert_eq!(value["scope"]["mode"], "percent");
}
