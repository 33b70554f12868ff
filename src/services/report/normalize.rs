//! Report Ingestion
//!
//! Normalizes heterogeneous conversation exports into `ConversationReport`.
//! Accepts either a top-level array of conversations or an object with a
//! `conversations` array. Field lookups fall through a fixed list of source
//! names; values that are empty, zero, or null count as absent.

use std::collections::BTreeMap;
use std::path::Path;

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, info};
use usecase_mapper_core::{
    ConversationId, ConversationMessage, ConversationMetadata, ConversationRecord,
    ConversationReport, MessageRole, MetadataValue, MetricEntry, TimeRange, Topic,
};

/// Epoch values below this are seconds; at or above, milliseconds.
const EPOCH_SECONDS_CEILING: f64 = 10_000_000_000.0;

/// Source keys consumed into typed fields or recomputed from metrics.
const CONSUMED_KEYS: &[&str] = &[
    "transcript",
    "messages",
    "satisfactionScore",
    "resolutionStatus",
    "totalUtterances",
    "primaryIntent",
    "intentValidation",
];

/// Errors from loading or normalizing a report.
#[derive(Error, Debug)]
pub enum IngestError {
    /// The document is neither an array nor an object with `conversations`
    #[error("Invalid format. Expected an array of conversations or a 'conversations' key.")]
    InvalidFormat,

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not valid JSON
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Read and normalize a JSON export from disk.
pub fn load_report(path: &Path) -> Result<ConversationReport, IngestError> {
    let contents = std::fs::read_to_string(path)?;
    let data: Value = serde_json::from_str(&contents)?;
    let report = normalize_report(data)?;
    info!(
        path = %path.display(),
        conversations = report.conversations.len(),
        "report loaded"
    );
    Ok(report)
}

/// Normalize a parsed JSON document. Unparsable timestamps become "now".
pub fn normalize_report(data: Value) -> Result<ConversationReport, IngestError> {
    normalize_report_at(data, Utc::now())
}

/// Normalize with an explicit ingestion time.
pub fn normalize_report_at(
    data: Value,
    now: DateTime<Utc>,
) -> Result<ConversationReport, IngestError> {
    let (raw_list, header) = match data {
        Value::Array(items) => (items, None),
        Value::Object(mut obj) => match obj.remove("conversations") {
            Some(Value::Array(items)) => (items, Some(obj)),
            _ => return Err(IngestError::InvalidFormat),
        },
        _ => return Err(IngestError::InvalidFormat),
    };

    let mut earliest: Option<DateTime<Utc>> = None;
    let mut latest: Option<DateTime<Utc>> = None;
    let mut conversations = Vec::with_capacity(raw_list.len());

    for (index, item) in raw_list.into_iter().enumerate() {
        let item = match item {
            Value::Object(obj) => obj,
            other => {
                debug!(index, kind = ?other, "conversation entry is not an object");
                Map::new()
            }
        };

        let parsed_ts = first_truthy(&item, &["conversationCreated", "timestamp", "created"])
            .and_then(parse_timestamp);
        if let Some(ts) = parsed_ts {
            earliest = Some(earliest.map_or(ts, |e| e.min(ts)));
            latest = Some(latest.map_or(ts, |l| l.max(ts)));
        }

        let record = ConversationRecord::new(conversation_id(&item, index), parsed_ts.unwrap_or(now))
            .with_messages(messages(&item))
            .with_metadata(metadata(item));
        conversations.push(record);
    }

    let time_range = match (earliest, latest) {
        (Some(start), Some(end)) => Some(TimeRange { start, end }),
        _ => None,
    };

    let (report_id, generated_at) = match &header {
        Some(obj) => (
            first_truthy(obj, &["reportId"]).map(value_text),
            first_truthy(obj, &["generatedAt"]).and_then(parse_timestamp),
        ),
        None => (None, None),
    };

    Ok(ConversationReport {
        report_id,
        generated_at,
        conversations,
        time_range,
    })
}

// ============================================================================
// Field helpers
// ============================================================================

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// First value among `keys` that is present and truthy.
fn first_truthy<'a>(obj: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().filter_map(|k| obj.get(*k)).find(|v| is_truthy(v))
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn conversation_id(item: &Map<String, Value>, index: usize) -> ConversationId {
    match first_truthy(item, &["conversationId", "id"]) {
        Some(Value::Number(n)) => match n.as_i64() {
            Some(i) => ConversationId::Number(i),
            None => ConversationId::Text(n.to_string()),
        },
        Some(other) => ConversationId::Text(value_text(other)),
        None => ConversationId::Text(format!("conv-{}", index)),
    }
}

/// Epoch numbers (seconds below 1e10, else milliseconds), RFC 3339 strings,
/// naive `YYYY-MM-DD HH:MM:SS` (taken as UTC), or bare dates.
fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::Number(n) => {
            let raw = n.as_f64()?;
            let millis = if raw < EPOCH_SECONDS_CEILING { raw * 1000.0 } else { raw };
            if !millis.is_finite() {
                return None;
            }
            Utc.timestamp_millis_opt(millis.round() as i64).single()
        }
        Value::String(s) => parse_timestamp_str(s.trim()),
        _ => None,
    }
}

fn parse_timestamp_str(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

// ============================================================================
// Messages
// ============================================================================

fn messages(item: &Map<String, Value>) -> Vec<ConversationMessage> {
    let raw = ["transcript", "messages"]
        .iter()
        .find_map(|k| item.get(*k).and_then(Value::as_array));
    let Some(raw) = raw else {
        return Vec::new();
    };

    raw.iter()
        .map(|m| {
            let empty = Map::new();
            let m = m.as_object().unwrap_or(&empty);
            let role = first_truthy(m, &["role"])
                .and_then(Value::as_str)
                .and_then(parse_role)
                .unwrap_or_else(|| {
                    if m.get("participantType").and_then(Value::as_str) == Some("USER") {
                        MessageRole::User
                    } else {
                        MessageRole::Agent
                    }
                });
            let text = first_truthy(m, &["text", "content"])
                .map(value_text)
                .unwrap_or_default();
            let timestamp = first_truthy(m, &["timestamp", "created"]).map(value_text);

            ConversationMessage {
                role,
                text,
                timestamp,
            }
        })
        .collect()
}

fn parse_role(role: &str) -> Option<MessageRole> {
    serde_json::from_value(Value::String(role.to_ascii_lowercase())).ok()
}

// ============================================================================
// Metadata
// ============================================================================

fn metric_value<'a>(metrics: &'a [MetricEntry], code: &str) -> Option<&'a MetadataValue> {
    metrics.iter().find(|m| m.code == code).map(|m| &m.value)
}

fn opt_string(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn metadata(mut item: Map<String, Value>) -> ConversationMetadata {
    let metrics: Vec<MetricEntry> = item
        .get("metrics")
        .and_then(Value::as_array)
        .map(|list| {
            list.iter()
                .filter_map(|m| serde_json::from_value(m.clone()).ok())
                .collect()
        })
        .unwrap_or_default();

    let truthy_metric = |code: &str| metric_value(&metrics, code).filter(|v| !v.is_blank());

    let satisfaction_score = metric_value(&metrics, "satisfaction_score").and_then(MetadataValue::as_f64);

    let resolution_status = truthy_metric("resolution_status")
        .or_else(|| truthy_metric("InteractionClosureStatus"))
        .map(MetadataValue::to_text)
        .or_else(|| first_truthy(&item, &["resolution_status"]).map(value_text));

    let utterances = |code: &str| {
        metric_value(&metrics, code)
            .and_then(MetadataValue::as_f64)
            .unwrap_or(0.0)
    };
    let total = utterances("amelia_utterance_count") + utterances("end_user_utterance_count");
    let total_utterances = (total > 0.0).then(|| total.round() as u64);

    let primary_intent = metric_value(&metrics, "TriggeredIntent")
        .filter(|v| !v.is_null())
        .map(MetadataValue::to_text);
    let intent_validation = metric_value(&metrics, "IntentValidation")
        .filter(|v| !v.is_null())
        .cloned();

    let topics: Vec<Topic> = item
        .get("topics")
        .and_then(Value::as_array)
        .map(|list| {
            list.iter()
                .filter_map(|t| serde_json::from_value(t.clone()).ok())
                .collect()
        })
        .unwrap_or_default();

    let tags: Vec<String> = item
        .get("tags")
        .and_then(Value::as_array)
        .map(|list| list.iter().filter_map(|t| t.as_str().map(str::to_string)).collect())
        .unwrap_or_default();

    let meta = ConversationMetadata {
        user_id: opt_string(item.get("userId")),
        agent_id: opt_string(item.get("agentId")),
        user_name: opt_string(item.get("userName")),
        duration: item.get("duration").and_then(Value::as_f64),
        tags,
        sentiment: opt_string(item.get("sentiment")),
        channel: opt_string(item.get("channel")),
        initial_channel: opt_string(item.get("initialChannel")),
        domain: opt_string(item.get("domain")),
        domain_name: opt_string(item.get("domainName")),
        resolution_status,
        satisfaction_score,
        primary_intent,
        intent_validation,
        total_utterances,
        topics,
        metrics,
        extra: BTreeMap::new(),
    };

    // Extracted keys leave the bag; unusable shapes stay in `extra`.
    let typed: [(&str, bool); 12] = [
        ("userId", meta.user_id.is_some()),
        ("agentId", meta.agent_id.is_some()),
        ("userName", meta.user_name.is_some()),
        ("duration", meta.duration.is_some()),
        ("tags", !meta.tags.is_empty()),
        ("sentiment", meta.sentiment.is_some()),
        ("channel", meta.channel.is_some()),
        ("initialChannel", meta.initial_channel.is_some()),
        ("domain", meta.domain.is_some()),
        ("domainName", meta.domain_name.is_some()),
        ("topics", !meta.topics.is_empty()),
        ("metrics", !meta.metrics.is_empty()),
    ];
    for (key, extracted) in typed {
        if extracted {
            item.remove(key);
        }
    }
    for key in CONSUMED_KEYS {
        item.remove(*key);
    }

    ConversationMetadata {
        extra: item
            .into_iter()
            .filter(|(_, v)| !v.is_null())
            .map(|(k, v)| (k, MetadataValue::from(v)))
            .collect(),
        ..meta
    }
}
