//! Batch Summarizer
//!
//! Projects a conversation record down to the handful of fields the remote
//! model needs. Full transcripts are never sent; only a short leading snippet
//! of the first message.

use serde::Serialize;
use usecase_mapper_core::{ConversationId, ConversationRecord, MetadataValue};

/// Maximum characters of the first message carried in a payload.
pub const SNIPPET_CHARS: usize = 100;

const TRIGGERED_INTENT_METRIC: &str = "TriggeredIntent";
const EXECUTED_GOALS_METRIC: &str = "executed_goals";

/// Reduced projection of a conversation. Absent fields are omitted from JSON.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchPayload {
    pub id: ConversationId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intent: Option<MetadataValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topics: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub executed_goals: Option<MetadataValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolution: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snippet: Option<String>,
}

fn non_empty(value: Option<&String>) -> Option<String> {
    value.filter(|s| !s.is_empty()).cloned()
}

/// Build the payload for one record. Never fails.
pub fn summarize(record: &ConversationRecord) -> BatchPayload {
    let meta = &record.metadata;

    let domain = non_empty(meta.domain.as_ref()).or_else(|| non_empty(meta.domain_name.as_ref()));

    let intent = non_empty(meta.primary_intent.as_ref())
        .map(MetadataValue::Text)
        .or_else(|| {
            meta.metric(TRIGGERED_INTENT_METRIC)
                .filter(|v| !v.is_null())
                .cloned()
        });

    let topics = if meta.topics.is_empty() {
        None
    } else {
        Some(meta.topics.iter().map(|t| t.topic_name.clone()).collect())
    };

    let executed_goals = meta
        .metric(EXECUTED_GOALS_METRIC)
        .filter(|v| !v.is_null())
        .cloned();

    let snippet = record
        .messages
        .first()
        .map(|m| m.text.chars().take(SNIPPET_CHARS).collect());

    BatchPayload {
        id: record.id.clone(),
        domain,
        intent,
        topics,
        executed_goals,
        channel: meta.initial_channel.clone(),
        resolution: meta.resolution_status.clone(),
        snippet,
    }
}

/// Build payloads for a whole batch, preserving order.
pub fn summarize_batch(batch: &[ConversationRecord]) -> Vec<BatchPayload> {
    batch.iter().map(summarize).collect()
}
