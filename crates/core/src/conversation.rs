//! Conversation Model
//!
//! Normalized conversation records as handed to the analysis orchestrator.
//! Records are immutable once constructed; the orchestrator only borrows them.
//!
//! Metadata is an explicit optional-field record. Fields that have no typed
//! slot land in `extra`, whose values are restricted to a small closed set of
//! kinds (`MetadataValue`).

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// Identity
// ============================================================================

/// Conversation identifier. Source systems use either numeric or string ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConversationId {
    Number(i64),
    Text(String),
}

impl std::fmt::Display for ConversationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConversationId::Number(n) => write!(f, "{}", n),
            ConversationId::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<&str> for ConversationId {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for ConversationId {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for ConversationId {
    fn from(value: i64) -> Self {
        Self::Number(value)
    }
}

// ============================================================================
// Messages
// ============================================================================

/// Speaker of a transcript message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    #[serde(alias = "assistant", alias = "bot")]
    Agent,
    System,
}

/// A single transcript message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationMessage {
    pub role: MessageRole,
    #[serde(default)]
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

impl ConversationMessage {
    /// Create a message without a timestamp.
    pub fn new(role: MessageRole, text: impl Into<String>) -> Self {
        Self {
            role,
            text: text.into(),
            timestamp: None,
        }
    }

    /// Create a user message
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(MessageRole::User, text)
    }

    /// Create an agent message
    pub fn agent(text: impl Into<String>) -> Self {
        Self::new(MessageRole::Agent, text)
    }
}

// ============================================================================
// Metadata
// ============================================================================

/// Value kinds permitted in free-form metadata entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum MetadataValue {
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
    List(Vec<MetadataValue>),
    Map(BTreeMap<String, MetadataValue>),
}

impl MetadataValue {
    pub fn is_null(&self) -> bool {
        matches!(self, MetadataValue::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            MetadataValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            MetadataValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Whether the value would be falsy as a field fallback (null, empty
    /// string, zero, false).
    pub fn is_blank(&self) -> bool {
        match self {
            MetadataValue::Null => true,
            MetadataValue::Bool(b) => !b,
            MetadataValue::Number(n) => *n == 0.0 || n.is_nan(),
            MetadataValue::Text(s) => s.is_empty(),
            MetadataValue::List(_) | MetadataValue::Map(_) => false,
        }
    }

    /// Render scalar values as plain text; composite values as compact JSON.
    pub fn to_text(&self) -> String {
        match self {
            MetadataValue::Null => String::new(),
            MetadataValue::Bool(b) => b.to_string(),
            MetadataValue::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    format!("{}", *n as i64)
                } else {
                    n.to_string()
                }
            }
            MetadataValue::Text(s) => s.clone(),
            other => serde_json::to_string(other).unwrap_or_default(),
        }
    }
}

impl From<serde_json::Value> for MetadataValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => MetadataValue::Null,
            serde_json::Value::Bool(b) => MetadataValue::Bool(b),
            serde_json::Value::Number(n) => n
                .as_f64()
                .map(MetadataValue::Number)
                .unwrap_or(MetadataValue::Null),
            serde_json::Value::String(s) => MetadataValue::Text(s),
            serde_json::Value::Array(items) => {
                MetadataValue::List(items.into_iter().map(MetadataValue::from).collect())
            }
            serde_json::Value::Object(map) => MetadataValue::Map(
                map.into_iter()
                    .map(|(k, v)| (k, MetadataValue::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<&str> for MetadataValue {
    fn from(value: &str) -> Self {
        MetadataValue::Text(value.to_string())
    }
}

impl From<f64> for MetadataValue {
    fn from(value: f64) -> Self {
        MetadataValue::Number(value)
    }
}

/// A topic detected by the source platform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Topic {
    pub topic_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolution_status: Option<String>,
}

impl Topic {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            topic_name: name.into(),
            explanation: None,
            resolution_status: None,
        }
    }
}

/// A coded metric entry, e.g. `{ "code": "executed_goals", "value": 2 }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricEntry {
    pub code: String,
    #[serde(default)]
    pub value: MetadataValue,
}

impl MetricEntry {
    pub fn new(code: impl Into<String>, value: impl Into<MetadataValue>) -> Self {
        Self {
            code: code.into(),
            value: value.into(),
        }
    }
}

/// Conversation metadata with explicit optional fields.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    /// Duration in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentiment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_channel: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolution_status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub satisfaction_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_intent: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intent_validation: Option<MetadataValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_utterances: Option<u64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub topics: Vec<Topic>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub metrics: Vec<MetricEntry>,
    /// Source fields without a typed slot.
    #[serde(flatten)]
    pub extra: BTreeMap<String, MetadataValue>,
}

impl ConversationMetadata {
    /// Value of the first metric with the given code.
    pub fn metric(&self, code: &str) -> Option<&MetadataValue> {
        self.metrics.iter().find(|m| m.code == code).map(|m| &m.value)
    }
}

// ============================================================================
// Records
// ============================================================================

/// A normalized conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationRecord {
    pub id: ConversationId,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub messages: Vec<ConversationMessage>,
    #[serde(default)]
    pub metadata: ConversationMetadata,
}

impl ConversationRecord {
    /// Create a record with no messages and empty metadata.
    pub fn new(id: impl Into<ConversationId>, timestamp: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            timestamp,
            messages: Vec::new(),
            metadata: ConversationMetadata::default(),
        }
    }

    pub fn with_messages(mut self, messages: Vec<ConversationMessage>) -> Self {
        self.messages = messages;
        self
    }

    pub fn with_metadata(mut self, metadata: ConversationMetadata) -> Self {
        self.metadata = metadata;
        self
    }
}

/// Inclusive time window covered by a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// A batch of conversations loaded from one export.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationReport {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_at: Option<DateTime<Utc>>,
    pub conversations: Vec<ConversationRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_range: Option<TimeRange>,
}
