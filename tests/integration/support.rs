//! Shared helpers for integration tests.

use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::json;
use tokio::time::Instant;
use usecase_mapper_core::Credential;
use usecase_mapper_llm::{LlmError, LlmResult, ResponseSchema, StructuredGenerator};

/// What a routed generator answers for the map stage.
#[derive(Clone)]
pub enum MapReply {
    Ok(String),
    Garbage,
    Fail(LlmError),
}

/// Answers map calls from a per-call script and consolidation calls with a
/// fixed body, routed by the response schema title.
pub struct RoutedGenerator {
    map_replies: Mutex<Vec<MapReply>>,
    reduce_reply: LlmResult<String>,
    pub map_prompts: Mutex<Vec<String>>,
    pub reduce_prompts: Mutex<Vec<String>>,
    pub starts: Mutex<Vec<Instant>>,
}

impl RoutedGenerator {
    pub fn new(map_replies: Vec<MapReply>, reduce_reply: LlmResult<String>) -> Self {
        let mut map_replies = map_replies;
        map_replies.reverse();
        Self {
            map_replies: Mutex::new(map_replies),
            reduce_reply,
            map_prompts: Mutex::new(Vec::new()),
            reduce_prompts: Mutex::new(Vec::new()),
            starts: Mutex::new(Vec::new()),
        }
    }

    pub fn map_calls(&self) -> usize {
        self.map_prompts.lock().unwrap().len()
    }

    pub fn reduce_calls(&self) -> usize {
        self.reduce_prompts.lock().unwrap().len()
    }
}

#[async_trait]
impl StructuredGenerator for RoutedGenerator {
    fn name(&self) -> &'static str {
        "routed"
    }

    async fn generate(
        &self,
        credential: &Credential,
        _model: &str,
        prompt: &str,
        schema: &ResponseSchema,
    ) -> LlmResult<String> {
        assert_eq!(credential.expose(), "integration-key");
        self.starts.lock().unwrap().push(Instant::now());

        if schema.title.as_deref() == Some("analysis_result") {
            self.reduce_prompts.lock().unwrap().push(prompt.to_string());
            return self.reduce_reply.clone();
        }

        self.map_prompts.lock().unwrap().push(prompt.to_string());
        match self.map_replies.lock().unwrap().pop() {
            Some(MapReply::Ok(body)) => Ok(body),
            Some(MapReply::Garbage) => Ok("I could not produce JSON this time".to_string()),
            Some(MapReply::Fail(err)) => Err(err),
            None => Err(LlmError::Other {
                message: "no scripted reply".to_string(),
            }),
        }
    }
}

pub fn credential() -> Credential {
    Credential::new("integration-key").unwrap()
}

pub fn partial(task: &str, count: u64) -> MapReply {
    MapReply::Ok(
        json!({
            "useCases": [{
                "vertical": "Retail",
                "audience": "Customer",
                "task": task,
                "channel": "Chat",
                "description": format!("{} requests", task),
                "count": count
            }],
            "sentiment": {"positive": 60, "neutral": 30, "negative": 10}
        })
        .to_string(),
    )
}

/// Consolidated report body with one use case per `(task, count)`.
pub fn consolidated(use_cases: &[(&str, u64)]) -> String {
    let use_cases: Vec<_> = use_cases
        .iter()
        .map(|(task, count)| {
            json!({
                "vertical": "Retail",
                "audience": "Customer",
                "task": task,
                "channel": "Chat",
                "description": format!("{} requests", task),
                "count": count
            })
        })
        .collect();
    json!({
        "summary": "Customers mostly track orders and request refunds.",
        "identifiedUseCases": use_cases,
        "commonPatterns": [
            {"title": "Repeat contacts", "description": "Customers follow up on late orders", "frequency": "High"}
        ],
        "topIssues": ["Late delivery"],
        "sentimentDistribution": {"positive": 55, "neutral": 30, "negative": 15},
        "keyTakeaways": ["Order tracking dominates volume"],
        "suggestedImprovements": ["Proactive shipping updates"]
    })
    .to_string()
}

/// Export in the nested-metrics shape, `n` conversations one minute apart.
pub fn export(n: usize) -> serde_json::Value {
    let conversations: Vec<_> = (0..n)
        .map(|i| {
            json!({
                "conversationId": format!("c-{}", i),
                "conversationCreated": 1_700_000_000_000i64 + (i as i64) * 60_000,
                "domainName": "Retail",
                "initialChannel": "web",
                "metrics": [
                    {"code": "TriggeredIntent", "value": "track_order"},
                    {"code": "satisfaction_score", "value": 4},
                    {"code": "resolution_status", "value": "resolved"}
                ],
                "transcript": [
                    {"participantType": "USER", "text": format!("Where is my order number {}?", i)},
                    {"participantType": "AGENT", "text": "Let me check that for you."}
                ]
            })
        })
        .collect();
    json!({ "reportId": "rep-1", "conversations": conversations })
}
