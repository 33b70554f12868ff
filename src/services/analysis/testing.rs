//! Shared fixtures for analysis unit tests.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use tokio::time::Instant;
use usecase_mapper_core::{ConversationRecord, Credential, EngineSettings};
use usecase_mapper_llm::{LlmError, LlmResult, ResponseSchema, StructuredGenerator};

use super::observer::{AnalysisObserver, AnalysisStatus, ProgressControl};

/// One recorded `generate` call.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub model: String,
    pub prompt: String,
    pub schema_title: Option<String>,
    pub started: Instant,
}

/// Generator that replays scripted answers in order.
pub struct ScriptedGenerator {
    responses: Mutex<VecDeque<LlmResult<String>>>,
    calls: Mutex<Vec<RecordedCall>>,
    latency: Duration,
}

impl ScriptedGenerator {
    pub fn new(responses: Vec<LlmResult<String>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            calls: Mutex::new(Vec::new()),
            latency: Duration::ZERO,
        }
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl StructuredGenerator for ScriptedGenerator {
    fn name(&self) -> &'static str {
        "scripted"
    }

    async fn generate(
        &self,
        _credential: &Credential,
        model: &str,
        prompt: &str,
        schema: &ResponseSchema,
    ) -> LlmResult<String> {
        self.calls.lock().unwrap().push(RecordedCall {
            model: model.to_string(),
            prompt: prompt.to_string(),
            schema_title: schema.title.clone(),
            started: Instant::now(),
        });
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        let next = self.responses.lock().unwrap().pop_front();
        next.unwrap_or_else(|| {
            Err(LlmError::Other {
                message: "script exhausted".to_string(),
            })
        })
    }
}

/// Observer that records notifications and halts from a given batch on.
pub struct RecordingObserver {
    progress: Mutex<Vec<(usize, usize)>>,
    statuses: Mutex<Vec<AnalysisStatus>>,
    halt_from: Option<usize>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self {
            progress: Mutex::new(Vec::new()),
            statuses: Mutex::new(Vec::new()),
            halt_from: None,
        }
    }

    /// Return `Halt` for every batch numbered `batch` or later.
    pub fn halting_from(batch: usize) -> Self {
        Self {
            halt_from: Some(batch),
            ..Self::new()
        }
    }

    pub fn progress(&self) -> Vec<(usize, usize)> {
        self.progress.lock().unwrap().clone()
    }

    pub fn statuses(&self) -> Vec<AnalysisStatus> {
        self.statuses.lock().unwrap().clone()
    }
}

impl AnalysisObserver for RecordingObserver {
    fn on_progress(&self, current: usize, total: usize) -> ProgressControl {
        self.progress.lock().unwrap().push((current, total));
        match self.halt_from {
            Some(from) if current >= from => ProgressControl::Halt,
            _ => ProgressControl::Continue,
        }
    }

    fn on_status(&self, status: AnalysisStatus) {
        self.statuses.lock().unwrap().push(status);
    }
}

pub fn records(n: usize) -> Vec<ConversationRecord> {
    (0..n)
        .map(|i| ConversationRecord::new(format!("conv-{}", i), Utc::now()))
        .collect()
}

pub fn settings(batch_size: usize) -> EngineSettings {
    EngineSettings::new("test-model", batch_size, 15.0).unwrap()
}

/// A valid map-stage answer with one use case.
pub fn partial_json(task: &str, count: u64) -> String {
    serde_json::json!({
        "useCases": [{
            "vertical": "Banking",
            "audience": "Customer",
            "task": task,
            "channel": "Chat",
            "description": format!("Customers want to {}", task),
            "count": count
        }],
        "sentiment": { "positive": 60.0, "neutral": 30.0, "negative": 10.0 }
    })
    .to_string()
}

/// A valid consolidation answer with the given `(task, channel, count)` use cases.
pub fn analysis_json(use_cases: &[(&str, &str, u64)]) -> String {
    let use_cases: Vec<serde_json::Value> = use_cases
        .iter()
        .map(|(task, channel, count)| {
            serde_json::json!({
                "vertical": "Banking",
                "audience": "Customer",
                "task": task,
                "channel": channel,
                "description": format!("{} over {}", task, channel),
                "count": count
            })
        })
        .collect();
    serde_json::json!({
        "summary": "Customers mostly need account help.",
        "identifiedUseCases": use_cases,
        "commonPatterns": [
            { "title": "Repeat contacts", "description": "Users retry after failure", "frequency": "High" }
        ],
        "topIssues": ["Password reset loops"],
        "sentimentDistribution": { "positive": 55.0, "neutral": 30.0, "negative": 15.0 },
        "keyTakeaways": ["Self-service is underused"],
        "suggestedImprovements": ["Add a reset link to the first reply"]
    })
    .to_string()
}
