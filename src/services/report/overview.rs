//! Report Overview
//!
//! Headline numbers for a loaded report, computed locally without any remote
//! call.

use serde::Serialize;
use usecase_mapper_core::{ConversationReport, ScopeSelection, TimeRange};

/// Summary statistics for a report under a scope.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportOverview {
    pub total_conversations: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_range: Option<TimeRange>,
    /// Mean of numeric satisfaction scores, two decimals. `None` without scores.
    pub average_satisfaction: Option<f64>,
    /// Mean turns per conversation, rounded
    pub average_turns: u64,
    /// Scope as selected
    pub scope: ScopeSelection,
    /// Records the scope selects
    pub scoped_conversations: usize,
}

impl ReportOverview {
    pub fn from_report(report: &ConversationReport, scope: ScopeSelection) -> Self {
        let conversations = &report.conversations;
        let total = conversations.len();

        let scores: Vec<f64> = conversations
            .iter()
            .filter_map(|c| c.metadata.satisfaction_score)
            .filter(|s| s.is_finite())
            .collect();
        let average_satisfaction = if scores.is_empty() {
            None
        } else {
            let mean = scores.iter().sum::<f64>() / scores.len() as f64;
            Some((mean * 100.0).round() / 100.0)
        };

        // Transcript length when present, else the utterance count from metrics
        let total_turns: u64 = conversations
            .iter()
            .map(|c| {
                if c.messages.is_empty() {
                    c.metadata.total_utterances.unwrap_or(0)
                } else {
                    c.messages.len() as u64
                }
            })
            .sum();
        let average_turns = if total == 0 {
            0
        } else {
            (total_turns as f64 / total as f64).round() as u64
        };

        Self {
            total_conversations: total,
            time_range: report.time_range,
            average_satisfaction,
            average_turns,
            scope,
            scoped_conversations: scope.resolve(total),
        }
    }
}
