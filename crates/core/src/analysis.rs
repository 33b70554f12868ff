//! Analysis Report Types
//!
//! Shapes exchanged with the remote model: per-batch `PartialResult`s from the
//! map stage and the consolidated `AnalysisResult` from the reduce stage.
//! Wire names are camelCase to match the structured-output schemas.

use serde::{de, Deserialize, Deserializer, Serialize};

/// A recurring interaction pattern identified by the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UseCase {
    pub vertical: String,
    pub audience: String,
    pub task: String,
    pub channel: String,
    pub description: String,
    /// Number of conversations matching this use case. Additive across merges.
    #[serde(deserialize_with = "deserialize_count")]
    pub count: u64,
}

impl UseCase {
    /// Identity key used for merging: lowercase `vertical|audience|task|channel`
    /// with all whitespace removed.
    pub fn identity_key(&self) -> String {
        format!(
            "{}|{}|{}|{}",
            self.vertical, self.audience, self.task, self.channel
        )
        .to_lowercase()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect()
    }
}

/// Models occasionally emit counts as floats (`3.0`); accept any non-negative
/// finite number and round.
fn deserialize_count<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = f64::deserialize(deserializer)?;
    if !raw.is_finite() || raw < 0.0 {
        return Err(de::Error::custom(format!("invalid use case count: {}", raw)));
    }
    Ok(raw.round() as u64)
}

/// How often a pattern occurs across the dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Frequency {
    #[serde(alias = "high", alias = "HIGH")]
    High,
    #[serde(alias = "medium", alias = "MEDIUM")]
    Medium,
    #[serde(alias = "low", alias = "LOW")]
    Low,
}

impl Frequency {
    pub const ALL: [&'static str; 3] = ["High", "Medium", "Low"];
}

impl std::fmt::Display for Frequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Frequency::High => write!(f, "High"),
            Frequency::Medium => write!(f, "Medium"),
            Frequency::Low => write!(f, "Low"),
        }
    }
}

/// A recurring behavioral pattern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pattern {
    pub title: String,
    pub description: String,
    pub frequency: Frequency,
}

/// Sentiment split in percentages, nominally summing to ~100.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SentimentDistribution {
    #[serde(default)]
    pub positive: f64,
    #[serde(default)]
    pub neutral: f64,
    #[serde(default)]
    pub negative: f64,
}

impl SentimentDistribution {
    pub fn new(positive: f64, neutral: f64, negative: f64) -> Self {
        Self {
            positive,
            neutral,
            negative,
        }
    }

    pub fn total(&self) -> f64 {
        self.positive + self.neutral + self.negative
    }
}

/// Output of one map-stage call.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartialResult {
    #[serde(default)]
    pub use_cases: Vec<UseCase>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentiment: Option<SentimentDistribution>,
}

/// Consolidated analysis report. Every field is required on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub summary: String,
    pub identified_use_cases: Vec<UseCase>,
    pub common_patterns: Vec<Pattern>,
    pub top_issues: Vec<String>,
    pub sentiment_distribution: SentimentDistribution,
    pub key_takeaways: Vec<String>,
    pub suggested_improvements: Vec<String>,
}

impl AnalysisResult {
    /// Sum of use-case counts.
    pub fn total_use_case_count(&self) -> u64 {
        self.identified_use_cases.iter().map(|uc| uc.count).sum()
    }
}
