//! Prompts and Output Schemas
//!
//! Prompt builders and structured-output schemas for the map and reduce calls,
//! plus the lenient JSON extraction applied to model output before parsing.

use serde::de::IgnoredAny;
use usecase_mapper_core::{Frequency, PartialResult};
use usecase_mapper_llm::ResponseSchema;

use super::summarizer::BatchPayload;

// ============================================================================
// Prompts
// ============================================================================

/// Per-batch instruction: identify use cases with counts for this batch only.
pub fn batch_prompt(payloads: &[BatchPayload]) -> Result<String, serde_json::Error> {
    let data = serde_json::to_string(payloads)?;
    Ok(format!(
        "Analyze these {} conversation records. Identify the specific USE CASES \
         (Vertical, Audience, Task, Channel).\n\
         For each use case found IN THIS BATCH, provide a count of how many \
         conversations matched it.\n\
         Also estimate the sentiment split (positive, neutral, negative percentages) \
         for this batch.\n\n\
         Data: {}",
        payloads.len(),
        data
    ))
}

/// Consolidation instruction over every collected partial result.
pub fn consolidation_prompt(partials: &[PartialResult]) -> Result<String, serde_json::Error> {
    let data = serde_json::to_string(partials)?;
    Ok(format!(
        "I have analyzed a conversation report in {} batches.\n\
         Here are the raw results: {}\n\n\
         Please provide a FINAL, GLOBAL analysis for the dataset:\n\
         1. MERGE identical or overlapping Use Cases. If the Task and Channel are the same, \
         they MUST be merged.\n\
         2. SUM the counts for merged use cases.\n\
         3. Create a unified Executive Summary.\n\
         4. Aggregate top issues and suggest improvements.\n\
         5. Average the sentiment distribution.",
        partials.len(),
        data
    ))
}

// ============================================================================
// Schemas
// ============================================================================

fn use_case_schema() -> ResponseSchema {
    ResponseSchema::object(vec![
        ("vertical", ResponseSchema::string()),
        ("audience", ResponseSchema::string()),
        ("task", ResponseSchema::string()),
        ("channel", ResponseSchema::string()),
        ("description", ResponseSchema::string()),
        ("count", ResponseSchema::integer()),
    ])
}

fn sentiment_schema() -> ResponseSchema {
    ResponseSchema::object(vec![
        ("positive", ResponseSchema::number()),
        ("neutral", ResponseSchema::number()),
        ("negative", ResponseSchema::number()),
    ])
}

/// Map-stage output: `{ useCases: [...], sentiment: {...} }`.
pub fn partial_result_schema() -> ResponseSchema {
    ResponseSchema::object(vec![
        ("useCases", ResponseSchema::array(use_case_schema())),
        ("sentiment", sentiment_schema()),
    ])
    .with_title("partial_result")
}

/// Reduce-stage output. Every field is required.
pub fn analysis_result_schema() -> ResponseSchema {
    let pattern = ResponseSchema::object(vec![
        ("title", ResponseSchema::string()),
        ("description", ResponseSchema::string()),
        ("frequency", ResponseSchema::string_enum(&Frequency::ALL)),
    ]);

    ResponseSchema::object(vec![
        ("summary", ResponseSchema::string()),
        ("identifiedUseCases", ResponseSchema::array(use_case_schema())),
        ("commonPatterns", ResponseSchema::array(pattern)),
        ("topIssues", ResponseSchema::array(ResponseSchema::string())),
        ("sentimentDistribution", sentiment_schema()),
        ("keyTakeaways", ResponseSchema::array(ResponseSchema::string())),
        (
            "suggestedImprovements",
            ResponseSchema::array(ResponseSchema::string()),
        ),
    ])
    .with_title("analysis_result")
}

// ============================================================================
// Output Extraction
// ============================================================================

/// Pull the JSON object out of a model answer.
///
/// Structured output normally returns bare JSON, but some endpoints still wrap
/// it in markdown fences or surround it with prose. Text that already parses
/// as JSON is returned whole, so fences inside string values survive.
pub fn extract_json(response_text: &str) -> &str {
    let trimmed = response_text.trim();

    if serde_json::from_str::<IgnoredAny>(trimmed).is_ok() {
        return trimmed;
    }

    if let Some(start) = trimmed.find("```") {
        let after_fence = &trimmed[start + 3..];
        // Skip optional language tag ("json")
        let content_start = after_fence.find('\n').map(|nl| nl + 1).unwrap_or(0);
        let content = &after_fence[content_start..];
        if let Some(end) = content.find("```") {
            return content[..end].trim();
        }
    }

    if let (Some(start), Some(end)) = (trimmed.find('{'), trimmed.rfind('}')) {
        if start <= end {
            return &trimmed[start..=end];
        }
    }

    trimmed
}
