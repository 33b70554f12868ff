//! Use Case Deduplication
//!
//! Client-side pass over the consolidated report. Entries sharing an identity
//! key are merged: counts are summed and the first-seen entry's descriptive
//! fields are kept. Surviving entries stay in first-occurrence order.

use std::collections::HashMap;

use usecase_mapper_core::{AnalysisResult, UseCase};

/// Merge use cases that share an identity key.
pub fn deduplicate_use_cases(use_cases: Vec<UseCase>) -> Vec<UseCase> {
    let mut positions: HashMap<String, usize> = HashMap::with_capacity(use_cases.len());
    let mut merged: Vec<UseCase> = Vec::with_capacity(use_cases.len());

    for use_case in use_cases {
        match positions.get(&use_case.identity_key()) {
            Some(&pos) => {
                merged[pos].count = merged[pos].count.saturating_add(use_case.count);
            }
            None => {
                positions.insert(use_case.identity_key(), merged.len());
                merged.push(use_case);
            }
        }
    }

    merged
}

/// Apply `deduplicate_use_cases` to a report.
pub fn deduplicate(mut result: AnalysisResult) -> AnalysisResult {
    let before = result.identified_use_cases.len();
    result.identified_use_cases = deduplicate_use_cases(std::mem::take(&mut result.identified_use_cases));
    let after = result.identified_use_cases.len();
    if after < before {
        tracing::debug!(before, after, "merged duplicate use cases");
    }
    result
}
