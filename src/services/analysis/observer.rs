//! Run Observer
//!
//! Callbacks the orchestrator invokes at batch boundaries and stage changes.
//! Progress doubles as the cooperative cancellation signal: it is polled once
//! per batch and never interrupts a call that is already in flight.

use serde::{Deserialize, Serialize};

/// Answer returned from a progress callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProgressControl {
    #[default]
    Continue,
    /// Skip the remaining batches once at least one partial result exists.
    Halt,
}

impl From<bool> for ProgressControl {
    /// `false` requests a halt; `true` continues.
    fn from(keep_going: bool) -> Self {
        if keep_going {
            ProgressControl::Continue
        } else {
            ProgressControl::Halt
        }
    }
}

/// Stage announcements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisStatus {
    Batching,
    Consolidating,
}

impl std::fmt::Display for AnalysisStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AnalysisStatus::Batching => write!(f, "batching"),
            AnalysisStatus::Consolidating => write!(f, "consolidating"),
        }
    }
}

/// Receives progress and status notifications from a run.
pub trait AnalysisObserver: Send + Sync {
    /// Called before batch `current` (1-based) of `total` is issued.
    fn on_progress(&self, _current: usize, _total: usize) -> ProgressControl {
        ProgressControl::Continue
    }

    /// Called when the run enters a new stage.
    fn on_status(&self, _status: AnalysisStatus) {}
}

/// Observer that ignores every notification.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl AnalysisObserver for NoopObserver {}
