//! Batch Planning
//!
//! Resolves the scope into a prefix of the input and partitions it into
//! contiguous batches of `batch_size`. The last batch may be smaller.

use usecase_mapper_core::{ConversationRecord, EngineSettings, ScopeSelection};

/// Contiguous batches over the scoped prefix of a conversation slice.
#[derive(Debug, Clone)]
pub struct BatchPlan<'a> {
    prefix: &'a [ConversationRecord],
    batch_size: usize,
}

impl<'a> BatchPlan<'a> {
    /// Plan batches for `conversations` under `scope`.
    pub fn new(
        conversations: &'a [ConversationRecord],
        scope: ScopeSelection,
        settings: &EngineSettings,
    ) -> Self {
        let len = scope.resolve(conversations.len());
        Self {
            prefix: &conversations[..len],
            batch_size: settings.batch_size().max(1),
        }
    }

    /// Records selected by the scope, in input order.
    pub fn prefix(&self) -> &'a [ConversationRecord] {
        self.prefix
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// `ceil(prefix_len / batch_size)`
    pub fn num_batches(&self) -> usize {
        self.prefix.len().div_ceil(self.batch_size)
    }

    pub fn is_empty(&self) -> bool {
        self.prefix.is_empty()
    }

    /// Batches in order. Each is a sub-slice of the prefix.
    pub fn batches(&self) -> std::slice::Chunks<'a, ConversationRecord> {
        self.prefix.chunks(self.batch_size)
    }
}
