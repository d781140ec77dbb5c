use crate::domain::value_objects::offline::{
    EntityType, IdentityScope, OperationKind, QueueEntryId, QueueKind, RecordId,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Result of replaying one queue entry against the remote store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ReplayOutcome {
    Succeeded {
        remote_id: Option<RecordId>,
    },
    Failed {
        reason: String,
        /// `true` only for connectivity failures.
        retryable: bool,
    },
}

impl ReplayOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ReplayOutcome::Succeeded { .. })
    }

    pub fn is_retryable_failure(&self) -> bool {
        matches!(self, ReplayOutcome::Failed { retryable: true, .. })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReplayResult {
    pub entry_id: QueueEntryId,
    pub entity_type: EntityType,
    pub queue_kind: QueueKind,
    pub operation: OperationKind,
    pub outcome: ReplayOutcome,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SyncReport {
    pub identity: IdentityScope,
    pub attempted: u32,
    pub succeeded: u32,
    pub failed: u32,
    /// Entries still queued after the pass.
    pub retained: u32,
    pub results: Vec<ReplayResult>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl SyncReport {
    pub fn from_results(
        identity: IdentityScope,
        results: Vec<ReplayResult>,
        retained: u32,
        started_at: DateTime<Utc>,
    ) -> Self {
        let attempted = results.len() as u32;
        let succeeded = results
            .iter()
            .filter(|result| result.outcome.is_success())
            .count() as u32;
        Self {
            identity,
            attempted,
            succeeded,
            failed: attempted - succeeded,
            retained,
            results,
            started_at,
            finished_at: Utc::now(),
        }
    }

    pub fn is_clean(&self) -> bool {
        self.failed == 0
    }

    pub fn failures(&self) -> impl Iterator<Item = &ReplayResult> {
        self.results
            .iter()
            .filter(|result| !result.outcome.is_success())
    }
}
