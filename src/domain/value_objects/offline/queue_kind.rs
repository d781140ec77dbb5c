use super::OperationKind;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum QueueKind {
    /// Creates that failed against the remote store.
    OfflineMutations,
    PendingUpdates,
    PendingDeletions,
    /// Write-through shadow copy kept regardless of remote success.
    AutoSavedMirror,
}

impl QueueKind {
    pub const ALL: [QueueKind; 4] = [
        QueueKind::OfflineMutations,
        QueueKind::PendingUpdates,
        QueueKind::PendingDeletions,
        QueueKind::AutoSavedMirror,
    ];

    /// Kinds replayed by a sync pass, in drain order.
    pub const REPLAYABLE: [QueueKind; 3] = [
        QueueKind::OfflineMutations,
        QueueKind::PendingUpdates,
        QueueKind::PendingDeletions,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            QueueKind::OfflineMutations => "offlineMutations",
            QueueKind::PendingUpdates => "pendingUpdates",
            QueueKind::PendingDeletions => "pendingDeletions",
            QueueKind::AutoSavedMirror => "autoSavedMirror",
        }
    }

    pub fn for_operation(kind: OperationKind) -> Self {
        match kind {
            OperationKind::Create => QueueKind::OfflineMutations,
            OperationKind::Update => QueueKind::PendingUpdates,
            OperationKind::Delete => QueueKind::PendingDeletions,
        }
    }

    pub fn is_replayable(&self) -> bool {
        !matches!(self, QueueKind::AutoSavedMirror)
    }

    /// Whether entries of this kind surface as records in a degraded read.
    pub fn holds_creations(&self) -> bool {
        matches!(
            self,
            QueueKind::OfflineMutations | QueueKind::AutoSavedMirror
        )
    }
}

impl fmt::Display for QueueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for QueueKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "offlineMutations" => Ok(QueueKind::OfflineMutations),
            "pendingUpdates" => Ok(QueueKind::PendingUpdates),
            "pendingDeletions" => Ok(QueueKind::PendingDeletions),
            "autoSavedMirror" => Ok(QueueKind::AutoSavedMirror),
            other => Err(format!("Unknown queue kind: {other}")),
        }
    }
}
