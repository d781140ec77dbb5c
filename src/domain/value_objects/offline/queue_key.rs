use super::{EntityType, IdentityScope, QueueKind};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Composite key every queue read and write is namespaced by.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct QueueKey {
    pub identity: IdentityScope,
    pub entity_type: EntityType,
    pub queue_kind: QueueKind,
}

impl QueueKey {
    pub fn new(identity: IdentityScope, entity_type: EntityType, queue_kind: QueueKind) -> Self {
        Self {
            identity,
            entity_type,
            queue_kind,
        }
    }

    /// Every key owned by one identity.
    pub fn all_for(identity: &IdentityScope) -> Vec<QueueKey> {
        EntityType::ALL
            .iter()
            .flat_map(|entity_type| {
                QueueKind::ALL
                    .iter()
                    .map(move |kind| QueueKey::new(identity.clone(), *entity_type, *kind))
            })
            .collect()
    }
}

impl fmt::Display for QueueKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}",
            self.entity_type, self.queue_kind, self.identity
        )
    }
}
