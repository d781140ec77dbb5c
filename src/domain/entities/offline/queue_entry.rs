use crate::domain::entities::offline::Record;
use crate::domain::value_objects::offline::{
    EntityType, OperationKind, QueueEntryId, RecordId, RecordPayload, monotonic_micros,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The mutation a queue entry stands for.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum QueueOperation {
    /// `temp_id` is the id the record is known by locally until a replay assigns a durable one.
    Create {
        temp_id: RecordId,
        payload: RecordPayload,
    },
    Update {
        entity_id: RecordId,
        diff: RecordPayload,
    },
    Delete {
        entity_id: RecordId,
    },
}

impl QueueOperation {
    pub fn kind(&self) -> OperationKind {
        match self {
            QueueOperation::Create { .. } => OperationKind::Create,
            QueueOperation::Update { .. } => OperationKind::Update,
            QueueOperation::Delete { .. } => OperationKind::Delete,
        }
    }

    /// Target id for updates and deletes, `None` for creates.
    pub fn entity_id(&self) -> Option<&RecordId> {
        match self {
            QueueOperation::Create { .. } => None,
            QueueOperation::Update { entity_id, .. } | QueueOperation::Delete { entity_id } => {
                Some(entity_id)
            }
        }
    }

    pub fn payload(&self) -> RecordPayload {
        match self {
            QueueOperation::Create { payload, .. } => payload.clone(),
            QueueOperation::Update { diff, .. } => diff.clone(),
            QueueOperation::Delete { .. } => RecordPayload::empty(),
        }
    }
}

/// One pending mutation. Entries are never edited after they are appended.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QueueEntry {
    pub entry_id: QueueEntryId,
    pub entity_type: EntityType,
    pub operation: QueueOperation,
    pub enqueued_at: DateTime<Utc>,
}

impl QueueEntry {
    pub fn new(entity_type: EntityType, operation: QueueOperation) -> Self {
        let enqueued_at = DateTime::<Utc>::from_timestamp_micros(monotonic_micros())
            .unwrap_or_else(Utc::now);
        Self {
            entry_id: QueueEntryId::generate(),
            entity_type,
            operation,
            enqueued_at,
        }
    }

    pub fn create(entity_type: EntityType, temp_id: RecordId, payload: RecordPayload) -> Self {
        Self::new(entity_type, QueueOperation::Create { temp_id, payload })
    }

    pub fn update(entity_type: EntityType, entity_id: RecordId, diff: RecordPayload) -> Self {
        Self::new(entity_type, QueueOperation::Update { entity_id, diff })
    }

    pub fn delete(entity_type: EntityType, entity_id: RecordId) -> Self {
        Self::new(entity_type, QueueOperation::Delete { entity_id })
    }

    pub fn operation_kind(&self) -> OperationKind {
        self.operation.kind()
    }

    /// Transient record for a queued create; `None` for updates and deletes.
    pub fn to_record(&self) -> Option<Record> {
        match &self.operation {
            QueueOperation::Create { temp_id, payload } => Some(Record::queued(
                temp_id.clone(),
                self.entity_type,
                payload.clone(),
                self.enqueued_at,
            )),
            _ => None,
        }
    }
}
