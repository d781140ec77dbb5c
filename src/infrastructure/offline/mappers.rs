use super::rows::PendingQueueEntryRow;
use crate::domain::entities::offline::{QueueEntry, QueueOperation};
use crate::domain::value_objects::offline::{
    EntityType, OperationKind, QueueEntryId, RecordId, RecordPayload,
};
use crate::shared::error::AppError;
use chrono::{DateTime, Utc};

/// Column values for one INSERT into `pending_queue_entries`.
#[derive(Debug, Clone)]
pub(super) struct QueueEntryColumns {
    pub entry_id: String,
    pub entity_type: &'static str,
    pub operation: &'static str,
    pub entity_id: Option<String>,
    pub temp_id: Option<String>,
    pub payload: String,
    pub enqueued_at: i64,
}

pub(super) fn columns_from_entry(entry: &QueueEntry) -> Result<QueueEntryColumns, AppError> {
    let (entity_id, temp_id) = match &entry.operation {
        QueueOperation::Create { temp_id, .. } => (None, Some(temp_id.to_string())),
        QueueOperation::Update { entity_id, .. } | QueueOperation::Delete { entity_id } => {
            (Some(entity_id.to_string()), None)
        }
    };
    let payload = serde_json::to_string(entry.operation.payload().as_json())
        .map_err(|err| AppError::SerializationError(err.to_string()))?;

    Ok(QueueEntryColumns {
        entry_id: entry.entry_id.to_string(),
        entity_type: entry.entity_type.as_str(),
        operation: entry.operation_kind().as_str(),
        entity_id,
        temp_id,
        payload,
        enqueued_at: entry.enqueued_at.timestamp_micros(),
    })
}

fn corrupt(row: &PendingQueueEntryRow, detail: impl std::fmt::Display) -> AppError {
    AppError::StorageCorrupt(format!("queue row {} ({}): {detail}", row.id, row.entry_id))
}

pub(super) fn entry_from_row(row: &PendingQueueEntryRow) -> Result<QueueEntry, AppError> {
    let entry_id = QueueEntryId::parse(&row.entry_id).map_err(|err| corrupt(row, err))?;
    let entity_type: EntityType = row.entity_type.parse().map_err(|err| corrupt(row, err))?;
    let operation_kind: OperationKind = row.operation.parse().map_err(|err| corrupt(row, err))?;
    let payload = RecordPayload::from_json_str(&row.payload).map_err(|err| corrupt(row, err))?;
    let enqueued_at = DateTime::<Utc>::from_timestamp_micros(row.enqueued_at)
        .ok_or_else(|| corrupt(row, "invalid enqueued_at timestamp"))?;

    let required_id = |value: &Option<String>, column: &str| -> Result<RecordId, AppError> {
        let raw = value
            .as_deref()
            .ok_or_else(|| corrupt(row, format!("missing {column}")))?;
        RecordId::parse(raw).map_err(|err| corrupt(row, err))
    };

    let operation = match operation_kind {
        OperationKind::Create => QueueOperation::Create {
            temp_id: required_id(&row.temp_id, "temp_id")?,
            payload,
        },
        OperationKind::Update => QueueOperation::Update {
            entity_id: required_id(&row.entity_id, "entity_id")?,
            diff: payload,
        },
        OperationKind::Delete => QueueOperation::Delete {
            entity_id: required_id(&row.entity_id, "entity_id")?,
        },
    };

    Ok(QueueEntry {
        entry_id,
        entity_type,
        operation,
        enqueued_at,
    })
}
