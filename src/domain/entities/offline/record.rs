use crate::domain::value_objects::offline::{EntityType, RecordId, RecordPayload};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Where a record handed back by a read came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordOrigin {
    Remote,
    Queued,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Record {
    pub id: RecordId,
    pub entity_type: EntityType,
    pub payload: RecordPayload,
    pub created_at: DateTime<Utc>,
    pub origin: RecordOrigin,
}

impl Record {
    pub fn remote(
        id: RecordId,
        entity_type: EntityType,
        payload: RecordPayload,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            entity_type,
            payload,
            created_at,
            origin: RecordOrigin::Remote,
        }
    }

    pub fn queued(
        id: RecordId,
        entity_type: EntityType,
        payload: RecordPayload,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            entity_type,
            payload,
            created_at,
            origin: RecordOrigin::Queued,
        }
    }

    pub fn is_queued(&self) -> bool {
        self.origin == RecordOrigin::Queued
    }

    /// Payload fields with `id` folded in, the shape collaborators render.
    pub fn to_flat_json(&self) -> Value {
        let mut value = self.payload.as_json().clone();
        if let Value::Object(map) = &mut value {
            map.insert("id".to_string(), Value::String(self.id.to_string()));
        }
        value
    }
}
