use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PendingQueueEntryRow {
    pub id: i64,
    pub entry_id: String,
    pub identity: String,
    pub entity_type: String,
    pub queue_kind: String,
    pub operation: String,
    pub entity_id: Option<String>,
    pub temp_id: Option<String>,
    pub payload: String,
    pub enqueued_at: i64,
}
