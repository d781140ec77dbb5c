use super::mappers::{columns_from_entry, entry_from_row};
use super::queries::{
    COUNT_QUEUE_ENTRIES_BY_KEY, DELETE_QUEUE_ENTRIES_BY_IDENTITY, DELETE_QUEUE_ENTRIES_BY_KEY,
    DELETE_QUEUE_ENTRY_BY_ID, INSERT_QUEUE_ENTRY, SELECT_IDENTITIES, SELECT_QUEUE_ENTRIES_BY_KEY,
};
use super::rows::PendingQueueEntryRow;
use crate::application::ports::pending_queue::PendingQueue;
use crate::domain::entities::offline::QueueEntry;
use crate::domain::value_objects::offline::{IdentityScope, QueueEntryId, QueueKey};
use crate::shared::error::AppError;
use async_trait::async_trait;
use sqlx::{Pool, Row, Sqlite};
use tracing::{debug, warn};

/// SQLite-backed pending queue. One row per queue entry, keyed by identity/entity/kind.
#[derive(Clone)]
pub struct SqlitePendingQueue {
    pool: Pool<Sqlite>,
}

impl SqlitePendingQueue {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    /// Identities that currently own at least one queued entry.
    pub async fn list_identities(&self) -> Result<Vec<IdentityScope>, AppError> {
        let rows = sqlx::query(SELECT_IDENTITIES)
            .fetch_all(&self.pool)
            .await?;

        let mut identities = Vec::with_capacity(rows.len());
        for row in rows {
            let raw: String = row.try_get("identity")?;
            match IdentityScope::new(raw) {
                Ok(identity) => identities.push(identity),
                Err(err) => warn!(
                    target: "offline::queue",
                    error = %err,
                    "skipping unreadable identity in pending queue"
                ),
            }
        }
        Ok(identities)
    }
}

#[async_trait]
impl PendingQueue for SqlitePendingQueue {
    async fn append(&self, key: &QueueKey, entry: &QueueEntry) -> Result<(), AppError> {
        if entry.entity_type != key.entity_type {
            return Err(AppError::InvalidInput(format!(
                "Entry for {} cannot be appended to {}",
                entry.entity_type, key
            )));
        }
        let columns = columns_from_entry(entry)?;

        sqlx::query(INSERT_QUEUE_ENTRY)
            .bind(&columns.entry_id)
            .bind(key.identity.as_str())
            .bind(columns.entity_type)
            .bind(key.queue_kind.as_str())
            .bind(columns.operation)
            .bind(&columns.entity_id)
            .bind(&columns.temp_id)
            .bind(&columns.payload)
            .bind(columns.enqueued_at)
            .execute(&self.pool)
            .await?;

        debug!(
            target: "offline::queue",
            key = %key,
            entry_id = %entry.entry_id,
            operation = %entry.operation_kind(),
            "queue entry appended"
        );
        Ok(())
    }

    async fn list_all(&self, key: &QueueKey) -> Result<Vec<QueueEntry>, AppError> {
        let rows = sqlx::query_as::<_, PendingQueueEntryRow>(SELECT_QUEUE_ENTRIES_BY_KEY)
            .bind(key.identity.as_str())
            .bind(key.entity_type.as_str())
            .bind(key.queue_kind.as_str())
            .fetch_all(&self.pool)
            .await?;

        let mut entries = Vec::with_capacity(rows.len());
        for row in &rows {
            match entry_from_row(row) {
                Ok(entry) => entries.push(entry),
                Err(err) => warn!(
                    target: "offline::queue",
                    key = %key,
                    error = %err,
                    "skipping corrupt queue entry"
                ),
            }
        }
        Ok(entries)
    }

    async fn count(&self, key: &QueueKey) -> Result<u64, AppError> {
        let row = sqlx::query(COUNT_QUEUE_ENTRIES_BY_KEY)
            .bind(key.identity.as_str())
            .bind(key.entity_type.as_str())
            .bind(key.queue_kind.as_str())
            .fetch_one(&self.pool)
            .await?;
        let count: i64 = row.try_get("count")?;
        Ok(count.max(0) as u64)
    }

    async fn clear(&self, key: &QueueKey) -> Result<u64, AppError> {
        let result = sqlx::query(DELETE_QUEUE_ENTRIES_BY_KEY)
            .bind(key.identity.as_str())
            .bind(key.entity_type.as_str())
            .bind(key.queue_kind.as_str())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn remove_entries(
        &self,
        key: &QueueKey,
        entry_ids: &[QueueEntryId],
    ) -> Result<u64, AppError> {
        if entry_ids.is_empty() {
            return Ok(0);
        }

        let mut tx = self.pool.begin().await?;
        let mut removed = 0;
        for entry_id in entry_ids {
            let result = sqlx::query(DELETE_QUEUE_ENTRY_BY_ID)
                .bind(key.identity.as_str())
                .bind(key.entity_type.as_str())
                .bind(key.queue_kind.as_str())
                .bind(entry_id.as_str())
                .execute(&mut *tx)
                .await?;
            removed += result.rows_affected();
        }
        tx.commit().await?;
        Ok(removed)
    }

    async fn purge_identity(&self, identity: &IdentityScope) -> Result<u64, AppError> {
        let result = sqlx::query(DELETE_QUEUE_ENTRIES_BY_IDENTITY)
            .bind(identity.as_str())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
