use crate::domain::entities::offline::QueueEntry;
use crate::domain::value_objects::offline::{IdentityScope, QueueEntryId, QueueKey};
use crate::shared::error::AppError;
use async_trait::async_trait;

/// Durable, identity-scoped log of uncommitted mutations.
///
/// `append`, `clear`, `remove_entries` and `purge_identity` are each atomic: no reader
/// observes a queue mixing contents from before and after one of these calls.
#[async_trait]
pub trait PendingQueue: Send + Sync {
    /// Completes only once the entry is durable.
    async fn append(&self, key: &QueueKey, entry: &QueueEntry) -> Result<(), AppError>;

    /// Entries for `key` in `enqueued_at` order.
    async fn list_all(&self, key: &QueueKey) -> Result<Vec<QueueEntry>, AppError>;

    async fn count(&self, key: &QueueKey) -> Result<u64, AppError>;

    async fn clear(&self, key: &QueueKey) -> Result<u64, AppError>;

    /// Removes individual entries. Only the sync coordinator commits this way.
    async fn remove_entries(
        &self,
        key: &QueueKey,
        entry_ids: &[QueueEntryId],
    ) -> Result<u64, AppError>;

    /// Deletes every key owned by `identity`, across all entity types and queue kinds.
    async fn purge_identity(&self, identity: &IdentityScope) -> Result<u64, AppError>;
}
