use crate::application::ports::pending_queue::PendingQueue;
use crate::application::ports::remote_store::RemoteStore;
use crate::domain::entities::offline::{Record, RecordFilter};
use crate::domain::value_objects::offline::{EntityType, IdentityScope, QueueKey, QueueKind};
use crate::shared::error::AppError;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, warn};

/// Folds locally queued creations into remote query results.
pub struct ReadMerger {
    remote: Arc<dyn RemoteStore>,
    queue: Arc<dyn PendingQueue>,
}

impl ReadMerger {
    pub fn new(remote: Arc<dyn RemoteStore>, queue: Arc<dyn PendingQueue>) -> Self {
        Self { remote, queue }
    }

    /// Remote records in remote order followed by queued creates in enqueue order.
    ///
    /// A queued create that has just been accepted remotely may show up twice until the
    /// next sync pass clears it. When the remote store is unavailable only the local
    /// creations and the auto-saved mirror are returned, deduplicated by id. The filter's
    /// limit caps the merged list, not just the remote page.
    pub async fn read(
        &self,
        scope: &IdentityScope,
        entity_type: EntityType,
        filter: &RecordFilter,
    ) -> Result<Vec<Record>, AppError> {
        let mut records = match self.remote.query(entity_type, filter).await {
            Ok(mut records) => {
                let queued = self
                    .queued_records(scope, entity_type, QueueKind::OfflineMutations, filter)
                    .await;
                debug!(
                    target: "offline::read",
                    entity_type = %entity_type,
                    remote = records.len(),
                    queued = queued.len(),
                    "merged remote and queued records"
                );
                records.extend(queued);
                records
            }
            Err(err) if err.is_offline_fallback() => {
                debug!(
                    target: "offline::read",
                    entity_type = %entity_type,
                    error = %err,
                    "remote query unavailable, serving local view"
                );
                self.degraded_view(scope, entity_type, filter).await
            }
            Err(err) => return Err(err.into()),
        };

        if let Some(limit) = filter.limit {
            records.truncate(limit as usize);
        }
        Ok(records)
    }

    async fn degraded_view(
        &self,
        scope: &IdentityScope,
        entity_type: EntityType,
        filter: &RecordFilter,
    ) -> Vec<Record> {
        let mut seen = HashSet::new();
        let mut records = Vec::new();
        for kind in [QueueKind::OfflineMutations, QueueKind::AutoSavedMirror] {
            for record in self.queued_records(scope, entity_type, kind, filter).await {
                if seen.insert(record.id.clone()) {
                    records.push(record);
                }
            }
        }
        records
    }

    async fn queued_records(
        &self,
        scope: &IdentityScope,
        entity_type: EntityType,
        kind: QueueKind,
        filter: &RecordFilter,
    ) -> Vec<Record> {
        let key = QueueKey::new(scope.clone(), entity_type, kind);
        let entries = match self.queue.list_all(&key).await {
            Ok(entries) => entries,
            Err(err) => {
                warn!(
                    target: "offline::read",
                    key = %key,
                    error = %err,
                    "pending queue unreadable, treating as empty"
                );
                return Vec::new();
            }
        };

        entries
            .iter()
            .filter_map(|entry| entry.to_record())
            .filter(|record| filter.matches(&record.payload))
            .collect()
    }
}
