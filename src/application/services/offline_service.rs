use super::read_merger::ReadMerger;
use super::session_lifecycle::SessionLifecycle;
use super::sync_coordinator::SyncCoordinator;
use crate::application::ports::pending_queue::PendingQueue;
use crate::application::ports::remote_store::RemoteStore;
use crate::application::ports::sync_events::SyncEventEmitter;
use crate::domain::entities::offline::{QueueEntry, Record, RecordFilter, SyncReport};
use crate::domain::value_objects::offline::{
    EntityType, IdentityScope, QueueKey, QueueKind, RecordId, RecordPayload,
};
use crate::infrastructure::offline::metrics::SyncMetricsSnapshot;
use crate::shared::config::SyncConfig;
use crate::shared::error::AppError;
use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PendingCount {
    pub entity_type: EntityType,
    pub queue_kind: QueueKind,
    pub count: u64,
}

/// Surface consumed by the dashboard features.
///
/// Connectivity failures never surface from `save`, `update`, `delete` or `list`;
/// the call is queued or served from local data instead.
#[async_trait]
pub trait OfflineServiceTrait: Send + Sync {
    async fn sign_in(&self, scope: IdentityScope) -> Result<(), AppError>;
    async fn sign_out(&self) -> Result<u64, AppError>;
    async fn save(
        &self,
        entity_type: EntityType,
        payload: RecordPayload,
    ) -> Result<RecordId, AppError>;
    async fn list(
        &self,
        entity_type: EntityType,
        filter: RecordFilter,
    ) -> Result<Vec<Record>, AppError>;
    async fn update(
        &self,
        entity_type: EntityType,
        id: RecordId,
        diff: RecordPayload,
    ) -> Result<(), AppError>;
    async fn delete(&self, entity_type: EntityType, id: RecordId) -> Result<(), AppError>;
    async fn sync(&self) -> Result<SyncReport, AppError>;
    async fn pending_counts(&self) -> Result<Vec<PendingCount>, AppError>;
}

pub struct OfflineService {
    remote: Arc<dyn RemoteStore>,
    queue: Arc<dyn PendingQueue>,
    reader: ReadMerger,
    coordinator: SyncCoordinator,
    session: SessionLifecycle,
    auto_save_mirror: bool,
}

impl OfflineService {
    pub fn new(
        remote: Arc<dyn RemoteStore>,
        queue: Arc<dyn PendingQueue>,
        config: &SyncConfig,
    ) -> Self {
        Self {
            reader: ReadMerger::new(remote.clone(), queue.clone()),
            coordinator: SyncCoordinator::new(remote.clone(), queue.clone(), config.commit_policy),
            session: SessionLifecycle::new(queue.clone()),
            remote,
            queue,
            auto_save_mirror: config.auto_save_mirror,
        }
    }

    pub fn with_emitter(mut self, emitter: Arc<dyn SyncEventEmitter>) -> Self {
        self.coordinator = self.coordinator.with_emitter(emitter);
        self
    }

    pub async fn active_scope(&self) -> Option<IdentityScope> {
        self.session.active_scope().await
    }

    pub fn sync_metrics(&self) -> SyncMetricsSnapshot {
        self.coordinator.metrics()
    }

    /// Appends to `kind` for `scope`, then makes sure the write did not outlive a sign-out
    /// that raced with it.
    async fn append_scoped(
        &self,
        scope: &IdentityScope,
        kind: QueueKind,
        entry: &QueueEntry,
    ) -> Result<(), AppError> {
        let key = QueueKey::new(scope.clone(), entry.entity_type, kind);
        self.queue.append(&key, entry).await?;

        if self.session.active_scope().await.as_ref() != Some(scope) {
            warn!(
                target: "offline::session",
                identity = %scope,
                "identity signed out while queuing, purging its storage again"
            );
            self.queue.purge_identity(scope).await?;
            return Err(AppError::Unauthorized(
                "Identity signed out during the operation".to_string(),
            ));
        }
        Ok(())
    }

    async fn mirror(
        &self,
        scope: &IdentityScope,
        record_id: &RecordId,
        entity_type: EntityType,
        payload: &RecordPayload,
    ) {
        if !self.auto_save_mirror {
            return;
        }
        let entry = QueueEntry::create(entity_type, record_id.clone(), payload.clone());
        if let Err(err) = self
            .append_scoped(scope, QueueKind::AutoSavedMirror, &entry)
            .await
        {
            warn!(
                target: "offline::queue",
                identity = %scope,
                record_id = %record_id,
                error = %err,
                "failed to write auto-saved mirror copy"
            );
        }
    }

    async fn queue_offline(
        &self,
        scope: &IdentityScope,
        entry: QueueEntry,
        reason: &str,
    ) -> Result<(), AppError> {
        let kind = QueueKind::for_operation(entry.operation_kind());
        self.append_scoped(scope, kind, &entry).await?;
        info!(
            target: "offline::queue",
            identity = %scope,
            entity_type = %entry.entity_type,
            operation = %entry.operation_kind(),
            reason,
            "mutation queued"
        );
        Ok(())
    }
}

#[async_trait]
impl OfflineServiceTrait for OfflineService {
    async fn sign_in(&self, scope: IdentityScope) -> Result<(), AppError> {
        self.session.on_sign_in(scope).await
    }

    async fn sign_out(&self) -> Result<u64, AppError> {
        match self.session.active_scope().await {
            Some(scope) => self.session.on_sign_out(&scope).await,
            None => Ok(0),
        }
    }

    async fn save(
        &self,
        entity_type: EntityType,
        payload: RecordPayload,
    ) -> Result<RecordId, AppError> {
        let scope = self.session.require_scope().await?;

        match self.remote.create(entity_type, &payload).await {
            Ok(record) => {
                debug!(
                    target: "offline::queue",
                    entity_type = %entity_type,
                    record_id = %record.id,
                    "record saved remotely"
                );
                self.mirror(&scope, &record.id, entity_type, &record.payload)
                    .await;
                Ok(record.id)
            }
            Err(err) if err.is_offline_fallback() => {
                let temp_id = RecordId::generate_temporary();
                let entry = QueueEntry::create(entity_type, temp_id.clone(), payload.clone());
                self.queue_offline(&scope, entry, &err.to_string()).await?;
                self.mirror(&scope, &temp_id, entity_type, &payload).await;
                Ok(temp_id)
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn list(
        &self,
        entity_type: EntityType,
        filter: RecordFilter,
    ) -> Result<Vec<Record>, AppError> {
        let scope = self.session.require_scope().await?;
        self.reader.read(&scope, entity_type, &filter).await
    }

    async fn update(
        &self,
        entity_type: EntityType,
        id: RecordId,
        diff: RecordPayload,
    ) -> Result<(), AppError> {
        let scope = self.session.require_scope().await?;

        // 未同期のレコードはリモートに存在しない。作成と同じパスで再送する
        if id.is_temporary() {
            let entry = QueueEntry::update(entity_type, id, diff);
            return self
                .queue_offline(&scope, entry, "target not yet synced")
                .await;
        }

        match self.remote.update(entity_type, &id, &diff).await {
            Ok(()) => Ok(()),
            Err(err) if err.is_offline_fallback() => {
                let entry = QueueEntry::update(entity_type, id, diff);
                self.queue_offline(&scope, entry, &err.to_string()).await
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn delete(&self, entity_type: EntityType, id: RecordId) -> Result<(), AppError> {
        let scope = self.session.require_scope().await?;

        if id.is_temporary() {
            let entry = QueueEntry::delete(entity_type, id);
            return self
                .queue_offline(&scope, entry, "target not yet synced")
                .await;
        }

        match self.remote.delete(entity_type, &id).await {
            Ok(()) => Ok(()),
            Err(err) if err.is_offline_fallback() => {
                let entry = QueueEntry::delete(entity_type, id);
                self.queue_offline(&scope, entry, &err.to_string()).await
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn sync(&self) -> Result<SyncReport, AppError> {
        let scope = self.session.require_scope().await?;
        Ok(self.coordinator.run(&scope).await)
    }

    async fn pending_counts(&self) -> Result<Vec<PendingCount>, AppError> {
        let scope = self.session.require_scope().await?;
        let mut counts = Vec::new();
        for key in QueueKey::all_for(&scope) {
            let count = self.queue.count(&key).await?;
            if count > 0 {
                counts.push(PendingCount {
                    entity_type: key.entity_type,
                    queue_kind: key.queue_kind,
                    count,
                });
            }
        }
        Ok(counts)
    }
}
