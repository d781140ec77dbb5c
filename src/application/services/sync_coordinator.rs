use crate::application::ports::pending_queue::PendingQueue;
use crate::application::ports::remote_store::{RemoteStore, RemoteStoreError};
use crate::application::ports::sync_events::SyncEventEmitter;
use crate::domain::entities::offline::{
    QueueEntry, QueueOperation, ReplayOutcome, ReplayResult, SyncReport,
};
use crate::domain::value_objects::offline::{
    EntityType, IdentityScope, QueueEntryId, QueueKey, QueueKind, RecordId,
};
use crate::infrastructure::offline::metrics::{SyncMetrics, SyncMetricsSnapshot};
use crate::shared::config::CommitPolicy;
use chrono::Utc;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncPhase {
    Idle,
    Draining,
    Committed,
}

/// Replays queued mutations against the remote store and commits the queue afterwards.
///
/// A pass never aborts on a failed replay. Under [`CommitPolicy::ClearAll`] every drained
/// entry is removed once all entries were attempted, so failed replays are dropped; under
/// [`CommitPolicy::RetainRetryable`] entries that failed with `Unavailable` stay queued.
/// Entries appended after the snapshot are left for the next pass.
pub struct SyncCoordinator {
    remote: Arc<dyn RemoteStore>,
    queue: Arc<dyn PendingQueue>,
    policy: CommitPolicy,
    metrics: Arc<SyncMetrics>,
    event_emitter: Option<Arc<dyn SyncEventEmitter>>,
    gate: Mutex<()>,
    phase: RwLock<SyncPhase>,
}

struct DrainedKey {
    key: QueueKey,
    entries: Vec<QueueEntry>,
}

impl SyncCoordinator {
    pub fn new(
        remote: Arc<dyn RemoteStore>,
        queue: Arc<dyn PendingQueue>,
        policy: CommitPolicy,
    ) -> Self {
        Self {
            remote,
            queue,
            policy,
            metrics: Arc::new(SyncMetrics::new()),
            event_emitter: None,
            gate: Mutex::new(()),
            phase: RwLock::new(SyncPhase::Idle),
        }
    }

    pub fn with_emitter(mut self, emitter: Arc<dyn SyncEventEmitter>) -> Self {
        self.event_emitter = Some(emitter);
        self
    }

    pub fn policy(&self) -> CommitPolicy {
        self.policy
    }

    pub fn phase(&self) -> SyncPhase {
        self.phase
            .read()
            .map(|phase| *phase)
            .unwrap_or(SyncPhase::Idle)
    }

    pub fn metrics(&self) -> SyncMetricsSnapshot {
        self.metrics.snapshot()
    }

    /// Runs one pass for `scope`. Concurrent calls wait for the running pass to finish.
    pub async fn run(&self, scope: &IdentityScope) -> SyncReport {
        let _guard = self.gate.lock().await;
        let started_at = Utc::now();

        self.set_phase(SyncPhase::Draining);
        let snapshot = self.snapshot(scope).await;
        let results = self.drain(&snapshot).await;

        self.set_phase(SyncPhase::Committed);
        let retained = self.commit(&snapshot, &results).await;

        let report = SyncReport::from_results(scope.clone(), results, retained, started_at);
        self.metrics.record_pass(&report);
        self.emit(&report);
        self.set_phase(SyncPhase::Idle);

        info!(
            target: "offline::sync",
            identity = %scope,
            attempted = report.attempted,
            succeeded = report.succeeded,
            failed = report.failed,
            retained = report.retained,
            policy = self.policy.as_str(),
            "sync pass completed"
        );
        report
    }

    fn set_phase(&self, phase: SyncPhase) {
        if let Ok(mut guard) = self.phase.write() {
            *guard = phase;
        }
    }

    async fn snapshot(&self, scope: &IdentityScope) -> Vec<DrainedKey> {
        let mut snapshot = Vec::new();
        for entity_type in EntityType::ALL {
            for kind in QueueKind::REPLAYABLE {
                let key = QueueKey::new(scope.clone(), entity_type, kind);
                match self.queue.list_all(&key).await {
                    Ok(entries) => snapshot.push(DrainedKey { key, entries }),
                    Err(err) => warn!(
                        target: "offline::sync",
                        key = %key,
                        error = %err,
                        "pending queue unreadable, skipping key for this pass"
                    ),
                }
            }
        }
        snapshot
    }

    async fn drain(&self, snapshot: &[DrainedKey]) -> Vec<ReplayResult> {
        // temp id -> durable id for creates replayed earlier in this pass
        let mut assigned: HashMap<RecordId, RecordId> = HashMap::new();
        let mut results = Vec::new();

        for drained in snapshot {
            for entry in &drained.entries {
                let outcome = match self.replay(entry, &mut assigned).await {
                    Ok(remote_id) => ReplayOutcome::Succeeded { remote_id },
                    Err(err) => {
                        warn!(
                            target: "offline::sync",
                            key = %drained.key,
                            entry_id = %entry.entry_id,
                            operation = %entry.operation_kind(),
                            error = %err,
                            "replay failed"
                        );
                        ReplayOutcome::Failed {
                            reason: err.to_string(),
                            retryable: err.is_offline_fallback(),
                        }
                    }
                };
                results.push(ReplayResult {
                    entry_id: entry.entry_id.clone(),
                    entity_type: entry.entity_type,
                    queue_kind: drained.key.queue_kind,
                    operation: entry.operation_kind(),
                    outcome,
                });
            }
        }
        results
    }

    async fn replay(
        &self,
        entry: &QueueEntry,
        assigned: &mut HashMap<RecordId, RecordId>,
    ) -> Result<Option<RecordId>, RemoteStoreError> {
        match &entry.operation {
            QueueOperation::Create { temp_id, payload } => {
                let record = self.remote.create(entry.entity_type, payload).await?;
                debug!(
                    target: "offline::sync",
                    temp_id = %temp_id,
                    remote_id = %record.id,
                    "queued create accepted"
                );
                assigned.insert(temp_id.clone(), record.id.clone());
                Ok(Some(record.id))
            }
            QueueOperation::Update { entity_id, diff } => {
                let target = resolve_target(assigned, entity_id);
                self.remote.update(entry.entity_type, &target, diff).await?;
                Ok(Some(target))
            }
            QueueOperation::Delete { entity_id } => {
                let target = resolve_target(assigned, entity_id);
                self.remote.delete(entry.entity_type, &target).await?;
                Ok(Some(target))
            }
        }
    }

    /// Removes what the pass drained. Entries appended after the snapshot are never touched.
    async fn commit(&self, snapshot: &[DrainedKey], results: &[ReplayResult]) -> u32 {
        let outcomes: HashMap<&QueueEntryId, &ReplayOutcome> = results
            .iter()
            .map(|result| (&result.entry_id, &result.outcome))
            .collect();

        let mut retained = 0u32;
        for drained in snapshot {
            let (keep, remove): (Vec<&QueueEntry>, Vec<&QueueEntry>) =
                drained.entries.iter().partition(|entry| match self.policy {
                    CommitPolicy::ClearAll => false,
                    CommitPolicy::RetainRetryable => outcomes
                        .get(&entry.entry_id)
                        .is_some_and(|outcome| outcome.is_retryable_failure()),
                });
            retained += keep.len() as u32;
            if remove.is_empty() {
                continue;
            }

            let ids: Vec<QueueEntryId> =
                remove.iter().map(|entry| entry.entry_id.clone()).collect();
            if let Err(err) = self.queue.remove_entries(&drained.key, &ids).await {
                error!(
                    target: "offline::sync",
                    key = %drained.key,
                    error = %err,
                    "failed to remove drained entries"
                );
                retained += ids.len() as u32;
            }
        }
        retained
    }

    fn emit(&self, report: &SyncReport) {
        if let Some(emitter) = &self.event_emitter {
            if let Err(err) = emitter.emit_report(report) {
                warn!(
                    target: "offline::sync",
                    error = %err,
                    "failed to emit sync report"
                );
            }
        }
    }
}

fn resolve_target(assigned: &HashMap<RecordId, RecordId>, id: &RecordId) -> RecordId {
    assigned.get(id).cloned().unwrap_or_else(|| id.clone())
}
