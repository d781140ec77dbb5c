use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::common::mocks::MockRemoteStore;
use crate::common::{scope, setup_offline_service, sync_config, TEACHER_SCOPE};
use chrono::Utc;
use edudash_offline::{
    AppError, CommitPolicy, ConnectionPool, EntityType, OfflineServiceTrait, PendingQueue,
    QueueEntry, QueueKey, QueueKind, Record, RecordId, RecordPayload, RemoteStoreError,
    SqlitePendingQueue, SyncCoordinator,
};
use serde_json::json;

async fn memory_queue() -> Arc<SqlitePendingQueue> {
    let pool = ConnectionPool::from_memory().await.expect("in-memory sqlite");
    pool.migrate().await.expect("migrations");
    Arc::new(SqlitePendingQueue::new(pool.get_pool().clone()))
}

fn creates_key() -> QueueKey {
    QueueKey::new(
        scope(TEACHER_SCOPE),
        EntityType::Content,
        QueueKind::OfflineMutations,
    )
}

#[tokio::test]
async fn rejected_replay_is_dropped_under_clear_all() {
    let ctx = setup_offline_service(sync_config(CommitPolicy::ClearAll)).await;
    ctx.remote.set_online(false);

    for body in [json!({"title": "ok"}), json!({"title": "bad", "invalid": true})] {
        ctx.service
            .save(EntityType::Content, RecordPayload::new(body).expect("payload"))
            .await
            .expect("save");
    }

    ctx.remote.set_online(true);
    let report = ctx.service.sync().await.expect("sync");

    assert_eq!(report.attempted, 2);
    assert_eq!(report.succeeded, 1);
    assert_eq!(report.failures().count(), 1);
    assert!(ctx.service.pending_counts().await.expect("counts").is_empty());
}

#[tokio::test]
async fn retain_retryable_keeps_unavailable_entries_for_next_pass() {
    let queue = memory_queue().await;
    queue
        .append(
            &creates_key(),
            &QueueEntry::create(
                EntityType::Content,
                RecordId::generate_temporary(),
                RecordPayload::new(json!({"title": "Story A"})).expect("payload"),
            ),
        )
        .await
        .expect("append");

    let attempts = Arc::new(AtomicUsize::new(0));
    let mut remote = MockRemoteStore::new();
    let counter = attempts.clone();
    remote
        .expect_create()
        .times(2)
        .returning(move |entity_type, payload| {
            if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                return Err(RemoteStoreError::Unavailable("timeout".into()));
            }
            Ok(Record::remote(
                RecordId::parse("R1").expect("id"),
                entity_type,
                payload.clone(),
                Utc::now(),
            ))
        });

    let coordinator =
        SyncCoordinator::new(Arc::new(remote), queue.clone(), CommitPolicy::RetainRetryable);

    let first = coordinator.run(&scope(TEACHER_SCOPE)).await;
    assert_eq!(first.failed, 1);
    assert_eq!(first.retained, 1);
    assert_eq!(queue.count(&creates_key()).await.expect("count"), 1);

    let second = coordinator.run(&scope(TEACHER_SCOPE)).await;
    assert!(second.is_clean());
    assert_eq!(second.retained, 0);
    assert_eq!(queue.count(&creates_key()).await.expect("count"), 0);
    assert_eq!(attempts.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn empty_queue_pass_makes_no_remote_calls() {
    let queue = memory_queue().await;
    let remote = MockRemoteStore::new();
    let coordinator = SyncCoordinator::new(Arc::new(remote), queue, CommitPolicy::ClearAll);

    let report = coordinator.run(&scope(TEACHER_SCOPE)).await;
    assert_eq!(report.attempted, 0);
    assert!(report.is_clean());
}

#[tokio::test]
async fn validation_failure_on_live_save_is_not_queued() {
    let queue = memory_queue().await;
    let mut remote = MockRemoteStore::new();
    remote
        .expect_create()
        .times(1)
        .returning(|_, _| Err(RemoteStoreError::ValidationFailed("title required".into())));

    let service = edudash_offline::OfflineService::new(
        Arc::new(remote),
        queue.clone(),
        &sync_config(CommitPolicy::ClearAll),
    );
    service
        .sign_in(scope(TEACHER_SCOPE))
        .await
        .expect("sign in");

    let result = service
        .save(
            EntityType::Content,
            RecordPayload::new(json!({"title": ""})).expect("payload"),
        )
        .await;
    assert!(matches!(result, Err(AppError::ValidationError(_))));
    assert_eq!(queue.count(&creates_key()).await.expect("count"), 0);
}
