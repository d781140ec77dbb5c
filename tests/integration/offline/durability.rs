use std::sync::Arc;

use crate::common::{FakeRemoteStore, TEACHER_SCOPE, scope, sync_config};
use edudash_offline::{
    CommitPolicy, ConnectionPool, EntityType, OfflineService, OfflineServiceTrait, RecordFilter,
    RecordPayload, SqlitePendingQueue,
};
use serde_json::json;

async fn open_service(url: &str, remote: Arc<FakeRemoteStore>) -> (OfflineService, ConnectionPool) {
    let pool = ConnectionPool::new(url).await.expect("file sqlite");
    pool.migrate().await.expect("migrations");
    let queue = Arc::new(SqlitePendingQueue::new(pool.get_pool().clone()));
    let service = OfflineService::new(remote, queue, &sync_config(CommitPolicy::ClearAll));
    service
        .sign_in(scope(TEACHER_SCOPE))
        .await
        .expect("sign in");
    (service, pool)
}

#[tokio::test]
async fn queued_save_survives_restart() {
    let dir = tempfile::tempdir().expect("tempdir");
    let url = format!("sqlite://{}?mode=rwc", dir.path().join("offline.db").display());
    let remote = Arc::new(FakeRemoteStore::new());
    remote.set_online(false);

    let (service, pool) = open_service(&url, remote.clone()).await;
    let id = service
        .save(
            EntityType::Content,
            RecordPayload::new(json!({"title": "Story A"})).expect("payload"),
        )
        .await
        .expect("save");
    drop(service);
    pool.close().await;

    let (service, _pool) = open_service(&url, remote.clone()).await;
    let records = service
        .list(EntityType::Content, RecordFilter::new())
        .await
        .expect("list");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].id, id);

    remote.set_online(true);
    let report = service.sync().await.expect("sync");
    assert_eq!(report.succeeded, 1);
    assert_eq!(remote.stored(EntityType::Content).len(), 1);
}
