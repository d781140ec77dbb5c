#![allow(dead_code)]

pub mod fake_remote;
pub mod mocks;

use std::sync::Arc;

use edudash_offline::shared::config::SyncConfig;
use edudash_offline::{
    CommitPolicy, ConnectionPool, IdentityScope, OfflineService, OfflineServiceTrait,
    SqlitePendingQueue,
};

pub use fake_remote::FakeRemoteStore;

pub const TEACHER_SCOPE: &str = "teacher-a";
pub const OTHER_SCOPE: &str = "teacher-b";

pub struct OfflineTestContext {
    pub service: OfflineService,
    pub remote: Arc<FakeRemoteStore>,
    pub queue: Arc<SqlitePendingQueue>,
    pub pool: ConnectionPool,
}

pub fn sync_config(commit_policy: CommitPolicy) -> SyncConfig {
    SyncConfig {
        auto_sync: true,
        commit_policy,
        auto_save_mirror: false,
    }
}

pub async fn setup_offline_service(config: SyncConfig) -> OfflineTestContext {
    let pool = ConnectionPool::from_memory().await.expect("in-memory sqlite");
    pool.migrate().await.expect("migrations");

    let queue = Arc::new(SqlitePendingQueue::new(pool.get_pool().clone()));
    let remote = Arc::new(FakeRemoteStore::new());
    let service = OfflineService::new(remote.clone(), queue.clone(), &config);
    service
        .sign_in(scope(TEACHER_SCOPE))
        .await
        .expect("sign in");

    OfflineTestContext {
        service,
        remote,
        queue,
        pool,
    }
}

pub fn scope(value: &str) -> IdentityScope {
    IdentityScope::parse(value).expect("identity scope")
}
