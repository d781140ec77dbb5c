//! Offline-resilient persistence for the EduDash dashboard.
//!
//! Mutations that cannot reach the remote store are queued per identity, replayed by
//! [`SyncCoordinator`] when connectivity returns, and purged on sign-out.

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod shared;
pub mod state;

pub use application::ports::{PendingQueue, RemoteStore, RemoteStoreError, SyncEventEmitter};
pub use application::services::{
    OfflineService, OfflineServiceTrait, PendingCount, ReadMerger, SessionEvent,
    SessionLifecycle, SessionStage, SyncCoordinator, SyncPhase,
};
pub use domain::entities::offline::{
    QueueEntry, QueueOperation, Record, RecordFilter, RecordOrigin, ReplayOutcome, ReplayResult,
    SyncReport,
};
pub use domain::value_objects::offline::{
    EntityType, IdentityScope, OperationKind, QueueEntryId, QueueKey, QueueKind, RecordId,
    RecordPayload,
};
pub use infrastructure::database::ConnectionPool;
pub use infrastructure::offline::{
    ConnectivityMonitor, SqlitePendingQueue, SyncMetrics, SyncMetricsSnapshot,
};
pub use infrastructure::remote::HttpRemoteStore;
pub use shared::{AppConfig, AppError, CommitPolicy};
pub use state::OfflineState;

/// Installs the fmt subscriber. `RUST_LOG` overrides the default filter.
pub fn init_logging() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    // 既に初期化済みなら何もしない
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "edudash_offline=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}
