use crate::application::services::OfflineService;
use crate::infrastructure::database::ConnectionPool;
use crate::infrastructure::offline::{ConnectivityMonitor, SqlitePendingQueue};
use crate::infrastructure::remote::HttpRemoteStore;
use crate::shared::config::AppConfig;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::info;

/// Wires the persistence layer from configuration.
pub struct OfflineState {
    pub config: AppConfig,
    pub pool: ConnectionPool,
    pub queue: Arc<SqlitePendingQueue>,
    pub service: Arc<OfflineService>,
}

impl OfflineState {
    pub async fn new(config: AppConfig) -> anyhow::Result<Self> {
        config.validate().map_err(anyhow::Error::msg)?;

        // データディレクトリを作成
        std::fs::create_dir_all(&config.storage.data_dir)?;

        let pool = ConnectionPool::from_config(&config.database).await?;
        pool.migrate().await?;

        let queue = Arc::new(SqlitePendingQueue::new(pool.get_pool().clone()));
        let remote = Arc::new(HttpRemoteStore::from_config(&config.remote)?);
        let service = Arc::new(OfflineService::new(remote, queue.clone(), &config.sync));

        info!(
            database = %config.database.url,
            commit_policy = config.sync.commit_policy.as_str(),
            "offline persistence ready"
        );

        Ok(Self {
            config,
            pool,
            queue,
            service,
        })
    }

    /// Starts the reconnect trigger for the given connectivity signal.
    pub fn watch_connectivity(&self, online: watch::Receiver<bool>) -> JoinHandle<u64> {
        ConnectivityMonitor::new(self.service.clone(), self.config.sync.auto_sync).spawn(online)
    }
}
