use crate::application::services::offline_service::OfflineServiceTrait;
use crate::shared::error::AppError;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Runs a sync pass whenever the connectivity signal flips from offline to online.
pub struct ConnectivityMonitor {
    service: Arc<dyn OfflineServiceTrait>,
    auto_sync: bool,
}

impl ConnectivityMonitor {
    pub fn new(service: Arc<dyn OfflineServiceTrait>, auto_sync: bool) -> Self {
        Self { service, auto_sync }
    }

    /// Watches `online` until its sender is dropped. The task yields the number of
    /// passes it completed.
    pub fn spawn(self, mut online: watch::Receiver<bool>) -> JoinHandle<u64> {
        tokio::spawn(async move {
            let mut was_online = *online.borrow_and_update();
            let mut passes = 0u64;

            while online.changed().await.is_ok() {
                let is_online = *online.borrow_and_update();
                let reconnected = is_online && !was_online;
                was_online = is_online;

                if !reconnected {
                    continue;
                }
                if !self.auto_sync {
                    debug!(target: "offline::sync", "connectivity restored, auto sync disabled");
                    continue;
                }

                match self.service.sync().await {
                    Ok(report) => {
                        passes += 1;
                        info!(
                            target: "offline::sync",
                            identity = %report.identity,
                            attempted = report.attempted,
                            failed = report.failed,
                            "sync after reconnect finished"
                        );
                    }
                    // サインアウト中は同期対象がない
                    Err(AppError::Unauthorized(_)) => {
                        debug!(target: "offline::sync", "connectivity restored with no identity");
                    }
                    Err(err) => {
                        warn!(target: "offline::sync", error = %err, "sync after reconnect failed");
                    }
                }
            }

            debug!(target: "offline::sync", passes, "connectivity signal closed");
            passes
        })
    }
}
