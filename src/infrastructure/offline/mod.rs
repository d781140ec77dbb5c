pub mod connectivity;
mod mappers;
pub mod metrics;
mod queries;
mod rows;
pub mod sqlite_queue;

pub use connectivity::ConnectivityMonitor;
pub use metrics::{SyncMetrics, SyncMetricsSnapshot};
pub use sqlite_queue::SqlitePendingQueue;
