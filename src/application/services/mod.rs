pub mod offline_service;
pub mod read_merger;
pub mod session_lifecycle;
pub mod sync_coordinator;

pub use offline_service::{OfflineService, OfflineServiceTrait, PendingCount};
pub use read_merger::ReadMerger;
pub use session_lifecycle::{SessionEvent, SessionLifecycle, SessionStage};
pub use sync_coordinator::{SyncCoordinator, SyncPhase};
