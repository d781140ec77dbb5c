pub mod ports;
pub mod services;

pub use services::{OfflineService, OfflineServiceTrait, ReadMerger, SessionLifecycle, SyncCoordinator};
