pub mod pending_queue;
pub mod remote_store;
pub mod sync_events;

pub use pending_queue::PendingQueue;
pub use remote_store::{RemoteStore, RemoteStoreError};
pub use sync_events::SyncEventEmitter;
