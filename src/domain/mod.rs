pub mod entities;
pub mod value_objects;

pub use entities::{QueueEntry, QueueOperation, Record, RecordFilter, SyncReport};
pub use value_objects::{EntityType, IdentityScope, QueueKey, QueueKind, RecordId, RecordPayload};
