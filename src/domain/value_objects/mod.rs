pub mod offline;

pub use offline::{
    EntityType, IdentityScope, OperationKind, QueueEntryId, QueueKey, QueueKind, RecordId,
    RecordPayload,
};
