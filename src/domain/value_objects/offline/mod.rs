pub mod entity_type;
pub mod identity_scope;
pub mod operation_kind;
pub mod payload;
pub mod queue_entry_id;
pub mod queue_key;
pub mod queue_kind;
pub mod record_id;

pub use entity_type::EntityType;
pub use identity_scope::IdentityScope;
pub use operation_kind::OperationKind;
pub use payload::RecordPayload;
pub use queue_entry_id::QueueEntryId;
pub use queue_key::QueueKey;
pub use queue_kind::QueueKind;
pub use record_id::{RecordId, monotonic_micros};
