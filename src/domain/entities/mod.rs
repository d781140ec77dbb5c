pub mod offline;

pub use offline::{
    QueueEntry, QueueOperation, Record, RecordFilter, RecordOrigin, ReplayOutcome, ReplayResult,
    SyncReport,
};
