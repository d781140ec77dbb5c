pub mod queue_entry;
pub mod record;
pub mod record_filter;
pub mod sync_report;

pub use queue_entry::{QueueEntry, QueueOperation};
pub use record::{Record, RecordOrigin};
pub use record_filter::RecordFilter;
pub use sync_report::{ReplayOutcome, ReplayResult, SyncReport};
