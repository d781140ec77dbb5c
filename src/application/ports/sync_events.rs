use crate::domain::entities::offline::SyncReport;

/// Receives the report of every finished sync pass.
pub trait SyncEventEmitter: Send + Sync {
    fn emit_report(&self, report: &SyncReport) -> Result<(), String>;
}
