use crate::domain::entities::offline::SyncReport;
use serde::Serialize;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PassOutcomeStatus {
    Clean,
    Partial,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SyncMetricsSnapshot {
    pub total_passes: u64,
    pub total_replayed: u64,
    pub total_failed: u64,
    pub consecutive_partial: u64,
    pub last_clean_ms: Option<u64>,
    pub last_partial_ms: Option<u64>,
    pub last_outcome: Option<PassOutcomeStatus>,
    pub last_identity: Option<String>,
    pub last_attempted: Option<u32>,
    pub last_failed: Option<u32>,
    pub last_retained: Option<u32>,
    pub last_duration_ms: Option<u64>,
}

#[derive(Default, Clone)]
struct LastPassMetadata {
    last_outcome: Option<PassOutcomeStatus>,
    identity: Option<String>,
    attempted: Option<u32>,
    failed: Option<u32>,
    retained: Option<u32>,
    duration_ms: Option<u64>,
}

/// Counters for sync passes, shared by every pass a coordinator runs.
pub struct SyncMetrics {
    passes: AtomicU64,
    replayed: AtomicU64,
    failed: AtomicU64,
    consecutive_partial: AtomicU64,
    last_clean_ms: AtomicU64,
    last_partial_ms: AtomicU64,
    metadata: Mutex<LastPassMetadata>,
}

impl SyncMetrics {
    pub fn new() -> Self {
        Self {
            passes: AtomicU64::new(0),
            replayed: AtomicU64::new(0),
            failed: AtomicU64::new(0),
            consecutive_partial: AtomicU64::new(0),
            last_clean_ms: AtomicU64::new(0),
            last_partial_ms: AtomicU64::new(0),
            metadata: Mutex::new(LastPassMetadata::default()),
        }
    }

    pub fn record_pass(&self, report: &SyncReport) -> SyncMetricsSnapshot {
        self.passes.fetch_add(1, Ordering::Relaxed);
        self.replayed
            .fetch_add(u64::from(report.succeeded), Ordering::Relaxed);
        self.failed
            .fetch_add(u64::from(report.failed), Ordering::Relaxed);

        let status = if report.is_clean() {
            self.last_clean_ms
                .store(current_unix_ms(), Ordering::Relaxed);
            self.consecutive_partial.store(0, Ordering::Relaxed);
            PassOutcomeStatus::Clean
        } else {
            self.last_partial_ms
                .store(current_unix_ms(), Ordering::Relaxed);
            self.consecutive_partial.fetch_add(1, Ordering::Relaxed);
            PassOutcomeStatus::Partial
        };

        if let Ok(mut guard) = self.metadata.lock() {
            guard.last_outcome = Some(status);
            guard.identity = Some(report.identity.to_string());
            guard.attempted = Some(report.attempted);
            guard.failed = Some(report.failed);
            guard.retained = Some(report.retained);
            guard.duration_ms = report
                .finished_at
                .signed_duration_since(report.started_at)
                .num_milliseconds()
                .try_into()
                .ok();
        }

        self.snapshot()
    }

    pub fn snapshot(&self) -> SyncMetricsSnapshot {
        let metadata = self
            .metadata
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default();

        SyncMetricsSnapshot {
            total_passes: self.passes.load(Ordering::Relaxed),
            total_replayed: self.replayed.load(Ordering::Relaxed),
            total_failed: self.failed.load(Ordering::Relaxed),
            consecutive_partial: self.consecutive_partial.load(Ordering::Relaxed),
            last_clean_ms: to_option(self.last_clean_ms.load(Ordering::Relaxed)),
            last_partial_ms: to_option(self.last_partial_ms.load(Ordering::Relaxed)),
            last_outcome: metadata.last_outcome,
            last_identity: metadata.identity,
            last_attempted: metadata.attempted,
            last_failed: metadata.failed,
            last_retained: metadata.retained,
            last_duration_ms: metadata.duration_ms,
        }
    }
}

impl Default for SyncMetrics {
    fn default() -> Self {
        Self::new()
    }
}

fn to_option(value: u64) -> Option<u64> {
    if value == 0 { None } else { Some(value) }
}

fn current_unix_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|duration| duration.as_millis() as u64)
        .unwrap_or(0)
}
