use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};
use tracing::info;

/// Counters for a single report run
#[derive(Debug, Default)]
pub struct RunMetrics {
    searches: AtomicU64,
    quota_waits: AtomicU64,
    quota_wait_ms: AtomicU64,
    repositories_scanned: AtomicU64,
    repositories_reported: AtomicU64,
}

impl RunMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_search(&self) {
        self.searches.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_quota_wait(&self, waited: Duration) {
        self.quota_waits.fetch_add(1, Ordering::Relaxed);
        self.quota_wait_ms
            .fetch_add(waited.as_millis() as u64, Ordering::Relaxed);
    }

    pub fn record_repository_scanned(&self) {
        self.repositories_scanned.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_repository_reported(&self) {
        self.repositories_reported.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> RunStats {
        RunStats {
            searches: self.searches.load(Ordering::Relaxed),
            quota_waits: self.quota_waits.load(Ordering::Relaxed),
            quota_wait: Duration::from_millis(self.quota_wait_ms.load(Ordering::Relaxed)),
            repositories_scanned: self.repositories_scanned.load(Ordering::Relaxed),
            repositories_reported: self.repositories_reported.load(Ordering::Relaxed),
        }
    }

    pub fn log_stats(&self) {
        let stats = self.snapshot();
        info!(
            searches = stats.searches,
            quota_waits = stats.quota_waits,
            quota_wait_secs = stats.quota_wait.as_secs(),
            repositories_scanned = stats.repositories_scanned,
            repositories_reported = stats.repositories_reported,
            "Run metrics"
        );
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunStats {
    pub searches: u64,
    pub quota_waits: u64,
    pub quota_wait: Duration,
    pub repositories_scanned: u64,
    pub repositories_reported: u64,
}

/// Time an operation and log its duration when finished
pub struct OperationTimer {
    operation: String,
    start: Instant,
}

impl OperationTimer {
    pub fn new(operation: &str) -> Self {
        Self {
            operation: operation.to_string(),
            start: Instant::now(),
        }
    }

    pub fn finish(self) {
        let duration = self.start.elapsed();
        info!(
            operation = %self.operation,
            duration_ms = duration.as_millis() as u64,
            "Operation completed"
        );
    }
}
