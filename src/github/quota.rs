//! Search quota gating.
//!
//! GitHub's search endpoint has its own, much smaller, allowance than the core API.
//! Every search goes through a [`SearchQuotaGate`] first; the default gate stalls when
//! the provider reports a single remaining search and resumes after the reset time.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use super::errors::GitHubError;
use super::provider::RateLimitProvider;
use crate::observability::RunMetrics;

/// Source of wall-clock time and sleeping.
#[async_trait]
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
    async fn sleep(&self, duration: Duration);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

#[async_trait]
impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Capability the aggregator acquires before every search query.
#[async_trait]
pub trait SearchQuotaGate: Send + Sync {
    async fn acquire_search_quota(&self) -> Result<(), GitHubError>;
}

/// Sleeps until the reported reset time when exactly one search remains.
///
/// Any other remaining value passes straight through, including zero.
pub struct ResetWaitGate {
    limits: Arc<dyn RateLimitProvider>,
    clock: Arc<dyn Clock>,
    safety_margin: Duration,
    metrics: Arc<RunMetrics>,
}

impl ResetWaitGate {
    pub const DEFAULT_SAFETY_MARGIN: Duration = Duration::from_secs(1);

    pub fn new(limits: Arc<dyn RateLimitProvider>, clock: Arc<dyn Clock>) -> Self {
        Self {
            limits,
            clock,
            safety_margin: Self::DEFAULT_SAFETY_MARGIN,
            metrics: Arc::new(RunMetrics::new()),
        }
    }

    pub fn with_safety_margin(mut self, safety_margin: Duration) -> Self {
        self.safety_margin = safety_margin;
        self
    }

    pub fn with_metrics(mut self, metrics: Arc<RunMetrics>) -> Self {
        self.metrics = metrics;
        self
    }

    /// Time to wait for a quota that resets at `reset_at`; never negative.
    fn wait_until(&self, reset_at: DateTime<Utc>) -> Duration {
        let until_reset = (reset_at - self.clock.now())
            .to_std()
            .unwrap_or(Duration::ZERO);
        until_reset + self.safety_margin
    }
}

#[async_trait]
impl SearchQuotaGate for ResetWaitGate {
    async fn acquire_search_quota(&self) -> Result<(), GitHubError> {
        let quota = self.limits.search_quota().await?;
        debug!(remaining = quota.remaining, reset_at = %quota.reset_at, "search quota");

        if quota.remaining != 1 {
            return Ok(());
        }

        let wait = self.wait_until(quota.reset_at);
        warn!(
            wait_secs = wait.as_secs(),
            reset_at = %quota.reset_at,
            "Search quota nearly exhausted, waiting for reset"
        );
        self.metrics.record_quota_wait(wait);
        self.clock.sleep(wait).await;
        Ok(())
    }
}
