use tracing::{debug, info, info_span, Instrument};

use super::aggregator::ContributionAggregator;
use super::markdown::render_repository;
use crate::error::ContribError;
use crate::observability::{OperationTimer, RunStats};
use crate::output::ReportSink;

/// Drives a whole run: list repositories, aggregate each in order, write the active ones.
pub struct ContributionReporter {
    aggregator: ContributionAggregator,
}

impl ContributionReporter {
    pub fn new(aggregator: ContributionAggregator) -> Self {
        Self { aggregator }
    }

    pub async fn generate<S>(
        &self,
        org: &str,
        author: &str,
        sink: &mut S,
    ) -> Result<RunStats, ContribError>
    where
        S: ReportSink + ?Sized,
    {
        let metrics = self.aggregator.metrics();
        let repositories = self.aggregator.list_public_repositories(org).await?;
        info!(org, count = repositories.len(), "Scanning public repositories");

        sink.open()?;
        for repo in &repositories {
            let timer = OperationTimer::new(&format!("report {org}/{repo}"));
            let report = self
                .aggregator
                .report_for_repository(org, repo, author)
                .instrument(info_span!("repository", repo = %repo))
                .await?;
            metrics.record_repository_scanned();
            timer.finish();

            if !report.has_activity() {
                debug!(repo = %repo, "No activity, skipping");
                continue;
            }

            sink.append(&render_repository(org, &report))?;
            metrics.record_repository_reported();
        }
        sink.finish()?;

        Ok(metrics.snapshot())
    }
}
