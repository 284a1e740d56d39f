use std::sync::Arc;
use std::time::Duration;

use tracing::{info, Instrument};

use crate::cli::RunConfig;
use crate::contrib::{ContributionAggregator, ContributionReporter};
use crate::error::ContribError;
use crate::github::{GitHubClient, ResetWaitGate, SystemClock};
use crate::observability::{RunMetrics, RunStats};
use crate::output::{self, Destination, FileSink, ReportSink, StdoutSink};
use crate::telemetry::{create_run_span, generate_correlation_id};

/// Produce the contribution report for one organization and author.
pub struct ReportCommand {
    config: RunConfig,
}

impl ReportCommand {
    pub fn new(config: RunConfig) -> Self {
        Self { config }
    }

    pub async fn execute(&self) -> Result<RunStats, ContribError> {
        let correlation_id = generate_correlation_id();
        let span = create_run_span(
            &self.config.organization,
            &self.config.author,
            &correlation_id,
        );

        self.run().instrument(span).await
    }

    async fn run(&self) -> Result<RunStats, ContribError> {
        let config = &self.config;
        let client = Arc::new(GitHubClient::new(&config.github, config.token.clone())?);
        let metrics = Arc::new(RunMetrics::new());

        let gate = ResetWaitGate::new(client.clone(), Arc::new(SystemClock))
            .with_safety_margin(Duration::from_secs(config.github.rate_limit.safety_margin_secs))
            .with_metrics(metrics.clone());
        let aggregator = ContributionAggregator::new(client.clone(), client, Arc::new(gate))
            .with_per_page(config.github.per_page)
            .with_review_mode(config.review_mode)
            .with_metrics(metrics.clone());
        let reporter = ContributionReporter::new(aggregator);

        let stats = match config.output.destination {
            Destination::File => {
                let path = output::report_path(
                    &config.output.directory,
                    &config.organization,
                    &config.author,
                );
                let mut sink = FileSink::new(path);
                let stats = self.generate(&reporter, &mut sink).await?;
                info!(path = %sink.path().display(), "Report written");
                stats
            }
            Destination::Stdout => {
                let mut sink = StdoutSink::new();
                self.generate(&reporter, &mut sink).await?
            }
        };

        metrics.log_stats();
        Ok(stats)
    }

    async fn generate(
        &self,
        reporter: &ContributionReporter,
        sink: &mut dyn ReportSink,
    ) -> Result<RunStats, ContribError> {
        reporter
            .generate(&self.config.organization, &self.config.author, sink)
            .await
    }
}
