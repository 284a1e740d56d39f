// github-contrib library - contribution reports for a GitHub organization
// This exposes the core components for testing and integration

pub mod cli;
pub mod config;
pub mod contrib;
pub mod error;
pub mod github;
pub mod observability;
pub mod output;
pub mod telemetry;

// Re-export key types for easy access
pub use config::ContribConfig;
pub use contrib::{
    ContributionAggregator, ContributionRecord, ContributionReporter, ContributionSection,
    RepositoryReport, ReviewMode,
};
pub use error::ContribError;
pub use github::{GitHubClient, GitHubError, SearchQuery};
pub use observability::{RunMetrics, RunStats};
pub use telemetry::{create_run_span, generate_correlation_id, init_telemetry};
