//! Contribution aggregation and Markdown reporting.

pub mod aggregator;
pub mod markdown;
pub mod reporter;
pub mod types;

pub use aggregator::{subtract_authored, ContributionAggregator};
pub use markdown::render_repository;
pub use reporter::ContributionReporter;
pub use types::{ContributionRecord, ContributionSection, RepositoryReport, ReviewMode};
