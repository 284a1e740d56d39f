use serde::{Deserialize, Serialize};

use crate::github::SearchHit;

/// An issue or pull request attributed to the author. Identity is `number` within a repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContributionRecord {
    pub number: u64,
    pub url: String,
    pub title: String,
}

impl From<SearchHit> for ContributionRecord {
    fn from(hit: SearchHit) -> Self {
        Self {
            number: hit.number,
            url: hit.html_url,
            title: hit.title,
        }
    }
}

/// One category of a repository report.
///
/// `total` is the provider-reported size of the full result set and drives the summary
/// line; `records` holds only what was fetched on the first page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContributionSection {
    pub total: u64,
    pub records: Vec<ContributionRecord>,
}

impl ContributionSection {
    pub fn has_summary(&self) -> bool {
        self.total != 0
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryReport {
    pub repository: String,
    pub created_pull_requests: ContributionSection,
    pub created_issues: ContributionSection,
    pub reviewed_not_authored_pull_requests: ContributionSection,
}

impl RepositoryReport {
    /// A report with no records in any category is left out of the output.
    pub fn has_activity(&self) -> bool {
        !(self.created_pull_requests.is_empty()
            && self.created_issues.is_empty()
            && self.reviewed_not_authored_pull_requests.is_empty())
    }
}

/// How "reviewed but not authored" pull requests are found.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum ReviewMode {
    /// Two searches (reviewed, reviewed and authored) and a set difference by PR number
    #[default]
    Difference,
    /// One search with a negated `-author:` qualifier
    Exclusion,
}
