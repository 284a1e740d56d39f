//! Collaborator contracts for the GitHub API.
//!
//! The aggregator only talks to GitHub through these traits, which keeps the
//! contribution logic testable without network access.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

#[cfg(test)]
use mockall::automock;

use super::errors::GitHubError;
use super::query::SearchQuery;

/// One issue or pull request returned by a search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    pub number: u64,
    pub html_url: String,
    pub title: String,
}

/// A single page of search results plus the provider-reported total for the whole result set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchPage {
    pub total: u64,
    pub hits: Vec<SearchHit>,
}

/// Remaining search quota and when it resets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchQuota {
    pub remaining: u64,
    pub reset_at: DateTime<Utc>,
}

#[cfg_attr(test, automock)]
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Run an issue/PR search and return its first page.
    async fn search_issues(
        &self,
        query: &SearchQuery,
        per_page: u8,
    ) -> Result<SearchPage, GitHubError>;
}

#[cfg_attr(test, automock)]
#[async_trait]
pub trait RateLimitProvider: Send + Sync {
    /// Current quota of the search resource.
    async fn search_quota(&self) -> Result<SearchQuota, GitHubError>;
}

#[cfg_attr(test, automock)]
#[async_trait]
pub trait RepositoryProvider: Send + Sync {
    /// Names of the organization's public repositories, in listing order.
    async fn list_public_repositories(&self, org: &str) -> Result<Vec<String>, GitHubError>;
}
