use std::num::NonZeroU32;

use async_trait::async_trait;
use chrono::DateTime;
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use octocrab::models::issues::Issue;
use octocrab::params::repos::Type as RepoType;
use octocrab::Octocrab;
use tracing::debug;

use super::errors::GitHubError;
use super::provider::{
    RateLimitProvider, RepositoryProvider, SearchHit, SearchPage, SearchProvider, SearchQuota,
};
use super::query::SearchQuery;
use crate::config::GitHubConfig;

/// Octocrab-backed implementation of the search, rate limit and repository collaborators.
#[derive(Debug)]
pub struct GitHubClient {
    octocrab: Octocrab,
    search_pacer: Option<DefaultDirectRateLimiter>,
    repos_per_page: u8,
}

impl GitHubClient {
    pub fn new(settings: &GitHubConfig, token: String) -> Result<Self, GitHubError> {
        if token.trim().is_empty() {
            return Err(GitHubError::TokenNotFound(
                "GitHub token cannot be empty".to_string(),
            ));
        }

        let mut builder = Octocrab::builder().personal_token(token);
        if let Some(api_base) = settings.api_base.as_deref() {
            builder = builder.base_uri(api_base)?;
        }
        let octocrab = builder.build()?;

        // The authenticated search allowance is 30 requests per minute
        let search_pacer = NonZeroU32::new(settings.rate_limit.searches_per_minute)
            .map(|per_minute| RateLimiter::direct(Quota::per_minute(per_minute)));

        Ok(Self {
            octocrab,
            search_pacer,
            repos_per_page: settings.per_page.clamp(1, 100),
        })
    }
}

impl From<Issue> for SearchHit {
    fn from(issue: Issue) -> Self {
        SearchHit {
            number: issue.number,
            html_url: issue.html_url.to_string(),
            title: issue.title,
        }
    }
}

#[async_trait]
impl SearchProvider for GitHubClient {
    async fn search_issues(
        &self,
        query: &SearchQuery,
        per_page: u8,
    ) -> Result<SearchPage, GitHubError> {
        if let Some(pacer) = &self.search_pacer {
            pacer.until_ready().await;
        }

        let q = query.to_string();
        let page = self
            .octocrab
            .search()
            .issues_and_pull_requests(&q)
            .per_page(per_page)
            .send()
            .await?;
        let total = page.total_count.unwrap_or_default();
        debug!(query = %q, total, page = page.items.len(), "search completed");

        Ok(SearchPage {
            total,
            hits: page.items.into_iter().map(SearchHit::from).collect(),
        })
    }
}

#[async_trait]
impl RateLimitProvider for GitHubClient {
    async fn search_quota(&self) -> Result<SearchQuota, GitHubError> {
        let limits = self.octocrab.ratelimit().get().await?;
        let search = &limits.resources.search;
        let reset_at = DateTime::from_timestamp(search.reset as i64, 0).ok_or_else(|| {
            GitHubError::InvalidResponse(format!(
                "search rate limit reset timestamp {} is out of range",
                search.reset
            ))
        })?;

        Ok(SearchQuota {
            remaining: search.remaining as u64,
            reset_at,
        })
    }
}

#[async_trait]
impl RepositoryProvider for GitHubClient {
    async fn list_public_repositories(&self, org: &str) -> Result<Vec<String>, GitHubError> {
        let page = self
            .octocrab
            .orgs(org)
            .list_repos()
            .repo_type(RepoType::Public)
            .per_page(self.repos_per_page)
            .send()
            .await?;
        debug!(org, count = page.items.len(), "listed public repositories");

        Ok(page.items.into_iter().map(|repo| repo.name).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn empty_token_is_rejected() {
        let result = GitHubClient::new(&GitHubConfig::default(), "  ".to_string());
        assert!(matches!(result, Err(GitHubError::TokenNotFound(_))));
    }

    #[tokio::test]
    async fn pacing_can_be_disabled() {
        let mut settings = GitHubConfig::default();
        settings.rate_limit.searches_per_minute = 0;
        let client = GitHubClient::new(&settings, "test_token".to_string()).unwrap();
        assert!(client.search_pacer.is_none());

        let paced = GitHubClient::new(&GitHubConfig::default(), "test_token".to_string()).unwrap();
        assert!(paced.search_pacer.is_some());
    }
}
