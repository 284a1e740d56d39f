use std::collections::HashSet;
use std::sync::Arc;

use tracing::debug;

use super::types::{ContributionRecord, ContributionSection, RepositoryReport, ReviewMode};
use crate::error::ContribError;
use crate::github::{
    GitHubError, RepositoryProvider, SearchPage, SearchProvider, SearchQuery, SearchQuotaGate,
};
use crate::observability::RunMetrics;

/// GitHub caps search pages at 100 results.
const MAX_PER_PAGE: u8 = 100;

/// Builds per-repository contribution reports from GitHub searches.
///
/// Every search acquires quota from the gate first. Queries run one at a time and any
/// failure aborts the report.
pub struct ContributionAggregator {
    search: Arc<dyn SearchProvider>,
    repositories: Arc<dyn RepositoryProvider>,
    quota: Arc<dyn SearchQuotaGate>,
    per_page: u8,
    review_mode: ReviewMode,
    metrics: Arc<RunMetrics>,
}

impl ContributionAggregator {
    pub fn new(
        search: Arc<dyn SearchProvider>,
        repositories: Arc<dyn RepositoryProvider>,
        quota: Arc<dyn SearchQuotaGate>,
    ) -> Self {
        Self {
            search,
            repositories,
            quota,
            per_page: MAX_PER_PAGE,
            review_mode: ReviewMode::default(),
            metrics: Arc::new(RunMetrics::new()),
        }
    }

    pub fn with_per_page(mut self, per_page: u8) -> Self {
        self.per_page = per_page.clamp(1, MAX_PER_PAGE);
        self
    }

    pub fn with_review_mode(mut self, review_mode: ReviewMode) -> Self {
        self.review_mode = review_mode;
        self
    }

    pub fn with_metrics(mut self, metrics: Arc<RunMetrics>) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn metrics(&self) -> &Arc<RunMetrics> {
        &self.metrics
    }

    /// Public repositories of `org` in listing order. An empty list is not an error.
    pub async fn list_public_repositories(&self, org: &str) -> Result<Vec<String>, ContribError> {
        require_non_empty("organization", org)?;
        Ok(self.repositories.list_public_repositories(org).await?)
    }

    pub async fn report_for_repository(
        &self,
        org: &str,
        repo: &str,
        author: &str,
    ) -> Result<RepositoryReport, ContribError> {
        require_non_empty("organization", org)?;
        require_non_empty("repository", repo)?;
        require_non_empty("author", author)?;

        let created_pull_requests = self
            .section(&SearchQuery::pull_requests().in_repo(org, repo).author(author))
            .await?;
        let created_issues = self
            .section(&SearchQuery::issues().in_repo(org, repo).author(author))
            .await?;
        let reviewed_not_authored_pull_requests = match self.review_mode {
            ReviewMode::Difference => self.reviewed_not_authored(org, repo, author).await?,
            ReviewMode::Exclusion => {
                self.section(
                    &SearchQuery::pull_requests()
                        .in_repo(org, repo)
                        .reviewed_by(author)
                        .excluding_author(author),
                )
                .await?
            }
        };

        Ok(RepositoryReport {
            repository: repo.to_string(),
            created_pull_requests,
            created_issues,
            reviewed_not_authored_pull_requests,
        })
    }

    async fn reviewed_not_authored(
        &self,
        org: &str,
        repo: &str,
        author: &str,
    ) -> Result<ContributionSection, GitHubError> {
        let reviewed = SearchQuery::pull_requests().in_repo(org, repo).reviewed_by(author);
        let all_reviewed = self.search(&reviewed).await?;
        let reviewed_and_authored = self.search(&reviewed.author(author)).await?;
        Ok(subtract_authored(all_reviewed, &reviewed_and_authored))
    }

    async fn section(&self, query: &SearchQuery) -> Result<ContributionSection, GitHubError> {
        let page = self.search(query).await?;
        Ok(ContributionSection {
            total: page.total,
            records: page.hits.into_iter().map(ContributionRecord::from).collect(),
        })
    }

    async fn search(&self, query: &SearchQuery) -> Result<SearchPage, GitHubError> {
        self.quota.acquire_search_quota().await?;
        debug!(query = %query, "Searching issues");
        self.metrics.record_search();
        self.search.search_issues(query, self.per_page).await
    }
}

/// Remove pull requests the author also wrote from the reviewed page.
///
/// The total comes from the provider-reported totals, saturating at zero. Records keep the
/// order of `all_reviewed` and each number is emitted at most once.
pub fn subtract_authored(
    all_reviewed: SearchPage,
    reviewed_and_authored: &SearchPage,
) -> ContributionSection {
    let total = all_reviewed.total.saturating_sub(reviewed_and_authored.total);
    let mut seen: HashSet<u64> = reviewed_and_authored
        .hits
        .iter()
        .map(|hit| hit.number)
        .collect();

    let records = all_reviewed
        .hits
        .into_iter()
        .filter(|hit| seen.insert(hit.number))
        .map(ContributionRecord::from)
        .collect();

    ContributionSection { total, records }
}

fn require_non_empty(name: &str, value: &str) -> Result<(), ContribError> {
    if value.is_empty() {
        return Err(ContribError::InvalidArgument(format!("{name} cannot be empty")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::provider::MockRepositoryProvider;
    use crate::github::SearchHit;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeSearch {
        pages: HashMap<String, SearchPage>,
        issued: Mutex<Vec<(String, u8)>>,
    }

    impl FakeSearch {
        fn with_page(mut self, query: &str, numbers: &[u64], total: u64) -> Self {
            self.pages.insert(query.to_string(), page(numbers, total));
            self
        }

        fn issued(&self) -> Vec<String> {
            self.issued.lock().unwrap().iter().map(|(q, _)| q.clone()).collect()
        }
    }

    #[async_trait]
    impl SearchProvider for FakeSearch {
        async fn search_issues(
            &self,
            query: &SearchQuery,
            per_page: u8,
        ) -> Result<SearchPage, GitHubError> {
            let query = query.to_string();
            self.issued.lock().unwrap().push((query.clone(), per_page));
            Ok(self.pages.get(&query).cloned().unwrap_or_default())
        }
    }

    #[derive(Default)]
    struct CountingGate {
        acquired: AtomicUsize,
    }

    #[async_trait]
    impl SearchQuotaGate for CountingGate {
        async fn acquire_search_quota(&self) -> Result<(), GitHubError> {
            self.acquired.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    fn hit(number: u64) -> SearchHit {
        SearchHit {
            number,
            html_url: format!("https://github.com/acme/widgets/pull/{number}"),
            title: format!("Change {number}"),
        }
    }

    fn page(numbers: &[u64], total: u64) -> SearchPage {
        SearchPage {
            total,
            hits: numbers.iter().copied().map(hit).collect(),
        }
    }

    fn numbers(section: &ContributionSection) -> Vec<u64> {
        section.records.iter().map(|r| r.number).collect()
    }

    fn aggregator(search: Arc<FakeSearch>, gate: Arc<CountingGate>) -> ContributionAggregator {
        ContributionAggregator::new(search, Arc::new(MockRepositoryProvider::new()), gate)
    }

    const CREATED_PRS: &str = "is:pr repo:acme/widgets author:alice";
    const CREATED_ISSUES: &str = "is:issue repo:acme/widgets author:alice";
    const REVIEWED: &str = "is:pr repo:acme/widgets reviewed-by:alice";
    const REVIEWED_AND_AUTHORED: &str = "is:pr repo:acme/widgets reviewed-by:alice author:alice";

    #[tokio::test]
    async fn issues_queries_in_order_with_quota_before_each() {
        let search = Arc::new(FakeSearch::default());
        let gate = Arc::new(CountingGate::default());
        let aggregator = aggregator(search.clone(), gate.clone());

        aggregator
            .report_for_repository("acme", "widgets", "alice")
            .await
            .unwrap();

        assert_eq!(
            search.issued(),
            vec![CREATED_PRS, CREATED_ISSUES, REVIEWED, REVIEWED_AND_AUTHORED]
        );
        assert_eq!(gate.acquired.load(Ordering::SeqCst), 4);
        assert_eq!(aggregator.metrics().snapshot().searches, 4);
    }

    #[tokio::test]
    async fn reviewed_not_authored_filters_in_place() {
        let search = Arc::new(
            FakeSearch::default()
                .with_page(REVIEWED, &[1, 2, 3], 3)
                .with_page(REVIEWED_AND_AUTHORED, &[2], 1),
        );
        let aggregator = aggregator(search, Arc::new(CountingGate::default()));

        let report = aggregator
            .report_for_repository("acme", "widgets", "alice")
            .await
            .unwrap();

        let reviewed = &report.reviewed_not_authored_pull_requests;
        assert_eq!(numbers(reviewed), vec![1, 3]);
        assert_eq!(reviewed.total, 2);
        assert!(report.has_activity());
    }

    #[tokio::test]
    async fn identical_review_sets_leave_nothing() {
        let search = Arc::new(
            FakeSearch::default()
                .with_page(REVIEWED, &[4, 5], 2)
                .with_page(REVIEWED_AND_AUTHORED, &[5, 4], 2),
        );
        let aggregator = aggregator(search, Arc::new(CountingGate::default()));

        let report = aggregator
            .report_for_repository("acme", "widgets", "alice")
            .await
            .unwrap();

        let reviewed = &report.reviewed_not_authored_pull_requests;
        assert!(reviewed.is_empty());
        assert!(!reviewed.has_summary());
        assert!(!report.has_activity());
    }

    #[tokio::test]
    async fn created_sections_carry_provider_totals() {
        let search = Arc::new(
            FakeSearch::default()
                .with_page(CREATED_PRS, &[7], 250)
                .with_page(CREATED_ISSUES, &[], 0),
        );
        let aggregator = aggregator(search, Arc::new(CountingGate::default()));

        let report = aggregator
            .report_for_repository("acme", "widgets", "alice")
            .await
            .unwrap();

        assert_eq!(report.repository, "widgets");
        assert_eq!(report.created_pull_requests.total, 250);
        assert_eq!(numbers(&report.created_pull_requests), vec![7]);
        assert!(!report.created_issues.has_summary());
    }

    #[tokio::test]
    async fn exclusion_mode_uses_a_single_negated_query() {
        let excluding = "is:pr repo:acme/widgets reviewed-by:alice -author:alice";
        let search = Arc::new(FakeSearch::default().with_page(excluding, &[9], 1));
        let gate = Arc::new(CountingGate::default());
        let aggregator =
            aggregator(search.clone(), gate.clone()).with_review_mode(ReviewMode::Exclusion);

        let report = aggregator
            .report_for_repository("acme", "widgets", "alice")
            .await
            .unwrap();

        assert_eq!(search.issued(), vec![CREATED_PRS, CREATED_ISSUES, excluding]);
        assert_eq!(gate.acquired.load(Ordering::SeqCst), 3);
        assert_eq!(numbers(&report.reviewed_not_authored_pull_requests), vec![9]);
    }

    #[tokio::test]
    async fn per_page_is_clamped_to_search_limit() {
        let search = Arc::new(FakeSearch::default());
        let aggregator =
            aggregator(search.clone(), Arc::new(CountingGate::default())).with_per_page(250);

        aggregator
            .report_for_repository("acme", "widgets", "alice")
            .await
            .unwrap();

        let pages: Vec<u8> = search.issued.lock().unwrap().iter().map(|(_, n)| *n).collect();
        assert!(pages.iter().all(|n| *n == 100));
    }

    #[tokio::test]
    async fn empty_inputs_are_invalid_arguments() {
        let search = Arc::new(FakeSearch::default());
        let aggregator = aggregator(search.clone(), Arc::new(CountingGate::default()));

        for (org, repo, author) in [
            ("", "widgets", "alice"),
            ("acme", "", "alice"),
            ("acme", "widgets", ""),
        ] {
            let result = aggregator.report_for_repository(org, repo, author).await;
            assert!(matches!(result, Err(ContribError::InvalidArgument(_))));
        }
        assert!(search.issued().is_empty());
    }

    #[tokio::test]
    async fn search_failure_aborts_the_report() {
        struct FailingSearch;

        #[async_trait]
        impl SearchProvider for FailingSearch {
            async fn search_issues(
                &self,
                _query: &SearchQuery,
                _per_page: u8,
            ) -> Result<SearchPage, GitHubError> {
                Err(GitHubError::InvalidResponse("search unavailable".to_string()))
            }
        }

        let aggregator = ContributionAggregator::new(
            Arc::new(FailingSearch),
            Arc::new(MockRepositoryProvider::new()),
            Arc::new(CountingGate::default()),
        );

        let result = aggregator.report_for_repository("acme", "widgets", "alice").await;
        assert!(matches!(result, Err(ContribError::Provider(GitHubError::InvalidResponse(_)))));
    }

    #[tokio::test]
    async fn lists_repositories_through_provider() {
        let mut repositories = MockRepositoryProvider::new();
        repositories
            .expect_list_public_repositories()
            .withf(|org| org.to_string() == "acme")
            .times(1)
            .returning(|_| Ok(vec!["a".to_string(), "b".to_string()]));
        let aggregator = ContributionAggregator::new(
            Arc::new(FakeSearch::default()),
            Arc::new(repositories),
            Arc::new(CountingGate::default()),
        );

        let names = aggregator.list_public_repositories("acme").await.unwrap();
        assert_eq!(names, vec!["a", "b"]);
        assert!(matches!(
            aggregator.list_public_repositories("").await,
            Err(ContribError::InvalidArgument(_))
        ));
    }

    #[test]
    fn subtraction_drops_duplicates_and_saturates() {
        let section = subtract_authored(page(&[1, 1, 2, 3, 3], 2), &page(&[2], 5));
        assert_eq!(numbers(&section), vec![1, 3]);
        assert_eq!(section.total, 0);
        assert!(!section.has_summary());
    }
}
