pub mod client;
pub mod errors;
pub mod provider;
pub mod query;
pub mod quota;

pub use client::GitHubClient;
pub use errors::GitHubError;
pub use provider::{
    RateLimitProvider, RepositoryProvider, SearchHit, SearchPage, SearchProvider, SearchQuota,
};
pub use query::{Qualifier, SearchQuery};
pub use quota::{Clock, ResetWaitGate, SearchQuotaGate, SystemClock};
