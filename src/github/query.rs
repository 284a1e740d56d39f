//! Search query construction for the GitHub issue search endpoint.
//!
//! Qualifiers render in the order they were added, so the same builder calls always
//! produce the same query string.

use std::fmt;

/// A single search qualifier such as `is:pr` or `author:alice`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Qualifier {
    PullRequest,
    Issue,
    Repo { org: String, repo: String },
    Author(String),
    ReviewedBy(String),
    NotAuthor(String),
}

impl fmt::Display for Qualifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Qualifier::PullRequest => write!(f, "is:pr"),
            Qualifier::Issue => write!(f, "is:issue"),
            Qualifier::Repo { org, repo } => write!(f, "repo:{org}/{repo}"),
            Qualifier::Author(handle) => write!(f, "author:{handle}"),
            Qualifier::ReviewedBy(handle) => write!(f, "reviewed-by:{handle}"),
            Qualifier::NotAuthor(handle) => write!(f, "-author:{handle}"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery {
    qualifiers: Vec<Qualifier>,
}

impl SearchQuery {
    /// Start a query restricted to pull requests.
    pub fn pull_requests() -> Self {
        Self {
            qualifiers: vec![Qualifier::PullRequest],
        }
    }

    /// Start a query restricted to issues.
    pub fn issues() -> Self {
        Self {
            qualifiers: vec![Qualifier::Issue],
        }
    }

    pub fn in_repo(self, org: &str, repo: &str) -> Self {
        self.with(Qualifier::Repo {
            org: org.to_string(),
            repo: repo.to_string(),
        })
    }

    pub fn author(self, handle: &str) -> Self {
        self.with(Qualifier::Author(handle.to_string()))
    }

    pub fn reviewed_by(self, handle: &str) -> Self {
        self.with(Qualifier::ReviewedBy(handle.to_string()))
    }

    pub fn excluding_author(self, handle: &str) -> Self {
        self.with(Qualifier::NotAuthor(handle.to_string()))
    }

    pub fn qualifiers(&self) -> &[Qualifier] {
        &self.qualifiers
    }

    fn with(mut self, qualifier: Qualifier) -> Self {
        self.qualifiers.push(qualifier);
        self
    }
}

impl fmt::Display for SearchQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, qualifier) in self.qualifiers.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{qualifier}")?;
        }
        Ok(())
    }
}
