use octocrab::Error as OctocrabError;

#[derive(Debug)]
pub enum GitHubError {
    TokenNotFound(String),
    ApiError(OctocrabError),
    InvalidResponse(String),
}

impl From<OctocrabError> for GitHubError {
    fn from(err: OctocrabError) -> Self {
        GitHubError::ApiError(err)
    }
}

impl std::fmt::Display for GitHubError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GitHubError::TokenNotFound(msg) => {
                writeln!(f, "GitHub Authentication Error")?;
                writeln!(f, "🔑 {msg}")?;
                writeln!(
                    f,
                    "🔧 Pass -token=<token> or set GITHUB_TOKEN / GITHUB_CONTRIB__GITHUB__TOKEN"
                )?;
                write!(
                    f,
                    "   Reports only read public repositories, so a token without scopes is enough"
                )
            }
            GitHubError::ApiError(octocrab_err) => {
                writeln!(f, "GitHub API Error")?;

                match octocrab_err {
                    octocrab::Error::GitHub { source, .. } => {
                        writeln!(f, "🌐 HTTP {}: {}", source.status_code, source.message)?;
                        writeln!(f)?;

                        match source.status_code.as_u16() {
                            401 => write!(f, "🔧 The token was rejected, it may be revoked"),
                            403 => {
                                writeln!(f, "🔧 Forbidden or rate limited:")?;
                                writeln!(f, "   → Search allows 30 requests per minute")?;
                                write!(f, "   → Lower github.rate_limit.searches_per_minute")
                            }
                            404 => write!(f, "🔧 Organization not found or not visible"),
                            422 => write!(f, "🔧 Search rejected, does the handle exist?"),
                            _ => write!(f, "🔧 Re-run later; the search API may be degraded"),
                        }
                    }
                    octocrab::Error::Http { .. } => {
                        writeln!(f, "🌐 Could not reach the GitHub API")?;
                        write!(f, "🔧 Check connectivity or the configured github.api_base")
                    }
                    other => write!(f, "🌐 {other}"),
                }
            }
            GitHubError::InvalidResponse(msg) => {
                write!(f, "Unexpected GitHub response: {msg}")
            }
        }
    }
}

impl std::error::Error for GitHubError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GitHubError::ApiError(err) => Some(err),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_error_points_at_flag_and_env() {
        let message =
            GitHubError::TokenNotFound("GitHub token cannot be empty".to_string()).to_string();
        assert!(message.starts_with("GitHub Authentication Error"));
        assert!(message.contains("-token="));
        assert!(message.contains("GITHUB_TOKEN"));
    }

    #[test]
    fn invalid_response_has_no_source() {
        let err = GitHubError::InvalidResponse("reset timestamp out of range".to_string());
        assert!(std::error::Error::source(&err).is_none());
        assert!(err.to_string().contains("reset timestamp out of range"));
    }
}
