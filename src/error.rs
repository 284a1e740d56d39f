use thiserror::Error;

use crate::github::GitHubError;

/// Failures that end a run. Only `main` turns these into exit codes.
#[derive(Debug, Error)]
pub enum ContribError {
    #[error("{0}")]
    InvalidArgument(String),
    #[error(transparent)]
    Provider(#[from] GitHubError),
    #[error("Failed to write report: {0}")]
    Output(#[from] std::io::Error),
    #[error("Failed to load configuration: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Failed to start async runtime: {0}")]
    Runtime(#[source] std::io::Error),
}

impl ContribError {
    /// Usage errors are reported together with the usage text.
    pub fn is_usage(&self) -> bool {
        matches!(self, ContribError::InvalidArgument(_))
    }

    pub fn exit_code(&self) -> u8 {
        1
    }
}
