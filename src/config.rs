use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::contrib::ReviewMode;
use crate::output::Destination;

/// Base name of the optional configuration file (`github-contrib.toml`, `.yaml`, ...)
pub const CONFIG_FILE_STEM: &str = "github-contrib";

/// Prefix for environment overrides, e.g. `GITHUB_CONTRIB__OUTPUT__DESTINATION=stdout`
pub const ENV_PREFIX: &str = "GITHUB_CONTRIB";

/// Main configuration structure for github-contrib
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ContribConfig {
    /// GitHub configuration
    pub github: GitHubConfig,
    /// Where reports are written
    pub output: OutputConfig,
    pub report: ReportConfig,
    /// Logging settings
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GitHubConfig {
    /// GitHub API token (can be set via env var or -token)
    pub token: Option<String>,
    /// API root override, e.g. for GitHub Enterprise
    pub api_base: Option<String>,
    /// Page size for searches and repository listing (max 100)
    pub per_page: u8,
    /// Rate limiting settings
    pub rate_limit: RateLimitConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RateLimitConfig {
    /// Extra wait after the search quota reset time
    pub safety_margin_secs: u64,
    /// Client-side pacing of search calls; 0 disables it
    pub searches_per_minute: u32,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct OutputConfig {
    pub destination: Destination,
    /// Root of `<org>/<author>.md` report files
    pub directory: PathBuf,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ReportConfig {
    pub review_mode: ReviewMode,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level used when RUST_LOG is not set
    pub log_level: String,
    /// Emit JSON log lines instead of human-readable ones
    pub json_logs: bool,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            token: None, // Will be read from -token, env var or config file
            api_base: None,
            per_page: 100,
            rate_limit: RateLimitConfig::default(),
        }
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            safety_margin_secs: 1,
            searches_per_minute: 30,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            destination: Destination::File,
            directory: PathBuf::from("./output"),
        }
    }
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
            json_logs: false,
        }
    }
}

impl ContribConfig {
    /// Load configuration from multiple sources with precedence:
    /// 1. Default values
    /// 2. Configuration file (github-contrib.toml or another supported format)
    /// 3. Environment variables (prefixed with GITHUB_CONTRIB__)
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(Path::new(CONFIG_FILE_STEM))
    }

    /// Same as [`ContribConfig::load`] with an explicit file stem.
    pub fn load_from(file_stem: &Path) -> Result<Self, ConfigError> {
        let config = Config::builder()
            .add_source(Config::try_from(&ContribConfig::default())?)
            .add_source(File::from(file_stem).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut contrib_config: ContribConfig = config.try_deserialize()?;

        // Special handling for GitHub token - fall back to the conventional variable
        if contrib_config.github.token.is_none() {
            if let Ok(token) = std::env::var("GITHUB_TOKEN") {
                if !token.is_empty() {
                    contrib_config.github.token = Some(token);
                }
            }
        }

        Ok(contrib_config)
    }

    /// Load .env file if it exists
    pub fn load_env_file() -> Result<(), dotenvy::Error> {
        if Path::new(".env").exists() {
            dotenvy::dotenv()?;
            tracing::info!("Loaded environment variables from .env file");
        }
        Ok(())
    }
}
