use clap::{CommandFactory, Parser};
use std::path::PathBuf;

use crate::config::{ContribConfig, GitHubConfig, ObservabilityConfig, OutputConfig};
use crate::contrib::ReviewMode;
use crate::error::ContribError;
use crate::output::Destination;

pub mod commands;

/// The binary version.
pub const VERSION: &str = "v0.1.0";

/// How the command should be used.
pub const USAGE: &str = "USAGE:\ngithub-contrib -token=<your-token> <org> <github-handle>";

/// Flags that are also accepted with a single leading dash, Go style.
const LONG_FLAGS: &[&str] = &["token", "version", "stdout", "output-dir", "review-mode", "help"];

#[derive(Parser, Debug)]
#[command(name = "github-contrib")]
#[command(about = "Report a GitHub user's pull requests, issues and reviews in an organization")]
#[command(disable_version_flag = true)]
pub struct Cli {
    /// Mandatory GitHub API token
    #[arg(long, value_name = "TOKEN")]
    pub token: Option<String>,

    /// Print version and exit
    #[arg(short = 'v', long = "version")]
    pub version: bool,

    /// Print the report to stdout instead of writing ./output/<org>/<github-handle>.md
    #[arg(long)]
    pub stdout: bool,

    /// Root directory for report files
    #[arg(long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// How reviewed pull requests authored by the user are excluded
    #[arg(long, value_enum)]
    pub review_mode: Option<ReviewMode>,

    /// <org> <github-handle>
    #[arg(value_name = "ARGS")]
    pub args: Vec<String>,
}

/// Everything a report run needs, built once from the command line and configuration.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub organization: String,
    pub author: String,
    pub token: String,
    pub github: GitHubConfig,
    pub output: OutputConfig,
    pub review_mode: ReviewMode,
    pub observability: ObservabilityConfig,
}

impl Cli {
    /// Merge command-line arguments over configuration.
    ///
    /// The token is checked before the positional arguments.
    pub fn into_run_config(self, config: ContribConfig) -> Result<RunConfig, ContribError> {
        let token = self
            .token
            .filter(|token| !token.is_empty())
            .or(config.github.token.clone())
            .filter(|token| !token.is_empty())
            .ok_or_else(|| {
                ContribError::InvalidArgument("GitHub token cannot be empty".to_string())
            })?;

        let [organization, author]: [String; 2] = self
            .args
            .try_into()
            .map_err(|_| ContribError::InvalidArgument("Wrong number of arguments!".to_string()))?;
        if organization.is_empty() || author.is_empty() {
            return Err(ContribError::InvalidArgument(
                "Organization and GitHub handle cannot be empty".to_string(),
            ));
        }

        let mut output = config.output;
        if self.stdout {
            output.destination = Destination::Stdout;
        }
        if let Some(dir) = self.output_dir {
            output.directory = dir;
        }

        Ok(RunConfig {
            organization,
            author,
            token,
            github: config.github,
            output,
            review_mode: self.review_mode.unwrap_or(config.report.review_mode),
            observability: config.observability,
        })
    }
}

/// Banner, usage line and flag summary printed on bad invocations.
pub fn usage() -> String {
    let mut text = format!("github-contrib : {VERSION}\n{USAGE}\n\nFLAGS:");
    for arg in Cli::command().get_arguments() {
        let Some(long) = arg.get_long() else {
            continue;
        };
        let short = arg.get_short().map(|s| format!("-{s}, ")).unwrap_or_default();
        let value = arg
            .get_value_names()
            .and_then(|names| names.first())
            .map(|name| format!(" <{name}>"))
            .unwrap_or_default();
        let help = arg.get_help().map(ToString::to_string).unwrap_or_default();
        let flag = format!("{short}--{long}{value}");
        text.push_str(&format!("\n  {flag:<28}{help}"));
    }
    text
}

/// Rewrite Go-style single-dash long flags (`-token=x`, `-version`) to clap's `--` form.
///
/// Single-letter flags and everything after `--` are left untouched.
pub fn normalize_flags<I>(args: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut passthrough = false;
    args.into_iter()
        .enumerate()
        .map(|(i, arg)| {
            if i == 0 || passthrough {
                return arg;
            }
            if arg == "--" {
                passthrough = true;
                return arg;
            }
            match arg.strip_prefix('-') {
                Some(rest) if !rest.starts_with('-') => {
                    let name = rest.split('=').next().unwrap_or(rest);
                    if LONG_FLAGS.contains(&name) {
                        format!("-{arg}")
                    } else {
                        arg
                    }
                }
                _ => arg,
            }
        })
        .collect()
}
