use clap::Parser;
use std::process::ExitCode;

use github_contrib::cli::{self, commands::ReportCommand, Cli};
use github_contrib::{init_telemetry, ContribConfig, ContribError};

fn main() -> ExitCode {
    let cli = match Cli::try_parse_from(cli::normalize_flags(std::env::args())) {
        Ok(cli) => cli,
        Err(err) if !err.use_stderr() => {
            // --help
            print!("{err}");
            return ExitCode::SUCCESS;
        }
        Err(err) => {
            eprint!("{err}");
            eprintln!("\n{}\n", cli::usage());
            return ExitCode::from(1);
        }
    };

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if err.is_usage() {
                eprintln!("{err}\n\n{}\n", cli::usage());
            } else {
                eprintln!("{err}");
            }
            ExitCode::from(err.exit_code())
        }
    }
}

fn run(cli: Cli) -> Result<(), ContribError> {
    if cli.version {
        println!("{}", cli::VERSION);
        return Ok(());
    }

    if let Err(e) = ContribConfig::load_env_file() {
        eprintln!("Warning: could not load .env file: {e}");
    }
    let config = ContribConfig::load()?;
    let run_config = cli.into_run_config(config)?;

    if let Err(e) = init_telemetry(&run_config.observability) {
        eprintln!("Warning: logging disabled: {e}");
    }

    let stats = tokio::runtime::Runtime::new()
        .map_err(ContribError::Runtime)?
        .block_on(async { ReportCommand::new(run_config).execute().await })?;
    tracing::debug!(?stats, "Run finished");

    Ok(())
}
