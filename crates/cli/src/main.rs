//! SteamLite CLI - storefront client

mod commands;
mod config;
mod logging;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use commands::Commands;
use std::path::PathBuf;
use std::time::Duration;
use steamlite_http::ApiError;
use tracing::{Level, debug, error};

#[derive(Parser)]
#[command(name = "steamlite")]
#[command(about = "Browse, buy and manage games on a SteamLite storefront")]
#[command(version)]
struct Cli {
    /// Configuration file (TOML, YAML or JSON)
    #[arg(short = 'c', long, global = true, env = "STEAMLITE_CONFIG")]
    config: Option<PathBuf>,

    /// Backend base URL, overrides the configuration file
    #[arg(short = 'u', long, global = true)]
    base_url: Option<String>,

    /// Set logging level
    #[arg(short = 'l', long, global = true, default_value = "warn")]
    log_level: LogLevel,

    /// Per-request timeout in seconds, overrides the configuration file
    #[arg(short = 't', long, global = true)]
    timeout: Option<u64>,

    /// Deadline for the whole command in seconds (0 = no deadline)
    #[arg(long, global = true, default_value = "60")]
    deadline: u64,

    /// Directory holding the saved session
    #[arg(short = 'd', long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    logging::init_logging(cli.log_level.into())?;

    let overrides = config::Overrides {
        base_url: cli.base_url,
        timeout_secs: cli.timeout,
        data_dir: cli.data_dir,
    };
    let client_config = config::load(cli.config.as_deref(), overrides)?;

    let outcome = if cli.deadline == 0 {
        cli.command.execute(&client_config).await
    } else {
        let deadline = Duration::from_secs(cli.deadline);
        match tokio::time::timeout(deadline, cli.command.execute(&client_config)).await {
            Ok(outcome) => outcome,
            Err(_) => {
                error!("Command timed out after {} seconds", cli.deadline);
                std::process::exit(1);
            }
        }
    };

    match outcome {
        Ok(()) => {
            debug!("Command completed successfully");
        }
        Err(e) => {
            report(&e);
            std::process::exit(1);
        }
    }

    Ok(())
}

fn report(err: &anyhow::Error) {
    match err.downcast_ref::<ApiError>() {
        Some(ApiError::AuthExpired { message }) => {
            eprintln!("error: {message}");
            eprintln!("Your session has ended. Run `steamlite login` to sign in again.");
        }
        Some(ApiError::NotSignedIn) => {
            eprintln!("error: not signed in. Run `steamlite login` first.");
        }
        Some(ApiError::Validation { message, fields }) => {
            eprintln!("error: {message}");
            for (field, problem) in fields {
                eprintln!("  {field}: {problem}");
            }
        }
        _ => eprintln!("error: {err:#}"),
    }
}

#[derive(Clone, Debug, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for Level {
    fn from(log_level: LogLevel) -> Self {
        match log_level {
            LogLevel::Error => Level::ERROR,
            LogLevel::Warn => Level::WARN,
            LogLevel::Info => Level::INFO,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Trace => Level::TRACE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_negative_bulk_percentage_parses() {
        let cli = Cli::try_parse_from([
            "steamlite",
            "admin",
            "bulk-prices",
            "--percentage",
            "-15",
            "--apply",
        ])
        .unwrap();

        assert!(matches!(
            cli.command,
            Commands::Admin {
                command: commands::AdminCommands::BulkPrices { apply: true, .. }
            }
        ));
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "steamlite",
            "games",
            "list",
            "--base-url",
            "http://shop.test",
            "--timeout",
            "3",
        ])
        .unwrap();

        assert_eq!(cli.base_url.as_deref(), Some("http://shop.test"));
        assert_eq!(cli.timeout, Some(3));
    }
}
