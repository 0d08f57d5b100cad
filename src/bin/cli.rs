//! Homework Notifier CLI
//!
//! Polls the homework review API and relays status changes to Telegram.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use homework_notifier::{models::Config, pipeline::run_notifier, utils::log as logging};

/// Homework Notifier - homework review status bot
#[derive(Parser, Debug)]
#[command(
    name = "homework-notifier",
    version,
    about = "Relays homework review status changes to Telegram"
)]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "notifier.toml")]
    config: PathBuf,

    /// Seconds between polls (overrides poll.interval_secs)
    #[arg(long)]
    interval: Option<u64>,

    /// Unix timestamp for the first query (overrides poll.initial_from_date)
    #[arg(long)]
    from_date: Option<i64>,

    /// Append logs to this file, or "" for stderr (overrides logging.file)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Run a single cycle and exit
    #[arg(long)]
    once: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Tokens may also come from a .env file in the working directory.
    let dotenv = dotenvy::dotenv();

    let (mut config, load_error) = Config::load_or_fallback(&cli.config);
    if let Some(interval) = cli.interval {
        config.poll.interval_secs = interval;
    }
    if let Some(from_date) = cli.from_date {
        config.poll.initial_from_date = Some(from_date);
    }
    if let Some(path) = cli.log_file {
        config.logging.file = Some(path);
    }

    if let Err(e) = logging::init(&config.logging, cli.verbose) {
        eprintln!("Failed to initialize logging: {e}");
        return ExitCode::FAILURE;
    }

    if let Some(e) = load_error {
        log::warn!(
            "Config load failed from {:?}: {}. Using defaults.",
            cli.config,
            e
        );
    }
    match dotenv {
        Ok(path) => log::debug!("Loaded environment from {}", path.display()),
        Err(e) if e.not_found() => {}
        Err(e) => log::error!("Failed to read .env file: {}", e),
    }

    match run_notifier(config, |name| std::env::var(name).ok(), cli.once).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("Notifier stopped: {}", e);
            ExitCode::FAILURE
        }
    }
}
