//! rr - task rescheduler CLI
//!
//! Reads the input payload, runs one rescheduling pass and prints the new
//! schedule. On failure prints a single error line to stderr and exits 1.

use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use eyre::{Context, Result};
use tracing::{debug, error, info, warn};

use rescheduler::cli::Cli;
use rescheduler::config::Config;
use rescheduler::error::{InputError, RescheduleError};
use rescheduler::llm::create_client;
use rescheduler::{Clock, LlmScheduler, RescheduleInput, Rescheduler};

fn setup_logging(cli_log_level: Option<&str>, config_log_level: Option<&str>) -> Result<()> {
    // Note: Can't log params here since logging isn't initialized yet
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("rescheduler")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    // Determine log level with priority: CLI --log-level > config file > default (INFO)
    let level_str = cli_log_level.or(config_log_level);
    let (level, unknown) = match level_str.map(str::to_uppercase).as_deref() {
        Some("TRACE") => (tracing::Level::TRACE, None),
        Some("DEBUG") => (tracing::Level::DEBUG, None),
        Some("INFO") | None => (tracing::Level::INFO, None),
        Some("WARN") | Some("WARNING") => (tracing::Level::WARN, None),
        Some("ERROR") => (tracing::Level::ERROR, None),
        Some(_) => (tracing::Level::INFO, level_str),
    };

    let log_file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_dir.join("rescheduler.log"))
        .context("Failed to open log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .try_init()
        .map_err(|e| eyre::eyre!("{}", e))
        .context("Failed to install log subscriber")?;

    if let Some(level) = unknown {
        warn!(%level, "Unknown log-level, defaulting to INFO");
    }
    info!("Logging initialized (level: {:?})", level);
    Ok(())
}

fn read_input(path: Option<&PathBuf>) -> Result<RescheduleInput, InputError> {
    debug!(?path, "read_input: called");
    match path {
        Some(path) => RescheduleInput::from_reader(fs::File::open(path)?),
        None => RescheduleInput::from_reader(std::io::stdin().lock()),
    }
}

async fn run(cli: &Cli, config: &Config) -> Result<String, RescheduleError> {
    debug!(dry_run = cli.dry_run, "run: called");
    let input = read_input(cli.input.as_ref())?;
    let now = match &cli.now {
        Some(value) => Clock::parse(value)?,
        None => Clock::now(),
    };

    let rescheduler = Rescheduler::from_config(config);

    if cli.dry_run {
        info!(%now, "Dry run: composing prompt only");
        return Ok(rescheduler.compose(&input, now)?.prompt);
    }

    let client = create_client(&config.llm)?;
    let scheduler = LlmScheduler::new(client, config.llm.max_tokens);
    rescheduler.run(&scheduler, &input, now).await
}

/// Collapse a message onto one line for stderr
fn one_line(message: &str) -> String {
    message.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Load log level from config file early (before full config load)
    let config_log_level = Config::load_log_level(cli.config.as_ref());

    // Logging is optional; a run never fails because the log file is unavailable
    let _ = setup_logging(cli.log_level.as_deref(), config_log_level.as_deref());

    let mut config = match Config::load(cli.config.as_ref()) {
        Ok(config) => config,
        Err(e) => {
            error!(error = %format!("{:#}", e), "Failed to load configuration");
            eprintln!("config error: {}", one_line(&format!("{:#}", e)));
            return ExitCode::FAILURE;
        }
    };

    if cli.strict {
        config.strict = true;
    }
    if let Some(variant) = cli.variant {
        config.rules.variant = variant;
    }
    info!(provider = %config.llm.provider, variant = ?config.rules.variant, strict = config.strict, "rr starting");

    match run(&cli, &config).await {
        Ok(output) => {
            let mut stdout = std::io::stdout().lock();
            if let Err(e) = writeln!(stdout, "{}", output) {
                error!(error = %e, "Failed to write output");
                return ExitCode::FAILURE;
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(kind = e.kind(), error = %e, "Rescheduling failed");
            if e.is_auth_failure() {
                eprintln!("{} (check llm.api-key-env in the config)", one_line(&e.to_string()));
            } else {
                eprintln!("{}", one_line(&e.to_string()));
            }
            ExitCode::FAILURE
        }
    }
}
