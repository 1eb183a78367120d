//! CLI definition

use clap::Parser;
use std::path::PathBuf;

use crate::rules::RuleVariant;

/// rr - reschedule today's tasks around the current time, blocked ranges and mood
///
/// Reads `{tasks, blockedSlots?, currentMood?, date?}` JSON and writes the new
/// schedule as a JSON array of `{id, timestamp}`.
#[derive(Debug, Parser)]
#[command(
    name = "rr",
    about = "Reschedule today's tasks with an LLM",
    version = env!("GIT_DESCRIBE"),
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[arg(short = 'l', long = "log-level", help = "Log level (TRACE, DEBUG, INFO, WARN, ERROR)")]
    pub log_level: Option<String>,

    /// Read the input payload from FILE instead of stdin
    #[arg(short, long, value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Current time as HH:MM (defaults to the local clock)
    #[arg(short, long, value_name = "HH:MM")]
    pub now: Option<String>,

    /// Rule variant, overriding the config
    #[arg(long, value_enum)]
    pub variant: Option<RuleVariant>,

    /// Validate the returned schedule before printing it
    #[arg(long)]
    pub strict: bool,

    /// Print the composed prompt and exit without calling the service
    #[arg(long)]
    pub dry_run: bool,
}
