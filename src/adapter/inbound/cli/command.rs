//! Command-line interface definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::infrastructure::config::RunOverrides;

/// Watch Polymarket traders and alert on their fills
#[derive(Parser, Debug)]
#[command(name = "fillwatch")]
#[command(version)]
pub struct Cli {
    /// JSON output for scripting
    #[arg(long, global = true)]
    pub json: bool,

    /// Decrease output verbosity
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Poll traders and deliver alerts until interrupted
    Run(RunArgs),

    /// Run diagnostic checks
    #[command(subcommand)]
    Check(CheckCommand),
}

/// Subcommands for `fillwatch check`.
#[derive(Subcommand, Debug)]
pub enum CheckCommand {
    /// Validate the configuration file and print a summary.
    Config(ConfigPathArg),
    /// Send a sample alert through every configured sink.
    Notify(ConfigPathArg),
}

#[derive(Parser, Debug)]
pub struct ConfigPathArg {
    /// Path to the configuration file.
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,
}

/// Arguments for `fillwatch run`. Flags override the config file.
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Path to the configuration file.
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,

    /// Delay between polling cycles, in milliseconds.
    #[arg(long)]
    pub poll_interval_ms: Option<u64>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Emit logs as JSON.
    #[arg(long)]
    pub json_logs: bool,

    /// Log alerts instead of requiring a delivery sink.
    #[arg(long)]
    pub dry_run: bool,
}

impl RunArgs {
    #[must_use]
    pub fn overrides(&self) -> RunOverrides {
        RunOverrides {
            poll_interval_ms: self.poll_interval_ms,
            log_level: self.log_level.clone(),
            json_logs: self.json_logs,
            dry_run: self.dry_run,
        }
    }
}
