//! CLI argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Talaria ack - replay device events through the delivery ack dispatcher
#[derive(Parser, Debug)]
#[command(
    name = "talaria-ack",
    author,
    version,
    about = "Delivery acknowledgment dispatcher for device gateways",
    long_about = "Replays recorded device events through the ack dispatcher.\n\n\
                  Events are read as JSON lines, sent to simulated device \n\
                  connections and summarized as ack outcomes and metrics."
)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true, env = "TALARIA_ACK_VERBOSE")]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format [default: pretty, or observability.log_format for `run`]
    #[arg(long, value_enum, global = true, env = "TALARIA_ACK_LOG_FORMAT")]
    pub log_format: Option<LogFormat>,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// `run` without logging flags takes its logging from `[observability]`
    pub fn defers_logging_to_config(&self) -> bool {
        matches!(self.command, Commands::Run(_))
            && self.verbose == 0
            && !self.quiet
            && self.log_format.is_none()
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Replay an event file through the ack dispatcher
    Run(RunArgs),

    /// Validate configuration file without running
    Validate(ValidateArgs),

    /// Display configuration information
    Info(InfoArgs),
}

/// Arguments for the `run` command
#[derive(Parser, Debug, Clone)]
pub struct RunArgs {
    /// Path to configuration file (TOML or JSON)
    #[arg(
        short,
        long,
        default_value = "gateway.toml",
        env = "TALARIA_ACK_CONFIG"
    )]
    pub config: PathBuf,

    /// Device events to replay, one JSON object per line
    #[arg(short, long, env = "TALARIA_ACK_EVENTS")]
    pub events: PathBuf,

    /// Override simulation.fail_every from configuration
    #[arg(long)]
    pub fail_every: Option<u64>,

    /// Override observability.metrics_port from configuration (0 = disabled)
    #[arg(long, env = "TALARIA_ACK_METRICS_PORT")]
    pub metrics_port: Option<u16>,

    /// Validate configuration and events and exit without replaying
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for the `validate` command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Path to configuration file to validate
    #[arg(short, long, default_value = "gateway.toml")]
    pub config: PathBuf,

    /// Output validation result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `info` command
#[derive(Parser, Debug)]
pub struct InfoArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = "gateway.toml")]
    pub config: PathBuf,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Log output format
#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum LogFormat {
    /// JSON structured logging
    Json,
    /// Human-readable pretty format
    #[default]
    Pretty,
    /// Compact single-line format
    Compact,
}

impl From<LogFormat> for contracts::LogFormat {
    fn from(format: LogFormat) -> Self {
        match format {
            LogFormat::Json => contracts::LogFormat::Json,
            LogFormat::Pretty => contracts::LogFormat::Pretty,
            LogFormat::Compact => contracts::LogFormat::Compact,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_run_args() {
        let cli = Cli::try_parse_from([
            "talaria-ack",
            "-v",
            "run",
            "--events",
            "events.jsonl",
            "--fail-every",
            "3",
        ])
        .unwrap();

        assert_eq!(cli.verbose, 1);
        match cli.command {
            Commands::Run(args) => {
                assert_eq!(args.events, PathBuf::from("events.jsonl"));
                assert_eq!(args.config, PathBuf::from("gateway.toml"));
                assert_eq!(args.fail_every, Some(3));
                assert!(!args.dry_run);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        let result = Cli::try_parse_from(["talaria-ack", "-q", "-v", "validate"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_bare_run_logs_from_config() {
        let cli = Cli::try_parse_from(["talaria-ack", "run", "--events", "e.jsonl"]).unwrap();
        assert!(cli.log_format.is_none());
        assert!(cli.defers_logging_to_config());
    }

    #[test]
    fn test_logging_flags_override_config() {
        for flags in [
            &["-v"][..],
            &["-q"][..],
            &["--log-format", "json"][..],
        ] {
            let mut argv = vec!["talaria-ack"];
            argv.extend_from_slice(flags);
            argv.extend_from_slice(&["run", "--events", "e.jsonl"]);
            let cli = Cli::try_parse_from(argv).unwrap();
            assert!(!cli.defers_logging_to_config(), "flags {flags:?}");
        }

        let cli = Cli::try_parse_from(["talaria-ack", "validate"]).unwrap();
        assert!(!cli.defers_logging_to_config());
    }

    #[test]
    fn test_run_requires_events() {
        let result = Cli::try_parse_from(["talaria-ack", "run"]);
        assert!(result.is_err());
    }
}
