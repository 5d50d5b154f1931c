//! Command-line interface for speedwatch.
//!
//! This module provides the CLI structure for the `speedwatch` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{ConfigCommand, ServeCommand};

/// speedwatch - Record and query speed-camera observations
///
/// A service that appends speed-camera records to per-day JSON files and
/// answers over-speed and min/max queries against them.
#[derive(Debug, Parser)]
#[command(name = "speedwatch")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the HTTP service
    Serve(ServeCommand),

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        if self.quiet {
            crate::logging::Verbosity::Quiet
        } else {
            match self.verbose {
                0 => crate::logging::Verbosity::Normal,
                1 => crate::logging::Verbosity::Verbose,
                _ => crate::logging::Verbosity::Trace,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_command_name() {
        let cli = Cli::command();
        assert_eq!(cli.get_name(), "speedwatch");
    }

    #[test]
    fn test_cli_parses_serve() {
        let cli = Cli::parse_from(["speedwatch", "serve", "--addr", "0.0.0.0:9000"]);
        match cli.command {
            Command::Serve(cmd) => assert_eq!(cmd.addr.as_deref(), Some("0.0.0.0:9000")),
            Command::Config(_) => panic!("expected serve command"),
        }
    }

    #[test]
    fn test_verbosity_quiet_wins() {
        let cli = Cli::parse_from(["speedwatch", "-q", "-v", "serve"]);
        assert_eq!(cli.verbosity(), crate::logging::Verbosity::Quiet);
    }

    #[test]
    fn test_verbosity_levels() {
        let normal = Cli::parse_from(["speedwatch", "serve"]);
        assert_eq!(normal.verbosity(), crate::logging::Verbosity::Normal);

        let verbose = Cli::parse_from(["speedwatch", "-v", "serve"]);
        assert_eq!(verbose.verbosity(), crate::logging::Verbosity::Verbose);

        let trace = Cli::parse_from(["speedwatch", "-vv", "serve"]);
        assert_eq!(trace.verbosity(), crate::logging::Verbosity::Trace);
    }

    #[test]
    fn test_cli_parses_config_show_json() {
        let cli = Cli::parse_from(["speedwatch", "config", "show", "--json"]);
        match cli.command {
            Command::Config(ConfigCommand::Show { json }) => assert!(json),
            _ => panic!("expected config show command"),
        }
    }
}
