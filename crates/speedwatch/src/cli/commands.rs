//! Command definitions for the speedwatch CLI.

use std::path::PathBuf;

use clap::{Args, Subcommand};

/// Run the HTTP service.
#[derive(Debug, Args)]
pub struct ServeCommand {
    /// Override the configured bind address
    #[arg(short, long, value_name = "ADDR")]
    pub addr: Option<String>,

    /// Override the configured data directory
    #[arg(short, long, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,
}

/// View or validate configuration.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the current configuration
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the configuration file path
    Path,

    /// Validate a configuration file
    Validate {
        /// Configuration file to validate (defaults to the standard path)
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,
    },
}
