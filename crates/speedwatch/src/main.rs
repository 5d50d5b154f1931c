//! `speedwatch` - speed-camera record service binary.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;

use speedwatch::cli::{Cli, Command, ConfigCommand, ServeCommand};
use speedwatch::store::DayFileStore;
use speedwatch::{init_logging, server, Config, SpeedControl};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    // Load configuration
    let config = Config::load_from(cli.config.clone())?;

    // Execute the command
    match cli.command {
        Command::Serve(serve_cmd) => run_server(config, &serve_cmd),
        Command::Config(config_cmd) => handle_config(&config, config_cmd),
    }
}

fn run_server(mut config: Config, cmd: &ServeCommand) -> anyhow::Result<()> {
    if let Some(addr) = &cmd.addr {
        config.server.addr = addr.clone();
    }
    if let Some(dir) = &cmd.data_dir {
        config.storage.dir = Some(dir.clone());
    }
    config.validate()?;

    let store = Arc::new(DayFileStore::open(config.data_dir())?);
    let usecase = SpeedControl::new(store);

    let runtime = tokio::runtime::Runtime::new().context("failed to start async runtime")?;
    runtime.block_on(server::serve(&config, usecase))?;
    Ok(())
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Storage]");
                println!("  Data dir:  {}", config.data_dir().display());
                println!();
                println!("[Server]");
                println!("  Address:   {}", config.server.addr);
                println!("  Open from: {}", config.server.open);
                println!("  Open till: {}", config.server.close);
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}
