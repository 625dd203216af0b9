//! mylist-register
//!
//! Main entry point for the mylist-register CLI and server.

mod batch;
mod cli;
mod server;
mod services;

use clap::Parser;
use tracing::{info, warn};

use mylist_config::{Config, ConfigLoader, ConfigValidator};

use crate::batch::{encrypt_password, run_batch};
use crate::cli::{Cli, Commands};
use crate::server::{init_tracing, run_server};

fn load_config(cli: &Cli) -> Result<Config, Box<dyn std::error::Error>> {
    let path = ConfigLoader::expand_path(&cli.config.to_string_lossy());
    let config = ConfigLoader::load_or_default(std::path::Path::new(&path))?;
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let mut config = load_config(&cli)?;

    init_tracing(&config.logging)?;

    if let Some(Commands::Serve { host, port }) = &cli.command {
        if let Some(host) = host {
            config.server.host = host.clone();
        }
        if let Some(port) = port {
            config.server.port = *port;
        }
    }

    let warnings = ConfigValidator::validate(&config)?.into_result()?;
    for warning in &warnings {
        warn!("Config {}: {}", warning.path, warning.message);
    }

    match cli.command {
        None | Some(Commands::Serve { .. }) => run_server(config).await,
        Some(Commands::Batch { title }) => run_batch(config, title).await,
        Some(Commands::Encrypt { password }) => encrypt_password(&config, &password),
        Some(Commands::Check) => {
            info!("Configuration {} is valid", cli.config.display());
            Ok(())
        }
    }
}
