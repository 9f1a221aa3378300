mod cli;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use zeny::config::ZenyConfig;

#[derive(Parser)]
#[command(name = "zeny", version, about = "HTTP backend for AI avatar personas")]
struct Cli {
    /// Config file (defaults to ~/.zeny/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Start the HTTP API server
    Serve {
        /// Override the configured bind host
        #[arg(long)]
        host: Option<String>,
        /// Override the configured port
        #[arg(long)]
        port: Option<u16>,
    },
    /// List the selectable generation models
    Models {
        /// Ask the provider which models it currently serves
        #[arg(long)]
        remote: bool,
    },
    /// Check database health and provider configuration
    Doctor,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => ZenyConfig::load_from(path)?,
        None => ZenyConfig::load()?,
    };

    // Log to stderr so CLI output on stdout stays clean.
    let filter = EnvFilter::try_new(&config.server.log_level)
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Serve { host, port } => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            zeny::server::serve(config).await?;
        }
        Command::Models { remote } => {
            cli::models::models(&config, remote).await?;
        }
        Command::Doctor => {
            cli::doctor::doctor(&config)?;
        }
    }

    Ok(())
}
