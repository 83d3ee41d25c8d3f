//! HTTP server binary for fitbot.

use clap::Parser;
use fitbot::{AppState, CoachConfig};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// FitBot: conversational fitness-coaching backend.
#[derive(Parser)]
#[command(name = "fitbot-server", version, about)]
struct Cli {
    /// Path to TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the listen port.
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing. Users can override with RUST_LOG.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("fitbot=info")),
        )
        .init();

    let cli = Cli::parse();

    let mut config = match cli.config {
        Some(ref path) => CoachConfig::from_file(path)?,
        None => {
            let default_path = CoachConfig::default_config_path();
            if default_path.exists() {
                CoachConfig::from_file(&default_path)?
            } else {
                warn!(
                    "no config file at {}, using built-in defaults",
                    default_path.display()
                );
                CoachConfig::default()
            }
        }
    };

    if let Some(port) = cli.port {
        config.server.port = port;
    }

    info!("fitbot v{}", env!("CARGO_PKG_VERSION"));
    let state = AppState::from_config(&config);
    fitbot::serve(&config, state).await?;
    Ok(())
}
