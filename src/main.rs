//! nswatch - Namespace resource lifecycle observer
//!
//! Main entry point for the nswatch sidecar.

use anyhow::Result;

use nswatch::cli::{Cli, Commands};
use nswatch::commands;
use nswatch::config::Config;
use nswatch::watcher::logging::init_watcher_logging;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse_args();

    // Load configuration
    let config_path = cli.config.as_deref().unwrap_or("config/config.yaml");
    let config = Config::load(config_path, &cli)?;

    // Initialize tracing from the merged logging configuration
    init_watcher_logging(&config.logging)?;

    // Validate configuration
    config.validate()?;

    // Execute command
    match cli.command {
        Commands::Watch { ref replay, .. } => {
            tracing::info!("Starting filtering watch mode");
            commands::watch::run_watch(config, replay).await?;
            Ok(())
        }
        Commands::AuditJobs { ref replay, .. } => {
            tracing::info!("Starting unconditional job audit mode");
            commands::audit::run_audit_jobs(config, replay).await?;
            Ok(())
        }
    }
}
