//! Command-line interface definition for nswatch
//!
//! This module defines the CLI structure using clap's derive API,
//! providing commands for the filtering watch mode and the unconditional
//! job audit mode.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// nswatch - Namespace resource lifecycle observer
///
/// Watch pod, job, service, and secret lifecycle events in one namespace,
/// filter them against configured criteria, and emit structured log
/// records with derived latency metrics.
#[derive(Parser, Debug, Clone)]
#[command(name = "nswatch")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/config.yaml")]
    pub config: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for nswatch
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Watch resource events with filtering and latency extraction
    Watch {
        /// Path to the replay script feeding the watch session (YAML)
        #[arg(short, long, env = "NSWATCH_REPLAY")]
        replay: PathBuf,

        /// Override the namespace from config
        #[arg(short, long)]
        namespace: Option<String>,
    },

    /// Log every job event unconditionally, bypassing all filters
    AuditJobs {
        /// Path to the replay script feeding the watch session (YAML)
        #[arg(short, long, env = "NSWATCH_REPLAY")]
        replay: PathBuf,

        /// Override the namespace from config
        #[arg(short, long)]
        namespace: Option<String>,
    },
}

impl Cli {
    /// Parse command line arguments
    ///
    /// # Returns
    ///
    /// Returns the parsed CLI structure
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// The namespace override carried by the active subcommand, if any.
    pub fn namespace(&self) -> Option<&str> {
        match &self.command {
            Commands::Watch { namespace, .. } | Commands::AuditJobs { namespace, .. } => {
                namespace.as_deref()
            }
        }
    }
}

impl Default for Cli {
    fn default() -> Self {
        Self {
            config: Some("config/config.yaml".to_string()),
            verbose: false,
            command: Commands::Watch {
                replay: PathBuf::from("config/replay-sample.yaml"),
                namespace: None,
            },
        }
    }
}
