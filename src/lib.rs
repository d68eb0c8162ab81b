//! nswatch - Namespace resource lifecycle observer library
//!
//! This library provides the core functionality for nswatch: filtering of
//! resource lifecycle events, latency extraction from status history,
//! per-kind event dispatch, and watch orchestration against a pluggable
//! event feed.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - `resources`: immutable resource snapshots and event envelopes
//! - `watcher`: filter evaluation, latency extraction, dispatch, and
//!   orchestration
//! - `feed`: the watch feed interface plus channel/replay implementations
//! - `config`: configuration management and validation
//! - `error`: error types and result aliases
//! - `cli`: command-line interface definition
//! - `commands`: CLI command handlers
//!
//! # Example
//!
//! ```no_run
//! use nswatch::{Config, Cli};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config/config.yaml", &Cli::default())?;
//!     config.validate()?;
//!
//!     // Watch session wiring would go here
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod feed;
pub mod resources;
pub mod watcher;

// Re-export commonly used types
pub use cli::Cli;
pub use config::Config;
pub use error::{NswatchError, Result};
pub use feed::{ChannelFeed, ReplayScript, ResourceWatchFeed};
pub use resources::{EventEnvelope, EventKind, ResourceKind, ResourceSummary};
pub use watcher::{
    EventFilter, FilterCriteria, JobAuditHandler, LogHandler, ResourceEventHandler,
    WatchOrchestrator,
};
