//! The `watch` command: filtering dispatch mode.

use std::path::Path;
use std::sync::Arc;

use tracing::info;

use crate::config::Config;
use crate::error::Result;
use crate::watcher::LogHandler;

/// Watch resource events with filtering and latency extraction.
pub async fn run_watch(config: Config, replay: &Path) -> Result<()> {
    let handler = Arc::new(LogHandler::new(config.filters.criteria()));

    info!(
        namespace = %config.namespace,
        filters = %handler.filter().summary(),
        "starting watch session"
    );

    super::run_session(&config, replay, handler).await
}
