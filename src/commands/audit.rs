//! The `audit-jobs` command: degraded unconditional dispatch mode.
//!
//! Bypasses the event filter entirely and records every job event. Never
//! composed with the filtering mode; operators pick one mode per process.

use std::path::Path;
use std::sync::Arc;

use tracing::{info, warn};

use crate::config::Config;
use crate::error::Result;
use crate::watcher::JobAuditHandler;

/// Log every job event unconditionally.
pub async fn run_audit_jobs(config: Config, replay: &Path) -> Result<()> {
    warn!("audit mode bypasses all event filters");
    info!(namespace = %config.namespace, "starting job audit session");

    let handler = Arc::new(JobAuditHandler::new());
    super::run_session(&config, replay, handler).await
}
