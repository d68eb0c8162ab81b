//! Command handlers for the nswatch CLI.
//!
//! Each submodule wires configuration into the watch pipeline for one
//! dispatch mode; the shared session runner lives here.

pub mod audit;
pub mod watch;

use std::path::Path;
use std::sync::Arc;

use tracing::info;

use crate::config::Config;
use crate::error::Result;
use crate::feed::{ChannelFeed, ReplayScript};
use crate::watcher::{ResourceEventHandler, WatchOrchestrator};

/// Runs one watch session: seed the feed from the replay script, bring all
/// enabled kinds through the sync barrier, stream the recorded events, and
/// drain.
///
/// The session ends when the replay is exhausted or on SIGINT, whichever
/// comes first; on a signal the subscriptions are abandoned without a
/// graceful drain.
pub(crate) async fn run_session(
    config: &Config,
    replay: &Path,
    handler: Arc<dyn ResourceEventHandler>,
) -> Result<()> {
    let script = ReplayScript::from_path(replay)?;
    let feed = Arc::new(ChannelFeed::new());
    script.seed(&feed);

    let kinds = config.resources.enabled_kinds();
    let orchestrator = WatchOrchestrator::new(feed.clone(), handler, kinds)?;
    orchestrator.run_until_synced().await?;

    info!(
        namespace = %config.namespace,
        resync_secs = config.resync_interval_secs,
        "initial sync complete; streaming events"
    );

    let stream = async {
        script.publish(&feed)?;
        feed.close();
        feed.join().await;
        Ok::<(), crate::feed::FeedError>(())
    };

    tokio::select! {
        result = stream => {
            result?;
            info!("replay exhausted; shutting down");
        }
        _ = tokio::signal::ctrl_c() => {
            info!("shutdown signal received; abandoning watch subscriptions");
        }
    }

    Ok(())
}
