//! Watch orchestration across resource kinds.
//!
//! The orchestrator attaches one handler to the feed for every enabled
//! resource kind and holds startup at the cache-sync barrier: a kind is
//! only treated as live once the feed has delivered its initial full
//! listing. Kinds subscribe and sync independently; one kind's barrier
//! never blocks another's delivery.
//!
//! Subscription lifecycle per kind:
//! `Unregistered -> Subscribed -> Syncing -> Ready`. `Ready` is terminal;
//! there is no unsubscribe short of process termination, at which point
//! the feed connection and pending callbacks are abandoned.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex};

use thiserror::Error;
use tracing::info;

use crate::feed::{FeedError, ResourceWatchFeed};
use crate::resources::ResourceKind;
use crate::watcher::ResourceEventHandler;

/// Errors raised while bringing subscriptions up.
///
/// Sync failures are fatal to startup: the orchestrator never reports a
/// kind `Ready` it could not sync, so the caller decides whether to abort
/// or degrade.
#[derive(Error, Debug)]
pub enum OrchestratorError {
    /// The configuration enabled no resource kinds at all.
    #[error("no resource kinds are enabled for watching")]
    NoKindsEnabled,

    /// Attaching the handler or starting delivery failed.
    #[error("failed to establish {kind} subscription: {source}")]
    Subscription {
        kind: ResourceKind,
        source: FeedError,
    },

    /// The feed shut down before the kind's initial listing was delivered.
    #[error("initial sync failed for {kind}s: {source}")]
    Sync {
        kind: ResourceKind,
        source: FeedError,
    },
}

/// Lifecycle of one kind's subscription.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SubscriptionState {
    /// No callbacks attached yet.
    #[default]
    Unregistered,

    /// Callbacks attached to the feed.
    Subscribed,

    /// Delivery started; waiting on the initial listing.
    Syncing,

    /// Initial listing delivered; the kind streams until process exit.
    Ready,
}

impl fmt::Display for SubscriptionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Unregistered => "unregistered",
            Self::Subscribed => "subscribed",
            Self::Syncing => "syncing",
            Self::Ready => "ready",
        };
        f.write_str(s)
    }
}

/// Subscribes a handler to the feed for each enabled kind and waits for
/// every kind's cache-sync barrier.
pub struct WatchOrchestrator<F: ResourceWatchFeed> {
    feed: Arc<F>,
    handler: Arc<dyn ResourceEventHandler>,
    kinds: Vec<ResourceKind>,
    states: Mutex<HashMap<ResourceKind, SubscriptionState>>,
}

impl<F: ResourceWatchFeed> WatchOrchestrator<F> {
    /// Creates an orchestrator for the given kinds.
    ///
    /// # Errors
    ///
    /// Returns [`OrchestratorError::NoKindsEnabled`] when `kinds` is empty.
    pub fn new(
        feed: Arc<F>,
        handler: Arc<dyn ResourceEventHandler>,
        kinds: Vec<ResourceKind>,
    ) -> Result<Self, OrchestratorError> {
        if kinds.is_empty() {
            return Err(OrchestratorError::NoKindsEnabled);
        }
        Ok(Self {
            feed,
            handler,
            kinds,
            states: Mutex::new(HashMap::new()),
        })
    }

    /// Current lifecycle state of a kind's subscription.
    pub fn state(&self, kind: ResourceKind) -> SubscriptionState {
        self.states
            .lock()
            .unwrap()
            .get(&kind)
            .copied()
            .unwrap_or_default()
    }

    /// The kinds this orchestrator manages.
    pub fn kinds(&self) -> &[ResourceKind] {
        &self.kinds
    }

    fn set_state(&self, kind: ResourceKind, state: SubscriptionState) {
        self.states.lock().unwrap().insert(kind, state);
    }

    /// Subscribes and starts every kind, then waits until each has
    /// delivered its initial listing.
    ///
    /// Sync barriers are awaited concurrently, so a slow kind delays
    /// startup completion but not the other kinds' event delivery. On
    /// return every kind is `Ready` and continues streaming until process
    /// exit.
    ///
    /// # Errors
    ///
    /// Returns the first subscription or sync failure; partial startup is
    /// not retried here, restarting the process is the recovery mechanism.
    pub async fn run_until_synced(&self) -> Result<(), OrchestratorError> {
        for &kind in &self.kinds {
            self.feed
                .subscribe(kind, self.handler.clone())
                .map_err(|source| OrchestratorError::Subscription { kind, source })?;
            self.set_state(kind, SubscriptionState::Subscribed);

            self.feed
                .start(kind)
                .map_err(|source| OrchestratorError::Subscription { kind, source })?;
            self.set_state(kind, SubscriptionState::Syncing);
            info!(kind = %kind, "waiting for {}s to be synced", kind);
        }

        let barriers = self.kinds.iter().map(|&kind| async move {
            self.feed
                .wait_for_sync(kind)
                .await
                .map_err(|source| OrchestratorError::Sync { kind, source })?;
            self.set_state(kind, SubscriptionState::Ready);
            info!(kind = %kind, "synced {}s", kind);
            Ok::<(), OrchestratorError>(())
        });

        futures::future::try_join_all(barriers).await?;
        Ok(())
    }
}
