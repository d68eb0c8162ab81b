//! Resource watch feed interface.
//!
//! The feed is the external collaborator that produces an eventually
//! consistent stream of create/update/delete notifications per resource
//! kind, preceded by an initial full listing ("sync"). nswatch only depends
//! on the [`ResourceWatchFeed`] trait; the bundled implementations are an
//! in-process channel feed ([`ChannelFeed`]) and a file-driven replay
//! loader ([`ReplayScript`]) so the binary and the tests can run without a
//! cluster.
//!
//! Guarantees nswatch assumes from a feed (and does not re-verify):
//! at-least-once delivery per transition, and a synthetic created event for
//! every resource already present at subscription time, delivered during
//! the initial sync.

pub mod channel;
pub mod replay;

pub use channel::ChannelFeed;
pub use replay::ReplayScript;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::resources::ResourceKind;
use crate::watcher::ResourceEventHandler;

/// Errors that can occur while establishing or syncing a subscription.
#[derive(Error, Debug)]
pub enum FeedError {
    /// No handler has been subscribed for the kind.
    #[error("no subscription registered for {0}s")]
    NotSubscribed(ResourceKind),

    /// The kind was subscribed but delivery was never started.
    #[error("{0} subscription was never started")]
    NotStarted(ResourceKind),

    /// The feed shut down before the kind finished its initial sync.
    #[error("feed closed before {0}s completed initial sync")]
    SyncAborted(ResourceKind),
}

/// Opaque handle identifying one subscription on a feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriptionHandle {
    kind: ResourceKind,
    index: usize,
}

impl SubscriptionHandle {
    pub(crate) fn new(kind: ResourceKind, index: usize) -> Self {
        Self { kind, index }
    }

    /// The kind this subscription delivers.
    pub fn kind(&self) -> ResourceKind {
        self.kind
    }
}

/// An eventually consistent lifecycle event stream, one subscription per
/// resource kind.
///
/// Implementations deliver callbacks from their own background context;
/// per-kind, per-resource ordering follows the order the feed observed the
/// transitions, and nothing is guaranteed across kinds or instances.
#[async_trait]
pub trait ResourceWatchFeed: Send + Sync {
    /// Attach a handler's callbacks to the feed for one kind.
    fn subscribe(
        &self,
        kind: ResourceKind,
        handler: Arc<dyn ResourceEventHandler>,
    ) -> Result<SubscriptionHandle, FeedError>;

    /// Begin delivering events for a subscribed kind, starting with the
    /// synthetic created events of the initial listing.
    fn start(&self, kind: ResourceKind) -> Result<(), FeedError>;

    /// Whether the kind's initial listing has been fully delivered.
    fn is_synced(&self, kind: ResourceKind) -> bool;

    /// Block until the kind's initial listing has been fully delivered.
    ///
    /// Resolves immediately if already synced. There is no timeout; the
    /// wait ends only on sync or feed shutdown, in which case the error
    /// must propagate to startup rather than be swallowed.
    async fn wait_for_sync(&self, kind: ResourceKind) -> Result<(), FeedError>;
}
