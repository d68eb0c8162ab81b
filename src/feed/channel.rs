//! In-process channel-backed watch feed.
//!
//! `ChannelFeed` delivers events through one tokio mpsc channel and one
//! delivery task per resource kind. The initial listing is seeded before
//! `start`; starting a kind replays the listing as synthetic created events,
//! flips the kind's sync flag, then drains published envelopes in order.
//! This is the feed used by the replay command and by the integration
//! tests; a cluster-backed feed would implement the same trait.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use super::{FeedError, ResourceWatchFeed, SubscriptionHandle};
use crate::resources::{EventEnvelope, EventKind, ResourceKind, ResourceSummary};
use crate::watcher::ResourceEventHandler;

/// Per-kind subscription state.
struct KindState {
    handlers: Vec<Arc<dyn ResourceEventHandler>>,
    seed: Vec<ResourceSummary>,
    sender: Option<mpsc::UnboundedSender<EventEnvelope>>,
    synced_tx: Option<watch::Sender<bool>>,
    synced_rx: watch::Receiver<bool>,
    task: Option<JoinHandle<()>>,
}

impl KindState {
    fn new() -> Self {
        let (synced_tx, synced_rx) = watch::channel(false);
        Self {
            handlers: Vec::new(),
            seed: Vec::new(),
            sender: None,
            synced_tx: Some(synced_tx),
            synced_rx,
            task: None,
        }
    }

    fn started(&self) -> bool {
        self.task.is_some()
    }
}

/// Channel-backed [`ResourceWatchFeed`] implementation.
pub struct ChannelFeed {
    kinds: Mutex<HashMap<ResourceKind, KindState>>,
}

impl ChannelFeed {
    /// Creates an empty feed with no subscriptions.
    pub fn new() -> Self {
        Self {
            kinds: Mutex::new(HashMap::new()),
        }
    }

    /// Adds a resource to a kind's initial listing.
    ///
    /// Seeds registered after `start` are ignored; the initial listing is
    /// fixed once delivery begins.
    pub fn seed(&self, summary: ResourceSummary) {
        let kind = summary.kind();
        let mut kinds = self.kinds.lock().unwrap();
        let state = kinds.entry(kind).or_insert_with(KindState::new);
        if state.started() {
            debug!(kind = %kind, "ignoring seed for already started kind");
            return;
        }
        state.seed.push(summary);
    }

    /// Publishes a post-sync envelope to the kind derived from its current
    /// snapshot.
    pub fn publish(&self, envelope: EventEnvelope) -> Result<(), FeedError> {
        let kind = envelope.current.kind();
        let kinds = self.kinds.lock().unwrap();
        let state = kinds.get(&kind).ok_or(FeedError::NotSubscribed(kind))?;
        let sender = state.sender.as_ref().ok_or(FeedError::NotStarted(kind))?;
        sender
            .send(envelope)
            .map_err(|_| FeedError::SyncAborted(kind))
    }

    /// Closes every kind's channel; delivery tasks exit after draining
    /// already published envelopes.
    pub fn close(&self) {
        let mut kinds = self.kinds.lock().unwrap();
        for state in kinds.values_mut() {
            state.sender = None;
        }
    }

    /// Waits for every delivery task to finish. Call after [`close`](Self::close).
    pub async fn join(&self) {
        let tasks: Vec<JoinHandle<()>> = {
            let mut kinds = self.kinds.lock().unwrap();
            kinds
                .values_mut()
                .filter_map(|state| state.task.take())
                .collect()
        };
        for task in tasks {
            let _ = task.await;
        }
    }
}

impl Default for ChannelFeed {
    fn default() -> Self {
        Self::new()
    }
}

fn deliver(handlers: &[Arc<dyn ResourceEventHandler>], envelope: &EventEnvelope) {
    for handler in handlers {
        match envelope.event {
            EventKind::Created => handler.on_created(envelope),
            EventKind::Updated => handler.on_updated(envelope),
            EventKind::Deleted => handler.on_deleted(envelope),
        }
    }
}

#[async_trait]
impl ResourceWatchFeed for ChannelFeed {
    fn subscribe(
        &self,
        kind: ResourceKind,
        handler: Arc<dyn ResourceEventHandler>,
    ) -> Result<SubscriptionHandle, FeedError> {
        let mut kinds = self.kinds.lock().unwrap();
        let state = kinds.entry(kind).or_insert_with(KindState::new);
        state.handlers.push(handler);
        debug!(kind = %kind, subscribers = state.handlers.len(), "handler subscribed");
        Ok(SubscriptionHandle::new(kind, state.handlers.len() - 1))
    }

    fn start(&self, kind: ResourceKind) -> Result<(), FeedError> {
        let mut kinds = self.kinds.lock().unwrap();
        let state = kinds.get_mut(&kind).ok_or(FeedError::NotSubscribed(kind))?;
        if state.handlers.is_empty() {
            return Err(FeedError::NotSubscribed(kind));
        }
        // The sync flag doubles as the started marker: once taken, delivery
        // is running and a second start is a no-op.
        let synced_tx = match state.synced_tx.take() {
            Some(tx) => tx,
            None => return Ok(()),
        };

        let (sender, mut receiver) = mpsc::unbounded_channel::<EventEnvelope>();
        state.sender = Some(sender);

        let handlers = state.handlers.clone();
        let seed = std::mem::take(&mut state.seed);

        state.task = Some(tokio::spawn(async move {
            // Initial listing: a synthetic created event per pre-existing
            // resource, then the sync barrier opens.
            for summary in seed {
                let envelope = EventEnvelope::created(summary);
                deliver(&handlers, &envelope);
            }
            let _ = synced_tx.send(true);
            info!(kind = %kind, "initial listing delivered");

            while let Some(envelope) = receiver.recv().await {
                deliver(&handlers, &envelope);
            }
            debug!(kind = %kind, "delivery channel closed");
        }));

        Ok(())
    }

    fn is_synced(&self, kind: ResourceKind) -> bool {
        let kinds = self.kinds.lock().unwrap();
        kinds
            .get(&kind)
            .map(|state| *state.synced_rx.borrow())
            .unwrap_or(false)
    }

    async fn wait_for_sync(&self, kind: ResourceKind) -> Result<(), FeedError> {
        let mut synced_rx = {
            let kinds = self.kinds.lock().unwrap();
            let state = kinds.get(&kind).ok_or(FeedError::NotSubscribed(kind))?;
            if !state.started() {
                return Err(FeedError::NotStarted(kind));
            }
            state.synced_rx.clone()
        };

        while !*synced_rx.borrow() {
            synced_rx
                .changed()
                .await
                .map_err(|_| FeedError::SyncAborted(kind))?;
        }
        Ok(())
    }
}
