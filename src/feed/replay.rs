//! File-driven replay of a watch session.
//!
//! A replay script captures what a cluster feed would have delivered: the
//! initial listing per kind, followed by an ordered stream of lifecycle
//! events. Scripts are YAML (JSON parses as a subset) and drive a
//! [`ChannelFeed`], which makes the binary exercisable without any cluster
//! connectivity.
//!
//! # Script format
//!
//! ```yaml
//! initial:
//!   - kind: Pod
//!     meta: { name: nginx-1, namespace: default, labels: { app: nginx } }
//!     phase: Running
//! events:
//!   - event: deleted
//!     current:
//!       kind: Pod
//!       meta: { name: nginx-1, namespace: default, labels: { app: nginx } }
//!       phase: Running
//! ```

use std::collections::BTreeSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::channel::ChannelFeed;
use super::FeedError;
use crate::error::{NswatchError, Result};
use crate::resources::{EventEnvelope, ResourceKind, ResourceSummary};

/// A recorded watch session: initial listing plus subsequent transitions.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReplayScript {
    /// Resources present when the subscription was established; delivered
    /// as synthetic created events during initial sync.
    #[serde(default)]
    pub initial: Vec<ResourceSummary>,

    /// Transitions observed after the initial listing, in delivery order.
    #[serde(default)]
    pub events: Vec<EventEnvelope>,
}

impl ReplayScript {
    /// Loads a script from a YAML (or JSON) file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            NswatchError::Replay(format!("failed to read {}: {}", path.display(), e))
        })?;
        let script: Self = serde_yaml::from_str(&contents).map_err(|e| {
            NswatchError::Replay(format!("failed to parse {}: {}", path.display(), e))
        })?;
        debug!(
            path = %path.display(),
            initial = script.initial.len(),
            events = script.events.len(),
            "loaded replay script"
        );
        Ok(script)
    }

    /// Every kind the script mentions, in either the listing or the events.
    pub fn kinds(&self) -> BTreeSet<ResourceKind> {
        self.initial
            .iter()
            .map(ResourceSummary::kind)
            .chain(self.events.iter().map(|e| e.current.kind()))
            .collect()
    }

    /// Seeds the feed's initial listing. Call before starting the feed.
    pub fn seed(&self, feed: &ChannelFeed) {
        for summary in &self.initial {
            feed.seed(summary.clone());
        }
    }

    /// Publishes the recorded transitions in order. Call after the feed has
    /// synced.
    pub fn publish(&self, feed: &ChannelFeed) -> std::result::Result<(), FeedError> {
        for envelope in &self.events {
            feed.publish(envelope.clone())?;
        }
        Ok(())
    }
}
