//! Lifecycle event envelopes delivered by the watch feed.
//!
//! An envelope wraps one observed transition for one resource. It is
//! constructed per callback invocation, scoped to a single dispatch, and
//! discarded afterwards.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::summary::ResourceSummary;

/// The kind of lifecycle transition an envelope describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Created,
    Updated,
    Deleted,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Updated => "updated",
            Self::Deleted => "deleted",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One observed lifecycle transition for one resource.
///
/// `current` is the snapshot under evaluation for every event kind; for
/// deletions it is the final observed state. `previous` is only populated
/// for updates and is carried for handlers that want to diff, but the
/// dispatch policy always evaluates `current`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventEnvelope {
    /// The transition kind.
    pub event: EventKind,

    /// Snapshot before the transition, when the feed observed one.
    #[serde(default)]
    pub previous: Option<ResourceSummary>,

    /// Snapshot under evaluation.
    pub current: ResourceSummary,
}

impl EventEnvelope {
    /// Envelope for a creation (including synthetic creations during the
    /// feed's initial sync).
    pub fn created(current: ResourceSummary) -> Self {
        Self {
            event: EventKind::Created,
            previous: None,
            current,
        }
    }

    /// Envelope for an update.
    pub fn updated(previous: ResourceSummary, current: ResourceSummary) -> Self {
        Self {
            event: EventKind::Updated,
            previous: Some(previous),
            current,
        }
    }

    /// Envelope for a deletion; `current` is the final observed snapshot.
    pub fn deleted(current: ResourceSummary) -> Self {
        Self {
            event: EventKind::Deleted,
            previous: None,
            current,
        }
    }
}
