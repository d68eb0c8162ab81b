//! Data model for watched cluster resources.
//!
//! Snapshots ([`ResourceSummary`]) capture a resource's identity, labels,
//! and status at event time; envelopes ([`EventEnvelope`]) wrap one observed
//! transition for dispatch. Both are immutable once constructed.

pub mod event;
pub mod summary;

pub use event::{EventEnvelope, EventKind};
pub use summary::{
    JobCondition, JobConditionType, JobStatus, JobSummary, ObjectMeta, PodCondition,
    PodConditionType, PodPhase, PodSummary, ResourceKind, ResourceSummary, SecretSummary,
    ServiceSummary,
};
