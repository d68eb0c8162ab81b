//! Resource snapshot types for watched cluster objects.
//!
//! This module provides Rust structs to represent immutable snapshots of
//! the resource kinds nswatch observes. A snapshot captures identity,
//! labels, and kind-specific status at the moment the watch feed observed
//! a transition; it is never mutated after construction.
//!
//! The wire form follows the Kubernetes API conventions (camelCase fields,
//! `kind` discriminator), so snapshots round-trip through the replay format.
//!
//! # Example
//!
//! ```rust
//! use nswatch::resources::ResourceSummary;
//!
//! let json = r#"{
//!   "kind": "Pod",
//!   "meta": { "name": "nginx-7f8b", "namespace": "default", "labels": {"app": "nginx"} },
//!   "phase": "Running",
//!   "conditions": []
//! }"#;
//!
//! let summary: ResourceSummary = serde_json::from_str(json).unwrap();
//! assert_eq!(summary.name(), "nginx-7f8b");
//! ```

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The resource kinds nswatch knows how to watch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Pod,
    Job,
    Service,
    Secret,
}

impl ResourceKind {
    /// Returns the lowercase singular name used in logs and errors.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pod => "pod",
            Self::Job => "job",
            Self::Service => "service",
            Self::Secret => "secret",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity and labels shared by every watched resource.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectMeta {
    /// Resource name.
    pub name: String,

    /// Namespace the resource lives in.
    pub namespace: String,

    /// Resource labels (keys unique).
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
}

impl ObjectMeta {
    /// Creates metadata with the given identity and no labels.
    pub fn new(name: &str, namespace: &str) -> Self {
        Self {
            name: name.to_string(),
            namespace: namespace.to_string(),
            labels: BTreeMap::new(),
        }
    }

    /// Adds a label, builder-style.
    pub fn with_label(mut self, key: &str, value: &str) -> Self {
        self.labels.insert(key.to_string(), value.to_string());
        self
    }
}

/// Pod lifecycle phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PodPhase {
    #[default]
    Pending,
    Running,
    Succeeded,
    Failed,
    Unknown,
}

impl PodPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Running => "Running",
            Self::Succeeded => "Succeeded",
            Self::Failed => "Failed",
            Self::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for PodPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pod status condition types relevant to latency extraction.
///
/// The wire names match the Kubernetes condition types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PodConditionType {
    /// The pod has been bound to a node.
    #[serde(rename = "PodScheduled")]
    Scheduled,

    /// The pod is able to serve requests.
    Ready,

    /// All init containers completed.
    Initialized,

    /// All containers in the pod are ready.
    ContainersReady,
}

/// A single entry in a pod's status condition history.
///
/// Condition histories can contain superseded entries and are not assumed
/// sorted; consumers scan all entries and take the last occurrence per type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PodCondition {
    /// Condition type.
    #[serde(rename = "type")]
    pub condition_type: PodConditionType,

    /// When the condition last transitioned. Absent means the feed never
    /// observed a transition for this entry.
    #[serde(default)]
    pub last_transition_time: Option<DateTime<Utc>>,
}

/// Snapshot of a pod.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PodSummary {
    pub meta: ObjectMeta,

    /// Current lifecycle phase.
    #[serde(default)]
    pub phase: PodPhase,

    /// Status condition history.
    #[serde(default)]
    pub conditions: Vec<PodCondition>,
}

/// Job status condition types relevant to latency extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobConditionType {
    Complete,
    Failed,
}

/// A single entry in a job's status condition history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobCondition {
    /// Condition type.
    #[serde(rename = "type")]
    pub condition_type: JobConditionType,

    /// When the condition last transitioned.
    #[serde(default)]
    pub last_transition_time: Option<DateTime<Utc>>,
}

/// Job status at snapshot time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobStatus {
    /// When the job controller started the job. Absent means the job has
    /// not been scheduled yet.
    #[serde(default)]
    pub start_time: Option<DateTime<Utc>>,

    /// Number of pods that completed successfully.
    #[serde(default)]
    pub succeeded: u32,

    /// Status condition history.
    #[serde(default)]
    pub conditions: Vec<JobCondition>,
}

/// Snapshot of a job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobSummary {
    pub meta: ObjectMeta,

    #[serde(default)]
    pub status: JobStatus,
}

/// Snapshot of a service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceSummary {
    pub meta: ObjectMeta,
}

/// Snapshot of a secret. Secret payloads are never captured, only identity
/// and labels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecretSummary {
    pub meta: ObjectMeta,
}

/// Immutable snapshot of a single watched resource.
///
/// The enum discriminant replaces runtime type inspection: every dispatch
/// site matches exhaustively, so an unhandled kind is a compile error
/// rather than a silently dropped event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum ResourceSummary {
    Pod(PodSummary),
    Job(JobSummary),
    Service(ServiceSummary),
    Secret(SecretSummary),
}

impl ResourceSummary {
    /// Returns the kind of the wrapped resource.
    pub fn kind(&self) -> ResourceKind {
        match self {
            Self::Pod(_) => ResourceKind::Pod,
            Self::Job(_) => ResourceKind::Job,
            Self::Service(_) => ResourceKind::Service,
            Self::Secret(_) => ResourceKind::Secret,
        }
    }

    /// Returns the shared identity metadata.
    pub fn meta(&self) -> &ObjectMeta {
        match self {
            Self::Pod(p) => &p.meta,
            Self::Job(j) => &j.meta,
            Self::Service(s) => &s.meta,
            Self::Secret(s) => &s.meta,
        }
    }

    /// Resource name.
    pub fn name(&self) -> &str {
        &self.meta().name
    }

    /// Resource namespace.
    pub fn namespace(&self) -> &str {
        &self.meta().namespace
    }

    /// Resource labels.
    pub fn labels(&self) -> &BTreeMap<String, String> {
        &self.meta().labels
    }
}
