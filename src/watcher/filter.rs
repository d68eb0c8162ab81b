//! Event filtering for watched resources.
//!
//! This module provides the filtering logic that decides which resource
//! lifecycle events are interesting, based on configured name-prefix and
//! label criteria.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::resources::ResourceSummary;

/// Services whose name carries this suffix are infrastructure-owned and are
/// rejected before any other criterion is considered.
const RESERVED_SERVICE_SUFFIX: &str = "-syndicate";

/// Configured criteria for deciding whether an event is interesting.
///
/// Loaded once at startup and shared read-only across all dispatch; an
/// empty prefix set or label map means match-all for that criterion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCriteria {
    /// Literal name prefixes; a resource passes if its name starts with any
    /// of them. Empty means every name passes.
    #[serde(default)]
    pub name_prefixes: Vec<String>,

    /// Required labels; every (key, value) pair must be present and equal
    /// on the resource. Empty means every label set passes.
    #[serde(default)]
    pub required_labels: BTreeMap<String, String>,
}

/// Event filter for determining which resource events to process.
///
/// Pods and jobs must pass both the name and label filters. Services skip
/// the name filter but are vetoed outright when their name ends with the
/// reserved suffix. Secrets take the label filter only.
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    criteria: FilterCriteria,
}

impl EventFilter {
    /// Create a new event filter from criteria.
    pub fn new(criteria: FilterCriteria) -> Self {
        Self { criteria }
    }

    /// Check if a resource should be processed based on the configured
    /// criteria.
    ///
    /// Deterministic and free of side effects; safe to call concurrently.
    ///
    /// # Examples
    ///
    /// ```
    /// use nswatch::resources::{ObjectMeta, PodPhase, PodSummary, ResourceSummary};
    /// use nswatch::watcher::{EventFilter, FilterCriteria};
    ///
    /// let filter = EventFilter::new(FilterCriteria {
    ///     name_prefixes: vec!["nginx".to_string()],
    ///     required_labels: Default::default(),
    /// });
    ///
    /// let pod = ResourceSummary::Pod(PodSummary {
    ///     meta: ObjectMeta::new("nginx-7f8b", "default"),
    ///     phase: PodPhase::Pending,
    ///     conditions: vec![],
    /// });
    /// assert!(filter.should_process(&pod));
    /// ```
    pub fn should_process(&self, resource: &ResourceSummary) -> bool {
        match resource {
            ResourceSummary::Pod(pod) => {
                self.name_matches(&pod.meta.name) && self.labels_match(&pod.meta.labels)
            }
            ResourceSummary::Job(job) => {
                self.name_matches(&job.meta.name) && self.labels_match(&job.meta.labels)
            }
            ResourceSummary::Service(service) => {
                // Hard veto, not subject to override by matching labels.
                if service.meta.name.ends_with(RESERVED_SERVICE_SUFFIX) {
                    return false;
                }
                self.labels_match(&service.meta.labels)
            }
            ResourceSummary::Secret(secret) => self.labels_match(&secret.meta.labels),
        }
    }

    /// Name filter: empty prefix set matches all; otherwise the first
    /// matching prefix short-circuits.
    fn name_matches(&self, name: &str) -> bool {
        if self.criteria.name_prefixes.is_empty() {
            return true;
        }
        self.criteria
            .name_prefixes
            .iter()
            .any(|prefix| name.starts_with(prefix))
    }

    /// Label filter: every required (key, value) pair must be present and
    /// equal. A required key that is absent fails the whole filter.
    fn labels_match(&self, labels: &BTreeMap<String, String>) -> bool {
        self.criteria
            .required_labels
            .iter()
            .all(|(key, value)| labels.get(key) == Some(value))
    }

    /// Get filter summary for startup logging.
    ///
    /// # Examples
    ///
    /// ```
    /// use nswatch::watcher::{EventFilter, FilterCriteria};
    ///
    /// let filter = EventFilter::new(FilterCriteria::default());
    /// assert_eq!(filter.summary(), "no filters (all events)");
    /// ```
    pub fn summary(&self) -> String {
        let mut parts = Vec::new();

        if !self.criteria.name_prefixes.is_empty() {
            parts.push(format!("prefixes={}", self.criteria.name_prefixes.join(",")));
        }

        if !self.criteria.required_labels.is_empty() {
            let labels: Vec<String> = self
                .criteria
                .required_labels
                .iter()
                .map(|(k, v)| format!("{}={}", k, v))
                .collect();
            parts.push(format!("labels={}", labels.join(",")));
        }

        if parts.is_empty() {
            "no filters (all events)".to_string()
        } else {
            parts.join(", ")
        }
    }
}
