//! Event handlers for watched resource lifecycle events.
//!
//! A handler receives one [`EventEnvelope`] per observed transition and
//! decides what, if anything, to emit. Two dispatch modes exist, selected
//! at construction time and never composed:
//!
//! - [`LogHandler`]: gates every event through the configured
//!   [`EventFilter`], derives latency metrics, and emits one structured
//!   record per accepted event.
//! - [`JobAuditHandler`]: bypasses filtering entirely and records every job
//!   event unconditionally; a degraded mode for administrative auditing.
//!
//! Dispatch is synchronous and stateless: no counters, no dedup cache, no
//! shared mutable state across invocations.

use std::sync::Arc;

use chrono::Duration;
use tracing::{info, warn};

use crate::resources::{EventEnvelope, EventKind, ResourceKind, ResourceSummary};
use crate::watcher::filter::{EventFilter, FilterCriteria};
use crate::watcher::latency::{job_completion_latency, pod_readiness_latency};

/// Callbacks invoked by the watch feed for each observed transition.
///
/// Implementations are selected per dispatch mode at construction time.
/// Callbacks run on the feed's delivery tasks and may execute concurrently
/// across resource kinds, so implementations must be `Send + Sync` and must
/// not block.
pub trait ResourceEventHandler: Send + Sync {
    /// A resource was created (or observed during the feed's initial sync).
    fn on_created(&self, envelope: &EventEnvelope);

    /// A resource changed; `envelope.current` is the post-change snapshot.
    fn on_updated(&self, envelope: &EventEnvelope);

    /// A resource was deleted; `envelope.current` is the final snapshot.
    fn on_deleted(&self, envelope: &EventEnvelope);
}

/// One structured record derived from an accepted event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchRecord {
    /// Kind of the resource the event concerns.
    pub kind: ResourceKind,

    /// The lifecycle transition observed.
    pub event: EventKind,

    /// Resource namespace.
    pub namespace: String,

    /// Resource name.
    pub name: String,

    /// Phase or condition state, where the kind has one (pod phase, job
    /// succeeded count).
    pub state: Option<String>,

    /// Derived latency metric, when computable.
    pub latency: Option<Duration>,
}

impl WatchRecord {
    /// Builds the record for an envelope: identity, state, and whichever
    /// latency metric applies to the kind and event.
    ///
    /// Pure: same envelope, same record.
    pub fn for_envelope(envelope: &EventEnvelope) -> Self {
        let resource = &envelope.current;
        let (state, latency) = match resource {
            ResourceSummary::Pod(pod) => {
                let latency = match envelope.event {
                    EventKind::Created | EventKind::Updated => pod_readiness_latency(pod),
                    EventKind::Deleted => None,
                };
                (Some(pod.phase.to_string()), latency)
            }
            ResourceSummary::Job(job) => {
                let latency = match envelope.event {
                    EventKind::Updated => job_completion_latency(&job.status),
                    EventKind::Created | EventKind::Deleted => None,
                };
                (Some(format!("succeeded={}", job.status.succeeded)), latency)
            }
            ResourceSummary::Service(_) | ResourceSummary::Secret(_) => (None, None),
        };

        Self {
            kind: resource.kind(),
            event: envelope.event,
            namespace: resource.namespace().to_string(),
            name: resource.name().to_string(),
            state,
            latency,
        }
    }
}

/// Destination for accepted-event records.
///
/// This is the seam that lets tests observe dispatch without scraping log
/// output; production uses [`TracingSink`].
pub trait RecordSink: Send + Sync {
    /// Emit one record.
    fn emit(&self, record: &WatchRecord);
}

/// Emits records as structured `tracing` events at info level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl RecordSink for TracingSink {
    fn emit(&self, record: &WatchRecord) {
        info!(
            kind = %record.kind,
            event = %record.event,
            namespace = %record.namespace,
            name = %record.name,
            state = record.state.as_deref(),
            latency_ms = record.latency.map(|d| d.num_milliseconds()),
            "resource event"
        );
    }
}

/// Returns false (with a warning) for envelopes missing identity fields.
///
/// Such envelopes are dropped, never retried: replay is the watch feed's
/// responsibility, not this layer's.
fn envelope_is_well_formed(envelope: &EventEnvelope) -> bool {
    let resource = &envelope.current;
    if resource.name().is_empty() || resource.namespace().is_empty() {
        warn!(
            kind = %resource.kind(),
            event = %envelope.event,
            "dropping event with missing identity fields"
        );
        return false;
    }
    true
}

/// Filtering dispatch mode: the handler registry for normal operation.
///
/// Every envelope is validated, evaluated against the configured filter
/// (always against `current`, also for updates), and either silently
/// dropped or turned into exactly one record.
pub struct LogHandler {
    filter: EventFilter,
    sink: Arc<dyn RecordSink>,
}

impl LogHandler {
    /// Create a filtering handler that emits through [`TracingSink`].
    pub fn new(criteria: FilterCriteria) -> Self {
        Self::with_sink(criteria, Arc::new(TracingSink))
    }

    /// Create a filtering handler with an explicit sink.
    pub fn with_sink(criteria: FilterCriteria, sink: Arc<dyn RecordSink>) -> Self {
        Self {
            filter: EventFilter::new(criteria),
            sink,
        }
    }

    /// The configured filter, e.g. for startup logging of its summary.
    pub fn filter(&self) -> &EventFilter {
        &self.filter
    }

    fn dispatch(&self, envelope: &EventEnvelope) {
        if !envelope_is_well_formed(envelope) {
            return;
        }
        if !self.filter.should_process(&envelope.current) {
            // Silent drop; uninteresting events leave no trace.
            return;
        }
        self.sink.emit(&WatchRecord::for_envelope(envelope));
    }
}

impl ResourceEventHandler for LogHandler {
    fn on_created(&self, envelope: &EventEnvelope) {
        self.dispatch(envelope);
    }

    fn on_updated(&self, envelope: &EventEnvelope) {
        self.dispatch(envelope);
    }

    fn on_deleted(&self, envelope: &EventEnvelope) {
        self.dispatch(envelope);
    }
}

/// Degraded dispatch mode: records every job event, no filtering.
///
/// Non-job events are ignored. Selected independently of the filtering
/// mode; the two are never composed.
pub struct JobAuditHandler {
    sink: Arc<dyn RecordSink>,
}

impl JobAuditHandler {
    /// Create an audit handler that emits through [`TracingSink`].
    pub fn new() -> Self {
        Self::with_sink(Arc::new(TracingSink))
    }

    /// Create an audit handler with an explicit sink.
    pub fn with_sink(sink: Arc<dyn RecordSink>) -> Self {
        Self { sink }
    }

    fn dispatch(&self, envelope: &EventEnvelope) {
        if !envelope_is_well_formed(envelope) {
            return;
        }
        if envelope.current.kind() != ResourceKind::Job {
            return;
        }
        self.sink.emit(&WatchRecord::for_envelope(envelope));
    }
}

impl Default for JobAuditHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl ResourceEventHandler for JobAuditHandler {
    fn on_created(&self, envelope: &EventEnvelope) {
        self.dispatch(envelope);
    }

    fn on_updated(&self, envelope: &EventEnvelope) {
        self.dispatch(envelope);
    }

    fn on_deleted(&self, envelope: &EventEnvelope) {
        self.dispatch(envelope);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::{
        JobCondition, JobConditionType, JobStatus, JobSummary, ObjectMeta, PodCondition,
        PodConditionType, PodPhase, PodSummary, SecretSummary,
    };
    use chrono::{TimeZone, Utc};
    use std::sync::Mutex;

    /// Sink that records everything it receives.
    #[derive(Default)]
    struct RecordingSink {
        records: Mutex<Vec<WatchRecord>>,
    }

    impl RecordSink for RecordingSink {
        fn emit(&self, record: &WatchRecord) {
            self.records.lock().unwrap().push(record.clone());
        }
    }

    impl RecordingSink {
        fn take(&self) -> Vec<WatchRecord> {
            std::mem::take(&mut self.records.lock().unwrap())
        }
    }

    fn nginx_criteria() -> FilterCriteria {
        FilterCriteria {
            name_prefixes: vec!["nginx".to_string()],
            required_labels: [("app".to_string(), "nginx".to_string())].into(),
        }
    }

    fn running_pod(name: &str, label_value: &str) -> ResourceSummary {
        ResourceSummary::Pod(PodSummary {
            meta: ObjectMeta::new(name, "default").with_label("app", label_value),
            phase: PodPhase::Running,
            conditions: vec![
                PodCondition {
                    condition_type: PodConditionType::Scheduled,
                    last_transition_time: Some(Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap()),
                },
                PodCondition {
                    condition_type: PodConditionType::Ready,
                    last_transition_time: Some(Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 2).unwrap()),
                },
            ],
        })
    }

    fn completed_job(name: &str) -> ResourceSummary {
        ResourceSummary::Job(JobSummary {
            meta: ObjectMeta::new(name, "default").with_label("app", "nginx"),
            status: JobStatus {
                start_time: Some(Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap()),
                succeeded: 1,
                conditions: vec![JobCondition {
                    condition_type: JobConditionType::Complete,
                    last_transition_time: Some(
                        Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 30).unwrap(),
                    ),
                }],
            },
        })
    }

    #[test]
    fn test_log_handler_emits_record_with_latency_for_matching_pod() {
        let sink = Arc::new(RecordingSink::default());
        let handler = LogHandler::with_sink(nginx_criteria(), sink.clone());

        handler.on_created(&EventEnvelope::created(running_pod("nginx-1", "nginx")));

        let records = sink.take();
        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.kind, ResourceKind::Pod);
        assert_eq!(record.event, EventKind::Created);
        assert_eq!(record.namespace, "default");
        assert_eq!(record.name, "nginx-1");
        assert_eq!(record.state.as_deref(), Some("Running"));
        assert_eq!(record.latency, Some(Duration::seconds(2)));
    }

    #[test]
    fn test_log_handler_silently_drops_filtered_events() {
        let sink = Arc::new(RecordingSink::default());
        let handler = LogHandler::with_sink(nginx_criteria(), sink.clone());

        // Wrong prefix.
        handler.on_created(&EventEnvelope::created(running_pod("redis-1", "nginx")));
        // Wrong label value.
        handler.on_updated(&EventEnvelope::updated(
            running_pod("nginx-1", "redis"),
            running_pod("nginx-1", "redis"),
        ));

        assert!(sink.take().is_empty());
    }

    #[test]
    fn test_log_handler_evaluates_updates_against_current() {
        let sink = Arc::new(RecordingSink::default());
        let handler = LogHandler::with_sink(nginx_criteria(), sink.clone());

        // Previous snapshot would fail the filter; current passes.
        handler.on_updated(&EventEnvelope::updated(
            running_pod("nginx-1", "redis"),
            running_pod("nginx-1", "nginx"),
        ));

        assert_eq!(sink.take().len(), 1);
    }

    #[test]
    fn test_log_handler_drops_envelope_missing_identity() {
        let sink = Arc::new(RecordingSink::default());
        let handler = LogHandler::with_sink(FilterCriteria::default(), sink.clone());

        let nameless = ResourceSummary::Secret(SecretSummary {
            meta: ObjectMeta::new("", "default"),
        });
        handler.on_created(&EventEnvelope::created(nameless));

        assert!(sink.take().is_empty());
    }

    #[test]
    fn test_log_handler_pod_delete_has_no_latency() {
        let sink = Arc::new(RecordingSink::default());
        let handler = LogHandler::with_sink(nginx_criteria(), sink.clone());

        handler.on_deleted(&EventEnvelope::deleted(running_pod("nginx-1", "nginx")));

        let records = sink.take();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].event, EventKind::Deleted);
        assert_eq!(records[0].latency, None);
    }

    #[test]
    fn test_log_handler_job_update_carries_completion_latency() {
        let sink = Arc::new(RecordingSink::default());
        let handler = LogHandler::with_sink(nginx_criteria(), sink.clone());

        let job = completed_job("nginx-reindex");
        handler.on_updated(&EventEnvelope::updated(job.clone(), job));

        let records = sink.take();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].state.as_deref(), Some("succeeded=1"));
        assert_eq!(records[0].latency, Some(Duration::seconds(30)));
    }

    #[test]
    fn test_log_handler_job_create_has_no_latency() {
        let sink = Arc::new(RecordingSink::default());
        let handler = LogHandler::with_sink(nginx_criteria(), sink.clone());

        handler.on_created(&EventEnvelope::created(completed_job("nginx-reindex")));

        let records = sink.take();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].latency, None);
    }

    #[test]
    fn test_record_for_envelope_is_pure() {
        let envelope = EventEnvelope::created(running_pod("nginx-1", "nginx"));
        assert_eq!(
            WatchRecord::for_envelope(&envelope),
            WatchRecord::for_envelope(&envelope)
        );
    }

    #[test]
    fn test_audit_handler_bypasses_filter() {
        let sink = Arc::new(RecordingSink::default());
        let handler = JobAuditHandler::with_sink(sink.clone());

        // A job no filter would match still gets recorded.
        let job = ResourceSummary::Job(JobSummary {
            meta: ObjectMeta::new("backup-0", "default"),
            status: JobStatus::default(),
        });
        handler.on_created(&EventEnvelope::created(job.clone()));
        handler.on_deleted(&EventEnvelope::deleted(job));

        let records = sink.take();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].event, EventKind::Created);
        assert_eq!(records[1].event, EventKind::Deleted);
    }

    #[test]
    fn test_audit_handler_ignores_non_jobs() {
        let sink = Arc::new(RecordingSink::default());
        let handler = JobAuditHandler::with_sink(sink.clone());

        handler.on_created(&EventEnvelope::created(running_pod("nginx-1", "nginx")));

        assert!(sink.take().is_empty());
    }
}
