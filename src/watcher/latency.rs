//! Latency extraction from resource status history.
//!
//! Both extractors are total functions over well-formed snapshots: an
//! absent timestamp or a not-yet-terminal state yields `None`, never an
//! error. Condition histories can contain superseded entries and are not
//! assumed sorted, so the extractors scan every entry and keep the last
//! occurrence per condition type; the most recent transition of a given
//! type is authoritative.

use chrono::Duration;

use crate::resources::{JobConditionType, JobStatus, PodConditionType, PodPhase, PodSummary};

/// Time from a pod being scheduled onto a node to it reporting ready.
///
/// Emits a value only when the pod's phase is `Running` and both the last
/// `PodScheduled` and the last `Ready` transition times are present.
/// Anything else is a normal "not yet ready" state, not an error.
pub fn pod_readiness_latency(pod: &PodSummary) -> Option<Duration> {
    let mut scheduled = None;
    let mut ready = None;

    for condition in &pod.conditions {
        match condition.condition_type {
            PodConditionType::Scheduled => scheduled = condition.last_transition_time,
            PodConditionType::Ready => ready = condition.last_transition_time,
            _ => {}
        }
    }

    if pod.phase != PodPhase::Running {
        return None;
    }

    Some(ready? - scheduled?)
}

/// Time from a job being started to its `Complete` condition.
///
/// Emits a value only when `start_time` is set, the last `Complete`
/// transition time is present, and exactly one pod succeeded. A
/// `succeeded` count other than 1 (including >1, which should not happen
/// for non-parallel jobs) yields `None` rather than a guess.
pub fn job_completion_latency(status: &JobStatus) -> Option<Duration> {
    let start = status.start_time?;

    let mut complete = None;
    for condition in &status.conditions {
        if condition.condition_type == JobConditionType::Complete {
            complete = condition.last_transition_time;
        }
    }

    if status.succeeded != 1 {
        return None;
    }

    Some(complete? - start)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::{JobCondition, ObjectMeta, PodCondition};
    use chrono::{DateTime, TimeZone, Utc};

    fn at(secs: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, secs).unwrap()
    }

    fn pod_with(
        phase: PodPhase,
        conditions: Vec<(PodConditionType, Option<DateTime<Utc>>)>,
    ) -> PodSummary {
        PodSummary {
            meta: ObjectMeta::new("nginx-1", "default"),
            phase,
            conditions: conditions
                .into_iter()
                .map(|(condition_type, last_transition_time)| PodCondition {
                    condition_type,
                    last_transition_time,
                })
                .collect(),
        }
    }

    fn job_with(
        start_time: Option<DateTime<Utc>>,
        succeeded: u32,
        conditions: Vec<(JobConditionType, Option<DateTime<Utc>>)>,
    ) -> JobStatus {
        JobStatus {
            start_time,
            succeeded,
            conditions: conditions
                .into_iter()
                .map(|(condition_type, last_transition_time)| JobCondition {
                    condition_type,
                    last_transition_time,
                })
                .collect(),
        }
    }

    #[test]
    fn test_pod_latency_running_with_both_conditions() {
        let pod = pod_with(
            PodPhase::Running,
            vec![
                (PodConditionType::Scheduled, Some(at(0))),
                (PodConditionType::Ready, Some(at(2))),
            ],
        );

        assert_eq!(pod_readiness_latency(&pod), Some(Duration::seconds(2)));
    }

    #[test]
    fn test_pod_latency_unavailable_when_pending() {
        let pod = pod_with(
            PodPhase::Pending,
            vec![
                (PodConditionType::Scheduled, Some(at(0))),
                (PodConditionType::Ready, Some(at(2))),
            ],
        );

        assert_eq!(pod_readiness_latency(&pod), None);
    }

    #[test]
    fn test_pod_latency_unavailable_without_ready_condition() {
        let pod = pod_with(
            PodPhase::Running,
            vec![(PodConditionType::Scheduled, Some(at(0)))],
        );

        assert_eq!(pod_readiness_latency(&pod), None);
    }

    #[test]
    fn test_pod_latency_unavailable_with_absent_transition_time() {
        let pod = pod_with(
            PodPhase::Running,
            vec![
                (PodConditionType::Scheduled, Some(at(0))),
                (PodConditionType::Ready, None),
            ],
        );

        assert_eq!(pod_readiness_latency(&pod), None);
    }

    #[test]
    fn test_pod_latency_last_occurrence_wins() {
        // A superseded Ready entry appears first; the later one is
        // authoritative even though the list is not sorted by time.
        let pod = pod_with(
            PodPhase::Running,
            vec![
                (PodConditionType::Ready, Some(at(1))),
                (PodConditionType::Scheduled, Some(at(0))),
                (PodConditionType::Ready, Some(at(5))),
            ],
        );

        assert_eq!(pod_readiness_latency(&pod), Some(Duration::seconds(5)));
    }

    #[test]
    fn test_pod_latency_ignores_unrelated_conditions() {
        let pod = pod_with(
            PodPhase::Running,
            vec![
                (PodConditionType::Initialized, Some(at(0))),
                (PodConditionType::Scheduled, Some(at(1))),
                (PodConditionType::ContainersReady, Some(at(2))),
                (PodConditionType::Ready, Some(at(3))),
            ],
        );

        assert_eq!(pod_readiness_latency(&pod), Some(Duration::seconds(2)));
    }

    #[test]
    fn test_pod_latency_is_idempotent() {
        let pod = pod_with(
            PodPhase::Running,
            vec![
                (PodConditionType::Scheduled, Some(at(0))),
                (PodConditionType::Ready, Some(at(2))),
            ],
        );

        assert_eq!(pod_readiness_latency(&pod), pod_readiness_latency(&pod));
    }

    #[test]
    fn test_job_latency_single_success() {
        let status = job_with(Some(at(0)), 1, vec![(JobConditionType::Complete, Some(at(30)))]);

        assert_eq!(job_completion_latency(&status), Some(Duration::seconds(30)));
    }

    #[test]
    fn test_job_latency_unavailable_before_success() {
        let status = job_with(Some(at(0)), 0, vec![(JobConditionType::Complete, Some(at(30)))]);

        assert_eq!(job_completion_latency(&status), None);
    }

    #[test]
    fn test_job_latency_unavailable_without_start_time() {
        let status = job_with(None, 1, vec![(JobConditionType::Complete, Some(at(30)))]);

        assert_eq!(job_completion_latency(&status), None);
    }

    #[test]
    fn test_job_latency_unavailable_without_complete_condition() {
        let status = job_with(Some(at(0)), 1, vec![(JobConditionType::Failed, Some(at(30)))]);

        assert_eq!(job_completion_latency(&status), None);
    }

    #[test]
    fn test_job_latency_unavailable_with_parallel_successes() {
        // succeeded > 1 should not happen for non-parallel jobs; emit
        // nothing rather than guess.
        let status = job_with(Some(at(0)), 2, vec![(JobConditionType::Complete, Some(at(30)))]);

        assert_eq!(job_completion_latency(&status), None);
    }

    #[test]
    fn test_job_latency_last_complete_condition_wins() {
        let status = job_with(
            Some(at(0)),
            1,
            vec![
                (JobConditionType::Complete, Some(at(10))),
                (JobConditionType::Failed, Some(at(12))),
                (JobConditionType::Complete, Some(at(45))),
            ],
        );

        assert_eq!(job_completion_latency(&status), Some(Duration::seconds(45)));
    }
}
