//! Event filtering, dispatch, and latency extraction.
//!
//! This module is the decision-making core of nswatch:
//!
//! 1. The feed delivers a lifecycle event for a watched resource.
//! 2. The handler validates the envelope and gates it through the
//!    configured filter criteria.
//! 3. Accepted events get a latency metric derived from status history,
//!    where one applies, and exactly one structured record is emitted.
//!
//! # Modules
//!
//! - [`filter`]: name-prefix and label criteria evaluation
//! - [`latency`]: readiness/completion latency extraction
//! - [`handler`]: per-mode dispatch (filtering and unconditional audit)
//! - [`orchestrator`]: per-kind subscription and sync barriers
//! - [`logging`]: structured logging configuration

pub mod filter;
pub mod handler;
pub mod latency;
pub mod logging;
pub mod orchestrator;

pub use filter::{EventFilter, FilterCriteria};
pub use handler::{
    JobAuditHandler, LogHandler, RecordSink, ResourceEventHandler, TracingSink, WatchRecord,
};
pub use latency::{job_completion_latency, pod_readiness_latency};
pub use orchestrator::{OrchestratorError, SubscriptionState, WatchOrchestrator};
