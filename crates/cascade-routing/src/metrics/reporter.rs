//! Read-only stats snapshots for external consumers.

use super::usage::UsageTracker;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Router stats at one point in time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouterStats {
    /// Tasks routed in this session
    pub session_task_count: u64,
    /// Primary agent quota consumed, in [0, 1]
    pub primary_usage_fraction: f64,
    /// Whether the router is accepting tasks
    pub orchestration_active: bool,
    /// Decisions per agent, keyed by agent name
    pub agent_invocations: BTreeMap<String, u64>,
}

/// Produces `RouterStats` without ever mutating session state.
#[derive(Debug, Clone)]
pub struct StatsReporter {
    tracker: Arc<UsageTracker>,
    active: Arc<AtomicBool>,
}

impl StatsReporter {
    /// Creates a reporter over a tracker and the router's activity flag.
    #[must_use]
    pub fn new(tracker: Arc<UsageTracker>, active: Arc<AtomicBool>) -> Self {
        Self { tracker, active }
    }

    /// Current stats.
    pub fn get_stats(&self) -> RouterStats {
        let session = self.tracker.snapshot();
        let agent_invocations = self
            .tracker
            .invocation_counts()
            .into_iter()
            .map(|(agent, count)| (agent.name().to_owned(), count))
            .collect();

        RouterStats {
            session_task_count: session.session_task_count,
            primary_usage_fraction: session.primary_usage_fraction,
            orchestration_active: self.active.load(Ordering::Acquire),
            agent_invocations,
        }
    }
}
