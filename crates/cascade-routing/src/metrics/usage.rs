//! Session usage tracking.

use cascade_core::{AgentId, IgnoreLock as _, SessionState, clamp_fraction};
use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

/// Everything the tracker guards, kept under one lock so snapshots are never torn.
#[derive(Debug, Default)]
struct TrackerState {
    session: SessionState,
    invocations: HashMap<AgentId, u64>,
}

/// Mutation-guarded session counters.
///
/// Owned explicitly and injected into the router, so each test or service instance
/// gets its own session.
#[derive(Debug, Default)]
pub struct UsageTracker {
    state: Mutex<TrackerState>,
}

impl UsageTracker {
    /// Creates a tracker for a fresh session.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a tracker that resumes from an existing session state.
    #[must_use]
    pub fn with_session(session: SessionState) -> Self {
        Self {
            state: Mutex::new(TrackerState {
                session: SessionState::new(session.primary_usage_fraction, session.session_task_count),
                invocations: HashMap::new(),
            }),
        }
    }

    /// Counts one more task against the session.
    pub fn record_task(&self) {
        let mut state = self.state.lock_ignore_poison();
        state.session.session_task_count = state.session.session_task_count.saturating_add(1);
    }

    /// Counts one more task and returns the state that includes it, under a single lock.
    pub fn record_task_and_snapshot(&self) -> SessionState {
        let mut state = self.state.lock_ignore_poison();
        state.session.session_task_count = state.session.session_task_count.saturating_add(1);
        state.session
    }

    /// Sets the measured primary usage, clamped to [0, 1].
    ///
    /// NaN readings are dropped and the previous value is kept.
    pub fn set_primary_usage(&self, fraction: f64) {
        let Some(clamped) = clamp_fraction(fraction) else {
            tracing::warn!("Ignoring NaN primary usage update");
            return;
        };
        if (clamped - fraction).abs() > f64::EPSILON {
            tracing::debug!(fraction, clamped, "Clamped primary usage update");
        }
        self.state.lock_ignore_poison().session.primary_usage_fraction = clamped;
    }

    /// Consistent point-in-time copy of the session.
    pub fn snapshot(&self) -> SessionState {
        self.state.lock_ignore_poison().session
    }

    /// Counts one routing decision that selected `agent`.
    pub fn record_invocation(&self, agent: AgentId) {
        let mut state = self.state.lock_ignore_poison();
        let count = state.invocations.entry(agent).or_insert(0);
        *count = count.saturating_add(1);
    }

    /// How many decisions selected `agent`.
    pub fn invocation_count(&self, agent: AgentId) -> u64 {
        self.state
            .lock_ignore_poison()
            .invocations
            .get(&agent)
            .copied()
            .unwrap_or(0)
    }

    /// All non-zero invocation counts, ordered by agent.
    pub fn invocation_counts(&self) -> BTreeMap<AgentId, u64> {
        self.state
            .lock_ignore_poison()
            .invocations
            .iter()
            .map(|(agent, count)| (*agent, *count))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cascade_core::CodingSpecialist;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_record_task_increments() {
        let tracker = UsageTracker::new();
        tracker.record_task();
        tracker.record_task();
        assert_eq!(tracker.snapshot().session_task_count, 2);
        assert_eq!(tracker.record_task_and_snapshot().session_task_count, 3);
    }

    #[test]
    fn test_set_primary_usage_clamps() {
        let tracker = UsageTracker::new();
        tracker.set_primary_usage(1.4);
        assert!((tracker.snapshot().primary_usage_fraction - 1.0).abs() < f64::EPSILON);
        tracker.set_primary_usage(-0.2);
        assert!(tracker.snapshot().primary_usage_fraction.abs() < f64::EPSILON);
    }

    #[test]
    fn test_nan_usage_keeps_previous_value() {
        let tracker = UsageTracker::new();
        tracker.set_primary_usage(0.42);
        tracker.set_primary_usage(f64::NAN);
        assert!((tracker.snapshot().primary_usage_fraction - 0.42).abs() < f64::EPSILON);
    }

    #[test]
    fn test_snapshot_is_idempotent() {
        let tracker = UsageTracker::with_session(SessionState::new(0.3, 9));
        assert_eq!(tracker.snapshot(), tracker.snapshot());
    }

    #[test]
    fn test_with_session_clamps_initial_state() {
        let tracker = UsageTracker::with_session(SessionState {
            primary_usage_fraction: 7.0,
            session_task_count: 4,
        });
        let snapshot = tracker.snapshot();
        assert!((snapshot.primary_usage_fraction - 1.0).abs() < f64::EPSILON);
        assert_eq!(snapshot.session_task_count, 4);
    }

    #[test]
    fn test_invocation_counts() {
        let tracker = UsageTracker::new();
        tracker.record_invocation(AgentId::Primary);
        tracker.record_invocation(AgentId::Primary);
        tracker.record_invocation(AgentId::Coding(CodingSpecialist::Tester));

        assert_eq!(tracker.invocation_count(AgentId::Primary), 2);
        assert_eq!(tracker.invocation_count(AgentId::Emergency), 0);

        let counts = tracker.invocation_counts();
        assert_eq!(counts.len(), 2);
        assert_eq!(counts.get(&AgentId::Coding(CodingSpecialist::Tester)), Some(&1));
    }

    #[test]
    fn test_concurrent_updates_are_not_lost() {
        let tracker = Arc::new(UsageTracker::new());
        let handles: Vec<_> = (0..8)
            .map(|worker| {
                let tracker = Arc::clone(&tracker);
                thread::spawn(move || {
                    for step in 0..250_u32 {
                        tracker.record_task();
                        tracker.set_primary_usage(f64::from(worker * 250 + step) / 2000.0);
                    }
                })
            })
            .collect();
        for handle in handles {
            if let Err(error) = handle.join() {
                panic!("worker panicked: {error:?}");
            }
        }

        let snapshot = tracker.snapshot();
        assert_eq!(snapshot.session_task_count, 2000);
        assert!((0.0..=1.0).contains(&snapshot.primary_usage_fraction));
    }
}
