//! Session load state shared by the tracker and the availability policy.

use serde::{Deserialize, Serialize};

/// Point-in-time view of session load.
///
/// Only `UsageTracker` mutates the live copy; everything else works on snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SessionState {
    /// Share of the primary agent's quota consumed in the current window, in [0, 1]
    pub primary_usage_fraction: f64,
    /// Tasks routed in this session; never decreases
    pub session_task_count: u64,
}

impl SessionState {
    /// Builds a state with the fraction clamped into [0, 1].
    ///
    /// NaN is treated as zero usage.
    #[must_use]
    pub fn new(primary_usage_fraction: f64, session_task_count: u64) -> Self {
        Self {
            primary_usage_fraction: clamp_fraction(primary_usage_fraction).unwrap_or(0.0),
            session_task_count,
        }
    }
}

/// Clamps a usage fraction into [0, 1], rejecting NaN.
#[must_use]
pub fn clamp_fraction(fraction: f64) -> Option<f64> {
    (!fraction.is_nan()).then(|| fraction.clamp(0.0, 1.0))
}
