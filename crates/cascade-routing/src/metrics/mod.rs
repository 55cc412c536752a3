//! Session usage tracking and stats reporting.
//!
//! The tracker is the only owner of mutable session state; the reporter reads it.

/// Read-only stats snapshots
pub mod reporter;
/// Synchronized session counters
pub mod usage;

pub use reporter::{RouterStats, StatsReporter};
pub use usage::UsageTracker;
