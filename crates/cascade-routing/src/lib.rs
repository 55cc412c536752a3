//! Task classification and cascading agent selection.
//!
//! Coding tasks go to a coding specialist. Management and analysis tasks walk
//! the primary → secondary → tertiary → emergency cascade and take the first
//! agent the availability policy accepts.

/// Keyword classification of task descriptions
pub mod analyzer;
/// Session counters and stats
pub mod metrics;
/// Availability policies and the cascade router
pub mod router;

pub use analyzer::{CategoryScores, TaskClassifier};
pub use metrics::{RouterStats, StatsReporter, UsageTracker};
pub use router::{
    AvailabilityPolicy, CascadeRouter, RoutingDecision, SpecialistSelector, TaskRouter,
    ThresholdPolicy,
};
