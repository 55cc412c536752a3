//! Core types for the cascade task router.
//!
//! This crate provides the agent identifiers, task and classification types,
//! session state, configuration and error handling shared by the routing crate.

/// Routable agent identifiers.
pub mod agent;
/// Configuration loading and validation.
pub mod config;
/// Error types and result definitions.
pub mod error;
/// Session load state.
pub mod session;
/// Poison-tolerant locking helpers.
pub mod sync;
/// Task and classification types.
pub mod task;

pub use agent::{AgentId, CodingSpecialist};
pub use config::{
    AvailabilityConfig, CascadeConfig, ClassifierConfig, ClassifierRule, CodingConfig, LimitsConfig,
    LoadCeilings,
};
pub use error::{CascadeError, Result};
pub use session::{SessionState, clamp_fraction};
pub use sync::IgnoreLock;
pub use task::{Classification, CodingFocus, Task, TaskCategory};
