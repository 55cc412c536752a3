//! Task classification.
//!
//! Maps free-text task descriptions to a category and confidence using a
//! weighted keyword rule table. Pure and deterministic; no I/O.

/// Rule-table classifier
pub mod classifier;

pub use classifier::{CategoryScores, TaskClassifier};
