//! Error types for the cascade routing core.

use crate::task::TaskCategory;
use core::result::Result as CoreResult;
use regex::Error as RegexError;
use std::io::Error as IoError;
use thiserror::Error;
use toml::de::Error as TomlDeError;
use toml::ser::Error as TomlSerError;

/// Result type alias using `CascadeError`.
pub type Result<T> = CoreResult<T, CascadeError>;

/// Errors that can occur while configuring the router or routing a task.
#[derive(Debug, Error)]
pub enum CascadeError {
    /// Caller supplied a nonsensical task magnitude.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Every candidate in the cascade refused the task.
    ///
    /// Only reachable when the availability policy breaks the emergency-agent invariant.
    #[error("No candidate agent available for {category} task; availability policy is misconfigured")]
    NoCandidateAvailable {
        /// Category of the task that could not be placed
        category: TaskCategory,
    },

    /// The router has been shut down and no longer accepts tasks.
    #[error("Router is not accepting tasks")]
    RouterInactive,

    /// Configuration is invalid or missing.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A classifier signal could not be compiled into a matcher.
    #[error("Invalid classifier signal: {0}")]
    InvalidSignal(#[from] RegexError),

    /// An I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] IoError),

    /// TOML deserialization failed.
    #[error("TOML deserialization error: {0}")]
    TomlDe(#[from] TomlDeError),

    /// TOML serialization failed.
    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] TomlSerError),
}

impl CascadeError {
    /// Whether this error indicates a programming or configuration bug rather than bad input.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::NoCandidateAvailable { .. })
    }

    /// Whether retrying the same call could succeed.
    ///
    /// Only I/O failures while reading or writing config files qualify. Routing errors
    /// are final; fallback already happens inside the cascade.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Io(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::ErrorKind;

    #[test]
    fn test_only_no_candidate_is_fatal() {
        let fatal = CascadeError::NoCandidateAvailable {
            category: TaskCategory::ManagementReasoning,
        };
        assert!(fatal.is_fatal());
        assert!(!CascadeError::InvalidInput("negative size".to_owned()).is_fatal());
        assert!(!CascadeError::RouterInactive.is_fatal());
    }

    #[test]
    fn test_only_io_is_retryable() {
        let io = CascadeError::from(IoError::new(ErrorKind::Interrupted, "interrupted"));
        assert!(io.is_retryable());
        assert!(!CascadeError::RouterInactive.is_retryable());
        assert!(!CascadeError::Config("bad".to_owned()).is_retryable());
        assert!(!CascadeError::InvalidInput("negative size".to_owned()).is_retryable());
        let fatal = CascadeError::NoCandidateAvailable {
            category: TaskCategory::Coding,
        };
        assert!(!fatal.is_retryable());
    }

    #[test]
    fn test_no_candidate_message_names_category() {
        let error = CascadeError::NoCandidateAvailable {
            category: TaskCategory::ContextAnalysis,
        };
        assert!(error.to_string().contains("context analysis"));
    }
}
