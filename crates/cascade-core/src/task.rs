//! Task and classification types.

use crate::agent::CodingSpecialist;
use crate::session::clamp_fraction;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};

/// Unit of work submitted for routing.
///
/// Magnitudes are kept exactly as the caller supplied them; validation happens in the
/// router so that rejected tasks are never recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Free-text description of the work
    pub description: String,
    /// Caller estimate of reasoning depth, nominally 0.0-1.0
    pub complexity_score: f64,
    /// Caller cost proxy, e.g. expected output size
    pub estimated_size: i64,
    /// Caller's own correlation id, echoed in logs
    pub correlation_id: Option<String>,
}

impl Task {
    /// Creates a new task without a correlation id.
    pub fn new(description: impl Into<String>, complexity_score: f64, estimated_size: i64) -> Self {
        Self {
            description: description.into(),
            complexity_score,
            estimated_size,
            correlation_id: None,
        }
    }

    /// Attaches the caller's correlation id.
    #[must_use]
    pub fn with_correlation_id(mut self, correlation_id: impl Into<String>) -> Self {
        self.correlation_id = Some(correlation_id.into());
        self
    }
}

/// Semantic category assigned by the classifier.
///
/// Declaration order is the tie-break precedence: earlier variants win equal scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskCategory {
    /// Writing, fixing or restructuring code
    Coding,
    /// Planning, coordination and architecture
    ManagementReasoning,
    /// Reading and digesting existing material
    ContextAnalysis,
}

impl TaskCategory {
    /// All categories in precedence order.
    pub const PRECEDENCE: [Self; 3] = [Self::Coding, Self::ManagementReasoning, Self::ContextAnalysis];

    /// Position in the precedence order (0 is strongest).
    #[must_use]
    pub const fn precedence(&self) -> usize {
        match self {
            Self::Coding => 0,
            Self::ManagementReasoning => 1,
            Self::ContextAnalysis => 2,
        }
    }

    /// Whether tasks in this category go through the fallback cascade.
    #[must_use]
    pub const fn uses_cascade(&self) -> bool {
        !matches!(self, Self::Coding)
    }
}

impl Display for TaskCategory {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Coding => write!(formatter, "coding"),
            Self::ManagementReasoning => write!(formatter, "management reasoning"),
            Self::ContextAnalysis => write!(formatter, "context analysis"),
        }
    }
}

/// Kind of coding work a signal points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CodingFocus {
    /// Bugs, crashes, failures
    Debugging,
    /// New functionality
    Implementation,
    /// Restructuring existing code
    Refactoring,
    /// Tests
    Testing,
}

impl CodingFocus {
    /// Specialist that handles this kind of work.
    #[must_use]
    pub const fn specialist(&self) -> CodingSpecialist {
        match self {
            Self::Debugging => CodingSpecialist::Debugger,
            Self::Implementation => CodingSpecialist::Implementer,
            Self::Refactoring => CodingSpecialist::Refactorer,
            Self::Testing => CodingSpecialist::Tester,
        }
    }
}

impl Display for CodingFocus {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Debugging => write!(formatter, "debugging"),
            Self::Implementation => write!(formatter, "implementation"),
            Self::Refactoring => write!(formatter, "refactoring"),
            Self::Testing => write!(formatter, "testing"),
        }
    }
}

/// Classifier output.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    /// Winning category
    pub category: TaskCategory,
    /// Heuristic signal strength in [0, 1]; not a probability
    pub confidence: f64,
    /// Strongest coding focus, only set for `Coding`
    pub focus: Option<CodingFocus>,
}

impl Classification {
    /// Creates a classification, clamping confidence into [0, 1].
    ///
    /// NaN becomes zero.
    #[must_use]
    pub fn new(category: TaskCategory, confidence: f64) -> Self {
        Self {
            category,
            confidence: clamp_fraction(confidence).unwrap_or(0.0),
            focus: None,
        }
    }

    /// Attaches a coding focus. Ignored for non-coding categories.
    #[must_use]
    pub fn with_focus(mut self, focus: Option<CodingFocus>) -> Self {
        if self.category == TaskCategory::Coding {
            self.focus = focus;
        }
        self
    }
}
