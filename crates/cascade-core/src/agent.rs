//! Routable agent identifiers.
//!
//! The routing core never talks to an agent; it only names one. An execution layer
//! outside this workspace maps each `AgentId` to an adapter.
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};

/// Identifier for a routable execution target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentId {
    /// Default usage-metered conversational agent
    Primary,
    /// First reasoning fallback
    Secondary,
    /// Second reasoning fallback
    Tertiary,
    /// Always-available terminal fallback
    Emergency,
    /// Member of the coding-specialist family
    Coding(CodingSpecialist),
}

impl AgentId {
    /// Cascade candidates in priority order, emergency last.
    pub const CASCADE: [Self; 4] = [Self::Primary, Self::Secondary, Self::Tertiary, Self::Emergency];

    /// Whether this agent belongs to the coding-specialist family.
    #[must_use]
    pub const fn is_coding_specialist(&self) -> bool {
        matches!(self, Self::Coding(_))
    }

    /// Whether this agent takes part in the primary-usage cascade.
    #[must_use]
    pub const fn is_cascade_member(&self) -> bool {
        !self.is_coding_specialist()
    }

    /// Stable short name used in logs and stats.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Primary => "primary",
            Self::Secondary => "secondary",
            Self::Tertiary => "tertiary",
            Self::Emergency => "emergency",
            Self::Coding(specialist) => specialist.name(),
        }
    }
}

impl Display for AgentId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> FmtResult {
        write!(formatter, "{}", self.name())
    }
}

/// Coding-specialist agents. They sit outside the cascade and are always available.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CodingSpecialist {
    /// Bug hunting, crash analysis, fixes
    Debugger,
    /// New features and large unscoped coding work
    Implementer,
    /// Restructuring and cleanup
    Refactorer,
    /// Writing and repairing tests
    Tester,
    /// Anything else that is clearly code
    Generalist,
}

impl CodingSpecialist {
    /// Every specialist in the family.
    pub const ALL: [Self; 5] = [
        Self::Debugger,
        Self::Implementer,
        Self::Refactorer,
        Self::Tester,
        Self::Generalist,
    ];

    /// Stable short name used in logs and stats.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Debugger => "coding-debugger",
            Self::Implementer => "coding-implementer",
            Self::Refactorer => "coding-refactorer",
            Self::Tester => "coding-tester",
            Self::Generalist => "coding-generalist",
        }
    }
}

impl Display for CodingSpecialist {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> FmtResult {
        write!(formatter, "{}", self.name())
    }
}
