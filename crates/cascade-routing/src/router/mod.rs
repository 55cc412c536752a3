/// Availability policies
pub mod availability;
/// Cascade router
pub mod cascade;
/// Coding-specialist selection
pub mod specialist;

use cascade_core::{AgentId, Classification, Result, Task};
use serde::{Deserialize, Serialize};

pub use availability::{AvailabilityPolicy, ThresholdPolicy};
pub use cascade::CascadeRouter;
pub use specialist::SpecialistSelector;

/// Routing decision with rationale
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutingDecision {
    /// Agent that should execute the task
    pub selected_agent: AgentId,
    /// Human-readable explanation naming the deciding condition
    pub reason: String,
    /// Candidates tried and skipped before the selection, in order
    pub fallback_chain: Vec<AgentId>,
    /// Classification the decision was based on
    pub classification: Classification,
}

impl RoutingDecision {
    /// Whether any candidate was skipped.
    #[must_use]
    pub fn used_fallback(&self) -> bool {
        !self.fallback_chain.is_empty()
    }
}

/// Something that turns a task into a routing decision
pub trait TaskRouter: Send + Sync {
    /// Route a task to an agent.
    ///
    /// # Errors
    /// Returns an error if the task is invalid or the router cannot place it.
    fn route(&self, task: &Task) -> Result<RoutingDecision>;
}
