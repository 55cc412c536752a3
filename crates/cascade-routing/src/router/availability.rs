use cascade_core::{AgentId, AvailabilityConfig, LoadCeilings, SessionState};

/// Decides whether an agent can take work given the current session load.
///
/// Implementations must keep `AgentId::Emergency` available for every session;
/// the router treats a policy that refuses every candidate as a fatal bug.
pub trait AvailabilityPolicy: Send + Sync {
    /// Whether `agent` can accept work now.
    fn is_available(&self, agent: AgentId, session: &SessionState) -> bool;

    /// Human-readable condition that made `agent` unavailable.
    fn unavailable_reason(&self, agent: AgentId, _session: &SessionState) -> String {
        format!("{agent} agent unavailable")
    }
}

/// Threshold table policy built from configuration.
///
/// - primary: available while usage is at or below the usage ceiling
/// - secondary/tertiary: available while the session task count is at or below
///   their load ceiling
/// - emergency and coding specialists: always available
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThresholdPolicy {
    primary_usage_ceiling: f64,
    load_ceilings: LoadCeilings,
}

impl ThresholdPolicy {
    /// Creates a policy from the availability section of the config.
    #[must_use]
    pub fn new(config: &AvailabilityConfig) -> Self {
        Self {
            primary_usage_ceiling: config.primary_usage_ceiling,
            load_ceilings: config.load_ceilings,
        }
    }

    /// Usage fraction above which the primary agent is over budget.
    #[must_use]
    pub const fn primary_usage_ceiling(&self) -> f64 {
        self.primary_usage_ceiling
    }

    /// Load ceiling for a reasoning fallback, if the agent has one.
    #[must_use]
    pub const fn load_ceiling(&self, agent: AgentId) -> Option<u64> {
        match agent {
            AgentId::Secondary => Some(self.load_ceilings.secondary),
            AgentId::Tertiary => Some(self.load_ceilings.tertiary),
            AgentId::Primary | AgentId::Emergency | AgentId::Coding(_) => None,
        }
    }

    /// Non-emergency cascade agents that would accept work for this session.
    pub fn available_candidates(&self, session: &SessionState) -> Vec<AgentId> {
        AgentId::CASCADE
            .into_iter()
            .filter(|agent| *agent != AgentId::Emergency)
            .filter(|agent| self.is_available(*agent, session))
            .collect()
    }
}

impl Default for ThresholdPolicy {
    fn default() -> Self {
        Self::new(&AvailabilityConfig::default())
    }
}

impl AvailabilityPolicy for ThresholdPolicy {
    fn is_available(&self, agent: AgentId, session: &SessionState) -> bool {
        match agent {
            AgentId::Primary => session.primary_usage_fraction <= self.primary_usage_ceiling,
            AgentId::Secondary | AgentId::Tertiary => self
                .load_ceiling(agent)
                .is_none_or(|ceiling| session.session_task_count <= ceiling),
            AgentId::Emergency | AgentId::Coding(_) => true,
        }
    }

    fn unavailable_reason(&self, agent: AgentId, session: &SessionState) -> String {
        match agent {
            AgentId::Primary => format!(
                "primary usage {:.1}% exceeded {:.0}% threshold",
                session.primary_usage_fraction * 100.0,
                self.primary_usage_ceiling * 100.0
            ),
            AgentId::Secondary | AgentId::Tertiary => format!(
                "{agent} agent over session load ceiling ({} tasks > {})",
                session.session_task_count,
                self.load_ceiling(agent).unwrap_or(0)
            ),
            AgentId::Emergency | AgentId::Coding(_) => format!("{agent} agent unavailable"),
        }
    }
}
