use super::availability::{AvailabilityPolicy, ThresholdPolicy};
use super::specialist::SpecialistSelector;
use super::{RoutingDecision, TaskRouter};
use crate::analyzer::TaskClassifier;
use crate::metrics::{RouterStats, StatsReporter, UsageTracker};
use cascade_core::{
    AgentId, CascadeConfig, CascadeError, Classification, LimitsConfig, Result, SessionState, Task,
};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Routes tasks to coding specialists or down the primary → emergency cascade.
///
/// Safe to share across threads. Session state lives in the injected
/// `UsageTracker`; the router itself holds only immutable configuration and the
/// activity flag.
pub struct CascadeRouter {
    classifier: TaskClassifier,
    tracker: Arc<UsageTracker>,
    policy: Arc<dyn AvailabilityPolicy>,
    specialists: SpecialistSelector,
    limits: LimitsConfig,
    active: Arc<AtomicBool>,
}

impl CascadeRouter {
    /// Creates an active router over an existing session tracker.
    ///
    /// # Errors
    /// Returns an error if the configuration fails validation or a classifier
    /// signal cannot be compiled.
    pub fn new(config: &CascadeConfig, tracker: Arc<UsageTracker>) -> Result<Self> {
        config.validate()?;
        let classifier = TaskClassifier::new(&config.classifier)?;

        tracing::debug!(
            rules = classifier.rule_count(),
            primary_usage_ceiling = config.availability.primary_usage_ceiling,
            secondary_ceiling = config.availability.load_ceilings.secondary,
            tertiary_ceiling = config.availability.load_ceilings.tertiary,
            "Cascade router initialized"
        );

        Ok(Self {
            classifier,
            tracker,
            policy: Arc::new(ThresholdPolicy::new(&config.availability)),
            specialists: SpecialistSelector::new(&config.coding),
            limits: config.limits.clone(),
            active: Arc::new(AtomicBool::new(true)),
        })
    }

    /// Creates a router with default configuration and a fresh session.
    ///
    /// # Errors
    /// Returns an error if the built-in classifier rules fail to compile.
    pub fn with_defaults() -> Result<Self> {
        Self::new(&CascadeConfig::default(), Arc::new(UsageTracker::new()))
    }

    /// Replaces the availability policy.
    #[must_use]
    pub fn with_policy(mut self, policy: Arc<dyn AvailabilityPolicy>) -> Self {
        self.policy = policy;
        self
    }

    /// Routes one task described by its text and size hints.
    ///
    /// Coding work goes straight to a specialist. Everything else walks the
    /// cascade and takes the first available agent.
    ///
    /// # Errors
    /// - `RouterInactive` after `shutdown`
    /// - `InvalidInput` for a non-finite or negative complexity, or a negative or
    ///   oversized estimated size; the task is not recorded
    /// - `NoCandidateAvailable` if the policy refused the emergency agent
    pub fn route_task(
        &self,
        description: &str,
        complexity_score: f64,
        estimated_size: i64,
    ) -> Result<RoutingDecision> {
        if !self.is_active() {
            return Err(CascadeError::RouterInactive);
        }
        let complexity_score = self.validate(complexity_score, estimated_size)?;

        let classification = self.classifier.classify(description);
        let session = self.tracker.record_task_and_snapshot();

        let decision = if classification.category.uses_cascade() {
            self.walk_cascade(classification, &session)?
        } else {
            self.route_to_specialist(classification, complexity_score, estimated_size)
        };

        self.tracker.record_invocation(decision.selected_agent);

        tracing::info!(
            "🎯 Routing decision: {} | Category: {} | Confidence: {:.2} | Fallbacks: {} | Load: {} tasks, {:.0}% primary usage",
            decision.selected_agent,
            decision.classification.category,
            decision.classification.confidence,
            decision.fallback_chain.len(),
            session.session_task_count,
            session.primary_usage_fraction * 100.0
        );

        Ok(decision)
    }

    /// Classifies without routing or recording anything.
    pub fn classify(&self, description: &str) -> Classification {
        self.classifier.classify(description)
    }

    /// Feeds a measured primary usage fraction into the session.
    pub fn set_primary_usage(&self, fraction: f64) {
        self.tracker.set_primary_usage(fraction);
    }

    /// Session tracker shared with this router.
    #[must_use]
    pub fn tracker(&self) -> &Arc<UsageTracker> {
        &self.tracker
    }

    /// Reporter sharing this router's tracker and activity flag.
    #[must_use]
    pub fn stats_reporter(&self) -> StatsReporter {
        StatsReporter::new(Arc::clone(&self.tracker), Arc::clone(&self.active))
    }

    /// Current stats.
    pub fn get_stats(&self) -> RouterStats {
        self.stats_reporter().get_stats()
    }

    /// Whether the router is accepting tasks.
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    /// Stops accepting tasks. Stats remain readable.
    pub fn shutdown(&self) {
        if self.active.swap(false, Ordering::AcqRel) {
            tracing::info!("Cascade router shut down");
        }
    }

    /// Rejects nonsense magnitudes and clamps complexity into [0, 1].
    fn validate(&self, complexity_score: f64, estimated_size: i64) -> Result<f64> {
        if !complexity_score.is_finite() {
            return Err(rejected(format!(
                "complexity_score must be finite, got {complexity_score}"
            )));
        }
        if complexity_score < 0.0 {
            return Err(rejected(format!(
                "complexity_score must not be negative, got {complexity_score}"
            )));
        }
        if estimated_size < 0 {
            return Err(rejected(format!(
                "estimated_size must not be negative, got {estimated_size}"
            )));
        }
        if estimated_size > self.limits.max_estimated_size {
            return Err(rejected(format!(
                "estimated_size {estimated_size} exceeds limit {}",
                self.limits.max_estimated_size
            )));
        }
        Ok(complexity_score.min(1.0))
    }

    fn route_to_specialist(
        &self,
        classification: Classification,
        complexity_score: f64,
        estimated_size: i64,
    ) -> RoutingDecision {
        let (specialist, why) =
            self.specialists
                .select(&classification, complexity_score, estimated_size);
        let selected_agent = AgentId::Coding(specialist);

        RoutingDecision {
            selected_agent,
            reason: format!(
                "Coding task routed to {selected_agent} specialist ({why}); coding tasks bypass the fallback cascade"
            ),
            fallback_chain: Vec::new(),
            classification,
        }
    }

    fn walk_cascade(
        &self,
        classification: Classification,
        session: &SessionState,
    ) -> Result<RoutingDecision> {
        let mut fallback_chain = Vec::new();
        let mut conditions = Vec::new();

        for agent in AgentId::CASCADE {
            if self.policy.is_available(agent, session) {
                let reason = if conditions.is_empty() {
                    format!(
                        "{} task accepted by {agent} agent (primary usage {:.1}%, session load {} tasks)",
                        classification.category,
                        session.primary_usage_fraction * 100.0,
                        session.session_task_count
                    )
                } else {
                    format!("Fell back to {agent} agent: {}", conditions.join("; "))
                };

                return Ok(RoutingDecision {
                    selected_agent: agent,
                    reason,
                    fallback_chain,
                    classification,
                });
            }

            let condition = self.policy.unavailable_reason(agent, session);
            tracing::debug!(%agent, %condition, "Skipping cascade candidate");
            conditions.push(condition);
            fallback_chain.push(agent);
        }

        tracing::error!(
            category = %classification.category,
            skipped = ?fallback_chain,
            "Availability policy refused every candidate including the emergency agent"
        );
        Err(CascadeError::NoCandidateAvailable {
            category: classification.category,
        })
    }
}

fn rejected(message: String) -> CascadeError {
    tracing::warn!("Rejected task: {message}");
    CascadeError::InvalidInput(message)
}

impl TaskRouter for CascadeRouter {
    fn route(&self, task: &Task) -> Result<RoutingDecision> {
        let span = tracing::debug_span!(
            "route",
            correlation_id = task.correlation_id.as_deref().unwrap_or("-")
        );
        let _entered = span.enter();
        self.route_task(&task.description, task.complexity_score, task.estimated_size)
    }
}
