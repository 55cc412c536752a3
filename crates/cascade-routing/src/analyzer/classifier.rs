use cascade_core::{
    Classification, ClassifierConfig, ClassifierRule, CodingFocus, Result, TaskCategory,
};
use regex::{Regex, escape};

/// A rule from the table with its signals compiled into one matcher.
#[derive(Debug, Clone)]
struct CompiledRule {
    category: TaskCategory,
    weight: f64,
    focus: Option<CodingFocus>,
    matcher: Regex,
}

impl CompiledRule {
    fn compile(rule: &ClassifierRule) -> Result<Self> {
        let alternatives: Vec<String> = rule
            .signals
            .iter()
            .map(|signal| {
                signal
                    .split_whitespace()
                    .map(escape)
                    .collect::<Vec<_>>()
                    .join(r"\s+")
            })
            .collect();
        let matcher = Regex::new(&format!(r"(?i)\b(?:{})\b", alternatives.join("|")))?;

        Ok(Self {
            category: rule.category,
            weight: rule.weight,
            focus: rule.focus,
            matcher,
        })
    }
}

/// Summed rule weights per category for one description.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CategoryScores {
    /// Coding score
    pub coding: f64,
    /// Management/reasoning score
    pub management_reasoning: f64,
    /// Context analysis score
    pub context_analysis: f64,
}

impl CategoryScores {
    /// Score for a single category.
    #[must_use]
    pub const fn get(&self, category: TaskCategory) -> f64 {
        match category {
            TaskCategory::Coding => self.coding,
            TaskCategory::ManagementReasoning => self.management_reasoning,
            TaskCategory::ContextAnalysis => self.context_analysis,
        }
    }

    fn add(&mut self, category: TaskCategory, weight: f64) {
        match category {
            TaskCategory::Coding => self.coding += weight,
            TaskCategory::ManagementReasoning => self.management_reasoning += weight,
            TaskCategory::ContextAnalysis => self.context_analysis += weight,
        }
    }

    /// Highest-scoring category, earlier precedence winning ties, with its score.
    #[must_use]
    pub fn winner(&self) -> (TaskCategory, f64) {
        let mut best = (TaskCategory::Coding, self.coding);
        for category in TaskCategory::PRECEDENCE {
            let score = self.get(category);
            if score > best.1 {
                best = (category, score);
            }
        }
        best
    }

    /// Highest score among the categories other than `winner`.
    #[must_use]
    pub fn runner_up(&self, winner: TaskCategory) -> f64 {
        TaskCategory::PRECEDENCE
            .into_iter()
            .filter(|category| *category != winner)
            .map(|category| self.get(category))
            .fold(0.0, f64::max)
    }
}

/// Deterministic keyword classifier driven by a weighted rule table.
///
/// Each rule adds its weight once when any of its signals appears as a whole word or
/// phrase. The highest total wins; equal totals fall back to category precedence
/// (coding, then management reasoning, then context analysis). Conflicting signals
/// shrink confidence by the winner's share of the two leading scores.
#[derive(Debug, Clone)]
pub struct TaskClassifier {
    rules: Vec<CompiledRule>,
    fallback_confidence: f64,
}

impl TaskClassifier {
    /// Compiles a classifier from configuration.
    ///
    /// # Errors
    /// Returns an error if the rule table fails validation or a signal cannot be
    /// compiled into a matcher.
    pub fn new(config: &ClassifierConfig) -> Result<Self> {
        config.validate()?;
        let rules = config
            .rules
            .iter()
            .map(CompiledRule::compile)
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            rules,
            fallback_confidence: config.fallback_confidence,
        })
    }

    /// Classifier with the built-in rule table.
    ///
    /// # Errors
    /// Returns an error if a built-in signal fails to compile.
    pub fn with_defaults() -> Result<Self> {
        Self::new(&ClassifierConfig::default())
    }

    /// Number of rules in the table.
    #[must_use]
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Per-category rule weight totals for a description.
    #[must_use]
    pub fn scores(&self, description: &str) -> CategoryScores {
        let mut scores = CategoryScores::default();
        for rule in self.rules.iter().filter(|rule| rule.matcher.is_match(description)) {
            scores.add(rule.category, rule.weight);
        }
        scores
    }

    /// Classifies a task description. Never fails.
    ///
    /// Descriptions with no signal at all default to management reasoning at the
    /// configured fallback confidence.
    pub fn classify(&self, description: &str) -> Classification {
        let scores = self.scores(description);
        let (category, winning) = scores.winner();

        if winning <= 0.0 {
            tracing::debug!(
                confidence = self.fallback_confidence,
                "No classifier signal matched, defaulting to management reasoning"
            );
            return Classification::new(TaskCategory::ManagementReasoning, self.fallback_confidence);
        }

        let runner_up = scores.runner_up(category);
        let confidence = winning.min(1.0) * (winning / (winning + runner_up));
        let focus = self.strongest_focus(description);

        tracing::debug!(
            %category,
            confidence,
            coding = scores.coding,
            management_reasoning = scores.management_reasoning,
            context_analysis = scores.context_analysis,
            "Classified task"
        );

        Classification::new(category, confidence).with_focus(focus)
    }

    /// Focus of the heaviest matching coding rule; table order breaks ties.
    fn strongest_focus(&self, description: &str) -> Option<CodingFocus> {
        let mut best: Option<(f64, CodingFocus)> = None;
        for rule in &self.rules {
            let Some(focus) = rule.focus else {
                continue;
            };
            if rule.category != TaskCategory::Coding || !rule.matcher.is_match(description) {
                continue;
            }
            if best.is_none_or(|(weight, _)| rule.weight > weight) {
                best = Some((rule.weight, focus));
            }
        }
        best.map(|(_, focus)| focus)
    }
}
