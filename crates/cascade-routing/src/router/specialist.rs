use cascade_core::{Classification, CodingConfig, CodingSpecialist};

/// Picks a coding specialist from the classification and the caller's size hints.
///
/// The classifier's focus decides when present. Unfocused work goes to the
/// generalist unless it is heavy, in which case it goes to the implementer.
#[derive(Debug, Clone, PartialEq)]
pub struct SpecialistSelector {
    heavy_complexity: f64,
    heavy_size: i64,
}

impl SpecialistSelector {
    /// Creates a selector from the coding section of the config.
    #[must_use]
    pub fn new(config: &CodingConfig) -> Self {
        Self {
            heavy_complexity: config.heavy_complexity,
            heavy_size: config.heavy_size,
        }
    }

    /// Whether the size hints mark the task as heavy.
    #[must_use]
    pub fn is_heavy(&self, complexity_score: f64, estimated_size: i64) -> bool {
        complexity_score >= self.heavy_complexity || estimated_size >= self.heavy_size
    }

    /// Chosen specialist and a short explanation of why.
    #[must_use]
    pub fn select(
        &self,
        classification: &Classification,
        complexity_score: f64,
        estimated_size: i64,
    ) -> (CodingSpecialist, String) {
        if let Some(focus) = classification.focus {
            return (focus.specialist(), format!("{focus} signals"));
        }

        if self.is_heavy(complexity_score, estimated_size) {
            (
                CodingSpecialist::Implementer,
                format!(
                    "no specific focus, heavy task (complexity {complexity_score:.2}, size {estimated_size})"
                ),
            )
        } else {
            (CodingSpecialist::Generalist, "no specific focus".to_owned())
        }
    }
}

impl Default for SpecialistSelector {
    fn default() -> Self {
        Self::new(&CodingConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cascade_core::{CodingFocus, TaskCategory};

    fn coding(focus: Option<CodingFocus>) -> Classification {
        Classification::new(TaskCategory::Coding, 0.6).with_focus(focus)
    }

    #[test]
    fn test_focus_decides_specialist() {
        let selector = SpecialistSelector::default();
        let (specialist, why) = selector.select(&coding(Some(CodingFocus::Testing)), 0.9, 9000);
        assert_eq!(specialist, CodingSpecialist::Tester);
        assert_eq!(why, "testing signals");
    }

    #[test]
    fn test_unfocused_light_work_goes_to_generalist() {
        let selector = SpecialistSelector::default();
        let (specialist, _) = selector.select(&coding(None), 0.2, 100);
        assert_eq!(specialist, CodingSpecialist::Generalist);
    }

    #[test]
    fn test_unfocused_heavy_work_goes_to_implementer() {
        let selector = SpecialistSelector::default();
        assert_eq!(selector.select(&coding(None), 0.75, 0).0, CodingSpecialist::Implementer);
        assert_eq!(selector.select(&coding(None), 0.0, 4000).0, CodingSpecialist::Implementer);
        assert_eq!(selector.select(&coding(None), 0.74, 3999).0, CodingSpecialist::Generalist);
    }

    #[test]
    fn test_heavy_reason_mentions_hints() {
        let selector = SpecialistSelector::default();
        let (_, why) = selector.select(&coding(None), 0.8, 5000);
        assert_eq!(why, "no specific focus, heavy task (complexity 0.80, size 5000)");
    }
}
