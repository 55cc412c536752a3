//! Configuration for availability thresholds, classification rules and input limits.

use crate::error::{CascadeError, Result};
use crate::task::{CodingFocus, TaskCategory};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Complete cascade configuration.
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CascadeConfig {
    /// Availability thresholds for cascade agents
    pub availability: AvailabilityConfig,
    /// Classifier rule table
    pub classifier: ClassifierConfig,
    /// Coding-specialist selection
    pub coding: CodingConfig,
    /// Input validation limits
    pub limits: LimitsConfig,
}

/// Availability thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AvailabilityConfig {
    /// Primary agent is over budget once usage is strictly above this fraction
    pub primary_usage_ceiling: f64,
    /// Session load ceilings for the reasoning fallbacks
    pub load_ceilings: LoadCeilings,
}

impl Default for AvailabilityConfig {
    fn default() -> Self {
        Self {
            primary_usage_ceiling: 0.90,
            load_ceilings: LoadCeilings::default(),
        }
    }
}

/// Highest session task count at which each fallback agent still accepts work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadCeilings {
    /// Secondary agent ceiling
    pub secondary: u64,
    /// Tertiary agent ceiling
    pub tertiary: u64,
}

impl Default for LoadCeilings {
    fn default() -> Self {
        Self {
            secondary: 10,
            tertiary: 20,
        }
    }
}

/// One row of the classifier rule table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifierRule {
    /// Category this rule votes for
    pub category: TaskCategory,
    /// Weight added once when any signal matches
    pub weight: f64,
    /// Words or phrases, matched case-insensitively on word boundaries
    pub signals: Vec<String>,
    /// Coding focus implied by a match
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub focus: Option<CodingFocus>,
}

impl ClassifierRule {
    /// Creates a rule from static signal strings.
    pub fn new(category: TaskCategory, weight: f64, signals: &[&str]) -> Self {
        Self {
            category,
            weight,
            signals: signals.iter().map(|signal| (*signal).to_owned()).collect(),
            focus: None,
        }
    }

    /// Marks the rule as implying a coding focus.
    #[must_use]
    pub fn with_focus(mut self, focus: CodingFocus) -> Self {
        self.focus = Some(focus);
        self
    }
}

/// Classifier configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Confidence reported when no signal matches
    pub fallback_confidence: f64,
    /// Ordered rule table
    pub rules: Vec<ClassifierRule>,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        use CodingFocus::{Debugging, Implementation, Refactoring, Testing};
        use TaskCategory::{Coding, ContextAnalysis, ManagementReasoning};

        Self {
            fallback_confidence: 0.1,
            rules: vec![
                ClassifierRule::new(
                    Coding,
                    0.6,
                    &[
                        "fix", "fixes", "fixed", "fixing", "bug", "bugs", "buggy", "debug", "debugging",
                        "debugged", "crash", "crashes", "crashed", "crashing", "stack trace", "traceback",
                        "segfault", "regression", "broken",
                    ],
                )
                .with_focus(Debugging),
                ClassifierRule::new(
                    Coding,
                    0.5,
                    &[
                        "implement", "implements", "implemented", "implementing", "implementation",
                        "write code", "writing code", "write a function", "add an endpoint", "add a feature",
                    ],
                )
                .with_focus(Implementation),
                ClassifierRule::new(
                    Coding,
                    0.5,
                    &[
                        "refactor", "refactors", "refactored", "refactoring", "rewrite the module",
                        "clean up the code", "rename", "renamed", "renaming",
                    ],
                )
                .with_focus(Refactoring),
                ClassifierRule::new(
                    Coding,
                    0.5,
                    &[
                        "unit test", "unit tests", "integration test", "integration tests", "write tests",
                        "writing tests", "test case", "test cases", "failing test", "failing tests",
                        "tests", "testing", "test coverage",
                    ],
                )
                .with_focus(Testing),
                ClassifierRule::new(
                    Coding,
                    0.3,
                    &[
                        "code", "function", "functions", "compile", "compiles", "compiling", "compiler",
                        "syntax error", "script", "scripts", "sql query", "api endpoint",
                    ],
                ),
                ClassifierRule::new(ManagementReasoning, 0.6, &["architecture", "design system", "system design"]),
                ClassifierRule::new(ManagementReasoning, 0.5, &["coordinate", "orchestrate", "delegate", "workflow"]),
                ClassifierRule::new(
                    ManagementReasoning,
                    0.5,
                    &["plan", "roadmap", "strategy", "prioritize", "milestone"],
                ),
                ClassifierRule::new(
                    ManagementReasoning,
                    0.5,
                    &["project requirements", "requirements", "stakeholder", "stakeholders"],
                ),
                ClassifierRule::new(ManagementReasoning, 0.3, &["team", "manage", "management", "decide", "decision"]),
                ClassifierRule::new(ContextAnalysis, 0.5, &["summarize", "summary", "tl;dr", "digest"]),
                ClassifierRule::new(
                    ContextAnalysis,
                    0.4,
                    &["context", "documentation", "document", "transcript", "logs", "log file", "codebase overview"],
                ),
                ClassifierRule::new(ContextAnalysis, 0.3, &["analyze", "analysis", "review", "investigate", "explain"]),
            ],
        }
    }
}

impl ClassifierConfig {
    /// Check the fallback confidence and every rule in the table.
    ///
    /// # Errors
    /// Returns `CascadeError::Config` describing the first problem found
    pub fn validate(&self) -> Result<()> {
        let fallback = self.fallback_confidence;
        if !(0.0..=1.0).contains(&fallback) {
            return Err(CascadeError::Config(format!(
                "fallback_confidence must be within [0, 1], got {fallback}"
            )));
        }

        for (index, rule) in self.rules.iter().enumerate() {
            if !rule.weight.is_finite() || rule.weight <= 0.0 {
                return Err(CascadeError::Config(format!(
                    "classifier rule {index} has non-positive weight {}",
                    rule.weight
                )));
            }
            if rule.signals.is_empty() || rule.signals.iter().any(|signal| signal.trim().is_empty()) {
                return Err(CascadeError::Config(format!(
                    "classifier rule {index} has an empty signal"
                )));
            }
            if rule.focus.is_some() && rule.category != TaskCategory::Coding {
                return Err(CascadeError::Config(format!(
                    "classifier rule {index} sets a coding focus on a {} rule",
                    rule.category
                )));
            }
        }

        Ok(())
    }
}

/// Coding-specialist selection thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodingConfig {
    /// Complexity at or above which unfocused coding work counts as heavy
    pub heavy_complexity: f64,
    /// Estimated size at or above which unfocused coding work counts as heavy
    pub heavy_size: i64,
}

impl Default for CodingConfig {
    fn default() -> Self {
        Self {
            heavy_complexity: 0.75,
            heavy_size: 4000,
        }
    }
}

/// Input validation limits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Largest accepted `estimated_size`
    pub max_estimated_size: i64,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_estimated_size: 10_000_000,
        }
    }
}

impl CascadeConfig {
    /// Get the default config directory path (`~/.cascade`)
    ///
    /// # Errors
    /// Returns an error if the home directory cannot be determined
    pub fn config_dir() -> Result<PathBuf> {
        use dirs::home_dir;
        let home = home_dir()
            .ok_or_else(|| CascadeError::Config("Could not determine home directory".to_owned()))?;
        Ok(home.join(".cascade"))
    }

    /// Get the default config file path (`~/.cascade/config.toml`)
    ///
    /// # Errors
    /// Returns an error if the home directory cannot be determined
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Load config from the default location, writing defaults there if it is missing.
    ///
    /// # Errors
    /// Returns an error if the config cannot be read, parsed, validated or created
    pub fn load_or_create() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            Self::load_from_file(&config_path)
        } else {
            let config = Self::default();
            config.save_to_file(&config_path)?;
            Ok(config)
        }
    }

    /// Load and validate config from a specific file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, parsed or fails validation
    pub fn load_from_file(path: &Path) -> Result<Self> {
        use toml::from_str;
        let contents = fs::read_to_string(path)?;
        let config: Self = from_str(&contents)?;
        config.validate()?;
        tracing::debug!(path = %path.display(), "Loaded cascade configuration");
        Ok(config)
    }

    /// Save config to a specific file, creating parent directories.
    ///
    /// # Errors
    /// Returns an error if the file cannot be written
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        use toml::to_string_pretty;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = to_string_pretty(self)?;

        let header = "# Cascade Router Configuration File\n\
                      # This file is automatically generated on first run\n\
                      # Edit this file to customize thresholds and classifier rules\n\n";

        fs::write(path, format!("{header}{contents}"))?;
        Ok(())
    }

    /// Check that every threshold and rule is usable.
    ///
    /// # Errors
    /// Returns `CascadeError::Config` describing the first problem found
    pub fn validate(&self) -> Result<()> {
        let ceiling = self.availability.primary_usage_ceiling;
        if !(0.0..=1.0).contains(&ceiling) {
            return Err(CascadeError::Config(format!(
                "primary_usage_ceiling must be within [0, 1], got {ceiling}"
            )));
        }

        self.classifier.validate()?;

        let heavy = self.coding.heavy_complexity;
        if !(0.0..=1.0).contains(&heavy) {
            return Err(CascadeError::Config(format!(
                "heavy_complexity must be within [0, 1], got {heavy}"
            )));
        }
        if self.coding.heavy_size <= 0 {
            return Err(CascadeError::Config(format!(
                "heavy_size must be positive, got {}",
                self.coding.heavy_size
            )));
        }
        if self.limits.max_estimated_size <= 0 {
            return Err(CascadeError::Config(format!(
                "max_estimated_size must be positive, got {}",
                self.limits.max_estimated_size
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use toml::from_str;

    #[test]
    fn test_default_config_is_valid() {
        let config = CascadeConfig::default();
        if let Err(error) = config.validate() {
            panic!("default config rejected: {error}");
        }
        assert!((config.availability.primary_usage_ceiling - 0.90).abs() < f64::EPSILON);
        assert_eq!(config.availability.load_ceilings.secondary, 10);
        assert_eq!(config.availability.load_ceilings.tertiary, 20);
    }

    #[test]
    fn test_default_rules_cover_every_category() {
        let config = CascadeConfig::default();
        for category in TaskCategory::PRECEDENCE {
            assert!(
                config.classifier.rules.iter().any(|rule| rule.category == category),
                "no rule for {category}"
            );
        }
    }

    #[test]
    fn test_rejects_out_of_range_ceiling() {
        let mut config = CascadeConfig::default();
        config.availability.primary_usage_ceiling = 1.2;
        let error = match config.validate() {
            Ok(()) => panic!("ceiling above 1 should be rejected"),
            Err(error) => error,
        };
        assert!(error.to_string().contains("primary_usage_ceiling"));
    }

    #[test]
    fn test_rejects_nan_ceiling() {
        let mut config = CascadeConfig::default();
        config.availability.primary_usage_ceiling = f64::NAN;
        config.validate().unwrap_err();
    }

    #[test]
    fn test_rejects_bad_rules() {
        let mut zero_weight = CascadeConfig::default();
        zero_weight.classifier.rules[0].weight = 0.0;
        zero_weight.validate().unwrap_err();

        let mut blank_signal = CascadeConfig::default();
        blank_signal.classifier.rules[0].signals.push("  ".to_owned());
        blank_signal.validate().unwrap_err();

        let mut misplaced_focus = CascadeConfig::default();
        misplaced_focus.classifier.rules.push(
            ClassifierRule::new(TaskCategory::ContextAnalysis, 0.2, &["skim"])
                .with_focus(CodingFocus::Testing),
        );
        misplaced_focus.validate().unwrap_err();
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let parsed: CascadeConfig = match from_str("[availability.load_ceilings]\nsecondary = 5\n") {
            Ok(config) => config,
            Err(error) => panic!("parse failed: {error}"),
        };
        assert_eq!(parsed.availability.load_ceilings.secondary, 5);
        assert_eq!(parsed.availability.load_ceilings.tertiary, 20);
        assert_eq!(parsed.classifier, ClassifierConfig::default());
    }

    #[test]
    fn test_save_then_load_round_trip() -> Result<()> {
        let temp = TempDir::new()?;
        let path = temp.path().join("nested").join("config.toml");

        let mut config = CascadeConfig::default();
        config.availability.load_ceilings.tertiary = 30;
        config.save_to_file(&path)?;

        let written = fs::read_to_string(&path)?;
        assert!(written.starts_with("# Cascade Router Configuration File"));

        let loaded = CascadeConfig::load_from_file(&path)?;
        assert_eq!(loaded, config);
        Ok(())
    }

    #[test]
    fn test_load_rejects_invalid_file() -> Result<()> {
        let temp = TempDir::new()?;
        let path = temp.path().join("config.toml");
        fs::write(&path, "[availability]\nprimary_usage_ceiling = 4.0\n")?;

        let error = match CascadeConfig::load_from_file(&path) {
            Ok(_) => panic!("invalid ceiling should fail to load"),
            Err(error) => error,
        };
        assert!(matches!(error, CascadeError::Config(_)));
        Ok(())
    }
}
