//! Form schema linter: configurable rules for schema quality.
//!
//! Provides a trait-based rule framework for analyzing form schemas
//! and reporting lint diagnostics. Structural errors belong to
//! `formkit_core::validate_schema`; lint rules cover style and usability.

mod rules;

use formkit_core::types::Schema;
pub use rules::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ---------------------------------------------------------------------------
// Lint severity (separate from validator diagnostics)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LintSeverity {
    Error,
    Warning,
    Info,
}

// ---------------------------------------------------------------------------
// Lint diagnostic
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LintDiagnostic {
    pub rule: String,
    pub severity: LintSeverity,
    /// Name of the schema the finding belongs to.
    pub schema: String,
    /// Location inside the schema, e.g. `sections[1].fields[0]`.
    pub path: String,
    pub message: String,
}

// ---------------------------------------------------------------------------
// Lint rule trait
// ---------------------------------------------------------------------------

/// Trait that all lint rules must implement.
pub trait LintRule: Send + Sync {
    /// Unique rule identifier (e.g., "naming-convention").
    fn id(&self) -> &str;

    /// Human-readable description.
    fn description(&self) -> &str;

    /// Default severity.
    fn default_severity(&self) -> LintSeverity;

    /// Run the rule against a schema and return diagnostics.
    fn check(&self, schema: &Schema) -> Vec<LintDiagnostic>;

    /// Diagnostic for this rule at `path`.
    fn diagnostic(&self, schema: &Schema, path: String, message: String) -> LintDiagnostic {
        LintDiagnostic {
            rule: self.id().into(),
            severity: self.default_severity(),
            schema: schema.name.clone(),
            path,
            message,
        }
    }
}

// ---------------------------------------------------------------------------
// Lint configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleLevel {
    Off,
    #[default]
    Warn,
    Error,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LintConfig {
    #[serde(default)]
    pub rules: HashMap<String, RuleLevel>,
}

impl LintConfig {
    /// Check if a rule is enabled (not off).
    pub fn is_enabled(&self, rule_id: &str) -> bool {
        !matches!(self.rules.get(rule_id), Some(RuleLevel::Off))
    }

    /// Get the configured severity for a rule, or its default.
    pub fn severity_for(&self, rule: &dyn LintRule) -> LintSeverity {
        match self.rules.get(rule.id()) {
            Some(RuleLevel::Error) => LintSeverity::Error,
            Some(RuleLevel::Warn) => LintSeverity::Warning,
            Some(RuleLevel::Off) => LintSeverity::Warning,
            None => rule.default_severity(),
        }
    }
}

// ---------------------------------------------------------------------------
// Linter engine
// ---------------------------------------------------------------------------

pub struct Linter {
    rules: Vec<Box<dyn LintRule>>,
    config: LintConfig,
}

impl Linter {
    /// Create a new linter with all built-in rules.
    pub fn new(config: LintConfig) -> Self {
        Self {
            rules: builtin_rules(),
            config,
        }
    }

    /// Get a reference to the registered rules.
    pub fn rules(&self) -> &[Box<dyn LintRule>] {
        &self.rules
    }

    /// Run all enabled rules against the schema.
    pub fn lint(&self, schema: &Schema) -> Vec<LintDiagnostic> {
        let mut diagnostics = Vec::new();

        for rule in &self.rules {
            if self.config.is_enabled(rule.id()) {
                let severity = self.config.severity_for(rule.as_ref());
                let mut results = rule.check(schema);
                for d in &mut results {
                    d.severity = severity.clone();
                }
                diagnostics.extend(results);
            }
        }

        diagnostics
    }
}

impl Default for Linter {
    fn default() -> Self {
        Self::new(LintConfig::default())
    }
}

/// Return all built-in lint rules.
fn builtin_rules() -> Vec<Box<dyn LintRule>> {
    vec![
        Box::new(NamingConventionRule),
        Box::new(SectionSizeRule::default()),
        Box::new(DuplicateOptionsRule),
        Box::new(LabelQualityRule),
    ]
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
