//! Rule: label-quality
//!
//! Flags empty labels and labels with leading or trailing whitespace on
//! fields, options and section titles.

use formkit_core::rules::normalize_options;
use formkit_core::types::Schema;

use crate::{LintDiagnostic, LintRule, LintSeverity};

pub struct LabelQualityRule;

impl LintRule for LabelQualityRule {
    fn id(&self) -> &str {
        "label-quality"
    }

    fn description(&self) -> &str {
        "Labels should be non-empty and trimmed"
    }

    fn default_severity(&self) -> LintSeverity {
        LintSeverity::Warning
    }

    fn check(&self, schema: &Schema) -> Vec<LintDiagnostic> {
        let mut diagnostics = Vec::new();

        if schema.uses_sections() {
            for (i, section) in schema.sections.iter().flatten().enumerate() {
                if let Some(problem) = label_problem(&section.title) {
                    diagnostics.push(self.diagnostic(
                        schema,
                        format!("sections[{i}].title"),
                        format!("Section \"{}\" title {problem}", section.id),
                    ));
                }
            }
        }

        for (path, field) in schema.located_fields() {
            if let Some(problem) = label_problem(&field.label) {
                diagnostics.push(self.diagnostic(
                    schema,
                    format!("{path}.label"),
                    format!("Field \"{}\" label {problem}", field.name),
                ));
            }

            let options = normalize_options(field.options.as_deref());
            for (i, option) in options.iter().enumerate() {
                if let Some(problem) = label_problem(&option.label) {
                    diagnostics.push(self.diagnostic(
                        schema,
                        format!("{path}.options[{i}].label"),
                        format!(
                            "Option \"{}\" of field \"{}\" label {problem}",
                            option.value, field.name
                        ),
                    ));
                }
            }
        }

        diagnostics
    }
}

fn label_problem(label: &str) -> Option<&'static str> {
    if label.trim().is_empty() {
        Some("is empty")
    } else if label.trim() != label {
        Some("has leading or trailing whitespace")
    } else {
        None
    }
}
