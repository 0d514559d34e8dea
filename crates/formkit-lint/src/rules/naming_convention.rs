//! Rule: naming-convention
//!
//! Checks that field names are identifiers in camelCase or snake_case,
//! since they double as value-map keys and submit payload keys.

use formkit_core::types::Schema;

use crate::{LintDiagnostic, LintRule, LintSeverity};

pub struct NamingConventionRule;

impl LintRule for NamingConventionRule {
    fn id(&self) -> &str {
        "naming-convention"
    }

    fn description(&self) -> &str {
        "Field names should be camelCase or snake_case identifiers"
    }

    fn default_severity(&self) -> LintSeverity {
        LintSeverity::Warning
    }

    fn check(&self, schema: &Schema) -> Vec<LintDiagnostic> {
        let mut diagnostics = Vec::new();

        for (path, field) in schema.located_fields() {
            // Empty names are a validator error, not a style issue
            if field.name.is_empty() {
                continue;
            }
            if !is_camel_case(&field.name) && !is_snake_case(&field.name) {
                diagnostics.push(self.diagnostic(
                    schema,
                    path,
                    format!(
                        "Field name \"{}\" should be camelCase or snake_case",
                        field.name
                    ),
                ));
            }
        }

        diagnostics
    }
}

/// Starts lowercase, letters and digits only.
fn is_camel_case(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_lowercase() => chars.all(|c| c.is_ascii_alphanumeric()),
        _ => false,
    }
}

/// Starts lowercase, lowercase letters, digits and underscores only.
fn is_snake_case(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_lowercase() => chars
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_'),
        _ => false,
    }
}
