//! Rule: duplicate-options
//!
//! Detects option lists that repeat a value. The stored value then maps to
//! more than one label and the read-only view shows the first one.

use std::collections::HashSet;

use formkit_core::rules::normalize_options;
use formkit_core::types::Schema;

use crate::{LintDiagnostic, LintRule, LintSeverity};

pub struct DuplicateOptionsRule;

impl LintRule for DuplicateOptionsRule {
    fn id(&self) -> &str {
        "duplicate-options"
    }

    fn description(&self) -> &str {
        "Option values should be unique within a field"
    }

    fn default_severity(&self) -> LintSeverity {
        LintSeverity::Warning
    }

    fn check(&self, schema: &Schema) -> Vec<LintDiagnostic> {
        let mut diagnostics = Vec::new();

        for (path, field) in schema.located_fields() {
            let options = normalize_options(field.options.as_deref());
            let mut seen: HashSet<String> = HashSet::new();
            for (i, option) in options.iter().enumerate() {
                // Values compare by text, as the select widgets do
                let value = option.value.to_string();
                if !seen.insert(value.clone()) {
                    diagnostics.push(self.diagnostic(
                        schema,
                        format!("{path}.options[{i}]"),
                        format!(
                            "Option value \"{value}\" is repeated in field \"{}\"",
                            field.name
                        ),
                    ));
                }
            }
        }

        diagnostics
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use formkit_core::{Field, FieldType};
    use serde_json::json;

    fn select(options: serde_json::Value) -> Schema {
        let mut field = Field::new(FieldType::Select, "size", "Size");
        field.options = Some(serde_json::from_value(options).unwrap());
        Schema::new("s", "S").with_fields(vec![field])
    }

    #[test]
    fn detects_repeated_value() {
        let schema = select(json!([
            {"label": "Small", "value": "s"},
            {"label": "Medium", "value": "m"},
            {"label": "Smaller", "value": "s"}
        ]));
        let results = DuplicateOptionsRule.check(&schema);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].path, "fields[0].options[2]");
    }

    #[test]
    fn number_and_text_collide() {
        let schema = select(json!([{"label": "One", "value": 1}, "1"]));
        assert_eq!(DuplicateOptionsRule.check(&schema).len(), 1);
    }

    #[test]
    fn unique_values_pass() {
        let schema = select(json!(["s", "m", "l"]));
        assert!(DuplicateOptionsRule.check(&schema).is_empty());
    }
}
