//! Rule: section-size
//!
//! Warns when a section (or a flat form) has too many fields
//! (default threshold: 12).

use formkit_core::types::Schema;

use crate::{LintDiagnostic, LintRule, LintSeverity};

const DEFAULT_MAX_FIELDS: usize = 12;

pub struct SectionSizeRule {
    pub max_fields: usize,
}

impl Default for SectionSizeRule {
    fn default() -> Self {
        Self {
            max_fields: DEFAULT_MAX_FIELDS,
        }
    }
}

impl LintRule for SectionSizeRule {
    fn id(&self) -> &str {
        "section-size"
    }

    fn description(&self) -> &str {
        "Sections should not have too many fields"
    }

    fn default_severity(&self) -> LintSeverity {
        LintSeverity::Warning
    }

    fn check(&self, schema: &Schema) -> Vec<LintDiagnostic> {
        let mut diagnostics = Vec::new();

        if schema.uses_sections() {
            for (i, section) in schema.sections.iter().flatten().enumerate() {
                if section.fields.len() > self.max_fields {
                    diagnostics.push(self.diagnostic(
                        schema,
                        format!("sections[{i}]"),
                        format!(
                            "Section \"{}\" has {} fields (max {}). Consider splitting it",
                            section.title,
                            section.fields.len(),
                            self.max_fields
                        ),
                    ));
                }
            }
        } else {
            let count = schema.fields.as_ref().map_or(0, Vec::len);
            if count > self.max_fields {
                diagnostics.push(self.diagnostic(
                    schema,
                    "fields".into(),
                    format!(
                        "Form \"{}\" has {count} fields (max {}). Consider grouping them into sections",
                        schema.name, self.max_fields
                    ),
                ));
            }
        }

        diagnostics
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use formkit_core::{Field, FieldType, Section};

    fn fields(count: usize) -> Vec<Field> {
        (0..count)
            .map(|i| Field::new(FieldType::Text, format!("field{i}"), format!("Field {i}")))
            .collect()
    }

    #[test]
    fn detects_large_section() {
        let schema = Schema::new("s", "S").with_sections(vec![
            Section {
                id: "small".into(),
                title: "Small".into(),
                description: None,
                fields: fields(2),
            },
            Section {
                id: "big".into(),
                title: "Big".into(),
                description: None,
                fields: fields(15),
            },
        ]);
        let results = SectionSizeRule::default().check(&schema);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].path, "sections[1]");
        assert!(results[0].message.contains("15 fields"));
    }

    #[test]
    fn no_warning_for_small_form() {
        let schema = Schema::new("s", "S").with_fields(fields(12));
        assert!(SectionSizeRule::default().check(&schema).is_empty());
    }

    #[test]
    fn custom_threshold() {
        let schema = Schema::new("s", "S").with_fields(fields(5));
        let results = SectionSizeRule { max_fields: 3 }.check(&schema);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].path, "fields");
    }
}
