//! Grouping and grid layout derived from schema settings.

use serde::Serialize;

use crate::types::{DisplayMode, Field, Schema};

pub const MIN_COLUMNS: usize = 1;
pub const MAX_COLUMNS: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldSlot<'a> {
    pub field: &'a Field,
    pub full_width: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldGroup<'a> {
    /// Section id; `None` for the implicit group of a flat schema.
    pub id: Option<&'a str>,
    pub title: Option<&'a str>,
    pub description: Option<&'a str>,
    pub fields: Vec<FieldSlot<'a>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormLayout<'a> {
    pub display_mode: DisplayMode,
    pub columns: usize,
    pub groups: Vec<FieldGroup<'a>>,
}

impl<'a> FormLayout<'a> {
    pub fn from_schema(schema: &'a Schema) -> Self {
        let groups = if schema.uses_sections() {
            schema
                .sections
                .iter()
                .flatten()
                .map(|section| FieldGroup {
                    id: Some(section.id.as_str()),
                    title: Some(section.title.as_str()),
                    description: section.description.as_deref(),
                    fields: section.fields.iter().map(slot).collect(),
                })
                .collect()
        } else {
            vec![FieldGroup {
                id: None,
                title: None,
                description: None,
                fields: schema.fields.iter().flatten().map(slot).collect(),
            }]
        };

        Self {
            display_mode: schema.settings.section_display_mode.unwrap_or_default(),
            columns: grid_columns(schema.settings.fields_per_row),
            groups,
        }
    }

    /// Stepper over the groups; meaningful in stepper display mode.
    pub fn stepper(&self) -> Stepper {
        Stepper::new(self.groups.len())
    }
}

fn slot(field: &Field) -> FieldSlot<'_> {
    FieldSlot {
        field,
        full_width: field.field_type.behavior().full_width(),
    }
}

/// Grid columns for `fieldsPerRow`: default 1, clamped to [1, 3].
pub fn grid_columns(fields_per_row: Option<i64>) -> usize {
    match fields_per_row {
        None | Some(0) => MIN_COLUMNS,
        Some(n) => n.clamp(MIN_COLUMNS as i64, MAX_COLUMNS as i64) as usize,
    }
}

/// Active step within a stepper-mode form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Stepper {
    active: usize,
    steps: usize,
}

impl Stepper {
    pub fn new(steps: usize) -> Self {
        Self { active: 0, steps }
    }

    pub fn active(&self) -> usize {
        self.active
    }

    pub fn steps(&self) -> usize {
        self.steps
    }

    pub fn has_previous(&self) -> bool {
        self.active > 0
    }

    pub fn has_next(&self) -> bool {
        self.active + 1 < self.steps
    }

    pub fn go_next(&mut self) -> bool {
        if self.has_next() {
            self.active += 1;
            true
        } else {
            false
        }
    }

    pub fn go_previous(&mut self) -> bool {
        if self.has_previous() {
            self.active -= 1;
            true
        } else {
            false
        }
    }

    pub fn reset(&mut self) {
        self.active = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{FieldType, Section};

    #[test]
    fn columns_are_clamped() {
        assert_eq!(grid_columns(None), 1);
        assert_eq!(grid_columns(Some(0)), 1);
        assert_eq!(grid_columns(Some(-4)), 1);
        assert_eq!(grid_columns(Some(2)), 2);
        assert_eq!(grid_columns(Some(9)), 3);
    }

    #[test]
    fn flat_schema_is_one_group() {
        let schema = Schema::new("s", "S").with_fields(vec![
            Field::new(FieldType::Text, "a", "A"),
            Field::new(FieldType::Richtext, "b", "B"),
        ]);
        let layout = FormLayout::from_schema(&schema);
        assert_eq!(layout.display_mode, DisplayMode::Panel);
        assert_eq!(layout.groups.len(), 1);
        assert!(layout.groups[0].id.is_none());
        assert!(!layout.groups[0].fields[0].full_width);
        assert!(layout.groups[0].fields[1].full_width);
    }

    #[test]
    fn sections_become_groups() {
        let section = |id: &str| Section {
            id: id.into(),
            title: id.to_uppercase(),
            description: None,
            fields: vec![Field::new(FieldType::Text, id, id)],
        };
        let mut schema = Schema::new("s", "S").with_sections(vec![section("one"), section("two")]);
        schema.settings.section_display_mode = Some(DisplayMode::Stepper);
        schema.settings.fields_per_row = Some(2);

        let layout = FormLayout::from_schema(&schema);
        assert_eq!(layout.display_mode, DisplayMode::Stepper);
        assert_eq!(layout.columns, 2);
        assert_eq!(layout.groups[1].title, Some("TWO"));

        let mut stepper = layout.stepper();
        assert!(!stepper.go_previous());
        assert!(stepper.go_next());
        assert!(!stepper.go_next());
        assert_eq!(stepper.active(), 1);
        stepper.reset();
        assert_eq!(stepper.active(), 0);
    }
}
