//! Read-only rendering of a value map as display text.

use std::collections::HashMap;

use serde::Serialize;
use serde_json::Value;

use crate::normalize::is_blank;
use crate::reference::{ReferenceLoader, ReferenceSource};
use crate::services::DateFormatter;
use crate::types::{Field, FieldType, OptionItem, Schema, ValueMap};

/// Placeholder for values that are not set.
pub const EMPTY_DISPLAY: &str = "—";

/// Inputs a field needs beyond its own definition to render read-only.
pub struct ViewContext<'a> {
    pub formatter: &'a dyn DateFormatter,
    /// Options loaded for a reference field, used to resolve labels.
    pub options: Option<&'a [OptionItem]>,
}

impl<'a> ViewContext<'a> {
    pub fn new(formatter: &'a dyn DateFormatter) -> Self {
        Self {
            formatter,
            options: None,
        }
    }

    pub fn with_options(mut self, options: &'a [OptionItem]) -> Self {
        self.options = Some(options);
        self
    }
}

/// Display text for one field.
pub fn format_field_value(field: &Field, value: Option<&Value>, ctx: &ViewContext<'_>) -> String {
    match value {
        None => EMPTY_DISPLAY.to_string(),
        Some(v) if is_blank(v) => EMPTY_DISPLAY.to_string(),
        Some(v) => field.field_type.behavior().format_view(field, v, ctx),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewEntry {
    pub name: String,
    pub label: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub display: String,
    /// Display is sanitized HTML rather than plain text.
    pub html: bool,
    pub full_width: bool,
}

/// One entry per effective field, in render order. `reference_options`
/// maps field names to options already loaded for them.
pub fn render_view(
    schema: &Schema,
    values: &ValueMap,
    formatter: &dyn DateFormatter,
    reference_options: &HashMap<String, Vec<OptionItem>>,
) -> Vec<ViewEntry> {
    schema
        .effective_fields()
        .into_iter()
        .map(|field| {
            let mut ctx = ViewContext::new(formatter);
            if let Some(options) = reference_options.get(&field.name) {
                ctx = ctx.with_options(options);
            }
            ViewEntry {
                name: field.name.clone(),
                label: field.label.clone(),
                field_type: field.field_type,
                display: format_field_value(field, values.get(&field.name), &ctx),
                html: field.field_type == FieldType::Richtext,
                full_width: field.field_type.behavior().full_width(),
            }
        })
        .collect()
}

/// Options for every reference field of `schema`, read through the loader's
/// cache so a form shown read-only after editing needs no second fetch.
/// Fields with an incomplete reference configuration are left out.
pub async fn load_view_options(
    schema: &Schema,
    loader: &ReferenceLoader<'_>,
) -> HashMap<String, Vec<OptionItem>> {
    let mut options = HashMap::new();
    for field in schema.effective_fields() {
        if ReferenceSource::from_field(field).is_none() {
            continue;
        }
        let loaded = loader.load_for_field(field, false).await;
        options.insert(field.name.clone(), loaded);
    }
    options
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::DefaultDateFormatter;
    use crate::types::{DatePickerMode, OptionEntry};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn fmt(field: &Field, value: Value) -> String {
        format_field_value(field, Some(&value), &ViewContext::new(&DefaultDateFormatter))
    }

    fn colors() -> Field {
        let mut field = Field::new(FieldType::Select, "color", "Color");
        field.options = Some(vec![
            OptionEntry::Item(OptionItem::new("Red", "r")),
            OptionEntry::Plain("blue".into()),
        ]);
        field
    }

    #[test]
    fn blanks_show_dash() {
        let field = Field::new(FieldType::Text, "t", "T");
        assert_eq!(fmt(&field, Value::Null), "—");
        assert_eq!(fmt(&field, json!("")), "—");
        assert_eq!(
            format_field_value(&field, None, &ViewContext::new(&DefaultDateFormatter)),
            "—"
        );
    }

    #[test]
    fn flags_show_yes_no() {
        let field = Field::new(FieldType::Toggle, "t", "T");
        assert_eq!(fmt(&field, json!(true)), "Yes");
        assert_eq!(fmt(&field, json!(false)), "No");
    }

    #[test]
    fn select_labels() {
        assert_eq!(fmt(&colors(), json!("r")), "Red");
        assert_eq!(fmt(&colors(), json!(["blue", "r"])), "blue");
        assert_eq!(fmt(&colors(), json!("green")), "green");

        let multi = colors().multiple();
        assert_eq!(fmt(&multi, json!(["r", "blue", "x"])), "Red, blue, x");
        assert_eq!(fmt(&multi, json!([])), "—");
        assert_eq!(fmt(&multi, json!("r")), "Red");
    }

    #[test]
    fn loose_match_on_numbers() {
        let mut field = Field::new(FieldType::Select, "n", "N");
        field.options = Some(serde_json::from_value(json!([{"label": "One", "value": 1}])).unwrap());
        assert_eq!(fmt(&field, json!("1")), "One");
    }

    #[test]
    fn radio_matches_strictly() {
        let mut field = Field::new(FieldType::Radio, "n", "N");
        field.options = Some(serde_json::from_value(json!([{"label": "One", "value": 1}])).unwrap());
        assert_eq!(fmt(&field, json!(1)), "One");
        assert_eq!(fmt(&field, json!("1")), "1");
    }

    #[test]
    fn reference_labels_from_loaded_options() {
        let field = Field::new(FieldType::FormReference, "owner", "Owner");
        let loaded = vec![OptionItem::new("Alice", "u1")];
        let ctx = ViewContext::new(&DefaultDateFormatter).with_options(&loaded);
        assert_eq!(format_field_value(&field, Some(&json!("u1")), &ctx), "Alice");
    }

    #[test]
    fn files_and_dates() {
        let files = Field::new(FieldType::File, "f", "F").multiple();
        assert_eq!(fmt(&files, json!([{"fileUrl": "/a"}, {"fileUrl": "/b"}])), "2 file(s)");
        assert_eq!(fmt(&Field::new(FieldType::File, "f", "F"), json!({"fileUrl": "/a"})), "1 file");

        let mut date = Field::new(FieldType::Datepicker, "d", "D");
        date.date_picker_mode = Some(DatePickerMode::Date);
        assert_eq!(fmt(&date, json!("2024-12-31")), "31/12/2024");
    }

    #[test]
    fn rich_text_is_sanitized() {
        let field = Field::new(FieldType::Richtext, "body", "Body");
        assert_eq!(
            fmt(&field, json!("<p onclick=\"x()\">Hi<script>alert(1)</script></p>")),
            "<p>Hi</p>"
        );
    }

    #[test]
    fn renders_every_field() {
        let schema = Schema::new("s", "S").with_fields(vec![
            Field::new(FieldType::Text, "name", "Name"),
            Field::new(FieldType::Richtext, "bio", "Bio"),
        ]);
        let values = json!({"name": "Ada"}).as_object().cloned().unwrap();
        let entries = render_view(&schema, &values, &DefaultDateFormatter, &HashMap::new());
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].display, "Ada");
        assert_eq!(entries[1].display, "—");
        assert!(entries[1].html && entries[1].full_width);
    }
}
