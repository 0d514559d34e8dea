//! Per-field-type behaviour table.
//!
//! Every concern that branches on the field type (defaults, shape repair,
//! submit coercion, validators, read-only formatting) goes through one
//! `FieldBehavior` implementation per value class. `FieldType::behavior`
//! is the single exhaustive mapping.

use serde_json::Value;

use crate::normalize::{coerce_number, collapse_to_single, is_truthy, value_to_text};
use crate::rules::{normalize_options, Validator};
use crate::sanitize::sanitize_html;
use crate::types::{Field, FieldType, FileValue, OptionItem};
use crate::view::{ViewContext, EMPTY_DISPLAY};

pub trait FieldBehavior: Send + Sync {
    /// Zero value bound when the form has no value for the field.
    fn default_value(&self, field: &Field) -> Value;

    /// Repair a present value's shape to match the field's multiplicity.
    fn normalize(&self, _field: &Field, value: Value) -> Value {
        value
    }

    /// Coerce a non-null submitted value.
    fn transform(&self, value: Value) -> Value {
        value
    }

    /// Custom validator beyond the plain required check.
    fn validator(&self, _field: &Field) -> Option<Validator> {
        None
    }

    /// Read-only display text for a non-blank value.
    fn format_view(&self, _field: &Field, value: &Value, _ctx: &ViewContext<'_>) -> String {
        value_to_text(value)
    }

    /// Whether the widget spans the full grid row.
    fn full_width(&self) -> bool {
        false
    }
}

impl FieldType {
    pub fn behavior(&self) -> &'static dyn FieldBehavior {
        match self {
            FieldType::Text | FieldType::Email | FieldType::Color => &PLAIN,
            FieldType::Number => &NUMBER,
            FieldType::Checkbox | FieldType::Toggle => &FLAG,
            FieldType::Datepicker => &DATE,
            FieldType::Radio => &RADIO,
            FieldType::Select | FieldType::FormReference | FieldType::ApiReference => &CHOICE,
            FieldType::File => &FILE,
            FieldType::Richtext => &RICH_TEXT,
        }
    }
}

static PLAIN: PlainBehavior = PlainBehavior;
static NUMBER: NumberBehavior = NumberBehavior;
static FLAG: FlagBehavior = FlagBehavior;
static DATE: DateBehavior = DateBehavior;
static RADIO: RadioBehavior = RadioBehavior;
static CHOICE: ChoiceBehavior = ChoiceBehavior;
static FILE: FileBehavior = FileBehavior;
static RICH_TEXT: RichTextBehavior = RichTextBehavior;

struct PlainBehavior;

impl FieldBehavior for PlainBehavior {
    fn default_value(&self, _field: &Field) -> Value {
        Value::String(String::new())
    }
}

struct NumberBehavior;

impl FieldBehavior for NumberBehavior {
    fn default_value(&self, _field: &Field) -> Value {
        Value::String(String::new())
    }

    fn transform(&self, value: Value) -> Value {
        coerce_number(value)
    }
}

/// Checkbox and toggle.
struct FlagBehavior;

impl FieldBehavior for FlagBehavior {
    fn default_value(&self, _field: &Field) -> Value {
        Value::Bool(false)
    }

    fn transform(&self, value: Value) -> Value {
        Value::Bool(is_truthy(&value))
    }

    fn format_view(&self, _field: &Field, value: &Value, _ctx: &ViewContext<'_>) -> String {
        let text = if is_truthy(value) { "Yes" } else { "No" };
        text.to_string()
    }
}

struct DateBehavior;

impl FieldBehavior for DateBehavior {
    fn default_value(&self, _field: &Field) -> Value {
        Value::Null
    }

    fn format_view(&self, field: &Field, value: &Value, ctx: &ViewContext<'_>) -> String {
        let text = ctx.formatter.format(value, field.date_mode());
        if text.is_empty() {
            value_to_text(value)
        } else {
            text
        }
    }
}

struct RadioBehavior;

impl FieldBehavior for RadioBehavior {
    fn default_value(&self, _field: &Field) -> Value {
        Value::String(String::new())
    }

    fn format_view(&self, field: &Field, value: &Value, _ctx: &ViewContext<'_>) -> String {
        normalize_options(field.options.as_deref())
            .into_iter()
            .find(|opt| opt.value.matches_strict(value))
            .map(|opt| opt.label)
            .unwrap_or_else(|| value_to_text(value))
    }
}

/// Select and both reference types.
struct ChoiceBehavior;

impl FieldBehavior for ChoiceBehavior {
    fn default_value(&self, field: &Field) -> Value {
        if field.allow_multiple {
            Value::Array(Vec::new())
        } else {
            Value::String(String::new())
        }
    }

    fn normalize(&self, field: &Field, value: Value) -> Value {
        if field.allow_multiple {
            match value {
                Value::Null => Value::Array(Vec::new()),
                Value::String(s) if s.is_empty() => Value::Array(Vec::new()),
                Value::Array(items) => Value::Array(items),
                scalar => Value::Array(vec![scalar]),
            }
        } else {
            collapse_to_single(value, Value::String(String::new()))
        }
    }

    fn validator(&self, field: &Field) -> Option<Validator> {
        field.allow_multiple.then_some(Validator::MultiChoice)
    }

    fn format_view(&self, field: &Field, value: &Value, ctx: &ViewContext<'_>) -> String {
        let values: Vec<&Value> = match value {
            Value::Array(items) if field.allow_multiple => items.iter().collect(),
            Value::Array(items) => items.first().into_iter().collect(),
            other if is_truthy(other) => vec![other],
            _ => Vec::new(),
        };
        if values.is_empty() {
            return EMPTY_DISPLAY.to_string();
        }

        let mut options: Vec<OptionItem> = normalize_options(field.options.as_deref());
        if let Some(loaded) = ctx.options {
            options.extend(loaded.iter().cloned());
        }
        let label_for = |val: &Value| -> String {
            options
                .iter()
                .find(|opt| opt.value.matches_loose(val))
                .map(|opt| opt.label.clone())
                .unwrap_or_else(|| value_to_text(val))
        };

        values
            .into_iter()
            .map(label_for)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

struct FileBehavior;

impl FieldBehavior for FileBehavior {
    fn default_value(&self, field: &Field) -> Value {
        if field.allow_multiple {
            Value::Array(Vec::new())
        } else {
            Value::Null
        }
    }

    fn normalize(&self, field: &Field, value: Value) -> Value {
        if field.allow_multiple {
            match value {
                Value::Null => Value::Array(Vec::new()),
                Value::Array(items) => Value::Array(items),
                single => Value::Array(vec![single]),
            }
        } else {
            collapse_to_single(value, Value::Null)
        }
    }

    fn validator(&self, field: &Field) -> Option<Validator> {
        Some(Validator::StoredFile {
            multiple: field.allow_multiple,
        })
    }

    fn format_view(&self, _field: &Field, value: &Value, _ctx: &ViewContext<'_>) -> String {
        match value {
            Value::Array(items) => format!("{} file(s)", items.len()),
            _ => "1 file".to_string(),
        }
    }
}

struct RichTextBehavior;

impl FieldBehavior for RichTextBehavior {
    fn default_value(&self, _field: &Field) -> Value {
        Value::String(String::new())
    }

    fn format_view(&self, _field: &Field, value: &Value, _ctx: &ViewContext<'_>) -> String {
        match value {
            Value::String(html) => sanitize_html(html),
            other => value_to_text(other),
        }
    }

    fn full_width(&self) -> bool {
        true
    }
}

/// True when `value` is an object shaped like a stored file descriptor.
pub(crate) fn is_stored_file(value: &Value) -> bool {
    FileValue::from_json(value).is_some_and(|f| f.is_stored())
}
