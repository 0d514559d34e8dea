//! Validation rule builder.
//!
//! Rules are derived from a field definition alone; rebuild them whenever
//! the definition changes.

use serde::Serialize;
use serde_json::Value;

use crate::behavior::is_stored_file;
use crate::types::{Field, OptionEntry, OptionItem, OptionValue};

/// Custom check attached to a field in addition to `required`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum Validator {
    /// File slots must hold stored descriptors when required.
    StoredFile { multiple: bool },
    /// Multi-value choices must be non-empty when required.
    MultiChoice,
}

/// Rule set handed to the form-state layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldRules {
    /// Failure message of the required rule, when the field is required.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validate: Option<Validator>,
}

impl FieldRules {
    pub fn is_empty(&self) -> bool {
        self.required.is_none() && self.validate.is_none()
    }

    /// Evaluate against the current value (`None` when unset). Returns the
    /// failure message of the first rule that does not hold.
    pub fn check(&self, value: Option<&Value>) -> Result<(), String> {
        if let Some(message) = &self.required {
            if value.map_or(true, is_empty_for_required) {
                return Err(message.clone());
            }
        }

        let (Some(validator), Some(message)) = (&self.validate, &self.required) else {
            // Custom validators only ever fail for required fields.
            return Ok(());
        };

        let passes = match validator {
            Validator::StoredFile { multiple: true } => match value {
                Some(Value::Array(items)) => items.iter().any(is_stored_file),
                _ => false,
            },
            Validator::StoredFile { multiple: false } => value.is_some_and(is_stored_file),
            Validator::MultiChoice => {
                matches!(value, Some(Value::Array(items)) if !items.is_empty())
            }
        };

        if passes {
            Ok(())
        } else {
            Err(message.clone())
        }
    }
}

/// Build the rule set for a field.
pub fn build_field_rules(field: &Field) -> FieldRules {
    FieldRules {
        required: field
            .required
            .then(|| format!("{} is required", field.label)),
        validate: field.field_type.behavior().validator(field),
    }
}

/// Uniform option items from a mixed list; legacy plain strings become
/// `{label: s, value: s}`.
pub fn normalize_options(options: Option<&[OptionEntry]>) -> Vec<OptionItem> {
    let Some(options) = options else {
        return Vec::new();
    };

    options
        .iter()
        .map(|opt| match opt {
            OptionEntry::Item(item) => item.clone(),
            OptionEntry::Plain(s) => OptionItem::new(s.clone(), OptionValue::String(s.clone())),
        })
        .collect()
}

fn is_empty_for_required(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}
