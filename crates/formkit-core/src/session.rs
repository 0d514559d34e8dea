//! Edit-mode form state: values, field errors, the submit banner, busy
//! flags, and the stepper position.
//!
//! The rendering layer reads from and writes to a `FormSession`; the
//! session owns no widgets.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde_json::Value;

use crate::activity::ActivityFlags;
use crate::cache::OptionsCache;
use crate::layout::{FormLayout, Stepper};
use crate::normalize::{
    get_default_value, initial_form_values, normalize_initial_values, transform_form_values,
    value_to_text,
};
use crate::reference::ReferenceLoader;
use crate::rules::build_field_rules;
use crate::services::FormServices;
use crate::types::{OptionItem, PendingFile, Schema, ValueMap};
use crate::upload::{upload_field_files, UploadOutcome};

pub const DEFAULT_SUBMIT_ERROR: &str = "Form submission failed. Please try again.";

/// Receives the transformed payload on submit.
#[async_trait(?Send)]
pub trait SubmitHandler {
    async fn submit(&self, payload: &ValueMap) -> Result<(), SubmitRejection>;
}

/// Why the host rejected a submission.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubmitRejection {
    pub message: Option<String>,
    /// Response body returned by the backend, if any.
    pub response: Option<Value>,
}

impl SubmitRejection {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            response: None,
        }
    }

    pub fn response(body: Value) -> Self {
        Self {
            message: None,
            response: Some(body),
        }
    }
}

/// Banner text for a rejected submission, read from the usual error body
/// conventions (`message`, `error`, `errors.message`, `errors[]`, `msg`).
pub fn submit_error_message(rejection: &SubmitRejection) -> String {
    if let Some(body) = &rejection.response {
        let from_body = text_at(body, "message")
            .or_else(|| text_at(body, "error"))
            .or_else(|| body.get("errors").and_then(|e| text_at(e, "message")))
            .or_else(|| match body.get("errors") {
                Some(Value::Array(items)) if !items.is_empty() => Some(
                    items
                        .iter()
                        .map(value_to_text)
                        .collect::<Vec<_>>()
                        .join(", "),
                ),
                _ => None,
            })
            .or_else(|| text_at(body, "msg"));
        return from_body.unwrap_or_else(|| DEFAULT_SUBMIT_ERROR.to_string());
    }

    match &rejection.message {
        Some(message) if !message.is_empty() => message.clone(),
        _ => DEFAULT_SUBMIT_ERROR.to_string(),
    }
}

fn text_at(value: &Value, key: &str) -> Option<String> {
    value
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Handler accepted the payload; the form was reset.
    Submitted(ValueMap),
    /// Validation failed; the handler was not called.
    Invalid(BTreeMap<String, String>),
    /// Handler rejected; values are kept and the banner is set.
    Failed(String),
}

pub struct FormSession {
    schema: Schema,
    services: FormServices,
    initial: Option<ValueMap>,
    values: ValueMap,
    errors: BTreeMap<String, String>,
    submit_error: Option<String>,
    flags: ActivityFlags,
    stepper: Stepper,
}

impl FormSession {
    pub fn new(schema: Schema, initial: Option<ValueMap>, services: FormServices) -> Self {
        let initial = initial.map(|v| normalize_initial_values(&v, &schema));
        let values = initial.clone().unwrap_or_default();
        let stepper = FormLayout::from_schema(&schema).stepper();
        Self {
            schema,
            services,
            initial,
            values,
            errors: BTreeMap::new(),
            submit_error: None,
            flags: ActivityFlags::new(),
            stepper,
        }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Current value of a field, or its default when unset.
    pub fn value(&self, name: &str) -> Value {
        match self.values.get(name) {
            Some(v) => v.clone(),
            None => self
                .schema
                .field(name)
                .map(get_default_value)
                .unwrap_or(Value::Null),
        }
    }

    /// Every field's value with defaults filled in, plus any extra keys.
    pub fn values(&self) -> ValueMap {
        let mut out = initial_form_values(None, &self.schema);
        for (k, v) in &self.values {
            out.insert(k.clone(), v.clone());
        }
        out
    }

    pub fn set_value(&mut self, name: &str, value: Value) {
        self.values.insert(name.to_string(), value);
        self.errors.remove(name);
    }

    pub fn error(&self, name: &str) -> Option<&str> {
        self.errors.get(name).map(String::as_str)
    }

    pub fn errors(&self) -> &BTreeMap<String, String> {
        &self.errors
    }

    pub fn set_error(&mut self, name: &str, message: impl Into<String>) {
        self.errors.insert(name.to_string(), message.into());
    }

    pub fn clear_errors(&mut self) {
        self.errors.clear();
    }

    /// Dismissible banner left by a failed submission.
    pub fn submit_error(&self) -> Option<&str> {
        self.submit_error.as_deref()
    }

    pub fn dismiss_submit_error(&mut self) {
        self.submit_error = None;
    }

    pub fn activity(&self) -> &ActivityFlags {
        &self.flags
    }

    pub fn is_busy(&self, name: &str) -> bool {
        self.flags.is_active(name)
    }

    pub fn stepper(&self) -> &Stepper {
        &self.stepper
    }

    pub fn stepper_mut(&mut self) -> &mut Stepper {
        &mut self.stepper
    }

    /// Replace the host-supplied initial values. The form is reset the first
    /// time values appear, and afterwards only when `allow_reset_on_change`
    /// is set and the normalized values differ.
    pub fn set_initial_values(&mut self, values: Option<ValueMap>, allow_reset_on_change: bool) {
        match values {
            Some(raw) => {
                let normalized = normalize_initial_values(&raw, &self.schema);
                let first = self.initial.is_none();
                let changed = self.initial.as_ref() != Some(&normalized);
                self.initial = Some(normalized);
                if first || (allow_reset_on_change && changed) {
                    self.reset_values();
                    self.submit_error = None;
                }
            }
            None => {
                if self.initial.take().is_some() {
                    self.submit_error = None;
                }
            }
        }
    }

    /// Back to the initial values with no errors, no banner, first step.
    pub fn reset(&mut self) {
        self.reset_values();
        self.submit_error = None;
        self.stepper.reset();
    }

    fn reset_values(&mut self) {
        self.values = self.initial.clone().unwrap_or_default();
        self.errors.clear();
    }

    /// Run every field's rules; failures replace the stored field errors.
    pub fn validate(&mut self) -> bool {
        let mut errors = BTreeMap::new();
        let values = self.values();
        for field in self.schema.effective_fields() {
            if let Err(message) = build_field_rules(field).check(values.get(&field.name)) {
                errors.insert(field.name.clone(), message);
            }
        }
        self.errors = errors;
        self.errors.is_empty()
    }

    /// Validate, transform, and hand the payload to `handler`.
    pub async fn submit(&mut self, handler: &dyn SubmitHandler) -> SubmitOutcome {
        self.submit_error = None;
        if !self.validate() {
            return SubmitOutcome::Invalid(self.errors.clone());
        }

        let payload = transform_form_values(&self.values(), &self.schema);
        match handler.submit(&payload).await {
            Ok(()) => {
                self.reset_values();
                SubmitOutcome::Submitted(payload)
            }
            Err(rejection) => {
                let message = submit_error_message(&rejection);
                tracing::error!(form = %self.schema.name, error = %message, "form submission failed");
                self.submit_error = Some(message.clone());
                SubmitOutcome::Failed(message)
            }
        }
    }

    /// Upload files into a file field and record the result on the field.
    pub async fn upload(&mut self, name: &str, files: &[PendingFile]) -> UploadOutcome {
        let Some(field) = self.schema.field(name).cloned() else {
            return UploadOutcome::Ignored;
        };
        let current = self.value(name);
        self.errors.remove(name);

        let outcome = upload_field_files(
            &self.schema.name,
            &field,
            &current,
            files,
            &self.services,
            &self.flags,
        )
        .await;

        match &outcome {
            UploadOutcome::Uploaded(value) => self.set_value(name, value.clone()),
            UploadOutcome::Rejected(message) => self.set_error(name, message.clone()),
            UploadOutcome::Ignored => {}
        }
        outcome
    }

    /// Options for a reference field through the shared cache, with the
    /// field marked loading meanwhile.
    pub async fn reference_options(
        &self,
        name: &str,
        cache: &OptionsCache,
        refresh: bool,
    ) -> Vec<OptionItem> {
        let Some(field) = self.schema.field(name) else {
            return Vec::new();
        };
        ReferenceLoader::new(cache, &self.services)
            .with_activity(&self.flags)
            .load_for_field(field, refresh)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn banner_from_response_body() {
        let cases = [
            (json!({"message": "Duplicate email"}), "Duplicate email"),
            (json!({"error": "Forbidden"}), "Forbidden"),
            (json!({"errors": {"message": "Bad owner"}}), "Bad owner"),
            (json!({"errors": ["a is bad", "b is bad"]}), "a is bad, b is bad"),
            (json!({"msg": "Nope"}), "Nope"),
            (json!({"status": 500}), DEFAULT_SUBMIT_ERROR),
        ];
        for (body, expected) in cases {
            assert_eq!(submit_error_message(&SubmitRejection::response(body)), expected);
        }
    }

    #[test]
    fn banner_from_plain_message() {
        assert_eq!(
            submit_error_message(&SubmitRejection::message("Network down")),
            "Network down"
        );
        assert_eq!(
            submit_error_message(&SubmitRejection::default()),
            DEFAULT_SUBMIT_ERROR
        );
    }
}
