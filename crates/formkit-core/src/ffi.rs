//! FFI-oriented JSON API for cross-language bindings.
//!
//! All functions take JSON string inputs and return JSON strings shaped as
//! `{ "success": bool, "data"?: ..., "error"?: "..." }`.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::normalize::{initial_form_values, normalize_initial_values, transform_form_values};
use crate::services::DefaultDateFormatter;
use crate::types::*;
use crate::validator::validate_schema;
use crate::view::render_view;

// ---------------------------------------------------------------------------
// Options types (deserialized from JSON input)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewOptions {
    /// Options already loaded for reference fields, keyed by field name.
    #[serde(default)]
    pub reference_options: HashMap<String, Vec<OptionItem>>,
}

// ---------------------------------------------------------------------------
// Result types (serialized to JSON output)
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct FfiResult<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

const SERIALIZATION_FALLBACK: &str =
    r#"{"success":false,"error":"JSON serialization error"}"#;

fn success<T: Serialize>(data: T) -> String {
    let result = FfiResult {
        success: true,
        data: Some(data),
        error: None,
    };
    serde_json::to_string(&result)
        .unwrap_or_else(|e| failure(format!("JSON serialization error: {e}")))
}

fn failure(message: String) -> String {
    serde_json::to_string(&FfiResult::<()> {
        success: false,
        data: None,
        error: Some(message),
    })
    .unwrap_or_else(|_| SERIALIZATION_FALLBACK.to_string())
}

fn parse_schema(schema_json: &str) -> Result<Schema, String> {
    Schema::from_json(schema_json).map_err(|e| format!("Invalid schema JSON: {e}"))
}

fn parse_values(values_json: &str) -> Result<ValueMap, String> {
    serde_json::from_str(values_json).map_err(|e| format!("Invalid values JSON: {e}"))
}

/// Run `f` and convert its outcome (or a panic) to the FFI envelope.
fn run<T, F>(f: F) -> String
where
    T: Serialize,
    F: FnOnce() -> Result<T, String> + std::panic::UnwindSafe,
{
    match std::panic::catch_unwind(f) {
        Ok(Ok(data)) => success(data),
        Ok(Err(message)) => failure(message),
        Err(_) => failure("Internal panic".to_string()),
    }
}

// ---------------------------------------------------------------------------
// Public FFI functions
// ---------------------------------------------------------------------------

/// Repair a stored value map into the shapes the schema's fields expect.
///
/// Input: values object JSON + schema JSON
/// Output: normalized values object
pub fn normalize_to_json(values_json: &str, schema_json: &str) -> String {
    run(|| {
        let schema = parse_schema(schema_json)?;
        let values = parse_values(values_json)?;
        Ok(normalize_initial_values(&values, &schema))
    })
}

/// Coerce a value map into its submit payload.
///
/// Input: values object JSON + schema JSON
/// Output: transformed values object
pub fn transform_to_json(values_json: &str, schema_json: &str) -> String {
    run(|| {
        let schema = parse_schema(schema_json)?;
        let values = parse_values(values_json)?;
        Ok(transform_form_values(&values, &schema))
    })
}

/// Default value of every effective field.
pub fn defaults_to_json(schema_json: &str) -> String {
    run(|| {
        let schema = parse_schema(schema_json)?;
        Ok(initial_form_values(None, &schema))
    })
}

/// Structural diagnostics for a schema.
pub fn validate_schema_to_json(schema_json: &str) -> String {
    run(|| {
        let schema = parse_schema(schema_json)?;
        Ok(validate_schema(&schema))
    })
}

/// Read-only display entries for a value map.
///
/// Input: values object JSON + schema JSON + options JSON (`{}` or
/// `{"referenceOptions": {"field": [{label, value}]}}`)
/// Output: array of view entries
pub fn view_to_json(values_json: &str, schema_json: &str, options_json: &str) -> String {
    run(|| {
        let schema = parse_schema(schema_json)?;
        let values = parse_values(values_json)?;
        let opts: ViewOptions = if options_json.trim().is_empty() {
            ViewOptions::default()
        } else {
            serde_json::from_str(options_json)
                .map_err(|e| format!("Invalid options JSON: {e}"))?
        };
        Ok(render_view(
            &schema,
            &values,
            &DefaultDateFormatter,
            &opts.reference_options,
        ))
    })
}
