//! formkit WASM bindings.
//!
//! Provides JavaScript-callable functions via wasm-bindgen.
//! All functions take JSON string inputs and return JSON strings shaped as
//! `{ success: boolean, data?: ..., error?: string }`.

use formkit_core::ffi::FfiResult;
use formkit_core::{
    defaults_to_json, normalize_to_json, transform_to_json, validate_schema_to_json, view_to_json,
    Schema,
};
use formkit_lint::{LintConfig, Linter};
use wasm_bindgen::prelude::*;

/// Repair stored values into the shapes the schema expects.
///
/// @param values_json - values object
/// @param schema_json - form schema
/// @returns JSON string with `{ success: boolean, data?: Values, error?: string }`
#[wasm_bindgen(js_name = "normalizeInitialValues")]
pub fn wasm_normalize(values_json: &str, schema_json: &str) -> String {
    normalize_to_json(values_json, schema_json)
}

/// Coerce form values into the submit payload.
///
/// @param values_json - values object
/// @param schema_json - form schema
/// @returns JSON string with `{ success: boolean, data?: Values, error?: string }`
#[wasm_bindgen(js_name = "transformFormValues")]
pub fn wasm_transform(values_json: &str, schema_json: &str) -> String {
    transform_to_json(values_json, schema_json)
}

/// Default value of every field.
///
/// @param schema_json - form schema
/// @returns JSON string with `{ success: boolean, data?: Values, error?: string }`
#[wasm_bindgen(js_name = "defaultValues")]
pub fn wasm_defaults(schema_json: &str) -> String {
    defaults_to_json(schema_json)
}

/// Check a schema and return diagnostics.
///
/// @param schema_json - form schema
/// @returns JSON string with `{ success: boolean, data?: ValidateResult, error?: string }`
#[wasm_bindgen(js_name = "validateSchema")]
pub fn wasm_validate_schema(schema_json: &str) -> String {
    validate_schema_to_json(schema_json)
}

/// Read-only display entries for a value map.
///
/// @param values_json - values object
/// @param schema_json - form schema
/// @param options_json - `{ referenceOptions?: { [field]: OptionItem[] } }`
/// @returns JSON string with `{ success: boolean, data?: ViewEntry[], error?: string }`
#[wasm_bindgen(js_name = "renderView")]
pub fn wasm_view(values_json: &str, schema_json: &str, options_json: &str) -> String {
    view_to_json(values_json, schema_json, options_json)
}

/// Lint a schema with the built-in rules.
///
/// @param schema_json - form schema
/// @param config_json - `{ rules?: { [ruleId]: "off" | "warn" | "error" } }`
/// @returns JSON string with `{ success: boolean, data?: LintDiagnostic[], error?: string }`
#[wasm_bindgen(js_name = "lint")]
pub fn wasm_lint(schema_json: &str, config_json: &str) -> String {
    let schema = match Schema::from_json(schema_json) {
        Ok(s) => s,
        Err(e) => return failure(format!("Invalid schema JSON: {e}")),
    };
    let config: LintConfig = if config_json.trim().is_empty() {
        LintConfig::default()
    } else {
        match serde_json::from_str(config_json) {
            Ok(c) => c,
            Err(e) => return failure(format!("Invalid config JSON: {e}")),
        }
    };

    let diagnostics = Linter::new(config).lint(&schema);
    serde_json::to_string(&FfiResult {
        success: true,
        data: Some(diagnostics),
        error: None,
    })
    .unwrap_or_else(|e| failure(format!("JSON serialization error: {e}")))
}

fn failure(message: String) -> String {
    serde_json::to_string(&FfiResult::<()> {
        success: false,
        data: None,
        error: Some(message),
    })
    .unwrap_or_else(|_| r#"{"success":false}"#.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn lint_reports_diagnostics() {
        let schema = r#"{"name": "s", "title": "S", "fields": [{"type": "text", "name": "Bad Name", "label": "Bad"}]}"#;
        let v: Value = serde_json::from_str(&wasm_lint(schema, "")).unwrap();
        assert_eq!(v["success"], true);
        assert_eq!(v["data"][0]["rule"], "naming-convention");
    }

    #[test]
    fn lint_respects_config() {
        let schema = r#"{"name": "s", "title": "S", "fields": [{"type": "text", "name": "Bad Name", "label": "Bad"}]}"#;
        let config = r#"{"rules": {"naming-convention": "off"}}"#;
        let v: Value = serde_json::from_str(&wasm_lint(schema, config)).unwrap();
        assert_eq!(v["data"].as_array().unwrap().len(), 0);
    }

    #[test]
    fn lint_rejects_bad_input() {
        let v: Value = serde_json::from_str(&wasm_lint("{}", "")).unwrap();
        assert_eq!(v["success"], false);
        assert!(v["error"].as_str().unwrap().starts_with("Invalid schema JSON"));
    }
}
