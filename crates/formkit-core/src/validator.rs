use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::layout::{MAX_COLUMNS, MIN_COLUMNS};
use crate::types::*;

/// Schema names are lowercase tokens: letters, digits, `_` and `-`.
static RE_SCHEMA_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z][a-z0-9_-]*$").unwrap());

/// Check a schema for structural errors and suspicious settings.
pub fn validate_schema(schema: &Schema) -> ValidateResult {
    let mut errors: Vec<Diagnostic> = Vec::new();
    let mut warnings: Vec<Diagnostic> = Vec::new();

    // FK-E002: schema name token
    if !RE_SCHEMA_NAME.is_match(&schema.name) {
        errors.push(error(
            "FK-E002",
            "name",
            format!(
                "Schema name \"{}\" must be a lowercase token (a-z, 0-9, '_', '-')",
                schema.name
            ),
        ));
    }

    // FK-W001: flat fields shadowed by sections
    if schema.uses_sections() && schema.fields.as_ref().is_some_and(|f| !f.is_empty()) {
        warnings.push(warning(
            "FK-W001",
            "fields",
            "Schema has both sections and flat fields; flat fields are ignored".into(),
        ));
    }

    // FK-W002: fieldsPerRow out of range
    if let Some(n) = schema.settings.fields_per_row {
        if n < MIN_COLUMNS as i64 || n > MAX_COLUMNS as i64 {
            warnings.push(warning(
                "FK-W002",
                "settings.fieldsPerRow",
                format!("fieldsPerRow {n} is outside [{MIN_COLUMNS}, {MAX_COLUMNS}] and will be clamped"),
            ));
        }
    }

    let mut seen: HashSet<&str> = HashSet::new();
    for (path, field) in schema.located_fields() {
        // FK-E003: empty name
        if field.name.trim().is_empty() {
            errors.push(error(
                "FK-E003",
                &path,
                format!("Field \"{}\" has an empty name", field.label),
            ));
            continue;
        }

        // FK-E001: duplicate names across the effective field list
        if !seen.insert(field.name.as_str()) {
            errors.push(error(
                "FK-E001",
                &path,
                format!("Duplicate field name \"{}\"", field.name),
            ));
        }

        validate_constraints(field, &path, &mut errors, &mut warnings);
        validate_type_config(field, &path, &mut warnings);
    }

    ValidateResult { errors, warnings }
}

fn validate_constraints(
    field: &Field,
    path: &str,
    errors: &mut Vec<Diagnostic>,
    warnings: &mut Vec<Diagnostic>,
) {
    let Some(validation) = &field.validation else {
        return;
    };

    // FK-E004: pattern must compile
    if let Some(pattern) = &validation.pattern {
        if let Err(e) = Regex::new(pattern) {
            errors.push(error(
                "FK-E004",
                path,
                format!("Field \"{}\" has an invalid pattern: {e}", field.name),
            ));
        }
    }

    // FK-E005: min above max
    if let (Some(min), Some(max)) = (validation.min, validation.max) {
        if min > max {
            errors.push(error(
                "FK-E005",
                path,
                format!("Field \"{}\" has min {min} greater than max {max}", field.name),
            ));
        }
    }

    // FK-W005: file limits on non-file fields
    let has_file_limits = validation.max_file_size.is_some()
        || validation
            .allowed_file_types
            .as_ref()
            .is_some_and(|t| !t.is_empty());
    if has_file_limits && field.field_type != FieldType::File {
        warnings.push(warning(
            "FK-W005",
            path,
            format!(
                "Field \"{}\" of type {} declares file limits that are never applied",
                field.name, field.field_type
            ),
        ));
    }
}

fn validate_type_config(field: &Field, path: &str, warnings: &mut Vec<Diagnostic>) {
    match field.field_type {
        // FK-W003: choices with nothing to choose
        FieldType::Select | FieldType::Radio
            if field.options.as_ref().map_or(true, |o| o.is_empty()) =>
        {
            warnings.push(warning(
                "FK-W003",
                path,
                format!("Field \"{}\" of type {} has no options", field.name, field.field_type),
            ));
        }
        // FK-W004: incomplete reference configuration
        FieldType::FormReference
            if missing(&field.reference_form_name) || missing(&field.reference_field_name) =>
        {
            warnings.push(warning(
                "FK-W004",
                path,
                format!(
                    "Field \"{}\" needs referenceFormName and referenceFieldName; it will render disabled",
                    field.name
                ),
            ));
        }
        FieldType::ApiReference
            if missing(&field.api_endpoint) || missing(&field.api_label_field) =>
        {
            warnings.push(warning(
                "FK-W004",
                path,
                format!(
                    "Field \"{}\" needs apiEndpoint and apiLabelField; it will render disabled",
                    field.name
                ),
            ));
        }
        _ => {}
    }
}

fn missing(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, str::is_empty)
}

fn error(code: &str, path: &str, message: String) -> Diagnostic {
    Diagnostic {
        code: code.into(),
        severity: DiagnosticSeverity::Error,
        path: path.into(),
        message,
    }
}

fn warning(code: &str, path: &str, message: String) -> Diagnostic {
    Diagnostic {
        code: code.into(),
        severity: DiagnosticSeverity::Warning,
        path: path.into(),
        message,
    }
}
