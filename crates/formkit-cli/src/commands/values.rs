use std::path::Path;

use formkit_core::{
    initial_form_values, normalize_initial_values, transform_form_values, ValueMap,
};

use crate::reader::{read_schema_file, read_values};

pub fn run_normalize(schema_path: &Path, values_path: &Path) -> Result<String, String> {
    let file = read_schema_file(schema_path)?;
    let values = read_values(values_path)?;
    to_json(&normalize_initial_values(&values, &file.schema))
}

pub fn run_transform(schema_path: &Path, values_path: &Path) -> Result<String, String> {
    let file = read_schema_file(schema_path)?;
    let values = read_values(values_path)?;
    to_json(&transform_form_values(&values, &file.schema))
}

pub fn run_defaults(schema_path: &Path) -> Result<String, String> {
    let file = read_schema_file(schema_path)?;
    to_json(&initial_form_values(None, &file.schema))
}

fn to_json(values: &ValueMap) -> Result<String, String> {
    serde_json::to_string_pretty(values).map_err(|e| format!("JSON serialization error: {e}"))
}
