use std::path::Path;

use formkit_core::{accept_attribute, build_field_rules};

use crate::reader::read_schema_file;

/// Derived rules for every effective field, keyed by field name.
pub fn run_rules(schema_path: &Path) -> Result<String, String> {
    let file = read_schema_file(schema_path)?;

    let mut out = serde_json::Map::new();
    for field in file.schema.effective_fields() {
        let mut entry = serde_json::to_value(build_field_rules(field))
            .map_err(|e| format!("JSON serialization error: {e}"))?;
        if let (Some(obj), Some(accept)) = (entry.as_object_mut(), accept_attribute(field)) {
            obj.insert("accept".into(), accept.into());
        }
        out.insert(field.name.clone(), entry);
    }

    serde_json::to_string_pretty(&out).map_err(|e| format!("JSON serialization error: {e}"))
}
