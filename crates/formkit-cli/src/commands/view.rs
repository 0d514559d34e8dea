use std::collections::HashMap;
use std::path::Path;

use formkit_core::{render_view, DefaultDateFormatter};

use crate::reader::{read_schema_file, read_values};

pub fn run_view(schema_path: &Path, values_path: &Path, format: &str) -> Result<String, String> {
    let file = read_schema_file(schema_path)?;
    let values = read_values(values_path)?;
    // Reference labels need the lookup services; the CLI shows raw values
    let entries = render_view(&file.schema, &values, &DefaultDateFormatter, &HashMap::new());

    if format == "json" {
        return serde_json::to_string_pretty(&entries)
            .map_err(|e| format!("JSON serialization error: {e}"));
    }

    let width = entries
        .iter()
        .map(|e| e.label.chars().count())
        .max()
        .unwrap_or(0);
    let lines: Vec<String> = entries
        .iter()
        .map(|e| format!("{:<width$}  {}", e.label, e.display))
        .collect();
    Ok(lines.join("\n"))
}
