use std::path::Path;

use formkit_core::{validate_schema, Diagnostic, DiagnosticSeverity};
use serde::Serialize;

use crate::reader::{config_for, read_schema_files};

#[derive(Serialize)]
struct FileDiagnostic<'a> {
    file: &'a str,
    #[serde(flatten)]
    diagnostic: &'a Diagnostic,
}

/// Validate every schema under `input_path`. Returns the report and whether
/// the run failed: any error, or any warning in strict mode.
pub fn run_check(input_path: &Path, strict: bool, format: &str) -> Result<(String, bool), String> {
    let files = read_schema_files(input_path)?;
    if files.is_empty() {
        return Err(format!(
            "No form schemas (*.form.json, *.form.yaml) found at: {}",
            input_path.display()
        ));
    }

    let strict = strict || config_for(input_path)?.strict;

    let results: Vec<_> = files
        .iter()
        .map(|f| (f.path.as_str(), validate_schema(&f.schema)))
        .collect();

    let error_count: usize = results.iter().map(|(_, r)| r.errors.len()).sum();
    let warning_count: usize = results.iter().map(|(_, r)| r.warnings.len()).sum();
    let file_count = files.len();
    let failed = error_count > 0 || (strict && warning_count > 0);

    if failed {
        tracing::info!(error_count, warning_count, strict, "schema check failed");
    }

    let diagnostics: Vec<FileDiagnostic> = results
        .iter()
        .flat_map(|(file, r)| {
            let file: &str = file;
            r.errors
                .iter()
                .chain(r.warnings.iter())
                .map(move |diagnostic| FileDiagnostic { file, diagnostic })
        })
        .collect();

    if format == "json" {
        let output = serde_json::json!({
            "diagnostics": diagnostics,
            "summary": {
                "errors": error_count,
                "warnings": warning_count,
                "files": file_count,
                "strict": strict,
            }
        });
        let json = serde_json::to_string_pretty(&output)
            .map_err(|e| format!("JSON serialization error: {e}"))?;
        return Ok((json, failed));
    }

    // Human-readable format
    let mut lines: Vec<String> = Vec::new();

    for d in &diagnostics {
        let severity = match d.diagnostic.severity {
            DiagnosticSeverity::Error => "error",
            DiagnosticSeverity::Warning => "warning",
        };
        lines.push(format!(
            "{} {}[{}] {}: {}",
            d.file, severity, d.diagnostic.code, d.diagnostic.path, d.diagnostic.message
        ));
    }

    let error_word = if error_count == 1 { "error" } else { "errors" };
    let warning_word = if warning_count == 1 {
        "warning"
    } else {
        "warnings"
    };
    let file_word = if file_count == 1 { "file" } else { "files" };
    lines.push(format!(
        "{error_count} {error_word}, {warning_count} {warning_word} in {file_count} {file_word}."
    ));

    Ok((lines.join("\n"), failed))
}
