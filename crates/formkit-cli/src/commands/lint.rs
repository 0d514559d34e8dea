use std::path::Path;

use formkit_lint::{LintDiagnostic, LintSeverity, Linter};
use serde::Serialize;

use crate::reader::{config_for, read_schema_files};

#[derive(Serialize)]
struct FileLintDiagnostic<'a> {
    file: &'a str,
    #[serde(flatten)]
    diagnostic: &'a LintDiagnostic,
}

pub fn run_lint(input_path: &Path, format: &str) -> Result<String, String> {
    let files = read_schema_files(input_path)?;
    if files.is_empty() {
        return Err(format!(
            "No form schemas (*.form.json, *.form.yaml) found at: {}",
            input_path.display()
        ));
    }

    let linter = Linter::new(config_for(input_path)?.lint);
    let results: Vec<(&str, Vec<LintDiagnostic>)> = files
        .iter()
        .map(|f| (f.path.as_str(), linter.lint(&f.schema)))
        .collect();
    let diagnostics: Vec<FileLintDiagnostic> = results
        .iter()
        .flat_map(|(file, ds)| {
            let file: &str = file;
            ds.iter()
                .map(move |diagnostic| FileLintDiagnostic { file, diagnostic })
        })
        .collect();
    let file_count = files.len();

    match format {
        "json" => {
            let json = serde_json::to_string_pretty(&serde_json::json!({
                "diagnostics": diagnostics,
                "summary": {
                    "count": diagnostics.len(),
                    "files": file_count,
                }
            }))
            .map_err(|e| format!("JSON serialization error: {e}"))?;
            Ok(json)
        }
        "sarif" => {
            let sarif = build_sarif(&diagnostics, &linter);
            serde_json::to_string_pretty(&sarif)
                .map_err(|e| format!("SARIF serialization error: {e}"))
        }
        _ => {
            // Human-readable format
            let mut lines: Vec<String> = Vec::new();

            for d in &diagnostics {
                lines.push(format!(
                    "{} {}[{}] {}: {}",
                    d.file,
                    severity_word(&d.diagnostic.severity),
                    d.diagnostic.rule,
                    d.diagnostic.path,
                    d.diagnostic.message
                ));
            }

            let count = diagnostics.len();
            let issue_word = if count == 1 { "issue" } else { "issues" };
            let file_word = if file_count == 1 { "file" } else { "files" };
            lines.push(format!(
                "{count} lint {issue_word} in {file_count} {file_word}."
            ));

            Ok(lines.join("\n"))
        }
    }
}

fn severity_word(severity: &LintSeverity) -> &'static str {
    match severity {
        LintSeverity::Error => "error",
        LintSeverity::Warning => "warning",
        LintSeverity::Info => "info",
    }
}

fn sarif_level(severity: &LintSeverity) -> &'static str {
    match severity {
        LintSeverity::Error => "error",
        LintSeverity::Warning => "warning",
        LintSeverity::Info => "note",
    }
}

fn build_sarif(results: &[FileLintDiagnostic], linter: &Linter) -> serde_json::Value {
    let rule_descriptors: Vec<serde_json::Value> = linter
        .rules()
        .iter()
        .map(|r| {
            serde_json::json!({
                "id": r.id(),
                "shortDescription": { "text": r.description() },
                "defaultConfiguration": { "level": sarif_level(&r.default_severity()) }
            })
        })
        .collect();

    let sarif_results: Vec<serde_json::Value> = results
        .iter()
        .map(|d| {
            serde_json::json!({
                "ruleId": d.diagnostic.rule,
                "level": sarif_level(&d.diagnostic.severity),
                "message": { "text": d.diagnostic.message },
                "locations": [{
                    "physicalLocation": {
                        "artifactLocation": { "uri": d.file }
                    },
                    "logicalLocations": [{
                        "fullyQualifiedName": format!("{}.{}", d.diagnostic.schema, d.diagnostic.path)
                    }]
                }]
            })
        })
        .collect();

    serde_json::json!({
        "$schema": "https://raw.githubusercontent.com/oasis-tcs/sarif-spec/main/sarif-2.1/schema/sarif-schema-2.1.0.json",
        "version": "2.1.0",
        "runs": [{
            "tool": {
                "driver": {
                    "name": "formkit-lint",
                    "version": env!("CARGO_PKG_VERSION"),
                    "rules": rule_descriptors
                }
            },
            "results": sarif_results
        }]
    })
}
