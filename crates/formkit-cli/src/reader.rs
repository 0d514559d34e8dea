use std::fs;
use std::path::{Path, PathBuf};

use formkit_core::{Schema, ValueMap};
use formkit_lint::LintConfig;
use serde::Deserialize;

pub const CONFIG_FILE: &str = "formkit.config.yaml";

/// A schema file with its path and parsed content.
pub struct SchemaFile {
    pub path: String,
    pub schema: Schema,
}

/// Project configuration from formkit.config.yaml.
#[derive(Debug, Default, Deserialize)]
pub struct FormkitConfig {
    pub sources: Option<Vec<String>>,
    /// Treat validator warnings as failures in `check`.
    #[serde(default)]
    pub strict: bool,
    #[serde(default)]
    pub lint: LintConfig,
}

/// Read schema files from a path (file or directory).
pub fn read_schema_files(input_path: &Path) -> Result<Vec<SchemaFile>, String> {
    if !input_path.exists() {
        return Err(format!("Path does not exist: {}", input_path.display()));
    }

    if input_path.is_file() {
        return Ok(vec![read_schema_file(input_path)?]);
    }

    if input_path.is_dir() {
        let paths = match read_project_config(input_path)? {
            Some(FormkitConfig {
                sources: Some(sources),
                ..
            }) if !sources.is_empty() => glob_sources(input_path, &sources)?,
            _ => scan_directory(input_path)?,
        };
        return paths.iter().map(|p| read_schema_file(p)).collect();
    }

    Err(format!(
        "Path is neither a file nor a directory: {}",
        input_path.display()
    ))
}

/// Read a single schema, choosing the decoder by extension.
pub fn read_schema_file(path: &Path) -> Result<SchemaFile, String> {
    tracing::debug!(path = %path.display(), "reading schema");
    let content = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;

    let schema = if is_yaml(path) {
        Schema::from_yaml(&content)
    } else {
        Schema::from_json(&content)
    }
    .map_err(|e| format!("Failed to parse {}: {}", path.display(), e))?;

    Ok(SchemaFile {
        path: path.to_string_lossy().to_string(),
        schema,
    })
}

/// Read a value map from a JSON file.
pub fn read_values(path: &Path) -> Result<ValueMap, String> {
    let content = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
    serde_json::from_str(&content)
        .map_err(|e| format!("Invalid values in {}: {}", path.display(), e))
}

/// Read project config from formkit.config.yaml if it exists.
pub fn read_project_config(dir_path: &Path) -> Result<Option<FormkitConfig>, String> {
    let config_path = dir_path.join(CONFIG_FILE);
    if !config_path.exists() {
        return Ok(None);
    }

    let content =
        fs::read_to_string(&config_path).map_err(|e| format!("Failed to read config: {}", e))?;
    let config =
        serde_yaml::from_str(&content).map_err(|e| format!("Invalid YAML config: {}", e))?;
    Ok(Some(config))
}

/// Config for the directory containing `input_path` (or `input_path` itself
/// when it is a directory). Missing config yields defaults.
pub fn config_for(input_path: &Path) -> Result<FormkitConfig, String> {
    let dir = if input_path.is_dir() {
        Some(input_path)
    } else {
        input_path.parent()
    };
    match dir {
        Some(dir) => Ok(read_project_config(dir)?.unwrap_or_default()),
        None => Ok(FormkitConfig::default()),
    }
}

fn is_yaml(path: &Path) -> bool {
    path.extension()
        .is_some_and(|e| e.eq_ignore_ascii_case("yaml") || e.eq_ignore_ascii_case("yml"))
}

fn scan_directory(dir_path: &Path) -> Result<Vec<PathBuf>, String> {
    let mut paths: Vec<PathBuf> = Vec::new();

    for pattern in ["**/*.form.json", "**/*.form.yaml", "**/*.form.yml"] {
        let pattern_str = dir_path.join(pattern).to_string_lossy().replace('\\', "/");
        let entries =
            glob::glob(&pattern_str).map_err(|e| format!("Invalid glob pattern: {}", e))?;

        for entry in entries {
            let path = entry.map_err(|e| format!("Glob error: {}", e))?;
            if !paths.contains(&path) {
                paths.push(path);
            }
        }
    }

    paths.sort();
    Ok(paths)
}

fn glob_sources(base_dir: &Path, patterns: &[String]) -> Result<Vec<PathBuf>, String> {
    let mut paths: Vec<PathBuf> = Vec::new();

    for pattern in patterns {
        let pattern_str = base_dir.join(pattern).to_string_lossy().replace('\\', "/");
        let entries = glob::glob(&pattern_str)
            .map_err(|e| format!("Invalid glob pattern '{}': {}", pattern, e))?;

        let mut matched: Vec<PathBuf> = Vec::new();
        for entry in entries {
            let path = entry.map_err(|e| format!("Glob error: {}", e))?;
            if path.is_file() && !paths.contains(&path) && !matched.contains(&path) {
                matched.push(path);
            }
        }
        matched.sort();
        paths.extend(matched);
    }

    Ok(paths)
}
