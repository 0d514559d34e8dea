//! File slot helpers: pre-upload checks, size formatting, and merging
//! upload results into a field value.

use serde_json::Value;

use crate::types::{Field, FileValue, PendingFile, UploadedFile};

const SIZE_UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];

/// Human-readable size with base 1024, e.g. `1.5 KB`.
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }
    let mut exp = 0;
    while exp + 1 < SIZE_UNITS.len() && bytes >= 1024u64.pow(exp as u32 + 1) {
        exp += 1;
    }
    let scaled = bytes as f64 / 1024f64.powi(exp as i32);
    let rounded = (scaled * 100.0).round() / 100.0;
    format!("{} {}", trim_number(rounded), SIZE_UNITS[exp])
}

fn trim_number(n: f64) -> String {
    let text = format!("{n:.2}");
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}

/// Check a picked file against the field's type and size limits.
pub fn validate_file(file: &PendingFile, field: &Field) -> Result<(), String> {
    let Some(validation) = &field.validation else {
        return Ok(());
    };

    if let Some(allowed) = validation.allowed_file_types.as_ref().filter(|a| !a.is_empty()) {
        let extension = file
            .name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_lowercase())
            .filter(|ext| !ext.is_empty());
        let permitted = extension.is_some_and(|ext| {
            allowed
                .iter()
                .any(|t| t.to_lowercase().replacen('.', "", 1) == ext)
        });
        if !permitted {
            return Err(format!(
                "File type not allowed. Allowed types: {}",
                allowed.join(", ")
            ));
        }
    }

    if let Some(max) = validation.max_file_size.filter(|m| *m > 0) {
        if file.size > max {
            return Err(format!(
                "File size exceeds maximum allowed size of {}",
                format_file_size(max)
            ));
        }
    }

    Ok(())
}

/// `accept` list for a file input, e.g. `.pdf,.png`.
pub fn accept_attribute(field: &Field) -> Option<String> {
    let types = field.validation.as_ref()?.allowed_file_types.as_ref()?;
    Some(
        types
            .iter()
            .map(|t| format!(".{}", t.replacen('.', "", 1)))
            .collect::<Vec<_>>()
            .join(","),
    )
}

/// Field value after an upload completes. Multiple slots keep their stored
/// descriptors and append the new ones; single slots take the first upload.
pub fn merge_uploaded(current: &Value, uploaded: Vec<UploadedFile>, multiple: bool) -> Value {
    if multiple {
        let mut files: Vec<Value> = match current {
            Value::Array(items) => items
                .iter()
                .filter(|item| FileValue::from_json(item).is_some_and(|f| f.is_stored()))
                .cloned()
                .collect(),
            _ => Vec::new(),
        };
        files.extend(uploaded.iter().map(uploaded_to_value));
        Value::Array(files)
    } else {
        uploaded
            .first()
            .map(uploaded_to_value)
            .unwrap_or(Value::Null)
    }
}

/// Files currently held by a slot, in order.
pub fn file_values(value: &Value) -> Vec<FileValue> {
    match value {
        Value::Array(items) => items.iter().filter_map(FileValue::from_json).collect(),
        other => FileValue::from_json(other).into_iter().collect(),
    }
}

fn uploaded_to_value(file: &UploadedFile) -> Value {
    serde_json::to_value(file).unwrap_or(Value::Null)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{FieldType, FieldValidation};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn pdf_field() -> Field {
        let mut field = Field::new(FieldType::File, "doc", "Document");
        field.validation = Some(FieldValidation {
            allowed_file_types: Some(vec!["pdf".into(), ".PNG".into()]),
            max_file_size: Some(1024 * 1024),
            ..Default::default()
        });
        field
    }

    fn pending(name: &str, size: u64) -> PendingFile {
        PendingFile {
            name: name.into(),
            size,
            ..Default::default()
        }
    }

    #[test]
    fn file_sizes() {
        assert_eq!(format_file_size(0), "0 Bytes");
        assert_eq!(format_file_size(512), "512 Bytes");
        assert_eq!(format_file_size(1536), "1.5 KB");
        assert_eq!(format_file_size(1024 * 1024), "1 MB");
        assert_eq!(format_file_size(5 * 1024 * 1024 * 1024), "5 GB");
    }

    #[test]
    fn extension_checks_are_case_insensitive() {
        let field = pdf_field();
        assert_eq!(validate_file(&pending("a.PDF", 10), &field), Ok(()));
        assert_eq!(validate_file(&pending("b.png", 10), &field), Ok(()));
        assert_eq!(
            validate_file(&pending("c.exe", 10), &field),
            Err("File type not allowed. Allowed types: pdf, .PNG".into())
        );
        assert!(validate_file(&pending("noext", 10), &field).is_err());
    }

    #[test]
    fn size_limit() {
        assert_eq!(
            validate_file(&pending("big.pdf", 2 * 1024 * 1024), &pdf_field()),
            Err("File size exceeds maximum allowed size of 1 MB".into())
        );
    }

    #[test]
    fn accept_list() {
        assert_eq!(accept_attribute(&pdf_field()).as_deref(), Some(".pdf,.PNG"));
        assert_eq!(accept_attribute(&Field::new(FieldType::File, "f", "F")), None);
    }

    #[test]
    fn merge_keeps_stored_and_appends() {
        let current = json!([{"fileName": "old.pdf", "fileUrl": "/old"}, {"name": "raw", "size": 1}]);
        let uploaded = vec![UploadedFile {
            file_name: "new.pdf".into(),
            file_url: "/new".into(),
            ..Default::default()
        }];
        let merged = merge_uploaded(&current, uploaded.clone(), true);
        assert_eq!(merged.as_array().unwrap().len(), 2);
        assert_eq!(merged[0]["fileName"], "old.pdf");
        assert_eq!(merged[1]["fileName"], "new.pdf");

        assert_eq!(merge_uploaded(&current, uploaded, false)["fileUrl"], "/new");
        assert_eq!(merge_uploaded(&Value::Null, vec![], false), Value::Null);
    }

    #[test]
    fn classifies_slot_contents() {
        let files = file_values(&json!([{"fileUrl": "/a"}, {"name": "b", "size": 2}, "junk"]));
        assert_eq!(files.len(), 2);
        assert!(files[0].is_stored());
        assert!(!files[1].is_stored());
    }
}
