//! File upload flow for a single field.

use serde_json::Value;

use crate::activity::{ActivityFlags, ActivityGuard};
use crate::files::{merge_uploaded, validate_file};
use crate::services::FormServices;
use crate::types::{Field, PendingFile};

const UPLOAD_FAILED: &str = "Failed to upload files";

/// What happened to an upload request.
#[derive(Debug, Clone, PartialEq)]
pub enum UploadOutcome {
    /// Upload finished; the field's new value.
    Uploaded(Value),
    /// Nothing was uploaded; the message belongs on the field.
    Rejected(String),
    /// Another upload for the field is still running, or no files given.
    Ignored,
}

/// Validate, upload, and merge `files` into the field's current value.
///
/// The field's flag in `flags` is held for the duration of the upload and
/// released on every path.
pub async fn upload_field_files(
    schema_name: &str,
    field: &Field,
    current: &Value,
    files: &[PendingFile],
    services: &FormServices,
    flags: &ActivityFlags,
) -> UploadOutcome {
    if files.is_empty() || flags.is_active(&field.name) {
        return UploadOutcome::Ignored;
    }

    for file in files {
        if let Err(message) = validate_file(file, field) {
            return UploadOutcome::Rejected(message);
        }
    }

    let Some(_guard) = ActivityGuard::acquire(flags, &field.name) else {
        return UploadOutcome::Ignored;
    };

    if schema_name.is_empty() {
        return UploadOutcome::Rejected(format!(
            "{UPLOAD_FAILED}: Form schema name is required for file uploads"
        ));
    }

    match services
        .file_upload
        .upload_files(schema_name, &field.name, files)
        .await
    {
        Ok(uploaded) => {
            tracing::debug!(field = %field.name, count = uploaded.len(), "files uploaded");
            UploadOutcome::Uploaded(merge_uploaded(current, uploaded, field.allow_multiple))
        }
        Err(err) => {
            tracing::error!(field = %field.name, error = %err, "failed to upload files");
            let message = err.user_message();
            let message = if message.is_empty() {
                UPLOAD_FAILED.to_string()
            } else {
                message
            };
            UploadOutcome::Rejected(format!("{UPLOAD_FAILED}: {message}"))
        }
    }
}
