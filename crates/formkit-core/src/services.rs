//! Collaborator interfaces supplied by the host application.
//!
//! Network services default to stubs that always fail, so upload and
//! reference features only work once the host injects real ones. Date
//! formatting has a working default.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde_json::Value;

use crate::error::ServiceError;
use crate::normalize::{is_truthy, value_to_text};
use crate::types::{DatePickerMode, OptionItem, PendingFile, UploadedFile};
use crate::view::EMPTY_DISPLAY;

/// Value field used by API lookups that do not name one.
pub const DEFAULT_API_VALUE_FIELD: &str = "_id";

#[async_trait(?Send)]
pub trait FileUploadService {
    async fn upload_files(
        &self,
        form_name: &str,
        field_name: &str,
        files: &[PendingFile],
    ) -> Result<Vec<UploadedFile>, ServiceError>;
}

#[async_trait(?Send)]
pub trait FormReferenceService {
    async fn fetch_options(
        &self,
        form_name: &str,
        field_name: &str,
    ) -> Result<Vec<OptionItem>, ServiceError>;
}

#[async_trait(?Send)]
pub trait ApiReferenceService {
    async fn fetch_options(
        &self,
        endpoint: &str,
        label_field: &str,
        value_field: &str,
    ) -> Result<Vec<OptionItem>, ServiceError>;
}

pub trait DateFormatter {
    /// Display text for a date value in the given picker mode.
    fn format(&self, value: &Value, mode: DatePickerMode) -> String;
}

/// The set of collaborators a form is rendered with.
#[derive(Clone)]
pub struct FormServices {
    pub file_upload: Arc<dyn FileUploadService>,
    pub form_reference: Arc<dyn FormReferenceService>,
    pub api_reference: Arc<dyn ApiReferenceService>,
    pub date_formatter: Arc<dyn DateFormatter>,
}

impl FormServices {
    pub fn with_file_upload(mut self, service: Arc<dyn FileUploadService>) -> Self {
        self.file_upload = service;
        self
    }

    pub fn with_form_reference(mut self, service: Arc<dyn FormReferenceService>) -> Self {
        self.form_reference = service;
        self
    }

    pub fn with_api_reference(mut self, service: Arc<dyn ApiReferenceService>) -> Self {
        self.api_reference = service;
        self
    }

    pub fn with_date_formatter(mut self, formatter: Arc<dyn DateFormatter>) -> Self {
        self.date_formatter = formatter;
        self
    }
}

impl Default for FormServices {
    fn default() -> Self {
        Self {
            file_upload: Arc::new(MissingService),
            form_reference: Arc::new(MissingService),
            api_reference: Arc::new(MissingService),
            date_formatter: Arc::new(DefaultDateFormatter),
        }
    }
}

// ---------------------------------------------------------------------------
// Stubs
// ---------------------------------------------------------------------------

/// Stand-in for every network collaborator the host did not provide.
#[derive(Debug, Default, Clone, Copy)]
pub struct MissingService;

#[async_trait(?Send)]
impl FileUploadService for MissingService {
    async fn upload_files(
        &self,
        _form_name: &str,
        _field_name: &str,
        _files: &[PendingFile],
    ) -> Result<Vec<UploadedFile>, ServiceError> {
        Err(ServiceError::NotProvided(
            "File upload service not provided. Please provide a fileUpload service in FormServices.",
        ))
    }
}

#[async_trait(?Send)]
impl FormReferenceService for MissingService {
    async fn fetch_options(
        &self,
        _form_name: &str,
        _field_name: &str,
    ) -> Result<Vec<OptionItem>, ServiceError> {
        Err(ServiceError::NotProvided(
            "Form reference service not provided. Please provide a formReference service in FormServices.",
        ))
    }
}

#[async_trait(?Send)]
impl ApiReferenceService for MissingService {
    async fn fetch_options(
        &self,
        _endpoint: &str,
        _label_field: &str,
        _value_field: &str,
    ) -> Result<Vec<OptionItem>, ServiceError> {
        Err(ServiceError::NotProvided(
            "API reference service not provided. Please provide an apiReference service in FormServices.",
        ))
    }
}

// ---------------------------------------------------------------------------
// Default date formatter
// ---------------------------------------------------------------------------

/// `DD/MM/YYYY`, `hh:mm AM`, or both, depending on the picker mode.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultDateFormatter;

impl DateFormatter for DefaultDateFormatter {
    fn format(&self, value: &Value, mode: DatePickerMode) -> String {
        if !is_truthy(value) {
            return EMPTY_DISPLAY.to_string();
        }
        let Some(parsed) = parse_date_value(value) else {
            return value_to_text(value);
        };
        let pattern = match mode {
            DatePickerMode::Date => "%d/%m/%Y",
            DatePickerMode::Time => "%I:%M %p",
            DatePickerMode::Datetime => "%d/%m/%Y %I:%M %p",
        };
        parsed.format(pattern).to_string()
    }
}

/// Parse the date shapes pickers and APIs commonly produce.
pub fn parse_date_value(value: &Value) -> Option<NaiveDateTime> {
    match value {
        Value::Number(n) => {
            DateTime::<Utc>::from_timestamp_millis(n.as_i64()?).map(|d| d.naive_utc())
        }
        Value::String(s) => parse_date_text(s.trim()),
        _ => None,
    }
}

fn parse_date_text(text: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.naive_utc());
    }
    for pattern in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, pattern) {
            return Some(dt);
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0);
    }
    for pattern in ["%H:%M:%S", "%H:%M"] {
        if let Ok(time) = NaiveTime::parse_from_str(text, pattern) {
            return NaiveDate::from_ymd_opt(1970, 1, 1).map(|d| d.and_time(time));
        }
    }
    None
}
