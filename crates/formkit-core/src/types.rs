use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::FormError;

/// Field name → value. Shapes follow the field's `{type, allowMultiple}`.
pub type ValueMap = serde_json::Map<String, Value>;

// ---------------------------------------------------------------------------
// Field types
// ---------------------------------------------------------------------------

/// Closed set of input kinds a schema may declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldType {
    Text,
    Email,
    Number,
    Select,
    Checkbox,
    Radio,
    Datepicker,
    File,
    #[serde(alias = "ckeditor")]
    Richtext,
    Toggle,
    Color,
    FormReference,
    ApiReference,
}

impl FieldType {
    pub const ALL: [FieldType; 13] = [
        FieldType::Text,
        FieldType::Email,
        FieldType::Number,
        FieldType::Select,
        FieldType::Checkbox,
        FieldType::Radio,
        FieldType::Datepicker,
        FieldType::File,
        FieldType::Richtext,
        FieldType::Toggle,
        FieldType::Color,
        FieldType::FormReference,
        FieldType::ApiReference,
    ];

    /// Wire name as it appears in schema JSON.
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Email => "email",
            FieldType::Number => "number",
            FieldType::Select => "select",
            FieldType::Checkbox => "checkbox",
            FieldType::Radio => "radio",
            FieldType::Datepicker => "datepicker",
            FieldType::File => "file",
            FieldType::Richtext => "richtext",
            FieldType::Toggle => "toggle",
            FieldType::Color => "color",
            FieldType::FormReference => "formReference",
            FieldType::ApiReference => "apiReference",
        }
    }

    /// Select-like types whose value is one option value or a list of them.
    pub fn is_choice(&self) -> bool {
        matches!(
            self,
            FieldType::Select | FieldType::FormReference | FieldType::ApiReference
        )
    }

    pub fn is_reference(&self) -> bool {
        matches!(self, FieldType::FormReference | FieldType::ApiReference)
    }
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatePickerMode {
    #[default]
    Date,
    Datetime,
    Time,
}

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Option value: string or number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
    String(String),
    Number(serde_json::Number),
}

impl OptionValue {
    /// Loose equality against a stored value, comparing textual forms.
    pub fn matches_loose(&self, value: &Value) -> bool {
        match (self, value) {
            (OptionValue::String(s), Value::String(v)) => s == v,
            (OptionValue::Number(n), Value::Number(v)) => n == v,
            _ => self.to_string() == crate::normalize::value_to_text(value),
        }
    }

    /// Strict equality: same JSON type and same value.
    pub fn matches_strict(&self, value: &Value) -> bool {
        match (self, value) {
            (OptionValue::String(s), Value::String(v)) => s == v,
            (OptionValue::Number(n), Value::Number(v)) => n == v,
            _ => false,
        }
    }

    pub fn to_value(&self) -> Value {
        match self {
            OptionValue::String(s) => Value::String(s.clone()),
            OptionValue::Number(n) => Value::Number(n.clone()),
        }
    }
}

impl std::fmt::Display for OptionValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OptionValue::String(s) => f.write_str(s),
            OptionValue::Number(n) => write!(f, "{n}"),
        }
    }
}

impl From<&str> for OptionValue {
    fn from(s: &str) -> Self {
        OptionValue::String(s.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionItem {
    pub label: String,
    pub value: OptionValue,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
}

impl OptionItem {
    pub fn new(label: impl Into<String>, value: impl Into<OptionValue>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            icon: None,
            group: None,
        }
    }
}

/// Entry in a field's `options` list: a full item or a legacy plain string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionEntry {
    Item(OptionItem),
    Plain(String),
}

// ---------------------------------------------------------------------------
// Fields
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldValidation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    /// Bytes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_file_size: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed_file_types: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub label: String,
    pub name: String,
    #[serde(default)]
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_filter: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<OptionEntry>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation: Option<FieldValidation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_form_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_field_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_endpoint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_label_field: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_value_field: Option<String>,
    #[serde(default)]
    pub allow_multiple: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_picker_mode: Option<DatePickerMode>,
    /// Legacy switch superseded by `datePickerMode`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_time: Option<bool>,
}

impl Field {
    /// Minimal field of the given type; everything optional left unset.
    pub fn new(field_type: FieldType, name: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            field_type,
            label: label.into(),
            name: name.into(),
            required: false,
            placeholder: None,
            allow_filter: None,
            options: None,
            validation: None,
            reference_form_name: None,
            reference_field_name: None,
            api_endpoint: None,
            reference_model: None,
            api_label_field: None,
            api_value_field: None,
            allow_multiple: false,
            date_picker_mode: None,
            display_time: None,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn multiple(mut self) -> Self {
        self.allow_multiple = true;
        self
    }

    pub fn date_mode(&self) -> DatePickerMode {
        match self.date_picker_mode {
            Some(mode) => mode,
            None if self.display_time == Some(true) => DatePickerMode::Datetime,
            None => DatePickerMode::Date,
        }
    }
}

// ---------------------------------------------------------------------------
// Sections and schema
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub fields: Vec<Field>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    #[default]
    Panel,
    Stepper,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormKind {
    System,
    Custom,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section_display_mode: Option<DisplayMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields_per_row: Option<i64>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schema {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub object_id: Option<String>,
    /// Legacy identifier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub module: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub form_type: Option<FormKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collection_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sections: Option<Vec<Section>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<Field>>,
    #[serde(default)]
    pub settings: SchemaSettings,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl Schema {
    pub fn new(name: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            object_id: None,
            id: None,
            name: name.into(),
            title: title.into(),
            module: None,
            form_type: None,
            collection_name: None,
            sections: None,
            fields: None,
            settings: SchemaSettings::default(),
            created_at: None,
            updated_at: None,
        }
    }

    pub fn with_fields(mut self, fields: Vec<Field>) -> Self {
        self.fields = Some(fields);
        self
    }

    pub fn with_sections(mut self, sections: Vec<Section>) -> Self {
        self.sections = Some(sections);
        self
    }

    pub fn from_json(input: &str) -> Result<Self, FormError> {
        Ok(serde_json::from_str(input)?)
    }

    pub fn from_yaml(input: &str) -> Result<Self, FormError> {
        Ok(serde_yaml::from_str(input)?)
    }

    /// True when non-empty sections drive rendering.
    pub fn uses_sections(&self) -> bool {
        self.sections.as_ref().is_some_and(|s| !s.is_empty())
    }

    /// Fields in render order: flattened sections when present, else the
    /// legacy flat list.
    pub fn effective_fields(&self) -> Vec<&Field> {
        if self.uses_sections() {
            self.sections
                .iter()
                .flatten()
                .flat_map(|section| section.fields.iter())
                .collect()
        } else {
            self.fields.iter().flatten().collect()
        }
    }

    /// Effective fields paired with their path inside the schema, e.g.
    /// `sections[1].fields[0]` or `fields[3]`.
    pub fn located_fields(&self) -> Vec<(String, &Field)> {
        if self.uses_sections() {
            self.sections
                .iter()
                .flatten()
                .enumerate()
                .flat_map(|(si, section)| {
                    section
                        .fields
                        .iter()
                        .enumerate()
                        .map(move |(fi, f)| (format!("sections[{si}].fields[{fi}]"), f))
                })
                .collect()
        } else {
            self.fields
                .iter()
                .flatten()
                .enumerate()
                .map(|(fi, f)| (format!("fields[{fi}]"), f))
                .collect()
        }
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.effective_fields().into_iter().find(|f| f.name == name)
    }
}

// ---------------------------------------------------------------------------
// Files
// ---------------------------------------------------------------------------

/// Descriptor of a file already stored by the upload service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedFile {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub file_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_name: Option<String>,
    #[serde(default)]
    pub file_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

impl UploadedFile {
    /// Read a host record. Known keys with an unexpected type are kept
    /// verbatim in `extra` instead of failing the whole descriptor.
    pub fn from_object(obj: &serde_json::Map<String, Value>) -> Self {
        let mut file = UploadedFile::default();
        for (key, value) in obj {
            match (key.as_str(), value) {
                ("_id", Value::String(s)) => file.id = Some(s.clone()),
                ("fileName", Value::String(s)) => file.file_name = s.clone(),
                ("originalName", Value::String(s)) => file.original_name = Some(s.clone()),
                ("fileUrl", Value::String(s)) => file.file_url = s.clone(),
                ("mimeType", Value::String(s)) => file.mime_type = Some(s.clone()),
                ("size", Value::Number(n)) if n.is_u64() => file.size = n.as_u64(),
                _ => {
                    file.extra.insert(key.clone(), value.clone());
                }
            }
        }
        file
    }
}

/// A file picked by the user but not uploaded yet.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PendingFile {
    pub name: String,
    pub size: u64,
    pub mime_type: Option<String>,
    pub data: Vec<u8>,
}

impl PendingFile {
    pub fn new(name: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            size: data.len() as u64,
            mime_type: None,
            data,
        }
    }
}

/// A file slot's content: not yet uploaded, or stored externally.
#[derive(Debug, Clone, PartialEq)]
pub enum FileValue {
    Pending(PendingFile),
    Stored(UploadedFile),
}

impl FileValue {
    /// Classify a JSON value. Objects carrying `fileName` or `fileUrl` are
    /// stored descriptors; objects with `name` and `size` describe a pending
    /// handle; anything else is not a file.
    pub fn from_json(value: &Value) -> Option<FileValue> {
        let obj = value.as_object()?;
        if obj.contains_key("fileName") || obj.contains_key("fileUrl") {
            return Some(FileValue::Stored(UploadedFile::from_object(obj)));
        }
        let name = obj.get("name")?.as_str()?;
        let size = obj.get("size")?.as_u64()?;
        Some(FileValue::Pending(PendingFile {
            name: name.to_string(),
            size,
            mime_type: obj
                .get("type")
                .and_then(Value::as_str)
                .map(str::to_string),
            data: Vec::new(),
        }))
    }

    pub fn is_stored(&self) -> bool {
        matches!(self, FileValue::Stored(_))
    }
}

// ---------------------------------------------------------------------------
// Diagnostics
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub code: String,
    pub severity: DiagnosticSeverity,
    /// Location inside the schema, e.g. `sections[0].fields[2]`.
    pub path: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticSeverity {
    Error,
    Warning,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidateResult {
    pub errors: Vec<Diagnostic>,
    pub warnings: Vec<Diagnostic>,
}

impl ValidateResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}
