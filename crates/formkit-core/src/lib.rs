pub mod activity;
pub mod behavior;
pub mod cache;
pub mod error;
pub mod ffi;
pub mod files;
pub mod layout;
pub mod normalize;
pub mod reference;
pub mod rules;
pub mod sanitize;
pub mod services;
pub mod session;
pub mod types;
pub mod upload;
pub mod validator;
pub mod view;

pub use activity::ActivityFlags;
pub use behavior::FieldBehavior;
pub use cache::{
    api_reference_cache_key, form_reference_cache_key, Clock, ManualClock, OptionsCache,
    SystemClock, DEFAULT_OPTIONS_TTL,
};
pub use error::{FormError, ServiceError};
pub use ffi::{
    defaults_to_json, normalize_to_json, transform_to_json, validate_schema_to_json, view_to_json,
};
pub use files::{accept_attribute, format_file_size, merge_uploaded, validate_file};
pub use layout::{grid_columns, FormLayout, Stepper};
pub use normalize::{
    get_default_value, initial_form_values, normalize_initial_values, transform_form_values,
};
pub use reference::{ReferenceLoader, ReferenceSource};
pub use rules::{build_field_rules, normalize_options, FieldRules, Validator};
pub use sanitize::{escape_html, sanitize_html};
pub use services::{
    ApiReferenceService, DateFormatter, DefaultDateFormatter, FileUploadService,
    FormReferenceService, FormServices,
};
pub use session::{
    submit_error_message, FormSession, SubmitHandler, SubmitOutcome, SubmitRejection,
};
pub use types::*;
pub use upload::{upload_field_files, UploadOutcome};
pub use validator::validate_schema;
pub use view::{format_field_value, load_view_options, render_view, ViewContext, ViewEntry, EMPTY_DISPLAY};
