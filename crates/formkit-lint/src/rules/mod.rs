//! Built-in lint rules.

pub mod duplicate_options;
pub mod label_quality;
pub mod naming_convention;
pub mod section_size;

pub use duplicate_options::DuplicateOptionsRule;
pub use label_quality::LabelQualityRule;
pub use naming_convention::NamingConventionRule;
pub use section_size::SectionSizeRule;
