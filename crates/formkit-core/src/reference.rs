//! Option loading for reference fields.
//!
//! Both rendering paths go through `ReferenceLoader`, which consults the
//! shared `OptionsCache` before calling the lookup services. A failed fetch
//! degrades to an empty list so the field becomes unselectable rather than
//! broken.

use crate::activity::{ActivityFlags, ActivityGuard};
use crate::cache::{api_reference_cache_key, form_reference_cache_key, OptionsCache};
use crate::error::ServiceError;
use crate::services::{FormServices, DEFAULT_API_VALUE_FIELD};
use crate::types::{Field, FieldType, OptionItem};

/// Where a reference field's options come from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ReferenceSource {
    Form {
        form_name: String,
        field_name: String,
    },
    Api {
        endpoint: String,
        label_field: String,
        value_field: String,
    },
}

impl ReferenceSource {
    /// Lookup parameters of a reference field. `None` for other field types
    /// and for incomplete configurations; such fields render disabled.
    pub fn from_field(field: &Field) -> Option<Self> {
        match field.field_type {
            FieldType::FormReference => Some(ReferenceSource::Form {
                form_name: non_empty(&field.reference_form_name)?,
                field_name: non_empty(&field.reference_field_name)?,
            }),
            FieldType::ApiReference => Some(ReferenceSource::Api {
                endpoint: non_empty(&field.api_endpoint)?,
                label_field: non_empty(&field.api_label_field)?,
                value_field: non_empty(&field.api_value_field)
                    .unwrap_or_else(|| DEFAULT_API_VALUE_FIELD.to_string()),
            }),
            _ => None,
        }
    }

    pub fn cache_key(&self) -> String {
        match self {
            ReferenceSource::Form {
                form_name,
                field_name,
            } => form_reference_cache_key(form_name, field_name),
            ReferenceSource::Api {
                endpoint,
                label_field,
                value_field,
            } => api_reference_cache_key(endpoint, label_field, value_field),
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value.as_ref().filter(|s| !s.is_empty()).cloned()
}

pub struct ReferenceLoader<'a> {
    cache: &'a OptionsCache,
    services: &'a FormServices,
    flags: Option<&'a ActivityFlags>,
}

impl<'a> ReferenceLoader<'a> {
    pub fn new(cache: &'a OptionsCache, services: &'a FormServices) -> Self {
        Self {
            cache,
            services,
            flags: None,
        }
    }

    /// Mark fields as loading in `flags` while their fetch is in flight.
    pub fn with_activity(mut self, flags: &'a ActivityFlags) -> Self {
        self.flags = Some(flags);
        self
    }

    /// Options for `source`. A cached entry is used unless `refresh` is set;
    /// fresh results are always written back. Failures yield an empty list.
    pub async fn load(&self, source: &ReferenceSource, refresh: bool) -> Vec<OptionItem> {
        let key = source.cache_key();
        if !refresh {
            if let Some(options) = self.cache.get(&key) {
                tracing::debug!(%key, "reference options served from cache");
                return options;
            }
        }

        match self.fetch(source).await {
            Ok(options) => {
                self.cache.set(key, options.clone());
                options
            }
            Err(err) => {
                tracing::error!(%key, error = %err, "failed to fetch reference options");
                Vec::new()
            }
        }
    }

    /// Options for a reference field, with its loading flag held for the
    /// duration of the fetch. Fields without a complete source get none.
    pub async fn load_for_field(&self, field: &Field, refresh: bool) -> Vec<OptionItem> {
        let Some(source) = ReferenceSource::from_field(field) else {
            return Vec::new();
        };
        let _guard = self
            .flags
            .and_then(|flags| ActivityGuard::acquire(flags, &field.name));
        self.load(&source, refresh).await
    }

    async fn fetch(&self, source: &ReferenceSource) -> Result<Vec<OptionItem>, ServiceError> {
        match source {
            ReferenceSource::Form {
                form_name,
                field_name,
            } => {
                self.services
                    .form_reference
                    .fetch_options(form_name, field_name)
                    .await
            }
            ReferenceSource::Api {
                endpoint,
                label_field,
                value_field,
            } => {
                self.services
                    .api_reference
                    .fetch_options(endpoint, label_field, value_field)
                    .await
            }
        }
    }
}
