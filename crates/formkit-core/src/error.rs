//! Error types for the form core.
//!
//! Validation failures are never errors: they surface as per-field
//! messages. These types cover schema loading and collaborator calls.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FormError {
    /// Schema or value JSON could not be decoded.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Schema YAML could not be decoded.
    #[error("invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A collaborator service failed.
    #[error(transparent)]
    Service(#[from] ServiceError),
}

/// Failure reported by an injected collaborator (upload, lookup).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ServiceError {
    /// The host never supplied an implementation.
    #[error("{0}")]
    NotProvided(&'static str),

    /// The collaborator ran and rejected the request.
    #[error("{message}")]
    Rejected {
        message: String,
        /// Response body, when the collaborator had one.
        response: Option<serde_json::Value>,
    },
}

impl ServiceError {
    pub fn rejected(message: impl Into<String>) -> Self {
        ServiceError::Rejected {
            message: message.into(),
            response: None,
        }
    }

    /// Best human-readable message: a `message` inside the response body
    /// wins over the error's own text.
    pub fn user_message(&self) -> String {
        if let ServiceError::Rejected {
            response: Some(body),
            ..
        } = self
        {
            if let Some(msg) = body.get("message").and_then(|m| m.as_str()) {
                if !msg.is_empty() {
                    return msg.to_string();
                }
            }
        }
        self.to_string()
    }
}
