use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured failure reported by a [`crate::GroupService`]. The HTTP layer
/// passes `status_code` through unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize, JsonSchema)]
#[error("{id}: {message}")]
pub struct AppError {
    pub id: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub detailed_error: String,
    pub status_code: u16,
}

pub type ServiceResult<T> = Result<T, AppError>;

impl AppError {
    #[must_use]
    pub fn new(id: impl Into<String>, message: impl Into<String>, status_code: u16) -> Self {
        Self {
            id: id.into(),
            message: message.into(),
            detailed_error: String::new(),
            status_code,
        }
    }

    #[must_use]
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detailed_error = detail.into();
        self
    }

    #[must_use]
    pub fn bad_request(id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(id, message, 400)
    }

    #[must_use]
    pub fn unauthorized(id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(id, message, 401)
    }

    #[must_use]
    pub fn not_found(id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(id, message, 404)
    }

    #[must_use]
    pub fn conflict(id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(id, message, 409)
    }

    #[must_use]
    pub fn internal(id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(id, message, 500)
    }
}
