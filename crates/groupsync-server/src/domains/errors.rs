use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use groupsync_core::{AppError, LicenseFeature, Permission};
use schemars::JsonSchema;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Serialize, JsonSchema)]
pub(crate) struct ErrorResponse {
    pub(crate) error: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) param: Option<String>,
}

impl ErrorResponse {
    pub(crate) const fn new(error: &'static str) -> Self {
        Self { error, param: None }
    }
}

/// Terminal failure of a group API request. The first error raised by a
/// handler is the one written to the client.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid_parameter: {name}")]
    InvalidParameter { name: String },
    #[error("permission_denied: {}", .permission.as_str())]
    PermissionDenied { permission: Permission },
    #[error("license_required: {}", .feature.as_str())]
    FeatureUnavailable { feature: LicenseFeature },
    #[error(transparent)]
    Upstream(#[from] AppError),
    #[error("marshal_error: {0}")]
    Serialization(String),
    #[error("payload_too_large: {0}")]
    PayloadTooLarge(String),
    #[error("io_error: {0}")]
    BodyRead(String),
}

impl ApiError {
    pub fn invalid_parameter(name: impl Into<String>) -> Self {
        Self::InvalidParameter { name: name.into() }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidParameter { .. } => StatusCode::BAD_REQUEST,
            Self::PermissionDenied { .. } => StatusCode::FORBIDDEN,
            Self::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            Self::FeatureUnavailable { .. } | Self::Serialization(_) | Self::BodyRead(_) => {
                StatusCode::NOT_IMPLEMENTED
            }
            Self::Upstream(err) => StatusCode::from_u16(err.status_code)
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        }
    }

    /// Short label used for the operation outcome metric.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidParameter { .. } => "invalid_parameter",
            Self::PermissionDenied { .. } => "forbidden",
            Self::FeatureUnavailable { .. } => "license_required",
            Self::Upstream(_) => "upstream",
            Self::Serialization(_) => "marshal_error",
            Self::PayloadTooLarge(_) => "payload_too_large",
            Self::BodyRead(_) => "io_error",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(event = "request_failed", kind = self.kind(), error = %self);
        } else {
            tracing::warn!(event = "request_rejected", kind = self.kind(), error = %self);
        }
        match self {
            Self::InvalidParameter { name } => (
                status,
                Json(ErrorResponse {
                    error: "invalid_parameter",
                    param: Some(name),
                }),
            )
                .into_response(),
            Self::PermissionDenied { .. } => status.into_response(),
            Self::FeatureUnavailable { .. } => {
                (status, Json(ErrorResponse::new("license_required"))).into_response()
            }
            Self::Upstream(err) => (status, Json(err)).into_response(),
            Self::Serialization(_) => {
                (status, Json(ErrorResponse::new("marshal_error"))).into_response()
            }
            Self::PayloadTooLarge(_) => {
                (status, Json(ErrorResponse::new("payload_too_large"))).into_response()
            }
            Self::BodyRead(_) => (status, Json(ErrorResponse::new("io_error"))).into_response(),
        }
    }
}
