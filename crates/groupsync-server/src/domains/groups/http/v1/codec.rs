use axum::body::{Body, Bytes};
use axum::extract::rejection::BytesRejection;
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::Response;
use groupsync_core::{GroupSyncable, GroupSyncableType};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::domains::errors::ApiError;

pub(crate) const GROUP_SHAPE: &str = "group";
pub(crate) const MEMBER_SHAPE: &str = "user_id";

pub(crate) fn syncable_shape() -> String {
    format!("Group[{}]", GroupSyncableType::alternatives())
}

pub(crate) fn syncable_patch_shape() -> String {
    format!("Group[{}]Patch", GroupSyncableType::alternatives())
}

/// A body over the configured limit is the caller's fault; anything else
/// that stops the body from being buffered is an io fault.
pub(crate) fn read_body(body: Result<Bytes, BytesRejection>) -> Result<Bytes, ApiError> {
    body.map_err(|err| {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::PayloadTooLarge(err.body_text())
        } else {
            ApiError::BodyRead(err.body_text())
        }
    })
}

/// Parses a JSON body. `null` counts as a malformed payload.
pub(crate) fn decode<T: DeserializeOwned>(
    body: Result<Bytes, BytesRejection>,
    shape: &str,
) -> Result<T, ApiError> {
    let bytes = read_body(body)?;
    match serde_json::from_slice::<Option<T>>(&bytes) {
        Ok(Some(value)) => Ok(value),
        Ok(None) => Err(ApiError::invalid_parameter(shape)),
        Err(err) => {
            tracing::debug!(event = "payload_rejected", shape = shape, error = %err);
            Err(ApiError::invalid_parameter(shape))
        }
    }
}

/// Decodes a syncable whose `type` must match the endpoint it was sent to.
pub(crate) fn decode_syncable(
    body: Result<Bytes, BytesRejection>,
    expected: GroupSyncableType,
) -> Result<GroupSyncable, ApiError> {
    let shape = syncable_shape();
    let syncable: GroupSyncable = decode(body, &shape)?;
    if syncable.syncable_type != expected {
        tracing::debug!(
            event = "payload_rejected",
            expected = expected.as_str(),
            actual = syncable.syncable_type.as_str()
        );
        return Err(ApiError::invalid_parameter(shape));
    }
    Ok(syncable)
}

pub(crate) fn encode<T: Serialize>(status: StatusCode, value: &T) -> Result<Response, ApiError> {
    let bytes = serde_json::to_vec(value).map_err(|err| ApiError::Serialization(err.to_string()))?;
    let mut response = Response::new(Body::from(bytes));
    *response.status_mut() = status;
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    Ok(response)
}
