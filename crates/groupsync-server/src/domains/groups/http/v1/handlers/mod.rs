use axum::response::Response;

use crate::domains::errors::ApiError;
use crate::infra::metrics;

pub(crate) mod groups;
pub(crate) mod members;
pub(crate) mod syncables;

/// Records the outcome of a group operation and hands the result back.
fn finish(
    operation: &'static str,
    result: Result<Response, ApiError>,
) -> Result<Response, ApiError> {
    match &result {
        Ok(_) => metrics::group_operation(operation, "ok"),
        Err(err) => metrics::group_operation(operation, err.kind()),
    }
    result
}
