use std::collections::HashMap;

use axum::body::Bytes;
use axum::extract::rejection::{BytesRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Response;
use axum::Extension;
use groupsync_core::Session;

use super::finish;
use crate::app::AppState;
use crate::domains::access_control::require_mutation;
use crate::domains::errors::ApiError;
use crate::domains::groups::http::v1::codec::{decode, encode, MEMBER_SHAPE};
use crate::domains::groups::http::v1::params::{is_valid_id, PathParams};
use crate::domains::groups::http::v1::types::MemberRequest;

const RESOURCE: &str = "group_members";

/// Which membership change a request performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MemberAction {
    Create,
    Delete,
}

impl MemberAction {
    const fn operation(self) -> &'static str {
        match self {
            Self::Create => "create_group_member",
            Self::Delete => "delete_group_member",
        }
    }

    const fn success_status(self) -> StatusCode {
        match self {
            Self::Create => StatusCode::CREATED,
            Self::Delete => StatusCode::OK,
        }
    }
}

#[tracing::instrument(skip_all)]
pub(crate) async fn create_member(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    params: Result<Path<HashMap<String, String>>, PathRejection>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Response, ApiError> {
    let action = MemberAction::Create;
    finish(
        action.operation(),
        change_member(&state, &session, params.into(), action, Some(body)).await,
    )
}

#[tracing::instrument(skip_all)]
pub(crate) async fn delete_member(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    params: Result<Path<HashMap<String, String>>, PathRejection>,
) -> Result<Response, ApiError> {
    let action = MemberAction::Delete;
    finish(
        action.operation(),
        change_member(&state, &session, params.into(), action, None).await,
    )
}

/// Delete takes the user id from the path; create reads it from the body.
async fn change_member(
    state: &AppState,
    session: &Session,
    params: PathParams,
    action: MemberAction,
    body: Option<Result<Bytes, BytesRejection>>,
) -> Result<Response, ApiError> {
    let group_id = params.require_group_id()?;
    let path_user_id = match action {
        MemberAction::Delete => Some(params.require_user_id()?),
        MemberAction::Create => None,
    };
    require_mutation(
        state.service.as_ref(),
        &state.access_policy,
        session,
        RESOURCE,
    )?;
    let user_id = match path_user_id {
        Some(user_id) => user_id,
        None => body_user_id(body.unwrap_or_else(|| Ok(Bytes::new())))?,
    };

    let member = match action {
        MemberAction::Create => {
            state
                .service
                .create_group_member(&group_id, &user_id)
                .await?
        }
        MemberAction::Delete => {
            state
                .service
                .delete_group_member(&group_id, &user_id)
                .await?
        }
    };
    tracing::info!(
        event = action.operation(),
        group_id = %member.group_id,
        user_id = %member.user_id,
        "Group membership changed"
    );
    encode(action.success_status(), &member)
}

fn body_user_id(body: Result<Bytes, BytesRejection>) -> Result<String, ApiError> {
    let request: MemberRequest = decode(body, MEMBER_SHAPE)?;
    if !is_valid_id(&request.user_id) {
        return Err(ApiError::invalid_parameter(MEMBER_SHAPE));
    }
    Ok(request.user_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn actions_pick_status() {
        assert_eq!(MemberAction::Create.success_status(), StatusCode::CREATED);
        assert_eq!(MemberAction::Delete.success_status(), StatusCode::OK);
        assert_ne!(
            MemberAction::Create.operation(),
            MemberAction::Delete.operation()
        );
    }

    #[test]
    fn body_user_id_is_validated() {
        let ok = body_user_id(Ok(Bytes::from_static(br#"{"user_id":"u1"}"#))).expect("user id");
        assert_eq!(ok, "u1");

        for payload in [&br#"{"user_id":"u 1"}"#[..], br#"{}"#, b"null", b""] {
            let err = body_user_id(Ok(Bytes::from_static(payload))).expect_err("invalid");
            assert!(matches!(err, ApiError::InvalidParameter { ref name } if name == "user_id"));
        }
    }
}
