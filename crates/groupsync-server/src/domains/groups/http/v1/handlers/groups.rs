use std::collections::HashMap;

use axum::body::Bytes;
use axum::extract::rejection::{BytesRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Response;
use axum::Extension;
use groupsync_core::{Group, Session};

use super::finish;
use crate::app::AppState;
use crate::domains::access_control::{require_mutation, require_permission};
use crate::domains::errors::ApiError;
use crate::domains::groups::http::v1::codec::{decode, encode, GROUP_SHAPE};
use crate::domains::groups::http::v1::params::{Page, PathParams};
use crate::domains::groups::http::v1::types::{PageQuery, StatusResponse};

const RESOURCE: &str = "groups";

#[tracing::instrument(skip_all)]
pub(crate) async fn create_group(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Response, ApiError> {
    finish("create_group", create(&state, &session, body).await)
}

async fn create(
    state: &AppState,
    session: &Session,
    body: Result<Bytes, BytesRejection>,
) -> Result<Response, ApiError> {
    require_mutation(
        state.service.as_ref(),
        &state.access_policy,
        session,
        RESOURCE,
    )?;
    let group: Group = decode(body, GROUP_SHAPE)?;
    let group = state.service.create_group(group).await?;
    tracing::info!(
        event = "group_created",
        group_id = %group.id,
        remote_id = %group.remote_id,
        "Group created"
    );
    encode(StatusCode::CREATED, &group)
}

#[tracing::instrument(skip_all)]
pub(crate) async fn get_group(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    params: Result<Path<HashMap<String, String>>, PathRejection>,
) -> Result<Response, ApiError> {
    finish("get_group", get(&state, &session, params.into()).await)
}

async fn get(state: &AppState, session: &Session, params: PathParams) -> Result<Response, ApiError> {
    let group_id = params.require_group_id()?;
    require_permission(
        state.service.as_ref(),
        &state.access_policy,
        session,
        RESOURCE,
    )?;
    let group = state.service.get_group(&group_id).await?;
    encode(StatusCode::OK, &group)
}

#[tracing::instrument(skip_all)]
pub(crate) async fn list_groups(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> Result<Response, ApiError> {
    finish("list_groups", list(&state, &session, query).await)
}

async fn list(
    state: &AppState,
    session: &Session,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> Result<Response, ApiError> {
    let page = Page::from_query(query)?;
    require_permission(
        state.service.as_ref(),
        &state.access_policy,
        session,
        RESOURCE,
    )?;
    let groups = state
        .service
        .get_groups_page(page.page, page.per_page)
        .await?;
    tracing::debug!(
        event = "groups_listed",
        page = page.page,
        per_page = page.per_page,
        count = groups.len()
    );
    encode(StatusCode::OK, &groups)
}

#[tracing::instrument(skip_all)]
pub(crate) async fn update_group(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    params: Result<Path<HashMap<String, String>>, PathRejection>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Response, ApiError> {
    finish(
        "update_group",
        update(&state, &session, params.into(), body).await,
    )
}

async fn update(
    state: &AppState,
    session: &Session,
    params: PathParams,
    body: Result<Bytes, BytesRejection>,
) -> Result<Response, ApiError> {
    let group_id = params.require_group_id()?;
    require_mutation(
        state.service.as_ref(),
        &state.access_policy,
        session,
        RESOURCE,
    )?;
    let mut group: Group = decode(body, GROUP_SHAPE)?;
    group.id = group_id;
    let group = state.service.update_group(group).await?;
    tracing::info!(event = "group_updated", group_id = %group.id, "Group updated");
    encode(StatusCode::OK, &group)
}

#[tracing::instrument(skip_all)]
pub(crate) async fn delete_group(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    params: Result<Path<HashMap<String, String>>, PathRejection>,
) -> Result<Response, ApiError> {
    finish("delete_group", delete(&state, &session, params.into()).await)
}

async fn delete(
    state: &AppState,
    session: &Session,
    params: PathParams,
) -> Result<Response, ApiError> {
    let group_id = params.require_group_id()?;
    require_mutation(
        state.service.as_ref(),
        &state.access_policy,
        session,
        RESOURCE,
    )?;
    let group = state.service.delete_group(&group_id).await?;
    tracing::info!(event = "group_deleted", group_id = %group.id, "Group deleted");
    encode(StatusCode::OK, &StatusResponse::ok())
}
