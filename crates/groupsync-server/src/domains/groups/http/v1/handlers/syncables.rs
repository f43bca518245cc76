use std::collections::HashMap;

use axum::body::Bytes;
use axum::extract::rejection::{BytesRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Response;
use axum::Extension;
use groupsync_core::{GroupSyncable, GroupSyncablePatch, Session};

use super::finish;
use crate::app::AppState;
use crate::domains::access_control::{require_mutation, require_permission};
use crate::domains::errors::ApiError;
use crate::domains::groups::http::v1::codec::{decode, decode_syncable, encode, syncable_patch_shape};
use crate::domains::groups::http::v1::params::{is_valid_id, Page, PathParams};
use crate::domains::groups::http::v1::types::PageQuery;
use crate::domains::groups::http::v1::SyncableKind;

const RESOURCE: &str = "group_syncables";

#[tracing::instrument(skip_all, fields(syncable_type = K::TYPE.as_str()))]
pub(crate) async fn create_syncable<K: SyncableKind>(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    params: Result<Path<HashMap<String, String>>, PathRejection>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Response, ApiError> {
    finish(
        "create_group_syncable",
        create::<K>(&state, &session, params.into(), body).await,
    )
}

async fn create<K: SyncableKind>(
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
    let mut syncable = decode_syncable(body, K::TYPE)?;
    if !is_valid_id(&syncable.syncable_id) {
        return Err(ApiError::invalid_parameter(K::TYPE.param_name()));
    }
    syncable.group_id = group_id;
    let syncable = state.service.create_group_syncable(syncable).await?;
    tracing::info!(
        event = "group_syncable_created",
        group_id = %syncable.group_id,
        syncable_id = %syncable.syncable_id,
        "Group syncable created"
    );
    encode(StatusCode::CREATED, &syncable)
}

#[tracing::instrument(skip_all, fields(syncable_type = K::TYPE.as_str()))]
pub(crate) async fn get_syncable<K: SyncableKind>(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    params: Result<Path<HashMap<String, String>>, PathRejection>,
) -> Result<Response, ApiError> {
    finish(
        "get_group_syncable",
        get::<K>(&state, &session, params.into()).await,
    )
}

async fn get<K: SyncableKind>(
    state: &AppState,
    session: &Session,
    params: PathParams,
) -> Result<Response, ApiError> {
    let group_id = params.require_group_id()?;
    let syncable_id = params.require_syncable_id(K::TYPE)?;
    require_permission(
        state.service.as_ref(),
        &state.access_policy,
        session,
        RESOURCE,
    )?;
    let syncable = state
        .service
        .get_group_syncable(&group_id, &syncable_id, K::TYPE)
        .await?;
    encode(StatusCode::OK, &syncable)
}

#[tracing::instrument(skip_all, fields(syncable_type = K::TYPE.as_str()))]
pub(crate) async fn list_syncables<K: SyncableKind>(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    params: Result<Path<HashMap<String, String>>, PathRejection>,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> Result<Response, ApiError> {
    finish(
        "list_group_syncables",
        list::<K>(&state, &session, params.into(), query).await,
    )
}

async fn list<K: SyncableKind>(
    state: &AppState,
    session: &Session,
    params: PathParams,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> Result<Response, ApiError> {
    let group_id = params.require_group_id()?;
    let page = Page::from_query(query)?;
    require_permission(
        state.service.as_ref(),
        &state.access_policy,
        session,
        RESOURCE,
    )?;
    let syncables: Vec<GroupSyncable> = state
        .service
        .get_group_syncables_page(&group_id, K::TYPE, page.page, page.per_page)
        .await?;
    encode(StatusCode::OK, &syncables)
}

#[tracing::instrument(skip_all, fields(syncable_type = K::TYPE.as_str()))]
pub(crate) async fn update_syncable<K: SyncableKind>(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    params: Result<Path<HashMap<String, String>>, PathRejection>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Response, ApiError> {
    finish(
        "update_group_syncable",
        update::<K>(&state, &session, params.into(), body).await,
    )
}

/// Identity comes from the path; the patch only carries the flags.
async fn update<K: SyncableKind>(
    state: &AppState,
    session: &Session,
    params: PathParams,
    body: Result<Bytes, BytesRejection>,
) -> Result<Response, ApiError> {
    let group_id = params.require_group_id()?;
    let syncable_id = params.require_syncable_id(K::TYPE)?;
    require_mutation(
        state.service.as_ref(),
        &state.access_policy,
        session,
        RESOURCE,
    )?;
    let patch: GroupSyncablePatch = decode(body, &syncable_patch_shape())?;
    let syncable = GroupSyncable::from_patch(&group_id, &syncable_id, K::TYPE, &patch);
    let syncable = state.service.update_group_syncable(syncable).await?;
    tracing::info!(
        event = "group_syncable_updated",
        group_id = %syncable.group_id,
        syncable_id = %syncable.syncable_id,
        auto_add = syncable.auto_add,
        can_leave = syncable.can_leave,
        "Group syncable updated"
    );
    encode(StatusCode::OK, &syncable)
}

#[tracing::instrument(skip_all, fields(syncable_type = K::TYPE.as_str()))]
pub(crate) async fn delete_syncable<K: SyncableKind>(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    params: Result<Path<HashMap<String, String>>, PathRejection>,
) -> Result<Response, ApiError> {
    finish(
        "delete_group_syncable",
        delete::<K>(&state, &session, params.into()).await,
    )
}

async fn delete<K: SyncableKind>(
    state: &AppState,
    session: &Session,
    params: PathParams,
) -> Result<Response, ApiError> {
    let group_id = params.require_group_id()?;
    let syncable_id = params.require_syncable_id(K::TYPE)?;
    require_mutation(
        state.service.as_ref(),
        &state.access_policy,
        session,
        RESOURCE,
    )?;
    let syncable = state
        .service
        .delete_group_syncable(&group_id, &syncable_id, K::TYPE)
        .await?;
    tracing::info!(
        event = "group_syncable_deleted",
        group_id = %syncable.group_id,
        syncable_id = %syncable.syncable_id,
        "Group syncable deleted"
    );
    encode(StatusCode::OK, &syncable)
}
