use aide::axum::{
    routing::{delete, get, post},
    ApiRouter,
};
use aide::openapi::{Info, OpenApi};
use axum::extract::{Path, Query};
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use groupsync_core::{
    Group, GroupMember, GroupSource, GroupSyncable, GroupSyncablePatch, GroupSyncableType,
};
use schemars::JsonSchema;
use serde::Deserialize;

use crate::app::AppState;
use crate::domains::groups::http::v1::types::{MemberRequest, PageQuery, StatusResponse};
use crate::domains::groups::http::v1::BASE_PATH;
use crate::http::routes::health::HealthResponse;

#[derive(Deserialize, JsonSchema)]
struct GroupPath {
    #[allow(dead_code)]
    group_id: String,
}

#[derive(Deserialize, JsonSchema)]
struct MemberPath {
    #[allow(dead_code)]
    group_id: String,
    #[allow(dead_code)]
    user_id: String,
}

#[derive(Deserialize, JsonSchema)]
struct TeamPath {
    #[allow(dead_code)]
    group_id: String,
    #[allow(dead_code)]
    team_id: String,
}

#[derive(Deserialize, JsonSchema)]
struct ChannelPath {
    #[allow(dead_code)]
    group_id: String,
    #[allow(dead_code)]
    channel_id: String,
}

pub fn build_openapi() -> OpenApi {
    let mut api = OpenApi {
        info: Info {
            title: "groupsync-server".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            ..Default::default()
        },
        ..Default::default()
    };

    let _ = doc_router().finish_api(&mut api);
    api
}

fn doc_router() -> ApiRouter<AppState> {
    ApiRouter::new()
        .api_route("/health", get(health))
        .api_route(BASE_PATH, get(groups_list).post(groups_create))
        .api_route(
            &format!("{BASE_PATH}/:group_id"),
            get(groups_get).put(groups_update).delete(groups_delete),
        )
        .api_route(
            &format!("{BASE_PATH}/:group_id/members"),
            post(members_create),
        )
        .api_route(
            &format!("{BASE_PATH}/:group_id/members/:user_id"),
            delete(members_delete),
        )
        .api_route(
            &format!("{BASE_PATH}/:group_id/teams"),
            get(syncables_list).post(syncables_create),
        )
        .api_route(
            &format!("{BASE_PATH}/:group_id/teams/:team_id"),
            get(teams_get).put(teams_update).delete(teams_delete),
        )
        .api_route(
            &format!("{BASE_PATH}/:group_id/channels"),
            get(syncables_list).post(syncables_create),
        )
        .api_route(
            &format!("{BASE_PATH}/:group_id/channels/:channel_id"),
            get(channels_get)
                .put(channels_update)
                .delete(channels_delete),
        )
}

fn not_implemented<T>(body: T) -> (StatusCode, Json<T>) {
    (StatusCode::NOT_IMPLEMENTED, Json(body))
}

fn placeholder_group() -> Group {
    Group {
        id: String::new(),
        name: String::new(),
        display_name: String::new(),
        description: String::new(),
        source: GroupSource::default(),
        remote_id: String::new(),
        create_at: DateTime::<Utc>::default(),
        update_at: DateTime::<Utc>::default(),
        delete_at: None,
    }
}

fn placeholder_member() -> GroupMember {
    GroupMember {
        group_id: String::new(),
        user_id: String::new(),
        create_at: DateTime::<Utc>::default(),
        delete_at: None,
    }
}

fn placeholder_syncable(syncable_type: GroupSyncableType) -> GroupSyncable {
    GroupSyncable::from_patch("", "", syncable_type, &GroupSyncablePatch::default())
}

async fn health() -> (StatusCode, Json<HealthResponse>) {
    not_implemented(HealthResponse {
        status: "not_implemented",
        version: "0.0.0",
        build_commit: None,
        uptime_seconds: 0,
        licensed: false,
    })
}

async fn groups_list(Query(_query): Query<PageQuery>) -> (StatusCode, Json<Vec<Group>>) {
    not_implemented(Vec::new())
}

async fn groups_create(Json(_payload): Json<Group>) -> (StatusCode, Json<Group>) {
    not_implemented(placeholder_group())
}

async fn groups_get(Path(_path): Path<GroupPath>) -> (StatusCode, Json<Group>) {
    not_implemented(placeholder_group())
}

async fn groups_update(
    Path(_path): Path<GroupPath>,
    Json(_payload): Json<Group>,
) -> (StatusCode, Json<Group>) {
    not_implemented(placeholder_group())
}

async fn groups_delete(Path(_path): Path<GroupPath>) -> (StatusCode, Json<StatusResponse>) {
    not_implemented(StatusResponse::ok())
}

async fn members_create(
    Path(_path): Path<GroupPath>,
    Json(_payload): Json<MemberRequest>,
) -> (StatusCode, Json<GroupMember>) {
    not_implemented(placeholder_member())
}

async fn members_delete(Path(_path): Path<MemberPath>) -> (StatusCode, Json<GroupMember>) {
    not_implemented(placeholder_member())
}

async fn syncables_list(
    Path(_path): Path<GroupPath>,
    Query(_query): Query<PageQuery>,
) -> (StatusCode, Json<Vec<GroupSyncable>>) {
    not_implemented(Vec::new())
}

async fn syncables_create(
    Path(_path): Path<GroupPath>,
    Json(payload): Json<GroupSyncable>,
) -> (StatusCode, Json<GroupSyncable>) {
    not_implemented(placeholder_syncable(payload.syncable_type))
}

async fn teams_get(Path(_path): Path<TeamPath>) -> (StatusCode, Json<GroupSyncable>) {
    not_implemented(placeholder_syncable(GroupSyncableType::Team))
}

async fn teams_update(
    Path(_path): Path<TeamPath>,
    Json(_payload): Json<GroupSyncablePatch>,
) -> (StatusCode, Json<GroupSyncable>) {
    not_implemented(placeholder_syncable(GroupSyncableType::Team))
}

async fn teams_delete(Path(_path): Path<TeamPath>) -> (StatusCode, Json<GroupSyncable>) {
    not_implemented(placeholder_syncable(GroupSyncableType::Team))
}

async fn channels_get(Path(_path): Path<ChannelPath>) -> (StatusCode, Json<GroupSyncable>) {
    not_implemented(placeholder_syncable(GroupSyncableType::Channel))
}

async fn channels_update(
    Path(_path): Path<ChannelPath>,
    Json(_payload): Json<GroupSyncablePatch>,
) -> (StatusCode, Json<GroupSyncable>) {
    not_implemented(placeholder_syncable(GroupSyncableType::Channel))
}

async fn channels_delete(Path(_path): Path<ChannelPath>) -> (StatusCode, Json<GroupSyncable>) {
    not_implemented(placeholder_syncable(GroupSyncableType::Channel))
}
