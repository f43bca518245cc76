use axum::routing::{delete, get, post};
use axum::Router;
use groupsync_core::GroupSyncableType;

use crate::app::AppState;

mod codec;
mod handlers;
pub(crate) mod params;
pub(crate) mod types;

pub const BASE_PATH: &str = "/api/v4/groups";

/// Compile-time selector for the team and channel variants of the
/// syncable endpoints.
pub(crate) trait SyncableKind: Send + Sync + 'static {
    const TYPE: GroupSyncableType;
}

pub(crate) struct Teams;

impl SyncableKind for Teams {
    const TYPE: GroupSyncableType = GroupSyncableType::Team;
}

pub(crate) struct Channels;

impl SyncableKind for Channels {
    const TYPE: GroupSyncableType = GroupSyncableType::Channel;
}

pub fn router() -> Router<AppState> {
    use handlers::{groups, members};

    Router::new()
        .route(
            BASE_PATH,
            get(groups::list_groups).post(groups::create_group),
        )
        .route(
            &format!("{BASE_PATH}/:group_id"),
            get(groups::get_group)
                .put(groups::update_group)
                .delete(groups::delete_group),
        )
        .route(
            &format!("{BASE_PATH}/:group_id/members"),
            post(members::create_member),
        )
        .route(
            &format!("{BASE_PATH}/:group_id/members/:user_id"),
            delete(members::delete_member),
        )
        .merge(syncable_routes::<Teams>())
        .merge(syncable_routes::<Channels>())
}

fn syncable_routes<K: SyncableKind>() -> Router<AppState> {
    use handlers::syncables;

    let collection = format!("{BASE_PATH}/:group_id/{}", K::TYPE.route_segment());
    let item = format!("{collection}/:{}", K::TYPE.param_name());
    Router::new()
        .route(
            &collection,
            get(syncables::list_syncables::<K>).post(syncables::create_syncable::<K>),
        )
        .route(
            &item,
            get(syncables::get_syncable::<K>)
                .put(syncables::update_syncable::<K>)
                .delete(syncables::delete_syncable::<K>),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn syncable_kinds_cover_every_type() {
        let kinds = [Teams::TYPE, Channels::TYPE];
        assert_eq!(kinds, GroupSyncableType::ALL);
    }
}
