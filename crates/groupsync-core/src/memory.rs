use std::collections::{BTreeMap, HashMap};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::{
    AppError, Group, GroupMember, GroupService, GroupSyncable, GroupSyncableType, License,
    Permission, ServiceResult, Session,
};

pub const ROLE_SYSTEM_ADMIN: &str = "system_admin";
pub const ROLE_GROUP_MANAGER: &str = "group_manager";

type SyncableKey = (String, &'static str, String);

#[derive(Default)]
struct MemoryState {
    license: Option<License>,
    sessions: HashMap<String, Session>,
    groups: BTreeMap<String, Group>,
    members: BTreeMap<(String, String), GroupMember>,
    syncables: BTreeMap<SyncableKey, GroupSyncable>,
}

/// Process-local [`GroupService`] used by the standalone server and tests.
/// Deletes are soft: records keep a `delete_at` and disappear from reads.
#[derive(Default)]
pub struct InMemoryGroupService {
    state: RwLock<MemoryState>,
}

fn new_id() -> String {
    Uuid::now_v7().simple().to_string()
}

fn syncable_key(group_id: &str, syncable_id: &str, syncable_type: GroupSyncableType) -> SyncableKey {
    (
        group_id.to_string(),
        syncable_type.as_str(),
        syncable_id.to_string(),
    )
}

fn page_bounds(page: u32, per_page: u32) -> (usize, usize) {
    let skip = (page as usize).saturating_mul(per_page as usize);
    (skip, per_page as usize)
}

fn group_not_found(group_id: &str) -> AppError {
    AppError::not_found("app.group.get.not_found", "Unable to find the group")
        .with_detail(format!("group_id={group_id}"))
}

fn member_not_found(group_id: &str, user_id: &str) -> AppError {
    AppError::not_found("app.group.member.not_found", "Unable to find the group member")
        .with_detail(format!("group_id={group_id}, user_id={user_id}"))
}

fn syncable_not_found(group_id: &str, syncable_id: &str, syncable_type: GroupSyncableType) -> AppError {
    AppError::not_found(
        "app.group.syncable.not_found",
        "Unable to find the group syncable",
    )
    .with_detail(format!(
        "group_id={group_id}, syncable_id={syncable_id}, type={syncable_type}"
    ))
}

impl InMemoryGroupService {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_license(self, license: Option<License>) -> Self {
        self.set_license(license);
        self
    }

    #[must_use]
    pub fn with_session(self, token: impl Into<String>, session: Session) -> Self {
        self.write().sessions.insert(token.into(), session);
        self
    }

    pub fn set_license(&self, license: Option<License>) {
        self.write().license = license;
    }

    fn read(&self) -> RwLockReadGuard<'_, MemoryState> {
        self.state.read().unwrap_or_else(|err| err.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, MemoryState> {
        self.state.write().unwrap_or_else(|err| err.into_inner())
    }

    fn role_grants(role: &str, permission: Permission) -> bool {
        match role {
            ROLE_SYSTEM_ADMIN => true,
            ROLE_GROUP_MANAGER => matches!(permission, Permission::ManageGroups),
            _ => false,
        }
    }
}

fn active_group<'a>(state: &'a MemoryState, group_id: &str) -> ServiceResult<&'a Group> {
    state
        .groups
        .get(group_id)
        .filter(|group| !group.is_deleted())
        .ok_or_else(|| group_not_found(group_id))
}

#[async_trait]
impl GroupService for InMemoryGroupService {
    fn license(&self) -> Option<License> {
        self.read().license.clone()
    }

    fn session_has_permission_to(&self, session: &Session, permission: Permission) -> bool {
        session
            .roles
            .iter()
            .any(|role| Self::role_grants(role, permission))
    }

    async fn session_from_token(&self, token: &str) -> ServiceResult<Session> {
        self.read().sessions.get(token).cloned().ok_or_else(|| {
            AppError::unauthorized("api.context.session_expired.app_error", "Invalid or expired session")
        })
    }

    async fn create_group(&self, mut group: Group) -> ServiceResult<Group> {
        group.validate()?;
        let mut state = self.write();
        let duplicate = state.groups.values().any(|existing| {
            !existing.is_deleted()
                && existing.source == group.source
                && existing.remote_id == group.remote_id
        });
        if duplicate {
            return Err(AppError::conflict(
                "app.group.create.remote_id_exists",
                "A group with this remote id already exists",
            )
            .with_detail(format!("remote_id={}", group.remote_id)));
        }
        let now = Utc::now();
        group.id = new_id();
        group.create_at = now;
        group.update_at = now;
        group.delete_at = None;
        state.groups.insert(group.id.clone(), group.clone());
        tracing::debug!(event = "memory_group_created", group_id = %group.id);
        Ok(group)
    }

    async fn get_group(&self, group_id: &str) -> ServiceResult<Group> {
        let state = self.read();
        active_group(&state, group_id).cloned()
    }

    async fn get_groups_page(&self, page: u32, per_page: u32) -> ServiceResult<Vec<Group>> {
        let (skip, take) = page_bounds(page, per_page);
        let state = self.read();
        Ok(state
            .groups
            .values()
            .filter(|group| !group.is_deleted())
            .skip(skip)
            .take(take)
            .cloned()
            .collect())
    }

    async fn update_group(&self, update: Group) -> ServiceResult<Group> {
        update.validate()?;
        let mut state = self.write();
        let group = state
            .groups
            .get_mut(&update.id)
            .filter(|group| !group.is_deleted())
            .ok_or_else(|| group_not_found(&update.id))?;
        group.name = update.name;
        group.display_name = update.display_name;
        group.description = update.description;
        group.source = update.source;
        group.remote_id = update.remote_id;
        group.update_at = Utc::now();
        Ok(group.clone())
    }

    async fn delete_group(&self, group_id: &str) -> ServiceResult<Group> {
        let mut state = self.write();
        let group = state
            .groups
            .get_mut(group_id)
            .filter(|group| !group.is_deleted())
            .ok_or_else(|| group_not_found(group_id))?;
        let now = Utc::now();
        group.delete_at = Some(now);
        group.update_at = now;
        Ok(group.clone())
    }

    async fn create_group_member(
        &self,
        group_id: &str,
        user_id: &str,
    ) -> ServiceResult<GroupMember> {
        let mut state = self.write();
        active_group(&state, group_id)?;
        let key = (group_id.to_string(), user_id.to_string());
        if state
            .members
            .get(&key)
            .is_some_and(|member| member.delete_at.is_none())
        {
            return Err(AppError::conflict(
                "app.group.member.exists",
                "The user is already a member of this group",
            ));
        }
        let member = GroupMember {
            group_id: group_id.to_string(),
            user_id: user_id.to_string(),
            create_at: Utc::now(),
            delete_at: None,
        };
        state.members.insert(key, member.clone());
        Ok(member)
    }

    async fn delete_group_member(
        &self,
        group_id: &str,
        user_id: &str,
    ) -> ServiceResult<GroupMember> {
        let mut state = self.write();
        active_group(&state, group_id)?;
        let key = (group_id.to_string(), user_id.to_string());
        let member = state
            .members
            .get_mut(&key)
            .filter(|member| member.delete_at.is_none())
            .ok_or_else(|| member_not_found(group_id, user_id))?;
        member.delete_at = Some(Utc::now());
        Ok(member.clone())
    }

    async fn create_group_syncable(
        &self,
        mut syncable: GroupSyncable,
    ) -> ServiceResult<GroupSyncable> {
        if syncable.syncable_id.trim().is_empty() {
            return Err(AppError::bad_request(
                "model.group_syncable.syncable_id.app_error",
                "Syncable id is required",
            ));
        }
        let mut state = self.write();
        active_group(&state, &syncable.group_id)?;
        let key = syncable_key(
            &syncable.group_id,
            &syncable.syncable_id,
            syncable.syncable_type,
        );
        if state
            .syncables
            .get(&key)
            .is_some_and(|existing| !existing.is_deleted())
        {
            return Err(AppError::conflict(
                "app.group.syncable.exists",
                "The group is already linked to this resource",
            ));
        }
        let now = Utc::now();
        syncable.create_at = now;
        syncable.update_at = now;
        syncable.delete_at = None;
        state.syncables.insert(key, syncable.clone());
        Ok(syncable)
    }

    async fn get_group_syncable(
        &self,
        group_id: &str,
        syncable_id: &str,
        syncable_type: GroupSyncableType,
    ) -> ServiceResult<GroupSyncable> {
        let state = self.read();
        state
            .syncables
            .get(&syncable_key(group_id, syncable_id, syncable_type))
            .filter(|syncable| !syncable.is_deleted())
            .cloned()
            .ok_or_else(|| syncable_not_found(group_id, syncable_id, syncable_type))
    }

    async fn get_group_syncables_page(
        &self,
        group_id: &str,
        syncable_type: GroupSyncableType,
        page: u32,
        per_page: u32,
    ) -> ServiceResult<Vec<GroupSyncable>> {
        let (skip, take) = page_bounds(page, per_page);
        let state = self.read();
        active_group(&state, group_id)?;
        Ok(state
            .syncables
            .values()
            .filter(|syncable| {
                syncable.group_id == group_id
                    && syncable.syncable_type == syncable_type
                    && !syncable.is_deleted()
            })
            .skip(skip)
            .take(take)
            .cloned()
            .collect())
    }

    async fn update_group_syncable(
        &self,
        update: GroupSyncable,
    ) -> ServiceResult<GroupSyncable> {
        let mut state = self.write();
        let key = syncable_key(&update.group_id, &update.syncable_id, update.syncable_type);
        let syncable = state
            .syncables
            .get_mut(&key)
            .filter(|syncable| !syncable.is_deleted())
            .ok_or_else(|| {
                syncable_not_found(&update.group_id, &update.syncable_id, update.syncable_type)
            })?;
        syncable.auto_add = update.auto_add;
        syncable.can_leave = update.can_leave;
        syncable.update_at = Utc::now();
        Ok(syncable.clone())
    }

    async fn delete_group_syncable(
        &self,
        group_id: &str,
        syncable_id: &str,
        syncable_type: GroupSyncableType,
    ) -> ServiceResult<GroupSyncable> {
        let mut state = self.write();
        let syncable = state
            .syncables
            .get_mut(&syncable_key(group_id, syncable_id, syncable_type))
            .filter(|syncable| !syncable.is_deleted())
            .ok_or_else(|| syncable_not_found(group_id, syncable_id, syncable_type))?;
        let now = Utc::now();
        syncable.delete_at = Some(now);
        syncable.update_at = now;
        Ok(syncable.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{GroupSource, GroupSyncablePatch};

    fn sample_group(remote_id: &str) -> Group {
        Group {
            id: String::new(),
            name: "engineering".to_string(),
            display_name: "Engineering".to_string(),
            description: String::new(),
            source: GroupSource::Ldap,
            remote_id: remote_id.to_string(),
            create_at: Default::default(),
            update_at: Default::default(),
            delete_at: None,
        }
    }

    fn team_syncable(group_id: &str, team_id: &str) -> GroupSyncable {
        GroupSyncable::from_patch(
            group_id,
            team_id,
            GroupSyncableType::Team,
            &GroupSyncablePatch {
                auto_add: true,
                can_leave: false,
            },
        )
    }

    #[tokio::test]
    async fn deleted_group_disappears_from_reads() {
        let service = InMemoryGroupService::new();
        let group = service
            .create_group(sample_group("cn=eng"))
            .await
            .expect("create");
        assert!(!group.id.is_empty());

        let deleted = service.delete_group(&group.id).await.expect("delete");
        assert!(deleted.delete_at.is_some());

        let err = service.get_group(&group.id).await.expect_err("gone");
        assert_eq!(err.status_code, 404);
        let page = service.get_groups_page(0, 60).await.expect("page");
        assert!(page.is_empty());
    }

    #[tokio::test]
    async fn duplicate_remote_id_conflicts() {
        let service = InMemoryGroupService::new();
        service
            .create_group(sample_group("cn=eng"))
            .await
            .expect("create");
        let err = service
            .create_group(sample_group("cn=eng"))
            .await
            .expect_err("duplicate");
        assert_eq!(err.status_code, 409);
    }

    #[tokio::test]
    async fn pages_slice_in_creation_order() {
        let service = InMemoryGroupService::new();
        let mut ids = Vec::new();
        for index in 0..5 {
            let group = service
                .create_group(sample_group(&format!("cn=g{index}")))
                .await
                .expect("create");
            ids.push(group.id);
        }
        let second = service.get_groups_page(1, 2).await.expect("page");
        let second: Vec<_> = second.into_iter().map(|group| group.id).collect();
        assert_eq!(second, ids[2..4].to_vec());
        assert!(service.get_groups_page(3, 2).await.expect("page").is_empty());
    }

    #[tokio::test]
    async fn syncable_lifecycle_is_scoped_by_type() {
        let service = InMemoryGroupService::new();
        let group = service
            .create_group(sample_group("cn=eng"))
            .await
            .expect("create");
        service
            .create_group_syncable(team_syncable(&group.id, "t1"))
            .await
            .expect("link");

        let err = service
            .get_group_syncable(&group.id, "t1", GroupSyncableType::Channel)
            .await
            .expect_err("wrong type");
        assert_eq!(err.status_code, 404);

        let mut update = team_syncable(&group.id, "t1");
        update.auto_add = false;
        update.can_leave = true;
        let updated = service.update_group_syncable(update).await.expect("update");
        assert!(!updated.auto_add);
        assert!(updated.can_leave);

        service
            .delete_group_syncable(&group.id, "t1", GroupSyncableType::Team)
            .await
            .expect("unlink");
        let page = service
            .get_group_syncables_page(&group.id, GroupSyncableType::Team, 0, 60)
            .await
            .expect("page");
        assert!(page.is_empty());
    }

    #[tokio::test]
    async fn member_can_rejoin_after_removal() {
        let service = InMemoryGroupService::new();
        let group = service
            .create_group(sample_group("cn=eng"))
            .await
            .expect("create");
        service
            .create_group_member(&group.id, "u1")
            .await
            .expect("add");
        let err = service
            .create_group_member(&group.id, "u1")
            .await
            .expect_err("duplicate");
        assert_eq!(err.status_code, 409);

        let removed = service
            .delete_group_member(&group.id, "u1")
            .await
            .expect("remove");
        assert!(removed.delete_at.is_some());
        service
            .create_group_member(&group.id, "u1")
            .await
            .expect("re-add");
    }

    #[tokio::test]
    async fn members_of_deleted_group_cannot_be_removed() {
        let service = InMemoryGroupService::new();
        let group = service
            .create_group(sample_group("cn=eng"))
            .await
            .expect("create");
        service
            .create_group_member(&group.id, "u1")
            .await
            .expect("add");
        service.delete_group(&group.id).await.expect("delete group");

        let err = service
            .delete_group_member(&group.id, "u1")
            .await
            .expect_err("group is gone");
        assert_eq!(err.status_code, 404);
    }

    #[test]
    fn roles_map_to_permissions() {
        let service = InMemoryGroupService::new();
        let admin = Session {
            id: "s1".to_string(),
            user_id: "u1".to_string(),
            roles: vec![ROLE_SYSTEM_ADMIN.to_string()],
        };
        let manager = Session {
            roles: vec![ROLE_GROUP_MANAGER.to_string()],
            ..admin.clone()
        };
        assert!(service.session_has_permission_to(&admin, Permission::ManageSystem));
        assert!(service.session_has_permission_to(&manager, Permission::ManageGroups));
        assert!(!service.session_has_permission_to(&manager, Permission::ManageSystem));
    }
}
