use async_trait::async_trait;

use crate::{
    Group, GroupMember, GroupSyncable, GroupSyncableType, License, Permission, ServiceResult,
    Session,
};

/// Application operations the groups API delegates to. Storage and the
/// directory synchronization engine live behind this trait.
#[async_trait]
pub trait GroupService: Send + Sync {
    fn license(&self) -> Option<License>;

    fn session_has_permission_to(&self, session: &Session, permission: Permission) -> bool;

    async fn session_from_token(&self, token: &str) -> ServiceResult<Session>;

    async fn create_group(&self, group: Group) -> ServiceResult<Group>;

    async fn get_group(&self, group_id: &str) -> ServiceResult<Group>;

    async fn get_groups_page(&self, page: u32, per_page: u32) -> ServiceResult<Vec<Group>>;

    async fn update_group(&self, group: Group) -> ServiceResult<Group>;

    async fn delete_group(&self, group_id: &str) -> ServiceResult<Group>;

    async fn create_group_member(&self, group_id: &str, user_id: &str)
        -> ServiceResult<GroupMember>;

    async fn delete_group_member(&self, group_id: &str, user_id: &str)
        -> ServiceResult<GroupMember>;

    async fn create_group_syncable(&self, syncable: GroupSyncable)
        -> ServiceResult<GroupSyncable>;

    async fn get_group_syncable(
        &self,
        group_id: &str,
        syncable_id: &str,
        syncable_type: GroupSyncableType,
    ) -> ServiceResult<GroupSyncable>;

    async fn get_group_syncables_page(
        &self,
        group_id: &str,
        syncable_type: GroupSyncableType,
        page: u32,
        per_page: u32,
    ) -> ServiceResult<Vec<GroupSyncable>>;

    async fn update_group_syncable(&self, syncable: GroupSyncable)
        -> ServiceResult<GroupSyncable>;

    async fn delete_group_syncable(
        &self,
        group_id: &str,
        syncable_id: &str,
        syncable_type: GroupSyncableType,
    ) -> ServiceResult<GroupSyncable>;
}
