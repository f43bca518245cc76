use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::enums::{GroupSource, GroupSyncableType};
use crate::errors::AppError;

pub const GROUP_NAME_MAX_LENGTH: usize = 64;
pub const GROUP_DISPLAY_NAME_MAX_LENGTH: usize = 128;
pub const GROUP_DESCRIPTION_MAX_LENGTH: usize = 1024;
pub const GROUP_REMOTE_ID_MAX_LENGTH: usize = 48;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Group {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub source: GroupSource,
    #[serde(default)]
    pub remote_id: String,
    #[serde(default)]
    pub create_at: DateTime<Utc>,
    #[serde(default)]
    pub update_at: DateTime<Utc>,
    #[serde(default)]
    pub delete_at: Option<DateTime<Utc>>,
}

impl Group {
    /// Checks the fields a client controls. Identity and timestamps are
    /// assigned by the service and are not inspected here.
    pub fn validate(&self) -> Result<(), AppError> {
        let name = self.name.trim();
        if name.is_empty() || name.chars().count() > GROUP_NAME_MAX_LENGTH {
            return Err(AppError::bad_request(
                "model.group.name.app_error",
                "Group name is missing or too long",
            ));
        }
        let display_name = self.display_name.trim();
        if display_name.is_empty() || display_name.chars().count() > GROUP_DISPLAY_NAME_MAX_LENGTH
        {
            return Err(AppError::bad_request(
                "model.group.display_name.app_error",
                "Group display name is missing or too long",
            ));
        }
        if self.description.chars().count() > GROUP_DESCRIPTION_MAX_LENGTH {
            return Err(AppError::bad_request(
                "model.group.description.app_error",
                "Group description is too long",
            ));
        }
        let remote_id = self.remote_id.trim();
        if remote_id.is_empty() || remote_id.chars().count() > GROUP_REMOTE_ID_MAX_LENGTH {
            return Err(AppError::bad_request(
                "model.group.remote_id.app_error",
                "Group remote id is missing or too long",
            ));
        }
        Ok(())
    }

    #[must_use]
    pub fn is_deleted(&self) -> bool {
        self.delete_at.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct GroupMember {
    pub group_id: String,
    pub user_id: String,
    pub create_at: DateTime<Utc>,
    #[serde(default)]
    pub delete_at: Option<DateTime<Utc>>,
}

/// Binds a group to a team or channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct GroupSyncable {
    #[serde(default)]
    pub group_id: String,
    #[serde(default)]
    pub syncable_id: String,
    #[serde(rename = "type")]
    pub syncable_type: GroupSyncableType,
    #[serde(default)]
    pub auto_add: bool,
    #[serde(default)]
    pub can_leave: bool,
    #[serde(default)]
    pub create_at: DateTime<Utc>,
    #[serde(default)]
    pub update_at: DateTime<Utc>,
    #[serde(default)]
    pub delete_at: Option<DateTime<Utc>>,
}

impl GroupSyncable {
    /// Builds the update target for a patch. Identity never comes from the
    /// patch itself.
    #[must_use]
    pub fn from_patch(
        group_id: &str,
        syncable_id: &str,
        syncable_type: GroupSyncableType,
        patch: &GroupSyncablePatch,
    ) -> Self {
        Self {
            group_id: group_id.to_string(),
            syncable_id: syncable_id.to_string(),
            syncable_type,
            auto_add: patch.auto_add,
            can_leave: patch.can_leave,
            create_at: DateTime::<Utc>::default(),
            update_at: DateTime::<Utc>::default(),
            delete_at: None,
        }
    }

    #[must_use]
    pub fn is_deleted(&self) -> bool {
        self.delete_at.is_some()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct GroupSyncablePatch {
    #[serde(default)]
    pub auto_add: bool,
    #[serde(default)]
    pub can_leave: bool,
}
