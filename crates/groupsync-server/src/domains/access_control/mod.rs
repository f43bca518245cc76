use groupsync_core::{LicenseFeature, Permission};

use crate::config::AccessConfig;

mod guard;

pub use guard::{require_license, require_mutation, require_permission};

/// License feature and permission that guard every group endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessPolicy {
    pub license_feature: LicenseFeature,
    pub permission: Permission,
}

impl Default for AccessPolicy {
    fn default() -> Self {
        Self {
            license_feature: LicenseFeature::Ldap,
            permission: Permission::ManageSystem,
        }
    }
}

impl From<&AccessConfig> for AccessPolicy {
    fn from(config: &AccessConfig) -> Self {
        Self {
            license_feature: config.license_feature,
            permission: config.permission,
        }
    }
}
