use groupsync_core::{GroupService, Session};

use super::AccessPolicy;
use crate::domains::errors::ApiError;
use crate::infra::metrics;

pub fn require_license(
    service: &dyn GroupService,
    policy: &AccessPolicy,
    resource: &str,
) -> Result<(), ApiError> {
    let licensed = service
        .license()
        .is_some_and(|license| license.has_feature(policy.license_feature));
    if licensed {
        return Ok(());
    }
    tracing::warn!(
        event = "license_required",
        resource = resource,
        feature = policy.license_feature.as_str(),
        "Feature not licensed"
    );
    Err(ApiError::FeatureUnavailable {
        feature: policy.license_feature,
    })
}

pub fn require_permission(
    service: &dyn GroupService,
    policy: &AccessPolicy,
    session: &Session,
    resource: &str,
) -> Result<(), ApiError> {
    if service.session_has_permission_to(session, policy.permission) {
        return Ok(());
    }
    metrics::forbidden_access(resource);
    tracing::warn!(
        event = "forbidden",
        resource = resource,
        permission = policy.permission.as_str(),
        user_id = %session.user_id,
        "Access denied"
    );
    Err(ApiError::PermissionDenied {
        permission: policy.permission,
    })
}

/// License first, then permission.
pub fn require_mutation(
    service: &dyn GroupService,
    policy: &AccessPolicy,
    session: &Session,
    resource: &str,
) -> Result<(), ApiError> {
    require_license(service, policy, resource)?;
    require_permission(service, policy, session, resource)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use groupsync_core::memory::{InMemoryGroupService, ROLE_GROUP_MANAGER, ROLE_SYSTEM_ADMIN};
    use groupsync_core::{License, LicenseFeature, LicenseFeatures, Permission};

    fn session(role: &str) -> Session {
        Session {
            id: "s1".to_string(),
            user_id: "u1".to_string(),
            roles: vec![role.to_string()],
        }
    }

    fn license(ldap: bool) -> License {
        License {
            id: "lic".to_string(),
            features: LicenseFeatures {
                ldap,
                ..LicenseFeatures::default()
            },
            expires_at: None,
        }
    }

    #[test]
    fn missing_license_is_feature_unavailable() {
        let service = InMemoryGroupService::new();
        let err = require_license(&service, &AccessPolicy::default(), "groups")
            .expect_err("no license");
        assert!(matches!(
            err,
            ApiError::FeatureUnavailable {
                feature: LicenseFeature::Ldap
            }
        ));
    }

    #[test]
    fn license_without_feature_is_feature_unavailable() {
        let service = InMemoryGroupService::new().with_license(Some(license(false)));
        assert!(require_license(&service, &AccessPolicy::default(), "groups").is_err());
    }

    #[test]
    fn expired_license_is_feature_unavailable() {
        let mut expired = license(true);
        expired.expires_at = Some(Utc::now() - Duration::minutes(5));
        let service = InMemoryGroupService::new().with_license(Some(expired));
        assert!(require_license(&service, &AccessPolicy::default(), "groups").is_err());
    }

    #[test]
    fn mutation_checks_license_before_permission() {
        let service = InMemoryGroupService::new();
        let err = require_mutation(
            &service,
            &AccessPolicy::default(),
            &session("nobody"),
            "groups",
        )
        .expect_err("unlicensed");
        assert!(matches!(err, ApiError::FeatureUnavailable { .. }));

        service.set_license(Some(license(true)));
        let err = require_mutation(
            &service,
            &AccessPolicy::default(),
            &session("nobody"),
            "groups",
        )
        .expect_err("no permission");
        assert!(matches!(
            err,
            ApiError::PermissionDenied {
                permission: Permission::ManageSystem
            }
        ));

        assert!(require_mutation(
            &service,
            &AccessPolicy::default(),
            &session(ROLE_SYSTEM_ADMIN),
            "groups",
        )
        .is_ok());
    }

    #[test]
    fn policy_permission_is_honored() {
        let service = InMemoryGroupService::new();
        let manager = session(ROLE_GROUP_MANAGER);
        assert!(require_permission(&service, &AccessPolicy::default(), &manager, "groups").is_err());

        let policy = AccessPolicy {
            permission: Permission::ManageGroups,
            ..AccessPolicy::default()
        };
        assert!(require_permission(&service, &policy, &manager, "groups").is_ok());
    }
}
