use super::*;
use groupsync_core::{LicenseFeature, Permission};
use std::sync::Mutex;
use uuid::Uuid;

static ENV_LOCK: Mutex<()> = Mutex::new(());

fn clear_env() {
    for name in [
        "GROUPSYNC_ADDR",
        "GROUPSYNC_CONFIG_PATH",
        "GROUPSYNC_MAX_BODY_BYTES",
        "GROUPSYNC_SERVER_NAME",
        "GROUPSYNC_ACCESS_LICENSE_FEATURE",
        "GROUPSYNC_ACCESS_PERMISSION",
        "GROUPSYNC_LICENSE_FEATURES",
        "GROUPSYNC_METRICS_ENABLED",
        "GROUPSYNC_METRICS_ENDPOINT",
        "GROUPSYNC_TRACING_OTEL_ENABLED",
        "GROUPSYNC_TRACING_OTEL_ENDPOINT",
        "GROUPSYNC_SENTRY_DSN",
    ] {
        env::remove_var(name);
    }
}

fn set_config(yaml: &str) {
    let config_path =
        std::env::temp_dir().join(format!("groupsync-test-config-{}.yaml", Uuid::now_v7()));
    std::fs::write(&config_path, yaml).expect("write config");
    env::set_var("GROUPSYNC_CONFIG_PATH", config_path);
}

#[test]
fn defaults_apply_without_config_file() {
    let _lock = ENV_LOCK.lock().expect("env lock");
    clear_env();
    env::set_var("GROUPSYNC_CONFIG_PATH", "/nonexistent/groupsync.yaml");

    let settings = Settings::from_env().expect("settings");
    assert_eq!(settings.addr.to_string(), DEFAULT_ADDR);
    assert_eq!(settings.config.access.license_feature, LicenseFeature::Ldap);
    assert_eq!(settings.config.access.permission, Permission::ManageSystem);
    assert!(!settings.config.license.enabled);
    assert!(preflight(&settings).is_ok());
}

#[test]
fn yaml_config_is_loaded() {
    let _lock = ENV_LOCK.lock().expect("env lock");
    clear_env();
    set_config(
        r#"access:
  license_feature: ldap_groups
  permission: manage_groups
license:
  enabled: true
  features: [ldap, ldap_groups]
sessions:
  - token: admin-token
    user_id: admin
    roles: [system_admin]
"#,
    );

    let settings = Settings::from_env().expect("settings");
    assert_eq!(
        settings.config.access.license_feature,
        LicenseFeature::LdapGroups
    );
    assert_eq!(settings.config.access.permission, Permission::ManageGroups);
    assert_eq!(settings.config.license.features.len(), 2);
    assert_eq!(settings.config.sessions[0].roles, vec!["system_admin"]);
}

#[test]
fn malformed_yaml_is_an_error() {
    let _lock = ENV_LOCK.lock().expect("env lock");
    clear_env();
    set_config("access: [not, a, map]\n");

    let err = Settings::from_env().expect_err("parse should fail");
    assert!(matches!(err, SettingsError::Parse { .. }));
}

#[test]
fn env_overrides_apply() {
    let _lock = ENV_LOCK.lock().expect("env lock");
    clear_env();
    env::set_var("GROUPSYNC_CONFIG_PATH", "/nonexistent/groupsync.yaml");
    env::set_var("GROUPSYNC_ADDR", "0.0.0.0:9000");
    env::set_var("GROUPSYNC_MAX_BODY_BYTES", "2048");
    env::set_var("GROUPSYNC_ACCESS_PERMISSION", "manage-groups");
    env::set_var("GROUPSYNC_LICENSE_FEATURES", "ldap, saml, bogus");
    env::set_var("GROUPSYNC_METRICS_ENABLED", "yes");

    let settings = Settings::from_env().expect("settings");
    assert_eq!(settings.addr.port(), 9000);
    assert_eq!(settings.config.server.max_body_bytes, 2048);
    assert_eq!(settings.config.access.permission, Permission::ManageGroups);
    assert!(settings.config.license.enabled);
    assert_eq!(
        settings.config.license.features,
        vec![LicenseFeature::Ldap, LicenseFeature::Saml]
    );
    assert!(settings.config.metrics.enabled);
    clear_env();
}

#[test]
fn license_features_none_removes_license() {
    let _lock = ENV_LOCK.lock().expect("env lock");
    clear_env();
    set_config("license:\n  enabled: true\n  features: [ldap]\n");
    env::set_var("GROUPSYNC_LICENSE_FEATURES", "none");

    let settings = Settings::from_env().expect("settings");
    assert!(!settings.config.license.enabled);
    assert!(settings.config.license.features.is_empty());
    clear_env();
}

#[test]
fn invalid_addr_is_rejected() {
    let _lock = ENV_LOCK.lock().expect("env lock");
    clear_env();
    env::set_var("GROUPSYNC_ADDR", "not-an-addr");

    let err = Settings::from_env().expect_err("addr should fail");
    assert!(matches!(
        err,
        SettingsError::Invalid {
            field: "GROUPSYNC_ADDR",
            ..
        }
    ));
    clear_env();
}

#[test]
fn preflight_reports_duplicate_tokens_and_empty_license() {
    let _lock = ENV_LOCK.lock().expect("env lock");
    clear_env();
    set_config(
        r#"license:
  enabled: true
sessions:
  - token: same
    user_id: a
  - token: same
    user_id: b
"#,
    );

    let settings = Settings::from_env().expect("settings");
    let missing = preflight(&settings).expect_err("preflight should fail");
    assert!(missing.iter().any(|value| value.contains("duplicate token")));
    assert!(missing
        .iter()
        .any(|value| value.contains("license.features must not be empty")));
    clear_env();
}
