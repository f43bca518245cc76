use std::env;
use std::fs;
use std::path::Path;

use groupsync_core::{LicenseFeature, Permission};
use tracing::warn;

use super::SettingsError;
use crate::config::ServerConfig;

pub(super) fn load_config(path: &str) -> Result<ServerConfig, SettingsError> {
    if !Path::new(path).exists() {
        return Ok(ServerConfig::default());
    }

    let contents = fs::read_to_string(path).map_err(|source| SettingsError::Read {
        path: path.to_string(),
        source,
    })?;
    serde_yaml::from_str(&contents).map_err(|source| SettingsError::Parse {
        path: path.to_string(),
        source,
    })
}

pub(super) fn apply_server_env_overrides(config: &mut ServerConfig) {
    if let Ok(value) = env::var("GROUPSYNC_MAX_BODY_BYTES") {
        match value.trim().parse::<usize>() {
            Ok(bytes) => config.server.max_body_bytes = bytes,
            Err(_) => {
                warn!(event = "config_invalid", field = "GROUPSYNC_MAX_BODY_BYTES", value = %value);
            }
        }
    }
    if let Ok(value) = env::var("GROUPSYNC_SERVER_NAME") {
        let value = value.trim();
        config.server.name = (!value.is_empty()).then(|| value.to_string());
    }
}

pub(super) fn apply_access_env_overrides(config: &mut ServerConfig) {
    if let Ok(value) = env::var("GROUPSYNC_ACCESS_LICENSE_FEATURE") {
        match normalize_enum(&value).parse::<LicenseFeature>() {
            Ok(feature) => config.access.license_feature = feature,
            Err(_) => {
                warn!(
                    event = "config_invalid",
                    field = "GROUPSYNC_ACCESS_LICENSE_FEATURE",
                    value = %value
                );
            }
        }
    }
    if let Ok(value) = env::var("GROUPSYNC_ACCESS_PERMISSION") {
        match normalize_enum(&value).parse::<Permission>() {
            Ok(permission) => config.access.permission = permission,
            Err(_) => {
                warn!(
                    event = "config_invalid",
                    field = "GROUPSYNC_ACCESS_PERMISSION",
                    value = %value
                );
            }
        }
    }
}

/// `GROUPSYNC_LICENSE_FEATURES=ldap,saml` installs a license with those
/// features; an empty value or `none` removes the license.
pub(super) fn apply_license_env_overrides(config: &mut ServerConfig) {
    let Ok(value) = env::var("GROUPSYNC_LICENSE_FEATURES") else {
        return;
    };
    let normalized = normalize_enum(&value);
    if normalized.is_empty() || normalized == "none" {
        config.license.enabled = false;
        config.license.features.clear();
        return;
    }
    let mut features = Vec::new();
    for part in normalized.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        match part.parse::<LicenseFeature>() {
            Ok(feature) if !features.contains(&feature) => features.push(feature),
            Ok(_) => {}
            Err(_) => {
                warn!(
                    event = "config_invalid",
                    field = "GROUPSYNC_LICENSE_FEATURES",
                    value = %part
                );
            }
        }
    }
    config.license.enabled = !features.is_empty();
    config.license.features = features;
}

pub(super) fn apply_metrics_env_overrides(config: &mut ServerConfig) {
    if let Ok(value) = env::var("GROUPSYNC_METRICS_ENABLED") {
        if let Some(enabled) = parse_bool(&value) {
            config.metrics.enabled = enabled;
        } else {
            warn!(event = "config_invalid", field = "GROUPSYNC_METRICS_ENABLED", value = %value);
        }
    }
    if let Ok(value) = env::var("GROUPSYNC_METRICS_ENDPOINT") {
        let value = value.trim();
        if !value.is_empty() {
            config.metrics.endpoint = value.to_string();
        }
    }
}

pub(super) fn apply_tracing_env_overrides(config: &mut ServerConfig) {
    if let Ok(value) = env::var("GROUPSYNC_TRACING_OTEL_ENABLED") {
        if let Some(enabled) = parse_bool(&value) {
            config.tracing.otel.enabled = enabled;
        } else {
            warn!(
                event = "config_invalid",
                field = "GROUPSYNC_TRACING_OTEL_ENABLED",
                value = %value
            );
        }
    }
    if let Ok(value) = env::var("GROUPSYNC_TRACING_OTEL_ENDPOINT") {
        let value = value.trim();
        config.tracing.otel.endpoint = (!value.is_empty()).then(|| value.to_string());
    }
    if let Ok(value) = env::var("GROUPSYNC_SENTRY_DSN") {
        let value = value.trim();
        if !value.is_empty() {
            config.sentry.enabled = true;
            config.sentry.dsn = value.to_string();
        }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn normalize_enum(value: &str) -> String {
    value.trim().to_ascii_lowercase().replace('-', "_")
}
