use std::collections::HashSet;
use std::env;
use std::net::SocketAddr;

use thiserror::Error;

use crate::config::ServerConfig;

mod env_config;
#[cfg(test)]
mod tests;

const DEFAULT_ADDR: &str = "127.0.0.1:8065";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("invalid {field}: {value}")]
    Invalid { field: &'static str, value: String },
    #[error("config read failed ({path}): {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("config parse failed ({path}): {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },
}

#[derive(Debug)]
pub struct Settings {
    pub addr: SocketAddr,
    pub config_path: String,
    pub config: ServerConfig,
}

impl Settings {
    pub fn from_env() -> Result<Self, SettingsError> {
        let addr = match env::var("GROUPSYNC_ADDR") {
            Ok(value) => value.parse().map_err(|_| SettingsError::Invalid {
                field: "GROUPSYNC_ADDR",
                value,
            })?,
            Err(_) => DEFAULT_ADDR.parse().map_err(|_| SettingsError::Invalid {
                field: "GROUPSYNC_ADDR",
                value: DEFAULT_ADDR.to_string(),
            })?,
        };
        let config_path =
            env::var("GROUPSYNC_CONFIG_PATH").unwrap_or_else(|_| "config.yaml".to_string());
        let mut config = env_config::load_config(&config_path)?;
        env_config::apply_server_env_overrides(&mut config);
        env_config::apply_access_env_overrides(&mut config);
        env_config::apply_license_env_overrides(&mut config);
        env_config::apply_metrics_env_overrides(&mut config);
        env_config::apply_tracing_env_overrides(&mut config);

        Ok(Self {
            addr,
            config_path,
            config,
        })
    }
}

/// Collects every configuration problem that should stop the server from
/// starting.
pub fn preflight(settings: &Settings) -> Result<(), Vec<String>> {
    let mut missing = Vec::new();
    if settings.config.server.max_body_bytes == 0 {
        missing.push("server.max_body_bytes must be greater than zero".to_string());
    }
    let mut tokens = HashSet::new();
    for session in &settings.config.sessions {
        if session.token.trim().is_empty() {
            missing.push(format!("sessions: empty token for user {}", session.user_id));
        } else if !tokens.insert(session.token.as_str()) {
            missing.push(format!(
                "sessions: duplicate token for user {}",
                session.user_id
            ));
        }
    }
    if settings.config.license.enabled && settings.config.license.features.is_empty() {
        missing.push("license.features must not be empty when license.enabled=true".to_string());
    }
    if settings.config.metrics.enabled && !settings.config.metrics.endpoint.starts_with('/') {
        missing.push("metrics.endpoint must start with '/'".to_string());
    }
    if let Some(ratio) = settings.config.tracing.otel.sampling_ratio {
        if !(0.0..=1.0).contains(&ratio) {
            missing.push("tracing.otel.sampling_ratio must be between 0 and 1".to_string());
        }
    }
    if missing.is_empty() {
        Ok(())
    } else {
        Err(missing)
    }
}
