use axum::{extract::DefaultBodyLimit, Extension, Router};
use std::sync::Arc;
use std::time::Instant;

use groupsync_core::GroupService;

use crate::config::ServerConfig;
use crate::domains::access_control::AccessPolicy;

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<dyn GroupService>,
    pub access_policy: AccessPolicy,
    pub started_at: Instant,
    pub config: ServerConfig,
}

impl AppState {
    pub fn new(service: Arc<dyn GroupService>, config: ServerConfig) -> Self {
        Self {
            service,
            access_policy: AccessPolicy::from(&config.access),
            started_at: Instant::now(),
            config,
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    let extension_state = state.clone();
    let max_body_bytes = state.config.server.max_body_bytes;
    crate::http::router()
        .with_state(state)
        .layer(Extension(extension_state))
        .layer(DefaultBodyLimit::max(max_body_bytes))
}
