use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use schemars::JsonSchema;
use serde::Serialize;

use crate::app::AppState;

#[derive(Serialize, JsonSchema)]
pub(crate) struct HealthResponse {
    pub(crate) status: &'static str,
    pub(crate) version: &'static str,
    pub(crate) build_commit: Option<&'static str>,
    pub(crate) uptime_seconds: u64,
    /// Whether the configured license feature is currently enabled.
    pub(crate) licensed: bool,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health))
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let licensed = state
        .service
        .license()
        .is_some_and(|license| license.has_feature(state.access_policy.license_feature));
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "ok",
            version: env!("CARGO_PKG_VERSION"),
            build_commit: option_env!("GIT_COMMIT"),
            uptime_seconds: state.started_at.elapsed().as_secs(),
            licensed,
        }),
    )
}
