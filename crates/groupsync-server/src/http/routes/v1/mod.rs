use crate::app::AppState;
use axum::{middleware, Router};

pub fn router() -> Router<AppState> {
    // Every group endpoint needs a resolved session.
    Router::new()
        .merge(crate::domains::groups::http::v1::router())
        .layer(middleware::from_fn(crate::domains::auth::auth_middleware))
}
