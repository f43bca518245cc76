use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::middleware::Next;
use axum::response::Response;

use crate::app::AppState;
use crate::infra::request_context::{bearer_token, request_id, user_agent};

/// Resolves the bearer token into a [`groupsync_core::Session`] through the
/// application service and stores it in the request extensions.
pub async fn auth_middleware(
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, StatusCode> {
    let state = request
        .extensions()
        .get::<AppState>()
        .cloned()
        .ok_or(StatusCode::INTERNAL_SERVER_ERROR)?;

    let Some(token) = bearer_token(request.headers()) else {
        tracing::warn!(
            event = "auth_failed",
            reason = "missing_bearer",
            request_id = ?request_id(request.headers()),
            user_agent = ?user_agent(request.headers()),
            "Missing bearer token"
        );
        return Err(StatusCode::UNAUTHORIZED);
    };

    let session = match state.service.session_from_token(token).await {
        Ok(session) => session,
        Err(err) => {
            tracing::warn!(
                event = "auth_failed",
                reason = %err,
                request_id = ?request_id(request.headers()),
                "Session token rejected"
            );
            return Err(StatusCode::UNAUTHORIZED);
        }
    };

    tracing::Span::current().record("user_id", session.user_id.as_str());
    request.extensions_mut().insert(session);
    Ok(next.run(request).await)
}
