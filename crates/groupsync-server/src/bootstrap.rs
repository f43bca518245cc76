use std::net::SocketAddr;
use std::sync::Arc;

use axum::{middleware, Router};
use groupsync_core::memory::InMemoryGroupService;
use groupsync_core::{License, LicenseFeature, LicenseFeatures, Session};
use opentelemetry::global;
use opentelemetry::propagation::Extractor;
use prometheus::Encoder;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use tracing_opentelemetry::OpenTelemetrySpanExt;

use crate::app::{self, AppState};
use crate::config::{LicenseConfig, MetricsConfig, ServerConfig};
use crate::infra::metrics;
use crate::runtime;
use crate::settings;

struct HeaderExtractor<'a>(&'a axum::http::HeaderMap);

impl<'a> Extractor for HeaderExtractor<'a> {
    fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(|value| value.to_str().ok())
    }

    fn keys(&self) -> Vec<&str> {
        self.0.keys().map(|key| key.as_str()).collect()
    }
}

pub fn init_sentry(settings: &settings::Settings) -> Option<sentry::ClientInitGuard> {
    let sentry_enabled = settings.config.sentry.enabled && !settings.config.sentry.dsn.is_empty();
    if !sentry_enabled {
        return None;
    }
    let environment = settings.config.sentry.environment.clone();
    let release = settings.config.sentry.release.clone();
    Some(sentry::init((
        settings.config.sentry.dsn.as_str(),
        sentry::ClientOptions {
            environment: environment.map(Into::into),
            release: release.map(Into::into),
            ..Default::default()
        },
    )))
}

pub fn init_tracing(
    sentry_enabled: bool,
    settings: &settings::Settings,
) -> Option<runtime::OtelGuard> {
    runtime::init_tracing(sentry_enabled, settings)
}

pub fn log_startup(settings: &settings::Settings) {
    let config = &settings.config;
    tracing::info!(
        event = "server_startup",
        addr = %settings.addr,
        config_path = %settings.config_path,
        server_name = ?config.server.name,
        license_feature = config.access.license_feature.as_str(),
        permission = config.access.permission.as_str(),
        license_enabled = config.license.enabled,
        sessions = config.sessions.len(),
        otel_enabled = config.tracing.otel.enabled,
        metrics_enabled = config.metrics.enabled,
        "Server configuration loaded"
    );
    if config.sessions.is_empty() {
        tracing::warn!(
            event = "sessions_empty",
            "No sessions configured; every group request will be rejected with 401"
        );
    }
    if !config.license.enabled {
        tracing::warn!(
            event = "license_missing",
            "No license installed; group mutations will answer 501"
        );
    }
}

pub fn init_metrics_registry(metrics_config: &MetricsConfig) {
    if !metrics_config.enabled {
        return;
    }
    #[cfg(target_os = "linux")]
    {
        let process_collector = prometheus::process_collector::ProcessCollector::for_self();
        if prometheus::default_registry()
            .register(Box::new(process_collector))
            .is_err()
        {
            tracing::warn!("failed to register process metrics");
        }
    }
    #[cfg(not(target_os = "linux"))]
    {
        tracing::warn!("process metrics are only available on linux");
    }
}

pub fn license_from_config(config: &LicenseConfig) -> Option<License> {
    if !config.enabled {
        return None;
    }
    let has = |feature: LicenseFeature| config.features.contains(&feature);
    Some(License {
        id: config
            .id
            .clone()
            .unwrap_or_else(|| "local".to_string()),
        features: LicenseFeatures {
            ldap: has(LicenseFeature::Ldap),
            ldap_groups: has(LicenseFeature::LdapGroups),
            saml: has(LicenseFeature::Saml),
        },
        expires_at: config.expires_at,
    })
}

/// Builds the in-memory application service seeded from configuration.
pub fn build_service(config: &ServerConfig) -> InMemoryGroupService {
    let mut service =
        InMemoryGroupService::new().with_license(license_from_config(&config.license));
    for (index, session) in config.sessions.iter().enumerate() {
        service = service.with_session(
            session.token.clone(),
            Session {
                id: format!("static-{index}"),
                user_id: session.user_id.clone(),
                roles: session.roles.clone(),
            },
        );
    }
    service
}

pub fn build_state(settings: &settings::Settings) -> AppState {
    let service = build_service(&settings.config);
    AppState::new(Arc::new(service), settings.config.clone())
}

pub fn build_app(metrics_config: &MetricsConfig, state: AppState) -> Router {
    let request_id_header = axum::http::HeaderName::from_static("x-request-id");
    let mut app = app::build_router(state)
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get("x-request-id")
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("unknown");
                let matched = request
                    .extensions()
                    .get::<axum::extract::MatchedPath>()
                    .map(axum::extract::MatchedPath::as_str)
                    .unwrap_or("unmatched");
                let span = tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    path = %matched,
                    request_id = %request_id,
                    user_id = tracing::field::Empty
                );
                let parent = global::get_text_map_propagator(|prop| {
                    prop.extract(&HeaderExtractor(request.headers()))
                });
                span.set_parent(parent);
                span
            }),
        )
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid))
        .layer(CatchPanicLayer::custom(|err| {
            tracing::error!(event = "panic_recovered", error = ?err, "handler panicked");
            match axum::response::Response::builder()
                .status(axum::http::StatusCode::INTERNAL_SERVER_ERROR)
                .body(axum::body::Body::empty())
            {
                Ok(response) => response,
                Err(err) => {
                    tracing::error!(event = "panic_response_failed", error = %err);
                    axum::response::Response::new(axum::body::Body::empty())
                }
            }
        }));
    if metrics_config.enabled {
        app = app.route_layer(middleware::from_fn(metrics::http_metrics));
        let (layer, handle) = axum_prometheus::PrometheusMetricLayer::pair();
        let path = metrics_config.endpoint.clone();
        app = app.layer(layer).route(
            &path,
            axum::routing::get(move || async move {
                let mut body = handle.render();
                let encoder = prometheus::TextEncoder::new();
                let mut buffer = Vec::new();
                if encoder.encode(&prometheus::gather(), &mut buffer).is_ok() && !buffer.is_empty()
                {
                    body.push('\n');
                    body.push_str(&String::from_utf8_lossy(&buffer));
                }

                let mut response = axum::response::Response::new(axum::body::Body::from(body));
                if let Ok(value) = axum::http::HeaderValue::from_str(encoder.format_type()) {
                    response
                        .headers_mut()
                        .insert(axum::http::header::CONTENT_TYPE, value);
                }
                response
            }),
        );
    }
    app
}

pub async fn serve(settings: &settings::Settings, app: Router) {
    let addr: SocketAddr = settings.addr;
    tracing::info!(%addr, "listening");

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!(event = "server_bind_failed", error = %err);
            return;
        }
    };
    if let Err(err) = axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(runtime::shutdown_signal())
    .await
    {
        tracing::error!(event = "server_failed", error = %err);
    }
}
