#![allow(clippy::pedantic)]
#![allow(clippy::nursery)]
#![deny(clippy::unwrap_used)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unnecessary_wraps)]

use groupsync_server::{bootstrap, cli, http, settings};

#[tokio::main]
async fn main() {
    if let cli::RunMode::OpenApi { out } = cli::parse_args() {
        let document = http::openapi::build_openapi();
        let json = match serde_json::to_string_pretty(&document) {
            Ok(json) => json,
            Err(err) => {
                eprintln!("failed to encode openapi document: {err}");
                std::process::exit(1);
            }
        };
        if let Some(path) = out {
            if let Err(err) = std::fs::write(&path, json) {
                eprintln!("failed to write openapi document: {err}");
                std::process::exit(1);
            }
        } else {
            println!("{json}");
        }
        return;
    }

    let settings = match settings::Settings::from_env() {
        Ok(settings) => settings,
        Err(err) => {
            eprintln!("failed to load settings: {err}");
            std::process::exit(1);
        }
    };
    let sentry_guard = bootstrap::init_sentry(&settings);
    let otel_guard = bootstrap::init_tracing(sentry_guard.is_some(), &settings);
    if let Err(missing) = settings::preflight(&settings) {
        tracing::error!(
            event = "preflight_failed",
            missing = ?missing,
            "Invalid configuration"
        );
        std::process::exit(1);
    }
    bootstrap::log_startup(&settings);
    let metrics_config = settings.config.metrics.clone();
    bootstrap::init_metrics_registry(&metrics_config);

    let state = bootstrap::build_state(&settings);
    let app = bootstrap::build_app(&metrics_config, state);
    bootstrap::serve(&settings, app).await;

    drop(otel_guard);
    drop(sentry_guard);
}
