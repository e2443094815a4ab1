//! gateway-server library crate
//!
//! Exposes `build_app` and `config` for integration tests.
//! The actual binary entrypoint is in `main.rs`.

pub mod config;
mod error;
mod middleware;
mod routes;
pub mod upstream;

use std::sync::OnceLock;

use axum::{Extension, Router, middleware as axum_mw, routing::get};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::normalize_path::NormalizePath;
use tower_http::trace::TraceLayer;

use config::Config;
use upstream::EmrClient;

pub use middleware::REQUEST_ID_HEADER;

/// The application service: the router behind trailing-slash normalization,
/// so `/fhir/r4/Patient/` routes like `/fhir/r4/Patient`.
pub type App = NormalizePath<Router>;

static PROMETHEUS: OnceLock<PrometheusHandle> = OnceLock::new();

/// Install the global Prometheus recorder on first use and hand out its handle.
/// Later calls (e.g. one `build_app` per integration test) share the same
/// recorder, so `/metrics` always renders what the `metrics` macros record.
fn prometheus_handle() -> PrometheusHandle {
    PROMETHEUS
        .get_or_init(|| {
            let recorder = PrometheusBuilder::new().build_recorder();
            let handle = recorder.handle();
            if let Err(e) = metrics::set_global_recorder(recorder) {
                tracing::warn!(error = %e, "Metrics recorder already installed");
            }
            handle
        })
        .clone()
}

/// Build the full application with all routes and middleware.
///
/// Extracted from `main()` so integration tests can construct the app
/// without binding to a TCP port.
pub fn build_app(config: &Config) -> App {
    let client = EmrClient::new(config);
    let prometheus_handle = prometheus_handle();

    let public_routes = Router::new()
        .route("/", get(routes::health::check))
        .route("/metrics", get(routes::metrics::get))
        .layer(Extension(prometheus_handle));

    // Build CORS layer
    let cors = if config.cors_origins.iter().any(|o| o == "*") {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<_> = config
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    };

    // Build application
    let router = Router::new()
        .merge(public_routes)
        .merge(routes::gateway_routes())
        .fallback(routes::not_found)
        .method_not_allowed_fallback(routes::not_found)
        .with_state(client)
        .layer(CatchPanicLayer::custom(routes::panic_response))
        .layer(axum_mw::from_fn(middleware::audit_middleware))
        .layer(axum_mw::from_fn(middleware::request_id_middleware))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(axum_mw::from_fn(middleware::metrics_middleware));

    // Normalization must wrap the router: layers added with `Router::layer`
    // run after the route has already been matched.
    NormalizePath::trim_trailing_slash(router)
}
