//! API routes.

use axum::extract::DefaultBodyLimit;
use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::limit::RequestBodyLimitLayer;

use crate::handlers::{
    create_summary, download_summary, health, index, preview_summary, ready,
};
use crate::metrics::metrics_middleware;
use crate::middleware::{
    cors_layer, redact_error_details, request_id, request_logging, security_headers,
};
use crate::state::AppState;

/// Create the API router.
pub fn create_router(state: AppState, metrics_handle: Option<PrometheusHandle>) -> Router {
    let summary_routes = Router::new()
        // Upload and summarise
        .route("/summaries/:variant", post(create_summary))
        // Inline playback of the latest output
        .route("/summaries/:variant/file", get(preview_summary))
        // Attachment with the variant's download name
        .route("/summaries/:variant/download", get(download_summary));

    let health_routes = Router::new()
        .route("/health", get(health))
        .route("/healthz", get(health))
        .route("/ready", get(ready));

    // Metrics endpoint (if enabled)
    let metrics_routes = if let Some(handle) = metrics_handle {
        Router::new().route("/metrics", get(move || async move { handle.render() }))
    } else {
        Router::new()
    };

    Router::new()
        .route("/", get(index))
        .nest("/api", summary_routes)
        .merge(health_routes)
        .merge(metrics_routes)
        // Uploads are bounded by the configured limit instead of axum's 2 MB default
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(state.config.max_upload_bytes))
        .layer(middleware::from_fn_with_state(
            state.config.is_production(),
            redact_error_details,
        ))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(security_headers))
        .layer(middleware::from_fn(request_id))
        .layer(middleware::from_fn(request_logging))
        .layer(cors_layer(&state.config.cors_origins))
        .with_state(state)
}
