//! API routes.

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::{DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::error::expose_error_details;
use crate::handlers::{health, history, index, lookup_history, ready, summary, upload};
use crate::metrics::metrics_middleware;
use crate::middleware::{
    cors_layer, request_span, security_headers, throttle_uploads, UploadThrottle,
};
use crate::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState, metrics_handle: Option<PrometheusHandle>) -> Router {
    let throttle = Arc::new(UploadThrottle::new(
        state.config.rate_limit_rps,
        state.config.trust_proxy_headers,
    ));

    // Uploads are streamed to disk, so axum's default extractor limit is
    // lifted to the configured body size.
    let upload_routes = Router::new()
        .route("/upload", post(upload))
        .layer(DefaultBodyLimit::max(state.config.max_body_size))
        .layer(middleware::from_fn_with_state(throttle, throttle_uploads));

    let page_routes = Router::new()
        .route("/", get(index))
        .route("/summary/:video_id", get(summary))
        .route("/history", get(history).post(lookup_history));

    let health_routes = Router::new()
        .route("/health", get(health))
        .route("/healthz", get(health))
        .route("/ready", get(ready));

    let metrics_routes = if let Some(handle) = metrics_handle {
        Router::new().route("/metrics", get(move || async move { handle.render() }))
    } else {
        Router::new()
    };

    let mut router = Router::new()
        .merge(page_routes)
        .merge(upload_routes)
        .merge(health_routes)
        .merge(metrics_routes);

    if !state.config.is_production() {
        router = router.layer(middleware::from_fn(expose_error_details));
    }

    router
        .layer(RequestBodyLimitLayer::new(state.config.max_body_size))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(security_headers))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(request_span)
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(cors_layer(&state.config.cors_origins))
        .with_state(state)
}
