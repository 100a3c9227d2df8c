//! Route definitions for the Stela HTTP API.
//!
//! All routes are mounted under `/api`. The router receives `AppState`
//! and passes it to all handlers via Axum's `State` extractor.

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::http::HeaderValue;
use axum::routing::{delete, get, post};
use tower_http::compression::CompressionLayer;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use stela_core::config::server::CorsConfig;

use crate::handlers;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    // Leave headroom above the policy cap for multipart framing; the
    // upload pipeline enforces the exact byte limit.
    let max_body = state.config.storage.max_upload_size_bytes as usize + 64 * 1024;

    let api_routes = Router::new().merge(model_routes()).merge(health_routes());

    let cors = build_cors_layer(&state.config.server.cors);

    Router::new()
        .nest("/api", api_routes)
        .layer(DefaultBodyLimit::max(max_body))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Model version lifecycle endpoints.
fn model_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/monuments/{monument_id}/models",
            get(handlers::model::list_versions).post(handlers::model::upload_version),
        )
        .route(
            "/monuments/{monument_id}/models/{version_id}/activate",
            post(handlers::model::activate_version),
        )
        .route(
            "/monuments/{monument_id}/models/{version_id}",
            delete(handlers::model::delete_version),
        )
}

/// Health endpoints.
fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}

/// Build the CORS layer from configuration.
fn build_cors_layer(config: &CorsConfig) -> CorsLayer {
    if config.allowed_origins.iter().any(|o| o == "*") {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    }
}
