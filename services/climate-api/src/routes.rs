//! Router assembly.

use std::sync::Arc;

use axum::{routing::get, Extension, Router};
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

use crate::handlers;
use crate::state::AppState;

/// Prefix of every data route.
pub const API_PREFIX: &str = "/api/v1.0";

/// Build the full application router.
pub fn build_router(state: Arc<AppState>) -> Router {
    // Static segments win over the date captures, so `/tobs` never reaches
    // the range handler.
    let api = Router::new()
        .route(
            "/precipitation",
            get(handlers::climate::precipitation_handler),
        )
        .route("/stations", get(handlers::climate::stations_handler))
        .route("/tobs", get(handlers::climate::tobs_handler))
        .route("/:start", get(handlers::climate::start_handler))
        .route("/:start/:end", get(handlers::climate::start_end_handler));

    Router::new()
        // Landing page
        .route("/", get(handlers::landing::landing_handler))
        // Observation queries
        .nest(API_PREFIX, api)
        // Health and metrics
        .route("/health", get(handlers::health::health_handler))
        .route("/ready", get(handlers::health::ready_handler))
        .route("/metrics", get(handlers::health::metrics_handler))
        .fallback(handlers::climate::not_found_handler)
        // Middleware
        .layer(Extension(state))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
}
