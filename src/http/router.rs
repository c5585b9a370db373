//! Router configuration for the HTTP API.
//!
//! Sets up all routes and middleware (CORS, compression, tracing) and
//! creates the axum router ready for serving.

use axum::{
    routing::get,
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers;
use super::state::AppState;

/// Create the main application router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration - permissive for development, should be restricted in production
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(handlers::landing))
        .route("/health", get(handlers::health_check))
        .route(
            "/scientists",
            get(handlers::list_scientists).post(handlers::create_scientist),
        )
        .route(
            "/scientists/{id}",
            get(handlers::get_scientist)
                .patch(handlers::update_scientist)
                .delete(handlers::delete_scientist),
        )
        .route("/planets", get(handlers::list_planets))
        .route(
            "/missions",
            get(handlers::list_missions).post(handlers::create_mission),
        )
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
