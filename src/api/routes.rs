use axum::{
    middleware,
    routing::{get, patch, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::{make_span_with_trace_id, trace_id_middleware};

use super::handlers;
use super::AppState;

/// Creates the main API router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/chat", post(handlers::chat))
        // Library
        .route("/library/:session_id", get(handlers::get_library))
        .route(
            "/library/:session_id/items/:item_id",
            patch(handlers::update_progress),
        )
        // Sessions
        .route("/sessions/:session_id", get(handlers::get_session))
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(trace_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_trace_id))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
