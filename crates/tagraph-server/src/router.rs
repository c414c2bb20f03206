//! Router assembly for the tagraph HTTP API.
//!
//! [`build_router`] wires all handler functions to their routes with
//! CORS and tracing middleware layers.

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Builds the complete axum router with all API routes.
///
/// CORS is permissive: the visualization front end is served from a
/// different origin.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health::health))
        // Graph
        .route("/expose_json_data", post(handlers::graph::rebuild_graph))
        .route("/graph", get(handlers::graph::current_graph))
        // Store
        .route("/entries", post(handlers::entries::append_entries))
        .route("/tags", get(handlers::tags::tag_counts))
        .route("/tags/used", get(handlers::tags::tags_used))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
