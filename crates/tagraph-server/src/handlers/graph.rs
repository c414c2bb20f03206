//! Graph rebuild and retrieval handlers.

use axum::extract::State;
use axum::Json;

use tagraph_core::GraphDocument;

use crate::error::ApiError;
use crate::state::AppState;

/// Rebuilds the graph document from the entry store and returns it.
///
/// `POST /expose_json_data`
pub async fn rebuild_graph(
    State(state): State<AppState>,
) -> Result<Json<GraphDocument>, ApiError> {
    let service = state.service.lock().await;
    let doc = service.rebuild_graph()?;
    Ok(Json(doc))
}

/// Returns the last emitted graph document without rebuilding.
///
/// `GET /graph`
pub async fn current_graph(
    State(state): State<AppState>,
) -> Result<Json<GraphDocument>, ApiError> {
    let service = state.service.lock().await;
    let doc = service.current_graph()?;
    Ok(Json(doc))
}
