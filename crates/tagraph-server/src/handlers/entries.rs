//! Entry append handler.

use axum::extract::State;
use axum::Json;

use crate::error::ApiError;
use crate::schema::entries::{AppendEntriesRequest, AppendEntriesResponse};
use crate::state::AppState;

/// Appends a raw batch of entries.
///
/// `POST /entries`
pub async fn append_entries(
    State(state): State<AppState>,
    Json(req): Json<AppendEntriesRequest>,
) -> Result<Json<AppendEntriesResponse>, ApiError> {
    let service = state.service.lock().await;
    let response = service.append_entries(&req.raw)?;
    Ok(Json(response))
}
