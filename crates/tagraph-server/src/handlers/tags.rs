//! Tag listing handlers.

use axum::extract::State;
use axum::Json;

use crate::error::ApiError;
use crate::schema::tags::{TagCountsResponse, TagsUsedResponse};
use crate::state::AppState;

/// `GET /tags`
pub async fn tag_counts(
    State(state): State<AppState>,
) -> Result<Json<TagCountsResponse>, ApiError> {
    let service = state.service.lock().await;
    Ok(Json(service.tag_counts()?))
}

/// `GET /tags/used`
pub async fn tags_used(
    State(state): State<AppState>,
) -> Result<Json<TagsUsedResponse>, ApiError> {
    let service = state.service.lock().await;
    Ok(Json(service.tags_used()?))
}
