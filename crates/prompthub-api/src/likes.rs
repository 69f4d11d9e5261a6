use axum::{
    Json,
    extract::{Path, State},
};
use uuid::Uuid;

use prompthub_types::api::{ToggleLikeRequest, ToggleLikeResponse};

use crate::auth::AppState;
use crate::error::ApiError;

/// Flip the device's like on a prompt. Two states per (device, prompt):
/// absent and present; every call moves to the other one.
pub async fn toggle_like(
    State(state): State<AppState>,
    Path(prompt_id): Path<Uuid>,
    Json(req): Json<ToggleLikeRequest>,
) -> Result<Json<ToggleLikeResponse>, ApiError> {
    if req.device_id.is_empty() {
        return Err(ApiError::BadRequest("device_id required".into()));
    }

    let outcome = state
        .db
        .toggle_like(&req.device_id, &prompt_id.to_string())?
        .ok_or(ApiError::NotFound("prompt"))?;

    Ok(Json(ToggleLikeResponse {
        liked: outcome.liked,
        like_count: outcome.like_count,
    }))
}
