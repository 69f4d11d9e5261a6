use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use uuid::Uuid;

use prompthub_types::api::{AddFavouriteRequest, PromptResponse};

use crate::auth::AppState;
use crate::error::ApiError;
use crate::prompts::prompt_response;

#[derive(Debug, Deserialize)]
pub struct FavouriteQuery {
    pub device_id: String,
}

pub async fn list_favourites(
    State(state): State<AppState>,
    Query(query): Query<FavouriteQuery>,
) -> Result<Json<Vec<PromptResponse>>, ApiError> {
    let rows = state.db.list_favourites(&query.device_id)?;
    let prompts = rows
        .into_iter()
        .map(prompt_response)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Json(prompts))
}

pub async fn add_favourite(
    State(state): State<AppState>,
    Json(req): Json<AddFavouriteRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if req.device_id.is_empty() {
        return Err(ApiError::BadRequest("device_id required".into()));
    }

    if !state
        .db
        .add_favourite(&req.device_id, &req.prompt_id.to_string())?
    {
        return Err(ApiError::NotFound("prompt"));
    }

    Ok((StatusCode::CREATED, Json(serde_json::json!({ "favourited": true }))))
}

pub async fn remove_favourite(
    State(state): State<AppState>,
    Path(prompt_id): Path<Uuid>,
    Query(query): Query<FavouriteQuery>,
) -> Result<impl IntoResponse, ApiError> {
    if !state
        .db
        .remove_favourite(&query.device_id, &prompt_id.to_string())?
    {
        return Err(ApiError::NotFound("favourite"));
    }

    Ok(Json(serde_json::json!({ "removed": true })))
}
