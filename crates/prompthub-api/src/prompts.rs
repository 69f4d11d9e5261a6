use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use uuid::Uuid;

use prompthub_db::models::{PromptRow, parse_timestamp};
use prompthub_db::prompts::PromptFilter;
use prompthub_types::api::{CategoryRef, CreatePromptRequest, PromptResponse, UpdatePromptRequest};

use crate::auth::AppState;
use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct PromptListQuery {
    pub search: Option<String>,
    pub category: Option<String>,
    pub device_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DeviceQuery {
    pub device_id: Option<String>,
}

pub async fn list_prompts(
    State(state): State<AppState>,
    Query(query): Query<PromptListQuery>,
) -> Result<Json<Vec<PromptResponse>>, ApiError> {
    let filter = PromptFilter {
        search: query.search.as_deref(),
        category_slug: query.category.as_deref(),
        device_id: query.device_id.as_deref(),
    };

    let rows = state.db.list_prompts(&filter)?;
    let prompts = rows
        .into_iter()
        .map(prompt_response)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Json(prompts))
}

/// Detail fetch. Every hit bumps the prompt's usage counter, so clients get
/// the count as of this fetch.
pub async fn get_prompt(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<DeviceQuery>,
) -> Result<Json<PromptResponse>, ApiError> {
    let row = state
        .db
        .fetch_prompt_detail(&id.to_string(), query.device_id.as_deref())?
        .ok_or(ApiError::NotFound("prompt"))?;

    Ok(Json(prompt_response(row)?))
}

pub async fn create_prompt(
    State(state): State<AppState>,
    Json(req): Json<CreatePromptRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_title(&req.title)?;
    validate_body(&req.body)?;
    if let Some(url) = req.image_url.as_deref() {
        validate_image_url(url)?;
    }

    if state.db.get_category(&req.category_id.to_string())?.is_none() {
        return Err(ApiError::NotFound("category"));
    }

    let id = Uuid::new_v4();
    state.db.create_prompt(
        &id.to_string(),
        &req.title,
        &req.body,
        req.image_url.as_deref(),
        &req.category_id.to_string(),
        &req.tags,
        req.is_premium,
    )?;

    let row = state
        .db
        .get_prompt(&id.to_string(), None)?
        .ok_or(ApiError::NotFound("prompt"))?;

    Ok((StatusCode::CREATED, Json(prompt_response(row)?)))
}

pub async fn update_prompt(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdatePromptRequest>,
) -> Result<Json<PromptResponse>, ApiError> {
    if let Some(title) = req.title.as_deref() {
        validate_title(title)?;
    }
    if let Some(body) = req.body.as_deref() {
        validate_body(body)?;
    }
    if let Some(url) = req.image_url.as_deref() {
        validate_image_url(url)?;
    }
    if let Some(category_id) = req.category_id
        && state.db.get_category(&category_id.to_string())?.is_none()
    {
        return Err(ApiError::NotFound("category"));
    }

    let found = state.db.update_prompt(
        &id.to_string(),
        req.title.as_deref(),
        req.body.as_deref(),
        req.image_url.as_deref(),
        req.category_id.map(|c| c.to_string()).as_deref(),
        req.tags.as_deref(),
        req.is_premium,
    )?;
    if !found {
        return Err(ApiError::NotFound("prompt"));
    }

    let row = state
        .db
        .get_prompt(&id.to_string(), None)?
        .ok_or(ApiError::NotFound("prompt"))?;
    Ok(Json(prompt_response(row)?))
}

pub async fn delete_prompt(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    if !state.db.delete_prompt(&id.to_string())? {
        return Err(ApiError::NotFound("prompt"));
    }
    Ok(StatusCode::NO_CONTENT)
}

fn validate_title(title: &str) -> Result<(), ApiError> {
    if title.is_empty() || title.len() > 200 {
        return Err(ApiError::BadRequest("title must be 1-200 characters".into()));
    }
    Ok(())
}

fn validate_body(body: &str) -> Result<(), ApiError> {
    if body.is_empty() {
        return Err(ApiError::BadRequest("body must not be empty".into()));
    }
    Ok(())
}

pub(crate) fn validate_image_url(url: &str) -> Result<(), ApiError> {
    if url.len() > 500 || !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(ApiError::BadRequest(
            "image_url must be an http(s) URL of at most 500 characters".into(),
        ));
    }
    Ok(())
}

pub(crate) fn prompt_response(row: PromptRow) -> Result<PromptResponse, ApiError> {
    let id: Uuid = row
        .id
        .parse()
        .map_err(|e| anyhow::anyhow!("Corrupt prompt id '{}': {}", row.id, e))?;
    let category_id: Uuid = row
        .category_id
        .parse()
        .map_err(|e| anyhow::anyhow!("Corrupt category id '{}': {}", row.category_id, e))?;

    Ok(PromptResponse {
        id,
        title: row.title,
        body: row.body,
        image_url: row.image_url,
        category: CategoryRef {
            id: category_id,
            name: row.category_name,
            slug: row.category_slug,
        },
        tags: row.tags,
        is_premium: row.is_premium,
        usage_count: row.usage_count,
        like_count: row.like_count,
        is_liked: row.is_liked,
        is_favourited: row.is_favourited,
        created_at: parse_timestamp(&row.created_at),
        updated_at: parse_timestamp(&row.updated_at),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_validation() {
        assert!(validate_title("Haiku Generator").is_ok());
        assert!(validate_title("").is_err());
        assert!(validate_title(&"x".repeat(201)).is_err());

        assert!(validate_body("Write a haiku about...").is_ok());
        assert!(validate_body("").is_err());

        assert!(validate_image_url("https://cdn.example.com/a.png").is_ok());
        assert!(validate_image_url("ftp://cdn.example.com/a.png").is_err());
        assert!(validate_image_url(&format!("https://e.com/{}", "x".repeat(500))).is_err());
    }
}
