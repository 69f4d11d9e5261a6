use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use uuid::Uuid;

use prompthub_db::models::{CategoryRow, parse_timestamp};
use prompthub_types::api::{CategoryResponse, CreateCategoryRequest, UpdateCategoryRequest};

use crate::auth::AppState;
use crate::error::ApiError;

pub async fn list_categories(
    State(state): State<AppState>,
) -> Result<Json<Vec<CategoryResponse>>, ApiError> {
    let rows = state.db.list_categories()?;
    let categories = rows
        .into_iter()
        .map(category_response)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Json(categories))
}

pub async fn create_category(
    State(state): State<AppState>,
    Json(req): Json<CreateCategoryRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_name(&req.name)?;
    validate_slug(&req.slug)?;

    let id = Uuid::new_v4();
    state
        .db
        .create_category(&id.to_string(), &req.name, &req.slug, &req.icon, req.display_order)
        .map_err(conflict_on_duplicate)?;

    let row = state
        .db
        .get_category(&id.to_string())?
        .ok_or(ApiError::NotFound("category"))?;

    Ok((StatusCode::CREATED, Json(category_response(row)?)))
}

pub async fn update_category(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateCategoryRequest>,
) -> Result<Json<CategoryResponse>, ApiError> {
    if let Some(name) = req.name.as_deref() {
        validate_name(name)?;
    }
    if let Some(slug) = req.slug.as_deref() {
        validate_slug(slug)?;
    }

    let found = state
        .db
        .update_category(
            &id.to_string(),
            req.name.as_deref(),
            req.slug.as_deref(),
            req.icon.as_deref(),
            req.display_order,
        )
        .map_err(conflict_on_duplicate)?;
    if !found {
        return Err(ApiError::NotFound("category"));
    }

    let row = state
        .db
        .get_category(&id.to_string())?
        .ok_or(ApiError::NotFound("category"))?;
    Ok(Json(category_response(row)?))
}

pub async fn delete_category(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    if !state.db.delete_category(&id.to_string())? {
        return Err(ApiError::NotFound("category"));
    }
    Ok(StatusCode::NO_CONTENT)
}

fn validate_name(name: &str) -> Result<(), ApiError> {
    if name.is_empty() || name.len() > 100 {
        return Err(ApiError::BadRequest("name must be 1-100 characters".into()));
    }
    Ok(())
}

fn validate_slug(slug: &str) -> Result<(), ApiError> {
    if slug.is_empty() || slug.len() > 100 {
        return Err(ApiError::BadRequest("slug must be 1-100 characters".into()));
    }
    if !slug
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    {
        return Err(ApiError::BadRequest(
            "slug may only contain lowercase letters, digits and hyphens".into(),
        ));
    }
    Ok(())
}

fn conflict_on_duplicate(err: anyhow::Error) -> ApiError {
    if prompthub_db::is_constraint_violation(&err) {
        ApiError::Conflict("a category with that name or slug already exists".into())
    } else {
        ApiError::Internal(err)
    }
}

pub(crate) fn category_response(row: CategoryRow) -> Result<CategoryResponse, ApiError> {
    let id: Uuid = row
        .id
        .parse()
        .map_err(|e| anyhow::anyhow!("Corrupt category id '{}': {}", row.id, e))?;

    Ok(CategoryResponse {
        id,
        name: row.name,
        slug: row.slug,
        icon: row.icon,
        display_order: row.display_order,
        prompt_count: row.prompt_count,
        created_at: parse_timestamp(&row.created_at),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slug_validation() {
        assert!(validate_slug("writing").is_ok());
        assert!(validate_slug("creative-writing-101").is_ok());
        assert!(validate_slug("").is_err());
        assert!(validate_slug("Writing").is_err());
        assert!(validate_slug("writing prompts").is_err());

        assert!(validate_name("Writing").is_ok());
        assert!(validate_name("").is_err());
        assert!(validate_name(&"x".repeat(101)).is_err());
    }
}
