use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use uuid::Uuid;

use prompthub_db::ads::NewAd;
use prompthub_db::expiry::is_expired;
use prompthub_db::models::{AdRow, parse_timestamp};
use prompthub_types::api::{AdResponse, CreateAdRequest, DeactivateResponse};
use prompthub_types::models::Placement;

use crate::auth::AppState;
use crate::error::ApiError;
use crate::prompts::validate_image_url;

#[derive(Debug, Deserialize)]
pub struct AdQuery {
    pub placement: Option<String>,
}

/// Public endpoint: the ad the client should show right now per placement.
/// Inactive and expired rows never appear here.
pub async fn list_active_ads(
    State(state): State<AppState>,
    Query(query): Query<AdQuery>,
) -> Result<Json<Vec<AdResponse>>, ApiError> {
    let placement = match query.placement.as_deref() {
        Some(raw) => Some(
            Placement::parse(raw)
                .ok_or_else(|| ApiError::BadRequest(format!("unknown placement '{raw}'")))?,
        ),
        None => None,
    };

    let now = chrono::Utc::now();
    let rows = state
        .db
        .active_ads(placement.map(|p| p.as_str()), now)?;
    let ads = rows
        .into_iter()
        .map(|row| ad_response(row, now))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Json(ads))
}

/// Admin listing: every row, active or not, with computed expiry.
pub async fn list_all_ads(
    State(state): State<AppState>,
) -> Result<Json<Vec<AdResponse>>, ApiError> {
    let now = chrono::Utc::now();
    let rows = state.db.list_ads()?;
    let ads = rows
        .into_iter()
        .map(|row| ad_response(row, now))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Json(ads))
}

/// Create a new ad and rotate it in as the placement's active one.
/// Validation failures happen before the transaction starts, so a bad
/// payload never deactivates the current ad.
pub async fn create_ad(
    State(state): State<AppState>,
    Json(req): Json<CreateAdRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_ad(&req)?;

    let id = Uuid::new_v4();
    state.db.activate_new_ad(&NewAd {
        id: &id.to_string(),
        placement: req.placement.as_str(),
        media_url: &req.media_url,
        target_url: &req.target_url,
        display_interval: req.display_interval,
        lifetime_days: req.lifetime_days,
    })?;

    let row = state
        .db
        .get_ad(&id.to_string())?
        .ok_or(ApiError::NotFound("ad"))?;

    Ok((StatusCode::CREATED, Json(ad_response(row, chrono::Utc::now())?)))
}

pub async fn activate_ad(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    if !state.db.activate_ad(&id.to_string())? {
        return Err(ApiError::NotFound("ad"));
    }
    Ok(Json(serde_json::json!({ "activated": true })))
}

pub async fn deactivate_placement(
    State(state): State<AppState>,
    Path(placement): Path<String>,
) -> Result<Json<DeactivateResponse>, ApiError> {
    let placement = Placement::parse(&placement)
        .ok_or_else(|| ApiError::BadRequest(format!("unknown placement '{placement}'")))?;

    let deactivated = state.db.deactivate_placement(placement.as_str())?;
    Ok(Json(DeactivateResponse { deactivated }))
}

pub async fn delete_ad(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    if !state.db.delete_ad(&id.to_string())? {
        return Err(ApiError::NotFound("ad"));
    }
    Ok(StatusCode::NO_CONTENT)
}

fn validate_ad(req: &CreateAdRequest) -> Result<(), ApiError> {
    validate_image_url(&req.media_url)?;
    if !(req.target_url.starts_with("http://") || req.target_url.starts_with("https://")) {
        return Err(ApiError::BadRequest("target_url must be an http(s) URL".into()));
    }
    if req.display_interval < 1 {
        return Err(ApiError::BadRequest("display_interval must be at least 1".into()));
    }
    if !(0..=36_500).contains(&req.lifetime_days) {
        return Err(ApiError::BadRequest(
            "lifetime_days must be between 0 and 36500".into(),
        ));
    }
    Ok(())
}

fn ad_response(row: AdRow, now: chrono::DateTime<chrono::Utc>) -> Result<AdResponse, ApiError> {
    let id: Uuid = row
        .id
        .parse()
        .map_err(|e| anyhow::anyhow!("Corrupt ad id '{}': {}", row.id, e))?;
    let placement = Placement::parse(&row.placement)
        .ok_or_else(|| anyhow::anyhow!("Corrupt placement '{}' on ad '{}'", row.placement, row.id))?;

    let created_at = parse_timestamp(&row.created_at);
    Ok(AdResponse {
        id,
        placement,
        media_url: row.media_url,
        target_url: row.target_url,
        active: row.active,
        display_interval: row.display_interval,
        lifetime_days: row.lifetime_days,
        expired: is_expired(created_at, row.lifetime_days, now),
        created_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn req() -> CreateAdRequest {
        CreateAdRequest {
            placement: Placement::Banner,
            media_url: "https://cdn.example.com/ad.png".into(),
            target_url: "https://example.com/offer".into(),
            display_interval: 5,
            lifetime_days: 30,
        }
    }

    #[test]
    fn ad_validation() {
        assert!(validate_ad(&req()).is_ok());

        let mut bad = req();
        bad.media_url = "not-a-url".into();
        assert!(validate_ad(&bad).is_err());

        let mut bad = req();
        bad.display_interval = 0;
        assert!(validate_ad(&bad).is_err());

        let mut bad = req();
        bad.lifetime_days = -1;
        assert!(validate_ad(&bad).is_err());

        let mut bad = req();
        bad.lifetime_days = 36_501;
        assert!(validate_ad(&bad).is_err());
    }
}
