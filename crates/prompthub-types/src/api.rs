use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::Placement;

// -- JWT Claims --

/// JWT claims shared between the login handler and the admin-route
/// middleware. Canonical definition lives here in prompthub-types.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub username: String,
    pub exp: usize,
}

// -- Auth --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub admin_id: Uuid,
    pub username: String,
    pub token: String,
}

// -- Categories --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateCategoryRequest {
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub display_order: i64,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateCategoryRequest {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub icon: Option<String>,
    pub display_order: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct CategoryResponse {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub icon: String,
    pub display_order: i64,
    pub prompt_count: i64,
    pub created_at: DateTime<Utc>,
}

/// Slim category embedded in prompt payloads so clients don't need a second
/// fetch to label a prompt.
#[derive(Debug, Serialize)]
pub struct CategoryRef {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
}

// -- Prompts --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreatePromptRequest {
    pub title: String,
    pub body: String,
    pub image_url: Option<String>,
    pub category_id: Uuid,
    #[serde(default)]
    pub tags: String,
    #[serde(default)]
    pub is_premium: bool,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdatePromptRequest {
    pub title: Option<String>,
    pub body: Option<String>,
    pub image_url: Option<String>,
    pub category_id: Option<Uuid>,
    pub tags: Option<String>,
    pub is_premium: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct PromptResponse {
    pub id: Uuid,
    pub title: String,
    pub body: String,
    pub image_url: Option<String>,
    pub category: CategoryRef,
    pub tags: String,
    pub is_premium: bool,
    pub usage_count: i64,
    pub like_count: i64,
    pub is_liked: bool,
    pub is_favourited: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// -- Favourites & likes --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AddFavouriteRequest {
    pub device_id: String,
    pub prompt_id: Uuid,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ToggleLikeRequest {
    pub device_id: String,
}

#[derive(Debug, Serialize)]
pub struct ToggleLikeResponse {
    pub liked: bool,
    pub like_count: i64,
}

// -- Ads --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateAdRequest {
    pub placement: Placement,
    pub media_url: String,
    pub target_url: String,
    /// Cadence hint for the client: show the ad every N content items.
    #[serde(default = "default_display_interval")]
    pub display_interval: i64,
    #[serde(default = "default_lifetime_days")]
    pub lifetime_days: i64,
}

fn default_display_interval() -> i64 {
    5
}

fn default_lifetime_days() -> i64 {
    30
}

#[derive(Debug, Serialize)]
pub struct AdResponse {
    pub id: Uuid,
    pub placement: Placement,
    pub media_url: String,
    pub target_url: String,
    pub active: bool,
    pub display_interval: i64,
    pub lifetime_days: i64,
    /// Computed from created_at + lifetime_days; never stored.
    pub expired: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct DeactivateResponse {
    pub deactivated: usize,
}

// -- AdMob config --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AdmobConfigRequest {
    pub banner_ad_unit_id: String,
    pub interstitial_ad_unit_id: String,
    pub rewarded_ad_unit_id: String,
    pub app_open_ad_unit_id: String,
    #[serde(default)]
    pub notes: String,
}

#[derive(Debug, Serialize)]
pub struct AdmobConfigResponse {
    pub banner_ad_unit_id: String,
    pub interstitial_ad_unit_id: String,
    pub rewarded_ad_unit_id: String,
    pub app_open_ad_unit_id: String,
    /// Where the config came from: "active", "latest" (no active row, most
    /// recently updated one), or "fallback" (hard-coded test ids).
    pub source: String,
}
