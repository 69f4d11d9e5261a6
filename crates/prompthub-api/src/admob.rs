use axum::{Json, extract::State};
use uuid::Uuid;

use prompthub_db::admob::AdmobConfigUpdate;
use prompthub_types::api::{AdmobConfigRequest, AdmobConfigResponse};

use crate::auth::AppState;
use crate::error::ApiError;

/// Google's published sample ad-unit ids. Served when no config row has ever
/// been written, so a fresh deployment never hands the app empty strings.
const FALLBACK_BANNER: &str = "ca-app-pub-3940256099942544/6300978111";
const FALLBACK_INTERSTITIAL: &str = "ca-app-pub-3940256099942544/1033173712";
const FALLBACK_REWARDED: &str = "ca-app-pub-3940256099942544/5224354917";
const FALLBACK_APP_OPEN: &str = "ca-app-pub-3940256099942544/9257395921";

/// Public remote-config endpoint: the active row, else the most recently
/// updated row, else the hard-coded fallback set.
pub async fn get_config(
    State(state): State<AppState>,
) -> Result<Json<AdmobConfigResponse>, ApiError> {
    let response = match state.db.effective_admob_config()? {
        Some(row) => AdmobConfigResponse {
            banner_ad_unit_id: row.banner_ad_unit_id,
            interstitial_ad_unit_id: row.interstitial_ad_unit_id,
            rewarded_ad_unit_id: row.rewarded_ad_unit_id,
            app_open_ad_unit_id: row.app_open_ad_unit_id,
            source: if row.active { "active" } else { "latest" }.to_string(),
        },
        None => AdmobConfigResponse {
            banner_ad_unit_id: FALLBACK_BANNER.to_string(),
            interstitial_ad_unit_id: FALLBACK_INTERSTITIAL.to_string(),
            rewarded_ad_unit_id: FALLBACK_REWARDED.to_string(),
            app_open_ad_unit_id: FALLBACK_APP_OPEN.to_string(),
            source: "fallback".to_string(),
        },
    };

    Ok(Json(response))
}

/// Admin write: singleton activation. Validation runs before the transaction
/// so a bad payload never touches the stored config.
pub async fn put_config(
    State(state): State<AppState>,
    Json(req): Json<AdmobConfigRequest>,
) -> Result<Json<AdmobConfigResponse>, ApiError> {
    for (field, value) in [
        ("banner_ad_unit_id", &req.banner_ad_unit_id),
        ("interstitial_ad_unit_id", &req.interstitial_ad_unit_id),
        ("rewarded_ad_unit_id", &req.rewarded_ad_unit_id),
        ("app_open_ad_unit_id", &req.app_open_ad_unit_id),
    ] {
        if value.is_empty() {
            return Err(ApiError::BadRequest(format!("{field} required")));
        }
    }

    let id = Uuid::new_v4();
    state.db.activate_admob_config(
        &id.to_string(),
        &AdmobConfigUpdate {
            banner_ad_unit_id: &req.banner_ad_unit_id,
            interstitial_ad_unit_id: &req.interstitial_ad_unit_id,
            rewarded_ad_unit_id: &req.rewarded_ad_unit_id,
            app_open_ad_unit_id: &req.app_open_ad_unit_id,
            notes: &req.notes,
        },
    )?;

    Ok(Json(AdmobConfigResponse {
        banner_ad_unit_id: req.banner_ad_unit_id,
        interstitial_ad_unit_id: req.interstitial_ad_unit_id,
        rewarded_ad_unit_id: req.rewarded_ad_unit_id,
        app_open_ad_unit_id: req.app_open_ad_unit_id,
        source: "active".to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use prompthub_db::Database;
    use std::sync::Arc;

    fn state() -> AppState {
        Arc::new(crate::auth::AppStateInner {
            db: Database::open_in_memory().unwrap(),
            jwt_secret: "test-secret".into(),
        })
    }

    #[tokio::test]
    async fn falls_back_until_a_config_is_written() {
        let state = state();

        let Json(cfg) = get_config(State(state.clone())).await.unwrap();
        assert_eq!(cfg.source, "fallback");
        assert_eq!(cfg.banner_ad_unit_id, FALLBACK_BANNER);

        let req = AdmobConfigRequest {
            banner_ad_unit_id: "ca-app-pub-1/banner".into(),
            interstitial_ad_unit_id: "ca-app-pub-1/int".into(),
            rewarded_ad_unit_id: "ca-app-pub-1/rew".into(),
            app_open_ad_unit_id: "ca-app-pub-1/open".into(),
            notes: "launch config".into(),
        };
        put_config(State(state.clone()), Json(req)).await.unwrap();

        let Json(cfg) = get_config(State(state)).await.unwrap();
        assert_eq!(cfg.source, "active");
        assert_eq!(cfg.banner_ad_unit_id, "ca-app-pub-1/banner");
    }

    #[tokio::test]
    async fn rejects_empty_ad_unit_ids() {
        let state = state();
        let req = AdmobConfigRequest {
            banner_ad_unit_id: "".into(),
            interstitial_ad_unit_id: "ca-app-pub-1/int".into(),
            rewarded_ad_unit_id: "ca-app-pub-1/rew".into(),
            app_open_ad_unit_id: "ca-app-pub-1/open".into(),
            notes: String::new(),
        };
        assert!(put_config(State(state), Json(req)).await.is_err());
    }
}
