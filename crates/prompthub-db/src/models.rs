//! Database row types — these map directly to SQLite rows.
//! Distinct from the prompthub-types API models to keep the DB layer
//! independent.

use chrono::{DateTime, NaiveDateTime, Utc};
use tracing::warn;

pub struct AdminRow {
    pub id: String,
    pub username: String,
    pub password: String,
    pub created_at: String,
}

pub struct CategoryRow {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub icon: String,
    pub display_order: i64,
    pub prompt_count: i64,
    pub created_at: String,
}

pub struct PromptRow {
    pub id: String,
    pub title: String,
    pub body: String,
    pub image_url: Option<String>,
    pub category_id: String,
    pub category_name: String,
    pub category_slug: String,
    pub tags: String,
    pub is_premium: bool,
    pub usage_count: i64,
    pub like_count: i64,
    pub is_liked: bool,
    pub is_favourited: bool,
    pub created_at: String,
    pub updated_at: String,
}

pub struct AdRow {
    pub id: String,
    pub placement: String,
    pub media_url: String,
    pub target_url: String,
    pub active: bool,
    pub display_interval: i64,
    pub lifetime_days: i64,
    pub created_at: String,
}

pub struct AdmobConfigRow {
    pub id: String,
    pub banner_ad_unit_id: String,
    pub interstitial_ad_unit_id: String,
    pub rewarded_ad_unit_id: String,
    pub app_open_ad_unit_id: String,
    pub active: bool,
    pub notes: String,
    pub updated_at: String,
}

/// Timestamps written by this crate are RFC 3339; rows created through the
/// SQLite `datetime('now')` column default use the bare datetime format.
/// Accept both, and fall back to the epoch on corrupt data rather than
/// failing the whole request.
pub fn parse_timestamp(s: &str) -> DateTime<Utc> {
    s.parse::<DateTime<Utc>>()
        .or_else(|_| {
            NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").map(|naive| naive.and_utc())
        })
        .unwrap_or_else(|e| {
            warn!("Corrupt timestamp '{}': {}", s, e);
            DateTime::default()
        })
}

/// Current time in the canonical stored form.
pub fn now_timestamp() -> String {
    Utc::now().to_rfc3339()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_both_stored_formats() {
        let rfc = "2026-08-20T10:30:00+00:00";
        assert_eq!(
            parse_timestamp(rfc).to_rfc3339(),
            "2026-08-20T10:30:00+00:00"
        );

        let sqlite = "2026-08-20 10:30:00";
        assert_eq!(parse_timestamp(sqlite).to_rfc3339(), parse_timestamp(rfc).to_rfc3339());
    }

    #[test]
    fn corrupt_timestamp_falls_back_to_epoch() {
        assert_eq!(parse_timestamp("not-a-date"), DateTime::<Utc>::default());
    }
}
