use crate::Database;
use crate::expiry::is_expired;
use crate::models::{AdRow, now_timestamp, parse_timestamp};
use anyhow::Result;
use chrono::{DateTime, Utc};
use rusqlite::OptionalExtension;

/// Fields for a new ad. Validation happens before this struct is built, so
/// reaching the rotation means the record is good to persist.
pub struct NewAd<'a> {
    pub id: &'a str,
    pub placement: &'a str,
    pub media_url: &'a str,
    pub target_url: &'a str,
    pub display_interval: i64,
    pub lifetime_days: i64,
}

impl Database {
    /// Exclusive activation: in one transaction, deactivates every active ad
    /// in the placement and inserts this one as active. After a successful
    /// return the new ad is the placement's only active row.
    pub fn activate_new_ad(&self, ad: &NewAd<'_>) -> Result<()> {
        self.with_conn_mut(|conn| {
            let tx = conn.unchecked_transaction()?;

            tx.execute(
                "UPDATE ads SET active = 0 WHERE placement = ?1 AND active = 1",
                [ad.placement],
            )?;
            tx.execute(
                "INSERT INTO ads
                    (id, placement, media_url, target_url, active, display_interval, lifetime_days, created_at)
                 VALUES (?1, ?2, ?3, ?4, 1, ?5, ?6, ?7)",
                rusqlite::params![
                    ad.id,
                    ad.placement,
                    ad.media_url,
                    ad.target_url,
                    ad.display_interval,
                    ad.lifetime_days,
                    now_timestamp()
                ],
            )?;

            tx.commit()?;
            Ok(())
        })
    }

    /// Rotate an existing ad in: its siblings in the same placement go
    /// inactive, it goes active, atomically. Returns false when the ad does
    /// not exist.
    pub fn activate_ad(&self, id: &str) -> Result<bool> {
        self.with_conn_mut(|conn| {
            let tx = conn.unchecked_transaction()?;

            let placement: Option<String> = tx
                .query_row("SELECT placement FROM ads WHERE id = ?1", [id], |row| {
                    row.get(0)
                })
                .optional()?;
            let Some(placement) = placement else {
                return Ok(false);
            };

            tx.execute(
                "UPDATE ads SET active = 0 WHERE placement = ?1 AND active = 1 AND id != ?2",
                (placement.as_str(), id),
            )?;
            tx.execute("UPDATE ads SET active = 1 WHERE id = ?1", [id])?;

            tx.commit()?;
            Ok(true)
        })
    }

    /// Sets every ad in the placement inactive and reports how many actually
    /// changed. Zero active rows is a no-op, not an error.
    pub fn deactivate_placement(&self, placement: &str) -> Result<usize> {
        self.with_conn_mut(|conn| {
            let changed = conn.execute(
                "UPDATE ads SET active = 0 WHERE placement = ?1 AND active = 1",
                [placement],
            )?;
            Ok(changed)
        })
    }

    /// Every ad row, newest first. Expiry is the caller's concern here; the
    /// admin listing wants to see expired rows too.
    pub fn list_ads(&self) -> Result<Vec<AdRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, placement, media_url, target_url, active,
                        display_interval, lifetime_days, created_at
                 FROM ads
                 ORDER BY created_at DESC",
            )?;
            let rows = stmt
                .query_map([], map_ad_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    /// Active ads as the mobile client should see them at `now`: at most one
    /// per placement, with expired rows filtered out.
    pub fn active_ads(&self, placement: Option<&str>, now: DateTime<Utc>) -> Result<Vec<AdRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, placement, media_url, target_url, active,
                        display_interval, lifetime_days, created_at
                 FROM ads
                 WHERE active = 1 AND (?1 IS NULL OR placement = ?1)",
            )?;
            let mut rows = stmt
                .query_map([placement], map_ad_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            rows.retain(|ad| !is_expired(parse_timestamp(&ad.created_at), ad.lifetime_days, now));
            Ok(rows)
        })
    }

    pub fn get_ad(&self, id: &str) -> Result<Option<AdRow>> {
        self.with_conn(|conn| {
            let row = conn
                .query_row(
                    "SELECT id, placement, media_url, target_url, active,
                            display_interval, lifetime_days, created_at
                     FROM ads WHERE id = ?1",
                    [id],
                    map_ad_row,
                )
                .optional()?;
            Ok(row)
        })
    }

    pub fn delete_ad(&self, id: &str) -> Result<bool> {
        self.with_conn_mut(|conn| {
            let changed = conn.execute("DELETE FROM ads WHERE id = ?1", [id])?;
            Ok(changed > 0)
        })
    }
}

fn map_ad_row(row: &rusqlite::Row<'_>) -> std::result::Result<AdRow, rusqlite::Error> {
    Ok(AdRow {
        id: row.get(0)?,
        placement: row.get(1)?,
        media_url: row.get(2)?,
        target_url: row.get(3)?,
        active: row.get(4)?,
        display_interval: row.get(5)?,
        lifetime_days: row.get(6)?,
        created_at: row.get(7)?,
    })
}
