use crate::Database;
use crate::models::{AdmobConfigRow, now_timestamp};
use anyhow::Result;
use rusqlite::OptionalExtension;

/// Ad-unit identifiers for one config revision.
pub struct AdmobConfigUpdate<'a> {
    pub banner_ad_unit_id: &'a str,
    pub interstitial_ad_unit_id: &'a str,
    pub rewarded_ad_unit_id: &'a str,
    pub app_open_ad_unit_id: &'a str,
    pub notes: &'a str,
}

impl Database {
    /// Singleton activation. The table is meant to hold one row; rather than
    /// inserting a sibling, the write reuses the existing row (preferring the
    /// active one, else the most recently updated) and prunes any strays in
    /// the same transaction. Returns the id of the row that now holds the
    /// config.
    pub fn activate_admob_config(
        &self,
        new_id: &str,
        cfg: &AdmobConfigUpdate<'_>,
    ) -> Result<String> {
        self.with_conn_mut(|conn| {
            let tx = conn.unchecked_transaction()?;

            let keeper: Option<String> = tx
                .query_row(
                    "SELECT id FROM admob_config ORDER BY active DESC, updated_at DESC LIMIT 1",
                    [],
                    |row| row.get(0),
                )
                .optional()?;

            let id = match keeper {
                Some(id) => {
                    tx.execute("DELETE FROM admob_config WHERE id != ?1", [id.as_str()])?;
                    tx.execute(
                        "UPDATE admob_config SET
                            banner_ad_unit_id = ?2,
                            interstitial_ad_unit_id = ?3,
                            rewarded_ad_unit_id = ?4,
                            app_open_ad_unit_id = ?5,
                            notes = ?6,
                            active = 1,
                            updated_at = ?7
                         WHERE id = ?1",
                        rusqlite::params![
                            id,
                            cfg.banner_ad_unit_id,
                            cfg.interstitial_ad_unit_id,
                            cfg.rewarded_ad_unit_id,
                            cfg.app_open_ad_unit_id,
                            cfg.notes,
                            now_timestamp()
                        ],
                    )?;
                    id
                }
                None => {
                    tx.execute(
                        "INSERT INTO admob_config
                            (id, banner_ad_unit_id, interstitial_ad_unit_id,
                             rewarded_ad_unit_id, app_open_ad_unit_id, active, notes, updated_at)
                         VALUES (?1, ?2, ?3, ?4, ?5, 1, ?6, ?7)",
                        rusqlite::params![
                            new_id,
                            cfg.banner_ad_unit_id,
                            cfg.interstitial_ad_unit_id,
                            cfg.rewarded_ad_unit_id,
                            cfg.app_open_ad_unit_id,
                            cfg.notes,
                            now_timestamp()
                        ],
                    )?;
                    new_id.to_string()
                }
            };

            tx.commit()?;
            Ok(id)
        })
    }

    /// The config the clients should use: the active row, else the most
    /// recently updated row. None means "fall back to hard-coded defaults"
    /// (the API layer owns those).
    pub fn effective_admob_config(&self) -> Result<Option<AdmobConfigRow>> {
        self.with_conn(|conn| {
            let row = conn
                .query_row(
                    "SELECT id, banner_ad_unit_id, interstitial_ad_unit_id,
                            rewarded_ad_unit_id, app_open_ad_unit_id, active, notes, updated_at
                     FROM admob_config
                     ORDER BY active DESC, updated_at DESC
                     LIMIT 1",
                    [],
                    |row| {
                        Ok(AdmobConfigRow {
                            id: row.get(0)?,
                            banner_ad_unit_id: row.get(1)?,
                            interstitial_ad_unit_id: row.get(2)?,
                            rewarded_ad_unit_id: row.get(3)?,
                            app_open_ad_unit_id: row.get(4)?,
                            active: row.get(5)?,
                            notes: row.get(6)?,
                            updated_at: row.get(7)?,
                        })
                    },
                )
                .optional()?;
            Ok(row)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg(banner: &'static str) -> AdmobConfigUpdate<'static> {
        AdmobConfigUpdate {
            banner_ad_unit_id: banner,
            interstitial_ad_unit_id: "ca-app-pub-1/int",
            rewarded_ad_unit_id: "ca-app-pub-1/rew",
            app_open_ad_unit_id: "ca-app-pub-1/open",
            notes: "",
        }
    }

    fn row_count(db: &Database) -> i64 {
        db.with_conn(|conn| {
            Ok(conn.query_row("SELECT COUNT(*) FROM admob_config", [], |r| r.get(0))?)
        })
        .unwrap()
    }

    #[test]
    fn empty_table_has_no_effective_config() {
        let db = Database::open_in_memory().unwrap();
        assert!(db.effective_admob_config().unwrap().is_none());
    }

    #[test]
    fn first_activation_inserts_then_later_ones_reuse_the_row() {
        let db = Database::open_in_memory().unwrap();

        let id1 = db.activate_admob_config("cfg-1", &cfg("ca-app-pub-1/banner-a")).unwrap();
        assert_eq!(id1, "cfg-1");
        assert_eq!(row_count(&db), 1);

        let id2 = db.activate_admob_config("cfg-2", &cfg("ca-app-pub-1/banner-b")).unwrap();
        assert_eq!(id2, "cfg-1");
        assert_eq!(row_count(&db), 1);

        let row = db.effective_admob_config().unwrap().unwrap();
        assert!(row.active);
        assert_eq!(row.banner_ad_unit_id, "ca-app-pub-1/banner-b");
    }

    #[test]
    fn strays_are_pruned_on_write() {
        let db = Database::open_in_memory().unwrap();

        // Two inactive rows left behind by a pre-pruning deployment.
        db.with_conn_mut(|conn| {
            conn.execute_batch(
                "INSERT INTO admob_config
                    (id, banner_ad_unit_id, interstitial_ad_unit_id,
                     rewarded_ad_unit_id, app_open_ad_unit_id, active, updated_at)
                 VALUES
                    ('old-1', 'b1', 'i1', 'r1', 'o1', 0, '2026-01-01T00:00:00+00:00'),
                    ('old-2', 'b2', 'i2', 'r2', 'o2', 0, '2026-02-01T00:00:00+00:00');",
            )?;
            Ok(())
        })
        .unwrap();

        // Reads prefer the most recently updated row while no row is active.
        let row = db.effective_admob_config().unwrap().unwrap();
        assert_eq!(row.id, "old-2");
        assert!(!row.active);

        let kept = db.activate_admob_config("cfg-new", &cfg("ca-app-pub-1/banner-c")).unwrap();
        assert_eq!(kept, "old-2");
        assert_eq!(row_count(&db), 1);
        assert!(db.effective_admob_config().unwrap().unwrap().active);
    }
}
