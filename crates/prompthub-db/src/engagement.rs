use crate::Database;
use crate::models::{PromptRow, now_timestamp};
use anyhow::Result;
use rusqlite::OptionalExtension;

/// Result of a like toggle. `like_count` is the prompt's recomputed total,
/// not an increment.
pub struct ToggleOutcome {
    pub liked: bool,
    pub like_count: i64,
}

impl Database {
    /// Toggle a device's like on a prompt: removes it if present, inserts it
    /// if not. The prompt's denormalized like_count is recomputed from the
    /// live membership rows in the same transaction, so it self-heals from
    /// any prior drift. Returns None when the prompt does not exist.
    pub fn toggle_like(&self, device_id: &str, prompt_id: &str) -> Result<Option<ToggleOutcome>> {
        self.with_conn_mut(|conn| {
            let tx = conn.unchecked_transaction()?;

            let exists: Option<i64> = tx
                .query_row("SELECT 1 FROM prompts WHERE id = ?1", [prompt_id], |row| {
                    row.get(0)
                })
                .optional()?;
            if exists.is_none() {
                return Ok(None);
            }

            let present: Option<i64> = tx
                .query_row(
                    "SELECT 1 FROM prompt_likes WHERE device_id = ?1 AND prompt_id = ?2",
                    (device_id, prompt_id),
                    |row| row.get(0),
                )
                .optional()?;

            let liked = if present.is_some() {
                tx.execute(
                    "DELETE FROM prompt_likes WHERE device_id = ?1 AND prompt_id = ?2",
                    (device_id, prompt_id),
                )?;
                false
            } else {
                // A concurrent toggle may have inserted between check and
                // insert; the unique constraint means "already present",
                // not a fault.
                match tx.execute(
                    "INSERT INTO prompt_likes (device_id, prompt_id, created_at) VALUES (?1, ?2, ?3)",
                    (device_id, prompt_id, now_timestamp()),
                ) {
                    Ok(_) => {}
                    Err(rusqlite::Error::SqliteFailure(e, _))
                        if e.code == rusqlite::ErrorCode::ConstraintViolation => {}
                    Err(e) => return Err(e.into()),
                }
                true
            };

            tx.execute(
                "UPDATE prompts
                 SET like_count = (SELECT COUNT(*) FROM prompt_likes WHERE prompt_id = ?1)
                 WHERE id = ?1",
                [prompt_id],
            )?;

            let like_count: i64 = tx.query_row(
                "SELECT like_count FROM prompts WHERE id = ?1",
                [prompt_id],
                |row| row.get(0),
            )?;

            tx.commit()?;
            Ok(Some(ToggleOutcome { liked, like_count }))
        })
    }

    /// Idempotent bookmark: inserting twice is a no-op. Returns false when
    /// the prompt does not exist.
    pub fn add_favourite(&self, device_id: &str, prompt_id: &str) -> Result<bool> {
        self.with_conn_mut(|conn| {
            let exists: Option<i64> = conn
                .query_row("SELECT 1 FROM prompts WHERE id = ?1", [prompt_id], |row| {
                    row.get(0)
                })
                .optional()?;
            if exists.is_none() {
                return Ok(false);
            }

            conn.execute(
                "INSERT OR IGNORE INTO favourites (device_id, prompt_id, created_at) VALUES (?1, ?2, ?3)",
                (device_id, prompt_id, now_timestamp()),
            )?;
            Ok(true)
        })
    }

    /// Returns false when the favourite was not there to remove.
    pub fn remove_favourite(&self, device_id: &str, prompt_id: &str) -> Result<bool> {
        self.with_conn_mut(|conn| {
            let changed = conn.execute(
                "DELETE FROM favourites WHERE device_id = ?1 AND prompt_id = ?2",
                (device_id, prompt_id),
            )?;
            Ok(changed > 0)
        })
    }

    /// Prompts the device has bookmarked, newest bookmark first.
    pub fn list_favourites(&self, device_id: &str) -> Result<Vec<PromptRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT p.id, p.title, p.body, p.image_url,
                        p.category_id, c.name, c.slug,
                        p.tags, p.is_premium, p.usage_count, p.like_count,
                        EXISTS(SELECT 1 FROM prompt_likes l
                               WHERE l.prompt_id = p.id AND l.device_id = ?1),
                        1,
                        p.created_at, p.updated_at
                 FROM favourites f
                 JOIN prompts p ON f.prompt_id = p.id
                 JOIN categories c ON p.category_id = c.id
                 WHERE f.device_id = ?1
                 ORDER BY f.created_at DESC",
            )?;

            let rows = stmt
                .query_map([device_id], |row| {
                    Ok(PromptRow {
                        id: row.get(0)?,
                        title: row.get(1)?,
                        body: row.get(2)?,
                        image_url: row.get(3)?,
                        category_id: row.get(4)?,
                        category_name: row.get(5)?,
                        category_slug: row.get(6)?,
                        tags: row.get(7)?,
                        is_premium: row.get(8)?,
                        usage_count: row.get(9)?,
                        like_count: row.get(10)?,
                        is_liked: row.get(11)?,
                        is_favourited: row.get(12)?,
                        created_at: row.get(13)?,
                        updated_at: row.get(14)?,
                    })
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            Ok(rows)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seed(db: &Database) {
        db.create_category("c1", "Writing", "writing", "", 0).unwrap();
        db.create_prompt("p1", "Haiku Generator", "Write a haiku about...", None, "c1", "", false)
            .unwrap();
    }

    #[test]
    fn toggle_flips_state_and_recomputes_count() {
        let db = Database::open_in_memory().unwrap();
        seed(&db);

        let out = db.toggle_like("device-A", "p1").unwrap().unwrap();
        assert!(out.liked);
        assert_eq!(out.like_count, 1);

        let out = db.toggle_like("device-A", "p1").unwrap().unwrap();
        assert!(!out.liked);
        assert_eq!(out.like_count, 0);
    }

    #[test]
    fn toggle_twice_is_identity_on_membership_count() {
        let db = Database::open_in_memory().unwrap();
        seed(&db);

        db.toggle_like("device-B", "p1").unwrap();
        let before = db.get_prompt("p1", None).unwrap().unwrap().like_count;

        db.toggle_like("device-A", "p1").unwrap();
        db.toggle_like("device-A", "p1").unwrap();

        let after = db.get_prompt("p1", None).unwrap().unwrap().like_count;
        assert_eq!(before, after);
    }

    #[test]
    fn likes_are_scoped_per_device() {
        let db = Database::open_in_memory().unwrap();
        seed(&db);

        db.toggle_like("device-A", "p1").unwrap();
        db.toggle_like("device-B", "p1").unwrap();

        let p = db.get_prompt("p1", Some("device-A")).unwrap().unwrap();
        assert_eq!(p.like_count, 2);
        assert!(p.is_liked);

        let p = db.get_prompt("p1", Some("device-C")).unwrap().unwrap();
        assert!(!p.is_liked);
    }

    #[test]
    fn toggle_on_missing_prompt_is_none() {
        let db = Database::open_in_memory().unwrap();
        seed(&db);
        assert!(db.toggle_like("device-A", "missing").unwrap().is_none());
    }

    #[test]
    fn like_count_self_heals_from_drift() {
        let db = Database::open_in_memory().unwrap();
        seed(&db);

        // Simulate drift left behind by an older write path.
        db.with_conn_mut(|conn| {
            conn.execute("UPDATE prompts SET like_count = 42 WHERE id = 'p1'", [])?;
            Ok(())
        })
        .unwrap();

        let out = db.toggle_like("device-A", "p1").unwrap().unwrap();
        assert_eq!(out.like_count, 1);
    }

    #[test]
    fn favourite_add_is_idempotent_and_remove_reports_absence() {
        let db = Database::open_in_memory().unwrap();
        seed(&db);

        assert!(db.add_favourite("device-A", "p1").unwrap());
        assert!(db.add_favourite("device-A", "p1").unwrap());
        assert_eq!(db.list_favourites("device-A").unwrap().len(), 1);

        assert!(db.remove_favourite("device-A", "p1").unwrap());
        assert!(!db.remove_favourite("device-A", "p1").unwrap());
        assert!(db.list_favourites("device-A").unwrap().is_empty());

        assert!(!db.add_favourite("device-A", "missing").unwrap());
    }

    #[test]
    fn deleting_prompt_cascades_memberships() {
        let db = Database::open_in_memory().unwrap();
        seed(&db);

        db.toggle_like("device-A", "p1").unwrap();
        db.add_favourite("device-A", "p1").unwrap();

        assert!(db.delete_prompt("p1").unwrap());
        assert!(db.list_favourites("device-A").unwrap().is_empty());
        db.with_conn(|conn| {
            let likes: i64 =
                conn.query_row("SELECT COUNT(*) FROM prompt_likes", [], |r| r.get(0))?;
            assert_eq!(likes, 0);
            Ok(())
        })
        .unwrap();
    }
}
