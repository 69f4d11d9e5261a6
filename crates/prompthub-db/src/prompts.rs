use crate::Database;
use crate::models::{PromptRow, now_timestamp};
use anyhow::Result;
use rusqlite::OptionalExtension;

/// Filters for the public prompt listing. `device_id` only affects the
/// per-device `is_liked` / `is_favourited` flags.
#[derive(Debug, Default)]
pub struct PromptFilter<'a> {
    pub search: Option<&'a str>,
    pub category_slug: Option<&'a str>,
    pub device_id: Option<&'a str>,
}

const PROMPT_SELECT: &str = "
    SELECT p.id, p.title, p.body, p.image_url,
           p.category_id, c.name, c.slug,
           p.tags, p.is_premium, p.usage_count, p.like_count,
           EXISTS(SELECT 1 FROM prompt_likes l
                  WHERE l.prompt_id = p.id AND l.device_id = ?1),
           EXISTS(SELECT 1 FROM favourites f
                  WHERE f.prompt_id = p.id AND f.device_id = ?1),
           p.created_at, p.updated_at
    FROM prompts p
    JOIN categories c ON p.category_id = c.id";

impl Database {
    #[allow(clippy::too_many_arguments)]
    pub fn create_prompt(
        &self,
        id: &str,
        title: &str,
        body: &str,
        image_url: Option<&str>,
        category_id: &str,
        tags: &str,
        is_premium: bool,
    ) -> Result<()> {
        self.with_conn_mut(|conn| {
            let now = now_timestamp();
            conn.execute(
                "INSERT INTO prompts
                    (id, title, body, image_url, category_id, tags, is_premium, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8)",
                rusqlite::params![id, title, body, image_url, category_id, tags, is_premium, now],
            )?;
            Ok(())
        })
    }

    /// Newest first. `search` matches title or body substring (wildcards are
    /// matched literally), `category_slug` narrows to one category.
    pub fn list_prompts(&self, filter: &PromptFilter<'_>) -> Result<Vec<PromptRow>> {
        self.with_conn(|conn| {
            let sql = format!(
                "{PROMPT_SELECT}
                 WHERE (?2 IS NULL OR c.slug = ?2)
                   AND (?3 IS NULL
                        OR p.title LIKE '%' || ?3 || '%' ESCAPE '\\'
                        OR p.body LIKE '%' || ?3 || '%' ESCAPE '\\')
                 ORDER BY p.created_at DESC"
            );
            let mut stmt = conn.prepare(&sql)?;

            let search = filter.search.map(escape_like);
            let rows = stmt
                .query_map(
                    rusqlite::params![filter.device_id, filter.category_slug, search],
                    map_prompt_row,
                )?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            Ok(rows)
        })
    }

    pub fn get_prompt(&self, id: &str, device_id: Option<&str>) -> Result<Option<PromptRow>> {
        self.with_conn(|conn| {
            let sql = format!("{PROMPT_SELECT} WHERE p.id = ?2");
            let row = conn
                .query_row(&sql, rusqlite::params![device_id, id], map_prompt_row)
                .optional()?;
            Ok(row)
        })
    }

    /// Detail fetch for the public endpoint: bumps usage_count and returns
    /// the row as seen after the bump, in one transaction.
    pub fn fetch_prompt_detail(
        &self,
        id: &str,
        device_id: Option<&str>,
    ) -> Result<Option<PromptRow>> {
        self.with_conn_mut(|conn| {
            let tx = conn.unchecked_transaction()?;

            let changed = tx.execute(
                "UPDATE prompts SET usage_count = usage_count + 1 WHERE id = ?1",
                [id],
            )?;
            if changed == 0 {
                return Ok(None);
            }

            let sql = format!("{PROMPT_SELECT} WHERE p.id = ?2");
            let row = tx
                .query_row(&sql, rusqlite::params![device_id, id], map_prompt_row)
                .optional()?;

            tx.commit()?;
            Ok(row)
        })
    }

    /// Partial update; bumps updated_at. Returns false when the prompt does
    /// not exist.
    #[allow(clippy::too_many_arguments)]
    pub fn update_prompt(
        &self,
        id: &str,
        title: Option<&str>,
        body: Option<&str>,
        image_url: Option<&str>,
        category_id: Option<&str>,
        tags: Option<&str>,
        is_premium: Option<bool>,
    ) -> Result<bool> {
        self.with_conn_mut(|conn| {
            let changed = conn.execute(
                "UPDATE prompts SET
                    title = COALESCE(?2, title),
                    body = COALESCE(?3, body),
                    image_url = COALESCE(?4, image_url),
                    category_id = COALESCE(?5, category_id),
                    tags = COALESCE(?6, tags),
                    is_premium = COALESCE(?7, is_premium),
                    updated_at = ?8
                 WHERE id = ?1",
                rusqlite::params![id, title, body, image_url, category_id, tags, is_premium, now_timestamp()],
            )?;
            Ok(changed > 0)
        })
    }

    pub fn delete_prompt(&self, id: &str) -> Result<bool> {
        self.with_conn_mut(|conn| {
            let changed = conn.execute("DELETE FROM prompts WHERE id = ?1", [id])?;
            Ok(changed > 0)
        })
    }
}

/// LIKE treats `%` and `_` as wildcards; user search terms must match them
/// literally.
fn escape_like(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

fn map_prompt_row(row: &rusqlite::Row<'_>) -> std::result::Result<PromptRow, rusqlite::Error> {
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
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seed(db: &Database) {
        db.create_category("c1", "Writing", "writing", "", 0).unwrap();
        db.create_category("c2", "Coding", "coding", "", 1).unwrap();
        db.create_prompt("p1", "Haiku Generator", "Write a haiku about...", None, "c1", "poetry", false)
            .unwrap();
        db.create_prompt("p2", "Rust Mentor", "Explain this borrow error", None, "c2", "rust", true)
            .unwrap();
    }

    #[test]
    fn search_matches_title_or_body() {
        let db = Database::open_in_memory().unwrap();
        seed(&db);

        let filter = PromptFilter { search: Some("haiku"), ..Default::default() };
        let rows = db.list_prompts(&filter).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, "p1");

        let filter = PromptFilter { search: Some("borrow"), ..Default::default() };
        let rows = db.list_prompts(&filter).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, "p2");
    }

    #[test]
    fn search_wildcards_match_literally() {
        let db = Database::open_in_memory().unwrap();
        seed(&db);
        db.create_prompt("p3", "Give 100% effort", "Push harder", None, "c1", "", false)
            .unwrap();
        db.create_prompt("p4", "snake_case renamer", "Rename identifiers", None, "c2", "", false)
            .unwrap();

        // A bare wildcard is not a match-everything query.
        let filter = PromptFilter { search: Some("%"), ..Default::default() };
        let rows = db.list_prompts(&filter).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, "p3");

        let filter = PromptFilter { search: Some("100%"), ..Default::default() };
        assert_eq!(db.list_prompts(&filter).unwrap().len(), 1);

        let filter = PromptFilter { search: Some("e_c"), ..Default::default() };
        let rows = db.list_prompts(&filter).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, "p4");
    }

    #[test]
    fn category_slug_filters() {
        let db = Database::open_in_memory().unwrap();
        seed(&db);

        let filter = PromptFilter { category_slug: Some("coding"), ..Default::default() };
        let rows = db.list_prompts(&filter).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].category_slug, "coding");

        let filter = PromptFilter { category_slug: Some("missing"), ..Default::default() };
        assert!(db.list_prompts(&filter).unwrap().is_empty());
    }

    #[test]
    fn detail_fetch_increments_usage_count() {
        let db = Database::open_in_memory().unwrap();
        seed(&db);

        let p = db.fetch_prompt_detail("p1", None).unwrap().unwrap();
        assert_eq!(p.usage_count, 1);
        let p = db.fetch_prompt_detail("p1", None).unwrap().unwrap();
        assert_eq!(p.usage_count, 2);

        assert!(db.fetch_prompt_detail("missing", None).unwrap().is_none());
    }

    #[test]
    fn update_moves_category_and_keeps_rest() {
        let db = Database::open_in_memory().unwrap();
        seed(&db);

        assert!(
            db.update_prompt("p1", None, None, None, Some("c2"), None, Some(true))
                .unwrap()
        );
        let p = db.get_prompt("p1", None).unwrap().unwrap();
        assert_eq!(p.category_slug, "coding");
        assert_eq!(p.title, "Haiku Generator");
        assert!(p.is_premium);
    }
}
