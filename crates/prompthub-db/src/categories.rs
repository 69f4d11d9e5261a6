use crate::Database;
use crate::models::{CategoryRow, now_timestamp};
use anyhow::Result;
use rusqlite::OptionalExtension;

impl Database {
    pub fn create_category(
        &self,
        id: &str,
        name: &str,
        slug: &str,
        icon: &str,
        display_order: i64,
    ) -> Result<()> {
        self.with_conn_mut(|conn| {
            conn.execute(
                "INSERT INTO categories (id, name, slug, icon, display_order, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                rusqlite::params![id, name, slug, icon, display_order, now_timestamp()],
            )?;
            Ok(())
        })
    }

    /// All categories in display order, each with its live prompt count.
    pub fn list_categories(&self) -> Result<Vec<CategoryRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT c.id, c.name, c.slug, c.icon, c.display_order,
                        (SELECT COUNT(*) FROM prompts p WHERE p.category_id = c.id),
                        c.created_at
                 FROM categories c
                 ORDER BY c.display_order, c.name",
            )?;

            let rows = stmt
                .query_map([], map_category_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            Ok(rows)
        })
    }

    pub fn get_category(&self, id: &str) -> Result<Option<CategoryRow>> {
        self.with_conn(|conn| {
            let row = conn
                .query_row(
                    "SELECT c.id, c.name, c.slug, c.icon, c.display_order,
                            (SELECT COUNT(*) FROM prompts p WHERE p.category_id = c.id),
                            c.created_at
                     FROM categories c WHERE c.id = ?1",
                    [id],
                    map_category_row,
                )
                .optional()?;
            Ok(row)
        })
    }

    /// Partial update; absent fields keep their current value. Returns false
    /// when the category does not exist.
    pub fn update_category(
        &self,
        id: &str,
        name: Option<&str>,
        slug: Option<&str>,
        icon: Option<&str>,
        display_order: Option<i64>,
    ) -> Result<bool> {
        self.with_conn_mut(|conn| {
            let changed = conn.execute(
                "UPDATE categories SET
                    name = COALESCE(?2, name),
                    slug = COALESCE(?3, slug),
                    icon = COALESCE(?4, icon),
                    display_order = COALESCE(?5, display_order)
                 WHERE id = ?1",
                rusqlite::params![id, name, slug, icon, display_order],
            )?;
            Ok(changed > 0)
        })
    }

    /// Deleting a category cascades to its prompts (and from there to their
    /// favourites and likes).
    pub fn delete_category(&self, id: &str) -> Result<bool> {
        self.with_conn_mut(|conn| {
            let changed = conn.execute("DELETE FROM categories WHERE id = ?1", [id])?;
            Ok(changed > 0)
        })
    }
}

fn map_category_row(row: &rusqlite::Row<'_>) -> std::result::Result<CategoryRow, rusqlite::Error> {
    Ok(CategoryRow {
        id: row.get(0)?,
        name: row.get(1)?,
        slug: row.get(2)?,
        icon: row.get(3)?,
        display_order: row.get(4)?,
        prompt_count: row.get(5)?,
        created_at: row.get(6)?,
    })
}

/// Category row count, used by tests.
#[cfg(test)]
pub(crate) fn count_categories(conn: &rusqlite::Connection) -> Result<i64> {
    Ok(conn.query_row("SELECT COUNT(*) FROM categories", [], |r| r.get(0))?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_orders_by_display_order_then_name() {
        let db = Database::open_in_memory().unwrap();
        db.create_category("c1", "Writing", "writing", "", 2).unwrap();
        db.create_category("c2", "Art", "art", "", 1).unwrap();
        db.create_category("c3", "Business", "business", "", 1).unwrap();

        let cats = db.list_categories().unwrap();
        let slugs: Vec<&str> = cats.iter().map(|c| c.slug.as_str()).collect();
        assert_eq!(slugs, vec!["art", "business", "writing"]);
    }

    #[test]
    fn duplicate_slug_is_a_constraint_violation() {
        let db = Database::open_in_memory().unwrap();
        db.create_category("c1", "Writing", "writing", "", 0).unwrap();

        let err = db
            .create_category("c2", "Writing II", "writing", "", 0)
            .unwrap_err();
        assert!(crate::is_constraint_violation(&err));
    }

    #[test]
    fn update_keeps_absent_fields() {
        let db = Database::open_in_memory().unwrap();
        db.create_category("c1", "Writing", "writing", "pen", 3).unwrap();

        assert!(db.update_category("c1", Some("Prose"), None, None, None).unwrap());

        let cat = db.get_category("c1").unwrap().unwrap();
        assert_eq!(cat.name, "Prose");
        assert_eq!(cat.slug, "writing");
        assert_eq!(cat.icon, "pen");
        assert_eq!(cat.display_order, 3);

        assert!(!db.update_category("missing", Some("x"), None, None, None).unwrap());
    }

    #[test]
    fn delete_cascades_to_prompts() {
        let db = Database::open_in_memory().unwrap();
        db.create_category("c1", "Writing", "writing", "", 0).unwrap();
        db.create_prompt("p1", "Haiku Generator", "Write a haiku about...", None, "c1", "", false)
            .unwrap();

        assert!(db.delete_category("c1").unwrap());
        assert!(db.get_prompt("p1", None).unwrap().is_none());
        db.with_conn(|conn| {
            assert_eq!(count_categories(conn).unwrap(), 0);
            Ok(())
        })
        .unwrap();
    }
}
