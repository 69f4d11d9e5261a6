use crate::Database;
use crate::models::AdminRow;
use anyhow::Result;
use rusqlite::OptionalExtension;

impl Database {
    pub fn create_admin(&self, id: &str, username: &str, password_hash: &str) -> Result<()> {
        self.with_conn_mut(|conn| {
            conn.execute(
                "INSERT INTO admins (id, username, password) VALUES (?1, ?2, ?3)",
                (id, username, password_hash),
            )?;
            Ok(())
        })
    }

    pub fn get_admin_by_username(&self, username: &str) -> Result<Option<AdminRow>> {
        self.with_conn(|conn| {
            let row = conn
                .query_row(
                    "SELECT id, username, password, created_at FROM admins WHERE username = ?1",
                    [username],
                    |row| {
                        Ok(AdminRow {
                            id: row.get(0)?,
                            username: row.get(1)?,
                            password: row.get(2)?,
                            created_at: row.get(3)?,
                        })
                    },
                )
                .optional()?;
            Ok(row)
        })
    }
}
