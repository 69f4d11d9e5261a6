use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS admins (
            id          TEXT PRIMARY KEY,
            username    TEXT NOT NULL UNIQUE,
            password    TEXT NOT NULL,
            created_at  TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS categories (
            id              TEXT PRIMARY KEY,
            name            TEXT NOT NULL UNIQUE,
            slug            TEXT NOT NULL UNIQUE,
            icon            TEXT NOT NULL DEFAULT '',
            display_order   INTEGER NOT NULL DEFAULT 0,
            created_at      TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS prompts (
            id              TEXT PRIMARY KEY,
            title           TEXT NOT NULL,
            body            TEXT NOT NULL,
            image_url       TEXT,
            category_id     TEXT NOT NULL REFERENCES categories(id) ON DELETE CASCADE,
            tags            TEXT NOT NULL DEFAULT '',
            is_premium      INTEGER NOT NULL DEFAULT 0,
            usage_count     INTEGER NOT NULL DEFAULT 0,
            like_count      INTEGER NOT NULL DEFAULT 0,
            created_at      TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at      TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX IF NOT EXISTS idx_prompts_category
            ON prompts(category_id, created_at);

        CREATE TABLE IF NOT EXISTS favourites (
            device_id   TEXT NOT NULL,
            prompt_id   TEXT NOT NULL REFERENCES prompts(id) ON DELETE CASCADE,
            created_at  TEXT NOT NULL DEFAULT (datetime('now')),
            PRIMARY KEY (device_id, prompt_id)
        );

        CREATE INDEX IF NOT EXISTS idx_favourites_prompt
            ON favourites(prompt_id);

        CREATE TABLE IF NOT EXISTS prompt_likes (
            device_id   TEXT NOT NULL,
            prompt_id   TEXT NOT NULL REFERENCES prompts(id) ON DELETE CASCADE,
            created_at  TEXT NOT NULL DEFAULT (datetime('now')),
            PRIMARY KEY (device_id, prompt_id)
        );

        CREATE INDEX IF NOT EXISTS idx_prompt_likes_prompt
            ON prompt_likes(prompt_id);

        CREATE TABLE IF NOT EXISTS ads (
            id                  TEXT PRIMARY KEY,
            placement           TEXT NOT NULL,
            media_url           TEXT NOT NULL,
            target_url          TEXT NOT NULL,
            active              INTEGER NOT NULL DEFAULT 0,
            display_interval    INTEGER NOT NULL DEFAULT 5,
            lifetime_days       INTEGER NOT NULL DEFAULT 30,
            created_at          TEXT NOT NULL DEFAULT (datetime('now'))
        );

        -- At most one active ad per placement. The rotation transaction
        -- maintains this; the partial index makes the store reject any
        -- violation outright.
        CREATE UNIQUE INDEX IF NOT EXISTS idx_ads_one_active
            ON ads(placement) WHERE active = 1;

        CREATE TABLE IF NOT EXISTS admob_config (
            id                      TEXT PRIMARY KEY,
            banner_ad_unit_id       TEXT NOT NULL,
            interstitial_ad_unit_id TEXT NOT NULL,
            rewarded_ad_unit_id     TEXT NOT NULL,
            app_open_ad_unit_id     TEXT NOT NULL,
            active                  INTEGER NOT NULL DEFAULT 0,
            notes                   TEXT NOT NULL DEFAULT '',
            updated_at              TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE UNIQUE INDEX IF NOT EXISTS idx_admob_one_active
            ON admob_config(active) WHERE active = 1;
        ",
    )?;

    info!("Database migrations complete");
    Ok(())
}
