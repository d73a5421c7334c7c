//! SQL DDL for all Unforgettable tables.
//!
//! Defines the `reminder_items`, `home_locations`, and `schema_meta` tables.
//! All DDL uses `IF NOT EXISTS` for idempotent initialization.

use rusqlite::Connection;

const SCHEMA_SQL: &str = r#"
-- User reminder items. No update path: items are created and deleted only.
CREATE TABLE IF NOT EXISTS reminder_items (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL,
    name TEXT NOT NULL CHECK(length(name) > 0),
    condition TEXT NOT NULL CHECK(condition IN ('leaving-home','rain','hot','cold','always')),
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_items_user ON reminder_items(user_id);

-- One home per user: the primary key makes saves an upsert.
CREATE TABLE IF NOT EXISTS home_locations (
    user_id TEXT PRIMARY KEY,
    latitude REAL NOT NULL CHECK(latitude >= -90.0 AND latitude <= 90.0),
    longitude REAL NOT NULL CHECK(longitude >= -180.0 AND longitude <= 180.0),
    display_name TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

-- Schema metadata
CREATE TABLE IF NOT EXISTS schema_meta (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
);
"#;

/// Initialize all schema tables. Idempotent (uses IF NOT EXISTS).
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(SCHEMA_SQL)?;

    conn.execute(
        "INSERT OR IGNORE INTO schema_meta (key, value) VALUES ('schema_version', '1')",
        [],
    )?;

    Ok(())
}
