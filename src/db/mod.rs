pub mod migrations;
pub mod schema;

use anyhow::{Context, Result};
use rusqlite::Connection;
use std::path::Path;
use std::time::Duration;

/// Open (or create) the Unforgettable database at the given path with the
/// schema initialized and migrations applied.
pub fn open_database(path: impl AsRef<Path>) -> Result<Connection> {
    let path = path.as_ref();

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory {}", parent.display()))?;
    }

    let mut conn = Connection::open(path)
        .with_context(|| format!("failed to open database at {}", path.display()))?;

    conn.pragma_update(None, "journal_mode", "WAL")?;
    conn.pragma_update(None, "foreign_keys", "ON")?;
    conn.busy_timeout(Duration::from_millis(5000))?;

    schema::init_schema(&conn).context("failed to initialize schema")?;
    migrations::run_migrations(&mut conn).context("failed to run migrations")?;

    tracing::info!(path = %path.display(), "database initialized");
    Ok(conn)
}

/// Open an in-memory database with schema and migrations applied.
pub fn open_memory_database() -> Result<Connection> {
    let mut conn = Connection::open_in_memory().context("failed to open in-memory database")?;
    conn.pragma_update(None, "foreign_keys", "ON")?;
    schema::init_schema(&conn).context("failed to initialize schema")?;
    migrations::run_migrations(&mut conn).context("failed to run migrations")?;
    Ok(conn)
}

/// Output of [`check_database_health`], rendered by `unforgettable doctor`.
#[derive(Debug)]
pub struct HealthReport {
    pub schema_version: u32,
    pub item_count: u64,
    pub home_count: u64,
    pub user_count: u64,
    pub integrity_ok: bool,
    pub integrity_details: String,
}

/// Run `PRAGMA integrity_check` and collect row counts.
pub fn check_database_health(conn: &Connection) -> Result<HealthReport> {
    let schema_version = migrations::get_schema_version(conn)?;

    let item_count: i64 =
        conn.query_row("SELECT COUNT(*) FROM reminder_items", [], |row| row.get(0))?;
    let home_count: i64 =
        conn.query_row("SELECT COUNT(*) FROM home_locations", [], |row| row.get(0))?;
    let user_count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM (SELECT user_id FROM reminder_items UNION SELECT user_id FROM home_locations)",
        [],
        |row| row.get(0),
    )?;

    let integrity_details: String =
        conn.query_row("PRAGMA integrity_check", [], |row| row.get(0))?;

    Ok(HealthReport {
        schema_version,
        item_count: item_count as u64,
        home_count: home_count as u64,
        user_count: user_count as u64,
        integrity_ok: integrity_details == "ok",
        integrity_details,
    })
}
