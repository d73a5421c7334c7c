use std::sync::{Arc, Mutex};

use tempfile::TempDir;
use unforgettable::db;
use unforgettable::reminder::{Condition, ItemStore, NewItem, SettingsStore, SqliteItemStore, SqliteSettingsStore};

#[test]
fn open_creates_new_db_at_nonexistent_path() {
    let tmp = TempDir::new().unwrap();
    let db_path = tmp.path().join("subdir").join("reminders.db");
    assert!(!db_path.exists());

    let conn = db::open_database(&db_path).unwrap();
    assert!(db_path.exists());

    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM reminder_items", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 0);
}

#[test]
fn busy_timeout_and_wal_are_set() {
    let tmp = TempDir::new().unwrap();
    let conn = db::open_database(tmp.path().join("test.db")).unwrap();

    let timeout: i64 = conn
        .pragma_query_value(None, "busy_timeout", |row| row.get(0))
        .unwrap();
    assert_eq!(timeout, 5000);

    let mode: String = conn
        .pragma_query_value(None, "journal_mode", |row| row.get(0))
        .unwrap();
    assert_eq!(mode.to_lowercase(), "wal");
}

#[test]
fn data_survives_reopen() {
    let tmp = TempDir::new().unwrap();
    let db_path = tmp.path().join("test.db");

    {
        let conn = Arc::new(Mutex::new(db::open_database(&db_path).unwrap()));
        let items = SqliteItemStore::new(Arc::clone(&conn));
        let settings = SqliteSettingsStore::new(conn);
        items.create("alice", NewItem::new("Keys", Condition::LeavingHome)).unwrap();
        settings
            .save_home_location(
                "alice",
                &unforgettable::reminder::HomeLocation {
                    coordinate: "40.0,-74.0".parse().unwrap(),
                    display_name: "Home".into(),
                },
            )
            .unwrap();
    }

    let conn = Arc::new(Mutex::new(db::open_database(&db_path).unwrap()));
    let items = SqliteItemStore::new(Arc::clone(&conn));
    let settings = SqliteSettingsStore::new(conn);
    assert_eq!(items.list("alice").unwrap().len(), 1);
    assert_eq!(settings.home_location("alice").unwrap().unwrap().display_name, "Home");
}

#[test]
fn health_check_counts_rows() {
    let conn = Arc::new(Mutex::new(db::open_memory_database().unwrap()));
    let items = SqliteItemStore::new(Arc::clone(&conn));
    items.create("alice", NewItem::new("Keys", Condition::LeavingHome)).unwrap();
    items.create("bob", NewItem::new("Gloves", Condition::Cold)).unwrap();

    let guard = conn.lock().unwrap();
    let report = db::check_database_health(&guard).unwrap();
    assert!(report.integrity_ok);
    assert_eq!(report.schema_version, db::migrations::CURRENT_SCHEMA_VERSION);
    assert_eq!(report.item_count, 2);
    assert_eq!(report.home_count, 0);
    assert_eq!(report.user_count, 2);
}

#[test]
fn reopening_is_idempotent_for_schema() {
    let tmp = TempDir::new().unwrap();
    let db_path = tmp.path().join("test.db");
    drop(db::open_database(&db_path).unwrap());
    let conn = db::open_database(&db_path).unwrap();

    let version = db::migrations::get_schema_version(&conn).unwrap();
    assert_eq!(version, db::migrations::CURRENT_SCHEMA_VERSION);
}
