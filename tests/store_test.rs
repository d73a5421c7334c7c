mod helpers;

use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use unforgettable::error::ReminderError;
use unforgettable::geo::Coordinate;
use unforgettable::reminder::{Condition, HomeLocation, ItemStore, NewItem, SettingsStore, SqliteSettingsStore};

#[test]
fn items_round_trip_in_insertion_order() {
    let (items, _) = helpers::test_stores();

    let keys = items.create("alice", NewItem::new("Keys", Condition::LeavingHome)).unwrap();
    let umbrella = items.create("alice", NewItem::new("Umbrella", Condition::Rain)).unwrap();
    items.create("alice", NewItem::new("Wallet", Condition::Always)).unwrap();

    let listed = items.list("alice").unwrap();
    let names: Vec<_> = listed.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(names, ["Keys", "Umbrella", "Wallet"]);
    assert_eq!(listed[0].id, keys.id);
    assert_eq!(listed[1].condition, Condition::Rain);
    assert_ne!(keys.id, umbrella.id);
}

#[test]
fn items_are_scoped_per_user() {
    let (items, _) = helpers::test_stores();
    items.create("alice", NewItem::new("Keys", Condition::LeavingHome)).unwrap();
    items.create("bob", NewItem::new("Gloves", Condition::Cold)).unwrap();

    let bob = items.list("bob").unwrap();
    assert_eq!(bob.len(), 1);
    assert_eq!(bob[0].name, "Gloves");
    assert!(items.list("carol").unwrap().is_empty());
}

#[test]
fn blank_names_are_rejected_and_names_trimmed() {
    let (items, _) = helpers::test_stores();

    let err = items.create("alice", NewItem::new("   ", Condition::Always)).unwrap_err();
    assert!(matches!(err, ReminderError::Validation(_)));

    let item = items.create("alice", NewItem::new("  Phone  ", Condition::Always)).unwrap();
    assert_eq!(item.name, "Phone");
}

#[test]
fn delete_removes_only_that_item() {
    let (items, _) = helpers::test_stores();
    let keys = items.create("alice", NewItem::new("Keys", Condition::LeavingHome)).unwrap();
    items.create("alice", NewItem::new("Wallet", Condition::Always)).unwrap();

    items.delete("alice", &keys.id).unwrap();

    let left = items.list("alice").unwrap();
    assert_eq!(left.len(), 1);
    assert_eq!(left[0].name, "Wallet");

    let again = items.delete("alice", &keys.id).unwrap_err();
    assert!(matches!(again, ReminderError::Validation(_)));
}

#[test]
fn users_cannot_delete_each_others_items() {
    let (items, _) = helpers::test_stores();
    let keys = items.create("alice", NewItem::new("Keys", Condition::LeavingHome)).unwrap();

    let err = items.delete("bob", &keys.id).unwrap_err();
    assert!(matches!(err, ReminderError::Validation(_)));

    let left = items.list("alice").unwrap();
    assert_eq!(left.len(), 1);
    assert_eq!(left[0].id, keys.id);
}

fn home_rows(conn: &Mutex<Connection>, user_id: &str) -> i64 {
    conn.lock()
        .unwrap()
        .query_row(
            "SELECT COUNT(*) FROM home_locations WHERE user_id = ?1",
            [user_id],
            |row| row.get(0),
        )
        .unwrap()
}

#[test]
fn home_save_is_an_upsert() {
    let conn = helpers::test_db();
    let settings = SqliteSettingsStore::new(Arc::clone(&conn));
    assert!(settings.home_location("alice").unwrap().is_none());

    settings.save_home_location("alice", &helpers::home()).unwrap();
    // Saving the same home twice leaves one record.
    settings.save_home_location("alice", &helpers::home()).unwrap();
    assert_eq!(home_rows(&conn, "alice"), 1);

    let moved = HomeLocation {
        coordinate: Coordinate::new(34.05, -118.24).unwrap(),
        display_name: "Los Angeles".into(),
    };
    settings.save_home_location("alice", &moved).unwrap();

    let stored = settings.home_location("alice").unwrap().unwrap();
    assert_eq!(stored, moved);
    assert_eq!(home_rows(&conn, "alice"), 1);
}

#[test]
fn clearing_home_is_idempotent() {
    let (_, settings) = helpers::test_stores();
    settings.save_home_location("alice", &helpers::home()).unwrap();
    settings.save_home_location("bob", &helpers::home()).unwrap();

    settings.clear_home_location("alice").unwrap();
    settings.clear_home_location("alice").unwrap();

    assert!(settings.home_location("alice").unwrap().is_none());
    assert!(settings.home_location("bob").unwrap().is_some());
}
