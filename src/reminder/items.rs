//! Per-user reminder item storage.
//!
//! [`ItemStore`] is the seam the session engine hydrates from; the shipped
//! implementation, [`SqliteItemStore`], keeps items in the `reminder_items`
//! table and lists them in insertion order.

use std::sync::{Arc, Mutex};

use rusqlite::{params, Connection};

use super::types::{Condition, NewItem, ReminderItem};
use crate::error::{ReminderError, Result};

/// CRUD for reminder items, scoped per user. There is no update operation.
pub trait ItemStore: Send + Sync {
    /// All items for a user, in insertion order.
    fn list(&self, user_id: &str) -> Result<Vec<ReminderItem>>;

    /// Persist a new item and return it with its assigned id.
    fn create(&self, user_id: &str, item: NewItem) -> Result<ReminderItem>;

    /// Remove one of the user's items. Ids owned by someone else are
    /// reported as not found.
    fn delete(&self, user_id: &str, item_id: &str) -> Result<()>;
}

/// [`ItemStore`] backed by the SQLite database.
#[derive(Clone)]
pub struct SqliteItemStore {
    db: Arc<Mutex<Connection>>,
}

impl SqliteItemStore {
    pub fn new(db: Arc<Mutex<Connection>>) -> Self {
        Self { db }
    }

    fn conn(&self) -> Result<std::sync::MutexGuard<'_, Connection>> {
        self.db
            .lock()
            .map_err(|e| ReminderError::Config(format!("database lock poisoned: {e}")))
    }
}

/// Trim and reject empty names before anything touches the database.
pub fn validate_item_name(name: &str) -> Result<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ReminderError::validation("item name must not be empty"));
    }
    Ok(trimmed.to_string())
}

impl ItemStore for SqliteItemStore {
    fn list(&self, user_id: &str) -> Result<Vec<ReminderItem>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, name, condition FROM reminder_items WHERE user_id = ?1 ORDER BY created_at, rowid",
        )?;

        let rows = stmt.query_map(params![user_id], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
            ))
        })?;

        let mut items = Vec::new();
        for row in rows {
            let (id, name, condition) = row?;
            let condition: Condition = match condition.parse() {
                Ok(c) => c,
                Err(e) => {
                    tracing::warn!(item_id = %id, error = %e, "skipping item with unknown condition");
                    continue;
                }
            };
            items.push(ReminderItem {
                id,
                name,
                condition,
            });
        }
        Ok(items)
    }

    fn create(&self, user_id: &str, item: NewItem) -> Result<ReminderItem> {
        let name = validate_item_name(&item.name)?;
        let id = uuid::Uuid::now_v7().to_string();
        let now = chrono::Utc::now().to_rfc3339();

        self.conn()?.execute(
            "INSERT INTO reminder_items (id, user_id, name, condition, created_at) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![id, user_id, name, item.condition.as_str(), now],
        )?;

        tracing::info!(item_id = %id, condition = %item.condition, "reminder item created");
        Ok(ReminderItem {
            id,
            name,
            condition: item.condition,
        })
    }

    fn delete(&self, user_id: &str, item_id: &str) -> Result<()> {
        let removed = self.conn()?.execute(
            "DELETE FROM reminder_items WHERE id = ?1 AND user_id = ?2",
            params![item_id, user_id],
        )?;
        if removed == 0 {
            return Err(ReminderError::validation(format!("item not found: {item_id}")));
        }
        tracing::info!(user_id, item_id = %item_id, "reminder item deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> SqliteItemStore {
        let conn = crate::db::open_memory_database().unwrap();
        SqliteItemStore::new(Arc::new(Mutex::new(conn)))
    }

    #[test]
    fn create_assigns_id_and_trims_name() {
        let store = store();
        let item = store
            .create("alice", NewItem::new("  Umbrella ", Condition::Rain))
            .unwrap();
        assert!(!item.id.is_empty());
        assert_eq!(item.name, "Umbrella");
        assert_eq!(item.condition, Condition::Rain);
    }

    #[test]
    fn empty_name_is_rejected_without_insert() {
        let store = store();
        let err = store
            .create("alice", NewItem::new("   ", Condition::Always))
            .unwrap_err();
        assert!(matches!(err, ReminderError::Validation(_)));
        assert!(store.list("alice").unwrap().is_empty());
    }

    #[test]
    fn list_is_scoped_per_user_in_insertion_order() {
        let store = store();
        store.create("alice", NewItem::new("Keys", Condition::LeavingHome)).unwrap();
        store.create("bob", NewItem::new("Gloves", Condition::Cold)).unwrap();
        store.create("alice", NewItem::new("Sunscreen", Condition::Hot)).unwrap();

        let names: Vec<_> = store
            .list("alice")
            .unwrap()
            .into_iter()
            .map(|i| i.name)
            .collect();
        assert_eq!(names, vec!["Keys", "Sunscreen"]);
    }

    #[test]
    fn delete_removes_item_and_reports_missing() {
        let store = store();
        let item = store.create("alice", NewItem::new("Keys", Condition::Always)).unwrap();

        store.delete("alice", &item.id).unwrap();
        assert!(store.list("alice").unwrap().is_empty());

        assert!(store.delete("alice", &item.id).is_err());
    }

    #[test]
    fn delete_ignores_other_users_items() {
        let store = store();
        let keys = store.create("alice", NewItem::new("Keys", Condition::LeavingHome)).unwrap();

        let err = store.delete("mallory", &keys.id).unwrap_err();
        assert!(matches!(err, ReminderError::Validation(_)));
        assert_eq!(store.list("alice").unwrap().len(), 1);
    }
}
