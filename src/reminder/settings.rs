//! Per-user settings: the single home location record.

use std::sync::{Arc, Mutex};

use rusqlite::{params, Connection, OptionalExtension};

use super::types::HomeLocation;
use crate::error::{ReminderError, Result};
use crate::geo::Coordinate;

/// Home location storage. Saves are upserts: a user has zero or one record.
pub trait SettingsStore: Send + Sync {
    fn home_location(&self, user_id: &str) -> Result<Option<HomeLocation>>;

    /// Insert or overwrite the user's home.
    fn save_home_location(&self, user_id: &str, home: &HomeLocation) -> Result<()>;

    /// Remove the user's home. Missing records are not an error.
    fn clear_home_location(&self, user_id: &str) -> Result<()>;
}

/// [`SettingsStore`] backed by the `home_locations` table.
#[derive(Clone)]
pub struct SqliteSettingsStore {
    db: Arc<Mutex<Connection>>,
}

impl SqliteSettingsStore {
    pub fn new(db: Arc<Mutex<Connection>>) -> Self {
        Self { db }
    }

    fn conn(&self) -> Result<std::sync::MutexGuard<'_, Connection>> {
        self.db
            .lock()
            .map_err(|e| ReminderError::Config(format!("database lock poisoned: {e}")))
    }
}

impl SettingsStore for SqliteSettingsStore {
    fn home_location(&self, user_id: &str) -> Result<Option<HomeLocation>> {
        let row = self
            .conn()?
            .query_row(
                "SELECT latitude, longitude, display_name FROM home_locations WHERE user_id = ?1",
                params![user_id],
                |row| {
                    Ok((
                        row.get::<_, f64>(0)?,
                        row.get::<_, f64>(1)?,
                        row.get::<_, String>(2)?,
                    ))
                },
            )
            .optional()?;

        row.map(|(lat, lon, display_name)| {
            Ok::<_, ReminderError>(HomeLocation {
                coordinate: Coordinate::new(lat, lon)?,
                display_name,
            })
        })
        .transpose()
    }

    fn save_home_location(&self, user_id: &str, home: &HomeLocation) -> Result<()> {
        let now = chrono::Utc::now().to_rfc3339();
        self.conn()?.execute(
            "INSERT INTO home_locations (user_id, latitude, longitude, display_name, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?5) \
             ON CONFLICT(user_id) DO UPDATE SET \
                latitude = excluded.latitude, \
                longitude = excluded.longitude, \
                display_name = excluded.display_name, \
                updated_at = excluded.updated_at",
            params![
                user_id,
                home.coordinate.latitude,
                home.coordinate.longitude,
                home.display_name,
                now,
            ],
        )?;
        tracing::info!(display_name = %home.display_name, "home location saved");
        Ok(())
    }

    fn clear_home_location(&self, user_id: &str) -> Result<()> {
        self.conn()?
            .execute("DELETE FROM home_locations WHERE user_id = ?1", params![user_id])?;
        Ok(())
    }
}
