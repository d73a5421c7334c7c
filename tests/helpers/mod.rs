#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rusqlite::Connection;

use unforgettable::db;
use unforgettable::error::{ReminderError, Result};
use unforgettable::geo::{Coordinate, EARTH_RADIUS_MILES};
use unforgettable::notify::delivery::{Banner, Permission, PlatformNotifier};
use unforgettable::notify::NotificationEvent;
use unforgettable::proximity::ProximityState;
use unforgettable::reminder::{HomeLocation, SqliteItemStore, SqliteSettingsStore};
use unforgettable::services::{WeatherClient, WeatherReport};

/// Open a fresh in-memory database with schema and migrations applied.
pub fn test_db() -> Arc<Mutex<Connection>> {
    Arc::new(Mutex::new(db::open_memory_database().unwrap()))
}

/// Item and settings stores sharing one in-memory database.
pub fn test_stores() -> (SqliteItemStore, SqliteSettingsStore) {
    let conn = test_db();
    (
        SqliteItemStore::new(Arc::clone(&conn)),
        SqliteSettingsStore::new(conn),
    )
}

pub fn home() -> HomeLocation {
    HomeLocation {
        coordinate: Coordinate::new(40.0, -74.0).unwrap(),
        display_name: "Home".into(),
    }
}

/// A point `miles` due north of [`home`].
pub fn north_of_home(miles: f64) -> Coordinate {
    Coordinate::new(40.0 + (miles / EARTH_RADIUS_MILES).to_degrees(), -74.0).unwrap()
}

pub fn report(code: &str, temp: f64) -> WeatherReport {
    WeatherReport {
        condition_code: code.into(),
        temperature_f: temp,
        humidity: 50.0,
        wind_speed: 3.0,
        high: temp + 5.0,
        low: temp - 5.0,
        description: code.into(),
    }
}

/// Weather client that always returns the same reading, or always fails.
pub struct FixedWeather(pub Option<WeatherReport>);

#[async_trait]
impl WeatherClient for FixedWeather {
    async fn current(&self, _coordinate: Coordinate) -> Result<WeatherReport> {
        self.0
            .clone()
            .ok_or_else(|| ReminderError::network("weather service down"))
    }
}

/// Platform channel that is never permitted.
pub struct NoPlatform;

#[async_trait]
impl PlatformNotifier for NoPlatform {
    fn permission(&self) -> Permission {
        Permission::Unavailable
    }

    async fn show(&self, _title: &str, _body: &str) -> Result<()> {
        Err(ReminderError::Permission("unavailable".into()))
    }
}

/// Banner that records every event and proximity update it is given.
#[derive(Default)]
pub struct RecordingBanner {
    pub shown: Mutex<Vec<NotificationEvent>>,
    pub positions: Mutex<Vec<ProximityState>>,
}

impl RecordingBanner {
    pub fn events(&self) -> Vec<NotificationEvent> {
        self.shown.lock().unwrap().clone()
    }

    pub fn positions(&self) -> Vec<ProximityState> {
        self.positions.lock().unwrap().clone()
    }
}

impl Banner for RecordingBanner {
    fn show(&self, event: &NotificationEvent) {
        self.shown.lock().unwrap().push(event.clone());
    }

    fn proximity(&self, state: &ProximityState) {
        self.positions.lock().unwrap().push(state.clone());
    }
}
