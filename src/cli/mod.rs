pub mod account;
pub mod doctor;
pub mod home;
pub mod items;
pub mod plan;
pub mod watch;
pub mod weather;

use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use rusqlite::Connection;

use unforgettable::auth::SessionFileAuth;
use unforgettable::config::{UnforgettableConfig, Units};
use unforgettable::geo::{distance_km, distance_miles, Coordinate};
use unforgettable::reminder::{SqliteItemStore, SqliteSettingsStore, User};
use unforgettable::services::weather::mock_weather;
use unforgettable::services::{self, NominatimClient, OpenWeatherClient, WeatherClient, WeatherReport};

/// Everything a data-touching command needs: config, stores, and identity.
pub struct AppContext {
    pub config: UnforgettableConfig,
    pub items: SqliteItemStore,
    pub settings: SqliteSettingsStore,
    pub auth: SessionFileAuth,
}

impl AppContext {
    pub fn open(config: UnforgettableConfig) -> Result<Self> {
        let db_path = config.resolved_db_path();
        let conn = unforgettable::db::open_database(&db_path)?;
        let db: Arc<Mutex<Connection>> = Arc::new(Mutex::new(conn));

        Ok(Self {
            items: SqliteItemStore::new(Arc::clone(&db)),
            settings: SqliteSettingsStore::new(db),
            auth: auth_for(&config),
            config,
        })
    }

    /// The signed-in user; commands stop here when nobody is signed in.
    pub async fn user(&self) -> Result<User> {
        self.auth
            .require_user()
            .await
            .context("this command needs a signed-in user")
    }

    pub fn geocoder(&self) -> Result<NominatimClient> {
        geocoder(&self.config)
    }

    pub fn weather_client(&self) -> Result<OpenWeatherClient> {
        weather_client(&self.config)
    }
}

pub fn auth_for(config: &UnforgettableConfig) -> SessionFileAuth {
    SessionFileAuth::new(
        config.resolved_session_path(),
        config.auth.clone(),
        config.storage.user.clone(),
    )
}

pub fn geocoder(config: &UnforgettableConfig) -> Result<NominatimClient> {
    let http = services::http_client(&config.services)?;
    Ok(NominatimClient::new(http, &config.services))
}

pub fn weather_client(config: &UnforgettableConfig) -> Result<OpenWeatherClient> {
    let http = services::http_client(&config.services)?;
    Ok(OpenWeatherClient::new(http, &config.services))
}

/// Current weather at `target`. When the service fails the sample reading for
/// `seed` stands in, and the flag is `true`.
pub async fn weather_or_sample(
    client: &dyn WeatherClient,
    target: Coordinate,
    seed: &str,
) -> (WeatherReport, bool) {
    match client.current(target).await {
        Ok(report) => (report, false),
        Err(e) => {
            tracing::warn!(error = %e, "weather service unavailable, using sample forecast");
            (mock_weather(seed), true)
        }
    }
}

pub fn format_temperature(fahrenheit: f64, units: Units) -> String {
    match units {
        Units::Imperial => format!("{fahrenheit:.0}°F"),
        Units::Metric => format!("{:.0}°C", (fahrenheit - 32.0) * 5.0 / 9.0),
    }
}

/// Great-circle distance between two points, in the display unit system.
pub fn format_distance(from: &Coordinate, to: &Coordinate, units: Units) -> String {
    match units {
        Units::Imperial => {
            let miles = distance_miles(from, to);
            if miles < 0.1 {
                format!("{:.0} ft", miles * 5280.0)
            } else {
                format!("{miles:.2} mi")
            }
        }
        Units::Metric => {
            let km = distance_km(from, to);
            if km < 0.1 {
                format!("{:.0} m", km * 1000.0)
            } else {
                format!("{km:.2} km")
            }
        }
    }
}

pub fn format_wind(mph: f64, units: Units) -> String {
    match units {
        Units::Imperial => format!("{mph:.0} mph"),
        Units::Metric => format!("{:.0} km/h", mph * 1.609_344),
    }
}
