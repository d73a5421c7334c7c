use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct UnforgettableConfig {
    pub general: GeneralConfig,
    pub storage: StorageConfig,
    pub proximity: ProximityConfig,
    pub notifications: NotificationConfig,
    pub recommendations: RecommendationConfig,
    pub services: ServicesConfig,
    pub auth: AuthConfig,
}

/// Unit system used for display. Engine thresholds are always imperial.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    #[default]
    Imperial,
    Metric,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct GeneralConfig {
    pub log_level: String,
    pub units: Units,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct StorageConfig {
    pub db_path: String,
    pub session_path: String,
    /// Overrides the signed-in user id (mostly for scripting and tests).
    pub user: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ProximityConfig {
    /// Crossing above this distance (miles) from home latches AWAY.
    pub far_threshold_miles: f64,
    /// Dropping below this distance (miles) re-arms the latch.
    pub home_threshold_miles: f64,
    /// Minimum spacing between processed position updates.
    pub debounce_ms: u64,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct NotificationConfig {
    pub cooldown_secs: u64,
    pub hot_threshold_f: f64,
    pub cold_threshold_f: f64,
    pub rain_keywords: Vec<String>,
    /// Program used for desktop notifications (called as `<cmd> <title> <body>`).
    pub desktop_command: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct RecommendationConfig {
    pub hot_threshold_f: f64,
    pub cold_threshold_f: f64,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServicesConfig {
    pub geocode_base_url: String,
    pub weather_base_url: String,
    pub weather_api_key: String,
    pub timeout_secs: u64,
    pub user_agent: String,
    /// ISO 3166 code to bias forward geocoding to, e.g. `"us"`.
    pub country_code: Option<String>,
    pub weather_refresh_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AuthConfig {
    pub endpoint: String,
    pub project_id: String,
    /// Where the identity provider sends the browser back to.
    pub app_url: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".into(),
            units: Units::Imperial,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        let dir = default_unforgettable_dir();
        Self {
            db_path: dir.join("reminders.db").to_string_lossy().into_owned(),
            session_path: dir.join("session.json").to_string_lossy().into_owned(),
            user: None,
        }
    }
}

impl Default for ProximityConfig {
    fn default() -> Self {
        Self {
            far_threshold_miles: 0.062,
            home_threshold_miles: 0.05,
            debounce_ms: 3000,
        }
    }
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            cooldown_secs: 30,
            hot_threshold_f: 77.0,
            cold_threshold_f: 50.0,
            rain_keywords: vec!["rain".into(), "drizzle".into()],
            desktop_command: None,
        }
    }
}

impl Default for RecommendationConfig {
    fn default() -> Self {
        Self {
            hot_threshold_f: 85.0,
            cold_threshold_f: 50.0,
        }
    }
}

impl Default for ServicesConfig {
    fn default() -> Self {
        Self {
            geocode_base_url: "https://nominatim.openstreetmap.org".into(),
            weather_base_url: "https://api.openweathermap.org/data/2.5".into(),
            weather_api_key: String::new(),
            timeout_secs: 10,
            user_agent: concat!("unforgettable/", env!("CARGO_PKG_VERSION")).into(),
            country_code: None,
            weather_refresh_secs: 600,
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://cloud.appwrite.io/v1".into(),
            project_id: String::new(),
            app_url: "http://localhost:8080".into(),
        }
    }
}

/// Returns `~/.unforgettable/`, or `./.unforgettable` when no home directory exists.
pub fn default_unforgettable_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".unforgettable")
}

/// Returns the default config file path: `~/.unforgettable/config.toml`
pub fn default_config_path() -> PathBuf {
    default_unforgettable_dir().join("config.toml")
}

impl UnforgettableConfig {
    /// Load config from TOML file (if it exists) then apply env var overrides.
    pub fn load() -> Result<Self> {
        Self::load_from(default_config_path())
    }

    /// Load from a specific path, then apply env var overrides.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut config = if path.exists() {
            let contents =
                std::fs::read_to_string(path).context("failed to read config file")?;
            toml::from_str(&contents).context("failed to parse config TOML")?
        } else {
            info!("no config file at {}, using defaults", path.display());
            UnforgettableConfig::default()
        };

        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Apply environment variable overrides (UNFORGETTABLE_DB, UNFORGETTABLE_USER,
    /// UNFORGETTABLE_LOG_LEVEL, UNFORGETTABLE_WEATHER_API_KEY).
    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("UNFORGETTABLE_DB") {
            self.storage.db_path = val;
        }
        if let Ok(val) = std::env::var("UNFORGETTABLE_USER") {
            self.storage.user = Some(val);
        }
        if let Ok(val) = std::env::var("UNFORGETTABLE_LOG_LEVEL") {
            self.general.log_level = val;
        }
        if let Ok(val) = std::env::var("UNFORGETTABLE_WEATHER_API_KEY") {
            self.services.weather_api_key = val;
        }
    }

    /// Reject threshold combinations the engine cannot honour.
    pub fn validate(&self) -> Result<()> {
        let p = &self.proximity;
        anyhow::ensure!(
            p.home_threshold_miles > 0.0 && p.far_threshold_miles > 0.0,
            "proximity thresholds must be positive"
        );
        anyhow::ensure!(
            p.home_threshold_miles < p.far_threshold_miles,
            "home_threshold_miles ({}) must be below far_threshold_miles ({})",
            p.home_threshold_miles,
            p.far_threshold_miles
        );
        let r = &self.recommendations;
        anyhow::ensure!(
            r.cold_threshold_f <= r.hot_threshold_f,
            "recommendation cold threshold must not exceed the hot threshold"
        );
        anyhow::ensure!(self.services.timeout_secs > 0, "services.timeout_secs must be positive");
        Ok(())
    }

    pub fn resolved_db_path(&self) -> PathBuf {
        expand_tilde(&self.storage.db_path)
    }

    pub fn resolved_session_path(&self) -> PathBuf {
        expand_tilde(&self.storage.session_path)
    }
}

pub fn expand_tilde(path: &str) -> PathBuf {
    match (path.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = UnforgettableConfig::default();
        assert_eq!(config.general.log_level, "info");
        assert_eq!(config.general.units, Units::Imperial);
        assert_eq!(config.proximity.far_threshold_miles, 0.062);
        assert_eq!(config.proximity.home_threshold_miles, 0.05);
        assert_eq!(config.notifications.cooldown_secs, 30);
        assert!(config.storage.db_path.ends_with("reminders.db"));
        config.validate().unwrap();
    }

    #[test]
    fn parse_toml_config() {
        let toml_str = r#"
[general]
log_level = "debug"
units = "metric"

[proximity]
far_threshold_miles = 0.1

[notifications]
cooldown_secs = 120
rain_keywords = ["rain", "drizzle", "thunderstorm"]
"#;
        let config: UnforgettableConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.general.log_level, "debug");
        assert_eq!(config.general.units, Units::Metric);
        assert_eq!(config.proximity.far_threshold_miles, 0.1);
        assert_eq!(config.notifications.cooldown_secs, 120);
        assert_eq!(config.notifications.rain_keywords.len(), 3);
        // defaults still apply for unset fields
        assert_eq!(config.proximity.home_threshold_miles, 0.05);
        assert_eq!(config.notifications.hot_threshold_f, 77.0);
    }

    #[test]
    fn inverted_hysteresis_band_is_rejected() {
        let mut config = UnforgettableConfig::default();
        config.proximity.home_threshold_miles = 0.2;
        assert!(config.validate().is_err());
    }

    #[test]
    fn env_overrides_apply() {
        let mut config = UnforgettableConfig::default();
        std::env::set_var("UNFORGETTABLE_DB", "/tmp/override.db");
        std::env::set_var("UNFORGETTABLE_USER", "env-user");
        std::env::set_var("UNFORGETTABLE_LOG_LEVEL", "trace");

        config.apply_env_overrides();

        assert_eq!(config.storage.db_path, "/tmp/override.db");
        assert_eq!(config.storage.user.as_deref(), Some("env-user"));
        assert_eq!(config.general.log_level, "trace");

        std::env::remove_var("UNFORGETTABLE_DB");
        std::env::remove_var("UNFORGETTABLE_USER");
        std::env::remove_var("UNFORGETTABLE_LOG_LEVEL");
    }
}
