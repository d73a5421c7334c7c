//! Current conditions from an OpenWeatherMap-compatible service, plus the
//! deterministic mock readings used when the service cannot be reached.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::endpoint;
use crate::config::ServicesConfig;
use crate::error::{ReminderError, Result};
use crate::geo::Coordinate;

/// A full current-conditions reading, imperial units.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherReport {
    /// Lowercase main condition, e.g. `"rain"`, `"clouds"`.
    pub condition_code: String,
    pub temperature_f: f64,
    /// Relative humidity in percent.
    pub humidity: f64,
    /// Miles per hour.
    pub wind_speed: f64,
    pub high: f64,
    pub low: f64,
    pub description: String,
}

/// The slice of a reading the notification policy looks at.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherSnapshot {
    pub condition_code: String,
    pub temperature_f: f64,
}

impl From<&WeatherReport> for WeatherSnapshot {
    fn from(report: &WeatherReport) -> Self {
        Self {
            condition_code: report.condition_code.clone(),
            temperature_f: report.temperature_f,
        }
    }
}

impl Default for WeatherSnapshot {
    /// Mild and clear; used only before the first successful fetch.
    fn default() -> Self {
        Self {
            condition_code: "clear".into(),
            temperature_f: 68.0,
        }
    }
}

#[async_trait]
pub trait WeatherClient: Send + Sync {
    async fn current(&self, coordinate: Coordinate) -> Result<WeatherReport>;
}

#[derive(Debug, Deserialize)]
struct OwmResponse {
    weather: Vec<OwmCondition>,
    main: OwmMain,
    #[serde(default)]
    wind: OwmWind,
}

#[derive(Debug, Deserialize)]
struct OwmCondition {
    main: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct OwmMain {
    temp: f64,
    temp_min: f64,
    temp_max: f64,
    humidity: f64,
}

#[derive(Debug, Deserialize, Default)]
struct OwmWind {
    #[serde(default)]
    speed: f64,
}

impl TryFrom<OwmResponse> for WeatherReport {
    type Error = ReminderError;

    fn try_from(resp: OwmResponse) -> Result<Self> {
        let condition = resp
            .weather
            .into_iter()
            .next()
            .ok_or_else(|| ReminderError::network("weather response had no conditions"))?;
        Ok(Self {
            condition_code: condition.main.to_lowercase(),
            temperature_f: resp.main.temp,
            humidity: resp.main.humidity,
            wind_speed: resp.wind.speed,
            high: resp.main.temp_max,
            low: resp.main.temp_min,
            description: condition.description,
        })
    }
}

pub struct OpenWeatherClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl OpenWeatherClient {
    pub fn new(http: reqwest::Client, config: &ServicesConfig) -> Self {
        Self {
            http,
            base_url: config.weather_base_url.clone(),
            api_key: config.weather_api_key.clone(),
        }
    }
}

#[async_trait]
impl WeatherClient for OpenWeatherClient {
    async fn current(&self, coordinate: Coordinate) -> Result<WeatherReport> {
        if self.api_key.is_empty() {
            return Err(ReminderError::Config(
                "weather API key not configured (set UNFORGETTABLE_WEATHER_API_KEY)".into(),
            ));
        }

        let lat = coordinate.latitude.to_string();
        let lon = coordinate.longitude.to_string();
        let url = endpoint(
            &self.base_url,
            "weather",
            &[
                ("lat", lat.as_str()),
                ("lon", lon.as_str()),
                ("units", "imperial"),
                ("appid", self.api_key.as_str()),
            ],
        )?;

        let response = self.http.get(url).send().await?;
        if !response.status().is_success() {
            return Err(ReminderError::network(format!(
                "weather service returned HTTP {}",
                response.status()
            )));
        }
        let body: OwmResponse = response.json().await?;
        let report = WeatherReport::try_from(body)?;
        tracing::debug!(condition = %report.condition_code, temperature_f = report.temperature_f, "weather fetched");
        Ok(report)
    }
}

fn mock(code: &str, temp: f64, description: &str, high: f64, low: f64, humidity: f64, wind: f64) -> WeatherReport {
    WeatherReport {
        condition_code: code.into(),
        temperature_f: temp,
        humidity,
        wind_speed: wind,
        high,
        low,
        description: description.into(),
    }
}

/// Stand-in reading for when the weather service is unreachable. The same
/// `seed` (usually the destination text) always picks the same reading.
pub fn mock_weather(seed: &str) -> WeatherReport {
    let options = [
        mock("clear", 75.0, "Clear skies", 80.0, 65.0, 45.0, 5.0),
        mock("rain", 55.0, "Light rain throughout the day", 60.0, 50.0, 85.0, 10.0),
        mock("clouds", 65.0, "Partly cloudy with occasional sun", 70.0, 60.0, 60.0, 8.0),
        mock("snow", 30.0, "Light snow throughout the day", 35.0, 25.0, 80.0, 12.0),
    ];
    let sum: u64 = seed.chars().map(|c| c as u64).sum();
    let index = (sum % options.len() as u64) as usize;
    options[index].clone()
}
