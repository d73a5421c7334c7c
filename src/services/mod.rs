//! HTTP collaborators: forward/reverse geocoding and current weather.
//!
//! Every call goes through a shared `reqwest` client with a bounded timeout.
//! There is exactly one attempt per call; callers decide what to fall back to.

pub mod geocode;
pub mod weather;

use std::time::Duration;

use crate::config::ServicesConfig;
use crate::error::{ReminderError, Result};

pub use geocode::{GeocodeClient, GeocodeResult, NominatimClient};
pub use weather::{OpenWeatherClient, WeatherClient, WeatherReport, WeatherSnapshot};

/// Build the shared HTTP client from config.
pub fn http_client(config: &ServicesConfig) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .user_agent(config.user_agent.clone())
        .build()
        .map_err(|e| ReminderError::Config(format!("failed to build HTTP client: {e}")))
}

/// `base` joined with `path`, with query parameters encoded.
fn endpoint(base: &str, path: &str, params: &[(&str, &str)]) -> Result<reqwest::Url> {
    let raw = format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'));
    reqwest::Url::parse_with_params(&raw, params)
        .map_err(|e| ReminderError::Config(format!("invalid service URL {raw}: {e}")))
}
