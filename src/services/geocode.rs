//! Address ↔ coordinate lookups against a Nominatim-compatible service.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use serde::Deserialize;

use super::endpoint;
use crate::config::ServicesConfig;
use crate::error::{ReminderError, Result};
use crate::geo::Coordinate;

/// A forward geocoding hit.
#[derive(Debug, Clone, PartialEq)]
pub struct GeocodeResult {
    pub coordinate: Coordinate,
    pub display_name: String,
}

#[async_trait]
pub trait GeocodeClient: Send + Sync {
    /// Best match for free-form text, or `None` if nothing matched.
    async fn forward(&self, query: &str) -> Result<Option<GeocodeResult>>;

    /// Address for a coordinate, or `None` if the service has none.
    async fn reverse(&self, coordinate: Coordinate) -> Result<Option<String>>;
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    lat: String,
    lon: String,
    display_name: String,
}

#[derive(Debug, Deserialize)]
struct ReverseResponse {
    display_name: Option<String>,
}

pub struct NominatimClient {
    http: reqwest::Client,
    base_url: String,
    country_code: Option<String>,
    /// Per-session reverse cache keyed by [`Coordinate::round5`].
    reverse_cache: Mutex<HashMap<(i64, i64), String>>,
}

impl NominatimClient {
    pub fn new(http: reqwest::Client, config: &ServicesConfig) -> Self {
        Self {
            http,
            base_url: config.geocode_base_url.clone(),
            country_code: config.country_code.clone(),
            reverse_cache: Mutex::new(HashMap::new()),
        }
    }

    fn cached(&self, key: (i64, i64)) -> Option<String> {
        self.reverse_cache
            .lock()
            .ok()
            .and_then(|cache| cache.get(&key).cloned())
    }

    fn remember(&self, key: (i64, i64), name: &str) {
        if let Ok(mut cache) = self.reverse_cache.lock() {
            cache.insert(key, name.to_string());
        }
    }
}

#[async_trait]
impl GeocodeClient for NominatimClient {
    async fn forward(&self, query: &str) -> Result<Option<GeocodeResult>> {
        let query = query.trim();
        if query.is_empty() {
            return Err(ReminderError::validation("location text must not be empty"));
        }

        let mut params = vec![("format", "json"), ("q", query), ("limit", "1")];
        if let Some(cc) = self.country_code.as_deref() {
            params.push(("countrycodes", cc));
        }
        let url = endpoint(&self.base_url, "search", &params)?;

        let response = self.http.get(url).send().await?;
        if !response.status().is_success() {
            return Err(ReminderError::network(format!(
                "geocoding service returned HTTP {}",
                response.status()
            )));
        }
        let hits: Vec<SearchHit> = response.json().await?;

        let Some(hit) = hits.into_iter().next() else {
            tracing::debug!(query, "no geocoding match");
            return Ok(None);
        };
        let lat: f64 = hit
            .lat
            .parse()
            .map_err(|_| ReminderError::network(format!("malformed latitude `{}` from geocoder", hit.lat)))?;
        let lon: f64 = hit
            .lon
            .parse()
            .map_err(|_| ReminderError::network(format!("malformed longitude `{}` from geocoder", hit.lon)))?;

        Ok(Some(GeocodeResult {
            coordinate: Coordinate::new(lat, lon)?,
            display_name: hit.display_name,
        }))
    }

    async fn reverse(&self, coordinate: Coordinate) -> Result<Option<String>> {
        let key = coordinate.round5();
        if let Some(name) = self.cached(key) {
            return Ok(Some(name));
        }

        let lat = coordinate.latitude.to_string();
        let lon = coordinate.longitude.to_string();
        let url = endpoint(
            &self.base_url,
            "reverse",
            &[
                ("format", "json"),
                ("lat", lat.as_str()),
                ("lon", lon.as_str()),
                ("zoom", "18"),
                ("addressdetails", "1"),
            ],
        )?;

        let response = self.http.get(url).send().await?;
        if !response.status().is_success() {
            return Err(ReminderError::network(format!(
                "reverse geocoding service returned HTTP {}",
                response.status()
            )));
        }
        let body: ReverseResponse = response.json().await?;

        if let Some(name) = &body.display_name {
            self.remember(key, name);
        }
        Ok(body.display_name)
    }
}

/// First `parts` comma-separated components of an address, for compact display.
pub fn shorten_address(display_name: &str, parts: usize) -> String {
    display_name
        .split(',')
        .take(parts)
        .map(str::trim)
        .collect::<Vec<_>>()
        .join(", ")
}
