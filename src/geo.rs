//! Coordinates and great-circle distance.

use serde::{Deserialize, Serialize};

use crate::error::{ReminderError, Result};

/// Mean Earth radius in statute miles.
pub const EARTH_RADIUS_MILES: f64 = 3959.0;

/// Mean Earth radius in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// A WGS84 position. Construct through [`Coordinate::new`] to get range checks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    /// Validate and build a coordinate. Rejects NaN/infinite and out-of-range values.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(ReminderError::validation(format!(
                "latitude must be within [-90, 90], got {latitude}"
            )));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(ReminderError::validation(format!(
                "longitude must be within [-180, 180], got {longitude}"
            )));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Key used for per-session reverse-geocode caching: both axes rounded to
    /// 5 decimal places (about 1 m), stored as fixed-point integers.
    pub fn round5(&self) -> (i64, i64) {
        (
            (self.latitude * 1e5).round() as i64,
            (self.longitude * 1e5).round() as i64,
        )
    }

    /// `"lat, lon"` with 5 decimals, used when no address is known.
    pub fn display(&self) -> String {
        format!("{:.5}, {:.5}", self.latitude, self.longitude)
    }
}

impl std::str::FromStr for Coordinate {
    type Err = ReminderError;

    /// Parse `"lat,lon"` (whitespace around either number is ignored).
    fn from_str(s: &str) -> Result<Self> {
        let (lat, lon) = s
            .split_once(',')
            .ok_or_else(|| ReminderError::validation(format!("expected `lat,lon`, got `{s}`")))?;
        let lat: f64 = lat
            .trim()
            .parse()
            .map_err(|_| ReminderError::validation(format!("malformed latitude `{}`", lat.trim())))?;
        let lon: f64 = lon
            .trim()
            .parse()
            .map_err(|_| ReminderError::validation(format!("malformed longitude `{}`", lon.trim())))?;
        Self::new(lat, lon)
    }
}

/// Haversine central angle between two points, in radians.
fn central_angle(a: &Coordinate, b: &Coordinate) -> f64 {
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lon = (b.longitude - a.longitude).to_radians();
    let h = (d_lat / 2.0).sin().powi(2)
        + a.latitude.to_radians().cos() * b.latitude.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    // Clamp guards against h drifting past 1.0 for antipodal points.
    2.0 * h.sqrt().min(1.0).asin()
}

/// Great-circle distance in miles. Symmetric, zero for identical points.
pub fn distance_miles(a: &Coordinate, b: &Coordinate) -> f64 {
    EARTH_RADIUS_MILES * central_angle(a, b)
}

/// Great-circle distance in kilometres.
pub fn distance_km(a: &Coordinate, b: &Coordinate) -> f64 {
    EARTH_RADIUS_KM * central_angle(a, b)
}
