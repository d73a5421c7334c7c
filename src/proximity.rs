//! Home/away tracking with hysteresis.
//!
//! [`ProximityTracker`] turns position updates into a latched "away from home"
//! flag. Leaving needs `d > far`, returning needs `d < home`, and nothing
//! happens in between, so a user standing on the boundary does not toggle.
//! Only the HOME → AWAY edge produces a [`Condition::LeavingHome`] trigger.
//!
//! [`PositionDebouncer`] sits in front of the tracker and coalesces bursts
//! from noisy location providers down to the latest position per window.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::config::ProximityConfig;
use crate::geo::{distance_miles, Coordinate};
use crate::reminder::types::{Condition, HomeLocation};

/// The two latch states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Presence {
    Home,
    Away,
}

/// Snapshot of the tracker for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProximityState {
    pub current: Option<Coordinate>,
    pub home: Option<HomeLocation>,
    /// Miles from home at the last update, `0.0` before any update.
    pub last_distance_miles: f64,
    pub away: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProximityThresholds {
    pub far_miles: f64,
    pub home_miles: f64,
}

impl From<&ProximityConfig> for ProximityThresholds {
    fn from(config: &ProximityConfig) -> Self {
        Self {
            far_miles: config.far_threshold_miles,
            home_miles: config.home_threshold_miles,
        }
    }
}

impl Default for ProximityThresholds {
    fn default() -> Self {
        (&ProximityConfig::default()).into()
    }
}

#[derive(Debug, Clone)]
pub struct ProximityTracker {
    thresholds: ProximityThresholds,
    home: Option<HomeLocation>,
    current: Option<Coordinate>,
    last_distance_miles: f64,
    presence: Presence,
}

impl ProximityTracker {
    pub fn new(thresholds: ProximityThresholds) -> Self {
        Self {
            thresholds,
            home: None,
            current: None,
            last_distance_miles: 0.0,
            presence: Presence::Home,
        }
    }

    /// Replace (or clear) the home location. The latch resets to HOME so a
    /// fresh home never inherits an AWAY state from the old one.
    pub fn set_home(&mut self, home: Option<HomeLocation>) {
        self.home = home;
        self.presence = Presence::Home;
        self.last_distance_miles = 0.0;
    }

    pub fn presence(&self) -> Presence {
        self.presence
    }

    /// Feed one (already debounced) position. Returns `Some(LeavingHome)` on
    /// the HOME → AWAY edge and `None` otherwise, including when no home is set.
    pub fn update(&mut self, position: Coordinate) -> Option<Condition> {
        self.current = Some(position);

        let home = self.home.as_ref()?;
        let d = distance_miles(&home.coordinate, &position);
        self.last_distance_miles = d;

        match self.presence {
            Presence::Home if d > self.thresholds.far_miles => {
                tracing::info!(distance_miles = d, "left home radius");
                self.presence = Presence::Away;
                Some(Condition::LeavingHome)
            }
            Presence::Away if d < self.thresholds.home_miles => {
                tracing::info!(distance_miles = d, "back inside home radius");
                self.presence = Presence::Home;
                None
            }
            _ => None,
        }
    }

    pub fn state(&self) -> ProximityState {
        ProximityState {
            current: self.current,
            home: self.home.clone(),
            last_distance_miles: self.last_distance_miles,
            away: self.presence == Presence::Away,
        }
    }
}

/// Rate limiter for raw position updates. Within one spacing window only the
/// latest position survives; it is released by [`flush`](Self::flush) once
/// the window closes.
#[derive(Debug, Clone)]
pub struct PositionDebouncer {
    spacing: Duration,
    last_accepted: Option<DateTime<Utc>>,
    pending: Option<Coordinate>,
}

impl PositionDebouncer {
    pub fn new(spacing: Duration) -> Self {
        Self {
            spacing,
            last_accepted: None,
            pending: None,
        }
    }

    pub fn from_config(config: &ProximityConfig) -> Self {
        Self::new(Duration::milliseconds(config.debounce_ms as i64))
    }

    fn due(&self, now: DateTime<Utc>) -> bool {
        self.last_accepted
            .map_or(true, |last| now - last >= self.spacing)
    }

    /// Offer a raw update. Returns it immediately if the window is open,
    /// otherwise parks it (replacing any earlier parked update).
    pub fn push(&mut self, position: Coordinate, now: DateTime<Utc>) -> Option<Coordinate> {
        if self.due(now) {
            self.last_accepted = Some(now);
            self.pending = None;
            Some(position)
        } else {
            self.pending = Some(position);
            None
        }
    }

    /// Release the parked update if its window has closed.
    pub fn flush(&mut self, now: DateTime<Utc>) -> Option<Coordinate> {
        if self.pending.is_some() && self.due(now) {
            self.last_accepted = Some(now);
            self.pending.take()
        } else {
            None
        }
    }

    /// When the parked update becomes releasable, if there is one.
    pub fn next_flush_at(&self) -> Option<DateTime<Utc>> {
        match (self.pending, self.last_accepted) {
            (Some(_), Some(last)) => Some(last + self.spacing),
            _ => None,
        }
    }
}
