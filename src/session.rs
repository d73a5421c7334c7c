//! The running reminder session.
//!
//! [`Session`] owns all in-memory state for one signed-in user: the item
//! list, the proximity tracker, the latest weather snapshot, and the
//! notification gate. Each component only sees its own slice.
//!
//! [`watch`] drives a session from two independent event streams (position
//! updates and weather fetches) until shutdown. Neither stream is sequenced
//! against the other; the last write wins for each piece of state.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::{mpsc, watch as watch_channel};

use crate::config::UnforgettableConfig;
use crate::error::{ReminderError, Result};
use crate::geo::Coordinate;
use crate::notify::delivery::{self, Banner, Channel, PlatformNotifier};
use crate::notify::{NotificationEvent, NotificationPolicy, Tick};
use crate::proximity::{PositionDebouncer, ProximityState, ProximityThresholds, ProximityTracker};
use crate::reminder::types::{Condition, HomeLocation, ReminderItem};
use crate::reminder::{ItemStore, SettingsStore};
use crate::services::{WeatherClient, WeatherReport, WeatherSnapshot};

pub struct Session {
    user_id: String,
    items: Vec<ReminderItem>,
    tracker: ProximityTracker,
    debouncer: PositionDebouncer,
    weather: WeatherSnapshot,
    last_report: Option<WeatherReport>,
    policy: NotificationPolicy,
    /// A position reached the tracker since the last [`Session::take_position_update`].
    position_applied: bool,
}

impl Session {
    pub fn new(
        user_id: impl Into<String>,
        items: Vec<ReminderItem>,
        home: Option<HomeLocation>,
        config: &UnforgettableConfig,
    ) -> Self {
        let mut tracker = ProximityTracker::new(ProximityThresholds::from(&config.proximity));
        tracker.set_home(home);
        Self {
            user_id: user_id.into(),
            items,
            tracker,
            debouncer: PositionDebouncer::from_config(&config.proximity),
            weather: WeatherSnapshot::default(),
            last_report: None,
            policy: NotificationPolicy::new(&config.notifications),
            position_applied: false,
        }
    }

    /// Load the user's items and home from the stores.
    pub fn hydrate(
        user_id: &str,
        items: &dyn ItemStore,
        settings: &dyn SettingsStore,
        config: &UnforgettableConfig,
    ) -> Result<Self> {
        let loaded = items.list(user_id)?;
        let home = settings.home_location(user_id)?;
        tracing::info!(
            user_id,
            items = loaded.len(),
            has_home = home.is_some(),
            "session hydrated"
        );
        Ok(Self::new(user_id, loaded, home, config))
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn items(&self) -> &[ReminderItem] {
        &self.items
    }

    pub fn proximity(&self) -> ProximityState {
        self.tracker.state()
    }

    pub fn weather(&self) -> &WeatherSnapshot {
        &self.weather
    }

    pub fn last_report(&self) -> Option<&WeatherReport> {
        self.last_report.as_ref()
    }

    /// Where to fetch weather for: the live position, else home.
    pub fn weather_target(&self) -> Option<Coordinate> {
        let state = self.tracker.state();
        state.current.or(state.home.map(|h| h.coordinate))
    }

    /// Raw position from the location feed. Debounced before it reaches
    /// the tracker.
    pub fn on_position(&mut self, position: Coordinate, now: DateTime<Utc>) -> Vec<NotificationEvent> {
        match self.debouncer.push(position, now) {
            Some(accepted) => self.apply_position(accepted, now),
            None => Vec::new(),
        }
    }

    /// Release a coalesced position whose debounce window has closed.
    pub fn flush_position(&mut self, now: DateTime<Utc>) -> Vec<NotificationEvent> {
        match self.debouncer.flush(now) {
            Some(accepted) => self.apply_position(accepted, now),
            None => Vec::new(),
        }
    }

    /// Time until [`flush_position`](Self::flush_position) has work to do.
    pub fn next_flush_delay(&self, now: DateTime<Utc>) -> Option<Duration> {
        self.debouncer
            .next_flush_at()
            .map(|at| (at - now).to_std().unwrap_or(Duration::ZERO))
    }

    /// Proximity snapshot if a position was applied since the last call.
    /// Debounced (parked) positions do not count until they are flushed.
    pub fn take_position_update(&mut self) -> Option<ProximityState> {
        std::mem::take(&mut self.position_applied).then(|| self.tracker.state())
    }

    fn apply_position(&mut self, position: Coordinate, now: DateTime<Utc>) -> Vec<NotificationEvent> {
        self.position_applied = true;
        let Some(trigger) = self.tracker.update(position) else {
            return Vec::new();
        };
        self.evaluate(Some(trigger), now)
    }

    /// A weather fetch finished. Success replaces the snapshot and runs the
    /// policy; failure keeps the stale snapshot and fires nothing.
    pub fn on_weather(&mut self, result: Result<WeatherReport>, now: DateTime<Utc>) -> Vec<NotificationEvent> {
        match result {
            Ok(report) => {
                self.weather = WeatherSnapshot::from(&report);
                self.last_report = Some(report);
                self.evaluate(None, now)
            }
            Err(e) => {
                tracing::warn!(error = %e, "weather unavailable, keeping last reading");
                Vec::new()
            }
        }
    }

    fn evaluate(&mut self, trigger: Option<Condition>, now: DateTime<Utc>) -> Vec<NotificationEvent> {
        self.policy.evaluate(Tick {
            items: &self.items,
            weather_condition: &self.weather.condition_code,
            temperature_f: self.weather.temperature_f,
            trigger,
            now,
        })
    }
}

/// Timing knobs for [`watch`].
#[derive(Debug, Clone, Copy)]
pub struct WatchOptions {
    pub weather_refresh: Duration,
    pub request_timeout: Duration,
}

impl From<&UnforgettableConfig> for WatchOptions {
    fn from(config: &UnforgettableConfig) -> Self {
        Self {
            weather_refresh: Duration::from_secs(config.services.weather_refresh_secs.max(1)),
            request_timeout: Duration::from_secs(config.services.timeout_secs),
        }
    }
}

/// Output side of a watch loop.
pub struct Delivery<'a> {
    pub platform: &'a dyn PlatformNotifier,
    pub banner: &'a dyn Banner,
}

impl Delivery<'_> {
    async fn send_all(&self, events: Vec<NotificationEvent>) {
        for event in events {
            let channel = delivery::deliver(&event, self.platform, self.banner).await;
            if channel == Channel::Banner {
                tracing::debug!(condition = %event.condition, "reminder shown as banner");
            }
        }
    }
}

async fn fetch_with_timeout(
    client: Arc<dyn WeatherClient>,
    target: Coordinate,
    timeout: Duration,
) -> Result<WeatherReport> {
    match tokio::time::timeout(timeout, client.current(target)).await {
        Ok(result) => result,
        Err(_) => Err(ReminderError::network(format!(
            "weather request timed out after {}s",
            timeout.as_secs_f64()
        ))),
    }
}

/// Run the session until `shutdown` flips (or its sender is dropped).
///
/// Weather is fetched on a fixed interval in a spawned task so a slow
/// request never holds up position handling. The position receiver is
/// dropped on return, which releases the location feed.
pub async fn watch(
    mut session: Session,
    mut positions: mpsc::Receiver<Coordinate>,
    weather: Arc<dyn WeatherClient>,
    delivery: Delivery<'_>,
    options: WatchOptions,
    mut shutdown: watch_channel::Receiver<bool>,
) -> Session {
    let (weather_tx, mut weather_rx) = mpsc::channel::<Result<WeatherReport>>(4);
    let mut refresh = tokio::time::interval(options.weather_refresh);
    refresh.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    let mut feed_open = true;

    tracing::info!(user_id = %session.user_id(), "watching for reminders");

    loop {
        let flush_delay = session.next_flush_delay(Utc::now());

        let events = tokio::select! {
            _ = shutdown.changed() => break,

            _ = refresh.tick() => {
                match session.weather_target() {
                    Some(target) => {
                        let client = Arc::clone(&weather);
                        let tx = weather_tx.clone();
                        let timeout = options.request_timeout;
                        tokio::spawn(async move {
                            let result = fetch_with_timeout(client, target, timeout).await;
                            // Receiver gone means the session already ended.
                            let _ = tx.send(result).await;
                        });
                    }
                    None => tracing::debug!("no position or home yet, skipping weather refresh"),
                }
                Vec::new()
            }

            Some(result) = weather_rx.recv() => session.on_weather(result, Utc::now()),

            position = positions.recv(), if feed_open => match position {
                Some(p) => session.on_position(p, Utc::now()),
                None => {
                    tracing::info!("location feed closed");
                    feed_open = false;
                    Vec::new()
                }
            },

            _ = tokio::time::sleep(flush_delay.unwrap_or_default()), if flush_delay.is_some() => {
                session.flush_position(Utc::now())
            }
        };

        if let Some(state) = session.take_position_update() {
            delivery.banner.proximity(&state);
        }
        delivery.send_all(events).await;
    }

    tracing::info!("watch stopped");
    session
}
