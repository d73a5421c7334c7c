//! Notification decisions.
//!
//! [`NotificationPolicy::evaluate`] computes which [`Condition`]s are active
//! for one tick, matches them against the user's items, and passes each match
//! through a per-condition cooldown gate. Conditions are independent: one
//! firing never affects another's gate. Delivery lives in [`delivery`].

pub mod delivery;

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::config::NotificationConfig;
use crate::reminder::types::{Condition, ReminderItem};

pub const NOTIFICATION_TITLE: &str = "Don't Forget!";

/// One reminder to show the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotificationEvent {
    pub condition: Condition,
    /// Matching item names joined with `", "`.
    pub item_names: String,
    pub title: String,
    pub body: String,
}

impl NotificationEvent {
    fn new(condition: Condition, items: &[&ReminderItem]) -> Self {
        let item_names = items
            .iter()
            .map(|i| i.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        Self {
            condition,
            body: format!("Remember to take: {item_names}"),
            item_names,
            title: NOTIFICATION_TITLE.to_string(),
        }
    }
}

/// Inputs for one evaluation tick.
#[derive(Debug, Clone, Copy)]
pub struct Tick<'a> {
    pub items: &'a [ReminderItem],
    /// Lowercase weather condition text, e.g. `"light rain"`.
    pub weather_condition: &'a str,
    pub temperature_f: f64,
    /// Set only for an explicit proximity event.
    pub trigger: Option<Condition>,
    pub now: DateTime<Utc>,
}

/// When each condition last fired. Lives for the process; never persisted.
#[derive(Debug, Clone, Default)]
pub struct GateState {
    last_fired_at: HashMap<Condition, DateTime<Utc>>,
}

impl GateState {
    pub fn last_fired_at(&self, condition: Condition) -> Option<DateTime<Utc>> {
        self.last_fired_at.get(&condition).copied()
    }

    fn allows(&self, condition: Condition, now: DateTime<Utc>, cooldown: Duration) -> bool {
        match self.last_fired_at.get(&condition) {
            None => true,
            Some(last) => now - *last > cooldown,
        }
    }

    fn record(&mut self, condition: Condition, now: DateTime<Utc>) {
        self.last_fired_at.insert(condition, now);
    }
}

#[derive(Debug, Clone)]
pub struct NotificationPolicy {
    cooldown: Duration,
    hot_above_f: f64,
    cold_below_f: f64,
    rain_keywords: Vec<String>,
    gate: GateState,
}

impl NotificationPolicy {
    pub fn new(config: &NotificationConfig) -> Self {
        Self {
            cooldown: Duration::seconds(config.cooldown_secs as i64),
            hot_above_f: config.hot_threshold_f,
            cold_below_f: config.cold_threshold_f,
            rain_keywords: config
                .rain_keywords
                .iter()
                .map(|k| k.to_lowercase())
                .collect(),
            gate: GateState::default(),
        }
    }

    pub fn gate(&self) -> &GateState {
        &self.gate
    }

    /// Conditions active for this tick, in [`Condition::ALL`] order.
    pub fn active_conditions(
        &self,
        weather_condition: &str,
        temperature_f: f64,
        trigger: Option<Condition>,
    ) -> Vec<Condition> {
        let weather = weather_condition.to_lowercase();
        Condition::ALL
            .into_iter()
            .filter(|c| match c {
                Condition::LeavingHome => trigger == Some(Condition::LeavingHome),
                Condition::Rain => self.rain_keywords.iter().any(|k| weather.contains(k.as_str())),
                Condition::Hot => temperature_f > self.hot_above_f,
                Condition::Cold => temperature_f < self.cold_below_f,
                Condition::Always => true,
            })
            .collect()
    }

    /// Decide what fires now and update the gate for everything that does.
    pub fn evaluate(&mut self, tick: Tick<'_>) -> Vec<NotificationEvent> {
        let active = self.active_conditions(tick.weather_condition, tick.temperature_f, tick.trigger);
        let mut events = Vec::new();

        for condition in active {
            let matching: Vec<&ReminderItem> = tick
                .items
                .iter()
                .filter(|i| i.condition == condition)
                .collect();
            if matching.is_empty() {
                continue;
            }

            if !self.gate.allows(condition, tick.now, self.cooldown) {
                tracing::debug!(%condition, "suppressed by cooldown");
                continue;
            }

            self.gate.record(condition, tick.now);
            let event = NotificationEvent::new(condition, &matching);
            tracing::info!(%condition, items = %event.item_names, "reminder fired");
            events.push(event);
        }

        events
    }
}
