//! Core reminder type definitions.
//!
//! Defines [`Condition`] (when an item should be brought), [`ReminderItem`]
//! (a persisted user item), [`HomeLocation`] (the single per-user home
//! record), and [`User`] (the signed-in identity).

use serde::{Deserialize, Serialize};

use crate::geo::Coordinate;

/// The situations a reminder item can be attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Condition {
    /// Fires once each time the user crosses out of the home radius.
    LeavingHome,
    /// Current weather mentions rain or drizzle.
    Rain,
    /// Temperature above the hot threshold.
    Hot,
    /// Temperature below the cold threshold.
    Cold,
    /// Fires on every weather evaluation, subject to cooldown.
    Always,
}

impl Condition {
    pub const ALL: [Condition; 5] = [
        Self::LeavingHome,
        Self::Rain,
        Self::Hot,
        Self::Cold,
        Self::Always,
    ];

    /// SQL-compatible string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LeavingHome => "leaving-home",
            Self::Rain => "rain",
            Self::Hot => "hot",
            Self::Cold => "cold",
            Self::Always => "always",
        }
    }

    /// Human-readable label for listings and banners.
    pub fn label(&self) -> &'static str {
        match self {
            Self::LeavingHome => "When leaving home",
            Self::Rain => "When raining",
            Self::Hot => "When hot",
            Self::Cold => "When cold",
            Self::Always => "Always",
        }
    }
}

impl std::fmt::Display for Condition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Condition {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "leaving-home" => Ok(Self::LeavingHome),
            "rain" => Ok(Self::Rain),
            "hot" => Ok(Self::Hot),
            "cold" => Ok(Self::Cold),
            "always" => Ok(Self::Always),
            _ => Err(format!("unknown condition: {s}")),
        }
    }
}

/// A reminder item, matching the `reminder_items` table schema.
///
/// Items are created and deleted, never edited in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReminderItem {
    /// UUID v7 assigned by the store.
    pub id: String,
    /// What to bring, e.g. `"Umbrella"`. Never empty.
    pub name: String,
    pub condition: Condition,
}

/// Input for creating an item; the store assigns the id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewItem {
    pub name: String,
    pub condition: Condition,
}

impl NewItem {
    pub fn new(name: impl Into<String>, condition: Condition) -> Self {
        Self {
            name: name.into(),
            condition,
        }
    }
}

/// The user's home. At most one per user; saving again overwrites it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HomeLocation {
    pub coordinate: Coordinate,
    pub display_name: String,
}

/// The identity returned by the auth gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: Option<String>,
    pub email: Option<String>,
}

impl User {
    /// Name to greet the user with: name, then email, then `"User"`.
    pub fn greeting_name(&self) -> &str {
        self.name
            .as_deref()
            .or(self.email.as_deref())
            .unwrap_or("User")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn condition_round_trips_through_str() {
        for c in Condition::ALL {
            assert_eq!(c.as_str().parse::<Condition>().unwrap(), c);
        }
        assert!("sunny".parse::<Condition>().is_err());
    }

    #[test]
    fn condition_serializes_kebab_case() {
        let json = serde_json::to_string(&Condition::LeavingHome).unwrap();
        assert_eq!(json, "\"leaving-home\"");
    }

    #[test]
    fn greeting_falls_back_to_email_then_default() {
        let mut user = User {
            id: "u1".into(),
            name: None,
            email: Some("a@b.c".into()),
        };
        assert_eq!(user.greeting_name(), "a@b.c");
        user.email = None;
        assert_eq!(user.greeting_name(), "User");
    }
}
