//! Packing suggestions for a trip.
//!
//! [`recommend`] is pure: essentials first, then items from the weather
//! table, then temperature extras, then duration extras. The order is part
//! of the contract so listings and tests are reproducible.

use serde::Serialize;

use crate::config::RecommendationConfig;

/// One suggested item with the reason it was suggested.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecommendedItem {
    pub name: &'static str,
    pub reason: String,
    pub icon: &'static str,
}

fn item(name: &'static str, reason: &str, icon: &'static str) -> RecommendedItem {
    RecommendedItem {
        name,
        reason: reason.to_string(),
        icon,
    }
}

/// How long the trip lasts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TripDuration {
    Day,
    Weekend,
    Week,
    Long,
}

impl TripDuration {
    /// Parse a duration tag. Unknown tags give `None`, which [`recommend`]
    /// treats as "no duration extras".
    pub fn parse(tag: &str) -> Option<Self> {
        match tag.trim().to_ascii_lowercase().as_str() {
            "day" => Some(Self::Day),
            "weekend" => Some(Self::Weekend),
            "week" => Some(Self::Week),
            "long" => Some(Self::Long),
            _ => None,
        }
    }

    fn overnight(self) -> bool {
        matches!(self, Self::Weekend | Self::Week | Self::Long)
    }

    fn extended(self) -> bool {
        matches!(self, Self::Week | Self::Long)
    }

    fn trip_length_phrase(self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Weekend => "2-3 day",
            Self::Week => "week-long",
            Self::Long => "extended",
        }
    }
}

/// Temperature cut-offs for the extras, in °F.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TemperatureBands {
    pub hot_above_f: f64,
    pub cold_below_f: f64,
}

impl From<&RecommendationConfig> for TemperatureBands {
    fn from(config: &RecommendationConfig) -> Self {
        Self {
            hot_above_f: config.hot_threshold_f,
            cold_below_f: config.cold_threshold_f,
        }
    }
}

impl Default for TemperatureBands {
    fn default() -> Self {
        (&RecommendationConfig::default()).into()
    }
}

fn essentials() -> [RecommendedItem; 2] {
    [
        item("Phone charger", "Essential for staying connected", "📱"),
        item("Wallet with ID and cards", "For identification and payments", "💳"),
    ]
}

/// Fixed weather table. Unknown codes contribute nothing.
fn weather_items(condition: &str) -> Vec<RecommendedItem> {
    match condition {
        "clear" | "sunny" => vec![
            item("Sunscreen", "Protect your skin from UV rays", "☀️"),
            item("Sunglasses", "Protect your eyes on bright days", "😎"),
            item("Hat", "Additional sun protection", "👒"),
        ],
        "rain" | "rainy" | "drizzle" => vec![
            item("Umbrella", "Stay dry in the rain", "☔"),
            item("Raincoat", "Essential for rainy weather", "🧥"),
            item("Waterproof shoes", "Keep your feet dry", "👟"),
        ],
        "thunderstorm" => vec![
            item("Stay at home", "Don't get yourself in danger", "🏠"),
            item("Umbrella", "Stay dry in the rain", "☔"),
            item("Raincoat", "Essential for rainy weather", "🧥"),
            item("Waterproof shoes", "Keep your feet dry", "👟"),
        ],
        "clouds" | "cloudy" => vec![
            item("Light jacket", "For variable weather conditions", "🧥"),
            item("Umbrella", "Just in case it rains", "☔"),
        ],
        "snow" | "snowy" => vec![
            item("Winter coat", "Stay warm in cold temperatures", "🧥"),
            item("Gloves", "Keep your hands warm", "🧤"),
            item("Hat and scarf", "Essential for cold weather", "🧣"),
            item("Boots", "Navigate snow and ice safely", "👢"),
        ],
        "hot" => vec![
            item("Water bottle", "Stay hydrated in hot weather", "💧"),
            item("Sunscreen", "Protect your skin from UV rays", "☀️"),
        ],
        _ => Vec::new(),
    }
}

fn temperature_items(temperature_f: f64, bands: TemperatureBands) -> Vec<RecommendedItem> {
    if temperature_f > bands.hot_above_f {
        vec![
            item("Water bottle", "Stay hydrated in hot weather", "💧"),
            item("Light clothing", "Stay cool in high temperatures", "👕"),
        ]
    } else if temperature_f < bands.cold_below_f {
        vec![item("Warm layers", "Stay comfortable in cold weather", "🧶")]
    } else {
        Vec::new()
    }
}

fn duration_items(duration: TripDuration) -> Vec<RecommendedItem> {
    let mut items = Vec::new();
    if duration.overnight() {
        items.push(item("Toothbrush and toothpaste", "Essential for overnight stays", "🪥"));
        items.push(RecommendedItem {
            name: "Change of clothes",
            reason: format!("For a {} trip", duration.trip_length_phrase()),
            icon: "👕",
        });
    }
    if duration.extended() {
        items.push(item("Laundry supplies", "For longer trips", "🧺"));
        items.push(item("First aid kit", "For emergencies", "🩹"));
    }
    items
}

/// Build the ordered suggestion list for a trip. An item suggested by more
/// than one rule appears once, at its first position.
///
/// `condition` is matched case-insensitively against the weather table.
/// `duration` of `None` (an unknown tag) adds no duration items.
pub fn recommend(
    condition: &str,
    temperature_f: f64,
    duration: Option<TripDuration>,
    bands: TemperatureBands,
) -> Vec<RecommendedItem> {
    let condition = condition.trim().to_lowercase();

    let mut items: Vec<RecommendedItem> = essentials().into();
    extend_unique(&mut items, weather_items(&condition));
    extend_unique(&mut items, temperature_items(temperature_f, bands));
    if let Some(duration) = duration {
        extend_unique(&mut items, duration_items(duration));
    }
    items
}

/// Quick on-the-spot suggestions for current conditions (no essentials or
/// duration extras), used next to the live weather reading.
pub fn weather_hints(condition: &str, temperature_f: f64, bands: TemperatureBands) -> Vec<RecommendedItem> {
    let condition = condition.trim().to_lowercase();
    let mut items = weather_items(&condition);
    extend_unique(&mut items, temperature_items(temperature_f, bands));
    items
}

/// Append `extra`, keeping the first occurrence of each name.
fn extend_unique(items: &mut Vec<RecommendedItem>, extra: Vec<RecommendedItem>) {
    for candidate in extra {
        if !items.iter().any(|i| i.name == candidate.name) {
            items.push(candidate);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(items: &[RecommendedItem]) -> Vec<&'static str> {
        items.iter().map(|i| i.name).collect()
    }

    fn position(items: &[RecommendedItem], name: &str) -> usize {
        items
            .iter()
            .position(|i| i.name == name)
            .unwrap_or_else(|| panic!("{name} missing"))
    }

    #[test]
    fn rainy_day_trip() {
        let items = recommend("rain", 60.0, Some(TripDuration::Day), TemperatureBands::default());
        let charger = position(&items, "Phone charger");
        let wallet = position(&items, "Wallet with ID and cards");
        let umbrella = position(&items, "Umbrella");
        let raincoat = position(&items, "Raincoat");
        assert!(charger < wallet && wallet < umbrella && umbrella < raincoat);

        for duration_only in [
            "Toothbrush and toothpaste",
            "Change of clothes",
            "Laundry supplies",
            "First aid kit",
        ] {
            assert!(!names(&items).contains(&duration_only));
        }
    }

    #[test]
    fn hot_clear_week() {
        let items = recommend("clear", 90.0, Some(TripDuration::Week), TemperatureBands::default());
        let names = names(&items);
        for expected in [
            "Sunglasses",
            "Sunscreen",
            "Hat",
            "Water bottle",
            "Light clothing",
            "Laundry supplies",
            "First aid kit",
            "Toothbrush and toothpaste",
        ] {
            assert!(names.contains(&expected), "{expected} missing from {names:?}");
        }
        // weather block before temperature block before duration block
        assert!(position(&items, "Hat") < position(&items, "Water bottle"));
        assert!(position(&items, "Light clothing") < position(&items, "Laundry supplies"));
    }

    #[test]
    fn unknown_condition_and_duration_give_base_list() {
        let items = recommend("volcanic ash", 65.0, TripDuration::parse("fortnight"), TemperatureBands::default());
        assert_eq!(names(&items), vec!["Phone charger", "Wallet with ID and cards"]);
    }

    #[test]
    fn temperature_bands_are_disjoint() {
        let bands = TemperatureBands::default();
        for t in [50.0, 60.0, 85.0] {
            let items = recommend("fog", t, None, bands);
            assert_eq!(items.len(), 2, "no extras expected at {t}");
        }
        let cold = recommend("fog", 40.0, None, bands);
        assert_eq!(names(&cold)[2], "Warm layers");
    }

    #[test]
    fn weekend_reason_mentions_length() {
        let items = recommend("clear", 70.0, Some(TripDuration::Weekend), TemperatureBands::default());
        let clothes = &items[position(&items, "Change of clothes")];
        assert_eq!(clothes.reason, "For a 2-3 day trip");
        assert!(!names(&items).contains(&"Laundry supplies"));
    }

    #[test]
    fn condition_is_case_insensitive() {
        let items = recommend("Snow", 20.0, None, TemperatureBands::default());
        assert!(names(&items).contains(&"Boots"));
        assert!(names(&items).contains(&"Warm layers"));
    }

    #[test]
    fn weather_hints_skip_duplicates() {
        let hints = weather_hints("hot", 95.0, TemperatureBands::default());
        let count = hints.iter().filter(|i| i.name == "Water bottle").count();
        assert_eq!(count, 1);
    }

    #[test]
    fn hot_condition_in_heat_lists_water_once() {
        let items = recommend("hot", 90.0, Some(TripDuration::Day), TemperatureBands::default());
        assert_eq!(items.iter().filter(|i| i.name == "Water bottle").count(), 1);
        assert_eq!(items.iter().filter(|i| i.name == "Sunscreen").count(), 1);
        // Light clothing still follows the weather row.
        assert!(position(&items, "Water bottle") < position(&items, "Light clothing"));
        assert_eq!(items.len(), 2 + 2 + 1);
    }

    #[test]
    fn parse_duration_tags() {
        assert_eq!(TripDuration::parse("Weekend"), Some(TripDuration::Weekend));
        assert_eq!(TripDuration::parse("long"), Some(TripDuration::Long));
        assert_eq!(TripDuration::parse(""), None);
    }
}
