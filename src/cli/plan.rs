//! CLI `plan` command: packing list for a destination.

use anyhow::{bail, Result};

use unforgettable::config::UnforgettableConfig;
use unforgettable::recommend::{self, RecommendedItem, TemperatureBands, TripDuration};
use unforgettable::services::weather::mock_weather;
use unforgettable::services::{GeocodeClient, WeatherReport};

use super::{format_temperature, format_wind};

/// Everything `plan` prints.
struct TripPlan {
    place: String,
    report: WeatherReport,
    /// The reading is the sample forecast, not live data.
    sample: bool,
    items: Vec<RecommendedItem>,
}

pub async fn plan(config: &UnforgettableConfig, destination: &str, duration: &str) -> Result<()> {
    let trip = build_plan(config, destination, duration).await?;
    let units = config.general.units;

    if trip.sample {
        println!("(weather service unavailable, showing a sample forecast)");
    }
    println!("{}", trip.place);
    println!(
        "  {}  {}  (high {}, low {})",
        trip.report.description,
        format_temperature(trip.report.temperature_f, units),
        format_temperature(trip.report.high, units),
        format_temperature(trip.report.low, units),
    );
    println!(
        "  Humidity {:.0}%  Wind {}",
        trip.report.humidity,
        format_wind(trip.report.wind_speed, units)
    );
    println!();
    println!("Pack:");
    for item in &trip.items {
        println!("  {} {:<28} {}", item.icon, item.name, item.reason);
    }
    Ok(())
}

/// Geocode, fetch weather, recommend. A failed lookup at either step falls
/// back to the sample forecast for `destination`; only empty input is an error.
async fn build_plan(config: &UnforgettableConfig, destination: &str, duration: &str) -> Result<TripPlan> {
    let destination = destination.trim();
    if destination.is_empty() {
        bail!("please enter a destination");
    }

    let trip = TripDuration::parse(duration);
    if trip.is_none() {
        tracing::warn!(duration, "unknown trip duration, skipping duration items");
    }

    let found = match super::geocoder(config)?.forward(destination).await {
        Ok(found) => {
            if found.is_none() {
                tracing::warn!(destination, "location not found, using sample forecast");
            }
            found
        }
        Err(e) => {
            tracing::warn!(destination, error = %e, "geocoding failed, using sample forecast");
            None
        }
    };

    let (place, report, sample) = match found {
        Some(place) => {
            let client = super::weather_client(config)?;
            let (report, sample) = super::weather_or_sample(&client, place.coordinate, destination).await;
            (place.display_name, report, sample)
        }
        None => (destination.to_string(), mock_weather(destination), true),
    };

    let bands = TemperatureBands::from(&config.recommendations);
    let items = recommend::recommend(&report.condition_code, report.temperature_f, trip, bands);
    Ok(TripPlan {
        place,
        report,
        sample,
        items,
    })
}
