use anyhow::{bail, Context, Result};

use unforgettable::geo::Coordinate;
use unforgettable::notify::NotificationPolicy;
use unforgettable::recommend::{self, TemperatureBands};
use unforgettable::reminder::{ItemStore, SettingsStore};

use super::{format_temperature, format_wind, AppContext};

/// Current weather at `position` (or home), plus the saved items it would
/// remind about right now.
pub async fn weather(ctx: &AppContext, position: Option<&str>) -> Result<()> {
    let user = ctx.user().await?;

    let target: Coordinate = match position {
        Some(raw) => raw
            .parse()
            .with_context(|| format!("expected `lat,lon`, got {raw:?}"))?,
        None => match ctx.settings.home_location(&user.id)? {
            Some(home) => home.coordinate,
            None => bail!("no position given and no home location set"),
        },
    };

    let client = ctx.weather_client()?;
    let (report, sample) = super::weather_or_sample(&client, target, &target.display()).await;
    let units = ctx.config.general.units;

    if sample {
        println!("(weather service unavailable, showing a sample reading)");
    }
    println!("Weather at {}", target.display());
    println!(
        "  {}  {}  humidity {:.0}%  wind {}",
        report.description,
        format_temperature(report.temperature_f, units),
        report.humidity,
        format_wind(report.wind_speed, units),
    );

    let hints = recommend::weather_hints(
        &report.condition_code,
        report.temperature_f,
        TemperatureBands::from(&ctx.config.recommendations),
    );
    if !hints.is_empty() {
        println!();
        println!("Suggested:");
        for hint in hints {
            println!("  {} {}", hint.icon, hint.name);
        }
    }

    let policy = NotificationPolicy::new(&ctx.config.notifications);
    let active = policy.active_conditions(&report.condition_code, report.temperature_f, None);
    let items = ctx.items.list(&user.id)?;

    println!();
    println!("Your reminders now:");
    let mut any = false;
    for item in items.iter().filter(|i| active.contains(&i.condition)) {
        println!("  {:<24} {}", item.name, item.condition.label());
        any = true;
    }
    if !any {
        println!("  (none)");
    }
    Ok(())
}
