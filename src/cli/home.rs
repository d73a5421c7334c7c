//! CLI `home` commands: save, show, and clear the home location.

use anyhow::{bail, Context, Result};

use unforgettable::geo::Coordinate;
use unforgettable::reminder::{HomeLocation, SettingsStore};
use unforgettable::services::GeocodeClient;
use unforgettable::services::geocode::shorten_address;

use super::AppContext;

/// Look up `address` and save the first match as home.
pub async fn set(ctx: &AppContext, address: &str) -> Result<()> {
    let user = ctx.user().await?;
    let geocoder = ctx.geocoder()?;

    let Some(found) = geocoder.forward(address).await? else {
        bail!("address not found: {address}");
    };

    let home = HomeLocation {
        coordinate: found.coordinate,
        display_name: found.display_name,
    };
    ctx.settings.save_home_location(&user.id, &home)?;
    println!("Home set to {} ({})", home.display_name, home.coordinate.display());
    Ok(())
}

/// Save a raw `lat,lon` as home, naming it by reverse geocoding when the
/// lookup succeeds.
pub async fn here(ctx: &AppContext, position: &str) -> Result<()> {
    let user = ctx.user().await?;
    let coordinate: Coordinate = position
        .parse()
        .with_context(|| format!("expected `lat,lon`, got {position:?}"))?;

    let display_name = match ctx.geocoder()?.reverse(coordinate).await {
        Ok(Some(name)) => shorten_address(&name, 3),
        Ok(None) => coordinate.display(),
        Err(e) => {
            tracing::warn!(error = %e, "reverse geocoding failed");
            coordinate.display()
        }
    };

    let home = HomeLocation {
        coordinate,
        display_name,
    };
    ctx.settings.save_home_location(&user.id, &home)?;
    println!("Home set to {} ({})", home.display_name, home.coordinate.display());
    Ok(())
}

pub async fn show(ctx: &AppContext) -> Result<()> {
    let user = ctx.user().await?;
    match ctx.settings.home_location(&user.id)? {
        Some(home) => println!("{} ({})", home.display_name, home.coordinate.display()),
        None => println!("No home location set. Use `unforgettable home set <address>`."),
    }
    Ok(())
}

pub async fn clear(ctx: &AppContext) -> Result<()> {
    let user = ctx.user().await?;
    ctx.settings.clear_home_location(&user.id)?;
    println!("Home location cleared.");
    Ok(())
}
