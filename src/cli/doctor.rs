//! CLI `doctor` command: database diagnostics plus a config sanity check.

use anyhow::{Context, Result};

use unforgettable::config::UnforgettableConfig;
use unforgettable::db;

pub fn doctor(config: &UnforgettableConfig) -> Result<()> {
    let db_path = config.resolved_db_path();

    println!("Unforgettable Health Report");
    println!("===========================");
    println!();

    if !db_path.exists() {
        println!("Database:          not found at {}", db_path.display());
        println!("It is created on first use, e.g. `unforgettable items list`.");
    } else {
        let file_size = std::fs::metadata(&db_path).map(|m| m.len()).unwrap_or(0);
        let conn = db::open_database(&db_path).context("failed to open database (may be corrupt)")?;
        let report = db::check_database_health(&conn).context("failed to run health check")?;

        println!("Database:          {}", db_path.display());
        println!("File size:         {}", format_bytes(file_size));
        println!("Schema version:    {}", report.schema_version);
        println!();
        println!("Row counts:");
        println!("  Items:           {}", report.item_count);
        println!("  Home locations:  {}", report.home_count);
        println!("  Users:           {}", report.user_count);
        println!();
        if report.integrity_ok {
            println!("Integrity check:   PASSED");
        } else {
            println!("Integrity check:   FAILED ({})", report.integrity_details);
            println!();
            println!("Recovery: restore {} from a backup, or delete it to start over.", db_path.display());
        }
    }

    println!();
    println!("Services:");
    println!("  Geocoding:       {}", config.services.geocode_base_url);
    println!("  Weather:         {}", config.services.weather_base_url);
    if config.services.weather_api_key.is_empty() {
        println!("  WARNING: no weather API key; set UNFORGETTABLE_WEATHER_API_KEY.");
    }
    match &config.notifications.desktop_command {
        Some(cmd) => println!("  Notifications:   {cmd}"),
        None => println!("  Notifications:   terminal banner only"),
    }

    Ok(())
}

fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{bytes} B")
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}
