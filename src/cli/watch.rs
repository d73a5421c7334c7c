//! CLI `watch` command: run a reminder session in the foreground.
//!
//! Positions arrive as `lat,lon` lines on stdin. Closing stdin ends the
//! location feed but weather reminders keep running until Ctrl-C.

use std::sync::Arc;

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::{mpsc, watch as watch_channel};

use unforgettable::config::Units;
use unforgettable::geo::Coordinate;
use unforgettable::notify::delivery::{Banner, CommandNotifier, TerminalBanner};
use unforgettable::notify::NotificationEvent;
use unforgettable::proximity::ProximityState;
use unforgettable::services::WeatherClient;
use unforgettable::session::{self, Delivery, Session, WatchOptions};

use super::{format_distance, AppContext};

/// Terminal banner that also prints the distance from home after each
/// applied position.
struct ConsoleBanner {
    units: Units,
}

impl Banner for ConsoleBanner {
    fn show(&self, event: &NotificationEvent) {
        TerminalBanner.show(event);
    }

    fn proximity(&self, state: &ProximityState) {
        println!("{}", proximity_line(state, self.units));
    }
}

fn proximity_line(state: &ProximityState, units: Units) -> String {
    match (&state.home, &state.current) {
        (Some(home), Some(current)) => format!(
            "Distance from home: {} ({})",
            format_distance(&home.coordinate, current, units),
            if state.away { "away" } else { "home" }
        ),
        _ => "No home location set".to_string(),
    }
}

pub async fn watch(ctx: &AppContext) -> Result<()> {
    let user = ctx.user().await?;
    let session = Session::hydrate(&user.id, &ctx.items, &ctx.settings, &ctx.config)?;
    let weather: Arc<dyn WeatherClient> = Arc::new(ctx.weather_client()?);

    println!(
        "Watching reminders for {} ({} items). Enter positions as `lat,lon`; Ctrl-C to stop.",
        user.greeting_name(),
        session.items().len()
    );

    let (position_tx, position_rx) = mpsc::channel::<Coordinate>(16);
    let reader = tokio::spawn(read_positions(position_tx));

    let (shutdown_tx, shutdown_rx) = watch_channel::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = shutdown_tx.send(true);
        }
    });

    let platform = CommandNotifier::new(ctx.config.notifications.desktop_command.clone());
    let banner = ConsoleBanner {
        units: ctx.config.general.units,
    };
    let delivery = Delivery {
        platform: &platform,
        banner: &banner,
    };

    let finished = session::watch(
        session,
        position_rx,
        weather,
        delivery,
        WatchOptions::from(&ctx.config),
        shutdown_rx,
    )
    .await;

    reader.abort();

    let state = finished.proximity();
    println!(
        "Stopped. Last known: {}",
        if state.away { "away from home" } else { "at home" }
    );
    if let Some(report) = finished.last_report() {
        println!(
            "Last weather: {}, {}",
            report.description,
            super::format_temperature(report.temperature_f, ctx.config.general.units)
        );
    }
    Ok(())
}

async fn read_positions(tx: mpsc::Sender<Coordinate>) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                tracing::warn!(error = %e, "stdin read failed, closing location feed");
                break;
            }
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match line.parse::<Coordinate>() {
            Ok(position) => {
                if tx.send(position).await.is_err() {
                    break;
                }
            }
            Err(e) => tracing::warn!(input = line, error = %e, "ignoring bad position"),
        }
    }
}
