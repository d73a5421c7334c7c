//! End-to-end runs of the watch loop with fake weather and a recording banner.

mod helpers;

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};

use unforgettable::config::UnforgettableConfig;
use unforgettable::geo::Coordinate;
use unforgettable::reminder::{Condition, ItemStore, NewItem, SettingsStore};
use unforgettable::services::WeatherClient;
use unforgettable::session::{self, Delivery, Session, WatchOptions};

use helpers::{FixedWeather, NoPlatform, RecordingBanner};

fn options() -> WatchOptions {
    WatchOptions {
        weather_refresh: Duration::from_millis(50),
        request_timeout: Duration::from_secs(1),
    }
}

fn hydrated_session() -> Session {
    let (items, settings) = helpers::test_stores();
    items.create("alice", NewItem::new("Keys", Condition::LeavingHome)).unwrap();
    items.create("alice", NewItem::new("Umbrella", Condition::Rain)).unwrap();
    items.create("alice", NewItem::new("Gloves", Condition::Cold)).unwrap();
    settings.save_home_location("alice", &helpers::home()).unwrap();
    Session::hydrate("alice", &items, &settings, &UnforgettableConfig::default()).unwrap()
}

async fn run(
    session: Session,
    client: Arc<dyn WeatherClient>,
    positions: Vec<Coordinate>,
    run_for: Duration,
) -> (Session, RecordingBanner) {
    let (position_tx, position_rx) = mpsc::channel(8);
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let banner = RecordingBanner::default();
    let platform = NoPlatform;

    let driver = async move {
        for p in positions {
            position_tx.send(p).await.unwrap();
        }
        tokio::time::sleep(run_for).await;
        shutdown_tx.send(true).unwrap();
    };

    let delivery = Delivery {
        platform: &platform,
        banner: &banner,
    };
    let (finished, ()) = tokio::join!(
        session::watch(session, position_rx, client, delivery, options(), shutdown_rx),
        driver
    );
    (finished, banner)
}

#[tokio::test]
async fn leaving_home_in_the_rain_reminds_once_each() {
    let client = Arc::new(FixedWeather(Some(helpers::report("rain", 60.0))));

    let (finished, banner) = run(
        hydrated_session(),
        client,
        vec![helpers::north_of_home(0.1)],
        Duration::from_millis(400),
    )
    .await;
    let events = banner.events();

    // Several weather refreshes ran, but the cooldown holds each condition
    // to a single reminder.
    let conditions: Vec<_> = events.iter().map(|e| e.condition).collect();
    assert_eq!(conditions.iter().filter(|c| **c == Condition::LeavingHome).count(), 1);
    assert_eq!(conditions.iter().filter(|c| **c == Condition::Rain).count(), 1);
    assert!(!conditions.contains(&Condition::Cold));

    let rain = events.iter().find(|e| e.condition == Condition::Rain).unwrap();
    assert_eq!(rain.body, "Remember to take: Umbrella");

    assert!(finished.proximity().away);
    assert_eq!(finished.weather().condition_code, "rain");

    let positions = banner.positions();
    assert_eq!(positions.len(), 1);
    assert!(positions[0].away);
    assert!(positions[0].last_distance_miles > 0.062);
}

#[tokio::test]
async fn weather_outage_fires_nothing() {
    let client = Arc::new(FixedWeather(None));

    let (finished, banner) = run(hydrated_session(), client, Vec::new(), Duration::from_millis(200)).await;

    assert!(banner.events().is_empty());
    assert!(banner.positions().is_empty());
    assert!(finished.last_report().is_none());
    assert!(!finished.proximity().away);
}

#[tokio::test]
async fn cold_weather_reminds_without_moving() {
    let client = Arc::new(FixedWeather(Some(helpers::report("clear", 35.0))));

    let (_, banner) = run(hydrated_session(), client, Vec::new(), Duration::from_millis(200)).await;
    let events = banner.events();

    assert_eq!(events.len(), 1);
    assert_eq!(events[0].condition, Condition::Cold);
    assert_eq!(events[0].item_names, "Gloves");
}

#[tokio::test]
async fn closed_location_feed_keeps_weather_running() {
    let client = Arc::new(FixedWeather(Some(helpers::report("drizzle", 60.0))));
    let (position_tx, position_rx) = mpsc::channel::<Coordinate>(1);
    drop(position_tx);
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let banner = RecordingBanner::default();

    let delivery = Delivery {
        platform: &NoPlatform,
        banner: &banner,
    };
    let stop = async move {
        tokio::time::sleep(Duration::from_millis(200)).await;
        shutdown_tx.send(true).unwrap();
    };
    tokio::join!(
        session::watch(hydrated_session(), position_rx, client, delivery, options(), shutdown_rx),
        stop
    );

    let events = banner.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].condition, Condition::Rain);
}
