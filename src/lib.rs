//! Weather- and location-aware reminders for the things you always forget.
//!
//! Users attach items to a [`Condition`](reminder::Condition): leaving home,
//! rain, hot, cold, or always. A running [`Session`](session::Session)
//! combines live position updates with current weather and decides which
//! items to remind about, without spamming:
//!
//! | Condition | Active when | Default threshold |
//! |-----------|-------------|-------------------|
//! | **leaving-home** | the user crosses out of the home radius | > 0.062 mi, re-armed below 0.05 mi |
//! | **rain** | the weather text mentions a rain keyword | `rain`, `drizzle` |
//! | **hot** | temperature above the hot threshold | > 77 °F |
//! | **cold** | temperature below the cold threshold | < 50 °F |
//! | **always** | every weather evaluation | none |
//!
//! Each condition fires at most once per cooldown window (30 s by default).
//!
//! # Modules
//!
//! - [`config`]: Configuration loading from TOML files and environment variables
//! - [`db`]: SQLite database initialization, schema, migrations, and health checks
//! - [`geo`]: Coordinates and haversine distance
//! - [`proximity`]: Home/away latch with hysteresis and position debouncing
//! - [`recommend`]: Trip packing suggestions from weather, temperature, and duration
//! - [`notify`]: Notification policy (active conditions, cooldown gate) and delivery
//! - [`reminder`]: Item and home-location types and their stores
//! - [`services`]: Geocoding and weather HTTP clients
//! - [`auth`]: Signed-in user, OAuth redirect, sign-up validation
//! - [`session`]: Application state and the long-running watch loop

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod geo;
pub mod notify;
pub mod proximity;
pub mod recommend;
pub mod reminder;
pub mod services;
pub mod session;
