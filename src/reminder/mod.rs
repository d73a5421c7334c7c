pub mod items;
pub mod settings;
pub mod types;

pub use items::{ItemStore, SqliteItemStore};
pub use settings::{SettingsStore, SqliteSettingsStore};
pub use types::{Condition, HomeLocation, NewItem, ReminderItem, User};
