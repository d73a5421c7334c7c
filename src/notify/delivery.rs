//! Getting a [`NotificationEvent`] in front of the user.
//!
//! The platform channel needs permission; the in-app banner is always there.
//! Permission only picks the channel: the policy has already decided and
//! recorded the firing by the time [`deliver`] runs.

use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;

use super::NotificationEvent;
use crate::error::{ReminderError, Result};
use crate::proximity::ProximityState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    Granted,
    Denied,
    Unavailable,
}

/// Which channel ended up showing the event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Platform,
    Banner,
}

/// System-level notifications (desktop popups and the like).
#[async_trait]
pub trait PlatformNotifier: Send + Sync {
    fn permission(&self) -> Permission;

    async fn show(&self, title: &str, body: &str) -> Result<()>;
}

/// The always-available in-app channel.
pub trait Banner: Send + Sync {
    fn show(&self, event: &NotificationEvent);

    /// Home/away status after each applied position update.
    fn proximity(&self, _state: &ProximityState) {}
}

/// Show `event` on the platform channel when permitted, otherwise (or when
/// the platform call fails) on the banner.
pub async fn deliver(
    event: &NotificationEvent,
    platform: &dyn PlatformNotifier,
    banner: &dyn Banner,
) -> Channel {
    match platform.permission() {
        Permission::Granted => match platform.show(&event.title, &event.body).await {
            Ok(()) => return Channel::Platform,
            Err(e) => {
                tracing::warn!(error = %e, "platform notification failed, using banner");
            }
        },
        permission => {
            tracing::debug!(?permission, "platform notifications not permitted, using banner");
        }
    }
    banner.show(event);
    Channel::Banner
}

/// Runs a desktop notification program as `<command> <title> <body>`
/// (e.g. `notify-send`). Without a command the channel is unavailable; if
/// the program cannot be started the channel flips to denied for the rest
/// of the session.
pub struct CommandNotifier {
    command: Option<String>,
    denied: AtomicBool,
}

impl CommandNotifier {
    pub fn new(command: Option<String>) -> Self {
        Self {
            command: command.filter(|c| !c.trim().is_empty()),
            denied: AtomicBool::new(false),
        }
    }
}

#[async_trait]
impl PlatformNotifier for CommandNotifier {
    fn permission(&self) -> Permission {
        match &self.command {
            None => Permission::Unavailable,
            Some(_) if self.denied.load(Ordering::Relaxed) => Permission::Denied,
            Some(_) => Permission::Granted,
        }
    }

    async fn show(&self, title: &str, body: &str) -> Result<()> {
        let command = self
            .command
            .as_deref()
            .ok_or_else(|| ReminderError::Permission("no desktop notification command".into()))?;

        let status = match tokio::process::Command::new(command)
            .arg(title)
            .arg(body)
            .status()
            .await
        {
            Ok(status) => status,
            Err(e) => {
                self.denied.store(true, Ordering::Relaxed);
                return Err(ReminderError::Permission(format!("cannot run `{command}`: {e}")));
            }
        };

        if !status.success() {
            return Err(ReminderError::Permission(format!("`{command}` exited with {status}")));
        }
        Ok(())
    }
}

/// Banner printed to stdout.
pub struct TerminalBanner;

impl Banner for TerminalBanner {
    fn show(&self, event: &NotificationEvent) {
        let mut out = std::io::stdout().lock();
        // A closed stdout only loses the banner.
        let _ = writeln!(out, "[{}] Reminder: {}", event.title, event.condition.label());
        let _ = writeln!(out, "  Don't forget: {}", event.item_names);
    }
}
