//! Identity: who is signed in.
//!
//! Authentication itself belongs to an external identity service. This
//! module builds the OAuth redirect into it, remembers the user it handed
//! back in a local session file, and validates sign-up input. Any failure
//! to read the session degrades to "not logged in".

use std::path::PathBuf;

use async_trait::async_trait;

use crate::config::AuthConfig;
use crate::error::{ReminderError, Result};
use crate::reminder::types::User;

pub const MIN_PASSWORD_LEN: usize = 6;

#[async_trait]
pub trait AuthGateway: Send + Sync {
    async fn current_user(&self) -> Option<User>;

    async fn is_logged_in(&self) -> bool {
        self.current_user().await.is_some()
    }

    /// URL to send the browser to for an OAuth login with `provider`.
    fn login_with_provider(&self, provider: &str) -> Result<reqwest::Url>;

    async fn logout(&self) -> Result<()>;
}

/// [`AuthGateway`] that keeps the signed-in user in a JSON file.
pub struct SessionFileAuth {
    path: PathBuf,
    config: AuthConfig,
    /// Forced user id (config/env), bypasses the session file.
    user_override: Option<String>,
}

impl SessionFileAuth {
    pub fn new(path: impl Into<PathBuf>, config: AuthConfig, user_override: Option<String>) -> Self {
        Self {
            path: path.into(),
            config,
            user_override,
        }
    }

    /// Record the user the identity provider returned.
    pub fn sign_in(&self, user: &User) -> Result<()> {
        if user.id.trim().is_empty() {
            return Err(ReminderError::validation("user id must not be empty"));
        }
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| ReminderError::Config(format!("cannot create {}: {e}", parent.display())))?;
        }
        let json = serde_json::to_string_pretty(user)
            .map_err(|e| ReminderError::Config(format!("cannot encode session: {e}")))?;
        std::fs::write(&self.path, json)
            .map_err(|e| ReminderError::Config(format!("cannot write {}: {e}", self.path.display())))?;
        tracing::info!(user_id = %user.id, "signed in");
        Ok(())
    }

    /// Validate a sign-up form and sign the new user in under their
    /// username. The password is only checked, never stored.
    pub fn register(&self, form: &Registration) -> Result<User> {
        validate_registration(form)?;
        let username = form.username.trim();
        let user = User {
            id: username.to_string(),
            name: Some(username.to_string()),
            email: Some(form.email.trim().to_string()),
        };
        self.sign_in(&user)?;
        Ok(user)
    }

    /// The current user, or [`ReminderError::Auth`] if nobody is signed in.
    pub async fn require_user(&self) -> Result<User> {
        self.current_user()
            .await
            .ok_or_else(|| ReminderError::Auth("sign in first (`unforgettable sign-in`)".into()))
    }
}

#[async_trait]
impl AuthGateway for SessionFileAuth {
    async fn current_user(&self) -> Option<User> {
        if let Some(id) = &self.user_override {
            return Some(User {
                id: id.clone(),
                name: None,
                email: None,
            });
        }

        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "cannot read session");
                return None;
            }
        };
        match serde_json::from_str(&contents) {
            Ok(user) => Some(user),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "corrupt session file");
                None
            }
        }
    }

    fn login_with_provider(&self, provider: &str) -> Result<reqwest::Url> {
        let provider = provider.trim().to_lowercase();
        if provider.is_empty() || !provider.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(ReminderError::validation(format!("unsupported provider `{provider}`")));
        }
        let app = self.config.app_url.trim_end_matches('/');
        let success = format!("{app}/index.html");
        let failure = format!("{app}/login.html");
        let raw = format!(
            "{}/account/sessions/oauth2/{provider}",
            self.config.endpoint.trim_end_matches('/')
        );
        reqwest::Url::parse_with_params(
            &raw,
            &[
                ("project", self.config.project_id.as_str()),
                ("success", success.as_str()),
                ("failure", failure.as_str()),
            ],
        )
        .map_err(|e| ReminderError::Config(format!("invalid auth endpoint: {e}")))
    }

    async fn logout(&self) -> Result<()> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => {
                tracing::info!("signed out");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(ReminderError::Config(format!(
                "cannot remove {}: {e}",
                self.path.display()
            ))),
        }
    }
}

/// Sign-up form input.
#[derive(Debug, Clone)]
pub struct Registration {
    pub email: String,
    pub username: String,
    pub password: String,
    pub confirm_password: String,
}

/// Check a sign-up form before it is sent anywhere.
pub fn validate_registration(form: &Registration) -> Result<()> {
    let fields = [
        form.email.trim(),
        form.username.trim(),
        form.password.trim(),
        form.confirm_password.trim(),
    ];
    if fields.iter().any(|f| f.is_empty()) {
        return Err(ReminderError::validation("please fill in all fields"));
    }
    if !form
        .username
        .trim()
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_')
    {
        return Err(ReminderError::validation(
            "username can only contain letters, numbers, and underscores",
        ));
    }
    if !form.email.contains('@') {
        return Err(ReminderError::validation("email address looks malformed"));
    }
    if form.password.trim() != form.confirm_password.trim() {
        return Err(ReminderError::validation("passwords do not match"));
    }
    if form.password.trim().chars().count() < MIN_PASSWORD_LEN {
        return Err(ReminderError::validation(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}
