//! CLI identity commands: `login`, `sign-in`, `register`, `logout`, `whoami`.

use std::io::{BufRead, Write};

use anyhow::{Context, Result};

use unforgettable::auth::{AuthGateway, Registration};
use unforgettable::config::UnforgettableConfig;
use unforgettable::reminder::User;

pub fn login(config: &UnforgettableConfig, provider: &str) -> Result<()> {
    let url = super::auth_for(config).login_with_provider(provider)?;
    println!("Open this URL to sign in with {provider}:");
    println!("  {url}");
    println!("Then run `unforgettable sign-in --id <user id>` with the account it returns.");
    Ok(())
}

pub fn sign_in(
    config: &UnforgettableConfig,
    id: String,
    name: Option<String>,
    email: Option<String>,
) -> Result<()> {
    let user = User { id, name, email };
    super::auth_for(config).sign_in(&user)?;
    println!("Welcome, {}", user.greeting_name());
    Ok(())
}

pub fn register(config: &UnforgettableConfig, email: String, username: String) -> Result<()> {
    let stdin = std::io::stdin();
    let mut lines = stdin.lock().lines();
    let password = prompt(&mut lines, "Password: ")?;
    let confirm_password = prompt(&mut lines, "Confirm password: ")?;

    let form = Registration {
        email,
        username,
        password,
        confirm_password,
    };
    let user = super::auth_for(config).register(&form)?;
    println!("Registration successful. Welcome, {}", user.greeting_name());
    Ok(())
}

fn prompt(lines: &mut impl Iterator<Item = std::io::Result<String>>, label: &str) -> Result<String> {
    print!("{label}");
    std::io::stdout().flush()?;
    match lines.next() {
        Some(line) => line.context("failed to read from stdin"),
        None => Ok(String::new()),
    }
}

pub async fn logout(config: &UnforgettableConfig) -> Result<()> {
    super::auth_for(config).logout().await?;
    println!("Signed out.");
    Ok(())
}

pub async fn whoami(config: &UnforgettableConfig) -> Result<()> {
    match super::auth_for(config).current_user().await {
        Some(user) => {
            println!("Signed in as {} ({})", user.greeting_name(), user.id);
        }
        None => println!("Not signed in. Run `unforgettable login`."),
    }
    Ok(())
}
