mod cli;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use unforgettable::config::UnforgettableConfig;
use unforgettable::reminder::Condition;

#[derive(Parser)]
#[command(name = "unforgettable", version, about = "Weather- and location-aware reminders")]
struct Cli {
    /// Path to a config file (default: ~/.unforgettable/config.toml)
    #[arg(long, global = true)]
    config: Option<std::path::PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the identity provider login URL
    Login {
        /// OAuth provider, e.g. google
        #[arg(default_value = "google")]
        provider: String,
    },
    /// Record the user returned by the identity provider
    SignIn {
        #[arg(long)]
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
    },
    /// Create a local account and sign in (passwords are read from stdin)
    Register {
        #[arg(long)]
        email: String,
        #[arg(long)]
        username: String,
    },
    /// Forget the signed-in user
    Logout,
    /// Show the signed-in user
    Whoami,
    /// Manage reminder items
    Items {
        #[command(subcommand)]
        action: ItemsAction,
    },
    /// Manage the home location
    Home {
        #[command(subcommand)]
        action: HomeAction,
    },
    /// Packing suggestions for a trip
    Plan {
        destination: String,
        /// day, weekend, week, or long
        #[arg(long, default_value = "day")]
        duration: String,
    },
    /// Current weather at a position and which reminders it triggers
    Weather {
        /// `lat,lon`; defaults to the home location
        position: Option<String>,
    },
    /// Run a reminder session, reading `lat,lon` lines from stdin
    Watch {
        /// Weather refresh interval in seconds
        #[arg(long)]
        interval: Option<u64>,
    },
    /// Check database health
    Doctor,
}

#[derive(Subcommand)]
enum ItemsAction {
    /// Add an item
    Add {
        name: String,
        /// leaving-home, rain, hot, cold, or always
        #[arg(long, short)]
        condition: Condition,
    },
    /// List items
    List,
    /// Remove an item by id
    Remove { id: String },
}

#[derive(Subcommand)]
enum HomeAction {
    /// Look up an address and save it as home
    Set { address: String },
    /// Save a coordinate (`lat,lon`) as home
    Here { position: String },
    /// Show the saved home
    Show,
    /// Remove the saved home
    Clear,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => UnforgettableConfig::load_from(path)?,
        None => UnforgettableConfig::load()?,
    };

    // Log to stderr so stdout stays clean for command output.
    let filter = EnvFilter::try_new(&config.general.log_level)
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Login { provider } => cli::account::login(&config, &provider)?,
        Command::SignIn { id, name, email } => cli::account::sign_in(&config, id, name, email)?,
        Command::Register { email, username } => cli::account::register(&config, email, username)?,
        Command::Logout => cli::account::logout(&config).await?,
        Command::Whoami => cli::account::whoami(&config).await?,
        Command::Items { action } => {
            let ctx = cli::AppContext::open(config)?;
            match action {
                ItemsAction::Add { name, condition } => cli::items::add(&ctx, &name, condition).await?,
                ItemsAction::List => cli::items::list(&ctx).await?,
                ItemsAction::Remove { id } => cli::items::remove(&ctx, &id).await?,
            }
        }
        Command::Home { action } => {
            let ctx = cli::AppContext::open(config)?;
            match action {
                HomeAction::Set { address } => cli::home::set(&ctx, &address).await?,
                HomeAction::Here { position } => cli::home::here(&ctx, &position).await?,
                HomeAction::Show => cli::home::show(&ctx).await?,
                HomeAction::Clear => cli::home::clear(&ctx).await?,
            }
        }
        Command::Plan {
            destination,
            duration,
        } => cli::plan::plan(&config, &destination, &duration).await?,
        Command::Weather { position } => {
            let ctx = cli::AppContext::open(config)?;
            cli::weather::weather(&ctx, position.as_deref()).await?;
        }
        Command::Watch { interval } => {
            let mut config = config;
            if let Some(secs) = interval {
                config.services.weather_refresh_secs = secs;
            }
            let ctx = cli::AppContext::open(config)?;
            cli::watch::watch(&ctx).await?;
        }
        Command::Doctor => cli::doctor::doctor(&config)?,
    }

    Ok(())
}
