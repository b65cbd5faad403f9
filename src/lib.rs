pub mod app;
pub mod cli;
pub mod core;
pub mod store;

use crate::app::AppState;
use crate::core::config::AppConfig;
use crate::core::currency::ConfiguredRates;
use crate::store::{DiskStore, KeyValueStore, MemoryStore, Repository};
use anyhow::Result;
use chrono::Utc;
use clap::Subcommand;
use std::sync::Arc;
use tracing::debug;

pub use cli::{CategoryCommand, SettingsCommand, SubscriptionArgs};

#[derive(Debug, Clone, Subcommand)]
pub enum AppCommand {
    /// List subscriptions
    List {
        /// Only show subscriptions in this category (id or name)
        #[arg(long)]
        category: Option<String>,
    },
    /// Add a subscription
    Add(SubscriptionArgs),
    /// Show one subscription in detail
    Show {
        /// Subscription id or unique id prefix
        id: String,
    },
    /// Edit a subscription; omitted fields keep their value
    Edit {
        /// Subscription id or unique id prefix
        id: String,
        #[command(flatten)]
        changes: SubscriptionArgs,
    },
    /// Pause or resume a subscription
    Toggle {
        /// Subscription id or unique id prefix
        id: String,
    },
    /// Delete a subscription
    Delete {
        /// Subscription id or unique id prefix
        id: String,
    },
    /// Show renewals due within the next few days
    Upcoming {
        /// Lookahead window in days (defaults to the configured window)
        #[arg(short, long)]
        days: Option<u32>,
    },
    /// Show renewals grouped by timeframe and which reminders are due
    Reminders,
    /// Display spending summary
    Summary,
    /// Manage categories
    #[command(subcommand)]
    Categories(CategoryCommand),
    /// Show or change settings
    #[command(subcommand)]
    Settings(SettingsCommand),
}

/// Options shared by every command.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub config_path: Option<String>,
    /// Keep all data in memory for this run only.
    pub ephemeral: bool,
}

fn open_store(config: &AppConfig, ephemeral: bool) -> Result<Arc<dyn KeyValueStore>> {
    if ephemeral {
        debug!("Using in-memory store");
        return Ok(Arc::new(MemoryStore::new()));
    }
    let path = config.data_path()?;
    Ok(Arc::new(DiskStore::open(&path)?))
}

/// Runs a command and prints its output.
pub async fn run_command(command: AppCommand, options: &RunOptions) -> Result<()> {
    let output = execute_command(command, options).await?;
    println!("{output}");
    Ok(())
}

/// Runs a command and returns what it would print.
pub async fn execute_command(command: AppCommand, options: &RunOptions) -> Result<String> {
    let config = match &options.config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let store = open_store(&config, options.ephemeral)?;
    let rates = Arc::new(ConfiguredRates::new(&config.rates));
    let mut state = AppState::load(Repository::new(store), rates, &config.currency).await?;
    let now = Utc::now();

    let output = match command {
        AppCommand::List { category } => cli::subscriptions::list(&state, category.as_deref(), now)?,
        AppCommand::Add(args) => cli::subscriptions::add(&mut state, args, now).await?,
        AppCommand::Show { id } => cli::subscriptions::show(&state, &id, now)?,
        AppCommand::Edit { id, changes } => {
            cli::subscriptions::edit(&mut state, &id, changes, now).await?
        }
        AppCommand::Toggle { id } => cli::subscriptions::toggle(&mut state, &id).await?,
        AppCommand::Delete { id } => cli::subscriptions::delete(&mut state, &id).await?,
        AppCommand::Upcoming { days } => {
            cli::renewals::upcoming(&state, days.unwrap_or(config.renewal_window_days), now)
        }
        AppCommand::Reminders => cli::renewals::reminders(&state, now),
        AppCommand::Summary => cli::summary::summary(&state),
        AppCommand::Categories(cmd) => cli::categories::run(&mut state, cmd).await?,
        AppCommand::Settings(cmd) => cli::settings::run(&mut state, cmd).await?,
    };

    Ok(output)
}
