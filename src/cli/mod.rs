//! Terminal front end: argument types and one module per command group.

pub mod categories;
pub mod renewals;
pub mod settings;
pub mod setup;
pub mod subscriptions;
pub mod summary;
pub mod ui;

use crate::core::billing::BillingCycle;
use chrono::NaiveDate;
use clap::{Args, Subcommand};
use std::str::FromStr;

/// Subscription fields accepted by `add` and `edit`.
#[derive(Debug, Clone, Default, Args)]
pub struct SubscriptionArgs {
    /// Display name
    #[arg(long)]
    pub name: Option<String>,
    /// Cost per billing cycle
    #[arg(long)]
    pub cost: Option<String>,
    /// Currency the cost is charged in (defaults to the display currency)
    #[arg(long)]
    pub currency: Option<String>,
    /// monthly, quarterly, yearly or custom
    #[arg(long, value_parser = BillingCycle::from_str)]
    pub cycle: Option<BillingCycle>,
    /// Days between charges for a custom cycle
    #[arg(long)]
    pub days: Option<String>,
    /// Category id or name
    #[arg(long)]
    pub category: Option<String>,
    /// First billing date (YYYY-MM-DD)
    #[arg(long)]
    pub start: Option<NaiveDate>,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long)]
    pub url: Option<String>,
    #[arg(long)]
    pub notes: Option<String>,
    /// Remind this many days before renewal
    #[arg(long)]
    pub reminder_days: Option<String>,
    /// Enable or disable the renewal reminder
    #[arg(long)]
    pub reminder: Option<bool>,
    /// Whether the subscription renews automatically
    #[arg(long)]
    pub auto_renew: Option<bool>,
}

#[derive(Debug, Clone, Subcommand)]
pub enum CategoryCommand {
    /// List categories with their subscription counts
    List,
    /// Add a category
    Add {
        name: String,
        /// Display color, e.g. "#43a047"
        #[arg(long, default_value = "#546e7a")]
        color: String,
    },
    /// Rename or recolor a category
    Edit {
        /// Category id or name
        category: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        color: Option<String>,
    },
    /// Delete a category; its subscriptions show as "Other"
    Delete {
        /// Category id or name
        category: String,
    },
}

#[derive(Debug, Clone, Subcommand)]
pub enum SettingsCommand {
    /// Show current settings
    Show,
    /// Set the theme preference (dark, light or system)
    Theme { theme: crate::core::settings::Theme },
    /// Set the currency totals are displayed in
    Currency { code: String },
}
