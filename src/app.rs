//! Application state: the loaded collections plus the operations that mutate
//! and persist them.

use crate::core::currency::RateTable;
use crate::core::settings::{Settings, Theme};
use crate::core::subscription::{Category, Subscription, SubscriptionDraft};
use crate::store::Repository;
use crate::store::migrate::migrate;
use anyhow::{Context, Result, anyhow, bail};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

pub struct AppState {
    repo: Repository,
    rates: Arc<dyn RateTable>,
    subscriptions: Vec<Subscription>,
    categories: Vec<Category>,
    settings: Settings,
}

impl AppState {
    /// Migrates stored data, then loads every collection.
    ///
    /// `default_currency` seeds the display currency when the user has never
    /// saved settings.
    pub async fn load(
        repo: Repository,
        rates: Arc<dyn RateTable>,
        default_currency: &str,
    ) -> Result<Self> {
        let report = migrate(repo.store()).await.context("Failed to migrate stored data")?;
        debug!("Migration report: {report:?}");

        let subscriptions = repo.load_subscriptions().await?;
        let categories = repo.load_categories().await?;
        let settings = repo.load_settings().await?.unwrap_or_else(|| Settings {
            currency: default_currency.to_uppercase(),
            ..Settings::default()
        });
        info!(
            "Loaded {} subscriptions and {} categories",
            subscriptions.len(),
            categories.len()
        );

        Ok(Self {
            repo,
            rates,
            subscriptions,
            categories,
            settings,
        })
    }

    pub fn subscriptions(&self) -> &[Subscription] {
        &self.subscriptions
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn rates(&self) -> &dyn RateTable {
        self.rates.as_ref()
    }

    pub fn display_currency(&self) -> &str {
        &self.settings.currency
    }

    pub fn subscription(&self, id: &str) -> Option<&Subscription> {
        self.subscriptions.iter().find(|s| s.id == id)
    }

    /// Resolves a full id or a unique id prefix.
    pub fn resolve_subscription_id(&self, id_or_prefix: &str) -> Result<String> {
        if let Some(sub) = self.subscription(id_or_prefix) {
            return Ok(sub.id.clone());
        }
        let matches: Vec<&Subscription> = self
            .subscriptions
            .iter()
            .filter(|s| s.id.starts_with(id_or_prefix))
            .collect();
        match matches.as_slice() {
            [only] => Ok(only.id.clone()),
            [] => Err(anyhow!("No subscription with id {id_or_prefix}")),
            _ => Err(anyhow!(
                "Id prefix {id_or_prefix} matches {} subscriptions",
                matches.len()
            )),
        }
    }

    /// Finds a category by id or by case-insensitive name.
    pub fn resolve_category(&self, key: &str) -> Option<&Category> {
        self.categories
            .iter()
            .find(|c| c.id == key)
            .or_else(|| self.categories.iter().find(|c| c.name.eq_ignore_ascii_case(key)))
    }

    async fn persist_subscriptions(&self) {
        if let Err(e) = self.repo.save_subscriptions(&self.subscriptions).await {
            error!("Error saving subscriptions: {e:#}");
        }
    }

    async fn persist_categories(&self) {
        if let Err(e) = self.repo.save_categories(&self.categories).await {
            error!("Error saving categories: {e:#}");
        }
    }

    async fn persist_settings(&self) {
        if let Err(e) = self.repo.save_settings(&self.settings).await {
            error!("Error saving settings: {e:#}");
        }
    }

    fn warn_if_unknown_currency(&self, code: &str) {
        if self.rates.usd_rate(code).is_none() {
            warn!("Currency {code} has no exchange rate; amounts will not be converted");
        }
    }

    pub async fn add_subscription(
        &mut self,
        draft: SubscriptionDraft,
        now: DateTime<Utc>,
    ) -> Result<Subscription> {
        let subscription = Subscription::create(draft, now)?;
        self.warn_if_unknown_currency(&subscription.original_currency);
        info!("Adding subscription {} ({})", subscription.name, subscription.id);
        self.subscriptions.push(subscription.clone());
        self.persist_subscriptions().await;
        Ok(subscription)
    }

    /// Replaces a subscription wholesale and recomputes its next billing date.
    /// Returns `Ok(None)` when no subscription has this id.
    pub async fn update_subscription(
        &mut self,
        id: &str,
        draft: SubscriptionDraft,
        now: DateTime<Utc>,
    ) -> Result<Option<Subscription>> {
        let Some(index) = self.subscriptions.iter().position(|s| s.id == id) else {
            return Ok(None);
        };
        let updated = Subscription::from_draft(id.to_string(), draft, now)?;
        self.warn_if_unknown_currency(&updated.original_currency);
        info!("Updating subscription {} ({})", updated.name, updated.id);
        self.subscriptions[index] = updated.clone();
        self.persist_subscriptions().await;
        Ok(Some(updated))
    }

    /// Sets the active flag. Returns the new value, or `None` for an unknown id.
    pub async fn set_active(&mut self, id: &str, active: bool) -> Option<bool> {
        let sub = self.subscriptions.iter_mut().find(|s| s.id == id)?;
        sub.active = active;
        info!("Subscription {} is now {}", sub.name, if active { "active" } else { "paused" });
        self.persist_subscriptions().await;
        Some(active)
    }

    pub async fn delete_subscription(&mut self, id: &str) -> bool {
        let before = self.subscriptions.len();
        self.subscriptions.retain(|s| s.id != id);
        let removed = self.subscriptions.len() != before;
        if removed {
            info!("Deleted subscription {id}");
            self.persist_subscriptions().await;
        }
        removed
    }

    pub async fn add_category(&mut self, name: &str, color: &str) -> Result<Category> {
        if name.trim().is_empty() {
            bail!("Category name is required");
        }
        if self.resolve_category(name.trim()).is_some() {
            bail!("Category {} already exists", name.trim());
        }
        let category = Category::new(name, color);
        info!("Adding category {} ({})", category.name, category.id);
        self.categories.push(category.clone());
        self.persist_categories().await;
        Ok(category)
    }

    pub async fn update_category(&mut self, category: Category) -> bool {
        let Some(existing) = self.categories.iter_mut().find(|c| c.id == category.id) else {
            return false;
        };
        *existing = category;
        self.persist_categories().await;
        true
    }

    /// Removes a category. Subscriptions keep their reference and display as
    /// "Other" from then on.
    pub async fn delete_category(&mut self, id: &str) -> bool {
        let before = self.categories.len();
        self.categories.retain(|c| c.id != id);
        let removed = self.categories.len() != before;
        if removed {
            let orphaned = self.subscriptions.iter().filter(|s| s.category == id).count();
            info!("Deleted category {id}, {orphaned} subscriptions now uncategorised");
            self.persist_categories().await;
        }
        removed
    }

    pub async fn set_theme(&mut self, theme: Theme) {
        self.settings.theme = theme;
        self.persist_settings().await;
    }

    pub async fn set_currency(&mut self, currency: &str) -> Result<()> {
        let code = currency.trim().to_uppercase();
        if code.is_empty() {
            bail!("Currency code is required");
        }
        self.warn_if_unknown_currency(&code);
        self.settings.currency = code;
        self.persist_settings().await;
        Ok(())
    }
}
