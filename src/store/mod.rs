//! Local persistence: whole-collection JSON values behind a key-value store.

pub mod disk;
pub mod memory;
pub mod migrate;

use crate::core::settings::Settings;
use crate::core::subscription::{Category, Subscription, default_categories};
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};
use std::sync::Arc;
use tracing::debug;

pub use disk::DiskStore;
pub use memory::MemoryStore;

pub const SUBSCRIPTIONS_KEY: &str = "subscriptions";
pub const CATEGORIES_KEY: &str = "categories";
pub const SETTINGS_KEY: &str = "settings";
pub const SCHEMA_VERSION_KEY: &str = "schema_version";

/// A string key-value store. Each `put` replaces the stored value atomically.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;
    async fn put(&self, key: &str, value: String) -> Result<()>;
    async fn remove(&self, key: &str) -> Result<()>;
}

/// Typed load/save of the three persisted collections.
#[derive(Clone)]
pub struct Repository {
    store: Arc<dyn KeyValueStore>,
}

impl Repository {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &dyn KeyValueStore {
        self.store.as_ref()
    }

    async fn load<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.store.get(key).await? {
            Some(json) => {
                let value = serde_json::from_str(&json)
                    .with_context(|| format!("Failed to parse stored {key}"))?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    async fn save<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let json = serde_json::to_string(value).with_context(|| format!("Failed to serialize {key}"))?;
        self.store
            .put(key, json)
            .await
            .with_context(|| format!("Failed to save {key}"))
    }

    /// All subscriptions, or an empty list when nothing has been stored yet.
    pub async fn load_subscriptions(&self) -> Result<Vec<Subscription>> {
        let subscriptions = self.load(SUBSCRIPTIONS_KEY).await?.unwrap_or_default();
        debug!("Loaded subscriptions");
        Ok(subscriptions)
    }

    pub async fn save_subscriptions(&self, subscriptions: &[Subscription]) -> Result<()> {
        self.save(SUBSCRIPTIONS_KEY, subscriptions).await
    }

    /// Stored categories, or the default set when none have been saved.
    pub async fn load_categories(&self) -> Result<Vec<Category>> {
        Ok(self
            .load(CATEGORIES_KEY)
            .await?
            .unwrap_or_else(default_categories))
    }

    pub async fn save_categories(&self, categories: &[Category]) -> Result<()> {
        self.save(CATEGORIES_KEY, categories).await
    }

    /// Stored settings, or `None` when the user has never changed them.
    pub async fn load_settings(&self) -> Result<Option<Settings>> {
        self.load(SETTINGS_KEY).await
    }

    pub async fn save_settings(&self, settings: &Settings) -> Result<()> {
        self.save(SETTINGS_KEY, settings).await
    }
}
