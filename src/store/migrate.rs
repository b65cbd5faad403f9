//! Versioned upgrades of stored data.
//!
//! Data written before versioning is version 0. Each step upgrades from one
//! version to the next and the reached version is recorded afterwards.

use crate::core::subscription::DEFAULT_CURRENCY;
use crate::store::{KeyValueStore, SCHEMA_VERSION_KEY, SUBSCRIPTIONS_KEY};
use anyhow::{Context, Result, bail};
use serde_json::Value;
use tracing::{debug, info};

pub const CURRENT_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationReport {
    pub from_version: u32,
    pub to_version: u32,
    pub records_patched: usize,
}

impl MigrationReport {
    pub fn is_noop(&self) -> bool {
        self.from_version == self.to_version && self.records_patched == 0
    }
}

async fn stored_version(store: &dyn KeyValueStore) -> Result<u32> {
    match store.get(SCHEMA_VERSION_KEY).await? {
        Some(v) => v
            .trim()
            .parse()
            .with_context(|| format!("Invalid schema version: {v}")),
        None => Ok(0),
    }
}

/// Sets `originalCurrency` to USD on records where it is missing, null or empty.
/// Returns how many records were changed.
pub fn backfill_original_currency(records: &mut [Value]) -> usize {
    let mut patched = 0;
    for record in records.iter_mut() {
        let Some(obj) = record.as_object_mut() else {
            continue;
        };
        let present = obj
            .get("originalCurrency")
            .and_then(Value::as_str)
            .is_some_and(|c| !c.is_empty());
        if !present {
            obj.insert(
                "originalCurrency".to_string(),
                Value::String(DEFAULT_CURRENCY.to_string()),
            );
            patched += 1;
        }
    }
    patched
}

/// v0 -> v1: every subscription carries its original currency.
async fn upgrade_to_v1(store: &dyn KeyValueStore) -> Result<usize> {
    let Some(json) = store.get(SUBSCRIPTIONS_KEY).await? else {
        return Ok(0);
    };
    let mut records: Vec<Value> =
        serde_json::from_str(&json).context("Failed to parse stored subscriptions")?;

    let patched = backfill_original_currency(&mut records);
    if patched > 0 {
        store
            .put(SUBSCRIPTIONS_KEY, serde_json::to_string(&records)?)
            .await
            .context("Failed to save migrated subscriptions")?;
        info!("Backfilled original currency on {patched} subscriptions");
    }
    Ok(patched)
}

/// Brings stored data up to `CURRENT_SCHEMA_VERSION`. Safe to run on every start.
pub async fn migrate(store: &dyn KeyValueStore) -> Result<MigrationReport> {
    let from_version = stored_version(store).await?;
    if from_version > CURRENT_SCHEMA_VERSION {
        bail!(
            "Stored data uses schema version {from_version}, newer than supported version {CURRENT_SCHEMA_VERSION}"
        );
    }

    let mut records_patched = 0;
    for version in from_version..CURRENT_SCHEMA_VERSION {
        debug!("Migrating schema v{} -> v{}", version, version + 1);
        records_patched += match version {
            0 => upgrade_to_v1(store).await?,
            _ => bail!("No migration defined from schema v{version}"),
        };
    }

    if from_version != CURRENT_SCHEMA_VERSION {
        store
            .put(SCHEMA_VERSION_KEY, CURRENT_SCHEMA_VERSION.to_string())
            .await
            .context("Failed to record schema version")?;
    }

    Ok(MigrationReport {
        from_version,
        to_version: CURRENT_SCHEMA_VERSION,
        records_patched,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use serde_json::json;

    const LEGACY: &str = r#"[
        {"id":"a","name":"Netflix","cost":15.49,"billingCycle":"monthly","category":"1",
         "startDate":"2023-01-01T00:00:00.000Z","nextBillingDate":"2023-02-01T00:00:00.000Z",
         "reminderSettings":{"enabled":true,"daysInAdvance":3},"active":true,"autoRenew":true},
        {"id":"b","name":"Times","cost":4,"originalCurrency":"GBP","billingCycle":"yearly","category":"3",
         "startDate":"2023-01-01T00:00:00.000Z","nextBillingDate":"2024-01-01T00:00:00.000Z",
         "reminderSettings":{"enabled":false,"daysInAdvance":1},"active":true,"autoRenew":false},
        {"id":"c","name":"Game","cost":1,"originalCurrency":"","billingCycle":"custom","customBillingDays":10,
         "category":"4","startDate":"2023-01-01T00:00:00.000Z","nextBillingDate":"2023-01-11T00:00:00.000Z",
         "reminderSettings":{"enabled":true,"daysInAdvance":3},"active":false,"autoRenew":true}
    ]"#;

    #[test]
    fn test_backfill_is_idempotent() {
        let mut records: Vec<Value> = serde_json::from_str(LEGACY).unwrap();
        assert_eq!(backfill_original_currency(&mut records), 2);
        assert_eq!(records[0]["originalCurrency"], json!("USD"));
        assert_eq!(records[1]["originalCurrency"], json!("GBP"));
        assert_eq!(records[2]["originalCurrency"], json!("USD"));

        let snapshot = records.clone();
        assert_eq!(backfill_original_currency(&mut records), 0);
        assert_eq!(records, snapshot);
    }

    #[tokio::test]
    async fn test_migrate_legacy_store() {
        let store = MemoryStore::new();
        store.put(SUBSCRIPTIONS_KEY, LEGACY.to_string()).await.unwrap();

        let report = migrate(&store).await.unwrap();
        assert_eq!(
            report,
            MigrationReport {
                from_version: 0,
                to_version: 1,
                records_patched: 2
            }
        );

        let json = store.get(SUBSCRIPTIONS_KEY).await.unwrap().unwrap();
        let subs: Vec<crate::core::subscription::Subscription> = serde_json::from_str(&json).unwrap();
        assert_eq!(subs.len(), 3);
        assert_eq!(subs[0].original_currency, "USD");
        assert_eq!(subs[2].custom_billing_days, Some(10));
    }

    #[tokio::test]
    async fn test_migrate_twice_changes_nothing() {
        let store = MemoryStore::new();
        store.put(SUBSCRIPTIONS_KEY, LEGACY.to_string()).await.unwrap();
        migrate(&store).await.unwrap();
        let after_first = store.get(SUBSCRIPTIONS_KEY).await.unwrap();

        let report = migrate(&store).await.unwrap();
        assert!(report.is_noop());
        assert_eq!(store.get(SUBSCRIPTIONS_KEY).await.unwrap(), after_first);
    }

    #[tokio::test]
    async fn test_migrate_empty_store_records_version() {
        let store = MemoryStore::new();
        let report = migrate(&store).await.unwrap();
        assert_eq!(report.records_patched, 0);
        assert_eq!(
            store.get(SCHEMA_VERSION_KEY).await.unwrap().as_deref(),
            Some("1")
        );
    }

    #[tokio::test]
    async fn test_newer_schema_is_rejected() {
        let store = MemoryStore::new();
        store.put(SCHEMA_VERSION_KEY, "99".to_string()).await.unwrap();
        assert!(migrate(&store).await.is_err());
    }
}
