use crate::store::KeyValueStore;
use anyhow::{Context, Result};
use async_trait::async_trait;
use fjall::{Config, Keyspace, PartitionCreateOptions, PartitionHandle, PersistMode};
use std::path::Path;
use tracing::debug;

const PARTITION_NAME: &str = "subtrack";

/// Durable store backed by a fjall keyspace on local disk.
///
/// Every write is synced before returning, so a completed mutation survives a
/// crash of the process.
pub struct DiskStore {
    keyspace: Keyspace,
    partition: PartitionHandle,
}

impl DiskStore {
    pub fn open(db_path: &Path) -> Result<Self> {
        std::fs::create_dir_all(db_path)
            .with_context(|| format!("Failed to create data directory: {}", db_path.display()))?;

        let keyspace = Config::new(db_path.join("fjall_db"))
            .open()
            .with_context(|| format!("Failed to open database at {}", db_path.display()))?;
        let partition = keyspace.open_partition(PARTITION_NAME, PartitionCreateOptions::default())?;
        debug!("Opened disk store at {}", db_path.display());
        Ok(Self {
            keyspace,
            partition,
        })
    }
}

#[async_trait]
impl KeyValueStore for DiskStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        match self.partition.get(key)? {
            Some(bytes) => {
                debug!("Store HIT for key: {}", key);
                let value = String::from_utf8(bytes.to_vec())
                    .with_context(|| format!("Stored value for {key} is not valid UTF-8"))?;
                Ok(Some(value))
            }
            None => {
                debug!("Store MISS for key: {}", key);
                Ok(None)
            }
        }
    }

    async fn put(&self, key: &str, value: String) -> Result<()> {
        self.partition.insert(key, value.as_bytes())?;
        self.keyspace.persist(PersistMode::SyncAll)?;
        debug!("Store PUT for key: {}", key);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.partition.remove(key)?;
        self.keyspace.persist(PersistMode::SyncAll)?;
        debug!("Store REMOVE for key: {}", key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_disk_store_get_put() {
        let dir = tempdir().unwrap();
        let store = DiskStore::open(dir.path()).unwrap();

        assert!(store.get("key1").await.unwrap().is_none());

        store.put("key1", "value".to_string()).await.unwrap();
        assert_eq!(store.get("key1").await.unwrap().as_deref(), Some("value"));

        assert!(store.get("key2").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_disk_store_remove() {
        let dir = tempdir().unwrap();
        let store = DiskStore::open(dir.path()).unwrap();

        store.put("key1", "value".to_string()).await.unwrap();
        store.remove("key1").await.unwrap();
        assert!(store.get("key1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_disk_store_survives_reopen() {
        let dir = tempdir().unwrap();
        {
            let store = DiskStore::open(dir.path()).unwrap();
            store.put("settings", r#"{"theme":"dark"}"#.to_string()).await.unwrap();
        }

        let store = DiskStore::open(dir.path()).unwrap();
        assert_eq!(
            store.get("settings").await.unwrap().as_deref(),
            Some(r#"{"theme":"dark"}"#)
        );
    }
}
