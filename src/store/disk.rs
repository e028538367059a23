use crate::core::error::StoreError;
use crate::core::rate::{Rate, RateKey, StoredRate};
use crate::core::store::RateStore;
use async_trait::async_trait;
use fjall::{Config, Keyspace, PartitionCreateOptions, PartitionHandle, PersistMode};
use std::path::Path;
use tracing::debug;

const PARTITION: &str = "rates";

/// Durable rate store backed by a fjall keyspace.
pub struct FjallRateStore {
    keyspace: Keyspace,
    rates: PartitionHandle,
}

impl FjallRateStore {
    pub fn open(db_path: &Path) -> Result<Self, StoreError> {
        std::fs::create_dir_all(db_path)?;

        let keyspace = Config::new(db_path.join("fjall_db")).open()?;
        let rates = keyspace.open_partition(PARTITION, PartitionCreateOptions::default())?;
        debug!("Opened rate store at {}", db_path.display());
        Ok(Self { keyspace, rates })
    }

    fn storage_key(key: &RateKey) -> String {
        format!("P/{}/B/{}/T/{}", key.provider, key.base, key.target)
    }

    fn read(&self, key: &RateKey) -> Result<Option<StoredRate>, StoreError> {
        match self.rates.get(Self::storage_key(key))? {
            Some(value) => Ok(Some(serde_json::from_slice(&value)?)),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl RateStore for FjallRateStore {
    async fn get(&self, key: &RateKey) -> Result<Option<StoredRate>, StoreError> {
        let value = self.read(key)?;
        if value.is_some() {
            debug!("Store HIT for key: {}", key);
        } else {
            debug!("Store MISS for key: {}", key);
        }
        Ok(value)
    }

    async fn set(&self, rate: &Rate) -> Result<bool, StoreError> {
        let key = rate.key();
        if self
            .read(&key)?
            .is_some_and(|existing| existing.matches(rate))
        {
            return Ok(false);
        }

        let value = serde_json::to_vec(&StoredRate::from(rate))?;
        self.rates.insert(Self::storage_key(&key), value)?;
        self.keyspace.persist(PersistMode::SyncAll)?;
        debug!("Store PUT for key: {}", key);
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::currency::Currency;
    use chrono::{TimeZone, Utc};
    use rust_decimal_macros::dec;
    use tempfile::tempdir;

    fn rate(provider: &str, value: rust_decimal::Decimal, secs: i64) -> Rate {
        Rate::new(
            provider,
            Currency::by_code("USD").unwrap(),
            Currency::by_code("UAH").unwrap(),
            value,
            Utc.timestamp_opt(secs, 0).unwrap(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_fjall_store_get_set() {
        let dir = tempdir().unwrap();
        let store = FjallRateStore::open(dir.path()).unwrap();
        let first = rate("monobank", dec!(41.25), 100);

        assert!(store.get(&first.key()).await.unwrap().is_none());
        assert!(store.set(&first).await.unwrap());

        let stored = store.get(&first.key()).await.unwrap().unwrap();
        assert_eq!(stored, StoredRate::from(&first));
        assert_eq!(stored.rate.to_string(), "41.25");
    }

    #[tokio::test]
    async fn test_fjall_store_detects_changes() {
        let dir = tempdir().unwrap();
        let store = FjallRateStore::open(dir.path()).unwrap();

        assert!(store.set(&rate("monobank", dec!(41.25), 100)).await.unwrap());
        assert!(!store.set(&rate("monobank", dec!(41.25), 100)).await.unwrap());
        assert!(store.set(&rate("monobank", dec!(41.30), 100)).await.unwrap());
        assert!(store.set(&rate("monobank", dec!(41.30), 160)).await.unwrap());

        let stored = store
            .get(&rate("monobank", dec!(0), 0).key())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.rate, dec!(41.30));
        assert_eq!(stored.date.timestamp(), 160);
    }

    #[tokio::test]
    async fn test_fjall_store_scopes_by_provider() {
        let dir = tempdir().unwrap();
        let store = FjallRateStore::open(dir.path()).unwrap();

        store.set(&rate("monobank", dec!(41.25), 100)).await.unwrap();
        assert!(store.set(&rate("yahoo", dec!(41.25), 100)).await.unwrap());

        let other = store.get(&rate("yahoo", dec!(0), 0).key()).await.unwrap();
        assert_eq!(other.unwrap().provider, "yahoo");
    }

    #[tokio::test]
    async fn test_fjall_store_survives_reopen() {
        let dir = tempdir().unwrap();
        let usd_uah = rate("monobank", dec!(41.25), 100);

        {
            let store = FjallRateStore::open(dir.path()).unwrap();
            assert!(store.set(&usd_uah).await.unwrap());
        }

        let store = FjallRateStore::open(dir.path()).unwrap();
        let stored = store.get(&usd_uah.key()).await.unwrap().unwrap();
        assert_eq!(stored, StoredRate::from(&usd_uah));
        assert!(!store.set(&usd_uah).await.unwrap());
    }

    #[test]
    fn test_open_over_a_file_is_an_io_error() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("not-a-dir");
        std::fs::write(&file, b"occupied").unwrap();

        assert!(matches!(
            FjallRateStore::open(&file),
            Err(StoreError::Io(_))
        ));
    }
}
