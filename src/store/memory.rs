use crate::core::error::StoreError;
use crate::core::rate::{Rate, RateKey, StoredRate};
use crate::core::store::RateStore;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::Mutex;
use tracing::debug;

/// In-memory rate store. Contents are lost on restart.
#[derive(Default)]
pub struct MemoryRateStore {
    inner: Mutex<HashMap<RateKey, StoredRate>>,
}

impl MemoryRateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.inner.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.lock().await.is_empty()
    }
}

#[async_trait]
impl RateStore for MemoryRateStore {
    async fn get(&self, key: &RateKey) -> Result<Option<StoredRate>, StoreError> {
        let rates = self.inner.lock().await;
        let value = rates.get(key).cloned();
        if value.is_some() {
            debug!("Store HIT for key: {}", key);
        } else {
            debug!("Store MISS for key: {}", key);
        }
        Ok(value)
    }

    async fn set(&self, rate: &Rate) -> Result<bool, StoreError> {
        // Compare and write under one lock
        let mut rates = self.inner.lock().await;
        let key = rate.key();
        if rates.get(&key).is_some_and(|existing| existing.matches(rate)) {
            return Ok(false);
        }
        debug!("Store PUT for key: {}", key);
        rates.insert(key, StoredRate::from(rate));
        Ok(true)
    }
}
