//! Persistent store of the last observed rate per key

use crate::core::error::StoreError;
use crate::core::rate::{Rate, RateKey, StoredRate};
use async_trait::async_trait;

#[async_trait]
pub trait RateStore: Send + Sync {
    /// Returns the last stored rate for `key`, or `None` if the pair was never seen.
    async fn get(&self, key: &RateKey) -> Result<Option<StoredRate>, StoreError>;

    /// Records `rate` unless the stored record already has the same value and
    /// date. Returns whether anything was written.
    async fn set(&self, rate: &Rate) -> Result<bool, StoreError>;
}
