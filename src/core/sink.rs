//! Downstream publish targets for rate changes

use crate::core::error::SinkError;
use crate::core::rate::ChangeEvent;
use async_trait::async_trait;

#[async_trait]
pub trait ChangeSink: Send + Sync {
    fn name(&self) -> &str;

    /// Publishes one change. `key` is `provider:BASE:TARGET`.
    async fn write(&self, key: &str, event: &ChangeEvent) -> Result<(), SinkError>;
}
