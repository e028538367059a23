//! Rate provider abstraction

use crate::core::error::ProviderError;
use crate::core::rate::Rate;
use async_trait::async_trait;

#[async_trait]
pub trait RateProvider: Send + Sync {
    /// Identifier stamped on every rate this provider returns.
    fn name(&self) -> &str;

    /// Fetches every rate currently published by the upstream source.
    ///
    /// Implementations return at most one rate per (base, target) pair and
    /// drop rows for currencies missing from the reference table.
    async fn fetch_rates(&self) -> Result<Vec<Rate>, ProviderError>;
}
