//! Error kinds surfaced by providers, stores, sinks and the synchronizer.

use crate::core::rate::RateKey;
use thiserror::Error;

/// A rate could not be constructed from its parts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidRate {
    #[error("base and target currency are both {0}")]
    SameCurrency(&'static str),
}

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status}")]
    Status { status: u16 },

    #[error("failed to decode response: {0}")]
    Decode(String),

    #[error(transparent)]
    InvalidRate(#[from] InvalidRate),
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage backend: {0}")]
    Backend(#[from] fjall::Error),

    #[error("stored rate encoding: {0}")]
    Encoding(#[from] serde_json::Error),

    #[error("storage io: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status}")]
    Status { status: u16 },

    #[error("event encoding: {0}")]
    Encoding(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("currency.refresh_period must not be less than 60 seconds, got {0}")]
    RefreshPeriodTooShort(u64),

    #[error("invalid currency code {0}")]
    UnknownCurrency(String),

    #[error("invalid currency pair {0}, expected BASE/TARGET")]
    InvalidPair(String),

    #[error("currency pair {0} is listed more than once")]
    DuplicatePair(String),

    #[error("invalid value {value:?} in {name}")]
    InvalidEnv { name: &'static str, value: String },

    #[error("{0} is required")]
    Missing(&'static str),

    #[error("no providers registered")]
    NoProviders,

    #[error("provider already registered: {0}")]
    DuplicateProvider(String),
}

/// Fatal error of a synchronization pass.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("{provider}: get currency rates: {source}")]
    Provider {
        provider: String,
        #[source]
        source: ProviderError,
    },

    #[error("{key}: store rate: {source}")]
    Storage {
        key: RateKey,
        #[source]
        source: StoreError,
    },

    #[error("{key}: sink write failed: {sink}: {source}")]
    Sink {
        sink: String,
        key: RateKey,
        #[source]
        source: SinkError,
    },
}
