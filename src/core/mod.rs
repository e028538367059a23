//! Core business logic abstractions

pub mod config;
pub mod currency;
pub mod error;
pub mod log;
pub mod provider;
pub mod rate;
pub mod sink;
pub mod store;

// Re-export main types for cleaner imports
pub use currency::Currency;
pub use error::{ConfigError, InvalidRate, ProviderError, SinkError, StoreError, SyncError};
pub use provider::RateProvider;
pub use rate::{ChangeEvent, Rate, RateKey, StoredRate};
pub use sink::ChangeSink;
pub use store::RateStore;
