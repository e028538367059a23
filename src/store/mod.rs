pub mod disk;
pub mod memory;

use crate::core::config::{AppConfig, StorageDriver};
use crate::core::store::RateStore;
use anyhow::{Context, Result};
use disk::FjallRateStore;
use memory::MemoryRateStore;
use std::sync::Arc;
use tracing::info;

/// Opens the store backend selected by the configuration.
pub fn open_store(config: &AppConfig) -> Result<Arc<dyn RateStore>> {
    match config.storage.driver {
        StorageDriver::Memory => {
            info!("Using in-memory rate store");
            Ok(Arc::new(MemoryRateStore::new()))
        }
        StorageDriver::Fjall => {
            let path = config.data_path()?.join("rates");
            info!("Using fjall rate store at {}", path.display());
            let store = FjallRateStore::open(&path)
                .with_context(|| format!("Failed to open rate store: {}", path.display()))?;
            Ok(Arc::new(store))
        }
    }
}
