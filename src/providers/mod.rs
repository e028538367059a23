pub mod monobank;
mod util;
pub mod yahoo_finance;

use crate::core::config::{AppConfig, parse_pair};
use crate::core::provider::RateProvider;
use anyhow::{Context, Result};
use std::sync::Arc;

/// Builds every provider enabled in the configuration, in a fixed order.
pub fn enabled_providers(config: &AppConfig) -> Result<Vec<Arc<dyn RateProvider>>> {
    let mut providers: Vec<Arc<dyn RateProvider>> = Vec::new();

    if let Some(cfg) = config.providers.monobank.as_ref().filter(|p| p.enabled) {
        let provider = monobank::MonobankProvider::new(&cfg.base_url, &cfg.api_key)
            .context("Failed to create Monobank provider")?;
        providers.push(Arc::new(provider));
    }

    if let Some(cfg) = config.providers.yahoo.as_ref().filter(|p| p.enabled) {
        let pairs = cfg
            .pairs
            .iter()
            .map(|p| parse_pair(p))
            .collect::<Result<Vec<_>, _>>()?;
        let provider = yahoo_finance::YahooCurrencyProvider::new(&cfg.base_url, pairs)
            .context("Failed to create Yahoo provider")?;
        providers.push(Arc::new(provider));
    }

    Ok(providers)
}
