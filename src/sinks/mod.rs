pub mod log;
pub mod webhook;

use crate::core::config::AppConfig;
use crate::core::sink::ChangeSink;
use anyhow::{Context, Result};
use std::sync::Arc;

/// Builds every sink enabled in the configuration, in publish order.
pub fn enabled_sinks(config: &AppConfig) -> Result<Vec<Arc<dyn ChangeSink>>> {
    let mut sinks: Vec<Arc<dyn ChangeSink>> = Vec::new();

    if config.sinks.log.as_ref().is_some_and(|s| s.enabled) {
        sinks.push(Arc::new(log::LogSink));
    }

    if let Some(cfg) = config.sinks.webhook.as_ref().filter(|s| s.enabled) {
        let sink = webhook::WebhookSink::new(&cfg.url).context("Failed to create webhook sink")?;
        sinks.push(Arc::new(sink));
    }

    Ok(sinks)
}
