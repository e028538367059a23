//! Poll, diff and publish loop.
//!
//! A pass walks every provider in registration order, keeps the rates whose
//! base and target are both tracked, writes them through the store and sends a
//! [`ChangeEvent`] to every sink for each rate the store reports as changed.
//! Passes never overlap, and every call inside a pass is awaited in sequence.
//!
//! The store write and the sink writes are not transactional. If a sink fails
//! after the store committed, the new value stays stored and its event is never
//! sent: the next pass sees no change for that pair.

use crate::core::currency::Currency;
use crate::core::error::{ConfigError, SyncError};
use crate::core::provider::RateProvider;
use crate::core::rate::{ChangeEvent, Rate};
use crate::core::sink::ChangeSink;
use crate::core::store::RateStore;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

const DEFAULT_INTERVAL: Duration = Duration::from_secs(60);

/// Counters for one pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassSummary {
    pub fetched: usize,
    pub skipped: usize,
    pub unchanged: usize,
    pub changed: usize,
    /// The pass stopped early on cancellation.
    pub interrupted: bool,
}

pub struct Synchronizer {
    tracked: HashSet<Currency>,
    interval: Duration,
    providers: Vec<Arc<dyn RateProvider>>,
    store: Arc<dyn RateStore>,
    sinks: Vec<Arc<dyn ChangeSink>>,
}

pub struct SynchronizerBuilder {
    tracked: HashSet<Currency>,
    interval: Duration,
    providers: Vec<Arc<dyn RateProvider>>,
    store: Arc<dyn RateStore>,
    sinks: Vec<Arc<dyn ChangeSink>>,
}

impl SynchronizerBuilder {
    pub fn track(mut self, currencies: impl IntoIterator<Item = Currency>) -> Self {
        self.tracked.extend(currencies);
        self
    }

    pub fn interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn provider(mut self, provider: Arc<dyn RateProvider>) -> Self {
        self.providers.push(provider);
        self
    }

    pub fn sink(mut self, sink: Arc<dyn ChangeSink>) -> Self {
        self.sinks.push(sink);
        self
    }

    pub fn build(self) -> Result<Synchronizer, ConfigError> {
        if self.providers.is_empty() {
            return Err(ConfigError::NoProviders);
        }
        {
            let mut names = HashSet::new();
            for provider in &self.providers {
                if !names.insert(provider.name()) {
                    return Err(ConfigError::DuplicateProvider(provider.name().to_string()));
                }
            }
        }

        Ok(Synchronizer {
            tracked: self.tracked,
            interval: self.interval,
            providers: self.providers,
            store: self.store,
            sinks: self.sinks,
        })
    }
}

impl Synchronizer {
    pub fn builder(store: Arc<dyn RateStore>) -> SynchronizerBuilder {
        SynchronizerBuilder {
            tracked: HashSet::new(),
            interval: DEFAULT_INTERVAL,
            providers: Vec::new(),
            store,
            sinks: Vec::new(),
        }
    }

    /// Runs a pass immediately, then one pass per interval until `cancel` fires.
    ///
    /// Returns the first pass error. Cancellation is not an error.
    pub async fn run(&self, cancel: CancellationToken) -> Result<(), SyncError> {
        info!(
            providers = self.providers.len(),
            sinks = self.sinks.len(),
            interval_secs = self.interval.as_secs(),
            "Synchronizer starting"
        );

        let mut summary = self.sync_once(&cancel).await?;
        while !summary.interrupted {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = tokio::time::sleep(self.interval) => {
                    summary = self.sync_once(&cancel).await?;
                }
            }
        }

        info!("Synchronizer stopped");
        Ok(())
    }

    /// One poll-diff-publish pass over every provider.
    ///
    /// Cancellation is checked between rates, so a rate whose store write has
    /// started always gets its sink writes too.
    pub async fn sync_once(&self, cancel: &CancellationToken) -> Result<PassSummary, SyncError> {
        let mut summary = PassSummary::default();

        'providers: for provider in &self.providers {
            if cancel.is_cancelled() {
                summary.interrupted = true;
                break;
            }

            let rates = provider
                .fetch_rates()
                .await
                .map_err(|source| SyncError::Provider {
                    provider: provider.name().to_string(),
                    source,
                })?;
            debug!(provider = provider.name(), count = rates.len(), "Fetched rates");
            summary.fetched += rates.len();

            for rate in rates {
                if cancel.is_cancelled() {
                    summary.interrupted = true;
                    break 'providers;
                }
                if !self.is_tracked(&rate) {
                    summary.skipped += 1;
                    continue;
                }
                if self.apply(rate).await? {
                    summary.changed += 1;
                } else {
                    summary.unchanged += 1;
                }
            }
        }

        info!(
            fetched = summary.fetched,
            skipped = summary.skipped,
            unchanged = summary.unchanged,
            changed = summary.changed,
            interrupted = summary.interrupted,
            "Sync pass complete"
        );
        Ok(summary)
    }

    fn is_tracked(&self, rate: &Rate) -> bool {
        self.tracked.contains(&rate.base()) && self.tracked.contains(&rate.target())
    }

    /// Stores `rate` and publishes it if it changed. Returns whether it changed.
    async fn apply(&self, rate: Rate) -> Result<bool, SyncError> {
        let key = rate.key();

        let before = self
            .store
            .get(&key)
            .await
            .map_err(|source| SyncError::Storage {
                key: key.clone(),
                source,
            })?;
        let changed = self
            .store
            .set(&rate)
            .await
            .map_err(|source| SyncError::Storage {
                key: key.clone(),
                source,
            })?;

        match &before {
            Some(ex) => info!(
                provider = rate.provider(),
                base = %rate.base(),
                target = %rate.target(),
                rate = %rate.value(),
                date = %rate.observed_at(),
                ex_rate = %ex.rate,
                ex_date = %ex.date,
                changed,
                "currency rate processed"
            ),
            None => info!(
                provider = rate.provider(),
                base = %rate.base(),
                target = %rate.target(),
                rate = %rate.value(),
                date = %rate.observed_at(),
                changed,
                "currency rate processed"
            ),
        }

        if !changed {
            return Ok(false);
        }

        let event = ChangeEvent::new(before, rate);
        let key_str = key.to_string();
        for sink in &self.sinks {
            sink.write(&key_str, &event)
                .await
                .map_err(|source| SyncError::Sink {
                    sink: sink.name().to_string(),
                    key: key.clone(),
                    source,
                })?;
        }

        Ok(true)
    }
}
