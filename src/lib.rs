pub mod core;
pub mod providers;
pub mod sinks;
pub mod store;
pub mod sync;

use crate::core::config::AppConfig;
use anyhow::{Context, Result};
use sync::Synchronizer;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

pub enum AppCommand {
    /// Poll until interrupted
    Run,
    /// Run a single pass and exit
    Once,
}

pub fn build_synchronizer(config: &AppConfig) -> Result<Synchronizer> {
    let store = store::open_store(config)?;
    let mut builder = Synchronizer::builder(store)
        .track(config.tracked_currencies()?)
        .interval(config.refresh_interval());

    for provider in providers::enabled_providers(config)? {
        info!(provider = provider.name(), "Registered provider");
        builder = builder.provider(provider);
    }

    let sinks = sinks::enabled_sinks(config)?;
    if sinks.is_empty() {
        warn!("No sinks enabled, changes will only be stored");
    }
    for sink in sinks {
        info!(sink = sink.name(), "Registered sink");
        builder = builder.sink(sink);
    }

    Ok(builder.build()?)
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("finstream starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let synchronizer = build_synchronizer(&config).context("Failed to set up synchronizer")?;
    let cancel = CancellationToken::new();

    match command {
        AppCommand::Once => {
            synchronizer.sync_once(&cancel).await?;
        }
        AppCommand::Run => {
            let shutdown = cancel.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    info!("Shutdown signal received");
                    shutdown.cancel();
                }
            });
            synchronizer.run(cancel).await?;
        }
    }

    Ok(())
}
