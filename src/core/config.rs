use crate::core::currency::Currency;
use crate::core::error::ConfigError;
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::Duration;
use std::{fs, path::PathBuf};
use tracing::debug;

pub const MIN_REFRESH_PERIOD: u64 = 60;
const DEFAULT_CURRENCIES: [&str; 3] = ["EUR", "UAH", "USD"];
const MONOBANK_ENABLED_ENV: &str = "APP_MONOBANK_ENABLED";
const MONOBANK_API_KEY_ENV: &str = "APP_MONOBANK_API_KEY";
const CURRENCY_LIST_ENV: &str = "APP_CURRENCY_LIST";
const CURRENCY_REFRESH_PERIOD_ENV: &str = "APP_CURRENCY_REFRESH_PERIOD";
const STORAGE_DRIVER_ENV: &str = "APP_STORAGE_DRIVER";
const STORAGE_PATH_ENV: &str = "APP_STORAGE_PATH";

/// Written by `finstream setup`.
pub const DEFAULT_CONFIG: &str = r#"---
currency:
  list: ["EUR", "UAH", "USD"]
  refresh_period: 60

providers:
  monobank:
    enabled: true
    # Required while enabled. APP_MONOBANK_API_KEY overrides this value.
    api_key: ""
    base_url: "https://api.monobank.ua"
  yahoo:
    enabled: false
    base_url: "https://query1.finance.yahoo.com"
    pairs: ["EUR/USD"]

sinks:
  log:
    enabled: true
  webhook:
    enabled: false
    url: ""

storage:
  driver: fjall
"#;

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct CurrencyConfig {
    /// Alphabetic codes of the tracked currencies
    #[serde(default)]
    pub list: Vec<String>,
    /// Seconds between passes
    #[serde(default)]
    pub refresh_period: u64,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct MonobankProviderConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_monobank_url")]
    pub base_url: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct YahooProviderConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_yahoo_url")]
    pub base_url: String,
    /// Pairs to poll, written as `BASE/TARGET`
    #[serde(default)]
    pub pairs: Vec<String>,
}

impl Default for MonobankProviderConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            api_key: String::new(),
            base_url: default_monobank_url(),
        }
    }
}

fn default_monobank_url() -> String {
    "https://api.monobank.ua".to_string()
}

fn default_yahoo_url() -> String {
    "https://query1.finance.yahoo.com".to_string()
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct ProvidersConfig {
    pub monobank: Option<MonobankProviderConfig>,
    pub yahoo: Option<YahooProviderConfig>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LogSinkConfig {
    #[serde(default)]
    pub enabled: bool,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct WebhookSinkConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub url: String,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct SinksConfig {
    pub log: Option<LogSinkConfig>,
    pub webhook: Option<WebhookSinkConfig>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageDriver {
    #[default]
    Fjall,
    Memory,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct StorageConfig {
    #[serde(default)]
    pub driver: StorageDriver,
    pub path: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub currency: CurrencyConfig,
    #[serde(default)]
    pub providers: ProvidersConfig,
    #[serde(default)]
    pub sinks: SinksConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("io", "finstream", "finstream")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn data_path(&self) -> Result<PathBuf> {
        if let Some(custom_path) = &self.storage.path {
            return Ok(PathBuf::from(custom_path));
        }
        let proj_dirs = ProjectDirs::from("io", "finstream", "finstream")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.data_dir().to_path_buf())
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let mut config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        config.apply_env().with_context(|| {
            format!("Invalid environment override for {}", path.as_ref().display())
        })?;
        config
            .validate()
            .with_context(|| format!("Invalid config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }

    fn apply_env(&mut self) -> Result<(), ConfigError> {
        self.apply_env_from(|name| std::env::var(name).ok())
    }

    /// Overrides file settings with the `APP_*` variables returned by `var`.
    fn apply_env_from(&mut self, var: impl Fn(&str) -> Option<String>) -> Result<(), ConfigError> {
        if let Some(list) = var(CURRENCY_LIST_ENV) {
            debug!("Using currency list from {CURRENCY_LIST_ENV}");
            self.currency.list = list
                .split(',')
                .map(str::trim)
                .filter(|code| !code.is_empty())
                .map(str::to_string)
                .collect();
        }

        if let Some(period) = var(CURRENCY_REFRESH_PERIOD_ENV) {
            debug!("Using refresh period from {CURRENCY_REFRESH_PERIOD_ENV}");
            self.currency.refresh_period =
                period.trim().parse().map_err(|_| ConfigError::InvalidEnv {
                    name: CURRENCY_REFRESH_PERIOD_ENV,
                    value: period.clone(),
                })?;
        }

        if let Some(enabled) = var(MONOBANK_ENABLED_ENV) {
            debug!("Using Monobank enabled flag from {MONOBANK_ENABLED_ENV}");
            let enabled = parse_flag(&enabled).ok_or_else(|| ConfigError::InvalidEnv {
                name: MONOBANK_ENABLED_ENV,
                value: enabled.clone(),
            })?;
            self.providers
                .monobank
                .get_or_insert_with(MonobankProviderConfig::default)
                .enabled = enabled;
        }

        if let Some(api_key) = var(MONOBANK_API_KEY_ENV) {
            if let Some(monobank) = self.providers.monobank.as_mut() {
                debug!("Using Monobank API key from {MONOBANK_API_KEY_ENV}");
                monobank.api_key = api_key;
            }
        }

        if let Some(driver) = var(STORAGE_DRIVER_ENV) {
            debug!("Using storage driver from {STORAGE_DRIVER_ENV}");
            self.storage.driver = match driver.trim().to_ascii_lowercase().as_str() {
                "fjall" => StorageDriver::Fjall,
                "memory" => StorageDriver::Memory,
                _ => {
                    return Err(ConfigError::InvalidEnv {
                        name: STORAGE_DRIVER_ENV,
                        value: driver.clone(),
                    });
                }
            };
        }

        if let Some(path) = var(STORAGE_PATH_ENV) {
            debug!("Using storage path from {STORAGE_PATH_ENV}");
            self.storage.path = Some(path);
        }

        Ok(())
    }

    /// Fills in defaults and rejects settings the synchronizer cannot run with.
    pub fn validate(&mut self) -> Result<(), ConfigError> {
        if self.currency.refresh_period == 0 {
            self.currency.refresh_period = MIN_REFRESH_PERIOD;
        }
        if self.currency.refresh_period < MIN_REFRESH_PERIOD {
            return Err(ConfigError::RefreshPeriodTooShort(
                self.currency.refresh_period,
            ));
        }

        if self.currency.list.is_empty() {
            self.currency.list = DEFAULT_CURRENCIES.iter().map(|c| c.to_string()).collect();
        }
        for code in self.currency.list.iter_mut() {
            let currency = Currency::by_code(code)
                .ok_or_else(|| ConfigError::UnknownCurrency(code.clone()))?;
            *code = currency.code.to_string();
        }

        if let Some(monobank) = self.providers.monobank.as_ref().filter(|p| p.enabled) {
            if monobank.api_key.is_empty() {
                return Err(ConfigError::Missing("providers.monobank.api_key"));
            }
            if monobank.base_url.is_empty() {
                return Err(ConfigError::Missing("providers.monobank.base_url"));
            }
        }

        if let Some(yahoo) = self.providers.yahoo.as_ref().filter(|p| p.enabled) {
            if yahoo.base_url.is_empty() {
                return Err(ConfigError::Missing("providers.yahoo.base_url"));
            }
            if yahoo.pairs.is_empty() {
                return Err(ConfigError::Missing("providers.yahoo.pairs"));
            }
            let mut seen = HashSet::new();
            for pair in &yahoo.pairs {
                if !seen.insert(parse_pair(pair)?) {
                    return Err(ConfigError::DuplicatePair(pair.clone()));
                }
            }
        }

        if let Some(webhook) = self.sinks.webhook.as_ref().filter(|s| s.enabled) {
            if webhook.url.is_empty() {
                return Err(ConfigError::Missing("sinks.webhook.url"));
            }
        }

        Ok(())
    }

    pub fn tracked_currencies(&self) -> Result<Vec<Currency>, ConfigError> {
        self.currency
            .list
            .iter()
            .map(|code| {
                Currency::by_code(code).ok_or_else(|| ConfigError::UnknownCurrency(code.clone()))
            })
            .collect()
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.currency.refresh_period.max(MIN_REFRESH_PERIOD))
    }
}

/// Parses a `BASE/TARGET` pair against the currency reference table.
pub fn parse_pair(pair: &str) -> Result<(Currency, Currency), ConfigError> {
    let invalid = || ConfigError::InvalidPair(pair.to_string());

    let (base, target) = pair.split_once('/').ok_or_else(invalid)?;
    let base = Currency::by_code(base.trim())
        .ok_or_else(|| ConfigError::UnknownCurrency(base.trim().to_string()))?;
    let target = Currency::by_code(target.trim())
        .ok_or_else(|| ConfigError::UnknownCurrency(target.trim().to_string()))?;
    if base == target {
        return Err(invalid());
    }
    Ok((base, target))
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "t" | "true" => Some(true),
        "0" | "f" | "false" => Some(false),
        _ => None,
    }
}
