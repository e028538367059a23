use crate::core::currency::Currency;
use crate::core::error::ProviderError;
use crate::core::provider::RateProvider;
use crate::core::rate::Rate;
use crate::providers::util::dedup_pairs;
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{debug, instrument};

pub const PROVIDER_NAME: &str = "yahoo";

#[derive(Debug, Deserialize)]
struct YahooCurrencyResponse {
    chart: CurrencyChartResult,
}

#[derive(Debug, Deserialize)]
struct CurrencyChartResult {
    result: Vec<CurrencyChartItem>,
}

#[derive(Debug, Deserialize)]
struct CurrencyChartItem {
    meta: CurrencyChartMeta,
}

#[derive(Debug, Deserialize)]
struct CurrencyChartMeta {
    #[serde(alias = "regularMarketPrice")]
    regular_market_price: f64,
    #[serde(alias = "regularMarketTime")]
    regular_market_time: i64,
}

/// Polls the Yahoo Finance chart endpoint for a fixed list of pairs.
pub struct YahooCurrencyProvider {
    base_url: String,
    pairs: Vec<(Currency, Currency)>,
    client: reqwest::Client,
}

impl YahooCurrencyProvider {
    pub fn new(base_url: &str, pairs: Vec<(Currency, Currency)>) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder().user_agent("finstream/1.0").build()?;
        Ok(YahooCurrencyProvider {
            base_url: base_url.trim_end_matches('/').to_string(),
            pairs,
            client,
        })
    }

    async fn fetch_pair(&self, base: Currency, target: Currency) -> Result<Rate, ProviderError> {
        let symbol = format!("{base}{target}=X");
        let url = format!("{}/v8/finance/chart/{}", self.base_url, symbol);
        debug!("Requesting currency rate from {}", url);

        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(ProviderError::Status {
                status: response.status().as_u16(),
            });
        }

        let text = response.text().await?;

        let data: YahooCurrencyResponse = serde_json::from_str(&text).map_err(|e| {
            ProviderError::Decode(format!("Failed to parse JSON response for {symbol}: {e}"))
        })?;

        let item = data.chart.result.into_iter().next().ok_or_else(|| {
            ProviderError::Decode(format!("No rate data found for currency pair: {symbol}"))
        })?;

        let value = Decimal::try_from(item.meta.regular_market_price).map_err(|e| {
            ProviderError::Decode(format!("Invalid rate for currency pair {symbol}: {e}"))
        })?;
        let observed_at = Utc
            .timestamp_opt(item.meta.regular_market_time, 0)
            .single()
            .ok_or_else(|| {
                ProviderError::Decode(format!("Invalid market time for currency pair {symbol}"))
            })?;

        Ok(Rate::new(PROVIDER_NAME, base, target, value, observed_at)?)
    }
}

#[async_trait]
impl RateProvider for YahooCurrencyProvider {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    #[instrument(name = "YahooRateFetch", skip(self))]
    async fn fetch_rates(&self) -> Result<Vec<Rate>, ProviderError> {
        let mut rates = Vec::with_capacity(self.pairs.len());
        for (base, target) in &self.pairs {
            rates.push(self.fetch_pair(*base, *target).await?);
        }
        Ok(dedup_pairs(rates))
    }
}
