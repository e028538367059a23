use crate::core::currency::Currency;
use crate::core::error::ProviderError;
use crate::core::provider::RateProvider;
use crate::core::rate::Rate;
use crate::providers::util::dedup_pairs;
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{debug, info, instrument};

pub const PROVIDER_NAME: &str = "monobank";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MonobankRate {
    currency_code_a: u16,
    currency_code_b: u16,
    #[serde(default)]
    date: i64,
    #[serde(default)]
    rate_sell: f64,
    #[serde(default)]
    rate_buy: f64,
    #[serde(default)]
    rate_cross: f64,
}

/// Monobank public currency rates.
///
/// A row reads as 1 unit of currency A costs `rate` units of currency B, so A
/// is the base and B the target. The sell rate is preferred since it is the
/// highest published price, the cross rate is used when no sell rate exists.
pub struct MonobankProvider {
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl MonobankProvider {
    pub fn new(base_url: &str, api_key: &str) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .user_agent("finstream/1.0")
            .build()?;
        Ok(MonobankProvider {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            client,
        })
    }

    fn to_rate(row: &MonobankRate, base: Currency, target: Currency) -> Result<Rate, ProviderError> {
        let value = if row.rate_sell != 0.0 {
            row.rate_sell
        } else if row.rate_cross != 0.0 {
            row.rate_cross
        } else {
            return Err(ProviderError::Decode(format!(
                "no valid rate found for {base}/{target}"
            )));
        };
        debug!(
            base = %base,
            target = %target,
            sell = row.rate_sell,
            buy = row.rate_buy,
            cross = row.rate_cross,
            "Picked Monobank rate"
        );

        let value = Decimal::try_from(value).map_err(|e| {
            ProviderError::Decode(format!("invalid rate {value} for {base}/{target}: {e}"))
        })?;
        if row.date == 0 {
            return Err(ProviderError::Decode(format!(
                "zero rate date for {base}/{target}"
            )));
        }
        let observed_at = Utc.timestamp_opt(row.date, 0).single().ok_or_else(|| {
            ProviderError::Decode(format!("invalid rate date {} for {base}/{target}", row.date))
        })?;

        Ok(Rate::new(PROVIDER_NAME, base, target, value, observed_at)?)
    }
}

#[async_trait]
impl RateProvider for MonobankProvider {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    #[instrument(name = "MonobankFetch", skip(self))]
    async fn fetch_rates(&self) -> Result<Vec<Rate>, ProviderError> {
        let url = format!("{}/bank/currency", self.base_url);
        debug!("Requesting currency rates from {}", url);

        let mut request = self.client.get(&url);
        if !self.api_key.is_empty() {
            request = request.header("X-Token", &self.api_key);
        }
        let response = request.send().await?;

        if !response.status().is_success() {
            return Err(ProviderError::Status {
                status: response.status().as_u16(),
            });
        }

        let text = response.text().await?;
        let rows: Vec<MonobankRate> = serde_json::from_str(&text)
            .map_err(|e| ProviderError::Decode(format!("Monobank response: {e}")))?;

        let mut rates = Vec::with_capacity(rows.len());
        let mut dropped = 0usize;
        for row in &rows {
            let (Some(base), Some(target)) = (
                Currency::by_num(row.currency_code_a),
                Currency::by_num(row.currency_code_b),
            ) else {
                debug!(
                    code_a = row.currency_code_a,
                    code_b = row.currency_code_b,
                    "Skipping unrecognised currency"
                );
                dropped += 1;
                continue;
            };
            rates.push(Self::to_rate(row, base, target)?);
        }

        if dropped > 0 {
            info!(
                provider = PROVIDER_NAME,
                dropped, "Dropped rates for unrecognised currencies"
            );
        }

        Ok(dedup_pairs(rates))
    }
}
