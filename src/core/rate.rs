//! Exchange rate types shared by providers, stores and sinks

use crate::core::currency::Currency;
use crate::core::error::InvalidRate;
use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Identifies one rate as observed from one provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RateKey {
    pub provider: String,
    pub base: Currency,
    pub target: Currency,
}

impl Display for RateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}:{}", self.provider, self.base, self.target)
    }
}

/// 1 unit of `base` equals `value` units of `target`, as observed by `provider`
/// at `observed_at`.
///
/// Build it through [`Rate::new`]: `value` is always rounded to the target
/// currency's digits so that provider-side float noise never reads as a change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "StoredRate")]
pub struct Rate {
    provider: String,
    base: Currency,
    target: Currency,
    #[serde(rename = "rate")]
    value: Decimal,
    #[serde(rename = "date")]
    observed_at: DateTime<Utc>,
}

impl Rate {
    pub fn new(
        provider: impl Into<String>,
        base: Currency,
        target: Currency,
        value: Decimal,
        observed_at: DateTime<Utc>,
    ) -> Result<Self, InvalidRate> {
        if base == target {
            return Err(InvalidRate::SameCurrency(base.code));
        }

        Ok(Self {
            provider: provider.into(),
            base,
            target,
            value: round_to(value, target.digits),
            observed_at,
        })
    }

    pub fn provider(&self) -> &str {
        &self.provider
    }

    pub fn base(&self) -> Currency {
        self.base
    }

    pub fn target(&self) -> Currency {
        self.target
    }

    pub fn value(&self) -> Decimal {
        self.value
    }

    pub fn observed_at(&self) -> DateTime<Utc> {
        self.observed_at
    }

    pub fn key(&self) -> RateKey {
        RateKey {
            provider: self.provider.clone(),
            base: self.base,
            target: self.target,
        }
    }
}

fn round_to(value: Decimal, digits: u32) -> Decimal {
    let mut rounded = value.round_dp_with_strategy(digits, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(digits);
    rounded
}

/// Persisted form of a [`Rate`], and the wire shape of either side of a
/// [`ChangeEvent`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredRate {
    pub provider: String,
    pub base: Currency,
    pub target: Currency,
    pub rate: Decimal,
    pub date: DateTime<Utc>,
}

impl StoredRate {
    /// Placeholder `before` for a pair seen for the first time.
    pub fn zero(key: &RateKey) -> Self {
        Self {
            provider: key.provider.clone(),
            base: key.base,
            target: key.target,
            rate: round_to(Decimal::ZERO, key.target.digits),
            date: DateTime::<Utc>::UNIX_EPOCH,
        }
    }

    /// True when `rate` carries the same observation as this record.
    pub fn matches(&self, rate: &Rate) -> bool {
        self.date == rate.observed_at && self.rate == rate.value
    }
}

impl From<&Rate> for StoredRate {
    fn from(rate: &Rate) -> Self {
        Self {
            provider: rate.provider.clone(),
            base: rate.base,
            target: rate.target,
            rate: rate.value,
            date: rate.observed_at,
        }
    }
}

impl TryFrom<StoredRate> for Rate {
    type Error = InvalidRate;

    fn try_from(stored: StoredRate) -> Result<Self, Self::Error> {
        Rate::new(
            stored.provider,
            stored.base,
            stored.target,
            stored.rate,
            stored.date,
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeEvent {
    pub before: StoredRate,
    pub after: Rate,
}

impl ChangeEvent {
    pub fn new(before: Option<StoredRate>, after: Rate) -> Self {
        let before = before.unwrap_or_else(|| StoredRate::zero(&after.key()));
        Self { before, after }
    }
}
