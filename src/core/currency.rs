//! ISO 4217 currency reference table

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Currency {
    /// ISO 4217 numeric code
    pub num: u16,
    /// ISO 4217 alphabetic code
    pub code: &'static str,
    /// Minor unit digits, used for rounding rate values
    pub digits: u32,
}

const fn currency(num: u16, code: &'static str, digits: u32) -> Currency {
    Currency { num, code, digits }
}

static CURRENCIES: &[Currency] = &[
    currency(8, "ALL", 2),
    currency(32, "ARS", 2),
    currency(36, "AUD", 2),
    currency(48, "BHD", 3),
    currency(51, "AMD", 2),
    currency(124, "CAD", 2),
    currency(152, "CLP", 0),
    currency(156, "CNY", 2),
    currency(203, "CZK", 2),
    currency(208, "DKK", 2),
    currency(344, "HKD", 2),
    currency(348, "HUF", 2),
    currency(352, "ISK", 0),
    currency(356, "INR", 2),
    currency(360, "IDR", 2),
    currency(376, "ILS", 2),
    currency(392, "JPY", 0),
    currency(398, "KZT", 2),
    currency(400, "JOD", 3),
    currency(410, "KRW", 0),
    currency(414, "KWD", 3),
    currency(458, "MYR", 2),
    currency(484, "MXN", 2),
    currency(498, "MDL", 2),
    currency(512, "OMR", 3),
    currency(554, "NZD", 2),
    currency(578, "NOK", 2),
    currency(608, "PHP", 2),
    currency(634, "QAR", 2),
    currency(682, "SAR", 2),
    currency(702, "SGD", 2),
    currency(704, "VND", 0),
    currency(710, "ZAR", 2),
    currency(752, "SEK", 2),
    currency(756, "CHF", 2),
    currency(764, "THB", 2),
    currency(784, "AED", 2),
    currency(788, "TND", 3),
    currency(818, "EGP", 2),
    currency(826, "GBP", 2),
    currency(840, "USD", 2),
    currency(901, "TWD", 2),
    currency(933, "BYN", 2),
    currency(941, "RSD", 2),
    currency(944, "AZN", 2),
    currency(946, "RON", 2),
    currency(949, "TRY", 2),
    currency(975, "BGN", 2),
    currency(978, "EUR", 2),
    currency(980, "UAH", 2),
    currency(981, "GEL", 2),
    currency(985, "PLN", 2),
    currency(986, "BRL", 2),
];

impl Currency {
    pub fn by_code(code: &str) -> Option<Currency> {
        CURRENCIES
            .iter()
            .find(|c| c.code.eq_ignore_ascii_case(code))
            .copied()
    }

    pub fn by_num(num: u16) -> Option<Currency> {
        CURRENCIES.iter().find(|c| c.num == num).copied()
    }
}

impl Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code)
    }
}

impl Serialize for Currency {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code)
    }
}

impl<'de> Deserialize<'de> for Currency {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let code = String::deserialize(deserializer)?;
        Currency::by_code(&code)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown currency code: {code}")))
    }
}
