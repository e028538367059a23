use crate::core::rate::Rate;

/// Keeps one rate per pair, the highest-valued one, in first-seen order.
pub(crate) fn dedup_pairs(rates: Vec<Rate>) -> Vec<Rate> {
    let mut unique: Vec<Rate> = Vec::with_capacity(rates.len());
    for rate in rates {
        match unique
            .iter_mut()
            .find(|r| r.base() == rate.base() && r.target() == rate.target())
        {
            Some(existing) => {
                if rate.value() > existing.value() {
                    *existing = rate;
                }
            }
            None => unique.push(rate),
        }
    }
    unique
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::currency::Currency;
    use chrono::{TimeZone, Utc};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn rate(base: &str, target: &str, value: Decimal) -> Rate {
        Rate::new(
            "p",
            Currency::by_code(base).unwrap(),
            Currency::by_code(target).unwrap(),
            value,
            Utc.timestamp_opt(1_700_000_000, 0).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn test_dedup_keeps_highest_value_at_first_position() {
        let rates = vec![
            rate("EUR", "USD", dec!(1.08)),
            rate("GBP", "USD", dec!(1.27)),
            rate("EUR", "USD", dec!(1.09)),
            rate("EUR", "USD", dec!(1.07)),
        ];

        let unique = dedup_pairs(rates);
        assert_eq!(unique.len(), 2);
        assert_eq!(unique[0].base().code, "EUR");
        assert_eq!(unique[0].value(), dec!(1.09));
        assert_eq!(unique[1].base().code, "GBP");
    }

    #[test]
    fn test_dedup_treats_direction_as_distinct() {
        let unique = dedup_pairs(vec![
            rate("EUR", "USD", dec!(1.08)),
            rate("USD", "EUR", dec!(0.93)),
        ]);
        assert_eq!(unique.len(), 2);
    }
}
