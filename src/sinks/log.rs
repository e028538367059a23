use crate::core::error::SinkError;
use crate::core::rate::ChangeEvent;
use crate::core::sink::ChangeSink;
use async_trait::async_trait;
use tracing::info;

/// Writes change events to the application log.
#[derive(Debug, Default)]
pub struct LogSink;

#[async_trait]
impl ChangeSink for LogSink {
    fn name(&self) -> &str {
        "log"
    }

    async fn write(&self, key: &str, event: &ChangeEvent) -> Result<(), SinkError> {
        let payload = serde_json::to_string(event)?;
        info!(key, event = %payload, "currency rate change");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::currency::Currency;
    use crate::core::rate::Rate;
    use chrono::{TimeZone, Utc};
    use rust_decimal_macros::dec;

    #[test_log::test(tokio::test)]
    async fn test_log_sink_accepts_event() {
        let rate = Rate::new(
            "monobank",
            Currency::by_code("USD").unwrap(),
            Currency::by_code("UAH").unwrap(),
            dec!(41.45),
            Utc.timestamp_opt(1_700_000_000, 0).unwrap(),
        )
        .unwrap();
        let event = ChangeEvent::new(None, rate);

        assert!(LogSink.write("monobank:USD:UAH", &event).await.is_ok());
    }
}
