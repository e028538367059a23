use crate::core::error::SinkError;
use crate::core::rate::ChangeEvent;
use crate::core::sink::ChangeSink;
use async_trait::async_trait;
use tracing::debug;

pub const EVENT_KEY_HEADER: &str = "X-Event-Key";

/// Posts each change event as JSON to an HTTP endpoint, with the partition
/// key in the `X-Event-Key` header.
pub struct WebhookSink {
    url: String,
    client: reqwest::Client,
}

impl WebhookSink {
    pub fn new(url: &str) -> Result<Self, SinkError> {
        let client = reqwest::Client::builder()
            .user_agent("finstream/1.0")
            .build()?;
        Ok(Self {
            url: url.to_string(),
            client,
        })
    }
}

#[async_trait]
impl ChangeSink for WebhookSink {
    fn name(&self) -> &str {
        "webhook"
    }

    async fn write(&self, key: &str, event: &ChangeEvent) -> Result<(), SinkError> {
        let body = serde_json::to_vec(event)?;
        let response = self
            .client
            .post(&self.url)
            .header(EVENT_KEY_HEADER, key)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(SinkError::Status {
                status: response.status().as_u16(),
            });
        }
        debug!(key, url = %self.url, "Delivered change event");
        Ok(())
    }
}
