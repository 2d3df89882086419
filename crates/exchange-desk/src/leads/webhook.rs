use async_trait::async_trait;
use serde_json::Value;

use super::email::DeliveryError;

/// Automation-platform seam receiving the raw lead payload.
#[async_trait]
pub trait WebhookSink: Send + Sync {
    async fn deliver(&self, payload: &Value) -> Result<(), DeliveryError>;
}

#[derive(Debug, Clone)]
pub struct HttpWebhook {
    client: reqwest::Client,
    url: String,
}

impl HttpWebhook {
    pub fn new(client: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }
}

#[async_trait]
impl WebhookSink for HttpWebhook {
    async fn deliver(&self, payload: &Value) -> Result<(), DeliveryError> {
        let response = self.client.post(&self.url).json(payload).send().await?;
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(DeliveryError::Status {
                status: status.as_u16(),
            })
        }
    }
}
