use serde_json::json;
use tracing::info;

use crate::Error;

/// Outcome of one webhook delivery. Non-2xx responses are a result, not an
/// error; the pipeline decides what to do with them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeliveryResult {
    pub ok: bool,
    pub status: u16,
}

/// Delivers one text payload per call, strictly sequentially from the caller's
/// point of view.
#[allow(async_fn_in_trait)]
pub trait Publisher {
    async fn post(&self, content: &str) -> Result<DeliveryResult, Error>;
}

/// Discord-compatible webhook target. Whatever authentication exists is baked
/// into the URL.
#[derive(Debug, Clone)]
pub struct DiscordWebhook {
    url: String,
}

impl DiscordWebhook {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

impl Publisher for DiscordWebhook {
    async fn post(&self, content: &str) -> Result<DeliveryResult, Error> {
        info!(content_length = content.len(), "Sending webhook message");
        let response = reqwest::Client::new()
            .post(&self.url)
            .json(&json!({ "content": content }))
            .send()
            .await?;

        let result = DeliveryResult {
            ok: response.status().is_success(),
            status: response.status().as_u16(),
        };
        info!(ok = result.ok, status = result.status, "Webhook delivery finished");

        Ok(result)
    }
}
