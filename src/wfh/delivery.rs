use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use tracing::{debug, warn};

use crate::errors::DeliveryError;

pub const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// Posts rendered responses to Slack's `response_url`. No retries: a
/// `response_url` is single-use and Slack expires it after a few minutes.
#[derive(Debug, Clone)]
pub struct Deliverer {
    client: Client,
}

impl Deliverer {
    pub fn new(timeout: Duration) -> Result<Self, DeliveryError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }

    pub async fn deliver(&self, response_url: &str, payload: String) -> Result<(), DeliveryError> {
        if response_url.is_empty() {
            return Err(DeliveryError::MissingUrl);
        }

        let response = self
            .client
            .post(response_url)
            .header(CONTENT_TYPE, JSON_CONTENT_TYPE)
            .body(payload)
            .send()
            .await?;

        let status = response.status();
        // Drain so the connection can go back to the pool.
        if let Err(error) = response.bytes().await {
            debug!(%error, "failed to drain response_url body");
        }

        if !status.is_success() {
            return Err(DeliveryError::Status(status));
        }

        debug!(%status, "delivered response");
        Ok(())
    }

    /// Delivers and logs failures instead of returning them; the slash
    /// command has already been answered by the time this runs.
    pub async fn deliver_and_log(&self, response_url: &str, payload: String) {
        if let Err(error) = self.deliver(response_url, payload).await {
            warn!(%error, "failed to deliver response to Slack");
        }
    }
}
