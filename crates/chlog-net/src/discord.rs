//! Discord webhook transport

use crate::{user_agent, REQUEST_TIMEOUT};
use chlog_core::delivery::{WebhookPayload, WebhookResponse, WebhookTransport};
use chlog_core::errors::{ExError, RelayError, Result};
use chlog_core_types::Sensitive;
use reqwest::blocking::Client;
use reqwest::header::RETRY_AFTER;
use reqwest::Url;
use tracing::debug;

/// Executes a Discord webhook
///
/// The webhook URL embeds its own secret, so it is kept wrapped and
/// stripped from every transport error.
#[derive(Debug, Clone)]
pub struct DiscordWebhook {
    http: Client,
    url: Sensitive<Url>,
}

impl DiscordWebhook {
    /// # Errors
    ///
    /// Returns `InvalidConfig` when the URL does not parse or is not http(s).
    pub fn new(url: &Sensitive<String>) -> Result<Self> {
        let invalid = |reason: String| {
            ExError::from(RelayError::InvalidConfig {
                name: "DISCORD_WEBHOOK_URL".to_string(),
                reason,
            })
        };
        // Url parse errors never include the input text.
        let parsed = Url::parse(url.expose().trim()).map_err(|e| invalid(e.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(invalid(format!("unsupported scheme '{}'", parsed.scheme())));
        }

        let http = Client::builder()
            .user_agent(user_agent())
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| invalid(e.to_string()))?;

        Ok(Self {
            http,
            url: Sensitive::new(parsed),
        })
    }
}

impl WebhookTransport for DiscordWebhook {
    fn post(&self, payload: &WebhookPayload) -> Result<WebhookResponse> {
        let response = self
            .http
            .post(self.url.expose().clone())
            .json(payload)
            .send()
            .map_err(|e| {
                ExError::from(RelayError::WebhookTransport {
                    reason: e.without_url().to_string(),
                })
            })?;

        let status = response.status().as_u16();
        let retry_after_header = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response.text().unwrap_or_default();
        debug!(status, body_len = body.len(), "webhook answered");

        Ok(WebhookResponse {
            status,
            body,
            retry_after_header,
        })
    }
}
