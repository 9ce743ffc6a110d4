//! Discord webhook notifier.
//!
//! Posts one embed per consolidated trade:
//!
//! ```json
//! {"embeds":[{"author":{"name":"whale","url":"https://polymarket.com/@whale"},
//!   "title":"Will it rain?","url":"https://polymarket.com/event/weather",
//!   "description":"📈 ...","color":65280,"timestamp":"2024-06-01T12:00:00.000Z"}]}
//! ```

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::Client as HttpClient;
use serde::Serialize;
use tracing::{debug, warn};

use super::render::{render, RenderedAlert};
use crate::domain::ConsolidatedTrade;
use crate::error::{Error, Result};
use crate::port::Notifier;

/// Environment variable holding the webhook URL. Read by the config loader.
pub const WEBHOOK_ENV: &str = "DISCORD_WEBHOOK_URL";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Configuration for the Discord notifier.
#[derive(Debug, Clone)]
pub struct DiscordConfig {
    pub webhook_url: String,
}

#[derive(Debug, Serialize)]
pub struct WebhookPayload {
    pub embeds: Vec<Embed>,
}

#[derive(Debug, Serialize)]
pub struct Embed {
    pub author: EmbedAuthor,
    pub title: String,
    pub url: String,
    pub description: String,
    pub color: u32,
    pub timestamp: String,
}

#[derive(Debug, Serialize)]
pub struct EmbedAuthor {
    pub name: String,
    pub url: String,
}

impl WebhookPayload {
    #[must_use]
    pub fn from_alert(alert: &RenderedAlert, at: DateTime<Utc>) -> Self {
        Self {
            embeds: vec![Embed {
                author: EmbedAuthor {
                    name: alert.author_name.clone(),
                    url: alert.author_url.clone(),
                },
                title: alert.title.clone(),
                url: alert.url.clone(),
                description: alert.description(),
                color: alert.tone.color(),
                timestamp: at.to_rfc3339_opts(SecondsFormat::Millis, true),
            }],
        }
    }
}

/// Sends alerts to a Discord channel through an incoming webhook.
pub struct DiscordNotifier {
    http: HttpClient,
    webhook_url: String,
}

impl DiscordNotifier {
    #[must_use]
    pub fn new(config: DiscordConfig) -> Self {
        let http = HttpClient::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|err| {
                warn!(error = %err, "Failed to build HTTP client, using defaults");
                HttpClient::new()
            });

        Self {
            http,
            webhook_url: config.webhook_url,
        }
    }
}

#[async_trait]
impl Notifier for DiscordNotifier {
    async fn notify(&self, trade: &ConsolidatedTrade) -> Result<()> {
        let payload = WebhookPayload::from_alert(&render(trade), Utc::now());

        let response = self
            .http
            .post(&self.webhook_url)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Notification(format!(
                "discord webhook returned {status}: {body}"
            )));
        }

        debug!(tx = %trade.latest.transaction_hash, "Discord alert sent");
        Ok(())
    }

    fn name(&self) -> &'static str {
        "discord"
    }
}
