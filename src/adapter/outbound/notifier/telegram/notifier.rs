//! Telegram alert delivery.
//!
//! Requires the `telegram` feature to be enabled.

use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::ParseMode;
use tracing::{debug, info};

use super::format::format_alert_message;
use crate::adapter::outbound::notifier::render::render;
use crate::domain::ConsolidatedTrade;
use crate::error::{Error, Result};
use crate::port::Notifier;

/// Configuration for the Telegram notifier.
#[derive(Debug, Clone)]
pub struct TelegramConfig {
    /// Bot API token obtained from BotFather.
    pub bot_token: String,
    /// Target chat ID for notifications.
    pub chat_id: i64,
}

/// Sends alerts to a Telegram chat.
pub struct TelegramNotifier {
    bot: Bot,
    chat_id: ChatId,
}

impl TelegramNotifier {
    #[must_use]
    pub fn new(config: TelegramConfig) -> Self {
        info!(chat_id = config.chat_id, "Telegram notifier enabled");
        Self {
            bot: Bot::new(&config.bot_token),
            chat_id: ChatId(config.chat_id),
        }
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn notify(&self, trade: &ConsolidatedTrade) -> Result<()> {
        let text = format_alert_message(&render(trade));

        self.bot
            .send_message(self.chat_id, text)
            .parse_mode(ParseMode::MarkdownV2)
            .await
            .map_err(|e| Error::Notification(format!("telegram: {e}")))?;

        debug!(tx = %trade.latest.transaction_hash, "Telegram alert sent");
        Ok(())
    }

    fn name(&self) -> &'static str {
        "telegram"
    }
}
