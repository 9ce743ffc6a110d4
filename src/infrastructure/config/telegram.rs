//! Telegram notification configuration.

use serde::Deserialize;

/// `[telegram]` section.
///
/// Credentials come from `TELEGRAM_BOT_TOKEN` and `TELEGRAM_CHAT_ID`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TelegramAppConfig {
    /// Enable telegram notifications.
    #[serde(default)]
    pub enabled: bool,
    #[serde(skip)]
    pub bot_token: Option<String>,
    /// Raw chat ID as read from the environment; validated as an integer.
    #[serde(skip)]
    pub chat_id: Option<String>,
}

impl TelegramAppConfig {
    /// Enabled, built with the `telegram` feature, and both credentials present.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        cfg!(feature = "telegram")
            && self.enabled
            && self.bot_token.is_some()
            && self.chat_id().is_some()
    }

    /// Parsed chat ID, if present and numeric.
    #[must_use]
    pub fn chat_id(&self) -> Option<i64> {
        self.chat_id.as_deref().and_then(|id| id.parse().ok())
    }
}
