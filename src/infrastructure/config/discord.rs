//! Discord notification configuration.

use serde::Deserialize;

const fn default_true() -> bool {
    true
}

/// `[discord]` section.
///
/// The webhook URL is a secret and is only ever read from the environment.
#[derive(Debug, Clone, Deserialize)]
pub struct DiscordAppConfig {
    /// Enable Discord notifications when a webhook URL is present.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Value of `DISCORD_WEBHOOK_URL`, filled in after parsing.
    #[serde(skip)]
    pub webhook_url: Option<String>,
}

impl DiscordAppConfig {
    /// Enabled and a webhook URL is available.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.enabled && self.webhook_url.is_some()
    }
}

impl Default for DiscordAppConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            webhook_url: None,
        }
    }
}
