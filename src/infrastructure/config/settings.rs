//! Application configuration loading and validation.
//!
//! Provides the main [`Config`] struct that aggregates all settings. The file
//! is TOML; secrets (webhook URL, bot token) are read from the environment
//! only and never from the file.
//!
//! # Example
//!
//! ```no_run
//! use fillwatch::infrastructure::config::settings::Config;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load("config.toml")?;
//!     config.init_logging();
//!     Ok(())
//! }
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use url::Url;

use super::aggregation::AggregationConfig;
use super::discord::DiscordAppConfig;
use super::logging::LoggingConfig;
use super::telegram::TelegramAppConfig;
use crate::adapter::outbound::notifier::discord::WEBHOOK_ENV;
use crate::adapter::outbound::polymarket::DataApiConfig;
use crate::domain::{is_valid_address, Trader};
use crate::error::{ConfigError, Result};

/// Polling faster than this hammers the Data API for no benefit.
pub const MIN_POLL_INTERVAL_MS: u64 = 100;

const BOT_TOKEN_ENV: &str = "TELEGRAM_BOT_TOKEN";
const CHAT_ID_ENV: &str = "TELEGRAM_CHAT_ID";

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Traders listed inline as `[[traders]]`.
    #[serde(default)]
    pub traders: Vec<Trader>,
    /// Optional JSON file with more traders, relative to the config file.
    #[serde(default)]
    pub traders_file: Option<PathBuf>,
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    /// SQLite file holding processed transaction hashes.
    #[serde(default = "default_database_path")]
    pub database: String,
    /// Public site used for profile and market links.
    #[serde(default = "default_site_url")]
    pub site_url: String,
    #[serde(default)]
    pub data_api: DataApiConfig,
    #[serde(default)]
    pub aggregation: AggregationConfig,
    #[serde(default)]
    pub discord: DiscordAppConfig,
    #[serde(default)]
    pub telegram: TelegramAppConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Log alerts instead of requiring a delivery sink.
    #[serde(default)]
    pub dry_run: bool,
}

const fn default_poll_interval_ms() -> u64 {
    1_000
}

fn default_database_path() -> String {
    "data/trades.db".into()
}

fn default_site_url() -> String {
    "https://polymarket.com".into()
}

/// Command-line values that take precedence over the file.
#[derive(Debug, Clone, Default)]
pub struct RunOverrides {
    pub poll_interval_ms: Option<u64>,
    pub log_level: Option<String>,
    pub json_logs: bool,
    pub dry_run: bool,
}

/// Trimmed, non-empty environment variable.
fn env_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

impl Config {
    /// Parse and validate configuration from a TOML string.
    ///
    /// Secrets are read from the process environment. A relative
    /// `traders_file` is resolved against the working directory.
    pub fn parse_toml(content: &str) -> Result<Self> {
        let config = Self::from_toml_str(content, None, env_var)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate configuration from a file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::load_with(path, &RunOverrides::default())
    }

    /// Load configuration from a file, apply command-line overrides, then
    /// validate the result.
    pub fn load_with<P: AsRef<Path>>(path: P, overrides: &RunOverrides) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        let mut config = Self::from_toml_str(&content, path.parent(), env_var)?;
        config.apply_overrides(overrides);
        config.validate()?;
        Ok(config)
    }

    /// Parse without validating.
    ///
    /// `env` supplies secrets by variable name. The traders file, if any, is
    /// read and merged after the inline traders.
    pub fn from_toml_str<F>(content: &str, base_dir: Option<&Path>, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;

        config.discord.webhook_url = env(WEBHOOK_ENV);
        config.telegram.bot_token = env(BOT_TOKEN_ENV);
        config.telegram.chat_id = env(CHAT_ID_ENV);

        if let Some(file) = &config.traders_file {
            let path = match base_dir {
                Some(dir) if file.is_relative() => dir.join(file),
                _ => file.clone(),
            };
            let extra = read_traders_file(&path)?;
            config.traders.extend(extra);
        }

        Ok(config)
    }

    pub fn apply_overrides(&mut self, overrides: &RunOverrides) {
        if let Some(interval) = overrides.poll_interval_ms {
            self.poll_interval_ms = interval;
        }
        if let Some(level) = &overrides.log_level {
            self.logging.level.clone_from(level);
        }
        if overrides.json_logs {
            self.logging.format = "json".into();
        }
        if overrides.dry_run {
            self.dry_run = true;
        }
    }

    /// Reject configurations the pipeline cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.traders.is_empty() {
            return Err(ConfigError::MissingField { field: "traders" }.into());
        }

        for (index, trader) in self.traders.iter().enumerate() {
            if trader.name.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: "traders",
                    reason: format!("trader #{} has no name", index + 1),
                }
                .into());
            }
            if trader.address.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: "traders",
                    reason: format!("trader {} has no address", trader.name),
                }
                .into());
            }
            if !is_valid_address(&trader.address) {
                return Err(ConfigError::InvalidValue {
                    field: "traders",
                    reason: format!(
                        "trader {} has invalid address {}",
                        trader.name, trader.address
                    ),
                }
                .into());
            }
        }

        if self.poll_interval_ms < MIN_POLL_INTERVAL_MS {
            return Err(ConfigError::InvalidValue {
                field: "poll_interval_ms",
                reason: format!(
                    "must be at least {MIN_POLL_INTERVAL_MS}, got {}",
                    self.poll_interval_ms
                ),
            }
            .into());
        }

        if self.aggregation.window_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "window_ms",
                reason: "must be greater than 0".into(),
            }
            .into());
        }

        if self.aggregation.delivery_attempts == 0 {
            return Err(ConfigError::InvalidValue {
                field: "delivery_attempts",
                reason: "must be at least 1".into(),
            }
            .into());
        }

        if self.data_api.position_page_size == 0 {
            return Err(ConfigError::InvalidValue {
                field: "position_page_size",
                reason: "must be greater than 0".into(),
            }
            .into());
        }

        if self.data_api.base_url.trim().is_empty() {
            return Err(ConfigError::MissingField { field: "base_url" }.into());
        }
        if let Err(e) = Url::parse(&self.data_api.base_url) {
            return Err(ConfigError::InvalidValue {
                field: "base_url",
                reason: e.to_string(),
            }
            .into());
        }

        if let Err(e) = Url::parse(&self.site_url) {
            return Err(ConfigError::InvalidValue {
                field: "site_url",
                reason: e.to_string(),
            }
            .into());
        }

        if self.database.trim().is_empty() {
            return Err(ConfigError::MissingField { field: "database" }.into());
        }

        if self.discord.enabled {
            if let Some(webhook) = &self.discord.webhook_url {
                if let Err(e) = Url::parse(webhook) {
                    return Err(ConfigError::InvalidValue {
                        field: WEBHOOK_ENV,
                        reason: e.to_string(),
                    }
                    .into());
                }
            }
        }

        if self.telegram.enabled {
            if let Some(raw) = &self.telegram.chat_id {
                if raw.parse::<i64>().is_err() {
                    return Err(ConfigError::InvalidValue {
                        field: CHAT_ID_ENV,
                        reason: format!("expected an integer chat id, got {raw}"),
                    }
                    .into());
                }
            }
        }

        if !matches!(self.logging.format.as_str(), "pretty" | "json") {
            return Err(ConfigError::InvalidValue {
                field: "format",
                reason: format!("expected pretty or json, got {}", self.logging.format),
            }
            .into());
        }

        if !self.dry_run && self.sink_names().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "notifications",
                reason: format!(
                    "no alert sink configured; set {WEBHOOK_ENV}, enable [telegram], or use --dry-run"
                ),
            }
            .into());
        }

        Ok(())
    }

    /// Initialize logging based on configuration.
    pub fn init_logging(&self) {
        self.logging.init();
    }

    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Alert sinks that will receive alerts, in delivery order.
    #[must_use]
    pub fn sink_names(&self) -> Vec<&'static str> {
        let mut sinks = Vec::new();
        if self.discord.is_configured() {
            sinks.push("discord");
        }
        if self.telegram.is_configured() {
            sinks.push("telegram");
        }
        sinks
    }
}

fn read_traders_file(path: &Path) -> Result<Vec<Trader>> {
    let content = fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
    let traders = serde_json::from_str(&content).map_err(ConfigError::TradersFile)?;
    Ok(traders)
}
