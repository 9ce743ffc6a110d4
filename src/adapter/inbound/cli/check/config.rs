use std::path::Path;

use crate::adapter::inbound::cli::output;
use crate::error::Result;
use crate::infrastructure::config::Config;

/// Validate the configuration file without starting the pipeline.
pub fn execute<P: AsRef<Path>>(config_path: P) -> Result<()> {
    let path = config_path.as_ref();
    let config = Config::load(path)?;

    output::section("Configuration Check");
    output::field("Config", path.display());
    output::success("Configuration file is valid");

    output::section("Summary");
    output::field("Traders", config.traders.len());
    output::field("Poll interval", format!("{}ms", config.poll_interval_ms));
    output::field("Window", format!("{}ms", config.aggregation.window_ms));
    output::field("Attempts", config.aggregation.delivery_attempts);
    output::field("Data API", &config.data_api.base_url);
    output::field("Database", &config.database);
    output::field("Dry run", config.dry_run);

    output::section("Traders");
    for trader in &config.traders {
        output::field(&trader.name, &trader.address);
    }

    output::section("Notifications");
    if config.discord.is_configured() {
        output::success("Discord webhook configured");
    } else if config.discord.enabled {
        output::warning("Discord enabled but DISCORD_WEBHOOK_URL is not set");
    } else {
        output::field("Discord", "disabled");
    }

    if config.telegram.is_configured() {
        output::success("Telegram integration configured");
    } else if config.telegram.enabled {
        output::warning("Telegram enabled but not usable");
        if config.telegram.bot_token.is_none() {
            output::field("Missing", "TELEGRAM_BOT_TOKEN");
        }
        if config.telegram.chat_id.is_none() {
            output::field("Missing", "TELEGRAM_CHAT_ID");
        }
        if !cfg!(feature = "telegram") {
            output::field("Missing", "telegram feature");
        }
    } else {
        output::field("Telegram", "disabled");
    }

    output::success("Configuration check complete");
    Ok(())
}
