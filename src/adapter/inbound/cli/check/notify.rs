use std::path::Path;

use crate::adapter::inbound::cli::output;
use crate::error::{Error, Result};
use crate::infrastructure::bootstrap::{build_notifier_registry, sample_trade};
use crate::infrastructure::config::Config;

/// Send one sample alert through every configured sink.
pub async fn execute<P: AsRef<Path>>(config_path: P) -> Result<()> {
    let config = Config::load(config_path)?;
    let registry = build_notifier_registry(&config);

    output::section("Notification Check");
    if registry.is_empty() {
        output::warning("No alert sinks configured");
        return Ok(());
    }
    output::field("Sinks", registry.names().join(", "));

    let Some(trade) = sample_trade(&config) else {
        return Ok(());
    };

    let failures = registry.notify_all(&trade).await;
    if failures > 0 {
        return Err(Error::Notification(format!(
            "{failures} of {} sinks failed to deliver the sample alert",
            registry.len()
        )));
    }

    output::success("Sample alert delivered");
    Ok(())
}
