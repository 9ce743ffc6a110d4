//! Handler for the `run` command.

use crate::adapter::inbound::cli::command::RunArgs;
use crate::adapter::inbound::cli::output;
use crate::error::Result;
use crate::infrastructure::bootstrap;
use crate::infrastructure::config::Config;

/// Execute the run command.
pub async fn execute(args: &RunArgs) -> Result<()> {
    let config = Config::load_with(&args.config, &args.overrides())?;
    config.init_logging();

    if !config.logging.is_json() && !output::is_quiet() {
        print_startup(&config);
    }

    bootstrap::run(&config).await
}

fn print_startup(config: &Config) {
    output::header(env!("CARGO_PKG_VERSION"));
    output::field("Traders", config.traders.len());
    output::field("Poll interval", format!("{}ms", config.poll_interval_ms));
    output::field("Window", format!("{}ms", config.aggregation.window_ms));
    output::field("Database", &config.database);

    let mut sinks = config.sink_names();
    if config.dry_run {
        sinks.push("log");
    }
    output::field("Sinks", sinks.join(", "));
    if config.dry_run {
        output::warning("Dry run: alerts are logged");
    }
    println!();
}
