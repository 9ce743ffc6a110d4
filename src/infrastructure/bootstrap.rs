//! Composition root: builds the pipeline from configuration and runs it
//! until a shutdown signal arrives.

use std::future::Future;
use std::sync::Arc;

use rust_decimal_macros::dec;
use tracing::{error, info, warn};

use crate::adapter::outbound::notifier::{DiscordConfig, DiscordNotifier};
#[cfg(feature = "telegram")]
use crate::adapter::outbound::notifier::telegram::{TelegramConfig, TelegramNotifier};
use crate::adapter::outbound::polymarket::DataApiClient;
use crate::adapter::outbound::sqlite::SqliteDedupStore;
use crate::adapter::outbound::TokioScheduler;
use crate::application::{Monitor, MonitorConfig, TradeAggregator};
use crate::domain::{consolidate, ConsolidatedTrade, PositionSnapshot, Side, TradeEvent};
use crate::error::Result;
use crate::infrastructure::config::settings::Config;
use crate::port::{ActivityGateway, DedupStore, LogNotifier, NotifierRegistry, Scheduler};

/// Build the notifier registry from configuration.
///
/// Registers Discord and Telegram when configured, and the log notifier on
/// dry runs. Each sink is retried according to `[aggregation]`.
pub fn build_notifier_registry(config: &Config) -> NotifierRegistry {
    let mut registry = NotifierRegistry::with_policy(config.aggregation.delivery_policy());

    if config.discord.enabled {
        match &config.discord.webhook_url {
            Some(url) => registry.register(Box::new(DiscordNotifier::new(DiscordConfig {
                webhook_url: url.clone(),
            }))),
            None => warn!("Discord enabled but DISCORD_WEBHOOK_URL not set"),
        }
    }

    register_telegram(config, &mut registry);

    if config.dry_run {
        registry.register(Box::new(LogNotifier));
    }

    info!(sinks = ?registry.names(), "Notifier registry built");
    registry
}

#[cfg(feature = "telegram")]
fn register_telegram(config: &Config, registry: &mut NotifierRegistry) {
    if !config.telegram.enabled {
        return;
    }
    match (&config.telegram.bot_token, config.telegram.chat_id()) {
        (Some(bot_token), Some(chat_id)) => {
            registry.register(Box::new(TelegramNotifier::new(TelegramConfig {
                bot_token: bot_token.clone(),
                chat_id,
            })));
        }
        _ => warn!("Telegram enabled but TELEGRAM_BOT_TOKEN or TELEGRAM_CHAT_ID not set"),
    }
}

#[cfg(not(feature = "telegram"))]
fn register_telegram(config: &Config, _registry: &mut NotifierRegistry) {
    if config.telegram.enabled {
        warn!("Telegram enabled but this build lacks the telegram feature");
    }
}

/// Open the dedup database, creating it and running migrations as needed.
pub fn init_dedup_store(config: &Config) -> Result<Arc<dyn DedupStore>> {
    let store = SqliteDedupStore::open(&config.database)?;
    info!(path = %config.database, "Dedup store ready");
    Ok(Arc::new(store))
}

/// A wired pipeline: the monitor and the aggregator it feeds.
pub struct Pipeline {
    pub monitor: Monitor,
    pub aggregator: TradeAggregator,
}

impl Pipeline {
    /// Wire a pipeline from explicit parts.
    #[must_use]
    pub fn assemble(
        config: &Config,
        gateway: Arc<dyn ActivityGateway>,
        dedup: Arc<dyn DedupStore>,
        scheduler: Arc<dyn Scheduler>,
        notifiers: NotifierRegistry,
    ) -> Self {
        let aggregator =
            TradeAggregator::new(config.aggregation.window(), scheduler, Arc::new(notifiers));
        let monitor = Monitor::new(
            config.traders.clone(),
            gateway,
            dedup,
            aggregator.clone(),
            MonitorConfig {
                poll_interval: config.poll_interval(),
                position_page_size: config.data_api.position_page_size,
                site_url: config.site_url.clone(),
            },
        );

        Self {
            monitor,
            aggregator,
        }
    }

    /// Wire the production pipeline: Data API, SQLite, tokio timers.
    pub fn build(config: &Config) -> Result<Self> {
        let dedup = init_dedup_store(config)?;
        let gateway: Arc<dyn ActivityGateway> =
            Arc::new(DataApiClient::from_config(&config.data_api));
        let notifiers = build_notifier_registry(config);

        Ok(Self::assemble(
            config,
            gateway,
            dedup,
            Arc::new(TokioScheduler::new()),
            notifiers,
        ))
    }

    /// Run until `shutdown` resolves or the monitor fails.
    ///
    /// Pending aggregation groups are always drained before returning, also
    /// when the monitor failed; the failure is returned afterwards.
    pub async fn run_until<S>(&self, shutdown: S) -> Result<()>
    where
        S: Future<Output = ()>,
    {
        let handle = self.monitor.handle();
        let monitor = self.monitor.run();
        tokio::pin!(monitor);

        // Monitor first, so it is already running when an early signal stops it.
        let result = tokio::select! {
            biased;
            result = &mut monitor => result,
            () = shutdown => {
                info!("Shutdown signal received");
                handle.stop();
                monitor.await
            }
        };

        if let Err(e) = &result {
            error!(error = %e, "Monitor failed");
        }

        let drained = self.aggregator.drain_all().await;
        info!(groups = drained, "Pipeline stopped");
        result
    }
}

/// Build the production pipeline and run it until SIGINT or SIGTERM.
pub async fn run(config: &Config) -> Result<()> {
    let pipeline = Pipeline::build(config)?;
    pipeline.run_until(shutdown_signal()).await
}

/// Resolves on Ctrl-C, or SIGTERM on unix.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }
}

/// A fixed example alert for `check notify`.
#[must_use]
pub fn sample_trade(config: &Config) -> Option<ConsolidatedTrade> {
    let site = config.site_url.trim_end_matches('/');
    let trader = config.traders.first();
    let name = trader.map_or("fillwatch", |t| t.name.as_str());
    let address = trader.map_or("0x0000000000000000000000000000000000000000", |t| {
        t.address.as_str()
    });

    let event = TradeEvent {
        trader_name: name.to_string(),
        trader_address: address.to_string(),
        trader_profile_url: format!("{site}/@{name}"),
        side: Side::Buy,
        shares: dec!(1500),
        amount: dec!(900),
        price: dec!(0.6),
        market: "fillwatch test alert".into(),
        market_url: format!("{site}/event/fillwatch-test"),
        outcome: "Yes".into(),
        condition_id: "0xtest".into(),
        event_slug: "fillwatch-test".into(),
        transaction_hash: "0xtest".into(),
        positions: vec![PositionSnapshot {
            outcome: "Yes".into(),
            size: dec!(4000),
            avg_price: dec!(0.55),
            current_value: dec!(2400),
            condition_id: "0xtest".into(),
            event_slug: "fillwatch-test".into(),
            title: "fillwatch test alert".into(),
        }],
    };

    consolidate(&[event])
}
