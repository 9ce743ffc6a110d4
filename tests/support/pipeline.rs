use std::sync::Arc;
use std::time::Duration;

use fillwatch::application::{Monitor, MonitorConfig, TradeAggregator};
use fillwatch::domain::Trader;
use fillwatch::port::NotifierRegistry;
use fillwatch::testkit::dedup::MemoryDedupStore;
use fillwatch::testkit::gateway::ScriptedGateway;
use fillwatch::testkit::notifier::RecordingNotifier;
use fillwatch::testkit::scheduler::ManualScheduler;

pub const WINDOW: Duration = Duration::from_secs(5);

/// Monitor and aggregator wired to in-memory fakes.
pub struct Harness {
    pub monitor: Monitor,
    pub aggregator: TradeAggregator,
    pub gateway: ScriptedGateway,
    pub dedup: MemoryDedupStore,
    pub scheduler: Arc<ManualScheduler>,
    pub recorder: RecordingNotifier,
}

impl Harness {
    pub fn new(traders: Vec<Trader>, gateway: ScriptedGateway) -> Self {
        Self::with_dedup(traders, gateway, MemoryDedupStore::new())
    }

    pub fn with_dedup(traders: Vec<Trader>, gateway: ScriptedGateway, dedup: MemoryDedupStore) -> Self {
        let scheduler = Arc::new(ManualScheduler::new());
        let recorder = RecordingNotifier::new();
        let mut registry = NotifierRegistry::new();
        registry.register(Box::new(recorder.clone()));

        let aggregator = TradeAggregator::new(WINDOW, scheduler.clone(), Arc::new(registry));
        let monitor = Monitor::new(
            traders,
            Arc::new(gateway.clone()),
            Arc::new(dedup.clone()),
            aggregator.clone(),
            MonitorConfig {
                poll_interval: Duration::from_millis(10),
                ..MonitorConfig::default()
            },
        );

        Self {
            monitor,
            aggregator,
            gateway,
            dedup,
            scheduler,
            recorder,
        }
    }
}
