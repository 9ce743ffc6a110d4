//! Polling loop that turns upstream activity into buffered fills.
//!
//! Each cycle walks the configured traders in order, keeps the activity
//! records whose transaction hash has not been seen, enriches them with the
//! trader's positions, hands them to the [`TradeAggregator`] and marks them
//! processed.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tracing::{debug, error, info, warn};

use crate::application::aggregator::TradeAggregator;
use crate::domain::{PositionSnapshot, TradeEvent, Trader};
use crate::error::{Error, Result};
use crate::port::{ActivityGateway, ActivityRecord, DedupStore};

/// Default number of positions requested per page.
pub const DEFAULT_POSITION_PAGE_SIZE: usize = 100;

/// Lifecycle of a [`Monitor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorState {
    Stopped,
    Running,
    /// Stop requested; the current cycle and sleep finish first.
    Stopping,
}

/// Runtime settings for the monitor loop.
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    pub poll_interval: Duration,
    pub position_page_size: usize,
    /// Base URL used to build profile and market links.
    pub site_url: String,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(1),
            position_page_size: DEFAULT_POSITION_PAGE_SIZE,
            site_url: "https://polymarket.com".into(),
        }
    }
}

/// Cloneable handle used to observe and stop a running monitor.
#[derive(Debug, Clone)]
pub struct MonitorHandle {
    state: Arc<Mutex<MonitorState>>,
}

impl MonitorHandle {
    /// Request a cooperative stop. No-op unless the monitor is running.
    pub fn stop(&self) {
        let mut state = self.state.lock();
        if *state == MonitorState::Running {
            *state = MonitorState::Stopping;
            info!("Monitor stop requested");
        }
    }

    #[must_use]
    pub fn state(&self) -> MonitorState {
        *self.state.lock()
    }
}

/// Polls every trader, dedups their fills and feeds the aggregator.
pub struct Monitor {
    traders: Vec<Trader>,
    gateway: Arc<dyn ActivityGateway>,
    dedup: Arc<dyn DedupStore>,
    aggregator: TradeAggregator,
    config: MonitorConfig,
    state: Arc<Mutex<MonitorState>>,
}

impl Monitor {
    #[must_use]
    pub fn new(
        traders: Vec<Trader>,
        gateway: Arc<dyn ActivityGateway>,
        dedup: Arc<dyn DedupStore>,
        aggregator: TradeAggregator,
        config: MonitorConfig,
    ) -> Self {
        Self {
            traders,
            gateway,
            dedup,
            aggregator,
            config,
            state: Arc::new(Mutex::new(MonitorState::Stopped)),
        }
    }

    #[must_use]
    pub fn handle(&self) -> MonitorHandle {
        MonitorHandle {
            state: Arc::clone(&self.state),
        }
    }

    #[must_use]
    pub fn state(&self) -> MonitorState {
        *self.state.lock()
    }

    #[must_use]
    pub fn traders(&self) -> &[Trader] {
        &self.traders
    }

    /// Run the polling loop until [`MonitorHandle::stop`] is called.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AlreadyRunning`] if the monitor is not stopped, or the
    /// dedup store's error if it fails. Upstream failures are never returned.
    pub async fn run(&self) -> Result<()> {
        {
            let mut state = self.state.lock();
            if *state != MonitorState::Stopped {
                return Err(Error::AlreadyRunning);
            }
            *state = MonitorState::Running;
        }

        info!(
            traders = self.traders.len(),
            poll_interval_ms = self.config.poll_interval.as_millis() as u64,
            window_ms = self.aggregator.window().as_millis() as u64,
            gateway = self.gateway.gateway_name(),
            "Monitor started"
        );

        let result = self.run_loop().await;
        *self.state.lock() = MonitorState::Stopped;

        match &result {
            Ok(()) => info!("Monitor stopped"),
            Err(e) => error!(error = %e, "Monitor aborted"),
        }
        result
    }

    async fn run_loop(&self) -> Result<()> {
        while self.state() == MonitorState::Running {
            self.poll_once().await?;
            tokio::time::sleep(self.config.poll_interval).await;
        }
        Ok(())
    }

    /// Run one cycle over every trader without sleeping.
    ///
    /// Returns the number of fills submitted to the aggregator.
    ///
    /// # Errors
    ///
    /// Only dedup store failures are returned.
    pub async fn poll_once(&self) -> Result<usize> {
        let mut submitted = 0;
        for trader in &self.traders {
            submitted += self.poll_trader(trader).await?;
        }
        Ok(submitted)
    }

    async fn poll_trader(&self, trader: &Trader) -> Result<usize> {
        let records = match self.gateway.fetch_activity(&trader.address).await {
            Ok(records) => records,
            Err(e) => {
                warn!(trader = %trader.name, error = %e, "Failed to fetch activity");
                return Ok(0);
            }
        };

        // Check every hash before marking any, so fills sharing a hash in
        // one response are all kept.
        let mut fresh = Vec::new();
        for record in records.into_iter().filter(ActivityRecord::is_trade) {
            if !self.dedup.is_processed(&record.transaction_hash)? {
                fresh.push(record);
            }
        }

        if fresh.is_empty() {
            return Ok(0);
        }

        let positions = match fetch_all_positions(
            self.gateway.as_ref(),
            &trader.address,
            self.config.position_page_size,
        )
        .await
        {
            Ok(positions) => positions,
            Err(e) => {
                warn!(trader = %trader.name, error = %e, "Failed to fetch positions");
                Vec::new()
            }
        };

        debug!(
            trader = %trader.name,
            fills = fresh.len(),
            positions = positions.len(),
            "New activity"
        );

        let count = fresh.len();
        for record in fresh {
            let event = build_event(trader, &record, &positions, &self.config.site_url);
            info!(
                trader = %trader.name,
                side = %event.side,
                amount = %event.amount.round_dp(2),
                market = %event.market,
                tx = %event.transaction_hash,
                "New fill"
            );
            self.aggregator.submit(event);
            self.dedup.mark_processed(&record.transaction_hash)?;
        }

        Ok(count)
    }
}

/// Fetch every position page for `address`.
///
/// Requests pages at offsets `0, page_size, 2 * page_size, ...` and stops at
/// the first page shorter than `page_size`.
///
/// # Errors
///
/// Returns the first page error; partial results are discarded.
pub async fn fetch_all_positions(
    gateway: &dyn ActivityGateway,
    address: &str,
    page_size: usize,
) -> Result<Vec<PositionSnapshot>> {
    let mut all = Vec::new();
    let mut offset = 0;

    loop {
        let page = gateway.fetch_positions(address, page_size, offset).await?;
        let len = page.len();
        all.extend(page);

        if len < page_size || len == 0 {
            return Ok(all);
        }
        offset += page_size;
    }
}

/// Build a fill from an activity record and the trader's positions.
///
/// Only positions in the record's event are attached. A record without an
/// event slug gets none.
#[must_use]
pub fn build_event(
    trader: &Trader,
    record: &ActivityRecord,
    positions: &[PositionSnapshot],
    site_url: &str,
) -> TradeEvent {
    let site = site_url.trim_end_matches('/');
    let positions = if record.event_slug.is_empty() {
        Vec::new()
    } else {
        positions
            .iter()
            .filter(|p| p.event_slug == record.event_slug)
            .cloned()
            .collect()
    };

    TradeEvent {
        trader_name: trader.name.clone(),
        trader_address: trader.address.clone(),
        trader_profile_url: trader.profile_url(site),
        side: record.side,
        shares: record.size,
        amount: record.usdc_size,
        price: record.price,
        market: record.title.clone(),
        market_url: format!("{site}/event/{}", record.event_slug),
        outcome: record.outcome.clone(),
        condition_id: record.condition_id.clone(),
        event_slug: record.event_slug.clone(),
        transaction_hash: record.transaction_hash.clone(),
        positions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::aggregator::DEFAULT_WINDOW;
    use crate::domain::Side;
    use crate::port::NotifierRegistry;
    use crate::testkit::dedup::MemoryDedupStore;
    use crate::testkit::domain::{activity, position_in_event, trader};
    use crate::testkit::gateway::ScriptedGateway;
    use crate::testkit::scheduler::ManualScheduler;
    use rust_decimal_macros::dec;

    const ALICE: &str = "0x1111111111111111111111111111111111111111";
    const BOB: &str = "0x2222222222222222222222222222222222222222";

    fn monitor(gateway: ScriptedGateway, dedup: MemoryDedupStore) -> (Monitor, TradeAggregator) {
        let aggregator = TradeAggregator::new(
            DEFAULT_WINDOW,
            Arc::new(ManualScheduler::new()),
            Arc::new(NotifierRegistry::new()),
        );
        let monitor = Monitor::new(
            vec![trader(ALICE, "alice"), trader(BOB, "bob")],
            Arc::new(gateway),
            Arc::new(dedup),
            aggregator.clone(),
            MonitorConfig::default(),
        );
        (monitor, aggregator)
    }

    #[tokio::test]
    async fn new_fills_are_submitted_and_marked() {
        let gateway = ScriptedGateway::new()
            .with_activity(ALICE, vec![activity("0xt1", "cond", Side::Buy, dec!(10), dec!(4))]);
        let dedup = MemoryDedupStore::new();
        let (monitor, aggregator) = monitor(gateway, dedup.clone());

        assert_eq!(monitor.poll_once().await.unwrap(), 1);
        assert_eq!(aggregator.pending_fills(), 1);
        assert!(dedup.contains("0xt1"));

        assert_eq!(monitor.poll_once().await.unwrap(), 0);
        assert_eq!(aggregator.pending_fills(), 1);
    }

    #[tokio::test]
    async fn non_trade_records_are_ignored() {
        let mut redeem = activity("0xr1", "cond", Side::Buy, dec!(1), dec!(1));
        redeem.kind = "REDEEM".into();
        let gateway = ScriptedGateway::new().with_activity(ALICE, vec![redeem]);
        let (monitor, aggregator) = monitor(gateway, MemoryDedupStore::new());

        assert_eq!(monitor.poll_once().await.unwrap(), 0);
        assert_eq!(aggregator.pending_fills(), 0);
    }

    #[tokio::test]
    async fn shared_hash_in_one_response_keeps_every_record() {
        let gateway = ScriptedGateway::new().with_activity(
            ALICE,
            vec![
                activity("0xdup", "cond", Side::Buy, dec!(1), dec!(0.5)),
                activity("0xdup", "cond", Side::Buy, dec!(2), dec!(1)),
            ],
        );
        let dedup = MemoryDedupStore::new();
        let (monitor, aggregator) = monitor(gateway, dedup.clone());

        assert_eq!(monitor.poll_once().await.unwrap(), 2);
        assert_eq!(aggregator.pending_fills(), 2);
        assert_eq!(dedup.marked(), vec!["0xdup", "0xdup"]);
    }

    #[tokio::test]
    async fn positions_are_filtered_by_event_slug() {
        let gateway = ScriptedGateway::new()
            .with_activity(ALICE, vec![activity("0xt1", "cond", Side::Buy, dec!(10), dec!(4))])
            .with_positions(
                ALICE,
                vec![
                    position_in_event("cond", "event-cond", "Yes", dec!(10)),
                    position_in_event("other", "elsewhere", "No", dec!(5)),
                ],
            );
        let records = gateway.activity_for(ALICE);
        let positions = fetch_all_positions(&gateway, ALICE, 100).await.unwrap();

        let event = build_event(
            &trader(ALICE, "alice"),
            &records[0],
            &positions,
            "https://polymarket.com/",
        );

        assert_eq!(event.positions.len(), 1);
        assert_eq!(event.positions[0].condition_id, "cond");
        assert_eq!(event.market_url, "https://polymarket.com/event/event-cond");
        assert_eq!(event.trader_profile_url, "https://polymarket.com/@alice");
    }

    #[tokio::test]
    async fn missing_event_slug_attaches_no_positions() {
        let mut record = activity("0xt1", "cond", Side::Buy, dec!(10), dec!(4));
        record.event_slug.clear();
        let orphan = position_in_event("cond", "", "Yes", dec!(10));

        let event = build_event(&trader(ALICE, "alice"), &record, &[orphan], "https://x.test");

        assert!(event.positions.is_empty());
    }

    #[tokio::test]
    async fn position_failure_still_submits_fills() {
        let gateway = ScriptedGateway::new()
            .with_activity(ALICE, vec![activity("0xt1", "cond", Side::Sell, dec!(3), dec!(1))])
            .failing_positions(ALICE);
        let (monitor, aggregator) = monitor(gateway, MemoryDedupStore::new());

        assert_eq!(monitor.poll_once().await.unwrap(), 1);
        assert_eq!(aggregator.pending_fills(), 1);
    }

    #[tokio::test]
    async fn second_run_is_rejected() {
        let (monitor, _aggregator) = monitor(ScriptedGateway::new(), MemoryDedupStore::new());
        *monitor.state.lock() = MonitorState::Running;

        assert!(matches!(monitor.run().await, Err(Error::AlreadyRunning)));
    }

    #[test]
    fn stop_is_ignored_when_not_running() {
        let (monitor, _aggregator) = monitor(ScriptedGateway::new(), MemoryDedupStore::new());
        let handle = monitor.handle();

        handle.stop();

        assert_eq!(handle.state(), MonitorState::Stopped);
    }
}
