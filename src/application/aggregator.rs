//! Time-windowed aggregation of trade fills.
//!
//! A large order is often filled in many small pieces within a few seconds.
//! The [`TradeAggregator`] buffers fills by [`AggregationKey`] and emits one
//! [`ConsolidatedTrade`](crate::domain::ConsolidatedTrade) per key once the window closes.
//!
//! # Flush policy
//!
//! The window is anchored at the **first** fill of a group and is never reset
//! by later fills. A burst that keeps going is still alerted no later than one
//! window after it started; the next fill after the flush opens a new group.
//!
//! ```text
//! t=0    fill A  -> new group, timer armed for t=W
//! t=2    fill B  -> appended, timer unchanged
//! t=W    timer   -> group removed, A+B consolidated and delivered
//! t=W+1  fill C  -> new group, timer armed for t=2W+1
//! ```

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;

use futures_util::FutureExt;
use parking_lot::Mutex;
use tokio::sync::Notify;
use tracing::{debug, info, trace};

use crate::domain::{consolidate, AggregationKey, TradeEvent};
use crate::port::{NotifierRegistry, Scheduler, TimerHandle};

/// Default aggregation window.
pub const DEFAULT_WINDOW: Duration = Duration::from_secs(5);

/// Fills buffered under one key, plus the timer that will flush them.
struct BufferedGroup {
    /// Distinguishes this group from later groups under the same key.
    generation: u64,
    fills: Vec<TradeEvent>,
    timer: TimerHandle,
}

struct Inner {
    window: Duration,
    groups: Mutex<HashMap<AggregationKey, BufferedGroup>>,
    next_generation: AtomicU64,
    /// Timer-fired deliveries still running.
    in_flight: AtomicUsize,
    idle: Notify,
    scheduler: Arc<dyn Scheduler>,
    notifiers: Arc<NotifierRegistry>,
}

/// Counts one timer-fired delivery; released on completion or abort.
struct InFlight<'a>(&'a Inner);

impl<'a> InFlight<'a> {
    fn enter(inner: &'a Inner) -> Self {
        inner.in_flight.fetch_add(1, Ordering::AcqRel);
        Self(inner)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if self.0.in_flight.fetch_sub(1, Ordering::AcqRel) == 1 {
            self.0.idle.notify_waiters();
        }
    }
}

impl Inner {
    /// Timer callback: flush the group only if it is still the one the timer
    /// was armed for.
    async fn flush_generation(&self, key: &AggregationKey, generation: u64) {
        // Entered under the lock so drain_all sees the group either buffered
        // or in flight.
        let taken = {
            let mut groups = self.groups.lock();
            match groups.get(key) {
                Some(group) if group.generation == generation => {
                    groups.remove(key).map(|group| (group, InFlight::enter(self)))
                }
                _ => None,
            }
        };

        match taken {
            Some((group, _in_flight)) => self.deliver(key, group.fills).await,
            None => trace!(key = %key, generation, "Group already flushed"),
        }
    }

    async fn wait_idle(&self) {
        loop {
            let idle = self.idle.notified();
            if self.in_flight.load(Ordering::Acquire) == 0 {
                return;
            }
            idle.await;
        }
    }

    async fn deliver(&self, key: &AggregationKey, fills: Vec<TradeEvent>) {
        let Some(trade) = consolidate(&fills) else {
            return;
        };

        info!(
            key = %key,
            trader = %trade.latest.trader_name,
            side = %trade.side(),
            fills = trade.fill_count,
            amount = %trade.amount.round_dp(2),
            market = %trade.latest.market,
            "Aggregated fills"
        );

        self.notifiers.notify_all(&trade).await;
    }
}

/// Buffers fills per key and flushes each group once, one window after its
/// first fill.
///
/// Cloning is cheap; clones share the same buffer.
#[derive(Clone)]
pub struct TradeAggregator {
    inner: Arc<Inner>,
}

impl TradeAggregator {
    #[must_use]
    pub fn new(
        window: Duration,
        scheduler: Arc<dyn Scheduler>,
        notifiers: Arc<NotifierRegistry>,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                window,
                groups: Mutex::new(HashMap::new()),
                next_generation: AtomicU64::new(0),
                in_flight: AtomicUsize::new(0),
                idle: Notify::new(),
                scheduler,
                notifiers,
            }),
        }
    }

    /// The configured aggregation window.
    #[must_use]
    pub fn window(&self) -> Duration {
        self.inner.window
    }

    /// Buffer a fill.
    ///
    /// Appends to the live group for the fill's key, or opens a new group and
    /// arms its flush timer. Never blocks on delivery.
    pub fn submit(&self, event: TradeEvent) {
        let key = event.aggregation_key();
        let mut groups = self.inner.groups.lock();

        match groups.entry(key) {
            Entry::Occupied(mut entry) => {
                let fills = {
                    let group = entry.get_mut();
                    group.fills.push(event);
                    group.fills.len()
                };
                debug!(key = %entry.key(), fills, "Appended fill to pending group");
            }
            Entry::Vacant(entry) => {
                let generation = self.inner.next_generation.fetch_add(1, Ordering::Relaxed);
                let timer = self.arm(entry.key().clone(), generation);
                debug!(key = %entry.key(), generation, "Opened aggregation group");
                entry.insert(BufferedGroup {
                    generation,
                    fills: vec![event],
                    timer,
                });
            }
        }
    }

    fn arm(&self, key: AggregationKey, generation: u64) -> TimerHandle {
        let inner: Weak<Inner> = Arc::downgrade(&self.inner);
        let task = async move {
            if let Some(inner) = inner.upgrade() {
                inner.flush_generation(&key, generation).await;
            }
        }
        .boxed();

        self.inner.scheduler.schedule(self.inner.window, task)
    }

    /// Flush the pending group for `key` now, cancelling its timer.
    ///
    /// Returns `false` if no group was pending.
    pub async fn flush(&self, key: &AggregationKey) -> bool {
        let group = self.inner.groups.lock().remove(key);
        let Some(mut group) = group else {
            return false;
        };

        group.timer.cancel();
        self.inner.deliver(key, group.fills).await;
        true
    }

    /// Flush every pending group immediately and wait for delivery.
    ///
    /// Also waits for groups whose timer already fired and whose delivery is
    /// still running. Used on shutdown so buffered fills are not lost.
    /// Returns the number of groups flushed here.
    pub async fn drain_all(&self) -> usize {
        let pending: Vec<(AggregationKey, BufferedGroup)> =
            self.inner.groups.lock().drain().collect();
        let count = pending.len();

        if count > 0 {
            info!(groups = count, "Draining pending aggregation groups");
        }

        for (key, mut group) in pending {
            group.timer.cancel();
            self.inner.deliver(&key, group.fills).await;
        }

        self.inner.wait_idle().await;
        count
    }

    /// Number of groups waiting for their window to close.
    #[must_use]
    pub fn pending_groups(&self) -> usize {
        self.inner.groups.lock().len()
    }

    /// Number of fills buffered across all groups.
    #[must_use]
    pub fn pending_fills(&self) -> usize {
        self.inner.groups.lock().values().map(|g| g.fills.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Side;
    use crate::testkit::domain::fill;
    use crate::testkit::notifier::RecordingNotifier;
    use crate::testkit::scheduler::ManualScheduler;
    use rust_decimal_macros::dec;

    fn setup() -> (TradeAggregator, Arc<ManualScheduler>, RecordingNotifier) {
        let scheduler = Arc::new(ManualScheduler::new());
        let recorder = RecordingNotifier::new();
        let mut registry = NotifierRegistry::new();
        registry.register(Box::new(recorder.clone()));
        let aggregator =
            TradeAggregator::new(DEFAULT_WINDOW, scheduler.clone(), Arc::new(registry));
        (aggregator, scheduler, recorder)
    }

    #[tokio::test]
    async fn single_fill_flushes_after_window() {
        let (aggregator, scheduler, recorder) = setup();

        aggregator.submit(fill("0xa", "cond", Side::Buy, dec!(10), dec!(5)));
        scheduler.advance(Duration::from_millis(4_999)).await;
        assert_eq!(recorder.len(), 0);

        scheduler.advance(Duration::from_millis(1)).await;
        assert_eq!(recorder.len(), 1);
        assert_eq!(recorder.trades()[0].fill_count, 1);
        assert_eq!(aggregator.pending_groups(), 0);
    }

    #[tokio::test]
    async fn one_timer_per_group() {
        let (aggregator, scheduler, _recorder) = setup();

        aggregator.submit(fill("0xa", "cond", Side::Buy, dec!(1), dec!(0.5)));
        aggregator.submit(fill("0xa", "cond", Side::Buy, dec!(1), dec!(0.5)));
        aggregator.submit(fill("0xa", "cond", Side::Buy, dec!(1), dec!(0.5)));

        assert_eq!(scheduler.pending(), 1);
        assert_eq!(aggregator.pending_fills(), 3);
    }

    #[tokio::test]
    async fn fill_after_flush_opens_new_group() {
        let (aggregator, scheduler, recorder) = setup();

        aggregator.submit(fill("0xa", "cond", Side::Buy, dec!(1), dec!(0.5)));
        scheduler.advance(DEFAULT_WINDOW).await;
        aggregator.submit(fill("0xa", "cond", Side::Buy, dec!(2), dec!(1)));
        scheduler.advance(DEFAULT_WINDOW).await;

        let trades = recorder.trades();
        assert_eq!(trades.len(), 2);
        assert_eq!(trades[0].shares, dec!(1));
        assert_eq!(trades[1].shares, dec!(2));
    }

    #[tokio::test]
    async fn manual_flush_cancels_timer() {
        let (aggregator, scheduler, recorder) = setup();
        let event = fill("0xa", "cond", Side::Sell, dec!(3), dec!(1.5));
        let key = event.aggregation_key();

        aggregator.submit(event);
        assert!(aggregator.flush(&key).await);
        assert!(!aggregator.flush(&key).await);
        scheduler.advance(DEFAULT_WINDOW).await;

        assert_eq!(recorder.len(), 1);
    }

    #[tokio::test]
    async fn stale_timer_does_not_flush_newer_group() {
        // Models a timer that already fired when cancel() ran.
        let scheduler = Arc::new(ManualScheduler::ignoring_cancellation());
        let recorder = RecordingNotifier::new();
        let mut registry = NotifierRegistry::new();
        registry.register(Box::new(recorder.clone()));
        let aggregator =
            TradeAggregator::new(DEFAULT_WINDOW, scheduler.clone(), Arc::new(registry));
        let first = fill("0xa", "cond", Side::Buy, dec!(1), dec!(0.5));
        let key = first.aggregation_key();

        aggregator.submit(first);
        scheduler.advance(Duration::from_secs(1)).await;
        aggregator.flush(&key).await;
        aggregator.submit(fill("0xa", "cond", Side::Buy, dec!(2), dec!(1)));

        scheduler.advance(Duration::from_secs(4)).await;
        assert_eq!(recorder.len(), 1);
        assert_eq!(aggregator.pending_groups(), 1);

        scheduler.advance(Duration::from_secs(1)).await;
        assert_eq!(recorder.len(), 2);
    }
}
