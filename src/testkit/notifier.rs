//! Notifier double that records every delivered trade.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::domain::ConsolidatedTrade;
use crate::error::{Error, Result};
use crate::port::Notifier;

#[derive(Default)]
struct Recorded {
    trades: Vec<ConsolidatedTrade>,
    attempts: usize,
    fail_remaining: usize,
    delay: Duration,
}

/// Captures delivered trades. Clones share the same log.
#[derive(Clone, Default)]
pub struct RecordingNotifier {
    inner: Arc<Mutex<Recorded>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the first `n` deliveries, then succeed.
    pub fn failing_first(n: usize) -> Self {
        let notifier = Self::new();
        notifier.inner.lock().fail_remaining = n;
        notifier
    }

    /// Sleep for `delay` before recording each delivery.
    pub fn with_delay(delay: Duration) -> Self {
        let notifier = Self::new();
        notifier.inner.lock().delay = delay;
        notifier
    }

    /// Successfully delivered trades, in delivery order.
    pub fn trades(&self) -> Vec<ConsolidatedTrade> {
        self.inner.lock().trades.clone()
    }

    /// Number of successful deliveries.
    pub fn len(&self) -> usize {
        self.inner.lock().trades.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of delivery attempts, failed ones included.
    pub fn attempts(&self) -> usize {
        self.inner.lock().attempts
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, trade: &ConsolidatedTrade) -> Result<()> {
        let delay = self.inner.lock().delay;
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        let mut recorded = self.inner.lock();
        recorded.attempts += 1;
        if recorded.fail_remaining > 0 {
            recorded.fail_remaining -= 1;
            return Err(Error::Notification("scripted failure".into()));
        }
        recorded.trades.push(trade.clone());
        Ok(())
    }

    fn name(&self) -> &'static str {
        "recording"
    }
}
