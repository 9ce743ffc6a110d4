//! Notifier port for trade alerts.
//!
//! This module defines the trait for delivering consolidated trades to
//! alert sinks and a registry that fans an alert out to every sink.

use std::time::Duration;

use async_trait::async_trait;
use tracing::{error, info, warn};

use crate::domain::ConsolidatedTrade;
use crate::error::Result;

/// Trait for alert sinks.
///
/// Delivery is a single awaited attempt. Whether a failed delivery is retried
/// is decided by the caller, never by the sink itself.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver one consolidated trade.
    async fn notify(&self, trade: &ConsolidatedTrade) -> Result<()>;

    /// Sink name for logging.
    fn name(&self) -> &'static str;
}

/// How many times a failed delivery is attempted per sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeliveryPolicy {
    /// Total attempts per sink, including the first. `1` means no retry.
    pub max_attempts: u32,
    /// Wait between attempts.
    pub backoff: Duration,
}

impl DeliveryPolicy {
    /// Single attempt, failures are logged and dropped.
    #[must_use]
    pub const fn fire_and_forget() -> Self {
        Self {
            max_attempts: 1,
            backoff: Duration::ZERO,
        }
    }
}

impl Default for DeliveryPolicy {
    fn default() -> Self {
        Self::fire_and_forget()
    }
}

/// Registry of notifiers (composite pattern).
///
/// Broadcasts a trade to all registered notifiers.
pub struct NotifierRegistry {
    notifiers: Vec<Box<dyn Notifier>>,
    policy: DeliveryPolicy,
}

impl NotifierRegistry {
    /// Create an empty registry with the fire-and-forget policy.
    #[must_use]
    pub fn new() -> Self {
        Self::with_policy(DeliveryPolicy::default())
    }

    #[must_use]
    pub fn with_policy(policy: DeliveryPolicy) -> Self {
        Self {
            notifiers: vec![],
            policy,
        }
    }

    /// Register a notifier.
    pub fn register(&mut self, notifier: Box<dyn Notifier>) {
        self.notifiers.push(notifier);
    }

    /// Deliver to every registered notifier.
    ///
    /// Each sink is retried on its own according to the policy, so a sink
    /// that already succeeded is never sent the alert twice. Failures are
    /// logged, never propagated. Returns the number of sinks that failed
    /// every attempt.
    pub async fn notify_all(&self, trade: &ConsolidatedTrade) -> usize {
        let mut failures = 0;
        for notifier in &self.notifiers {
            if !self.deliver(notifier.as_ref(), trade).await {
                failures += 1;
            }
        }
        failures
    }

    async fn deliver(&self, notifier: &dyn Notifier, trade: &ConsolidatedTrade) -> bool {
        let max_attempts = self.policy.max_attempts.max(1);
        for attempt in 1..=max_attempts {
            match notifier.notify(trade).await {
                Ok(()) => return true,
                Err(e) if attempt < max_attempts => {
                    warn!(
                        notifier = notifier.name(),
                        attempt,
                        max_attempts,
                        error = %e,
                        "Alert delivery failed, retrying"
                    );
                    tokio::time::sleep(self.policy.backoff).await;
                }
                Err(e) => {
                    error!(
                        notifier = notifier.name(),
                        trader = %trade.latest.trader_name,
                        tx = %trade.latest.transaction_hash,
                        error = %e,
                        "Failed to deliver alert"
                    );
                }
            }
        }
        false
    }

    /// Names of the registered notifiers, in registration order.
    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        self.notifiers.iter().map(|n| n.name()).collect()
    }

    /// Number of registered notifiers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.notifiers.len()
    }

    /// Check if registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.notifiers.is_empty()
    }
}

impl Default for NotifierRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// A logging notifier that logs alerts via tracing. Used for dry runs.
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, trade: &ConsolidatedTrade) -> Result<()> {
        info!(
            trader = %trade.latest.trader_name,
            side = %trade.side(),
            shares = %trade.shares,
            amount = %trade.amount.round_dp(2),
            price = %trade.price.round_dp(4),
            fills = trade.fill_count,
            market = %trade.latest.market,
            outcome = %trade.latest.outcome,
            "Trade alert"
        );
        Ok(())
    }

    fn name(&self) -> &'static str {
        "log"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{consolidate, Side};
    use crate::error::Error;
    use crate::testkit::domain::fill;
    use crate::testkit::notifier::RecordingNotifier;
    use rust_decimal_macros::dec;

    struct FailingNotifier;

    #[async_trait]
    impl Notifier for FailingNotifier {
        async fn notify(&self, _trade: &ConsolidatedTrade) -> Result<()> {
            Err(Error::Notification("webhook returned 500".into()))
        }

        fn name(&self) -> &'static str {
            "failing"
        }
    }

    fn sample() -> ConsolidatedTrade {
        consolidate(&[fill("0xa", "cond", Side::Buy, dec!(10), dec!(4))]).unwrap()
    }

    #[tokio::test]
    async fn registry_delivers_to_all() {
        let first = RecordingNotifier::new();
        let second = RecordingNotifier::new();
        let mut registry = NotifierRegistry::new();
        registry.register(Box::new(first.clone()));
        registry.register(Box::new(second.clone()));

        let failures = registry.notify_all(&sample()).await;

        assert_eq!(failures, 0);
        assert_eq!(first.len(), 1);
        assert_eq!(second.len(), 1);
    }

    #[tokio::test]
    async fn failing_sink_does_not_block_others() {
        let recorder = RecordingNotifier::new();
        let mut registry = NotifierRegistry::new();
        registry.register(Box::new(FailingNotifier));
        registry.register(Box::new(recorder.clone()));

        let failures = registry.notify_all(&sample()).await;

        assert_eq!(failures, 1);
        assert_eq!(recorder.len(), 1);
    }

    #[tokio::test]
    async fn retry_policy_retries_only_failing_sink() {
        let flaky = RecordingNotifier::failing_first(1);
        let steady = RecordingNotifier::new();
        let mut registry = NotifierRegistry::with_policy(DeliveryPolicy {
            max_attempts: 2,
            backoff: Duration::ZERO,
        });
        registry.register(Box::new(flaky.clone()));
        registry.register(Box::new(steady.clone()));

        let failures = registry.notify_all(&sample()).await;

        assert_eq!(failures, 0);
        assert_eq!(flaky.attempts(), 2);
        assert_eq!(flaky.len(), 1);
        assert_eq!(steady.attempts(), 1);
    }

    #[tokio::test]
    async fn default_policy_does_not_retry() {
        let flaky = RecordingNotifier::failing_first(1);
        let mut registry = NotifierRegistry::new();
        registry.register(Box::new(flaky.clone()));

        let failures = registry.notify_all(&sample()).await;

        assert_eq!(failures, 1);
        assert_eq!(flaky.attempts(), 1);
        assert_eq!(flaky.len(), 0);
    }

    #[test]
    fn registry_len_and_names() {
        let mut registry = NotifierRegistry::new();
        assert!(registry.is_empty());

        registry.register(Box::new(RecordingNotifier::new()));
        registry.register(Box::new(LogNotifier));

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.names(), vec!["recording", "log"]);
    }
}
