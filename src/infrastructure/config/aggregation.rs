//! Aggregation window and alert delivery settings.

use std::time::Duration;

use serde::Deserialize;

use crate::port::DeliveryPolicy;

/// `[aggregation]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct AggregationConfig {
    /// Window opened by the first fill of a burst.
    #[serde(default = "default_window_ms")]
    pub window_ms: u64,
    /// Attempts per sink for each alert. `1` disables retry.
    #[serde(default = "default_delivery_attempts")]
    pub delivery_attempts: u32,
    /// Wait between delivery attempts.
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,
}

const fn default_window_ms() -> u64 {
    5_000
}

const fn default_delivery_attempts() -> u32 {
    1
}

const fn default_retry_backoff_ms() -> u64 {
    1_000
}

impl AggregationConfig {
    #[must_use]
    pub const fn window(&self) -> Duration {
        Duration::from_millis(self.window_ms)
    }

    #[must_use]
    pub const fn delivery_policy(&self) -> DeliveryPolicy {
        DeliveryPolicy {
            max_attempts: self.delivery_attempts,
            backoff: Duration::from_millis(self.retry_backoff_ms),
        }
    }
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self {
            window_ms: default_window_ms(),
            delivery_attempts: default_delivery_attempts(),
            retry_backoff_ms: default_retry_backoff_ms(),
        }
    }
}
