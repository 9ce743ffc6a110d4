//! Upstream activity gateway port.
//!
//! Abstracts the Polymarket Data API endpoints the monitor polls: a trader's
//! recent trade activity and their paginated open positions.

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::domain::{PositionSnapshot, Side};
use crate::error::Result;

/// Activity type string for trade executions.
pub const TRADE_ACTIVITY: &str = "TRADE";

/// One activity record as reported upstream, before enrichment.
#[derive(Debug, Clone, PartialEq)]
pub struct ActivityRecord {
    /// Upstream activity type; only [`TRADE_ACTIVITY`] records are alerted.
    pub kind: String,
    pub side: Side,
    pub size: Decimal,
    pub usdc_size: Decimal,
    pub price: Decimal,
    pub condition_id: String,
    pub title: String,
    pub slug: String,
    pub event_slug: String,
    pub outcome: String,
    pub transaction_hash: String,
    /// Unix seconds.
    pub timestamp: i64,
}

impl ActivityRecord {
    #[must_use]
    pub fn is_trade(&self) -> bool {
        self.kind.eq_ignore_ascii_case(TRADE_ACTIVITY)
    }
}

/// Source of trader activity and positions.
///
/// Calls are expected to be bounded by a per-request timeout. Failures are
/// returned as errors; the monitor decides how to degrade.
#[async_trait]
pub trait ActivityGateway: Send + Sync {
    /// Fetch the trader's recent trade activity, newest first as reported
    /// upstream. Order is not relied upon.
    async fn fetch_activity(&self, address: &str) -> Result<Vec<ActivityRecord>>;

    /// Fetch one page of the trader's positions.
    ///
    /// A page shorter than `limit` signals the end of the data.
    async fn fetch_positions(
        &self,
        address: &str,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<PositionSnapshot>>;

    /// Name for logging.
    fn gateway_name(&self) -> &'static str;
}
