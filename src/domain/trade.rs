//! Trade fills, position snapshots and their consolidation.
//!
//! A [`TradeEvent`] is one observed fill. Fills sharing an [`AggregationKey`]
//! within the aggregation window are folded into a single
//! [`ConsolidatedTrade`] by [`consolidate`].

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Direction of a fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Buy => "BUY",
            Self::Sell => "SELL",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A trader's holding in one outcome of a market, as of the poll that saw it.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionSnapshot {
    pub outcome: String,
    pub size: Decimal,
    pub avg_price: Decimal,
    pub current_value: Decimal,
    pub condition_id: String,
    pub event_slug: String,
    pub title: String,
}

/// One observed fill, enriched with the trader's positions in the same event.
#[derive(Debug, Clone, PartialEq)]
pub struct TradeEvent {
    pub trader_name: String,
    pub trader_address: String,
    pub trader_profile_url: String,
    pub side: Side,
    pub shares: Decimal,
    /// Notional in USDC.
    pub amount: Decimal,
    pub price: Decimal,
    pub market: String,
    pub market_url: String,
    pub outcome: String,
    pub condition_id: String,
    pub event_slug: String,
    pub transaction_hash: String,
    /// Positions sharing this fill's event slug. Empty when none are held.
    pub positions: Vec<PositionSnapshot>,
}

impl TradeEvent {
    #[must_use]
    pub fn aggregation_key(&self) -> AggregationKey {
        AggregationKey {
            trader_address: self.trader_address.clone(),
            condition_id: self.condition_id.clone(),
            side: self.side,
        }
    }
}

/// Groups fills that are reported together.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AggregationKey {
    pub trader_address: String,
    pub condition_id: String,
    pub side: Side,
}

impl fmt::Display for AggregationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}",
            self.trader_address, self.condition_id, self.side
        )
    }
}

/// The reduction of every fill buffered under one key.
#[derive(Debug, Clone, PartialEq)]
pub struct ConsolidatedTrade {
    /// Descriptive fields of the most recently appended fill.
    pub latest: TradeEvent,
    pub shares: Decimal,
    pub amount: Decimal,
    /// Volume-weighted average price (`amount / shares`).
    pub price: Decimal,
    pub fill_count: usize,
}

impl ConsolidatedTrade {
    #[must_use]
    pub fn side(&self) -> Side {
        self.latest.side
    }

    #[must_use]
    pub fn positions(&self) -> &[PositionSnapshot] {
        &self.latest.positions
    }

    /// The position in the traded condition itself, if it was reported.
    #[must_use]
    pub fn traded_position(&self) -> Option<&PositionSnapshot> {
        self.latest
            .positions
            .iter()
            .find(|p| p.condition_id == self.latest.condition_id)
    }
}

/// Fold a group of fills into one consolidated trade.
///
/// Returns `None` for an empty group. Descriptive fields and positions come
/// from the last fill, since later snapshots reflect the newer state.
#[must_use]
pub fn consolidate(fills: &[TradeEvent]) -> Option<ConsolidatedTrade> {
    let latest = fills.last()?.clone();
    let shares: Decimal = fills.iter().map(|f| f.shares).sum();
    let amount: Decimal = fills.iter().map(|f| f.amount).sum();
    let price = if shares.is_zero() {
        Decimal::ZERO
    } else {
        amount / shares
    };

    Some(ConsolidatedTrade {
        latest,
        shares,
        amount,
        price,
        fill_count: fills.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit::domain::{fill, position};
    use rust_decimal_macros::dec;

    #[test]
    fn consolidate_sums_and_weights_price() {
        let fills = vec![
            fill("0xa", "cond-x", Side::Buy, dec!(10), dec!(6)),
            fill("0xa", "cond-x", Side::Buy, dec!(5), dec!(3)),
            fill("0xa", "cond-x", Side::Buy, dec!(2), dec!(1.2)),
        ];

        let trade = consolidate(&fills).unwrap();

        assert_eq!(trade.shares, dec!(17));
        assert_eq!(trade.amount, dec!(10.2));
        assert_eq!(trade.price, dec!(0.6));
        assert_eq!(trade.fill_count, 3);
    }

    #[test]
    fn consolidate_takes_positions_from_latest_fill() {
        let mut first = fill("0xa", "cond-x", Side::Sell, dec!(10), dec!(5));
        first.positions = vec![position("cond-x", "Yes", dec!(90))];
        let mut second = fill("0xa", "cond-x", Side::Sell, dec!(10), dec!(5));
        second.positions = vec![position("cond-x", "Yes", dec!(80))];

        let trade = consolidate(&[first, second]).unwrap();

        assert_eq!(trade.traded_position().unwrap().size, dec!(80));
    }

    #[test]
    fn consolidate_empty_group_is_none() {
        assert!(consolidate(&[]).is_none());
    }

    #[test]
    fn aggregation_key_display() {
        let event = fill("0xa", "cond-x", Side::Sell, dec!(1), dec!(0.5));
        assert_eq!(event.aggregation_key().to_string(), "0xa:cond-x:SELL");
    }

    #[test]
    fn side_serializes_upper_case() {
        assert_eq!(serde_json::to_string(&Side::Buy).unwrap(), "\"BUY\"");
        let side: Side = serde_json::from_str("\"SELL\"").unwrap();
        assert_eq!(side, Side::Sell);
    }
}
