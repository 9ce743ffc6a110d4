//! Builders for domain primitives used across tests.
//!
//! Provides concise factory functions for [`Trader`], [`TradeEvent`],
//! [`PositionSnapshot`] and [`ActivityRecord`] so tests focus on assertions
//! rather than construction boilerplate.

use std::sync::atomic::{AtomicU64, Ordering};

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::domain::{PositionSnapshot, Side, TradeEvent, Trader};
use crate::port::{ActivityRecord, TRADE_ACTIVITY};

static NEXT_TX: AtomicU64 = AtomicU64::new(1);

fn next_tx() -> String {
    format!("0xfill{}", NEXT_TX.fetch_add(1, Ordering::Relaxed))
}

fn price_of(amount: Decimal, shares: Decimal) -> Decimal {
    if shares.is_zero() {
        Decimal::ZERO
    } else {
        amount / shares
    }
}

/// Create a [`Trader`].
pub fn trader(address: &str, name: &str) -> Trader {
    Trader::new(address, name)
}

/// A valid address whose last byte is `n`.
pub fn address(n: u8) -> String {
    format!("0x{n:040x}")
}

/// Create a fill with a unique transaction hash and no positions.
///
/// The event slug is `event-{condition_id}`.
pub fn fill(
    trader_address: &str,
    condition_id: &str,
    side: Side,
    shares: Decimal,
    amount: Decimal,
) -> TradeEvent {
    TradeEvent {
        trader_name: "trader".into(),
        trader_address: trader_address.into(),
        trader_profile_url: "https://polymarket.com/@trader".into(),
        side,
        shares,
        amount,
        price: price_of(amount, shares),
        market: format!("Market {condition_id}"),
        market_url: format!("https://polymarket.com/event/event-{condition_id}"),
        outcome: "Yes".into(),
        condition_id: condition_id.into(),
        event_slug: format!("event-{condition_id}"),
        transaction_hash: next_tx(),
        positions: Vec::new(),
    }
}

/// A position in `event-{condition_id}` bought at 50¢ and still worth 50¢.
pub fn position(condition_id: &str, outcome: &str, size: Decimal) -> PositionSnapshot {
    position_in_event(condition_id, &format!("event-{condition_id}"), outcome, size)
}

/// Like [`position`] with an explicit event slug.
pub fn position_in_event(
    condition_id: &str,
    event_slug: &str,
    outcome: &str,
    size: Decimal,
) -> PositionSnapshot {
    PositionSnapshot {
        outcome: outcome.into(),
        size,
        avg_price: dec!(0.5),
        current_value: size * dec!(0.5),
        condition_id: condition_id.into(),
        event_slug: event_slug.into(),
        title: format!("Market {condition_id}"),
    }
}

/// A `TRADE` activity record in `event-{condition_id}`.
pub fn activity(
    tx_hash: &str,
    condition_id: &str,
    side: Side,
    size: Decimal,
    usdc_size: Decimal,
) -> ActivityRecord {
    ActivityRecord {
        kind: TRADE_ACTIVITY.into(),
        side,
        size,
        usdc_size,
        price: price_of(usdc_size, size),
        condition_id: condition_id.into(),
        title: format!("Market {condition_id}"),
        slug: condition_id.into(),
        event_slug: format!("event-{condition_id}"),
        outcome: "Yes".into(),
        transaction_hash: tx_hash.into(),
        timestamp: 1_700_000_000,
    }
}
