//! Exchange-agnostic domain types.

pub mod trade;
pub mod trader;

pub use trade::{
    consolidate, AggregationKey, ConsolidatedTrade, PositionSnapshot, Side, TradeEvent,
};
pub use trader::{is_valid_address, Trader};
