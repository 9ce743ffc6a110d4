//! Application layer: the polling and aggregation pipeline.
//!
//! - [`monitor`] - Polls traders, dedups fills and feeds the aggregator
//! - [`aggregator`] - Buffers fills per key and emits consolidated alerts

pub mod aggregator;
pub mod monitor;

pub use aggregator::{TradeAggregator, DEFAULT_WINDOW};
pub use monitor::{
    build_event, fetch_all_positions, Monitor, MonitorConfig, MonitorHandle, MonitorState,
};
