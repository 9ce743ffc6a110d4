//! Fillwatch - follow Polymarket traders and alert on their fills.
//!
//! The pipeline polls each watched trader's activity on the Polymarket Data
//! API, drops transactions it has already seen, and buffers new fills for a
//! short window so a large order filled in many pieces produces one alert.
//!
//! # Architecture
//!
//! ```text
//! Monitor ──► TradeAggregator ──► NotifierRegistry ──► Discord / Telegram / log
//!    │               │
//!    ▼               ▼
//! Data API       Scheduler
//! DedupStore
//! ```
//!
//! # Modules
//!
//! - [`domain`] - Trades, positions, traders and fill consolidation
//! - [`port`] - Traits the application depends on
//! - [`application`] - The monitor loop and the aggregation buffer
//! - [`adapter`] - Data API client, SQLite store, notifiers, timers, CLI
//! - [`infrastructure`] - Configuration and pipeline wiring
//! - [`error`] - Error types for the crate
//!
//! # Features
//!
//! - `telegram` (default) - Telegram alert delivery
//! - `testkit` - In-memory fakes for integration tests
//!
//! # Example
//!
//! ```no_run
//! use fillwatch::infrastructure::bootstrap;
//! use fillwatch::infrastructure::config::Config;
//!
//! # async fn example() -> fillwatch::error::Result<()> {
//! let config = Config::load("config.toml")?;
//! config.init_logging();
//! bootstrap::run(&config).await
//! # }
//! ```

pub mod adapter;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod port;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
