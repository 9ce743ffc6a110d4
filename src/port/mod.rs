//! Trait definitions (hexagonal ports). Depend only on domain.
//!
//! Ports define the extension points of the pipeline. They are traits that
//! adapters implement to integrate with external systems.
//!
//! # Architecture
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │      Application        │
//!                    │  Monitor ─► Aggregator  │
//!     ┌──────────────┤                         ├──────────────┐
//!     │              └─────────────────────────┘              │
//!     │                         │                             │
//!     ▼                         ▼                             ▼
//! ┌─────────┐            ┌─────────────┐              ┌───────────┐
//! │Data API │            │ Dedup Store │              │ Notifier  │
//! │ Adapter │            │   Adapter   │              │  Adapter  │
//! └─────────┘            └─────────────┘              └───────────┘
//! ```
//!
//! # Available Ports
//!
//! - [`ActivityGateway`] - Trader activity and positions
//! - [`DedupStore`] - Persistent seen-transaction set
//! - [`Notifier`] - Alert delivery (Discord, Telegram, logging)
//! - [`Scheduler`] - One-shot timers for the aggregation window

pub mod outbound;

pub use outbound::dedup::DedupStore;
pub use outbound::gateway::{ActivityGateway, ActivityRecord, TRADE_ACTIVITY};
pub use outbound::notifier::{DeliveryPolicy, LogNotifier, Notifier, NotifierRegistry};
pub use outbound::scheduler::{Scheduler, TimerHandle};
