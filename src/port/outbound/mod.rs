//! Outbound ports (driven side): interfaces implemented by outbound adapters.
//!
//! These contracts describe infrastructure dependencies such as the upstream
//! Data API, dedup storage, timers, and alert delivery.

pub mod dedup;
pub mod gateway;
pub mod notifier;
pub mod scheduler;
