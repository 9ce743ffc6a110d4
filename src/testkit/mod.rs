//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests).
//!
//! # Modules
//!
//! - [`scheduler`] - `ManualScheduler`, a virtual clock for aggregation timers.
//! - [`notifier`] - `RecordingNotifier`, captures alerts and can fail on demand.
//! - [`gateway`] - `ScriptedGateway`, canned activity and position pages.
//! - [`dedup`] - `MemoryDedupStore`, an in-memory seen set.
//! - [`domain`] - Builders for traders, fills, positions and activity records.

pub mod dedup;
pub mod domain;
pub mod gateway;
pub mod notifier;
pub mod scheduler;
