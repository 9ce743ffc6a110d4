//! Outbound adapters (driven side).

pub mod notifier;
pub mod polymarket;
pub mod scheduler;
pub mod sqlite;

pub use scheduler::TokioScheduler;
