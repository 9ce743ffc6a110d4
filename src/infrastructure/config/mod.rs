//! Configuration loading and validation.

pub mod aggregation;
pub mod discord;
pub mod logging;
pub mod settings;
pub mod telegram;

pub use settings::{Config, RunOverrides};
