//! Implementations of ports (hexagonal adapters).
//!
//! - [`inbound`] - Driving side: the command-line interface
//! - [`outbound`] - Driven side: Data API, SQLite, timers and alert sinks

pub mod inbound;
pub mod outbound;
