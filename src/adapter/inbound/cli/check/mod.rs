//! Diagnostic command handlers.

pub mod config;
pub mod notify;
