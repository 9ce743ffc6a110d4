//! SQLite persistence adapters.
//!
//! Provides the SQLite-backed dedup store using Diesel ORM.

pub mod database;
pub mod dedup;

pub use dedup::SqliteDedupStore;
