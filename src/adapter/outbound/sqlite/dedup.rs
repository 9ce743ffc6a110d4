//! SQLite dedup store implementation.
//!
//! Persists processed transaction hashes so a fill is alerted at most once
//! across polls and restarts.

use std::path::Path;

use chrono::Utc;
use diesel::prelude::*;

use super::database::connection::{self, DbPool};
use super::database::model::ProcessedTradeRow;
use super::database::schema::processed_trades;
use crate::error::{Error, Result};
use crate::port::DedupStore;

/// SQLite-backed [`DedupStore`].
pub struct SqliteDedupStore {
    pool: DbPool,
}

impl SqliteDedupStore {
    /// Wrap an existing pool. Migrations must already have run.
    #[must_use]
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Open (or create) the database file at `path` and run migrations.
    ///
    /// # Errors
    /// Returns an error if the file or schema cannot be set up.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        connection::open(path.as_ref()).map(Self::new)
    }

    /// Number of stored hashes.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub fn seen_count(&self) -> Result<i64> {
        let mut conn = self.conn()?;
        processed_trades::table
            .count()
            .get_result(&mut conn)
            .map_err(|e| Error::Database(e.to_string()))
    }

    fn conn(
        &self,
    ) -> Result<diesel::r2d2::PooledConnection<diesel::r2d2::ConnectionManager<SqliteConnection>>>
    {
        self.pool
            .get()
            .map_err(|e| Error::Connection(e.to_string()))
    }
}

impl DedupStore for SqliteDedupStore {
    fn is_processed(&self, tx_hash: &str) -> Result<bool> {
        let mut conn = self.conn()?;
        let row: Option<ProcessedTradeRow> = processed_trades::table
            .find(tx_hash)
            .select(ProcessedTradeRow::as_select())
            .first(&mut conn)
            .optional()
            .map_err(|e| Error::Database(e.to_string()))?;

        Ok(row.is_some())
    }

    fn mark_processed(&self, tx_hash: &str) -> Result<()> {
        let row = ProcessedTradeRow {
            tx_hash: tx_hash.to_string(),
            processed_at: Utc::now().timestamp_millis(),
        };
        let mut conn = self.conn()?;

        diesel::insert_or_ignore_into(processed_trades::table)
            .values(&row)
            .execute(&mut conn)
            .map_err(|e| Error::Database(e.to_string()))?;

        Ok(())
    }
}
