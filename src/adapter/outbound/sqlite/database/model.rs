//! Database model types for Diesel ORM.

use diesel::prelude::*;

use super::schema::processed_trades;

/// A transaction hash that has been accepted into the pipeline.
#[derive(Queryable, Selectable, Insertable, Debug, Clone)]
#[diesel(table_name = processed_trades)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ProcessedTradeRow {
    pub tx_hash: String,
    /// Unix milliseconds.
    pub processed_at: i64,
}
