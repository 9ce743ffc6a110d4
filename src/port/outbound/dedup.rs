//! Trade deduplication port.
//!
//! Defines the persistent set of transaction hashes that have already been
//! accepted into the pipeline, so a fill is alerted at most once across polls
//! and process restarts.

use crate::error::Result;

/// Port for the set of already-seen transaction hashes.
///
/// # Contract
///
/// - `mark_processed` is insert-if-absent: marking the same hash twice is a
///   no-op after the first call and never an error.
/// - A marked hash must stay marked across process restarts.
/// - Records are never updated or removed.
///
/// # Errors
///
/// Any storage failure is returned to the caller. The monitor treats it as
/// fatal, because continuing without the store risks duplicate alerts.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`; lookups may run concurrently with
/// inserts from the same process.
pub trait DedupStore: Send + Sync {
    /// Return `true` if `tx_hash` has been marked.
    fn is_processed(&self, tx_hash: &str) -> Result<bool>;

    /// Durably record `tx_hash` as seen.
    fn mark_processed(&self, tx_hash: &str) -> Result<()>;
}
