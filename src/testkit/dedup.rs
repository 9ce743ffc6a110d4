//! In-memory [`DedupStore`] with failure injection.

use std::collections::HashSet;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::{Error, Result};
use crate::port::DedupStore;

#[derive(Default)]
struct Seen {
    hashes: HashSet<String>,
    marked: Vec<String>,
    failing: bool,
    failing_marks: bool,
}

/// Seen set held in memory. Clones share state.
#[derive(Clone, Default)]
pub struct MemoryDedupStore {
    seen: Arc<Mutex<Seen>>,
}

impl MemoryDedupStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose every call fails with [`Error::Database`].
    pub fn failing() -> Self {
        let store = Self::new();
        store.seen.lock().failing = true;
        store
    }

    /// A store that answers lookups but fails every `mark_processed`.
    pub fn failing_on_mark() -> Self {
        let store = Self::new();
        store.seen.lock().failing_marks = true;
        store
    }

    /// Pre-mark hashes as already processed.
    pub fn with_seen<'a>(self, hashes: impl IntoIterator<Item = &'a str>) -> Self {
        self.seen
            .lock()
            .hashes
            .extend(hashes.into_iter().map(str::to_string));
        self
    }

    pub fn contains(&self, tx_hash: &str) -> bool {
        self.seen.lock().hashes.contains(tx_hash)
    }

    /// Every `mark_processed` argument, in call order.
    pub fn marked(&self) -> Vec<String> {
        self.seen.lock().marked.clone()
    }

    /// Number of distinct seen hashes.
    pub fn len(&self) -> usize {
        self.seen.lock().hashes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl DedupStore for MemoryDedupStore {
    fn is_processed(&self, tx_hash: &str) -> Result<bool> {
        let seen = self.seen.lock();
        if seen.failing {
            return Err(Error::Database("scripted dedup failure".into()));
        }
        Ok(seen.hashes.contains(tx_hash))
    }

    fn mark_processed(&self, tx_hash: &str) -> Result<()> {
        let mut seen = self.seen.lock();
        if seen.failing || seen.failing_marks {
            return Err(Error::Database("scripted dedup failure".into()));
        }
        seen.hashes.insert(tx_hash.to_string());
        seen.marked.push(tx_hash.to_string());
        Ok(())
    }
}
