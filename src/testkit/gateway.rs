//! Scripted [`ActivityGateway`] that serves canned data and records calls.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::domain::PositionSnapshot;
use crate::error::{Error, Result};
use crate::port::{ActivityGateway, ActivityRecord};

#[derive(Default)]
struct Script {
    activity: HashMap<String, Vec<ActivityRecord>>,
    positions: HashMap<String, Vec<PositionSnapshot>>,
    failing_activity: HashSet<String>,
    failing_positions: HashSet<String>,
    activity_calls: Vec<String>,
    position_calls: Vec<(String, usize, usize)>,
}

/// A gateway backed by per-address fixtures.
///
/// Positions are paged by slicing the configured list with `offset` and
/// `limit`, like the real endpoint. Clones share fixtures and call logs.
#[derive(Clone, Default)]
pub struct ScriptedGateway {
    script: Arc<Mutex<Script>>,
}

impl ScriptedGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_activity(self, address: &str, records: Vec<ActivityRecord>) -> Self {
        self.set_activity(address, records);
        self
    }

    pub fn with_positions(self, address: &str, positions: Vec<PositionSnapshot>) -> Self {
        self.script
            .lock()
            .positions
            .insert(address.to_string(), positions);
        self
    }

    /// Make every activity fetch for `address` fail.
    pub fn failing_activity(self, address: &str) -> Self {
        self.script
            .lock()
            .failing_activity
            .insert(address.to_string());
        self
    }

    /// Make every position fetch for `address` fail.
    pub fn failing_positions(self, address: &str) -> Self {
        self.script
            .lock()
            .failing_positions
            .insert(address.to_string());
        self
    }

    /// Replace the activity served for `address` on later polls.
    pub fn set_activity(&self, address: &str, records: Vec<ActivityRecord>) {
        self.script
            .lock()
            .activity
            .insert(address.to_string(), records);
    }

    pub fn activity_for(&self, address: &str) -> Vec<ActivityRecord> {
        self.script
            .lock()
            .activity
            .get(address)
            .cloned()
            .unwrap_or_default()
    }

    /// Addresses passed to `fetch_activity`, in call order.
    pub fn activity_calls(&self) -> Vec<String> {
        self.script.lock().activity_calls.clone()
    }

    /// `(address, limit, offset)` for every `fetch_positions` call.
    pub fn position_calls(&self) -> Vec<(String, usize, usize)> {
        self.script.lock().position_calls.clone()
    }

    /// Number of `fetch_positions` calls made for `address`.
    pub fn position_calls_for(&self, address: &str) -> usize {
        self.script
            .lock()
            .position_calls
            .iter()
            .filter(|(a, _, _)| a == address)
            .count()
    }
}

#[async_trait]
impl ActivityGateway for ScriptedGateway {
    async fn fetch_activity(&self, address: &str) -> Result<Vec<ActivityRecord>> {
        let mut script = self.script.lock();
        script.activity_calls.push(address.to_string());
        if script.failing_activity.contains(address) {
            return Err(Error::Connection(format!("scripted activity failure for {address}")));
        }
        Ok(script.activity.get(address).cloned().unwrap_or_default())
    }

    async fn fetch_positions(
        &self,
        address: &str,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<PositionSnapshot>> {
        let mut script = self.script.lock();
        script
            .position_calls
            .push((address.to_string(), limit, offset));
        if script.failing_positions.contains(address) {
            return Err(Error::Connection(format!("scripted positions failure for {address}")));
        }

        let all = script.positions.get(address).map(Vec::as_slice).unwrap_or_default();
        let start = offset.min(all.len());
        let end = offset.saturating_add(limit).min(all.len());
        Ok(all[start..end].to_vec())
    }

    fn gateway_name(&self) -> &'static str {
        "scripted"
    }
}
